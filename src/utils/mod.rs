//! Word-list loading for the command-line tool.
//!
//! A word list holds one entry per line: a key, optionally followed by a tab
//! and an unsigned integer value. Blank lines and lines starting with `#` are
//! skipped. An entry without a value gets its 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::data_structures::double_array_trie::{Alphabet, Datrie, DatrieConfig};
use crate::error::{DactrieError, DactrieResult};

/// One parsed word-list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    /// 1-based line the entry came from.
    pub line: usize,
    /// The key.
    pub key: String,
    /// The value stored under the key.
    pub value: u64,
}

/// Parses a word list from any buffered reader.
pub fn parse_word_list<R: BufRead>(reader: R) -> DactrieResult<Vec<WordEntry>> {
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = match line.split_once('\t') {
            Some((key, value)) => {
                let value = value.trim().parse::<u64>().map_err(|e| DactrieError::WordList {
                    line: line_no,
                    message: format!("invalid value {value:?}: {e}"),
                })?;
                (key, value)
            }
            None => (line, line_no as u64),
        };

        entries.push(WordEntry {
            line: line_no,
            key: key.to_string(),
            value,
        });
    }
    Ok(entries)
}

/// Reads and parses the word list at `path`.
pub fn load_word_list<P: AsRef<Path>>(path: P) -> DactrieResult<Vec<WordEntry>> {
    let file = File::open(path.as_ref())?;
    let entries = parse_word_list(BufReader::new(file))?;
    debug!(path = %path.as_ref().display(), entries = entries.len(), "word list parsed");
    Ok(entries)
}

/// Builds a trie from word-list entries. Later duplicates replace earlier ones.
///
/// A key with a symbol outside `alphabet` is reported with its line number.
pub fn build_trie(
    alphabet: Alphabet<char>,
    config: DatrieConfig,
    entries: &[WordEntry],
) -> DactrieResult<Datrie<Alphabet<char>, u64>> {
    let mut trie = Datrie::with_config(alphabet, config);
    for entry in entries {
        trie.insert_str(&entry.key, entry.value)
            .map_err(|e| DactrieError::WordList {
                line: entry.line,
                message: e.to_string(),
            })?;
    }
    info!(keys = trie.len(), "trie built");
    Ok(trie)
}
