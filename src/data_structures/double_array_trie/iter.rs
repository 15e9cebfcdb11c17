// Copyright (c) 2025 Dactrie Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Ordered traversal of a double-array trie.

use super::arc_domain::ArcDomain;
use super::trie::Datrie;

/// Iterator over the `(key, value)` pairs of a [`Datrie`], in code order.
///
/// A key is yielded before every key it is a proper prefix of. Traversal uses
/// an explicit stack, so deep tries do not grow the call stack.
pub struct Iter<'a, D: ArcDomain, V> {
    trie: &'a Datrie<D, V>,
    stack: Vec<(usize, Vec<D::Symbol>)>,
}

impl<'a, D: ArcDomain, V> Iter<'a, D, V> {
    pub(super) fn new(trie: &'a Datrie<D, V>, start: Option<(usize, Vec<D::Symbol>)>) -> Self {
        Self {
            trie,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a, D: ArcDomain, V> Iterator for Iter<'a, D, V> {
    type Item = (Vec<D::Symbol>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let trie = self.trie;
        while let Some((s, mut path)) = self.stack.pop() {
            let state = match trie.states.state(s) {
                Some(state) => state,
                None => continue,
            };

            if state.base < 0 {
                path.extend(trie.tail.read(state.base.unsigned_abs()));
                if let Some(value) = state.value.as_ref() {
                    return Some((path, value));
                }
                continue;
            }

            let base = state.base.unsigned_abs();
            for &code in state.arcs.iter().rev() {
                if let Ok(label) = trie.domain.label(code) {
                    let mut child_path = path.clone();
                    child_path.push(label);
                    self.stack.push((base + code, child_path));
                }
            }

            if let Some(value) = state.value.as_ref() {
                return Some((path, value));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::data_structures::double_array_trie::{Alphabet, Datrie};

    fn collect<'a>(iter: impl Iterator<Item = (Vec<char>, &'a u32)>) -> Vec<(String, u32)> {
        iter.map(|(key, value)| (key.into_iter().collect(), *value)).collect()
    }

    fn sample() -> Datrie<Alphabet<char>, u32> {
        let mut trie = Datrie::new(Alphabet::default_alphanumeric());
        for (value, key) in ["bachelor", "jar", "badge", "ba", "", "b1", "car"].iter().enumerate() {
            trie.insert_str(key, value as u32).unwrap();
        }
        trie
    }

    #[test]
    fn test_iter_is_in_code_order() {
        let trie = &sample();
        let keys: Vec<String> = collect(trie.iter()).into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["", "ba", "bachelor", "badge", "b1", "car", "jar"]);
    }

    #[test]
    fn test_iter_prefix_includes_exact_key() {
        let trie = &sample();
        let pairs = collect(trie.iter_prefix(&['b', 'a']));
        assert_eq!(
            pairs,
            vec![
                ("ba".to_string(), 3),
                ("bachelor".to_string(), 0),
                ("badge".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_iter_prefix_inside_tail() {
        let trie = &sample();
        let pairs = collect(trie.iter_prefix(&['j', 'a']));
        assert_eq!(pairs, vec![("jar".to_string(), 1)]);
        assert_eq!(trie.iter_prefix(&['j', 'o']).count(), 0);
        assert_eq!(trie.iter_prefix(&['j', 'a', 'r', 's']).count(), 0);
    }

    #[test]
    fn test_iter_empty_trie() {
        let trie: Datrie<Alphabet<char>, u32> = Datrie::new(Alphabet::default_alphanumeric());
        assert_eq!(trie.iter().count(), 0);
        assert!(!trie.has_prefix(&[]));
    }
}
