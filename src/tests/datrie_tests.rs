//! Cross-module tests for the double-array trie.
//!
//! The property tests drive a trie and a `BTreeMap` with the same operations
//! and compare every observable result, checking the arena invariants after
//! each step.

use std::collections::BTreeMap;

use proptest::prelude::*;
use test_case::test_case;

use crate::data_structures::double_array_trie::{
    Alphabet, Datrie, DatrieConfig, DatrieError, MockArcDomain,
};
use crate::tests::test_utils::{key_strategy, op_strategy, Op};

type CharTrie = Datrie<Alphabet<char>, u32>;

fn trie_with(reclaim: bool) -> CharTrie {
    let config = DatrieConfig::new()
        .with_initial_states(4)
        .with_initial_tail(4)
        .with_reclaim_empty_branches(reclaim);
    Datrie::with_config(Alphabet::default_alphanumeric(), config)
}

fn chars(key: &str) -> Vec<char> {
    key.chars().collect()
}

fn contents(trie: &CharTrie) -> Vec<(String, u32)> {
    trie.iter()
        .map(|(key, value)| (key.into_iter().collect(), *value))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_trie_matches_btreemap(
        ops in proptest::collection::vec(op_strategy(), 0..80),
        reclaim in any::<bool>(),
    ) {
        let mut trie = trie_with(reclaim);
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    let inserted = trie.insert_str(&key, value).unwrap();
                    prop_assert_eq!(inserted, model.insert(key, value).is_none());
                }
                Op::Delete(key) => {
                    let removed = trie.remove(&chars(&key));
                    prop_assert_eq!(removed, model.remove(&key));
                }
            }
            prop_assert!(trie.validate().is_ok(), "{:?}", trie.validate());
            prop_assert_eq!(trie.len(), model.len());
        }

        for (key, value) in &model {
            prop_assert_eq!(trie.get_str(key), Some(value));
        }
        let expected: Vec<(String, u32)> = model.into_iter().collect();
        prop_assert_eq!(contents(&trie), expected);
    }

    #[test]
    fn prop_absent_keys_are_not_found(
        keys in proptest::collection::vec(key_strategy(), 0..40),
        query in key_strategy(),
    ) {
        let mut trie = trie_with(true);
        for key in &keys {
            trie.insert_str(key, 1).unwrap();
        }
        prop_assert_eq!(trie.contains_str(&query), keys.contains(&query));
    }

    #[test]
    fn prop_prefix_queries_match_model(
        keys in proptest::collection::vec(key_strategy(), 0..40),
        query in key_strategy(),
    ) {
        let mut trie = trie_with(true);
        let mut model = BTreeMap::new();
        for (value, key) in keys.iter().enumerate() {
            trie.insert_str(key, value as u32).unwrap();
            model.insert(key.clone(), value as u32);
        }

        let expected: Vec<(String, u32)> = model
            .iter()
            .filter(|(key, _)| key.starts_with(query.as_str()))
            .map(|(key, value)| (key.clone(), *value))
            .collect();
        let actual: Vec<(String, u32)> = trie
            .iter_prefix(&chars(&query))
            .map(|(key, value)| (key.into_iter().collect(), *value))
            .collect();
        prop_assert_eq!(trie.has_prefix(&chars(&query)), !expected.is_empty());
        prop_assert_eq!(actual, expected);

        let longest = model
            .iter()
            .filter(|(key, _)| query.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(key, value)| (key.len(), value));
        prop_assert_eq!(trie.longest_prefix(&chars(&query)), longest);
    }

    #[test]
    fn prop_delete_everything_empties_arena(
        keys in proptest::collection::vec(key_strategy(), 0..40),
    ) {
        let mut trie = trie_with(true);
        for key in &keys {
            trie.insert_str(key, 0).unwrap();
        }
        for key in &keys {
            trie.delete_str(key);
        }

        let stats = trie.stats();
        prop_assert!(trie.is_empty());
        prop_assert_eq!(stats.occupied_states, 1);
        prop_assert_eq!(stats.free_states, stats.states - 2);
        prop_assert_eq!(stats.tail_tombstones, stats.tail_cells - 1);
    }
}

#[test_case("bachelor", "badge" ; "diverging suffixes")]
#[test_case("bachelor", "bach" ; "new key ends inside stored suffix")]
#[test_case("bach", "bachelor" ; "stored suffix ends inside new key")]
#[test_case("b", "bachelor" ; "single symbol then long key")]
#[test_case("bachelor", "b" ; "long key then its first symbol")]
#[test_case("ab", "ba" ; "no shared prefix")]
fn test_leaf_split_cases(first: &str, second: &str) {
    let mut trie = trie_with(true);
    assert!(trie.insert_str(first, 1).unwrap());
    assert!(trie.insert_str(second, 2).unwrap());

    assert_eq!(trie.get_str(first), Some(&1));
    assert_eq!(trie.get_str(second), Some(&2));
    assert_eq!(trie.len(), 2);
    assert!(trie.validate().is_ok());

    assert!(trie.delete_str(first));
    assert_eq!(trie.get_str(first), None);
    assert_eq!(trie.get_str(second), Some(&2));
    assert!(trie.validate().is_ok());
}

#[test_case(&["bachelor", "jar", "badge"], "bachelors", Some(8) ; "whole stored key")]
#[test_case(&["ba", "bachelor"], "bachelo", Some(2) ; "shorter key wins when longer is not a prefix")]
#[test_case(&["", "b"], "x", Some(0) ; "empty key matches everything")]
#[test_case(&["jar"], "ja", None ; "no stored key is a prefix")]
#[test_case(&["jar"], "jaR", None ; "invalid symbol stops the walk")]
fn test_longest_prefix(keys: &[&str], query: &str, expected: Option<usize>) {
    let mut trie = trie_with(true);
    for key in keys {
        trie.insert_str(key, 7).unwrap();
    }
    let found = trie.longest_prefix(&chars(query)).map(|(len, _)| len);
    assert_eq!(found, expected);
}

#[test]
fn test_many_keys_force_relocations() {
    let mut trie = trie_with(true);
    let keys: Vec<String> = (0..2000u32).map(|i| format!("k{}x{}", i % 37, i)).collect();
    for (value, key) in keys.iter().enumerate() {
        assert!(trie.insert_str(key, value as u32).unwrap());
    }
    assert!(trie.validate().is_ok());
    for (value, key) in keys.iter().enumerate() {
        assert_eq!(trie.get_str(key), Some(&(value as u32)));
    }

    for key in keys.iter().step_by(2) {
        assert!(trie.delete_str(key));
    }
    assert_eq!(trie.len(), 1000);
    assert!(trie.validate().is_ok());
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(trie.contains_str(key), i % 2 == 1);
    }
}

#[test]
fn test_delete_without_reclaim_keeps_branch_states() {
    let mut reclaiming = trie_with(true);
    let mut keeping = trie_with(false);
    for trie in [&mut reclaiming, &mut keeping] {
        trie.insert_str("bachelor", 1).unwrap();
        trie.insert_str("badge", 2).unwrap();
        trie.delete_str("bachelor");
        trie.delete_str("badge");
        assert!(trie.is_empty());
        assert!(trie.validate().is_ok());
    }

    assert_eq!(reclaiming.stats().occupied_states, 1);
    assert!(keeping.stats().occupied_states > 1);
    assert_eq!(keeping.iter().count(), 0);
}

#[test]
fn test_freed_states_are_reused() {
    let mut trie = trie_with(true);
    trie.insert_str("bachelor", 1).unwrap();
    trie.insert_str("badge", 2).unwrap();
    let grown = trie.stats().states;

    trie.delete_str("bachelor");
    trie.delete_str("badge");
    trie.insert_str("bachelor", 1).unwrap();
    trie.insert_str("badge", 2).unwrap();
    assert_eq!(trie.stats().states, grown);
}

#[test]
fn test_byte_keys() {
    let mut trie: Datrie<Alphabet<u8>, &str> = Datrie::new(Alphabet::default_alphanumeric_bytes());
    trie.insert(b"jar", "jar").unwrap();
    trie.insert(b"jam", "jam").unwrap();
    assert_eq!(trie.get(b"jam"), Some(&"jam"));
    assert!(matches!(
        trie.insert(b"j#r", "stop"),
        Err(DatrieError::InvalidSymbol { .. })
    ));
}

#[test]
fn test_mock_domain_is_consulted_before_mutation() {
    let mut domain = MockArcDomain::new();
    domain.expect_stop_symbol().return_const('$');
    domain.expect_size().return_const(3usize);
    domain.expect_code().returning(|symbol| match symbol {
        'x' => Ok(1),
        'y' => Ok(2),
        other => Err(DatrieError::invalid_symbol(other)),
    });
    domain.expect_label().returning(|code| match code {
        1 => Ok('x'),
        2 => Ok('y'),
        other => Err(DatrieError::InvalidCode(other)),
    });

    let mut trie: Datrie<MockArcDomain, u8> = Datrie::new(domain);
    trie.insert(&['x', 'y'], 1).unwrap();
    trie.insert(&['x', 'x'], 2).unwrap();

    let before = trie.stats();
    assert!(trie.insert(&['x', 'z'], 3).is_err());
    assert_eq!(trie.stats(), before);
    assert_eq!(trie.get(&['x', 'z']), None);

    let keys: Vec<Vec<char>> = trie.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec![vec!['x', 'x'], vec!['x', 'y']]);
}

#[test]
fn test_domain_codes_outside_declared_size_are_rejected() {
    let mut domain = MockArcDomain::new();
    domain.expect_stop_symbol().return_const('$');
    domain.expect_size().return_const(3usize);
    domain.expect_code().returning(|symbol| match symbol {
        'x' => Ok(1),
        'y' => Ok(2),
        // Misbehaving mappings: the stop code and a code past `size()`.
        's' => Ok(0),
        'w' => Ok(7),
        other => Err(DatrieError::invalid_symbol(other)),
    });
    domain.expect_label().returning(|code| match code {
        1 => Ok('x'),
        2 => Ok('y'),
        other => Err(DatrieError::InvalidCode(other)),
    });

    let mut trie: Datrie<MockArcDomain, u8> = Datrie::new(domain);
    trie.insert(&['x'], 1).unwrap();
    trie.insert(&['x', 'y'], 2).unwrap();
    let before = trie.stats();

    assert_eq!(trie.insert(&['s'], 3), Err(DatrieError::InvalidCode(0)));
    assert_eq!(trie.insert(&['x', 's', 'y'], 4), Err(DatrieError::InvalidCode(0)));
    assert_eq!(trie.insert(&['x', 'w'], 5), Err(DatrieError::InvalidCode(7)));
    assert_eq!(trie.stats(), before);
    assert!(trie.validate().is_ok());

    assert_eq!(trie.get(&['s']), None);
    assert!(!trie.has_prefix(&['x', 'w']));
    assert_eq!(trie.longest_prefix(&['x', 's']), Some((1, &1)));
    assert!(!trie.delete(&['w']));
    assert_eq!(trie.len(), 2);
}
