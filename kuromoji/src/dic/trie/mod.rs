/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Double-array trie used as the string index of the dictionary

mod base_check;
mod builder;

pub use builder::DoubleArrayBuilder;

use crate::error::{KuromojiError, KuromojiResult};

pub(crate) const TERM_CODE: u8 = 0;
pub(crate) const ROOT_ID: usize = 0;

/// Largest record value a leaf can hold
pub const MAX_RECORD_VALUE: u32 = i32::MAX as u32 - 1;

/// Result of a common prefix search.
/// `end` is the byte offset of the match end in the searched input.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TrieEntry {
    pub value: Option<u32>,
    pub end: usize,
}

/// Immutable double-array trie.
///
/// A child of node `p` reached by byte `c` lives at `BASE[p] + c`
/// and has `CHECK[child] == p`. Leaves have `BASE <= 0` and store
/// the record `-BASE - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleArray {
    base: Vec<i32>,
    check: Vec<i32>,
}

impl DoubleArray {
    pub(crate) fn from_arrays(base: Vec<i32>, check: Vec<i32>) -> DoubleArray {
        DoubleArray { base, check }
    }

    /// Restores a trie from persisted BASE and CHECK arrays
    pub fn load(base: Vec<i32>, check: Vec<i32>) -> KuromojiResult<DoubleArray> {
        if base.len() != check.len() {
            return Err(KuromojiError::InvalidDataFormat(format!(
                "BASE and CHECK lengths differ: {} != {}",
                base.len(),
                check.len()
            )));
        }
        if base.is_empty() {
            return Err(KuromojiError::InvalidDataFormat(
                "trie arrays are empty".to_owned(),
            ));
        }
        Ok(DoubleArray { base, check })
    }

    pub fn base_buffer(&self) -> &[i32] {
        &self.base
    }

    pub fn check_buffer(&self) -> &[i32] {
        &self.check
    }

    /// Number of slots
    pub fn size(&self) -> usize {
        self.base.len()
    }

    #[inline]
    fn base(&self, index: usize) -> i32 {
        self.base.get(index).copied().unwrap_or(1 - index as i32)
    }

    #[inline]
    fn check(&self, index: usize) -> i32 {
        self.check.get(index).copied().unwrap_or(-(index as i32) - 1)
    }

    #[inline]
    fn is_leaf(&self, index: usize) -> bool {
        self.base(index) <= 0
    }

    #[inline]
    fn traverse(&self, parent: usize, code: u8) -> Option<usize> {
        let child = self.base(parent) as i64 + code as i64;
        if child < 0 {
            return None;
        }
        let child = child as usize;
        if self.check(child) == parent as i32 {
            Some(child)
        } else {
            None
        }
    }

    fn record(&self, leaf: usize) -> Option<u32> {
        let base = self.base(leaf);
        if base <= 0 {
            Some((-(base as i64) - 1) as u32)
        } else {
            None
        }
    }

    /// Exact match lookup
    pub fn lookup<K: AsRef<[u8]>>(&self, key: K) -> Option<u32> {
        let mut node = ROOT_ID;
        for &code in key.as_ref() {
            node = self.traverse(node, code)?;
        }
        let leaf = self.traverse(node, TERM_CODE)?;
        self.record(leaf)
    }

    /// Returns true if the key reaches a leaf
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        let mut node = ROOT_ID;
        let codes = key.as_ref().iter().copied().chain(std::iter::once(TERM_CODE));
        for code in codes {
            match self.traverse(node, code) {
                None => return false,
                Some(child) if self.is_leaf(child) => return true,
                Some(child) => node = child,
            }
        }
        false
    }

    /// Enumerates all keys which are prefixes of the input,
    /// in the order of increasing length
    pub fn common_prefix_iterator<'a>(&'a self, input: &'a [u8]) -> CommonPrefixIter<'a> {
        CommonPrefixIter {
            trie: self,
            data: input,
            node: ROOT_ID,
            offset: 0,
        }
    }

    pub fn common_prefix_search(&self, input: &[u8]) -> Vec<TrieEntry> {
        self.common_prefix_iterator(input).collect()
    }
}

pub struct CommonPrefixIter<'a> {
    trie: &'a DoubleArray,
    data: &'a [u8],
    node: usize,
    offset: usize,
}

impl<'a> Iterator for CommonPrefixIter<'a> {
    type Item = TrieEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while self.offset < self.data.len() {
            let code = self.data[self.offset];
            let child = match self.trie.traverse(self.node, code) {
                Some(c) => c,
                None => {
                    self.offset = self.data.len();
                    return None;
                }
            };
            self.node = child;
            self.offset += 1;

            // follow the terminal transition
            if let Some(leaf) = self.trie.traverse(child, TERM_CODE) {
                return Some(TrieEntry {
                    value: self.trie.record(leaf),
                    end: self.offset,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &[(&str, u32)] = &[
        ("apple", 1),
        ("ball", 2),
        ("bear", 3),
        ("bird", 4),
        ("bison", 5),
        ("black", 6),
        ("blue", 7),
        ("blur", 8),
        ("cold", 10),
        ("column", 11),
        ("cow", 12),
    ];

    fn build(words: &[(&str, u32)]) -> DoubleArray {
        let mut bldr = DoubleArrayBuilder::new(16);
        for (k, v) in words {
            bldr.append(k, *v).unwrap();
        }
        bldr.build()
    }

    #[test]
    fn lookup_all_keys() {
        let trie = build(WORDS);
        for (k, v) in WORDS {
            assert_eq!(trie.lookup(k), Some(*v), "{}", k);
            assert!(trie.contains(k), "{}", k);
        }
    }

    #[test]
    fn missing_keys() {
        let trie = build(WORDS);
        for k in ["", "a", "app", "apples", "bl", "bis", "dog", "colum"] {
            assert_eq!(trie.lookup(k), None, "{}", k);
            assert!(!trie.contains(k), "{}", k);
        }
    }

    #[test]
    fn common_prefix() {
        let trie = build(&[("東", 0), ("東京", 1), ("東京都", 2), ("京都", 3)]);
        let text = "東京都庁";
        let result = trie.common_prefix_search(text.as_bytes());
        assert_eq!(
            result,
            vec![
                TrieEntry {
                    value: Some(0),
                    end: 3
                },
                TrieEntry {
                    value: Some(1),
                    end: 6
                },
                TrieEntry {
                    value: Some(2),
                    end: 9
                },
            ]
        );
        assert!(trie.common_prefix_search("庁".as_bytes()).is_empty());
        assert!(trie.common_prefix_search(b"").is_empty());
    }

    #[test]
    fn common_prefix_ascii() {
        let trie = build(WORDS);
        let found: Vec<_> = trie
            .common_prefix_iterator(b"bluebird")
            .map(|e| e.value)
            .collect();
        assert_eq!(found, vec![Some(7)]);
    }

    /// Every string of 1 to 5 symbols over a mixed ASCII and multi-byte
    /// alphabet, so keys share long prefixes and UTF-8 lead bytes
    fn generated_keys() -> Vec<String> {
        const ALPHABET: [&str; 6] = ["東", "京", "都", "ー", "a", "b"];
        let mut keys: Vec<String> = Vec::new();
        let mut level = vec![String::new()];
        for _ in 0..5 {
            let next: Vec<String> = level
                .iter()
                .flat_map(|p| ALPHABET.iter().map(move |c| format!("{}{}", p, c)))
                .collect();
            keys.extend(next.iter().cloned());
            level = next;
        }
        keys
    }

    #[test]
    fn generated_key_set() {
        let keys = generated_keys();
        assert_eq!(keys.len(), 6 + 36 + 216 + 1296 + 7776);
        for initial in [0, 3, 65536] {
            let mut bldr = DoubleArrayBuilder::new(initial);
            // insertion order differs from the sorted order
            for (i, k) in keys.iter().enumerate().rev() {
                bldr.append(k, i as u32).unwrap();
            }
            let trie = bldr.build();
            for (i, k) in keys.iter().enumerate() {
                assert_eq!(trie.lookup(k), Some(i as u32), "{}", k);
            }
            for k in ["c", "東c", "京都都都都都", "aaaaaa", "東京京x"] {
                assert_eq!(trie.lookup(k), None, "{}", k);
            }

            let text = "東京都ーab";
            let found: Vec<_> = trie
                .common_prefix_iterator(text.as_bytes())
                .map(|e| (e.end, e.value))
                .collect();
            let expected: Vec<_> = text
                .char_indices()
                .skip(1)
                .map(|(end, _)| end)
                .chain(std::iter::once(text.len()))
                .take(5)
                .map(|end| {
                    let id = keys.iter().position(|k| k == &text[..end]).unwrap();
                    (end, Some(id as u32))
                })
                .collect();
            assert_eq!(found, expected);

            let loaded =
                DoubleArray::load(trie.base_buffer().to_vec(), trie.check_buffer().to_vec())
                    .unwrap();
            assert_eq!(loaded, trie);
        }
    }

    #[test]
    fn load_roundtrip() {
        let trie = build(WORDS);
        let loaded =
            DoubleArray::load(trie.base_buffer().to_vec(), trie.check_buffer().to_vec()).unwrap();
        assert_eq!(loaded, trie);
        for (k, v) in WORDS {
            assert_eq!(loaded.lookup(k), Some(*v));
        }
    }

    #[test]
    fn load_rejects_mismatch() {
        assert!(DoubleArray::load(vec![1, 0], vec![0]).is_err());
    }

    #[test]
    fn empty_key_set() {
        let trie = DoubleArrayBuilder::new(8).build();
        assert_eq!(trie.size(), 2);
        assert_eq!(trie.lookup("a"), None);
        assert!(trie.common_prefix_search(b"abc").is_empty());
    }

    #[test]
    fn shrunk_after_build() {
        let trie = build(WORDS);
        let check = trie.check_buffer();
        assert!(check[check.len() - 1] < 0);
        assert!(check[check.len() - 2] >= 0);
    }
}
