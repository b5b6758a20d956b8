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

use super::base_check::BaseCheck;
use super::{DoubleArray, MAX_RECORD_VALUE, ROOT_ID, TERM_CODE};
use crate::error::{KuromojiError, KuromojiResult};

struct Key {
    bytes: Vec<u8>,
    value: u32,
}

/// Group of sibling keys sharing the same byte at the current depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Children {
    code: u8,
    start: usize,
    len: usize,
}

/// Builds a [`DoubleArray`] from a batch of keys.
///
/// Keys are arbitrary byte strings, a terminal `0x00` byte is appended to
/// each of them. Values must be in `[0, MAX_RECORD_VALUE]`.
pub struct DoubleArrayBuilder {
    bc: BaseCheck,
    keys: Vec<Key>,
}

impl Default for DoubleArrayBuilder {
    fn default() -> Self {
        DoubleArrayBuilder::new(1024)
    }
}

impl DoubleArrayBuilder {
    pub fn new(initial_size: usize) -> DoubleArrayBuilder {
        DoubleArrayBuilder {
            bc: BaseCheck::new(initial_size),
            keys: Vec::new(),
        }
    }

    /// Appends a key to the build set, order does not matter
    pub fn append<K: AsRef<[u8]>>(&mut self, key: K, value: u32) -> KuromojiResult<&mut Self> {
        if value > MAX_RECORD_VALUE {
            return Err(KuromojiError::TrieValueOutOfRange(value, MAX_RECORD_VALUE));
        }
        let mut bytes = Vec::with_capacity(key.as_ref().len() + 1);
        bytes.extend_from_slice(key.as_ref());
        bytes.push(TERM_CODE);
        self.keys.push(Key { bytes, value });
        Ok(self)
    }

    /// Builds the trie from all appended keys.
    ///
    /// Duplicate keys share a single leaf, the value of the last appended one wins.
    pub fn build(mut self) -> DoubleArray {
        // stable: duplicates stay in the insertion order
        self.keys.sort_by(|a, b| a.bytes.cmp(&b.bytes));
        if !self.keys.is_empty() {
            let len = self.keys.len();
            self.build_level(ROOT_ID, 0, 0, len);
        }
        self.bc.shrink();
        let (base, check) = self.bc.into_arrays();
        DoubleArray::from_arrays(base, check)
    }

    fn build_level(&mut self, parent: usize, position: usize, start: usize, len: usize) {
        let children = self.children_info(position, start, len);
        let base = self.find_allocatable_base(&children);
        self.set_bc(parent, &children, base);

        for child in children.iter() {
            if child.code == TERM_CODE {
                continue;
            }
            let index = base + child.code as usize;
            self.build_level(index, position + 1, child.start, child.len);
        }
    }

    fn children_info(&self, position: usize, start: usize, len: usize) -> Vec<Children> {
        let keys = &self.keys[start..start + len];
        let mut result: Vec<Children> = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            let code = key.bytes[position];
            match result.last_mut() {
                Some(last) if last.code == code => last.len += 1,
                _ => result.push(Children {
                    code,
                    start: start + i,
                    len: 1,
                }),
            }
        }
        result
    }

    /// Walks the free list for the smallest base where every child fits
    fn find_allocatable_base(&self, children: &[Children]) -> usize {
        let first_code = children[0].code as usize;
        let mut current = self.bc.first_unused_node();
        loop {
            // BASE of an inner node must stay positive, zero marks a leaf
            if current > first_code {
                let base = current - first_code;
                let fits = children
                    .iter()
                    .all(|c| self.bc.is_unused(base + c.code as usize));
                if fits {
                    return base;
                }
            }
            current = (-self.bc.check(current)) as usize;
        }
    }

    fn set_bc(&mut self, parent: usize, children: &[Children], base: usize) {
        self.bc.set_base(parent, base as i32);

        for child in children {
            let index = base + child.code as usize;

            // unlink the slot from the free list
            let prev_unused = -self.bc.base(index);
            let next_unused = -self.bc.check(index);
            if index != self.bc.first_unused_node() {
                self.bc.set_check(prev_unused as usize, -next_unused);
            } else {
                self.bc.set_first_unused_node(next_unused as usize);
            }
            self.bc.set_base(next_unused as usize, -prev_unused);

            self.bc.set_check(index, parent as i32);

            if child.code == TERM_CODE {
                let value = self.keys[child.start + child.len - 1].value as i32;
                self.bc.set_base(index, -value - 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_matches;

    #[test]
    fn children_are_grouped_by_byte() {
        let mut bldr = DoubleArrayBuilder::new(16);
        for (k, v) in [("ab", 0), ("ac", 1), ("b", 2), ("bc", 3)] {
            bldr.append(k, v).unwrap();
        }
        bldr.keys.sort_by(|a, b| a.bytes.cmp(&b.bytes));
        let root = bldr.children_info(0, 0, 4);
        assert_eq!(
            root,
            vec![
                Children {
                    code: b'a',
                    start: 0,
                    len: 2
                },
                Children {
                    code: b'b',
                    start: 2,
                    len: 2
                },
            ]
        );
        let under_b = bldr.children_info(1, 2, 2);
        assert_eq!(under_b[0].code, TERM_CODE);
        assert_eq!(under_b[1].code, b'c');
    }

    #[test]
    fn value_range_is_checked() {
        let mut bldr = DoubleArrayBuilder::new(16);
        assert!(bldr.append("ok", MAX_RECORD_VALUE).is_ok());
        let err = bldr.append("ng", MAX_RECORD_VALUE + 1).err();
        assert_matches!(err, Some(KuromojiError::TrieValueOutOfRange(_, _)));
    }

    #[test]
    fn duplicate_keys_last_writer_wins() {
        let mut bldr = DoubleArrayBuilder::new(16);
        bldr.append("key", 1).unwrap();
        bldr.append("other", 2).unwrap();
        bldr.append("key", 3).unwrap();
        let trie = bldr.build();
        assert_eq!(trie.lookup("key"), Some(3));
        assert_eq!(trie.lookup("other"), Some(2));
    }

    #[test]
    fn tiny_initial_size_grows() {
        let mut bldr = DoubleArrayBuilder::new(0);
        let words = ["すもも", "もも", "も", "の", "うち"];
        for (i, w) in words.iter().enumerate() {
            bldr.append(w, i as u32).unwrap();
        }
        let trie = bldr.build();
        for (i, w) in words.iter().enumerate() {
            assert_eq!(trie.lookup(w), Some(i as u32), "{}", w);
        }
    }
}
