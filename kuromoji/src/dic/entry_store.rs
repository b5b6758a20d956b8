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

//! Fixed-layout dictionary entries with their feature strings

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::dic::build::error::{BuildFailure, DicBuildError};
use crate::error::KuromojiResult;
use crate::util::byte_buffer::ByteBuffer;

/// Size of one entry record: left id, right id, cost (i16 each) and feature offset (i32)
pub const ENTRY_SIZE: usize = 10;

const FEATURE_OFFSET: usize = 6;

/// Id space which keys the target map of an [`EntryStore`]
pub trait IdSpace {
    /// What a key of this space identifies, used in messages
    const KEY_NAME: &'static str;
}

/// Keys are trie record ids of surface forms
pub enum TrieId {}

impl IdSpace for TrieId {
    const KEY_NAME: &'static str = "surface";
}

/// Keys are character class ids
pub enum CategoryId {}

impl IdSpace for CategoryId {
    const KEY_NAME: &'static str = "category";
}

/// Entries of known words, keyed by the trie id of their surface
pub type TokenInfoDictionary = EntryStore<TrieId>;
/// Entries of unknown word templates, keyed by character class id
pub type UnknownDictionary = EntryStore<CategoryId>;

/// Dictionary entries stored as 10-byte records plus a side buffer of
/// `surface,features` strings. An entry id is the byte offset of its record.
pub struct EntryStore<K> {
    entries: ByteBuffer,
    features: ByteBuffer,
    target_map: BTreeMap<u32, Vec<u32>>,
    _space: PhantomData<K>,
}

impl<K: IdSpace> Default for EntryStore<K> {
    fn default() -> Self {
        EntryStore::new()
    }
}

fn parse_field<T: FromStr, S: AsRef<str>>(
    fields: &[S],
    index: usize,
    name: &'static str,
    row: usize,
) -> KuromojiResult<T> {
    let raw = fields[index].as_ref();
    raw.trim().parse().map_err(|_| {
        DicBuildError {
            file: "<entries>".to_owned(),
            line: row,
            cause: BuildFailure::InvalidNumber {
                field: name,
                value: raw.to_owned(),
            },
        }
        .into()
    })
}

impl<K: IdSpace> EntryStore<K> {
    pub fn new() -> Self {
        EntryStore {
            entries: ByteBuffer::default(),
            features: ByteBuffer::default(),
            target_map: BTreeMap::new(),
            _space: PhantomData,
        }
    }

    /// Restores a store from its persisted parts
    pub fn load(entries: Vec<u8>, features: Vec<u8>, target_map: Vec<u8>) -> Self {
        let mut store = EntryStore {
            entries: ByteBuffer::from(entries),
            features: ByteBuffer::from(features),
            target_map: BTreeMap::new(),
            _space: PhantomData,
        };
        store.load_target_map(target_map);
        store
    }

    /// Appends raw rows `surface,left,right,cost,features...`.
    ///
    /// Rows with fewer than 4 fields are skipped. Returns the entry id and
    /// the surface (or category name) of every stored row.
    pub fn build_dictionary<R, S>(&mut self, rows: &[R]) -> KuromojiResult<Vec<(u32, String)>>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut stored = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let fields = row.as_ref();
            if fields.len() < 4 {
                continue;
            }
            let line = i + 1;
            let left: i16 = parse_field(fields, 1, "left_id", line)?;
            let right: i16 = parse_field(fields, 2, "right_id", line)?;
            let cost: i16 = parse_field(fields, 3, "cost", line)?;

            let surface = fields[0].as_ref();
            let feature = fields[4..]
                .iter()
                .map(|f| f.as_ref())
                .collect::<Vec<_>>()
                .join(",");
            let id = self.put(left, right, cost, surface, &feature)?;
            stored.push((id, surface.to_owned()));
        }

        self.entries.shrink();
        self.features.shrink();
        Ok(stored)
    }

    /// Writes one entry record and returns its id
    pub fn put(
        &mut self,
        left_id: i16,
        right_id: i16,
        cost: i16,
        surface: &str,
        feature: &str,
    ) -> KuromojiResult<u32> {
        let id = self.entries.position() as u32;
        let feature_offset = self.features.position();

        self.entries.put_short(left_id as i32)?;
        self.entries.put_short(right_id as i32)?;
        self.entries.put_short(cost as i32)?;
        self.entries.put_int(feature_offset as i64)?;

        let mut line = String::with_capacity(surface.len() + feature.len() + 1);
        line.push_str(surface);
        line.push(',');
        line.push_str(feature);
        self.features.put_string(&line)?;
        Ok(id)
    }

    /// Registers `entry` under `key`, keeping the insertion order
    pub fn add_mapping(&mut self, key: u32, entry: u32) {
        self.target_map.entry(key).or_default().push(entry);
    }

    /// Entry ids registered under `key`, empty when there are none
    pub fn targets(&self, key: u32) -> &[u32] {
        match self.target_map.get(&key) {
            Some(v) => v,
            None => &[],
        }
    }

    pub fn target_map(&self) -> &BTreeMap<u32, Vec<u32>> {
        &self.target_map
    }

    #[inline]
    pub fn left_id(&self, entry: u32) -> i16 {
        self.entries.get_short(entry as usize)
    }

    #[inline]
    pub fn right_id(&self, entry: u32) -> i16 {
        self.entries.get_short(entry as usize + 2)
    }

    #[inline]
    pub fn word_cost(&self, entry: u32) -> i16 {
        self.entries.get_short(entry as usize + 4)
    }

    /// Comma-joined `surface,features` line of the entry
    pub fn get_features(&self, entry: u32) -> String {
        let offset = self.entries.get_int(entry as usize + FEATURE_OFFSET);
        self.features.get_string(offset as usize)
    }

    pub fn entries_buffer(&self) -> &[u8] {
        self.entries.as_bytes()
    }

    pub fn features_buffer(&self) -> &[u8] {
        self.features.as_bytes()
    }

    /// Serializes the target map as
    /// `count, (key, value count, values...)*` of 32-bit integers
    pub fn target_map_to_buffer(&self) -> KuromojiResult<Vec<u8>> {
        let mut buffer = ByteBuffer::with_capacity(1024);
        buffer.put_int(self.target_map.len() as i64)?;
        for (key, values) in self.target_map.iter() {
            buffer.put_int(*key as i64)?;
            buffer.put_int(values.len() as i64)?;
            for v in values {
                buffer.put_int(*v as i64)?;
            }
        }
        buffer.shrink();
        Ok(buffer.into_bytes())
    }

    /// Replaces the target map with the serialized one.
    /// Reading stops when the buffer is exhausted, the leading count is not trusted.
    pub fn load_target_map(&mut self, data: Vec<u8>) {
        let mut buffer = ByteBuffer::from(data);
        self.target_map.clear();
        let _count = buffer.read_int();
        while buffer.position() + 1 <= buffer.size() {
            let key = buffer.read_int();
            let num_values = buffer.read_int();
            for _ in 0..num_values {
                if buffer.position() >= buffer.size() {
                    break;
                }
                let value = buffer.read_int();
                self.add_mapping(key, value);
            }
        }
        log::debug!(
            "loaded {} {} keys into the target map",
            self.target_map.len(),
            K::KEY_NAME
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KuromojiError;
    use claim::assert_matches;

    fn rows() -> Vec<Vec<&'static str>> {
        vec![
            vec!["東京", "1", "2", "3000", "名詞", "固有名詞", "地域"],
            vec!["broken", "1"],
            vec!["京都", "3", "4", "-50", "名詞"],
            vec!["都", "5", "6", "700"],
        ]
    }

    #[test]
    fn build_skips_short_rows() {
        let mut store = TokenInfoDictionary::new();
        let stored = store.build_dictionary(&rows()).unwrap();
        assert_eq!(
            stored,
            vec![
                (0, "東京".to_owned()),
                (10, "京都".to_owned()),
                (20, "都".to_owned())
            ]
        );
        assert_eq!(store.entries_buffer().len(), 3 * ENTRY_SIZE);
    }

    #[test]
    fn records_and_features() {
        let mut store = TokenInfoDictionary::new();
        store.build_dictionary(&rows()).unwrap();
        assert_eq!(store.left_id(10), 3);
        assert_eq!(store.right_id(10), 4);
        assert_eq!(store.word_cost(10), -50);
        assert_eq!(store.get_features(0), "東京,名詞,固有名詞,地域");
        assert_eq!(store.get_features(10), "京都,名詞");
        assert_eq!(store.get_features(20), "都,");
    }

    #[test]
    fn bad_number_is_an_error() {
        let mut store = UnknownDictionary::new();
        let err = store
            .build_dictionary(&[vec!["KANJI", "1", "x", "100"]])
            .err();
        assert_matches!(err, Some(KuromojiError::DictionaryCompilationError(_)));
    }

    #[test]
    fn target_map_keeps_insertion_order() {
        let mut store = UnknownDictionary::new();
        store.add_mapping(7, 20);
        store.add_mapping(7, 0);
        store.add_mapping(2, 10);
        assert_eq!(store.targets(7), &[20, 0]);
        assert_eq!(store.targets(2), &[10]);
        assert!(store.targets(3).is_empty());
    }

    #[test]
    fn target_map_serialization() {
        let mut store = TokenInfoDictionary::new();
        store.add_mapping(5, 10);
        store.add_mapping(1, 0);
        store.add_mapping(5, 20);
        let bytes = store.target_map_to_buffer().unwrap();
        // count + (key, len, 1 value) + (key, len, 2 values)
        assert_eq!(bytes.len(), 4 * (1 + 3 + 4));
        assert_eq!(&bytes[0..4], &2u32.to_le_bytes());

        let mut other = TokenInfoDictionary::new();
        other.load_target_map(bytes);
        assert_eq!(other.target_map(), store.target_map());
    }

    #[test]
    fn load_restores_everything() {
        let mut store = TokenInfoDictionary::new();
        let stored = store.build_dictionary(&rows()).unwrap();
        for (id, _) in stored.iter() {
            store.add_mapping(*id / 10, *id);
        }
        let loaded = TokenInfoDictionary::load(
            store.entries_buffer().to_vec(),
            store.features_buffer().to_vec(),
            store.target_map_to_buffer().unwrap(),
        );
        assert_eq!(loaded.get_features(20), "都,");
        assert_eq!(loaded.word_cost(0), 3000);
        assert_eq!(loaded.targets(1), &[10]);
        assert_eq!(loaded.target_map().len(), 3);
    }
}
