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

use std::collections::HashMap;

use thiserror::Error;

use crate::error::{KuromojiError, KuromojiResult};
use crate::util::byte_buffer::ByteBuffer;

/// Name of the category every unmapped character falls into
pub const DEFAULT_CATEGORY: &str = "DEFAULT";

/// Number of code points covered by the tables (the BMP)
pub const TABLE_SIZE: usize = 0x10000;

/// Compatible categories are a 32-bit mask, so class ids must fit into it
pub const MAX_CLASSES: usize = 32;

/// Character definition error
#[derive(Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("Invalid format at line {0}")]
    InvalidFormat(usize),

    #[error("INVOKE must be 0 or 1 at line {0}, found {1}")]
    InvalidInvoke(usize, String),

    #[error("GROUP must be 0 or 1 at line {0}, found {1}")]
    InvalidGroup(usize, String),

    #[error("LENGTH must be a non-negative integer at line {0}, found {1}")]
    InvalidLength(usize, String),

    #[error("Invalid code point {1} at line {0}, it must be in 0x0000..0xFFFF")]
    InvalidCode(usize, String),

    #[error("Undefined category {1} at line {0}")]
    UndefinedCategory(usize, String),

    #[error("Multiple definition for category {1} at line {0}")]
    MultipleDefinition(usize, String),

    #[error("Category {0} exceeds the limit of {} categories", MAX_CLASSES)]
    TooManyCategories(String),
}

/// Unknown word behavior of one character category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterClass {
    pub class_id: u32,
    pub class_name: String,
    /// Unknown words are generated even if the dictionary has matches
    pub is_always_invoke: bool,
    /// Consecutive characters of this category form a single unknown word
    pub is_grouping: bool,
    pub max_length: u32,
}

impl CharacterClass {
    pub fn new<S: Into<String>>(
        class_id: u32,
        class_name: S,
        is_always_invoke: bool,
        is_grouping: bool,
        max_length: u32,
    ) -> Self {
        CharacterClass {
            class_id,
            class_name: class_name.into(),
            is_always_invoke,
            is_grouping,
            max_length,
        }
    }
}

/// Character categories indexed by class id, with a reverse lookup by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeDefinitionMap {
    classes: Vec<CharacterClass>,
    by_name: HashMap<String, u32>,
}

impl InvokeDefinitionMap {
    /// Class ids are reassigned from the position in `classes`
    pub fn new(classes: Vec<CharacterClass>) -> Self {
        let mut by_name = HashMap::with_capacity(classes.len());
        let classes: Vec<CharacterClass> = classes
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                c.class_id = i as u32;
                by_name.insert(c.class_name.clone(), c.class_id);
                c
            })
            .collect();
        InvokeDefinitionMap { classes, by_name }
    }

    /// Decodes records of `invoke: u8, group: u8, max_length: u32, name\0`
    pub fn load(data: Vec<u8>) -> Self {
        let mut buffer = ByteBuffer::from(data);
        let mut classes = Vec::new();
        while buffer.position() + 1 < buffer.size() {
            let is_always_invoke = buffer.read() != 0;
            let is_grouping = buffer.read() != 0;
            let max_length = buffer.read_int();
            let class_name = buffer.read_string();
            classes.push(CharacterClass::new(
                classes.len() as u32,
                class_name,
                is_always_invoke,
                is_grouping,
                max_length,
            ));
        }
        Self::new(classes)
    }

    pub fn to_buffer(&self) -> KuromojiResult<Vec<u8>> {
        let mut buffer = ByteBuffer::with_capacity(256);
        for c in self.classes.iter() {
            buffer.put(c.is_always_invoke as u8);
            buffer.put(c.is_grouping as u8);
            buffer.put_int(c.max_length as i64)?;
            buffer.put_string(&c.class_name)?;
        }
        buffer.shrink();
        Ok(buffer.into_bytes())
    }

    /// Class id of the named category
    pub fn lookup(&self, class_name: &str) -> Option<u32> {
        self.by_name.get(class_name).copied()
    }

    pub fn get(&self, class_id: u32) -> Option<&CharacterClass> {
        self.classes.get(class_id as usize)
    }

    pub fn classes(&self) -> &[CharacterClass] {
        &self.classes
    }
}

/// One mapping line of a character definition: a code or an inclusive range
/// of codes, its primary category and any number of compatible ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    pub start: u32,
    pub end: Option<u32>,
    pub default: String,
    pub compatible: Vec<String>,
}

/// Per code point category tables used by unknown word processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDefinition {
    category_map: Vec<u8>,
    compatible_map: Vec<u32>,
    invoke_definition_map: InvokeDefinitionMap,
}

impl CharacterDefinition {
    /// Creates empty tables for the given categories
    pub fn new(invoke_definition_map: InvokeDefinitionMap) -> Self {
        CharacterDefinition {
            category_map: vec![0; TABLE_SIZE],
            compatible_map: vec![0; TABLE_SIZE],
            invoke_definition_map,
        }
    }

    pub fn load(
        category_map: Vec<u8>,
        compatible_map: Vec<u32>,
        invoke_definition_map: InvokeDefinitionMap,
    ) -> KuromojiResult<Self> {
        if category_map.len() != TABLE_SIZE || compatible_map.len() != TABLE_SIZE {
            return Err(KuromojiError::InvalidDataFormat(format!(
                "character tables must have {} entries, found {} and {}",
                TABLE_SIZE,
                category_map.len(),
                compatible_map.len()
            )));
        }
        Ok(CharacterDefinition {
            category_map,
            compatible_map,
            invoke_definition_map,
        })
    }

    /// Fills both tables from mapping lines.
    ///
    /// A later mapping overwrites the primary category set by an earlier one,
    /// compatible categories accumulate. Code points which no mapping touched
    /// get the `DEFAULT` category.
    pub fn init_category_mappings(&mut self, mappings: &[CategoryMapping]) -> Result<(), Error> {
        let mut assigned = vec![false; TABLE_SIZE];
        for mapping in mappings {
            let end = mapping.end.unwrap_or(mapping.start);
            if mapping.start as usize >= TABLE_SIZE || end as usize >= TABLE_SIZE {
                return Err(Error::InvalidCode(0, format!("0x{:X}", end.max(mapping.start))));
            }
            let primary = self.class_id(&mapping.default)?;
            let mut mask = 0u32;
            for name in mapping.compatible.iter() {
                mask |= 1 << self.class_id(name)?;
            }

            for code in mapping.start as usize..=end as usize {
                self.category_map[code] = primary as u8;
                self.compatible_map[code] |= mask;
                assigned[code] = true;
            }
        }

        match self.invoke_definition_map.lookup(DEFAULT_CATEGORY) {
            Some(default_id) => {
                for (code, done) in assigned.iter().enumerate() {
                    if !done {
                        self.category_map[code] = default_id as u8;
                    }
                }
            }
            None => log::warn!(
                "character definition has no {} category, unmapped characters fall into class 0",
                DEFAULT_CATEGORY
            ),
        }
        Ok(())
    }

    fn class_id(&self, name: &str) -> Result<u32, Error> {
        match self.invoke_definition_map.lookup(name) {
            Some(id) if (id as usize) < MAX_CLASSES => Ok(id),
            Some(_) => Err(Error::TooManyCategories(name.to_owned())),
            None => Err(Error::UndefinedCategory(0, name.to_owned())),
        }
    }

    /// Primary category of the character.
    /// Characters outside of the BMP are always `DEFAULT`.
    pub fn lookup(&self, ch: char) -> Option<&CharacterClass> {
        let code = ch as usize;
        let class_id = if code < TABLE_SIZE {
            self.category_map[code] as u32
        } else {
            self.invoke_definition_map.lookup(DEFAULT_CATEGORY)?
        };
        self.invoke_definition_map.get(class_id)
    }

    /// Compatible categories of the character, the primary one excluded
    pub fn lookup_compatible_category(&self, ch: char) -> Vec<&CharacterClass> {
        let code = ch as usize;
        if code >= TABLE_SIZE {
            return Vec::new();
        }
        let primary = self.category_map[code] as u32;
        let mask = self.compatible_map[code];
        (0..MAX_CLASSES as u32)
            .filter(|&bit| bit != primary && mask & (1u32 << bit) != 0)
            .filter_map(|bit| self.invoke_definition_map.get(bit))
            .collect()
    }

    pub fn invoke_definition_map(&self) -> &InvokeDefinitionMap {
        &self.invoke_definition_map
    }

    pub fn category_map(&self) -> &[u8] {
        &self.category_map
    }

    pub fn compatible_map(&self) -> &[u32] {
        &self.compatible_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_matches;

    fn classes() -> InvokeDefinitionMap {
        InvokeDefinitionMap::new(vec![
            CharacterClass::new(0, "DEFAULT", false, true, 0),
            CharacterClass::new(0, "SPACE", false, true, 0),
            CharacterClass::new(0, "KANJI", false, false, 2),
            CharacterClass::new(0, "KANJINUMERIC", true, true, 0),
            CharacterClass::new(0, "HIRAGANA", false, true, 2),
        ])
    }

    fn mapping(start: u32, end: Option<u32>, default: &str, compat: &[&str]) -> CategoryMapping {
        CategoryMapping {
            start,
            end,
            default: default.to_owned(),
            compatible: compat.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn definition() -> CharacterDefinition {
        let mut def = CharacterDefinition::new(classes());
        def.init_category_mappings(&[
            mapping(0x0020, None, "SPACE", &[]),
            mapping(0x4E00, Some(0x9FFF), "KANJI", &[]),
            mapping(0x4E00, None, "KANJINUMERIC", &["KANJI"]),
            mapping(0x3041, Some(0x309F), "HIRAGANA", &[]),
        ])
        .unwrap();
        def
    }

    #[test]
    fn class_ids_follow_definition_order() {
        let map = classes();
        assert_eq!(map.lookup("DEFAULT"), Some(0));
        assert_eq!(map.lookup("HIRAGANA"), Some(4));
        assert_eq!(map.lookup("KATAKANA"), None);
        assert_eq!(map.get(2).map(|c| c.class_name.as_str()), Some("KANJI"));
    }

    #[test]
    fn invoke_definition_roundtrip() {
        let map = classes();
        let bytes = map.to_buffer().unwrap();
        let loaded = InvokeDefinitionMap::load(bytes);
        assert_eq!(loaded, map);
    }

    #[test]
    fn primary_category() {
        let def = definition();
        assert_eq!(def.lookup(' ').unwrap().class_name, "SPACE");
        assert_eq!(def.lookup('京').unwrap().class_name, "KANJI");
        assert_eq!(def.lookup('あ').unwrap().class_name, "HIRAGANA");
        // unmapped BMP code point
        assert_eq!(def.lookup('a').unwrap().class_name, "DEFAULT");
        // outside of the BMP
        assert_eq!(def.lookup('𠮷').unwrap().class_name, "DEFAULT");
    }

    #[test]
    fn later_mapping_overwrites_primary() {
        let def = definition();
        assert_eq!(def.lookup('一').unwrap().class_name, "KANJINUMERIC");
        let compat: Vec<_> = def
            .lookup_compatible_category('一')
            .iter()
            .map(|c| c.class_name.as_str())
            .collect();
        assert_eq!(compat, vec!["KANJI"]);
        assert!(def.lookup_compatible_category('京').is_empty());
        assert!(def.lookup_compatible_category('𠮷').is_empty());
    }

    #[test]
    fn primary_is_excluded_from_compatible() {
        let mut def = CharacterDefinition::new(classes());
        def.init_category_mappings(&[mapping(0x3042, None, "HIRAGANA", &["HIRAGANA", "KANJI"])])
            .unwrap();
        let compat: Vec<_> = def
            .lookup_compatible_category('あ')
            .into_iter()
            .map(|c| c.class_id)
            .collect();
        assert_eq!(compat, vec![2]);
    }

    #[test]
    fn undefined_category_is_an_error() {
        let mut def = CharacterDefinition::new(classes());
        let err = def.init_category_mappings(&[mapping(0x30A2, None, "KATAKANA", &[])]);
        assert_matches!(err, Err(Error::UndefinedCategory(_, ref name)) if name == "KATAKANA");
    }

    #[test]
    fn missing_default_leaves_class_zero() {
        let map = InvokeDefinitionMap::new(vec![
            CharacterClass::new(0, "SPACE", false, true, 0),
            CharacterClass::new(0, "KANJI", false, false, 2),
        ]);
        let mut def = CharacterDefinition::new(map);
        def.init_category_mappings(&[mapping(0x4E00, None, "KANJI", &[])])
            .unwrap();
        assert_eq!(def.lookup('a').unwrap().class_name, "SPACE");
        assert!(def.lookup('𠮷').is_none());
    }

    #[test]
    fn load_checks_table_sizes() {
        let def = definition();
        let loaded = CharacterDefinition::load(
            def.category_map().to_vec(),
            def.compatible_map().to_vec(),
            InvokeDefinitionMap::load(def.invoke_definition_map().to_buffer().unwrap()),
        )
        .unwrap();
        assert_eq!(loaded, def);
        assert!(CharacterDefinition::load(vec![0; 10], vec![0; TABLE_SIZE], classes()).is_err());
    }
}
