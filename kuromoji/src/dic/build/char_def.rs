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

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::dic::character_definition::{
    CategoryMapping, CharacterClass, CharacterDefinition, Error, InvokeDefinitionMap, MAX_CLASSES,
    TABLE_SIZE,
};
use crate::error::KuromojiResult;

lazy_static! {
    static ref CATEGORY_DEF: Regex = Regex::new(r"^([A-Za-z_]\w*)\s+(\S+)\s+(\S+)\s+(\S+)").unwrap();
    static ref CATEGORY_MAPPING: Regex = Regex::new(r"^(0x[0-9A-Fa-f]+)\s+(\S.*)$").unwrap();
    static ref RANGE_CATEGORY_MAPPING: Regex =
        Regex::new(r"^(0x[0-9A-Fa-f]+)\.\.(0x[0-9A-Fa-f]+)\s+(\S.*)$").unwrap();
}

/// Builds a [`CharacterDefinition`] from `char.def` lines.
///
/// Three kinds of lines are accepted, `#` starts a comment:
///
/// ```text
/// KANJI  0 0 2                   # NAME INVOKE GROUP LENGTH
/// 0x3007 KANJI KANJINUMERIC      # code, primary and compatible categories
/// 0x4E00..0x9FFF KANJI           # inclusive range
/// ```
#[derive(Default)]
pub struct CharDefBuilder {
    classes: Vec<CharacterClass>,
    mappings: Vec<(usize, CategoryMapping)>,
    line: usize,
}

impl CharDefBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_file(&mut self, path: &Path) -> KuromojiResult<()> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    pub fn read<R: BufRead>(&mut self, reader: R) -> KuromojiResult<()> {
        for line in reader.lines() {
            let line = line?;
            self.put_line(&line)?;
        }
        Ok(())
    }

    /// Consumes a single line
    pub fn put_line(&mut self, line: &str) -> Result<(), Error> {
        self.line += 1;
        let content = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        }
        .trim();
        if content.is_empty() {
            return Ok(());
        }

        if let Some(caps) = RANGE_CATEGORY_MAPPING.captures(content) {
            let start = self.parse_code(&caps[1])?;
            let end = self.parse_code(&caps[2])?;
            if end < start {
                return Err(Error::InvalidFormat(self.line));
            }
            let mapping = self.parse_categories(start, Some(end), &caps[3]);
            self.mappings.push((self.line, mapping));
        } else if let Some(caps) = CATEGORY_MAPPING.captures(content) {
            let start = self.parse_code(&caps[1])?;
            let mapping = self.parse_categories(start, None, &caps[2]);
            self.mappings.push((self.line, mapping));
        } else if content.starts_with("0x") {
            return Err(Error::InvalidFormat(self.line));
        } else if let Some(caps) = CATEGORY_DEF.captures(content) {
            let class = self.parse_class(&caps)?;
            self.classes.push(class);
        } else {
            return Err(Error::InvalidFormat(self.line));
        }
        Ok(())
    }

    fn parse_code(&self, text: &str) -> Result<u32, Error> {
        match u32::from_str_radix(&text[2..], 16) {
            Ok(code) if (code as usize) < TABLE_SIZE => Ok(code),
            _ => Err(Error::InvalidCode(self.line, text.to_owned())),
        }
    }

    fn parse_categories(&self, start: u32, end: Option<u32>, names: &str) -> CategoryMapping {
        let mut names = names.split_whitespace().map(|s| s.to_owned());
        // the regex guarantees at least one name
        let default = names.next().unwrap_or_default();
        CategoryMapping {
            start,
            end,
            default,
            compatible: names.collect(),
        }
    }

    fn parse_class(&self, caps: &regex::Captures) -> Result<CharacterClass, Error> {
        let name = &caps[1];
        let is_always_invoke = match &caps[2] {
            "0" => false,
            "1" => true,
            v => return Err(Error::InvalidInvoke(self.line, v.to_owned())),
        };
        let is_grouping = match &caps[3] {
            "0" => false,
            "1" => true,
            v => return Err(Error::InvalidGroup(self.line, v.to_owned())),
        };
        let max_length: u32 = caps[4]
            .parse()
            .map_err(|_| Error::InvalidLength(self.line, caps[4].to_owned()))?;

        if self.classes.iter().any(|c| c.class_name == name) {
            return Err(Error::MultipleDefinition(self.line, name.to_owned()));
        }
        if self.classes.len() >= MAX_CLASSES {
            return Err(Error::TooManyCategories(name.to_owned()));
        }
        Ok(CharacterClass::new(
            self.classes.len() as u32,
            name,
            is_always_invoke,
            is_grouping,
            max_length,
        ))
    }

    pub fn build(self) -> KuromojiResult<CharacterDefinition> {
        let invoke = InvokeDefinitionMap::new(self.classes);
        for (line, m) in self.mappings.iter() {
            let names = std::iter::once(&m.default).chain(m.compatible.iter());
            for name in names {
                if invoke.lookup(name).is_none() {
                    return Err(Error::UndefinedCategory(*line, name.clone()).into());
                }
            }
        }
        let mappings: Vec<CategoryMapping> = self.mappings.into_iter().map(|(_, m)| m).collect();
        let mut definition = CharacterDefinition::new(invoke);
        definition.init_category_mappings(&mappings)?;
        Ok(definition)
    }
}
