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

use std::ops::Deref;
use std::path::Path;

use crate::config::{Config, ConfigError};
use crate::dic::build::DictionaryBuilder;
use crate::dic::character_definition::{CharacterDefinition, InvokeDefinitionMap};
use crate::dic::connect::ConnectionCosts;
use crate::dic::entry_store::{TokenInfoDictionary, UnknownDictionary};
use crate::dic::storage::DictionaryBuffers;
use crate::dic::trie::DoubleArray;
use crate::error::KuromojiResult;

pub mod build;
pub mod character_definition;
pub mod connect;
pub mod entry_store;
pub mod read;
pub mod storage;
pub mod trie;

/// Read access to the parts of a dictionary.
///
/// Implemented for [`Dictionary`] and for every pointer to it,
/// so a tokenizer can own it, borrow it or share it with `Arc`.
pub trait DictionaryAccess {
    fn trie(&self) -> &DoubleArray;
    fn token_info(&self) -> &TokenInfoDictionary;
    fn connection_costs(&self) -> &ConnectionCosts;
    fn unknown(&self) -> &UnknownDictionary;
    fn character_definition(&self) -> &CharacterDefinition;
}

impl<T> DictionaryAccess for T
where
    T: Deref,
    <T as Deref>::Target: DictionaryAccess,
{
    fn trie(&self) -> &DoubleArray {
        <T as Deref>::deref(self).trie()
    }

    fn token_info(&self) -> &TokenInfoDictionary {
        <T as Deref>::deref(self).token_info()
    }

    fn connection_costs(&self) -> &ConnectionCosts {
        <T as Deref>::deref(self).connection_costs()
    }

    fn unknown(&self) -> &UnknownDictionary {
        <T as Deref>::deref(self).unknown()
    }

    fn character_definition(&self) -> &CharacterDefinition {
        <T as Deref>::deref(self).character_definition()
    }
}

/// A complete dictionary: surface trie, known and unknown word entries,
/// connection costs and character categories
pub struct Dictionary {
    trie: DoubleArray,
    token_info: TokenInfoDictionary,
    connection_costs: ConnectionCosts,
    unknown: UnknownDictionary,
    character_definition: CharacterDefinition,
}

impl Dictionary {
    pub fn new(
        trie: DoubleArray,
        token_info: TokenInfoDictionary,
        connection_costs: ConnectionCosts,
        unknown: UnknownDictionary,
        character_definition: CharacterDefinition,
    ) -> Dictionary {
        Dictionary {
            trie,
            token_info,
            connection_costs,
            unknown,
            character_definition,
        }
    }

    /// Creates a dictionary from its decoded parts
    pub fn from_buffers(buffers: DictionaryBuffers) -> KuromojiResult<Dictionary> {
        let trie = DoubleArray::load(buffers.base, buffers.check)?;
        let token_info = TokenInfoDictionary::load(
            buffers.token_info,
            buffers.token_info_pos,
            buffers.token_info_map,
        );
        let connection_costs = ConnectionCosts::load(buffers.connection_costs)?;
        let unknown =
            UnknownDictionary::load(buffers.unknown, buffers.unknown_pos, buffers.unknown_map);
        let invoke = InvokeDefinitionMap::load(buffers.unknown_invoke);
        let character_definition =
            CharacterDefinition::load(buffers.unknown_char, buffers.unknown_compat, invoke)?;
        Ok(Dictionary::new(
            trie,
            token_info,
            connection_costs,
            unknown,
            character_definition,
        ))
    }

    pub fn to_buffers(&self) -> KuromojiResult<DictionaryBuffers> {
        DictionaryBuffers::from_dictionary(self)
    }

    /// Loads a compiled dictionary directory
    pub fn read_dir(dir: &Path) -> KuromojiResult<Dictionary> {
        let buffers = DictionaryBuffers::read_dir(dir)?;
        Self::from_buffers(buffers)
    }

    /// Writes the dictionary as a compiled directory, returns the number of bytes written
    pub fn write_dir(&self, dir: &Path) -> KuromojiResult<usize> {
        self.to_buffers()?.write_dir(dir)
    }

    /// Loads the compiled dictionary when the config names one,
    /// otherwise builds it from the configured source files
    pub fn from_cfg(cfg: &Config) -> KuromojiResult<Dictionary> {
        if let Some(path) = cfg.dictionary_path.as_ref() {
            log::debug!("loading compiled dictionary from {}", path.display());
            return Self::read_dir(path);
        }
        if cfg.lexicon_files.is_empty() {
            return Err(
                ConfigError::MissingArgument("dictionaryPath or lexiconFiles".to_owned()).into(),
            );
        }

        let mut builder = DictionaryBuilder::new();
        for lexicon in cfg.lexicon_files.iter() {
            builder.read_lexicon(lexicon.as_path())?;
        }
        builder.read_conn(cfg.matrix_definition_file.as_path())?;
        builder.read_char_def(cfg.character_definition_file.as_path())?;
        builder.read_unk_def(cfg.unknown_definition_file.as_path())?;
        builder.build()
    }
}

impl DictionaryAccess for Dictionary {
    fn trie(&self) -> &DoubleArray {
        &self.trie
    }

    fn token_info(&self) -> &TokenInfoDictionary {
        &self.token_info
    }

    fn connection_costs(&self) -> &ConnectionCosts {
        &self.connection_costs
    }

    fn unknown(&self) -> &UnknownDictionary {
        &self.unknown
    }

    fn character_definition(&self) -> &CharacterDefinition {
        &self.character_definition
    }
}
