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

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_RESOURCE_DIR: &str = "resources";
const DEFAULT_SETTING_FILE: &str = "kuromoji.json";
const DEFAULT_MATRIX_DEF_FILE: &str = "matrix.def";
const DEFAULT_CHAR_DEF_FILE: &str = "char.def";
const DEFAULT_UNK_DEF_FILE: &str = "unk.def";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Argument {0} is missing")]
    MissingArgument(String),
}

/// Setting data loaded from config file
#[derive(Debug, Default, Clone)]
pub struct Config {
    pub resource_dir: PathBuf,
    /// Directory of a compiled dictionary
    pub dictionary_path: Option<PathBuf>,
    pub lexicon_files: Vec<PathBuf>,
    pub matrix_definition_file: PathBuf,
    pub character_definition_file: PathBuf,
    pub unknown_definition_file: PathBuf,
}

/// Struct corresponds with raw config json file.
/// You must use filed names defined here as json object key.
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Default)]
pub struct RawConfig {
    resourcePath: Option<PathBuf>,
    dictionaryPath: Option<PathBuf>,
    lexiconFiles: Option<Vec<PathBuf>>,
    matrixDefinitionFile: Option<PathBuf>,
    characterDefinitionFile: Option<PathBuf>,
    unknownDefinitionFile: Option<PathBuf>,
}

impl Config {
    pub fn new(
        config_file: Option<PathBuf>,
        resource_dir: Option<PathBuf>,
        dictionary_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let src_root_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let default_resource_dir_path = src_root_path.join("..").join(DEFAULT_RESOURCE_DIR);

        // prioritize arg (cli option) > default
        let config_file = match config_file {
            Some(v) => v,
            None => default_resource_dir_path.join(DEFAULT_SETTING_FILE),
        };
        if !config_file.exists() {
            return Err(ConfigError::FileNotFound(
                config_file.to_string_lossy().into_owned(),
            ));
        }
        let file = File::open(&config_file)?;
        let reader = BufReader::new(file);
        let raw_config: RawConfig = serde_json::from_reader(reader)?;

        Ok(Self::from_raw(
            raw_config,
            resource_dir,
            dictionary_path,
            default_resource_dir_path,
        ))
    }

    fn from_raw(
        raw_config: RawConfig,
        resource_dir: Option<PathBuf>,
        dictionary_path: Option<PathBuf>,
        default_resource_dir: PathBuf,
    ) -> Config {
        // prioritize arg (cli option) > config file > default
        let resource_dir = resource_dir
            .or(raw_config.resourcePath)
            .unwrap_or(default_resource_dir);

        // prioritize arg (cli option) > config file
        let dictionary_path = dictionary_path.or_else(|| {
            raw_config
                .dictionaryPath
                .map(|p| Config::join_if_relative(&resource_dir, p))
        });
        let lexicon_files = raw_config
            .lexiconFiles
            .unwrap_or_default()
            .into_iter()
            .map(|p| Config::join_if_relative(&resource_dir, p))
            .collect();
        let or_default = |value: Option<PathBuf>, default: &str| {
            Config::join_if_relative(&resource_dir, value.unwrap_or_else(|| PathBuf::from(default)))
        };
        let matrix_definition_file =
            or_default(raw_config.matrixDefinitionFile, DEFAULT_MATRIX_DEF_FILE);
        let character_definition_file =
            or_default(raw_config.characterDefinitionFile, DEFAULT_CHAR_DEF_FILE);
        let unknown_definition_file =
            or_default(raw_config.unknownDefinitionFile, DEFAULT_UNK_DEF_FILE);

        Config {
            resource_dir,
            dictionary_path,
            lexicon_files,
            matrix_definition_file,
            character_definition_file,
            unknown_definition_file,
        }
    }

    /// Resolves given path to a path relative to resource_dir if its relative
    pub fn complete_path(&self, file_path: PathBuf) -> PathBuf {
        Config::join_if_relative(&self.resource_dir, file_path)
    }

    fn join_if_relative(resource_dir: &Path, file_path: PathBuf) -> PathBuf {
        if file_path.is_absolute() {
            file_path
        } else {
            resource_dir.join(&file_path)
        }
    }
}
