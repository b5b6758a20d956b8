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

#![allow(dead_code)]

use std::path::PathBuf;

extern crate kuromoji;
use kuromoji::config::Config;
use kuromoji::prelude::*;

pub fn resource_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
}

lazy_static! {
    pub static ref TEST_CONFIG: Config = {
        let test_config_path = resource_dir().join("kuromoji.json");
        Config::new(Some(test_config_path), Some(resource_dir()), None)
            .expect("Failed to read config file for test")
    };
    pub static ref DICTIONARY: Dictionary =
        Dictionary::from_cfg(&TEST_CONFIG).expect("Failed to build dictionary for tests");
    pub static ref TOKENIZER: Tokenizer<&'static Dictionary> = Tokenizer::new(&*DICTIONARY);
}

/// `(surface, position, type)` of every token
pub fn analyze(input: &str) -> Vec<(String, usize, NodeType)> {
    TOKENIZER
        .tokenize(input)
        .expect("Failed to tokenize")
        .into_iter()
        .map(|t| (t.surface_form, t.word_position, t.word_type))
        .collect()
}

pub fn expected(tokens: &[(&str, usize, NodeType)]) -> Vec<(String, usize, NodeType)> {
    tokens
        .iter()
        .map(|&(s, p, t)| (s.to_owned(), p, t))
        .collect()
}
