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

//! Dictionary-driven Japanese morphological analyzer
//!
//! Text is expanded into a lattice of known words, found with a double-array
//! trie, and unknown word candidates driven by character categories. The
//! minimum cost path through the lattice is found with the Viterbi algorithm.
//!
//! The main entry point of the library is the
//! [`Tokenizer`](analysis/tokenizer/struct.Tokenizer.html) struct, which
//! implements [`Tokenize`](analysis/trait.Tokenize.html).

pub mod analysis;
pub mod config;
pub mod dic;
pub mod error;
pub mod sentence_splitter;
pub mod util;

pub mod prelude {
    pub use crate::{
        analysis::node::NodeType,
        analysis::token::{IpadicFormatter, Token, TokenFormatter},
        analysis::tokenizer::Tokenizer,
        analysis::Tokenize,
        config::Config,
        dic::build::DictionaryBuilder,
        dic::{Dictionary, DictionaryAccess},
        error::KuromojiError,
        error::KuromojiResult,
    };
}
