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

use crate::error::KuromojiResult;

pub mod builder;
pub mod lattice;
pub mod node;
pub mod searcher;
pub mod token;
pub mod tokenizer;

use token::Token;

/// Able to tokenize Japanese text
pub trait Tokenize {
    /// Break text into `Token`s
    fn tokenize(&self, input: &str) -> KuromojiResult<Vec<Token>>;
}
