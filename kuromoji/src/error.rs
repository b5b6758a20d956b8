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

use std::fmt::Debug;
use thiserror::Error;

use crate::config::ConfigError;
use crate::dic::build::error::DicBuildError;
use crate::dic::character_definition::Error as CharacterDefinitionError;

pub type KuromojiResult<T> = Result<T, KuromojiError>;

/// Kuromoji error
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum KuromojiError {
    #[error("{context}: {cause}")]
    ErrWithContext {
        context: String,
        cause: Box<KuromojiError>,
    },

    #[error("{context}: {cause}")]
    Io {
        cause: std::io::Error,
        context: String,
    },

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Error from nom {0}")]
    NomParseError(String),

    #[error("Config Error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Invalid character definition: {0}")]
    InvalidCharacterDefinition(#[from] CharacterDefinitionError),

    #[error(transparent)]
    DictionaryCompilationError(#[from] DicBuildError),

    #[error("Trie record value {0} is out of range, it must be in [0, {1}]")]
    TrieValueOutOfRange(u32, u32),

    #[error("Value {value} does not fit into a {bits}-bit field")]
    FieldOverflow { value: i64, bits: u32 },

    #[error("String to be stored contains a NUL character: {0:?}")]
    NulInString(String),

    #[error("Connection ({forward}, {backward}) is out of the {forward_dim}x{backward_dim} matrix")]
    ConnectionOutOfRange {
        forward: i32,
        backward: i32,
        forward_dim: usize,
        backward_dim: usize,
    },

    #[error("Invalid data format: {0}")]
    InvalidDataFormat(String),
}

impl From<std::io::Error> for KuromojiError {
    fn from(e: std::io::Error) -> Self {
        KuromojiError::Io {
            cause: e,
            context: String::from("IO Error"),
        }
    }
}

impl KuromojiError {
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        match self {
            KuromojiError::Io { cause, .. } => KuromojiError::Io {
                cause,
                context: ctx.into(),
            },
            cause => KuromojiError::ErrWithContext {
                cause: Box::new(cause),
                context: ctx.into(),
            },
        }
    }
}

impl<I: Debug> From<nom::Err<nom::error::Error<I>>> for KuromojiError {
    fn from(err: nom::Err<nom::error::Error<I>>) -> Self {
        KuromojiError::NomParseError(format!("{:?}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_matches;

    #[test]
    fn context_wraps_non_io_errors() {
        let err = KuromojiError::InvalidDataFormat("odd length".to_owned()).with_context("tid.dat");
        assert_matches!(err, KuromojiError::ErrWithContext { .. });
        assert_eq!(format!("{}", err), "tid.dat: Invalid data format: odd length");
    }

    #[test]
    fn context_replaces_io_context() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = KuromojiError::from(io).with_context("base.dat");
        assert_matches!(err, KuromojiError::Io { ref context, .. } if context == "base.dat");
    }
}
