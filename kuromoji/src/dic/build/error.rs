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

use thiserror::Error;

use crate::error::{KuromojiError, KuromojiResult};

/// Dictionary build error with the source position it happened at
#[derive(Error, Debug)]
#[error("{file}:{line}\t{cause}")]
pub struct DicBuildError {
    pub file: String,
    pub line: usize,
    pub cause: BuildFailure,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BuildFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    CsvError(csv::Error),

    #[error("Field {0} did not exist")]
    NoRawField(&'static str),

    #[error("Invalid number in field {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid {0} size of the connection matrix: {1}")]
    InvalidConnSize(&'static str, i64),

    #[error("Connection ({0}, {1}) is out of the {2}x{3} matrix")]
    ConnIdOutOfRange(i64, i64, i16, i16),

    #[error("Connection matrix has no dimension header")]
    MissingConnHeader,

    #[error("Category {0} is not defined in the character definition")]
    UnknownCategory(String),

    #[error("Surface {0} was not found in the built trie")]
    SurfaceNotFound(String),

    #[error("Source {0} was not provided")]
    MissingSource(&'static str),
}

pub type BuildResult<T> = std::result::Result<T, BuildFailure>;

/// Current file and line of a dictionary build, attached to build errors
#[derive(Default)]
pub struct DicCompilationCtx {
    name: String,
    line: usize,
}

impl DicCompilationCtx {
    pub fn memory() -> Self {
        DicCompilationCtx {
            name: "<memory>".to_owned(),
            line: 0,
        }
    }

    pub fn err<T, E: Into<BuildFailure>>(&self, reason: E) -> KuromojiResult<T> {
        Err(self.to_kuromoji_err(reason))
    }

    pub fn to_kuromoji_err<E: Into<BuildFailure>>(&self, reason: E) -> KuromojiError {
        match reason.into() {
            BuildFailure::Io(e) => e.into(),
            reason => DicBuildError {
                file: self.name.clone(),
                line: self.line,
                cause: reason,
            }
            .into(),
        }
    }

    #[inline]
    pub fn transform<T>(&self, result: BuildResult<T>) -> KuromojiResult<T> {
        match result {
            Ok(v) => Ok(v),
            Err(e) => self.err(e),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn set_filename(&mut self, new_name: String) -> String {
        std::mem::replace(&mut self.name, new_name)
    }

    pub fn set_line(&mut self, line: usize) -> usize {
        std::mem::replace(&mut self.line, line)
    }

    pub fn add_line(&mut self, delta: usize) {
        self.line += delta;
    }
}
