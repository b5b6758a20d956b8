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
use std::io::Write;
use std::path::Path;

use memmap2::Mmap;

use crate::dic::build::report::{ReportBuilder, Reporter};
use crate::dic::read::{i16_array, i16_bytes, i32_array, i32_bytes, u32_array, u32_bytes};
use crate::dic::{Dictionary, DictionaryAccess};
use crate::error::{KuromojiError, KuromojiResult};

pub const BASE_FILE: &str = "base.dat";
pub const CHECK_FILE: &str = "check.dat";
pub const TOKEN_INFO_FILE: &str = "tid.dat";
pub const TOKEN_INFO_POS_FILE: &str = "tid_pos.dat";
pub const TOKEN_INFO_MAP_FILE: &str = "tid_map.dat";
pub const CONNECTION_COSTS_FILE: &str = "cc.dat";
pub const UNKNOWN_FILE: &str = "unk.dat";
pub const UNKNOWN_POS_FILE: &str = "unk_pos.dat";
pub const UNKNOWN_MAP_FILE: &str = "unk_map.dat";
pub const UNKNOWN_CHAR_FILE: &str = "unk_char.dat";
pub const UNKNOWN_COMPAT_FILE: &str = "unk_compat.dat";
pub const UNKNOWN_INVOKE_FILE: &str = "unk_invoke.dat";

/// Contents of a dictionary file
pub enum Storage {
    File(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for Storage {
    fn as_ref(&self) -> &[u8] {
        match self {
            Storage::File(m) => &m[..],
            Storage::Owned(v) => v,
        }
    }
}

fn map_file(path: &Path) -> KuromojiResult<Storage> {
    let file = File::open(path)?;
    // empty files can not be mapped
    if file.metadata()?.len() == 0 {
        return Ok(Storage::Owned(Vec::new()));
    }
    let mapping = unsafe { Mmap::map(&file) }?;
    Ok(Storage::File(mapping))
}

/// Maps a part which is decoded straight from the mapping
fn map_part(dir: &Path, name: &str) -> KuromojiResult<Storage> {
    let path = dir.join(name);
    let storage = map_file(&path).map_err(|e| e.with_context(path.to_string_lossy()))?;
    log::debug!("mapped {}: {} bytes", name, storage.as_ref().len());
    Ok(storage)
}

/// Reads a part which the dictionary keeps as an owned byte buffer
fn read_part(dir: &Path, name: &str) -> KuromojiResult<Vec<u8>> {
    let path = dir.join(name);
    let data = std::fs::read(&path)
        .map_err(|e| KuromojiError::from(e).with_context(path.to_string_lossy()))?;
    log::debug!("read {}: {} bytes", name, data.len());
    Ok(data)
}

/// Every array of a dictionary in its persisted form,
/// one field per dictionary file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DictionaryBuffers {
    pub base: Vec<i32>,
    pub check: Vec<i32>,
    pub token_info: Vec<u8>,
    pub token_info_pos: Vec<u8>,
    pub token_info_map: Vec<u8>,
    pub connection_costs: Vec<i16>,
    pub unknown: Vec<u8>,
    pub unknown_pos: Vec<u8>,
    pub unknown_map: Vec<u8>,
    pub unknown_char: Vec<u8>,
    pub unknown_compat: Vec<u32>,
    pub unknown_invoke: Vec<u8>,
}

impl DictionaryBuffers {
    pub fn from_dictionary(dic: &Dictionary) -> KuromojiResult<DictionaryBuffers> {
        let chardef = dic.character_definition();
        Ok(DictionaryBuffers {
            base: dic.trie().base_buffer().to_vec(),
            check: dic.trie().check_buffer().to_vec(),
            token_info: dic.token_info().entries_buffer().to_vec(),
            token_info_pos: dic.token_info().features_buffer().to_vec(),
            token_info_map: dic.token_info().target_map_to_buffer()?,
            connection_costs: dic.connection_costs().buffer().to_vec(),
            unknown: dic.unknown().entries_buffer().to_vec(),
            unknown_pos: dic.unknown().features_buffer().to_vec(),
            unknown_map: dic.unknown().target_map_to_buffer()?,
            unknown_char: chardef.category_map().to_vec(),
            unknown_compat: chardef.compatible_map().to_vec(),
            unknown_invoke: chardef.invoke_definition_map().to_buffer()?,
        })
    }

    /// Reads all dictionary files from the directory
    pub fn read_dir(dir: &Path) -> KuromojiResult<DictionaryBuffers> {
        let bytes = |name: &str| read_part(dir, name);
        let typed = |name: &str| map_part(dir, name);
        let with_name = |name: &'static str| move |e: KuromojiError| e.with_context(name);

        Ok(DictionaryBuffers {
            base: i32_array(typed(BASE_FILE)?.as_ref()).map_err(with_name(BASE_FILE))?,
            check: i32_array(typed(CHECK_FILE)?.as_ref()).map_err(with_name(CHECK_FILE))?,
            token_info: bytes(TOKEN_INFO_FILE)?,
            token_info_pos: bytes(TOKEN_INFO_POS_FILE)?,
            token_info_map: bytes(TOKEN_INFO_MAP_FILE)?,
            connection_costs: i16_array(typed(CONNECTION_COSTS_FILE)?.as_ref())
                .map_err(with_name(CONNECTION_COSTS_FILE))?,
            unknown: bytes(UNKNOWN_FILE)?,
            unknown_pos: bytes(UNKNOWN_POS_FILE)?,
            unknown_map: bytes(UNKNOWN_MAP_FILE)?,
            unknown_char: bytes(UNKNOWN_CHAR_FILE)?,
            unknown_compat: u32_array(typed(UNKNOWN_COMPAT_FILE)?.as_ref())
                .map_err(with_name(UNKNOWN_COMPAT_FILE))?,
            unknown_invoke: bytes(UNKNOWN_INVOKE_FILE)?,
        })
    }

    /// Writes all dictionary files into the directory, creating it if needed.
    /// Returns the total number of bytes written.
    pub fn write_dir(&self, dir: &Path) -> KuromojiResult<usize> {
        let mut reporter = Reporter::new();
        self.write_dir_with(dir, &mut reporter)
    }

    pub(crate) fn write_dir_with(&self, dir: &Path, reporter: &mut Reporter) -> KuromojiResult<usize> {
        std::fs::create_dir_all(dir)?;
        let parts: [(&str, Vec<u8>); 12] = [
            (BASE_FILE, i32_bytes(&self.base)),
            (CHECK_FILE, i32_bytes(&self.check)),
            (TOKEN_INFO_FILE, self.token_info.clone()),
            (TOKEN_INFO_POS_FILE, self.token_info_pos.clone()),
            (TOKEN_INFO_MAP_FILE, self.token_info_map.clone()),
            (CONNECTION_COSTS_FILE, i16_bytes(&self.connection_costs)),
            (UNKNOWN_FILE, self.unknown.clone()),
            (UNKNOWN_POS_FILE, self.unknown_pos.clone()),
            (UNKNOWN_MAP_FILE, self.unknown_map.clone()),
            (UNKNOWN_CHAR_FILE, self.unknown_char.clone()),
            (UNKNOWN_COMPAT_FILE, u32_bytes(&self.unknown_compat)),
            (UNKNOWN_INVOKE_FILE, self.unknown_invoke.clone()),
        ];

        let mut total = 0;
        for (name, data) in parts.iter() {
            let report = ReportBuilder::new(*name);
            let path = dir.join(name);
            let mut file = File::create(&path).map_err(|e| {
                KuromojiError::from(e).with_context(path.to_string_lossy())
            })?;
            file.write_all(data)?;
            file.flush()?;
            total += data.len();
            reporter.collect(data.len(), report);
        }
        Ok(total)
    }
}
