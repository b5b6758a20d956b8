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

//! Compilation of a dictionary from its text sources:
//! CSV lexicons, `matrix.def`, `char.def` and `unk.def`

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{StringRecord, Trim};

use crate::dic::build::error::{BuildFailure, DicCompilationCtx};
use crate::dic::build::parse::{parse_i16, EMPTY_LINE};
use crate::dic::build::report::{DictPartReport, ReportBuilder, Reporter};
use crate::dic::entry_store::{TokenInfoDictionary, UnknownDictionary};
use crate::dic::storage::DictionaryBuffers;
use crate::dic::trie::{DoubleArray, DoubleArrayBuilder};
use crate::dic::Dictionary;
use crate::error::KuromojiResult;

pub mod char_def;
pub(crate) mod conn;
pub mod error;
pub(crate) mod parse;
pub mod report;

const TRIE_INITIAL_SIZE: usize = 1024 * 1024;

pub enum DataSource<'a> {
    File(&'a Path),
    Data(&'a [u8]),
}

pub trait AsDataSource<'a> {
    fn convert(self) -> DataSource<'a>;
    fn name(&self) -> String;
}

impl<'a> AsDataSource<'a> for DataSource<'a> {
    fn convert(self) -> DataSource<'a> {
        self
    }

    fn name(&self) -> String {
        match self {
            DataSource::File(p) => p.to_str().map(|s| s.to_owned()).unwrap_or_default(),
            DataSource::Data(d) => format!("memory ({} bytes)", d.len()),
        }
    }
}

impl<'a> AsDataSource<'a> for &'a Path {
    fn convert(self) -> DataSource<'a> {
        DataSource::File(self)
    }

    fn name(&self) -> String {
        self.to_str().map(|s| s.to_owned()).unwrap_or_default()
    }
}

impl<'a> AsDataSource<'a> for &'a [u8] {
    fn convert(self) -> DataSource<'a> {
        DataSource::Data(self)
    }

    fn name(&self) -> String {
        format!("memory ({} bytes)", self.len())
    }
}

impl<'a> AsDataSource<'a> for &'a str {
    fn convert(self) -> DataSource<'a> {
        DataSource::Data(self.as_bytes())
    }

    fn name(&self) -> String {
        format!("memory ({} bytes)", self.len())
    }
}

/// Builds a [`Dictionary`] from text sources.
///
/// Sources can be fed line by line or read from files and buffers.
/// Known word rows look like `surface,left_id,right_id,cost,features...`,
/// unknown word rows have a category name in place of the surface.
pub struct DictionaryBuilder {
    tid_entries: Vec<Vec<String>>,
    unk_entries: Vec<Vec<String>>,
    conn: conn::ConnBuffer,
    char_def: char_def::CharDefBuilder,
    ctx: DicCompilationCtx,
    reporter: Reporter,
}

impl Default for DictionaryBuilder {
    fn default() -> Self {
        DictionaryBuilder::new()
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',').map(|s| s.to_owned()).collect()
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        DictionaryBuilder {
            tid_entries: Vec::new(),
            unk_entries: Vec::new(),
            conn: conn::ConnBuffer::new(),
            char_def: char_def::CharDefBuilder::new(),
            ctx: DicCompilationCtx::memory(),
            reporter: Reporter::new(),
        }
    }

    /// Adds one known word row
    pub fn add_token_info_line(&mut self, line: &str) -> &mut Self {
        self.tid_entries.push(split_row(line));
        self
    }

    /// Adds one `matrix.def` line, the first one is the header
    pub fn put_cost_matrix_line(&mut self, line: &str) -> KuromojiResult<&mut Self> {
        self.conn.put_line(line)?;
        Ok(self)
    }

    pub fn put_char_def_line(&mut self, line: &str) -> KuromojiResult<&mut Self> {
        self.char_def.put_line(line)?;
        Ok(self)
    }

    /// Adds one unknown word row
    pub fn put_unk_def_line(&mut self, line: &str) -> &mut Self {
        self.unk_entries.push(split_row(line));
        self
    }

    /// Reads a CSV lexicon, returns the number of rows read
    pub fn read_lexicon<'a, T: AsDataSource<'a> + 'a>(&mut self, data: T) -> KuromojiResult<usize> {
        let report = ReportBuilder::new(data.name()).read();
        let name = data.name();
        let result = match data.convert() {
            DataSource::File(p) => read_csv_file(p, &mut self.ctx, &mut self.tid_entries),
            DataSource::Data(d) => read_csv(d, name, &mut self.ctx, &mut self.tid_entries),
        };
        self.reporter.collect_r(result, report)
    }

    /// Reads `unk.def`, returns the number of rows read
    pub fn read_unk_def<'a, T: AsDataSource<'a> + 'a>(&mut self, data: T) -> KuromojiResult<usize> {
        let report = ReportBuilder::new(data.name()).read();
        let name = data.name();
        let result = match data.convert() {
            DataSource::File(p) => read_csv_file(p, &mut self.ctx, &mut self.unk_entries),
            DataSource::Data(d) => read_csv(d, name, &mut self.ctx, &mut self.unk_entries),
        };
        self.reporter.collect_r(result, report)
    }

    /// Reads `matrix.def`
    pub fn read_conn<'a, T: AsDataSource<'a> + 'a>(&mut self, data: T) -> KuromojiResult<()> {
        let report = ReportBuilder::new(data.name()).read();
        match data.convert() {
            DataSource::File(p) => self.conn.read_file(p),
            DataSource::Data(d) => self.conn.read(d),
        }?;
        let size = self
            .conn
            .costs()
            .map_or(0, |c| c.forward_dim() * c.backward_dim());
        self.reporter.collect(size, report);
        Ok(())
    }

    /// Reads `char.def`
    pub fn read_char_def<'a, T: AsDataSource<'a> + 'a>(&mut self, data: T) -> KuromojiResult<()> {
        let report = ReportBuilder::new(data.name()).read();
        match data.convert() {
            DataSource::File(p) => self.char_def.read_file(p),
            DataSource::Data(d) => self.char_def.read(d),
        }?;
        self.reporter.collect(0, report);
        Ok(())
    }

    /// Builds the dictionary from everything read so far.
    ///
    /// The builder keeps its reports, sources are consumed.
    pub fn build(&mut self) -> KuromojiResult<Dictionary> {
        let report = ReportBuilder::new("token info");
        let mut token_info = TokenInfoDictionary::new();
        let stored = token_info.build_dictionary(&self.tid_entries)?;
        self.tid_entries = Vec::new();
        self.reporter.collect(stored.len(), report);

        let report = ReportBuilder::new("trie");
        let trie = build_trie(&stored)?;
        self.reporter.collect(trie.size(), report);

        for (id, surface) in stored.iter() {
            match trie.lookup(surface) {
                Some(tid) => token_info.add_mapping(tid, *id),
                None => {
                    return self
                        .ctx
                        .err(BuildFailure::SurfaceNotFound(surface.clone()))
                }
            }
        }

        let report = ReportBuilder::new("connection matrix");
        let connection_costs = std::mem::take(&mut self.conn).build()?;
        self.reporter.collect(connection_costs.buffer().len(), report);

        let report = ReportBuilder::new("character definition");
        let character_definition = std::mem::take(&mut self.char_def).build()?;
        self.reporter.collect(
            character_definition.invoke_definition_map().classes().len(),
            report,
        );

        let report = ReportBuilder::new("unknown words");
        let mut unknown = UnknownDictionary::new();
        let stored = unknown.build_dictionary(&self.unk_entries)?;
        self.unk_entries = Vec::new();
        let invoke = character_definition.invoke_definition_map();
        for (id, class_name) in stored.iter() {
            match invoke.lookup(class_name) {
                Some(class_id) => unknown.add_mapping(class_id, *id),
                None => {
                    return self
                        .ctx
                        .err(BuildFailure::UnknownCategory(class_name.clone()))
                }
            }
        }
        self.reporter.collect(stored.len(), report);

        Ok(Dictionary::new(
            trie,
            token_info,
            connection_costs,
            unknown,
            character_definition,
        ))
    }

    /// Builds the dictionary and writes its blobs into `dir`
    pub fn compile(&mut self, dir: &Path) -> KuromojiResult<Dictionary> {
        let dic = self.build()?;
        let buffers = DictionaryBuffers::from_dictionary(&dic)?;
        buffers.write_dir_with(dir, &mut self.reporter)?;
        Ok(dic)
    }

    /// Return dictionary build report
    pub fn report(&self) -> &[DictPartReport] {
        self.reporter.reports()
    }
}

fn build_trie(stored: &[(u32, String)]) -> KuromojiResult<DoubleArray> {
    let mut bldr = DoubleArrayBuilder::new(TRIE_INITIAL_SIZE);
    for (i, (_, surface)) in stored.iter().enumerate() {
        bldr.append(surface, i as u32)?;
    }
    Ok(bldr.build())
}

fn read_csv_file(
    path: &Path,
    ctx: &mut DicCompilationCtx,
    rows: &mut Vec<Vec<String>>,
) -> KuromojiResult<usize> {
    let file = File::open(path)?;
    let mut data = Vec::new();
    let mut reader = BufReader::new(file);
    // skip a UTF-8 BOM if there is one
    let bom = reader.fill_buf()?.starts_with(b"\xEF\xBB\xBF");
    if bom {
        reader.consume(3);
    }
    std::io::Read::read_to_end(&mut reader, &mut data)?;
    let name = path.to_str().unwrap_or("<invalid-utf8>").to_owned();
    read_csv(&data, name, ctx, rows)
}

/// Reads CSV rows. Rows with at least 4 fields must have numeric
/// context ids and cost, shorter rows are kept and skipped at build time.
fn read_csv(
    data: &[u8],
    name: String,
    ctx: &mut DicCompilationCtx,
    rows: &mut Vec<Vec<String>>,
) -> KuromojiResult<usize> {
    let old_name = ctx.set_filename(name);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::None)
        .flexible(true)
        .from_reader(data);
    let mut record = StringRecord::new();
    let mut nread = 0;
    let result = loop {
        match reader.read_record(&mut record) {
            Ok(false) => break Ok(nread),
            Ok(true) => {}
            Err(e) => {
                ctx.set_line(e.position().map_or(0, |p| p.line()) as usize);
                break ctx.err(BuildFailure::CsvError(e));
            }
        }
        ctx.set_line(record.position().map_or(0, |p| p.line()) as usize);
        if record.len() == 1 && EMPTY_LINE.is_match(&record[0]) {
            continue;
        }
        if record.len() >= 4 {
            let checked = parse_i16("left_id", &record[1])
                .and_then(|_| parse_i16("right_id", &record[2]))
                .and_then(|_| parse_i16("cost", &record[3]));
            if let Err(e) = checked {
                break ctx.err(e);
            }
        }
        rows.push(record.iter().map(|f| f.to_owned()).collect());
        nread += 1;
    };
    ctx.set_filename(old_name);
    result
}
