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
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use log::{Level, Metadata, Record};
use structopt::StructOpt;

use kuromoji::analysis::searcher::ViterbiSearcher;
use kuromoji::config::Config;
use kuromoji::prelude::*;
use kuromoji::sentence_splitter::{SentenceSplitter, SplitSentences};

use crate::build::{build_main, is_build_mode};
use crate::output::{Json, KuromojiOutput, Simple, Wakati};

mod build;
mod output;

/// A Japanese morphological analyzer
#[derive(StructOpt)]
#[structopt(name = "kuromoji")]
struct Cli {
    /// Input text file: If not present, read from STDIN
    #[structopt(parse(from_os_str))]
    file: Option<PathBuf>,

    /// Path to the setting file in JSON format
    #[structopt(short = "r", long = "config-file", parse(from_os_str))]
    config_file: Option<PathBuf>,

    /// Path to the root directory of resources
    #[structopt(short = "p", long = "resource_dir", parse(from_os_str))]
    resource_dir: Option<PathBuf>,

    /// Path to a compiled dictionary directory.
    /// Overrides the dictionary given in the setting file
    #[structopt(short = "l", long = "dict", parse(from_os_str))]
    dictionary_path: Option<PathBuf>,

    // Output text file: If not present, use stdout
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output_file: Option<PathBuf>,

    /// Prints all fields
    #[structopt(short = "a", long = "all")]
    print_all: bool,

    /// Outputs only surface forms
    #[structopt(short = "w", long = "wakati")]
    wakati: bool,

    /// Outputs one JSON array of tokens per line
    #[structopt(short = "j", long = "json")]
    json: bool,

    /// Debug mode: Dumps the lattices and logs the analysis details to stderr
    #[structopt(short = "d", long = "debug")]
    enable_debug: bool,
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logger(debug: bool) {
    let level = if debug { Level::Debug } else { Level::Warn };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level.to_level_filter());
    }
}

fn main() {
    if is_build_mode() {
        build_main();
        return;
    }

    let args: Cli = Cli::from_args();
    init_logger(args.enable_debug);

    // input: stdin or file
    let reader: Box<dyn BufRead> = match &args.file {
        Some(input_path) => Box::new(BufReader::new(
            File::open(&input_path)
                .unwrap_or_else(|_| panic!("Failed to open input file {:?}", &input_path)),
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    // output: stdout or file
    let inner_writer: Box<dyn Write> = match &args.output_file {
        Some(output_path) => Box::new(
            File::create(&output_path)
                .unwrap_or_else(|_| panic!("Failed to open output file {:?}", &output_path)),
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = BufWriter::new(inner_writer);

    // load config file
    let config = Config::new(
        args.config_file.clone(),
        args.resource_dir.clone(),
        args.dictionary_path.clone(),
    )
    .expect("Failed to load config file");

    let dict = Dictionary::from_cfg(&config)
        .unwrap_or_else(|e| panic!("Failed to create dictionary: {:?}", e));
    let tokenizer = Tokenizer::new(&dict);

    let format: Box<dyn KuromojiOutput> = if args.wakati {
        Box::new(Wakati::default())
    } else if args.json {
        Box::new(Json)
    } else {
        Box::new(Simple::new(args.print_all))
    };

    // tokenize and output results
    for line in reader.lines() {
        let input = line.expect("Failed to read line");
        if args.enable_debug {
            dump_lattices(&tokenizer, &input).expect("Failed to dump lattice");
        }
        let tokens = tokenizer
            .tokenize(&input)
            .expect("Failed to tokenize input");
        format
            .write(&mut writer, &tokens)
            .expect("Failed to write output");
    }
    writer.flush().expect("Failed to flush writer");

    let empty = tokenizer.empty_segments();
    if empty > 0 {
        log::warn!("{} segments could not be analyzed", empty);
    }
}

/// Writes the searched lattice of every segment to stderr
fn dump_lattices<D: DictionaryAccess>(
    tokenizer: &Tokenizer<D>,
    input: &str,
) -> KuromojiResult<()> {
    let splitter = SentenceSplitter::new();
    let searcher = ViterbiSearcher::new(tokenizer.dict().connection_costs());
    let stderr = io::stderr();
    let mut out = stderr.lock();
    for (_, segment) in splitter.split(input) {
        let mut lattice = tokenizer.lattice(segment);
        searcher.forward(&mut lattice)?;
        writeln!(out, "=== {}", segment)?;
        lattice.dump(&mut out)?;
    }
    Ok(())
}
