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

use std::path::{Path, PathBuf};

use structopt::StructOpt;

use kuromoji::dic::build::report::DictPartReport;
use kuromoji::dic::build::DictionaryBuilder;

/// Check that the first argument is a subcommand and the file with the same name does
/// not exists.
/// If the file does exists, the user most likely wants to analyze it.
pub fn is_build_mode() -> bool {
    let mut args = std::env::args_os();
    let _ = args.next();
    match args.next() {
        Some(x) => x == "build" && !Path::new(&x).exists(),
        None => false,
    }
}

#[derive(StructOpt)]
#[structopt(name = "kuromoji")]
enum BuildCli {
    /// Compiles a dictionary directory from its text sources
    #[structopt(name = "build")]
    Build(BuildCmd),
}

#[derive(StructOpt)]
struct BuildCmd {
    /// Input csv files
    #[structopt(required = true, parse(from_os_str))]
    inputs: Vec<PathBuf>,

    /// Path to matrix definition
    #[structopt(short, long, parse(from_os_str))]
    matrix: PathBuf,

    /// Path to character category definition
    #[structopt(short, long = "char-def", parse(from_os_str))]
    char_def: PathBuf,

    /// Path to unknown word templates
    #[structopt(short, long = "unk-def", parse(from_os_str))]
    unk_def: PathBuf,

    /// Directory to place compiled dictionary files in.
    /// Existing files will be overwritten.
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output_dir: PathBuf,
}

pub fn build_main() {
    let args: BuildCli = BuildCli::from_args();

    match args {
        BuildCli::Build(cmd) => build_dictionary(cmd),
    }
}

fn build_dictionary(cmd: BuildCmd) {
    let mut builder = DictionaryBuilder::new();
    for d in cmd.inputs.iter() {
        builder
            .read_lexicon(d.as_path())
            .unwrap_or_else(|e| panic!("failed to read {:?}\n{:?}", d, e));
    }
    builder
        .read_conn(cmd.matrix.as_path())
        .expect("failed to read matrix");
    builder
        .read_char_def(cmd.char_def.as_path())
        .expect("failed to read character definition");
    builder
        .read_unk_def(cmd.unk_def.as_path())
        .expect("failed to read unknown word definition");
    builder
        .compile(&cmd.output_dir)
        .unwrap_or_else(|e| panic!("failed to compile dictionary\n{:?}", e));
    print_stats(builder.report());
}

fn print_stats(report: &[DictPartReport]) {
    let max_len = report.iter().map(|r| r.part().len()).max().unwrap_or(0);

    for part in report {
        let unit = if part.is_write() { "bytes" } else { "entries" };
        eprintln!(
            "{0:1$} {2} {3} in {4:.3} sec",
            part.part(),
            max_len,
            part.size(),
            unit,
            part.time().as_secs_f32()
        )
    }
}
