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

use std::io::{BufWriter, Write};

use kuromoji::prelude::{KuromojiResult, NodeType, Token};

pub type Writer = BufWriter<Box<dyn Write>>;

pub trait KuromojiOutput {
    fn write(&self, writer: &mut Writer, tokens: &[Token]) -> KuromojiResult<()>;
}

pub struct Wakati {
    word_separator: String,
    sentence_separator: String,
}

impl Default for Wakati {
    fn default() -> Wakati {
        Wakati {
            word_separator: String::from(" "),
            sentence_separator: String::from("\n"),
        }
    }
}

impl KuromojiOutput for Wakati {
    fn write(&self, writer: &mut Writer, tokens: &[Token]) -> KuromojiResult<()> {
        for (idx, token) in tokens.iter().enumerate() {
            if idx != 0 {
                writer.write_all(self.word_separator.as_bytes())?;
            }
            writer.write_all(token.surface_form.as_bytes())?;
        }
        writer.write_all(self.sentence_separator.as_bytes())?;
        Ok(())
    }
}

pub struct Simple {
    print_all: bool,
}

impl Simple {
    pub fn new(print_all: bool) -> Simple {
        Simple { print_all }
    }
}

impl KuromojiOutput for Simple {
    fn write(&self, writer: &mut Writer, tokens: &[Token]) -> KuromojiResult<()> {
        for token in tokens {
            write_token_basic(writer, token)?;
            if self.print_all {
                write_token_extended(writer, token)?;
            }
            writer.write_all(b"\n")?;
        }
        writer.write_all(b"EOS\n")?;
        Ok(())
    }
}

#[inline]
fn write_token_basic(writer: &mut Writer, token: &Token) -> KuromojiResult<()> {
    let pos = [
        &token.pos,
        &token.pos_detail_1,
        &token.pos_detail_2,
        &token.pos_detail_3,
        &token.conjugated_type,
        &token.conjugated_form,
    ];
    writer.write_all(token.surface_form.as_bytes())?;
    writer.write_all(b"\t")?;
    for (idx, p) in pos.iter().enumerate() {
        writer.write_all(p.as_bytes())?;
        if idx + 1 != pos.len() {
            writer.write_all(b",")?;
        }
    }
    writer.write_all(b"\t")?;
    writer.write_all(token.basic_form.as_bytes())?;
    Ok(())
}

#[inline]
fn write_token_extended(writer: &mut Writer, token: &Token) -> KuromojiResult<()> {
    let or_star = |v: &Option<String>| v.as_deref().unwrap_or("*").to_owned();
    write!(
        writer,
        "\t{}\t{}\t{}\t{}",
        or_star(&token.reading),
        or_star(&token.pronunciation),
        token.word_id,
        token.word_position,
    )?;
    if token.word_type == NodeType::Unknown {
        writer.write_all(b"\t(UNK)")?;
    }
    Ok(())
}

/// One JSON array of tokens per input line
pub struct Json;

impl KuromojiOutput for Json {
    fn write(&self, writer: &mut Writer, tokens: &[Token]) -> KuromojiResult<()> {
        serde_json::to_writer(&mut *writer, tokens)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
