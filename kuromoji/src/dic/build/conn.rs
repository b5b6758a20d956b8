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
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::dic::build::error::{BuildFailure, BuildResult, DicCompilationCtx};
use crate::dic::build::parse::{it_next, parse_i16, parse_i64, EMPTY_LINE, SPLIT_REGEX};
use crate::dic::connect::ConnectionCosts;
use crate::error::KuromojiResult;

/// Reads `matrix.def`: a `forward backward` header line followed by
/// `forward_id backward_id cost` lines
pub struct ConnBuffer {
    costs: Option<ConnectionCosts>,
    ctx: DicCompilationCtx,
    line: String,
}

impl Default for ConnBuffer {
    fn default() -> Self {
        ConnBuffer::new()
    }
}

impl ConnBuffer {
    pub fn new() -> Self {
        Self {
            costs: None,
            ctx: DicCompilationCtx::memory(),
            line: String::new(),
        }
    }

    pub fn read_file(&mut self, path: &Path) -> KuromojiResult<()> {
        let file = File::open(path)?;
        let bufrd = BufReader::with_capacity(32 * 1024, file);
        let filename = path.to_str().unwrap_or("unknown").to_owned();
        let old = self.ctx.set_filename(filename);
        let status = self.read(bufrd);
        self.ctx.set_filename(old);
        status
    }

    pub fn read<R: BufRead>(&mut self, mut reader: R) -> KuromojiResult<()> {
        self.ctx.set_line(0);
        loop {
            self.line.clear();
            let nread = reader.read_line(&mut self.line)?;
            if nread == 0 {
                break;
            }
            self.ctx.add_line(1);
            // borrow checker complains when written as a single line
            let status = Self::parse_line(&mut self.costs, &self.line);
            self.ctx.transform(status)?;
        }
        Ok(())
    }

    /// Consumes one line, the first non-empty one is the header
    pub fn put_line(&mut self, line: &str) -> KuromojiResult<()> {
        self.ctx.add_line(1);
        let status = Self::parse_line(&mut self.costs, line);
        self.ctx.transform(status)
    }

    fn parse_line(costs: &mut Option<ConnectionCosts>, line: &str) -> BuildResult<()> {
        if EMPTY_LINE.is_match(line) {
            return Ok(());
        }
        match costs {
            None => {
                *costs = Some(Self::parse_header(line)?);
                Ok(())
            }
            Some(cc) => Self::parse_cost(cc, line),
        }
    }

    fn parse_header(line: &str) -> BuildResult<ConnectionCosts> {
        let mut items = SPLIT_REGEX.split(line.trim());
        let forward = it_next(&mut items, "forward_size", parse_i64)?;
        let backward = it_next(&mut items, "backward_size", parse_i64)?;
        Ok(ConnectionCosts::new(
            check_dim("forward", forward)?,
            check_dim("backward", backward)?,
        ))
    }

    fn parse_cost(cc: &mut ConnectionCosts, line: &str) -> BuildResult<()> {
        let items: Vec<&str> = SPLIT_REGEX.split(line.trim()).collect();
        if items.len() != 3 {
            return Ok(());
        }
        let mut it = items.into_iter();
        let forward = it_next(&mut it, "forward_id", parse_i64)?;
        let backward = it_next(&mut it, "backward_id", parse_i64)?;
        let cost = it_next(&mut it, "cost", parse_i16)?;

        let (f_dim, b_dim) = (cc.forward_dim() as i64, cc.backward_dim() as i64);
        if forward < 0 || forward >= f_dim || backward < 0 || backward >= b_dim {
            return Err(BuildFailure::ConnIdOutOfRange(
                forward,
                backward,
                f_dim as i16,
                b_dim as i16,
            ));
        }
        cc.put(forward as i32, backward as i32, cost)
            .map_err(|_| BuildFailure::ConnIdOutOfRange(forward, backward, f_dim as i16, b_dim as i16))
    }

    /// The matrix read so far, `None` before the header was seen
    pub fn costs(&self) -> Option<&ConnectionCosts> {
        self.costs.as_ref()
    }

    pub fn build(self) -> KuromojiResult<ConnectionCosts> {
        match self.costs {
            Some(cc) => Ok(cc),
            None => self.ctx.err(BuildFailure::MissingConnHeader),
        }
    }
}

fn check_dim(part: &'static str, value: i64) -> BuildResult<u16> {
    if value < 0 || value > i16::MAX as i64 {
        return Err(BuildFailure::InvalidConnSize(part, value));
    }
    Ok(value as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KuromojiError;
    use claim::assert_matches;

    #[test]
    fn parse_simple2x2() {
        let data = "
        2 2
        0 0 0
        0 1 1
        1 0 2
        1 1 3";
        let mut parser = ConnBuffer::new();
        parser.read(data.as_bytes()).unwrap();
        let cost = parser.build().unwrap();
        assert_eq!(cost.get(0, 0).unwrap(), 0);
        assert_eq!(cost.get(0, 1).unwrap(), 1);
        assert_eq!(cost.get(1, 0).unwrap(), 2);
        assert_eq!(cost.get(1, 1).unwrap(), 3);
    }

    #[test]
    fn lines_with_wrong_field_count_are_skipped() {
        let mut parser = ConnBuffer::new();
        for line in ["1 2", "0 1 -5", "0 0", "0 0 1 1", "0 0 7"] {
            parser.put_line(line).unwrap();
        }
        let cost = parser.build().unwrap();
        assert_eq!(cost.get(0, 0).unwrap(), 7);
        assert_eq!(cost.get(0, 1).unwrap(), -5);
    }

    #[test]
    fn negative_header_is_an_error() {
        let mut parser = ConnBuffer::new();
        let err = parser.put_line("-1 2").unwrap_err();
        assert_matches!(err, KuromojiError::DictionaryCompilationError(_));
    }

    #[test]
    fn out_of_range_id_is_an_error() {
        let mut parser = ConnBuffer::new();
        parser.put_line("2 2").unwrap();
        let err = parser.read("0 2 10\n".as_bytes()).unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("(0, 2)"), "{}", msg);
        assert!(msg.starts_with("<memory>:1"), "{}", msg);
    }

    #[test]
    fn missing_header() {
        let parser = ConnBuffer::new();
        assert!(parser.build().is_err());
    }
}
