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

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::dic::build::error::{BuildFailure, BuildResult};

lazy_static! {
    pub(crate) static ref SPLIT_REGEX: Regex = Regex::new(r"\s+").unwrap();
    pub(crate) static ref EMPTY_LINE: Regex = Regex::new(r"^\s*$").unwrap();
}

/// Takes the next field and parses it, a missing field is an error
#[inline(always)]
pub fn it_next<'a, I, T, F>(data: &mut I, field: &'static str, f: F) -> BuildResult<T>
where
    I: Iterator<Item = &'a str>,
    F: FnOnce(&'static str, &'a str) -> BuildResult<T>,
{
    match data.next() {
        Some(s) => f(field, s),
        None => Err(BuildFailure::NoRawField(field)),
    }
}

#[inline]
pub(crate) fn parse_num<T: FromStr>(field: &'static str, data: &str) -> BuildResult<T> {
    match T::from_str(data.trim()) {
        Ok(v) => Ok(v),
        Err(_) => Err(BuildFailure::InvalidNumber {
            field,
            value: data.to_owned(),
        }),
    }
}

#[inline]
pub(crate) fn parse_i16(field: &'static str, data: &str) -> BuildResult<i16> {
    parse_num(field, data)
}

#[inline]
pub(crate) fn parse_i64(field: &'static str, data: &str) -> BuildResult<i64> {
    parse_num(field, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_matches;

    #[test]
    fn next_field_is_parsed() {
        let mut it = SPLIT_REGEX.split("12  -3");
        assert_eq!(it_next(&mut it, "a", parse_i16).unwrap(), 12);
        assert_eq!(it_next(&mut it, "b", parse_i64).unwrap(), -3);
        assert_matches!(
            it_next(&mut it, "c", parse_i16),
            Err(BuildFailure::NoRawField("c"))
        );
    }

    #[test]
    fn overflow_is_invalid() {
        assert_matches!(
            parse_i16("cost", "40000"),
            Err(BuildFailure::InvalidNumber { field: "cost", .. })
        );
        assert!(EMPTY_LINE.is_match("  \t"));
    }
}
