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

//! Parsers for the little endian integer arrays of the persisted dictionary

use nom::number::complete::{le_i16, le_i32, le_u32};
use nom::IResult;

use crate::error::{KuromojiError, KuromojiResult};

fn element_count(input: &[u8], width: usize, what: &str) -> KuromojiResult<usize> {
    if input.len() % width != 0 {
        return Err(KuromojiError::InvalidDataFormat(format!(
            "{} buffer of {} bytes is not a multiple of {}",
            what,
            input.len(),
            width
        )));
    }
    Ok(input.len() / width)
}

pub fn i32_array(input: &[u8]) -> KuromojiResult<Vec<i32>> {
    let len = element_count(input, 4, "i32")?;
    let result: IResult<&[u8], Vec<i32>> = nom::multi::count(le_i32, len)(input);
    let (_, values) = result?;
    Ok(values)
}

pub fn i16_array(input: &[u8]) -> KuromojiResult<Vec<i16>> {
    let len = element_count(input, 2, "i16")?;
    let result: IResult<&[u8], Vec<i16>> = nom::multi::count(le_i16, len)(input);
    let (_, values) = result?;
    Ok(values)
}

pub fn u32_array(input: &[u8]) -> KuromojiResult<Vec<u32>> {
    let len = element_count(input, 4, "u32")?;
    let result: IResult<&[u8], Vec<u32>> = nom::multi::count(le_u32, len)(input);
    let (_, values) = result?;
    Ok(values)
}

pub(crate) fn i32_bytes(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub(crate) fn i16_bytes(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub(crate) fn u32_bytes(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
