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

use crate::error::{KuromojiError, KuromojiResult};

const DEFAULT_CAPACITY: usize = 1024 * 1024;

/// Growable byte store with a single read/write cursor.
///
/// The whole allocated area is addressable: bytes past the cursor are zeroes
/// until [`ByteBuffer::shrink`] cuts the buffer down to the cursor.
/// Integers are little endian, strings are UTF-8 terminated by a NUL byte.
///
/// Readers at absolute offsets are lenient and return `0` or an empty string
/// when the requested range lies outside of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    buffer: Vec<u8>,
    position: usize,
}

impl Default for ByteBuffer {
    fn default() -> Self {
        ByteBuffer::with_capacity(DEFAULT_CAPACITY)
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(buffer: Vec<u8>) -> Self {
        ByteBuffer {
            buffer,
            position: 0,
        }
    }
}

impl ByteBuffer {
    pub fn with_capacity(size: usize) -> ByteBuffer {
        ByteBuffer {
            buffer: vec![0; size],
            position: 0,
        }
    }

    /// Size of the addressable area
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn reallocate(&mut self) {
        let new_size = std::cmp::max(self.buffer.len() * 2, 1);
        self.buffer.resize(new_size, 0);
    }

    /// Drops everything after the cursor
    pub fn shrink(&mut self) -> &[u8] {
        self.buffer.truncate(self.position);
        &self.buffer
    }

    pub fn put(&mut self, b: u8) {
        if self.buffer.len() < self.position + 1 {
            self.reallocate();
        }
        self.buffer[self.position] = b;
        self.position += 1;
    }

    /// Reads a byte at the absolute offset.
    /// The last byte of the buffer always reads as `0`, so a trailing
    /// terminator is never required to be present.
    pub fn get(&self, index: usize) -> u8 {
        if index + 1 < self.buffer.len() {
            self.buffer[index]
        } else {
            0
        }
    }

    /// Reads a byte at the cursor and advances it
    pub fn read(&mut self) -> u8 {
        let value = self.get(self.position);
        self.position += 1;
        value
    }

    /// Writes a 16-bit value. Accepts both the signed and the unsigned
    /// range, the stored bits are the two's complement representation.
    pub fn put_short(&mut self, value: i32) -> KuromojiResult<()> {
        if value < i16::MIN as i32 || value > u16::MAX as i32 {
            return Err(KuromojiError::FieldOverflow {
                value: value as i64,
                bits: 16,
            });
        }
        for b in (value as u16).to_le_bytes() {
            self.put(b);
        }
        Ok(())
    }

    pub fn get_short(&self, index: usize) -> i16 {
        if index + 2 > self.buffer.len() {
            return 0;
        }
        i16::from_le_bytes([self.buffer[index], self.buffer[index + 1]])
    }

    /// Writes a 32-bit value. Accepts both the signed and the unsigned range.
    pub fn put_int(&mut self, value: i64) -> KuromojiResult<()> {
        if value < i32::MIN as i64 || value > u32::MAX as i64 {
            return Err(KuromojiError::FieldOverflow { value, bits: 32 });
        }
        for b in (value as u32).to_le_bytes() {
            self.put(b);
        }
        Ok(())
    }

    pub fn get_int(&self, index: usize) -> u32 {
        match self.buffer.get(index..index + 4) {
            Some(bytes) => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            None => 0,
        }
    }

    /// Reads an int at the cursor and advances it
    pub fn read_int(&mut self) -> u32 {
        let position = self.position;
        self.position += 4;
        self.get_int(position)
    }

    pub fn put_string(&mut self, text: &str) -> KuromojiResult<()> {
        if text.contains('\0') {
            return Err(KuromojiError::NulInString(text.to_owned()));
        }
        for b in text.bytes() {
            self.put(b);
        }
        self.put(0);
        Ok(())
    }

    /// Reads a NUL-terminated string starting at the absolute offset
    pub fn get_string(&self, index: usize) -> String {
        self.decode_string(index).0
    }

    /// Reads a NUL-terminated string at the cursor and moves the cursor
    /// past its terminator
    pub fn read_string(&mut self) -> String {
        let (text, next) = self.decode_string(self.position);
        self.position = next;
        text
    }

    fn decode_string(&self, start: usize) -> (String, usize) {
        if start >= self.buffer.len() {
            return (String::new(), start);
        }
        // the last byte reads as zero, see `get`
        let limit = self.buffer.len() - 1;
        let tail = &self.buffer[start.min(limit)..limit];
        let len = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        let text = String::from_utf8_lossy(&tail[..len]).into_owned();
        (text, start + len + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_ok};

    #[test]
    fn grows_on_overflow() {
        let mut buf = ByteBuffer::with_capacity(2);
        for b in 1..=5 {
            buf.put(b);
        }
        assert_eq!(buf.size(), 8);
        assert_eq!(buf.position(), 5);
        assert_eq!(buf.shrink(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_capacity_grows() {
        let mut buf = ByteBuffer::with_capacity(0);
        buf.put(7);
        assert_eq!(buf.shrink(), &[7]);
    }

    #[test]
    fn short_is_signed() {
        let mut buf = ByteBuffer::with_capacity(16);
        assert_ok!(buf.put_short(-2));
        assert_ok!(buf.put_short(0x7fff));
        assert_ok!(buf.put_short(0xffff));
        assert_eq!(buf.get_short(0), -2);
        assert_eq!(buf.get_short(2), 0x7fff);
        assert_eq!(buf.get_short(4), -1);
    }

    #[test]
    fn short_overflow_rejected() {
        let mut buf = ByteBuffer::with_capacity(16);
        assert_err!(buf.put_short(0x10000));
        assert_err!(buf.put_short(-40000));
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn int_roundtrip_and_overflow() {
        let mut buf = ByteBuffer::with_capacity(16);
        assert_ok!(buf.put_int(0xdead_beef));
        assert_ok!(buf.put_int(42));
        assert_err!(buf.put_int(u32::MAX as i64 + 1));
        assert_eq!(buf.get_int(0), 0xdead_beef);
        buf.set_position(0);
        assert_eq!(buf.read_int(), 0xdead_beef);
        assert_eq!(buf.read_int(), 42);
    }

    #[test]
    fn out_of_range_reads_are_lenient() {
        let mut buf = ByteBuffer::with_capacity(16);
        buf.put_int(5).unwrap();
        buf.shrink();
        assert_eq!(buf.get_int(1), 0);
        assert_eq!(buf.get_int(100), 0);
        assert_eq!(buf.get_short(3), 0);
        assert_eq!(buf.get_string(100), "");
    }

    #[test]
    fn strings() {
        let mut buf = ByteBuffer::with_capacity(4);
        buf.put_string("東京,名詞").unwrap();
        buf.put_string("𠮷").unwrap();
        buf.shrink();
        assert_eq!(buf.get_string(0), "東京,名詞");
        let second = "東京,名詞".len() + 1;
        assert_eq!(buf.get_string(second), "𠮷");

        buf.set_position(0);
        assert_eq!(buf.read_string(), "東京,名詞");
        assert_eq!(buf.position(), second);
        assert_eq!(buf.read_string(), "𠮷");
        assert_eq!(buf.position(), buf.size());
    }

    #[test]
    fn nul_is_rejected() {
        let mut buf = ByteBuffer::with_capacity(4);
        assert_err!(buf.put_string("a\0b"));
    }
}
