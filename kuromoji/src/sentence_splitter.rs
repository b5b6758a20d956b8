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

use std::ops::Range;

/// Characters after which a new segment starts
const PUNCTUATION: [char; 2] = ['、', '。'];

pub trait SplitSentences {
    fn split<'a, 'b>(&'b self, data: &'a str) -> SentenceIter<'a, 'b>;
}

/// Iterator over segments and their byte ranges in the input
pub struct SentenceIter<'s, 'x> {
    punctuation: &'x [char],
    data: &'s str,
    position: usize,
}

impl<'s, 'x> Iterator for SentenceIter<'s, 'x> {
    type Item = (Range<usize>, &'s str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.position == self.data.len() {
            return None;
        }
        let slice = &self.data[self.position..];
        // the punctuation stays at the end of its segment
        let end = match slice.find(self.punctuation) {
            Some(idx) => {
                let width = slice[idx..].chars().next().map_or(0, |c| c.len_utf8());
                self.position + idx + width
            }
            None => self.data.len(),
        };

        let range = self.position..end;
        let real_slice = &self.data[range.clone()];
        self.position = end;
        Some((range, real_slice))
    }
}

/// Splits text after each `、` and `。`
pub struct SentenceSplitter {
    punctuation: Vec<char>,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        SentenceSplitter::new()
    }
}

impl SentenceSplitter {
    pub fn new() -> Self {
        SentenceSplitter {
            punctuation: PUNCTUATION.to_vec(),
        }
    }
}

impl SplitSentences for SentenceSplitter {
    fn split<'a, 'b>(&'b self, data: &'a str) -> SentenceIter<'a, 'b> {
        SentenceIter {
            punctuation: &self.punctuation,
            data,
            position: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_simple() {
        let splitter = SentenceSplitter::new();
        let mut iter = splitter.split("東京、京都。大阪");
        assert_eq!(iter.next(), Some((0..9, "東京、")));
        assert_eq!(iter.next(), Some((9..18, "京都。")));
        assert_eq!(iter.next(), Some((18..24, "大阪")));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn split_punctuation_only() {
        let splitter = SentenceSplitter::new();
        let segments: Vec<_> = splitter.split("。。").map(|(_, s)| s).collect();
        assert_eq!(segments, vec!["。", "。"]);
    }

    #[test]
    fn split_empty_and_unpunctuated() {
        let splitter = SentenceSplitter::new();
        assert_eq!(splitter.split("").next(), None);
        let segments: Vec<_> = splitter.split("東京都").collect();
        assert_eq!(segments, vec![(0..9, "東京都")]);
    }
}
