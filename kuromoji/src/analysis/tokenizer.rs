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

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::analysis::builder::ViterbiBuilder;
use crate::analysis::lattice::Lattice;
use crate::analysis::node::NodeType;
use crate::analysis::searcher::ViterbiSearcher;
use crate::analysis::token::{IpadicFormatter, Token, TokenFormatter};
use crate::analysis::Tokenize;
use crate::dic::DictionaryAccess;
use crate::error::KuromojiResult;
use crate::sentence_splitter::{SentenceSplitter, SplitSentences};

/// Tokenizer which splits text at punctuation and finds the best path
/// of every segment independently.
///
/// Generic over dictionary pointers: it can own the dictionary,
/// borrow it or share it through an `Arc`.
pub struct Tokenizer<T, F = IpadicFormatter> {
    dict: T,
    formatter: F,
    splitter: SentenceSplitter,
    empty_segments: AtomicUsize,
}

impl<T: DictionaryAccess> Tokenizer<T> {
    pub fn new(dict: T) -> Tokenizer<T> {
        Tokenizer::with_formatter(dict, IpadicFormatter)
    }
}

impl<T: DictionaryAccess, F: TokenFormatter> Tokenizer<T, F> {
    pub fn with_formatter(dict: T, formatter: F) -> Tokenizer<T, F> {
        Tokenizer {
            dict,
            formatter,
            splitter: SentenceSplitter::new(),
            empty_segments: AtomicUsize::new(0),
        }
    }

    pub fn dict(&self) -> &T {
        &self.dict
    }

    /// Number of non-empty segments which produced no tokens so far
    pub fn empty_segments(&self) -> usize {
        self.empty_segments.load(Ordering::Relaxed)
    }

    /// Builds the word lattice of a single segment, without searching it
    pub fn lattice(&self, text: &str) -> Lattice {
        ViterbiBuilder::new(&self.dict).build(text)
    }

    /// Tokenizes one segment. `offset` is the number of scalars before it.
    fn tokenize_segment(
        &self,
        segment: &str,
        offset: usize,
        tokens: &mut Vec<Token>,
    ) -> KuromojiResult<()> {
        let mut lattice = self.lattice(segment);
        log::trace!(
            "segment at {}: {} nodes over {} positions",
            offset,
            lattice.node_count(),
            lattice.eos_pos()
        );
        let searcher = ViterbiSearcher::new(self.dict.connection_costs());
        let path = searcher.search(&mut lattice)?;

        if path.is_empty() && !segment.is_empty() {
            self.empty_segments.fetch_add(1, Ordering::Relaxed);
            log::warn!("no path through the lattice of segment {:?}", segment);
            return Ok(());
        }

        for node in path {
            let position = offset + node.start_pos();
            let token = match node.node_type() {
                NodeType::Known => {
                    let line = self.dict.token_info().get_features(node.word_id());
                    let features: Vec<&str> = line.split(',').collect();
                    self.formatter
                        .format_entry(node.word_id(), position, node.node_type(), &features)
                }
                NodeType::Unknown => {
                    let line = self.dict.unknown().get_features(node.word_id());
                    let features: Vec<&str> = line.split(',').collect();
                    self.formatter.format_unknown_entry(
                        node.word_id(),
                        position,
                        node.node_type(),
                        &features,
                        node.surface(),
                    )
                }
                NodeType::Bos | NodeType::Eos => {
                    self.formatter
                        .format_entry(node.word_id(), position, node.node_type(), &[])
                }
            };
            tokens.push(token);
        }
        Ok(())
    }
}

impl<T: DictionaryAccess, F: TokenFormatter> Tokenize for Tokenizer<T, F> {
    fn tokenize(&self, input: &str) -> KuromojiResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut offset = 0;
        for (_, segment) in self.splitter.split(input) {
            self.tokenize_segment(segment, offset, &mut tokens)?;
            offset += segment.chars().count();
        }
        Ok(tokens)
    }
}
