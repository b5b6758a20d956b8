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

use std::io::Write;

use crate::analysis::node::{NodeIdx, NodeType, ViterbiNode};
use crate::error::KuromojiResult;

/// Lattice which is constructed for performing the Viterbi search.
///
/// Nodes are grouped by their end position (1-based, in scalars).
/// Slot 0 holds the single BOS node, the EOS node is alone in the
/// last slot once [`Lattice::append_eos`] was called.
pub struct Lattice {
    ends: Vec<Vec<ViterbiNode>>,
    eos_pos: usize,
    has_eos: bool,
}

impl Default for Lattice {
    fn default() -> Self {
        Lattice::new()
    }
}

impl Lattice {
    pub fn new() -> Lattice {
        Lattice {
            ends: vec![vec![ViterbiNode::bos()]],
            eos_pos: 0,
            has_eos: false,
        }
    }

    /// Inserts a node into the slot of its end position
    pub fn append(&mut self, node: ViterbiNode) {
        let end = node.end_pos();
        if self.eos_pos < end {
            self.eos_pos = end;
        }
        if self.ends.len() <= end {
            self.ends.resize_with(end + 1, Vec::new);
        }
        self.ends[end].push(node);
    }

    /// Finishes the lattice with the EOS node one past the furthest end position
    pub fn append_eos(&mut self) {
        self.eos_pos += 1;
        let node = ViterbiNode::eos(self.eos_pos);
        self.append(node);
        self.has_eos = true;
    }

    /// Furthest end position, the EOS position after [`Lattice::append_eos`]
    pub fn eos_pos(&self) -> usize {
        self.eos_pos
    }

    /// Nodes ending at the position, empty for a gap
    pub fn nodes_end_at(&self, pos: usize) -> &[ViterbiNode] {
        match self.ends.get(pos) {
            Some(nodes) => nodes,
            None => &[],
        }
    }

    pub fn node(&self, idx: NodeIdx) -> &ViterbiNode {
        &self.ends[idx.end()][idx.index()]
    }

    /// Index of the EOS node
    pub fn eos(&self) -> Option<NodeIdx> {
        if self.has_eos {
            Some(NodeIdx::new(self.eos_pos, 0))
        } else {
            None
        }
    }

    /// Total number of nodes, BOS and EOS included
    pub fn node_count(&self) -> usize {
        self.ends.iter().map(|v| v.len()).sum()
    }

    /// Splits the slots into the ones before `pos`, read-only,
    /// and the mutable slot at `pos`
    pub(crate) fn split_at_mut(
        &mut self,
        pos: usize,
    ) -> Option<(&[Vec<ViterbiNode>], &mut Vec<ViterbiNode>)> {
        if pos >= self.ends.len() {
            return None;
        }
        let (before, rest) = self.ends.split_at_mut(pos);
        Some((before, &mut rest[0]))
    }

    /// Writes every node, one per line, from the last position to the first
    pub fn dump<W: Write>(&self, out: &mut W) -> KuromojiResult<()> {
        for (end, nodes) in self.ends.iter().enumerate().rev() {
            for node in nodes {
                let surface = match node.node_type() {
                    NodeType::Bos | NodeType::Eos => "(null)",
                    _ => node.surface(),
                };
                let prev = match node.prev() {
                    Some(p) => format!("{}:{}", p.end(), p.index()),
                    None => "-".to_owned(),
                };
                writeln!(
                    out,
                    "{}: {} {} {} {} {} {} {} {} {}",
                    end,
                    node.start_pos(),
                    surface,
                    node.node_type(),
                    node.word_id(),
                    node.left_id(),
                    node.right_id(),
                    node.cost(),
                    node.shortest_cost(),
                    prev
                )?;
            }
        }
        Ok(())
    }
}
