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

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Cost of a node the forward pass has not reached
pub const UNREACHABLE: i64 = i64::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Known,
    Unknown,
    Bos,
    Eos,
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let repr = match self {
            NodeType::Known => "KNOWN",
            NodeType::Unknown => "UNKNOWN",
            NodeType::Bos => "BOS",
            NodeType::Eos => "EOS",
        };
        f.write_str(repr)
    }
}

/// Position of a node in the lattice: end slot and index inside the slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeIdx {
    end: u32,
    index: u32,
}

impl NodeIdx {
    pub fn new(end: usize, index: usize) -> NodeIdx {
        NodeIdx {
            end: end as u32,
            index: index as u32,
        }
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end as usize
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Lattice node.
///
/// Positions are 1-based and counted in Unicode scalars.
/// `word_id` is the entry id in the known or unknown word store,
/// it is meaningless for BOS and EOS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViterbiNode {
    word_id: u32,
    cost: i16,
    start_pos: usize,
    length: usize,
    node_type: NodeType,
    left_id: i16,
    right_id: i16,
    surface: String,
    prev: Option<NodeIdx>,
    shortest_cost: i64,
}

impl ViterbiNode {
    #[allow(clippy::too_many_arguments)]
    pub fn new<S: Into<String>>(
        word_id: u32,
        cost: i16,
        start_pos: usize,
        length: usize,
        node_type: NodeType,
        left_id: i16,
        right_id: i16,
        surface: S,
    ) -> ViterbiNode {
        let shortest_cost = if node_type == NodeType::Bos {
            0
        } else {
            UNREACHABLE
        };
        ViterbiNode {
            word_id,
            cost,
            start_pos,
            length,
            node_type,
            left_id,
            right_id,
            surface: surface.into(),
            prev: None,
            shortest_cost,
        }
    }

    pub fn bos() -> ViterbiNode {
        ViterbiNode::new(0, 0, 0, 0, NodeType::Bos, 0, 0, "")
    }

    pub fn eos(start_pos: usize) -> ViterbiNode {
        ViterbiNode::new(0, 0, start_pos, 0, NodeType::Eos, 0, 0, "")
    }

    pub fn word_id(&self) -> u32 {
        self.word_id
    }

    pub fn cost(&self) -> i16 {
        self.cost
    }

    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    /// Length in scalars
    pub fn length(&self) -> usize {
        self.length
    }

    /// Slot of the lattice this node is stored in
    pub fn end_pos(&self) -> usize {
        match self.node_type {
            NodeType::Bos => 0,
            NodeType::Eos => self.start_pos,
            _ => self.start_pos + self.length - 1,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn left_id(&self) -> i16 {
        self.left_id
    }

    pub fn right_id(&self) -> i16 {
        self.right_id
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn prev(&self) -> Option<NodeIdx> {
        self.prev
    }

    pub fn shortest_cost(&self) -> i64 {
        self.shortest_cost
    }

    pub fn is_reachable(&self) -> bool {
        self.shortest_cost != UNREACHABLE
    }

    pub(crate) fn connect(&mut self, prev: NodeIdx, shortest_cost: i64) {
        self.prev = Some(prev);
        self.shortest_cost = shortest_cost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_positions() {
        assert_eq!(ViterbiNode::bos().end_pos(), 0);
        assert_eq!(ViterbiNode::eos(4).end_pos(), 4);
        let node = ViterbiNode::new(10, 300, 2, 3, NodeType::Known, 1, 1, "京都府");
        assert_eq!(node.end_pos(), 4);
        assert!(!node.is_reachable());
        assert!(ViterbiNode::bos().is_reachable());
    }

    #[test]
    fn node_type_names() {
        assert_eq!(NodeType::Unknown.to_string(), "UNKNOWN");
        assert_eq!(serde_json::to_string(&NodeType::Known).unwrap(), "\"KNOWN\"");
    }
}
