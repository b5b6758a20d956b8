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

use crate::analysis::lattice::Lattice;
use crate::analysis::node::{NodeIdx, NodeType, ViterbiNode, UNREACHABLE};
use crate::dic::connect::ConnectionCosts;
use crate::error::KuromojiResult;

/// Finds the minimum cost path through a lattice
pub struct ViterbiSearcher<'d> {
    connection_costs: &'d ConnectionCosts,
}

impl<'d> ViterbiSearcher<'d> {
    pub fn new(connection_costs: &'d ConnectionCosts) -> ViterbiSearcher<'d> {
        ViterbiSearcher { connection_costs }
    }

    /// Best path from BOS to EOS, both excluded.
    /// The path is empty when EOS can not be reached.
    pub fn search<'l>(&self, lattice: &'l mut Lattice) -> KuromojiResult<Vec<&'l ViterbiNode>> {
        self.forward(lattice)?;
        let lattice: &'l Lattice = lattice;
        Ok(Self::backward(lattice))
    }

    /// Connects every node to its cheapest predecessor.
    /// A node without any predecessor stays unreachable.
    pub fn forward(&self, lattice: &mut Lattice) -> KuromojiResult<()> {
        for i in 1..=lattice.eos_pos() {
            let (before, current) = match lattice.split_at_mut(i) {
                Some(slots) => slots,
                None => break,
            };
            for node in current.iter_mut() {
                let prev_pos = node.start_pos() - 1;
                let prev_nodes = match before.get(prev_pos) {
                    Some(nodes) => nodes,
                    None => continue,
                };
                let mut cost = UNREACHABLE;
                let mut shortest = None;
                for (index, prev) in prev_nodes.iter().enumerate() {
                    if !prev.is_reachable() {
                        continue;
                    }
                    let edge_cost = self
                        .connection_costs
                        .get(prev.right_id() as i32, node.left_id() as i32)?;
                    let total = prev.shortest_cost() + edge_cost as i64 + node.cost() as i64;
                    if total < cost {
                        cost = total;
                        shortest = Some(NodeIdx::new(prev_pos, index));
                    }
                }
                if let Some(prev) = shortest {
                    node.connect(prev, cost);
                }
            }
        }
        Ok(())
    }

    /// Follows the predecessors from EOS back to BOS
    pub fn backward(lattice: &Lattice) -> Vec<&ViterbiNode> {
        let eos = match lattice.eos() {
            Some(idx) => lattice.node(idx),
            None => return Vec::new(),
        };
        let mut path = Vec::new();
        let mut current = match eos.prev() {
            Some(idx) => lattice.node(idx),
            None => return Vec::new(),
        };
        while current.node_type() != NodeType::Bos {
            path.push(current);
            current = match current.prev() {
                Some(idx) => lattice.node(idx),
                None => return Vec::new(),
            };
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KuromojiError;
    use claim::assert_matches;

    fn node(start: usize, len: usize, cost: i16, surface: &str) -> ViterbiNode {
        ViterbiNode::new(0, cost, start, len, NodeType::Known, 1, 1, surface)
    }

    fn surfaces(path: &[&ViterbiNode]) -> Vec<String> {
        path.iter().map(|n| n.surface().to_owned()).collect()
    }

    #[test]
    fn cheapest_path_wins() {
        let mut costs = ConnectionCosts::new(2, 2);
        costs.put(1, 1, 100).unwrap();
        let mut lattice = Lattice::new();
        lattice.append(node(1, 2, 3000, "東京"));
        lattice.append(node(1, 1, 1000, "東"));
        lattice.append(node(2, 2, 1500, "京都"));
        lattice.append(node(3, 1, 2000, "都"));
        lattice.append_eos();

        let searcher = ViterbiSearcher::new(&costs);
        let path = searcher.search(&mut lattice).unwrap();
        // 東 + 京都 = 2600, 東京 + 都 = 5100
        assert_eq!(surfaces(&path), vec!["東", "京都"]);
        assert_eq!(path[1].shortest_cost(), 2600);
    }

    #[test]
    fn first_minimum_is_kept() {
        let costs = ConnectionCosts::new(2, 2);
        let mut lattice = Lattice::new();
        lattice.append(node(1, 1, 500, "a"));
        lattice.append(node(1, 1, 500, "b"));
        lattice.append_eos();
        let path = ViterbiSearcher::new(&costs).search(&mut lattice).unwrap();
        assert_eq!(surfaces(&path), vec!["a"]);
    }

    #[test]
    fn gap_gives_empty_path() {
        let costs = ConnectionCosts::new(2, 2);
        let mut lattice = Lattice::new();
        lattice.append(node(1, 1, 10, "東"));
        lattice.append(node(3, 1, 10, "都"));
        lattice.append_eos();
        let searcher = ViterbiSearcher::new(&costs);
        searcher.forward(&mut lattice).unwrap();
        assert!(!lattice.nodes_end_at(3)[0].is_reachable());
        assert!(ViterbiSearcher::backward(&lattice).is_empty());
    }

    #[test]
    fn empty_lattice_gives_empty_path() {
        let costs = ConnectionCosts::new(1, 1);
        let mut lattice = Lattice::new();
        lattice.append_eos();
        let path = ViterbiSearcher::new(&costs).search(&mut lattice).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn long_segment_cost_exceeds_i32() {
        let mut costs = ConnectionCosts::new(2, 2);
        costs.put(1, 1, 30000).unwrap();
        let mut lattice = Lattice::new();
        let len = 40000;
        for start in 1..=len {
            lattice.append(node(start, 1, 30000, "亜"));
        }
        lattice.append_eos();
        let path = ViterbiSearcher::new(&costs).search(&mut lattice).unwrap();
        assert_eq!(path.len(), len);
        // len word costs and len - 1 connections between them
        let expected = 30000 * (2 * len as i64 - 1);
        assert!(expected > i32::MAX as i64);
        assert_eq!(path[len - 1].shortest_cost(), expected);
    }

    #[test]
    fn undefined_context_id_is_fatal() {
        let costs = ConnectionCosts::new(1, 1);
        let mut lattice = Lattice::new();
        lattice.append(node(1, 1, 10, "東"));
        lattice.append_eos();
        let err = ViterbiSearcher::new(&costs).search(&mut lattice).unwrap_err();
        assert_matches!(err, KuromojiError::ConnectionOutOfRange { backward: 1, .. });
    }
}
