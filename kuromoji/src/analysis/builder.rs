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
use crate::analysis::node::{NodeType, ViterbiNode};
use crate::dic::character_definition::CharacterDefinition;
use crate::dic::entry_store::{TokenInfoDictionary, UnknownDictionary};
use crate::dic::trie::DoubleArray;
use crate::dic::DictionaryAccess;

/// Builds the word lattice of a text from known words of the trie
/// and unknown word candidates of the character categories
pub struct ViterbiBuilder<'d> {
    trie: &'d DoubleArray,
    token_info: &'d TokenInfoDictionary,
    unknown: &'d UnknownDictionary,
    character_definition: &'d CharacterDefinition,
}

impl<'d> ViterbiBuilder<'d> {
    pub fn new<D: DictionaryAccess + ?Sized>(dict: &'d D) -> ViterbiBuilder<'d> {
        ViterbiBuilder {
            trie: dict.trie(),
            token_info: dict.token_info(),
            unknown: dict.unknown(),
            character_definition: dict.character_definition(),
        }
    }

    pub fn build(&self, text: &str) -> Lattice {
        let mut lattice = Lattice::new();
        let chars: Vec<(usize, char)> = text.char_indices().collect();

        for (pos, &(offset, head)) in chars.iter().enumerate() {
            let tail = &text[offset..];
            let start_pos = pos + 1;
            let found_known = self.append_known(&mut lattice, tail, start_pos);

            let class = match self.character_definition.lookup(head) {
                Some(c) => c,
                None => continue,
            };
            if found_known && !class.is_always_invoke {
                continue;
            }

            // maxLength is not a bound here, a run ends at a category change
            let mut length = 1;
            if class.is_grouping {
                for &(_, next) in chars[pos + 1..].iter() {
                    match self.character_definition.lookup(next) {
                        Some(c) if c.class_name == class.class_name => length += 1,
                        _ => break,
                    }
                }
            }
            let end = chars.get(pos + length).map_or(text.len(), |&(o, _)| o);
            let surface = &text[offset..end];

            for &unk_id in self.unknown.targets(class.class_id) {
                lattice.append(ViterbiNode::new(
                    unk_id,
                    self.unknown.word_cost(unk_id),
                    start_pos,
                    length,
                    NodeType::Unknown,
                    self.unknown.left_id(unk_id),
                    self.unknown.right_id(unk_id),
                    surface,
                ));
            }
        }
        lattice.append_eos();
        lattice
    }

    /// Appends a node for every dictionary entry whose surface is a prefix of `tail`,
    /// returns true if at least one was appended
    fn append_known(&self, lattice: &mut Lattice, tail: &str, start_pos: usize) -> bool {
        let mut found = false;
        for entry in self.trie.common_prefix_iterator(tail.as_bytes()) {
            let trie_id = match entry.value {
                Some(v) => v,
                None => continue,
            };
            let surface = match tail.get(..entry.end) {
                Some(s) => s,
                None => continue,
            };
            let length = surface.chars().count();
            for &word_id in self.token_info.targets(trie_id) {
                lattice.append(ViterbiNode::new(
                    word_id,
                    self.token_info.word_cost(word_id),
                    start_pos,
                    length,
                    NodeType::Known,
                    self.token_info.left_id(word_id),
                    self.token_info.right_id(word_id),
                    surface,
                ));
                found = true;
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dic::build::DictionaryBuilder;
    use crate::dic::Dictionary;

    fn dictionary() -> Dictionary {
        let mut bldr = DictionaryBuilder::new();
        bldr.add_token_info_line("東京,1,1,3000,名詞")
            .add_token_info_line("東,1,1,4000,名詞")
            .add_token_info_line("京都,1,1,3500,名詞");
        bldr.put_cost_matrix_line("2 2").unwrap();
        for line in [
            "DEFAULT 0 1 0",
            "KANJI 0 0 2",
            "ALPHA 1 1 0",
            "0x0041..0x005A ALPHA",
            "0x4E00..0x9FFF KANJI",
        ] {
            bldr.put_char_def_line(line).unwrap();
        }
        bldr.put_unk_def_line("DEFAULT,1,1,10000,名詞")
            .put_unk_def_line("KANJI,1,1,8000,名詞")
            .put_unk_def_line("ALPHA,1,1,5000,名詞")
            .put_unk_def_line("ALPHA,1,1,6000,記号");
        bldr.build().unwrap()
    }

    fn surfaces(lattice: &Lattice, pos: usize) -> Vec<(String, NodeType)> {
        lattice
            .nodes_end_at(pos)
            .iter()
            .map(|n| (n.surface().to_owned(), n.node_type()))
            .collect()
    }

    #[test]
    fn known_words_suppress_unknown() {
        let dic = dictionary();
        let lattice = ViterbiBuilder::new(&dic).build("東京都");
        assert_eq!(
            surfaces(&lattice, 1),
            vec![("東".to_owned(), NodeType::Known)]
        );
        assert_eq!(
            surfaces(&lattice, 2),
            vec![("東京".to_owned(), NodeType::Known)]
        );
        // 都 has no entry of its own, KANJI is not always invoked
        assert_eq!(
            surfaces(&lattice, 3),
            vec![
                ("京都".to_owned(), NodeType::Known),
                ("都".to_owned(), NodeType::Unknown)
            ]
        );
        assert_eq!(lattice.eos_pos(), 4);
    }

    #[test]
    fn grouping_follows_category() {
        let dic = dictionary();
        let lattice = ViterbiBuilder::new(&dic).build("AB東");
        // ALPHA is grouped and has two templates
        let at_two = surfaces(&lattice, 2);
        assert_eq!(
            at_two,
            vec![
                ("AB".to_owned(), NodeType::Unknown),
                ("AB".to_owned(), NodeType::Unknown),
                ("B".to_owned(), NodeType::Unknown),
                ("B".to_owned(), NodeType::Unknown),
            ]
        );
        assert_eq!(lattice.nodes_end_at(2)[0].start_pos(), 1);
        assert_eq!(lattice.nodes_end_at(2)[0].length(), 2);
    }

    #[test]
    fn non_bmp_is_default() {
        let dic = dictionary();
        let lattice = ViterbiBuilder::new(&dic).build("𠮷東");
        let first = lattice.nodes_end_at(1);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].surface(), "𠮷");
        assert_eq!(first[0].cost(), 10000);
        assert_eq!(surfaces(&lattice, 2), vec![("東".to_owned(), NodeType::Known)]);
        assert_eq!(lattice.eos_pos(), 3);
    }
}
