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

#[macro_use]
extern crate lazy_static;

extern crate kuromoji;
use kuromoji::prelude::*;

mod common;
use common::{analyze, expected, TOKENIZER};

use NodeType::{Known, Unknown};

#[test]
fn empty_input() {
    assert!(analyze("").is_empty());
}

#[test]
fn single_known_word() {
    assert_eq!(analyze("東京"), expected(&[("東京", 1, Known)]));
}

#[test]
fn cheapest_segmentation() {
    assert_eq!(
        analyze("東京都に行く"),
        expected(&[
            ("東京", 1, Known),
            ("都", 3, Known),
            ("に", 4, Known),
            ("行く", 5, Known),
        ])
    );
}

#[test]
fn features_of_known_word() {
    let tokens = TOKENIZER.tokenize("行く").unwrap();
    assert_eq!(tokens.len(), 1);
    let t = &tokens[0];
    assert_eq!(t.pos, "動詞");
    assert_eq!(t.pos_detail_1, "自立");
    assert_eq!(t.conjugated_type, "五段・カ行促音便");
    assert_eq!(t.conjugated_form, "基本形");
    assert_eq!(t.basic_form, "行く");
    assert_eq!(t.reading.as_deref(), Some("イク"));
    assert_eq!(t.pronunciation.as_deref(), Some("イク"));
}

#[test]
fn katakana_is_grouped() {
    let tokens = TOKENIZER.tokenize("ケーキ").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].surface_form, "ケーキ");
    assert_eq!(tokens[0].word_type, Unknown);
    assert_eq!(tokens[0].pos, "名詞");
    assert_eq!(tokens[0].reading, None);
}

#[test]
fn category_change_ends_unknown_word() {
    assert_eq!(
        analyze("ABC123"),
        expected(&[("ABC", 1, Unknown), ("123", 4, Unknown)])
    );
}

#[test]
fn unknown_words_cover_the_input() {
    let text = "ケーキ ABC123ケーキ";
    let tokens = TOKENIZER.tokenize(text).unwrap();
    assert!(tokens.iter().all(|t| t.word_type == Unknown));
    let joined: String = tokens.iter().map(|t| t.surface_form.as_str()).collect();
    assert_eq!(joined, text);
    let positions: Vec<_> = tokens.iter().map(|t| t.word_position).collect();
    assert_eq!(positions, vec![1, 4, 5, 8, 11]);
}

#[test]
fn supplementary_plane_character() {
    let tokens = TOKENIZER.tokenize("東京𠮷に").unwrap();
    let got: Vec<_> = tokens
        .iter()
        .map(|t| (t.surface_form.as_str(), t.word_position, t.word_type))
        .collect();
    assert_eq!(
        got,
        vec![("東京", 1, Known), ("𠮷", 3, Unknown), ("に", 4, Known)]
    );
    // DEFAULT template
    assert_eq!(tokens[1].pos_detail_1, "一般");
}

#[test]
fn positions_continue_across_sentences() {
    assert_eq!(
        analyze("東京。都"),
        expected(&[("東京", 1, Known), ("。", 3, Unknown), ("都", 4, Known)])
    );
}

#[test]
fn tokens_serialize_to_json() {
    let tokens = TOKENIZER.tokenize("東京").unwrap();
    let json = serde_json::to_value(&tokens).unwrap();
    assert_eq!(json[0]["surfaceForm"], "東京");
    assert_eq!(json[0]["wordType"], "KNOWN");
    assert_eq!(json[0]["wordPosition"], 1);
    assert_eq!(json[0]["reading"], "トウキョウ");
}
