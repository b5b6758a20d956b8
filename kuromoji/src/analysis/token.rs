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

use serde::Serialize;

use crate::analysis::node::NodeType;

/// Value of a feature the dictionary entry does not have
const MISSING_FEATURE: &str = "*";

/// A morpheme of the analyzed text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub word_id: u32,
    pub word_type: NodeType,
    /// 1-based position of the first character, counted in Unicode scalars
    pub word_position: usize,
    pub surface_form: String,
    pub pos: String,
    pub pos_detail_1: String,
    pub pos_detail_2: String,
    pub pos_detail_3: String,
    pub conjugated_type: String,
    pub conjugated_form: String,
    pub basic_form: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
}

/// Maps the comma separated features of a dictionary entry to a [`Token`]
pub trait TokenFormatter {
    /// `features` starts with the surface form of the entry
    fn format_entry(
        &self,
        word_id: u32,
        word_position: usize,
        word_type: NodeType,
        features: &[&str],
    ) -> Token;

    /// `features` starts with the category name of the template,
    /// the surface comes from the text
    fn format_unknown_entry(
        &self,
        word_id: u32,
        word_position: usize,
        word_type: NodeType,
        features: &[&str],
        surface_form: &str,
    ) -> Token;
}

/// Formatter of IPADIC features:
/// `pos, pos_detail_1..3, conjugated_type, conjugated_form, basic_form, reading, pronunciation`
#[derive(Debug, Default, Clone, Copy)]
pub struct IpadicFormatter;

fn feature(features: &[&str], index: usize) -> String {
    features
        .get(index)
        .copied()
        .unwrap_or(MISSING_FEATURE)
        .to_owned()
}

impl IpadicFormatter {
    fn base_token(
        word_id: u32,
        word_position: usize,
        word_type: NodeType,
        features: &[&str],
        surface_form: String,
    ) -> Token {
        Token {
            word_id,
            word_type,
            word_position,
            surface_form,
            pos: feature(features, 1),
            pos_detail_1: feature(features, 2),
            pos_detail_2: feature(features, 3),
            pos_detail_3: feature(features, 4),
            conjugated_type: feature(features, 5),
            conjugated_form: feature(features, 6),
            basic_form: feature(features, 7),
            reading: None,
            pronunciation: None,
        }
    }
}

impl TokenFormatter for IpadicFormatter {
    fn format_entry(
        &self,
        word_id: u32,
        word_position: usize,
        word_type: NodeType,
        features: &[&str],
    ) -> Token {
        let surface = features.first().copied().unwrap_or_default().to_owned();
        let mut token = Self::base_token(word_id, word_position, word_type, features, surface);
        token.reading = features.get(8).map(|s| s.to_string());
        token.pronunciation = features.get(9).map(|s| s.to_string());
        token
    }

    fn format_unknown_entry(
        &self,
        word_id: u32,
        word_position: usize,
        word_type: NodeType,
        features: &[&str],
        surface_form: &str,
    ) -> Token {
        Self::base_token(
            word_id,
            word_position,
            word_type,
            features,
            surface_form.to_owned(),
        )
    }
}
