// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Looking up the search keywords of an action label.
//!
//! This is the consumer side of the mapping file: the HUD matches the
//! (translated) label of a menu item and wants the extra keywords for
//! it. Translators can override the keywords from the mapping file by
//! translating the `hud-keywords:<label>` entry as a `;` separated
//! list.

use std::collections::HashMap;

use log::debug;

use crate::catalog::Catalog;
use crate::mapping::KeywordMapping;
use crate::KEYWORD_PREFIX;

/// Keywords by label.
#[derive(Debug, Clone, Default)]
pub struct KeywordLookup {
    keywords: HashMap<String, Vec<String>>,
}

impl KeywordLookup {
    /// Build the lookup table from `mapping`.
    ///
    /// With a `catalog`, labels are the translated original strings and
    /// a translated `hud-keywords:` entry replaces the keywords from
    /// the mapping file. Blank keyword names are dropped.
    pub fn new(mapping: &KeywordMapping, catalog: Option<&Catalog>) -> Self {
        let mut keywords = HashMap::new();
        for entry in &mapping.mappings {
            let label = catalog
                .and_then(|catalog| translation(catalog, &entry.original))
                .unwrap_or(&entry.original);

            let keyword_msgid = format!("{KEYWORD_PREFIX}{}", entry.original);
            let translated_keywords =
                catalog.and_then(|catalog| translation(catalog, &keyword_msgid));
            let names = match translated_keywords {
                Some(list) => {
                    debug!("Using translated keywords for {:?}", entry.original);
                    split_keywords(list)
                }
                None => entry
                    .keywords
                    .iter()
                    .filter(|name| !name.is_empty())
                    .cloned()
                    .collect(),
            };
            keywords.insert(label.to_string(), names);
        }
        Self { keywords }
    }

    /// The keywords for `label`, empty if there are none.
    pub fn keywords_for(&self, label: &str) -> &[String] {
        self.keywords.get(label).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// The translation of `msgid`, if the catalog has a usable one.
fn translation<'a>(catalog: &'a Catalog, msgid: &str) -> Option<&'a str> {
    catalog
        .find(None, msgid)
        .filter(|entry| entry.is_translated() && !entry.is_fuzzy())
        .map(|entry| entry.msgstr.as_str())
}

fn split_keywords(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(String::from)
        .collect()
}
