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

//! A single record in a Gettext catalog.

use std::fmt::{self, Display, Formatter};

use crate::KEYWORD_PREFIX;

/// A source location from a `#:` comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occurrence {
    pub file: String,
    pub line: Option<usize>,
}

impl Occurrence {
    pub fn new(file: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Parse a single `file:line` token. Tokens without a numeric
    /// line suffix are kept as a bare file name.
    pub fn parse(token: &str) -> Self {
        match token.rsplit_once(':') {
            Some((file, line)) if !file.is_empty() => match line.parse() {
                Ok(line) => Self::new(file, Some(line)),
                Err(_) => Self::new(token, None),
            },
            _ => Self::new(token, None),
        }
    }
}

impl Display for Occurrence {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file),
            None => write!(f, "{}", self.file),
        }
    }
}

/// A catalog entry.
///
/// Two entries are the same entry only if every field matches, so the
/// derived `PartialEq` is what decides whether a keyword entry is
/// already present in a catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: String,
    pub msgstr_plural: Vec<String>,
    /// Lines from `# ` comments, joined with newlines.
    pub translator_comment: String,
    /// Lines from `#.` comments, joined with newlines.
    pub extracted_comment: String,
    pub occurrences: Vec<Occurrence>,
    pub flags: Vec<String>,
    pub previous_msgctxt: Option<String>,
    pub previous_msgid: Option<String>,
    pub previous_msgid_plural: Option<String>,
    pub obsolete: bool,
}

impl CatalogEntry {
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        Self {
            msgid: msgid.into(),
            msgstr: msgstr.into(),
            ..Self::default()
        }
    }

    /// The header entry carries the catalog metadata, it is not a
    /// translatable string.
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none()
    }

    pub fn is_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.has_flag("fuzzy")
    }

    pub fn is_translated(&self) -> bool {
        if self.is_plural() {
            !self.msgstr_plural.is_empty() && self.msgstr_plural.iter().all(|s| !s.is_empty())
        } else {
            !self.msgstr.is_empty()
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Add `flag` unless it is already set.
    pub fn add_flag(&mut self, flag: &str) {
        if !self.has_flag(flag) {
            self.flags.push(flag.to_string());
        }
    }

    /// Returns `true` if this is a synthesized `hud-keywords:` entry.
    pub fn is_keyword_entry(&self) -> bool {
        self.msgid.starts_with(KEYWORD_PREFIX)
    }

    /// Returns `true` if a keyword entry should be derived from this
    /// entry.
    pub fn is_keyword_source(&self) -> bool {
        !self.obsolete && !self.is_header() && !self.is_keyword_entry()
    }

    /// Build the keyword placeholder for this entry.
    ///
    /// The new entry has an empty `msgstr` and copies the context,
    /// comments, occurrences, flags and previous fields. It is never a
    /// plural entry.
    pub fn keyword_entry(&self) -> CatalogEntry {
        CatalogEntry {
            msgctxt: self.msgctxt.clone(),
            msgid: format!("{KEYWORD_PREFIX}{}", self.msgid),
            msgid_plural: None,
            msgstr: String::new(),
            msgstr_plural: Vec::new(),
            translator_comment: self.translator_comment.clone(),
            extracted_comment: self.extracted_comment.clone(),
            occurrences: self.occurrences.clone(),
            flags: self.flags.clone(),
            previous_msgctxt: self.previous_msgctxt.clone(),
            previous_msgid: self.previous_msgid.clone(),
            previous_msgid_plural: self.previous_msgid_plural.clone(),
            obsolete: false,
        }
    }

    /// The lookup key of this entry inside a catalog.
    pub fn key(&self) -> (Option<&str>, &str) {
        (self.msgctxt.as_deref(), &self.msgid)
    }
}
