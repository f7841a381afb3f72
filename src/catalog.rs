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

use crate::entry::CatalogEntry;

/// An ordered list of catalog entries, as read from a PO file.
///
/// The header entry (empty `msgid`) is stored like any other entry and
/// keeps its position in the list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn contains(&self, entry: &CatalogEntry) -> bool {
        self.entries.contains(entry)
    }

    pub fn header(&self) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.is_header() && !entry.obsolete)
    }

    /// Find the live (non-obsolete) entry with the given key.
    pub fn find(&self, msgctxt: Option<&str>, msgid: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| !entry.obsolete && entry.key() == (msgctxt, msgid))
    }

    /// Read a field such as `Language` from the header.
    pub fn metadata(&self, field: &str) -> Option<&str> {
        self.header()?.msgstr.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            (name.trim() == field).then(|| value.trim())
        })
    }

    pub fn language(&self) -> Option<&str> {
        self.metadata("Language").filter(|lang| !lang.is_empty())
    }
}

impl Extend<CatalogEntry> for Catalog {
    fn extend<T: IntoIterator<Item = CatalogEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
