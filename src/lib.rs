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

//! Helpers for HUD search keywords in Gettext catalogs.
//!
//! The HUD lets users search menu items by their label and by extra
//! keywords. The keywords live in two places:
//!
//! * a `hud-keywords:<label>` entry in the application's PO file,
//!   which translators can fill in with a `;` separated list, and
//! * a keyword mapping XML file listing the keyword names for each
//!   label in the source language.
//!
//! [`KeywordCatalog`] adds the `hud-keywords:` entries to a catalog and
//! writes the mapping file, keeping any keyword names which were
//! already filled in. [`KeywordLookup`] answers which keywords belong
//! to a label.
//!
//! # Examples
//!
//! ```
//! use hud_keywords::{derive_keyword_entries, po_file};
//!
//! let mut catalog = po_file::parse_str("msgid \"Open Tab\"\nmsgstr \"\"\n").unwrap();
//! assert_eq!(derive_keyword_entries(&mut catalog), 1);
//! assert_eq!(catalog.entries()[1].msgid, "hud-keywords:Open Tab");
//! ```

pub mod catalog;
pub mod cli;
pub mod entry;
pub mod error;
pub mod keywords;
pub mod lookup;
pub mod mapping;
pub mod po_file;

pub use catalog::Catalog;
pub use entry::{CatalogEntry, Occurrence};
pub use error::{Error, Result};
pub use keywords::{derive_keyword_entries, keyword_mapping, KeywordCatalog};
pub use lookup::KeywordLookup;
pub use mapping::{KeywordMapping, Mapping};

/// Prefix marking the keyword entry of a translatable string.
pub const KEYWORD_PREFIX: &str = "hud-keywords:";
