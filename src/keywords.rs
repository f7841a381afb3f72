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

//! Adding `hud-keywords:` entries to a catalog and writing the keyword
//! mapping file for it.

use std::path::Path;

use log::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::mapping::{KeywordMapping, Mapping};
use crate::po_file;

/// Number of blank keyword names written for a string which has no
/// keywords yet.
pub const DEFAULT_KEYWORD_COUNT: usize = 2;

/// Append a keyword entry for every translatable entry in `catalog`.
///
/// The candidates are computed against the entries present before the
/// call, so the appended keyword entries are never used as sources
/// themselves. A candidate is skipped if the catalog already has an
/// identical entry, or any live entry with the same `msgctxt` and
/// `msgid` (such as a keyword entry a translator already filled in).
/// Calling this twice is the same as calling it once.
///
/// Returns the number of entries appended.
pub fn derive_keyword_entries(catalog: &mut Catalog) -> usize {
    let mut keyword_entries = Vec::new();
    for entry in catalog.entries() {
        if !entry.is_keyword_source() {
            continue;
        }

        let keyword_entry = entry.keyword_entry();
        if catalog.contains(&keyword_entry) || keyword_entries.contains(&keyword_entry) {
            debug!("Keyword entry for {:?} already present", entry.msgid);
            continue;
        }
        let (msgctxt, msgid) = keyword_entry.key();
        if catalog.find(msgctxt, msgid).is_some() {
            warn!("Keeping existing entry {msgid:?}");
            continue;
        }
        keyword_entries.push(keyword_entry);
    }

    let count = keyword_entries.len();
    catalog.extend(keyword_entries);
    count
}

/// Build the keyword mapping for the translatable strings of `catalog`.
///
/// Strings found in `existing` keep their keyword names exactly as
/// they are. All other strings get [`DEFAULT_KEYWORD_COUNT`] blank
/// names for a human to fill in.
pub fn keyword_mapping(catalog: &Catalog, existing: Option<&KeywordMapping>) -> KeywordMapping {
    let existing = existing.map(KeywordMapping::by_original).unwrap_or_default();
    let mappings = catalog
        .entries()
        .iter()
        .filter(|entry| entry.is_keyword_source())
        .map(|entry| {
            let keywords = match existing.get(entry.msgid.as_str()) {
                Some(keywords) => keywords.to_vec(),
                None => vec![String::new(); DEFAULT_KEYWORD_COUNT],
            };
            Mapping::new(entry.msgid.clone(), keywords)
        })
        .collect();
    KeywordMapping { mappings }
}

/// A PO file together with its keyword entries.
///
/// The catalog is read once. `original` is the catalog as read,
/// `working` has the keyword entries appended.
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    original: Catalog,
    working: Catalog,
}

impl KeywordCatalog {
    /// Read the PO file at `path` and add keyword entries.
    pub fn load(path: &Path) -> Result<Self> {
        let catalog = po_file::parse(path)?;
        Ok(Self::new(catalog))
    }

    pub fn new(catalog: Catalog) -> Self {
        let mut working = catalog.clone();
        let added = derive_keyword_entries(&mut working);
        info!("Added {added} keyword entries to {} entries", catalog.len());
        Self {
            original: catalog,
            working,
        }
    }

    pub fn original(&self) -> &Catalog {
        &self.original
    }

    pub fn working(&self) -> &Catalog {
        &self.working
    }

    /// Write the catalog with keyword entries to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        po_file::write(&self.working, path)
    }

    /// Write the keyword mapping file to `path`.
    ///
    /// Keyword names from a mapping file already at `path` are kept. A
    /// malformed file is an error, it is never silently replaced.
    pub fn save_xml(&self, path: &Path) -> Result<()> {
        let existing = KeywordMapping::read(path)?;
        if let Some(existing) = &existing {
            debug!(
                "Merging {} existing mappings from {}",
                existing.mappings.len(),
                path.display()
            );
        }
        keyword_mapping(&self.original, existing.as_ref()).write(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{CatalogEntry, Occurrence};
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use std::fs;

    const INPUT: &str = r#"# SOME DESCRIPTIVE TITLE.
# Copyright (C) YEAR THE PACKAGE'S COPYRIGHT HOLDER
# This file is distributed under the same license as the PACKAGE package.
# FIRST AUTHOR <EMAIL@ADDRESS>, YEAR.
#
#, fuzzy
msgid ""
msgstr ""
"Project-Id-Version: hellogt 1.2\n"
"Report-Msgid-Bugs-To: \n"
"POT-Creation-Date: 2012-11-21 14:24+0000\n"
"PO-Revision-Date: YEAR-MO-DA HO:MI+ZONE\n"
"Last-Translator: FULL NAME <EMAIL@ADDRESS>\n"
"Language-Team: LANGUAGE <LL@li.org>\n"
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=CHARSET\n"
"Content-Transfer-Encoding: 8bit\n"
"Language: \n"

#: hellogt.cxx:16
msgid "hello, world!"
msgstr ""

#: hellogt.cxx:17 hellogt.cxx:19
msgid "another string"
msgstr ""

#: hellogt.cxx:20
msgid "another string 2"
msgstr ""
"#;

    const KEYWORD_ENTRIES: &str = r#"
#: hellogt.cxx:16
msgid "hud-keywords:hello, world!"
msgstr ""

#: hellogt.cxx:17 hellogt.cxx:19
msgid "hud-keywords:another string"
msgstr ""

#: hellogt.cxx:20
msgid "hud-keywords:another string 2"
msgstr ""
"#;

    const XML_OUTPUT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<keywordMapping>
  <mapping original="hello, world!">
    <keyword name=""/>
    <keyword name=""/>
  </mapping>
  <mapping original="another string">
    <keyword name=""/>
    <keyword name=""/>
  </mapping>
  <mapping original="another string 2">
    <keyword name=""/>
    <keyword name=""/>
  </mapping>
</keywordMapping>
"#;

    const XML_INPUT: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<keywordMapping>
  <mapping original="another string">
    <keyword name="yo yo another"/>
  </mapping>
</keywordMapping>
"#;

    const XML_OUTPUT_EXISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<keywordMapping>
  <mapping original="hello, world!">
    <keyword name=""/>
    <keyword name=""/>
  </mapping>
  <mapping original="another string">
    <keyword name="yo yo another"/>
  </mapping>
  <mapping original="another string 2">
    <keyword name=""/>
    <keyword name=""/>
  </mapping>
</keywordMapping>
"#;

    fn load_input() -> KeywordCatalog {
        KeywordCatalog::new(po_file::parse_str(INPUT).unwrap())
    }

    fn msgids(catalog: &Catalog) -> Vec<&str> {
        catalog
            .entries()
            .iter()
            .map(|entry| entry.msgid.as_str())
            .collect()
    }

    #[test]
    fn test_save() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let input = tmpdir.path().join("input.po");
        let output = tmpdir.path().join("output.po");
        fs::write(&input, INPUT)?;

        KeywordCatalog::load(&input)?.save(&output)?;

        assert_eq!(fs::read_to_string(&output)?, format!("{INPUT}{KEYWORD_ENTRIES}"));
        // The input is only read.
        assert_eq!(fs::read_to_string(&input)?, INPUT);
        Ok(())
    }

    #[test]
    fn test_save_overwrites() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("output.po");
        fs::write(&output, "this is not a PO file\n")?;

        load_input().save(&output)?;

        assert_eq!(fs::read_to_string(&output)?, format!("{INPUT}{KEYWORD_ENTRIES}"));
        Ok(())
    }

    #[test]
    fn test_save_xml() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("keywords.xml");

        load_input().save_xml(&output)?;

        assert_eq!(fs::read_to_string(&output)?, XML_OUTPUT);
        Ok(())
    }

    #[test]
    fn test_save_xml_keeps_existing_keywords() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("keywords.xml");
        fs::write(&output, XML_INPUT)?;

        load_input().save_xml(&output)?;

        assert_eq!(fs::read_to_string(&output)?, XML_OUTPUT_EXISTING);
        Ok(())
    }

    #[test]
    fn test_save_xml_twice_is_stable() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("keywords.xml");
        fs::write(&output, XML_INPUT)?;

        let catalog = load_input();
        catalog.save_xml(&output)?;
        catalog.save_xml(&output)?;

        assert_eq!(fs::read_to_string(&output)?, XML_OUTPUT_EXISTING);
        Ok(())
    }

    #[test]
    fn test_save_xml_empty_existing_file() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("keywords.xml");
        fs::write(&output, "")?;

        load_input().save_xml(&output)?;

        assert_eq!(fs::read_to_string(&output)?, XML_OUTPUT);
        Ok(())
    }

    #[test]
    fn test_save_xml_blank_existing_file() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("keywords.xml");
        let blank = "   \n\n  ";
        fs::write(&output, blank)?;

        let result = load_input().save_xml(&output);

        assert!(matches!(result, Err(Error::Xml(_))), "{result:?}");
        assert_eq!(fs::read_to_string(&output)?, blank);
        Ok(())
    }

    #[test]
    fn test_save_xml_multiline_msgid() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let input = tmpdir.path().join("input.po");
        let output = tmpdir.path().join("keywords.xml");
        fs::write(&input, "msgid \"\"\n\"line one\\n\"\n\"line two\"\nmsgstr \"\"\n")?;

        let catalog = KeywordCatalog::load(&input)?;
        catalog.save_xml(&output)?;
        catalog.save_xml(&output)?;

        let mapping = KeywordMapping::read(&output)?.unwrap();
        assert_eq!(
            mapping.mappings,
            vec![Mapping::new("line one\nline two", vec![String::new(); 2])]
        );
        assert!(fs::read_to_string(&output)?.contains("original=\"line one&#10;line two\""));
        Ok(())
    }

    #[test]
    fn test_save_xml_malformed_existing_file() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("keywords.xml");
        let corrupt = "<keywordMapping><mapping original=\"another string\">";
        fs::write(&output, corrupt)?;

        let result = load_input().save_xml(&output);

        assert!(matches!(result, Err(Error::Xml(_))), "{result:?}");
        assert_eq!(fs::read_to_string(&output)?, corrupt);
        Ok(())
    }

    #[test]
    fn test_derive_appends_after_originals() {
        let catalog = load_input();
        assert_eq!(
            msgids(catalog.working()),
            vec![
                "",
                "hello, world!",
                "another string",
                "another string 2",
                "hud-keywords:hello, world!",
                "hud-keywords:another string",
                "hud-keywords:another string 2",
            ]
        );
        assert_eq!(catalog.original().len(), 4);
        for entry in &catalog.working().entries()[4..] {
            assert_eq!(entry.msgstr, "");
        }
    }

    #[test]
    fn test_derive_is_idempotent() {
        let mut catalog = po_file::parse_str(INPUT).unwrap();
        assert_eq!(derive_keyword_entries(&mut catalog), 3);
        let once = catalog.clone();
        assert_eq!(derive_keyword_entries(&mut catalog), 0);
        assert_eq!(catalog, once);
    }

    #[test]
    fn test_derive_skips_obsolete_and_keyword_entries() {
        let mut obsolete = CatalogEntry::new("gone", "parti");
        obsolete.obsolete = true;
        let mut catalog: Catalog = [
            CatalogEntry::new("live", ""),
            obsolete,
            CatalogEntry::new("hud-keywords:manual", ""),
        ]
        .into_iter()
        .collect();

        derive_keyword_entries(&mut catalog);

        assert_eq!(
            msgids(&catalog),
            vec!["live", "gone", "hud-keywords:manual", "hud-keywords:live"]
        );
    }

    #[test]
    fn test_derive_keeps_translated_keyword_entry() {
        let mut source = CatalogEntry::new("Open Tab", "Ouvrir un onglet");
        source.occurrences = vec![Occurrence::new("menu.c", Some(3))];
        let mut translated = source.keyword_entry();
        translated.msgstr = String::from("Nouvel onglet; Onglet");
        let mut catalog: Catalog = [source, translated.clone()].into_iter().collect();

        assert_eq!(derive_keyword_entries(&mut catalog), 0);
        assert_eq!(catalog.entries()[1], translated);
    }

    #[test]
    fn test_derive_separates_contexts() {
        let mut menu = CatalogEntry::new("Open", "");
        menu.msgctxt = Some(String::from("menu"));
        let mut catalog: Catalog = [CatalogEntry::new("Open", ""), menu].into_iter().collect();

        assert_eq!(derive_keyword_entries(&mut catalog), 2);
        let contexts = catalog.entries()[2..]
            .iter()
            .map(|entry| entry.msgctxt.as_deref())
            .collect::<Vec<_>>();
        assert_eq!(contexts, vec![None, Some("menu")]);
    }

    #[test]
    fn test_keyword_mapping_uses_original_catalog() {
        let catalog = load_input();
        let mapping = keyword_mapping(catalog.original(), None);
        let originals = mapping
            .mappings
            .iter()
            .map(|mapping| mapping.original.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            originals,
            vec!["hello, world!", "another string", "another string 2"]
        );
        assert!(mapping
            .mappings
            .iter()
            .all(|mapping| mapping.keywords == vec![String::new(), String::new()]));
    }

    #[test]
    fn test_keyword_mapping_keeps_existing_count() {
        let existing = KeywordMapping {
            mappings: vec![
                Mapping::new("hello, world!", Vec::new()),
                Mapping::new(
                    "another string 2",
                    vec!["a".into(), "".into(), "c".into()],
                ),
                Mapping::new("not in catalog", vec!["dropped".into()]),
            ],
        };
        let mapping = keyword_mapping(load_input().original(), Some(&existing));
        assert_eq!(
            mapping.mappings,
            vec![
                Mapping::new("hello, world!", Vec::new()),
                Mapping::new("another string", vec![String::new(), String::new()]),
                Mapping::new(
                    "another string 2",
                    vec!["a".into(), "".into(), "c".into()],
                ),
            ]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        assert!(KeywordCatalog::load(&tmpdir.path().join("missing.po")).is_err());
    }

    #[test]
    fn test_load_malformed_file() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let input = tmpdir.path().join("input.po");
        fs::write(&input, "msgid \"unterminated\n")?;
        assert!(matches!(
            KeywordCatalog::load(&input),
            Err(Error::Po { line: 1, .. })
        ));
        Ok(())
    }
}
