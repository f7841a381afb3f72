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

//! The keyword mapping XML file.
//!
//! The file associates each translatable string with the keyword
//! names a human picked for it:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <keywordMapping>
//!   <mapping original="Open Ta_b">
//!     <keyword name="New Tab"/>
//!     <keyword name="Another Tab"/>
//!   </mapping>
//! </keywordMapping>
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attributes;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

const ROOT: &str = "keywordMapping";
const MAPPING: &str = "mapping";
const KEYWORD: &str = "keyword";

/// The keyword names for one original string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    pub original: String,
    pub keywords: Vec<String>,
}

impl Mapping {
    pub fn new(original: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            original: original.into(),
            keywords,
        }
    }
}

/// The contents of a keyword mapping file, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordMapping {
    pub mappings: Vec<Mapping>,
}

/// The kind of an open element while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Root,
    Mapping,
    Keyword,
    /// Anything we do not read, including its children.
    Other,
}

impl KeywordMapping {
    /// Read the mapping file at `path`.
    ///
    /// Returns `None` if there is no file or the file is empty.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if content.is_empty() {
            debug!("Ignoring empty keyword mapping {}", path.display());
            return Ok(None);
        }
        Self::parse_str(&content).map(Some)
    }

    /// Parse mapping file content.
    ///
    /// Only `mapping` elements directly inside the `keywordMapping`
    /// root and `keyword` elements directly inside a `mapping` are
    /// read. Anything else is skipped together with its children.
    pub fn parse_str(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut mappings = Vec::new();
        let mut current: Option<Mapping> = None;
        let mut open: Vec<Element> = Vec::new();
        let mut seen_root = false;

        loop {
            let event = reader.read_event()?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = e.name();
                    let element = match (open.last(), name.as_ref()) {
                        (None, _) if seen_root => {
                            return Err(Error::Xml(String::from("multiple root elements")));
                        }
                        (None, name) => {
                            seen_root = true;
                            if name == ROOT.as_bytes() {
                                Element::Root
                            } else {
                                debug!("Unexpected root element, no mappings read");
                                Element::Other
                            }
                        }
                        (Some(Element::Root), name) if name == MAPPING.as_bytes() => {
                            // A mapping without an original string cannot be
                            // matched against anything, so it is dropped.
                            current = attribute(e.attributes(), "original")?
                                .map(|original| Mapping::new(original, Vec::new()));
                            Element::Mapping
                        }
                        (Some(Element::Mapping), name) if name == KEYWORD.as_bytes() => {
                            let keyword = attribute(e.attributes(), "name")?;
                            if let Some(mapping) = current.as_mut() {
                                mapping.keywords.push(keyword.unwrap_or_default());
                            }
                            Element::Keyword
                        }
                        _ => Element::Other,
                    };
                    if is_empty {
                        close(element, &mut current, &mut mappings);
                    } else {
                        open.push(element);
                    }
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| Error::Xml(String::from("unexpected closing tag")))?;
                    close(element, &mut current, &mut mappings);
                }
                Event::Text(ref text) if open.is_empty() => {
                    let text = text.unescape()?;
                    if !text.trim().is_empty() {
                        return Err(Error::Xml(format!(
                            "text outside the root element: {text:?}"
                        )));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(Error::Xml(String::from("no root element")));
        }
        if !open.is_empty() {
            return Err(Error::Xml(String::from("unexpected end of document")));
        }
        Ok(Self { mappings })
    }

    /// Format the mapping as an indented XML document.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
        for mapping in &self.mappings {
            let mut element = BytesStart::new(MAPPING);
            let original = escape_attribute(&mapping.original);
            element.push_attribute(("original".as_bytes(), original.as_bytes()));
            if mapping.keywords.is_empty() {
                writer.write_event(Event::Empty(element))?;
                continue;
            }
            writer.write_event(Event::Start(element))?;
            for keyword in &mapping.keywords {
                let mut element = BytesStart::new(KEYWORD);
                let name = escape_attribute(keyword);
                element.push_attribute(("name".as_bytes(), name.as_bytes()));
                writer.write_event(Event::Empty(element))?;
            }
            writer.write_event(Event::End(BytesEnd::new(MAPPING)))?;
        }
        writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|err| Error::Xml(err.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }

    /// Write the mapping to `path`, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_xml_string()?).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Map each original string to its keyword names.
    ///
    /// If an original string appears more than once, the last mapping
    /// wins.
    pub fn by_original(&self) -> HashMap<&str, &[String]> {
        self.mappings
            .iter()
            .map(|mapping| (mapping.original.as_str(), mapping.keywords.as_slice()))
            .collect()
    }
}

fn close(element: Element, current: &mut Option<Mapping>, mappings: &mut Vec<Mapping>) {
    if element == Element::Mapping {
        mappings.extend(current.take());
    }
}

/// Escape an attribute value, including the whitespace characters an
/// XML reader would otherwise normalise to spaces.
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

/// Find and unescape the attribute `name`.
fn attribute(attributes: Attributes, name: &str) -> Result<Option<String>> {
    for attr in attributes {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
