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

//! Reading and writing Gettext PO files.
//!
//! The parser keeps everything needed to write the catalog back out:
//! translator and extracted comments, source references, flags, the
//! `#|` previous fields and `#~` obsolete entries.

use std::fs;
use std::path::Path;

use log::debug;

use crate::catalog::Catalog;
use crate::entry::{CatalogEntry, Occurrence};
use crate::error::{Error, Result};

/// Source references are wrapped to keep `#:` lines below this width.
const REFERENCE_WIDTH: usize = 79;

/// Parse the PO file at `path`.
pub fn parse(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_str(&content)?;
    debug!("Parsed {} entries from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Parse PO file content.
pub fn parse_str(content: &str) -> Result<Catalog> {
    let mut parser = Parser::default();
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    for (idx, line) in content.lines().enumerate() {
        parser.line = idx + 1;
        parser.parse_line(line.trim_end())?;
    }
    parser.finish_entry()?;
    Ok(parser.catalog)
}

/// Write `catalog` to `path`, replacing any existing file.
pub fn write(catalog: &Catalog, path: &Path) -> Result<()> {
    fs::write(path, to_string(catalog)).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Format `catalog` as PO file content.
pub fn to_string(catalog: &Catalog) -> String {
    catalog
        .entries()
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrPlural(usize),
    PreviousMsgctxt,
    PreviousMsgid,
    PreviousMsgidPlural,
}

#[derive(Default)]
struct Parser {
    catalog: Catalog,
    entry: CatalogEntry,
    line: usize,
    field: Option<Field>,
    /// Line number of the first keyword line of the current entry.
    started: Option<usize>,
    has_msgid: bool,
    has_msgstr: bool,
    has_comments: bool,
}

impl Parser {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::Po {
            line: self.line,
            message: message.into(),
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<()> {
        if line.trim_start().is_empty() {
            if self.started.is_some() {
                self.finish_entry()?;
            }
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("#~") {
            let rest = rest.trim_start();
            if let Some(previous) = rest.strip_prefix('|') {
                self.start_comment()?;
                return self.parse_previous(previous.trim_start());
            }
            if rest.is_empty() {
                return Ok(());
            }
            self.parse_message_line(rest)?;
            self.entry.obsolete = true;
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix('#') {
            self.start_comment()?;
            return self.parse_comment(rest);
        }

        self.parse_message_line(line.trim_start())
    }

    /// A comment after message lines starts the next entry.
    fn start_comment(&mut self) -> Result<()> {
        if self.started.is_some() {
            self.finish_entry()?;
        }
        self.has_comments = true;
        Ok(())
    }

    fn parse_comment(&mut self, rest: &str) -> Result<()> {
        if let Some(content) = rest.strip_prefix('.') {
            push_line(&mut self.entry.extracted_comment, strip_space(content));
        } else if let Some(content) = rest.strip_prefix(':') {
            self.entry
                .occurrences
                .extend(content.split_whitespace().map(Occurrence::parse));
        } else if let Some(content) = rest.strip_prefix(',') {
            for flag in content.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                self.entry.add_flag(flag);
            }
        } else if let Some(content) = rest.strip_prefix('|') {
            self.parse_previous(content.trim_start())?;
        } else {
            push_line(&mut self.entry.translator_comment, strip_space(rest));
        }
        Ok(())
    }

    fn parse_previous(&mut self, content: &str) -> Result<()> {
        let (field, value) = if let Some(rest) = content.strip_prefix("msgctxt") {
            (Field::PreviousMsgctxt, rest)
        } else if let Some(rest) = content.strip_prefix("msgid_plural") {
            (Field::PreviousMsgidPlural, rest)
        } else if let Some(rest) = content.strip_prefix("msgid") {
            (Field::PreviousMsgid, rest)
        } else if content.starts_with('"') {
            return match self.field {
                Some(
                    field @ (Field::PreviousMsgctxt
                    | Field::PreviousMsgid
                    | Field::PreviousMsgidPlural),
                ) => {
                    let value = self.parse_quoted(content)?;
                    self.append(field, &value);
                    Ok(())
                }
                _ => Err(self.error("continuation of a previous field without a keyword")),
            };
        } else {
            return Err(self.error(format!("unknown previous field: {content:?}")));
        };

        let value = self.parse_quoted(value.trim_start())?;
        let slot = match field {
            Field::PreviousMsgctxt => &mut self.entry.previous_msgctxt,
            Field::PreviousMsgidPlural => &mut self.entry.previous_msgid_plural,
            _ => &mut self.entry.previous_msgid,
        };
        *slot = Some(value);
        self.field = Some(field);
        Ok(())
    }

    fn parse_message_line(&mut self, line: &str) -> Result<()> {
        if line.starts_with('"') {
            let field = match self.field {
                Some(field) if self.started.is_some() => field,
                _ => return Err(self.error("string outside an entry")),
            };
            let value = self.parse_quoted(line)?;
            self.append(field, &value);
            return Ok(());
        }

        let (keyword, rest) = line
            .split_once(|c: char| c.is_whitespace())
            .unwrap_or((line, ""));

        // Entries are not always separated by blank lines.
        if matches!(keyword, "msgctxt" | "msgid") && self.has_msgstr {
            self.finish_entry()?;
        }
        if self.started.is_none() {
            self.started = Some(self.line);
        }

        let field = match keyword {
            "msgctxt" => Field::Msgctxt,
            "msgid" => {
                self.has_msgid = true;
                Field::Msgid
            }
            "msgid_plural" => Field::MsgidPlural,
            "msgstr" => {
                self.has_msgstr = true;
                Field::Msgstr
            }
            _ => match keyword
                .strip_prefix("msgstr[")
                .and_then(|idx| idx.strip_suffix(']'))
            {
                Some(idx) => {
                    let idx = idx
                        .parse()
                        .map_err(|_| self.error(format!("invalid plural index: {idx:?}")))?;
                    // Plural forms are numbered from zero without gaps.
                    if idx > self.entry.msgstr_plural.len() {
                        return Err(self.error(format!("plural index out of order: {idx}")));
                    }
                    self.has_msgstr = true;
                    Field::MsgstrPlural(idx)
                }
                None => return Err(self.error(format!("unknown keyword: {keyword:?}"))),
            },
        };

        let value = self.parse_quoted(rest.trim_start())?;
        match field {
            Field::Msgctxt => self.entry.msgctxt = Some(value),
            Field::Msgid => self.entry.msgid = value,
            Field::MsgidPlural => self.entry.msgid_plural = Some(value),
            Field::Msgstr => self.entry.msgstr = value,
            Field::MsgstrPlural(idx) => {
                let plurals = &mut self.entry.msgstr_plural;
                match plurals.get_mut(idx) {
                    Some(plural) => *plural = value,
                    None => plurals.push(value),
                }
            }
            _ => unreachable!("previous fields are parsed from comments"),
        }
        self.field = Some(field);
        Ok(())
    }

    fn append(&mut self, field: Field, value: &str) {
        let target = match field {
            Field::Msgctxt => self.entry.msgctxt.get_or_insert_with(String::new),
            Field::Msgid => &mut self.entry.msgid,
            Field::MsgidPlural => self.entry.msgid_plural.get_or_insert_with(String::new),
            Field::Msgstr => &mut self.entry.msgstr,
            Field::MsgstrPlural(idx) => &mut self.entry.msgstr_plural[idx],
            Field::PreviousMsgctxt => self.entry.previous_msgctxt.get_or_insert_with(String::new),
            Field::PreviousMsgid => self.entry.previous_msgid.get_or_insert_with(String::new),
            Field::PreviousMsgidPlural => self
                .entry
                .previous_msgid_plural
                .get_or_insert_with(String::new),
        };
        target.push_str(value);
    }

    fn parse_quoted(&self, s: &str) -> Result<String> {
        let body = s
            .strip_prefix('"')
            .ok_or_else(|| self.error(format!("expected a quoted string, found {s:?}")))?;
        let mut result = String::with_capacity(body.len());
        let mut chars = body.chars();
        loop {
            match chars.next() {
                None => return Err(self.error("unterminated string")),
                Some('"') => break,
                Some('\\') => {
                    let escaped = match chars.next() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('a') => '\u{07}',
                        Some('b') => '\u{08}',
                        Some('f') => '\u{0c}',
                        Some('v') => '\u{0b}',
                        Some(c) => {
                            return Err(self.error(format!("invalid escape sequence: \\{c}")))
                        }
                        None => return Err(self.error("unterminated string")),
                    };
                    result.push(escaped);
                }
                Some(c) => result.push(c),
            }
        }
        let trailing = chars.as_str().trim();
        if !trailing.is_empty() {
            return Err(self.error(format!("unexpected text after string: {trailing:?}")));
        }
        Ok(result)
    }

    fn finish_entry(&mut self) -> Result<()> {
        let entry = std::mem::take(&mut self.entry);
        let started = self.started.take();
        let has_msgid = std::mem::take(&mut self.has_msgid);
        let has_comments = std::mem::take(&mut self.has_comments);
        self.has_msgstr = false;
        self.field = None;

        match started {
            Some(line) if !has_msgid => Err(Error::Po {
                line,
                message: String::from("entry without msgid"),
            }),
            Some(_) => {
                self.catalog.push(entry);
                Ok(())
            }
            // Trailing comments which do not belong to any entry.
            None => {
                if has_comments {
                    debug!("Dropping comments before line {}", self.line);
                }
                Ok(())
            }
        }
    }
}

fn strip_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}

fn push_line(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(line);
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\u{07}' => escaped.push_str("\\a"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0c}' => escaped.push_str("\\f"),
            '\u{0b}' => escaped.push_str("\\v"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Format `keyword "value"`, splitting values with inner newlines over
/// several lines.
fn format_field(out: &mut String, prefix: &str, keyword: &str, value: &str) {
    let multiline = value
        .find('\n')
        .is_some_and(|idx| idx + 1 < value.len());
    if !multiline {
        out.push_str(&format!("{prefix}{keyword} \"{}\"\n", escape(value)));
        return;
    }
    out.push_str(&format!("{prefix}{keyword} \"\"\n"));
    for segment in value.split_inclusive('\n') {
        out.push_str(&format!("{prefix}\"{}\"\n", escape(segment)));
    }
}

fn format_references(out: &mut String, occurrences: &[Occurrence]) {
    let mut line = String::from("#:");
    for occurrence in occurrences {
        let token = occurrence.to_string();
        if line.len() > 2 && line.len() + 1 + token.len() > REFERENCE_WIDTH {
            out.push_str(&line);
            out.push('\n');
            line = String::from("#:");
        }
        line.push(' ');
        line.push_str(&token);
    }
    out.push_str(&line);
    out.push('\n');
}

fn format_entry(entry: &CatalogEntry) -> String {
    let mut out = String::new();
    if !entry.translator_comment.is_empty() {
        for line in entry.translator_comment.split('\n') {
            if line.is_empty() {
                out.push_str("#\n");
            } else {
                out.push_str(&format!("# {line}\n"));
            }
        }
    }
    if !entry.extracted_comment.is_empty() {
        for line in entry.extracted_comment.split('\n') {
            out.push_str(&format!("#. {line}\n"));
        }
    }
    if !entry.occurrences.is_empty() {
        format_references(&mut out, &entry.occurrences);
    }
    if !entry.flags.is_empty() {
        out.push_str(&format!("#, {}\n", entry.flags.join(", ")));
    }

    let previous_prefix = if entry.obsolete { "#~| " } else { "#| " };
    if let Some(previous) = &entry.previous_msgctxt {
        format_field(&mut out, previous_prefix, "msgctxt", previous);
    }
    if let Some(previous) = &entry.previous_msgid {
        format_field(&mut out, previous_prefix, "msgid", previous);
    }
    if let Some(previous) = &entry.previous_msgid_plural {
        format_field(&mut out, previous_prefix, "msgid_plural", previous);
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(msgctxt) = &entry.msgctxt {
        format_field(&mut out, prefix, "msgctxt", msgctxt);
    }
    format_field(&mut out, prefix, "msgid", &entry.msgid);
    match &entry.msgid_plural {
        Some(msgid_plural) => {
            format_field(&mut out, prefix, "msgid_plural", msgid_plural);
            for (idx, msgstr) in entry.msgstr_plural.iter().enumerate() {
                format_field(&mut out, prefix, &format!("msgstr[{idx}]"), msgstr);
            }
        }
        None => format_field(&mut out, prefix, "msgstr", &entry.msgstr),
    }
    out
}
