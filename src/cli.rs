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

//! Command line surface of the `hud-keywords` binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use crate::error::Error;
use crate::keywords::KeywordCatalog;

/// Simple tool for creating PO and keyword XML files for HUD.
#[derive(Clone, Debug, Parser)]
#[command(name = "hud-keywords", version)]
pub struct Args {
    /// The PO file to add hud-keywords: entries to.
    #[arg(short, long, value_name = "input.po")]
    pub input: PathBuf,
    /// Write the PO file with keyword entries to this file.
    #[arg(short, long, value_name = "output.po")]
    pub output: Option<PathBuf>,
    /// Write out a keyword mapping file into this XML file.
    #[arg(short = 'x', long = "xmloutput", value_name = "output.xml")]
    pub xml_output: Option<PathBuf>,
    /// Set verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What a single run does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub xml_output: Option<PathBuf>,
    pub verbose: u8,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            output: args.output,
            xml_output: args.xml_output,
            verbose: args.verbose,
        }
    }
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Check the configuration before any file is touched.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(output) = &self.output {
            if same_file(&self.input, output) {
                return Err(Error::Usage(String::from(
                    "Input and output cannot be the same",
                )));
            }
        }
        Ok(())
    }

    #[allow(clippy::print_stdout)]
    fn progress(&self, message: &str) {
        if self.verbose > 0 {
            println!("{message}");
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Read the input catalog and write the requested outputs.
pub fn run(config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    if !config.input.exists() {
        return Err(Error::InputNotFound(config.input.clone()).into());
    }

    config.progress(&format!("Reading PO file [{}]", config.input.display()));
    let catalog = KeywordCatalog::load(&config.input)
        .with_context(|| format!("Could not read {}", config.input.display()))?;
    if let Some(language) = catalog.original().language() {
        log::info!("Catalog language: {language}");
    }

    if let Some(output) = &config.output {
        config.progress(&format!("Writing PO file [{}]", output.display()));
        catalog
            .save(output)
            .with_context(|| format!("Could not write {}", output.display()))?;
    }

    if let Some(xml_output) = &config.xml_output {
        config.progress(&format!(
            "Writing to XML output file [{}]",
            xml_output.display()
        ));
        catalog
            .save_xml(xml_output)
            .with_context(|| format!("Could not write {}", xml_output.display()))?;
    }

    Ok(())
}
