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

//! Add HUD keyword entries to a PO file.
//!
//! This program reads a PO file, adds a `hud-keywords:<msgid>` entry
//! for every translatable message and optionally writes the result to
//! a new PO file. It can also write a keyword mapping XML file listing
//! each message with blank keyword names for a human to fill in.
//! Keyword names already present in that XML file are kept.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use hud_keywords::cli::{run, Args, Config};

/// Exit code for every failed run.
const FAILURE: u8 = 2;

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("hud-keywords"))
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 | 1 => "warn",
        2 => "info",
        _ => "debug",
    };
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", level));
}

/// Stopping the program with Ctrl-C is not a failure.
#[cfg(unix)]
fn exit_on_interrupt() -> std::io::Result<()> {
    use signal_hook::consts::SIGINT;
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT])?;
    std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            std::process::exit(0);
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn exit_on_interrupt() -> std::io::Result<()> {
    Ok(())
}

#[allow(clippy::print_stderr)]
fn report(err: &anyhow::Error) {
    let program_name = program_name();
    let indent = " ".repeat(program_name.len());
    eprintln!("{program_name}: Error: {err:#}");
    eprintln!("{indent}  for help use --help");
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);
    if let Err(err) = exit_on_interrupt() {
        log::warn!("Could not install the interrupt handler: {err}");
    }

    match run(&Config::from(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::from(FAILURE)
        }
    }
}
