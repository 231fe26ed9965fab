//! Common CLI argument definitions shared by all backends.

use anyhow::Context;
use clap::Args;
use polluter_core::Format;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Common arguments shared by all pollute commands.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonPolluteArgs {
    /// Fixture document to load (reads stdin when omitted or "-")
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Fixture format: json or yaml (default: from the file extension, else json)
    #[arg(long)]
    pub format: Option<Format>,

    /// Dry-run mode: parse and build commands, print them, and exit without connecting
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonPolluteArgs {
    fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// The explicit `--format`, else the one implied by the input extension.
    pub fn format(&self) -> Format {
        self.format
            .or_else(|| self.input_path().and_then(Format::from_path))
            .unwrap_or_default()
    }

    /// Open the input file, or stdin.
    pub fn open_input(&self) -> anyhow::Result<Box<dyn Read>> {
        match self.input_path() {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open fixture file {path:?}"))?;
                Ok(Box::new(file))
            }
            None => Ok(Box::new(std::io::stdin())),
        }
    }

    /// Human-readable name of the input for log messages.
    pub fn input_name(&self) -> String {
        match self.input_path() {
            Some(path) => path.display().to_string(),
            None => "<stdin>".to_string(),
        }
    }
}
