//! Minimal CLI: manifests in → (grammar | report) out.
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::compiler::RecordCompiler;
use crate::manifest::Manifest;
use crate::model::ModelSet;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile declarative data-model manifests into constrained-generation grammars
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile a model manifest to a grammar document
    Grammar(GrammarOut),
    /// print the human-readable shape report for a model
    Report(ReportOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more model manifest files, merged into one model set
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// Root record name (defaults to the first manifest that declares one)
    #[arg(long)]
    root: Option<String>,
}

#[derive(Args, Debug)]
struct GrammarOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// target grammar dialect
    #[arg(long, default_value = "gbnf")]
    format: String,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReportOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> anyhow::Result<(ModelSet, String)> {
        let mut set = ModelSet::new();
        let mut declared_root: Option<String> = None;
        for path in &self.input {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read manifest {}", path.display()))?;
            let manifest = Manifest::from_json(&source)
                .with_context(|| format!("failed to parse manifest {}", path.display()))?;
            if declared_root.is_none() {
                declared_root = manifest.root.clone();
            }
            manifest
                .declare_into(&mut set)
                .with_context(|| format!("failed to load manifest {}", path.display()))?;
        }
        let root = self.root.clone().or(declared_root).context(
            "no root record: none of the manifests declares `root` and --root was not given",
        )?;
        Ok((set, root))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Grammar(target) => {
                let (set, root) = target.input_settings.load()?;
                let dialect = crate::dialect::dialect(&target.format)?;
                let grammar = RecordCompiler::new(&set, dialect).compile_to_text(&root)?;
                write_output(target.out.as_deref(), &grammar)
            }
            Command::Report(target) => {
                let (set, root) = target.input_settings.load()?;
                let text = crate::report::semantic_report(&set, &root)?;
                write_output(target.out.as_deref(), &text)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
