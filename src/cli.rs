use crate::config::load_config;
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::store::GenogramStore;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "genogram", version, about = "Genogram layout engine")]
pub struct Args {
    /// Input document (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "layout")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Ignore manual positions stored in the document
    #[arg(long = "relayout")]
    pub relayout: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Positioned nodes and connectors
    Layout,
    /// The input document with every position pinned
    Document,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    run_with(&args)
}

pub fn run_with(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())
        .with_context(|| "failed to load config")?;
    let input = read_input(args.input.as_deref())?;
    let mut store = GenogramStore::from_json(&input, &config.history)?;
    if args.relayout {
        store.clear_all_positions();
    }

    let layout = store.layout(&config.theme, &config.layout);
    tracing::debug!(
        persons = store.persons().len(),
        format = ?args.output_format,
        "laid out document"
    );

    match (args.output_format, args.output.as_deref()) {
        (OutputFormat::Layout, Some(path)) => write_layout_dump(path, &layout, &config.layout)
            .with_context(|| format!("failed to write {}", path.display())),
        (OutputFormat::Layout, None) => {
            write_output(&layout_dump_json(&layout, &config.layout)?, None)
        }
        (OutputFormat::Document, path) => {
            store.pin_positions(&layout);
            write_output(&store.export_data().to_json_pretty()?, path)
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(contents: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_flags() {
        let args = Args::parse_from([
            "genogram",
            "-i",
            "family.json",
            "--outputFormat",
            "document",
            "--configFile",
            "genogram.json5",
            "--relayout",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("family.json")));
        assert_eq!(args.output_format, OutputFormat::Document);
        assert_eq!(args.config, Some(PathBuf::from("genogram.json5")));
        assert!(args.relayout);
        assert!(args.output.is_none());
    }

    #[test]
    fn defaults_to_layout_output() {
        let args = Args::parse_from(["genogram"]);
        assert_eq!(args.output_format, OutputFormat::Layout);
        assert!(!args.relayout);
    }
}
