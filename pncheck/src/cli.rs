use crate::util::PathOrStd;

use pncheck_lib::{
    analyze::{self, AnalyzeOpts, AnalyzeOptsBuilder},
    plugin,
};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use codespan_reporting::files::SimpleFile;

use std::{
    fs::File,
    io::{Read, Write},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Diagnostics,
    TreeSexp,
    DeclDot,
    DeclRustDbg,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Language {
    C,
    #[value(name = "c++", alias = "cpp")]
    Cpp,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The input file, use `-` for std in.
    #[arg(default_value = "-")]
    input_path: PathOrStd,

    /// The source language. Defaults to the one matching the file extension, or C.
    #[arg(short = 'x', long, value_name = "LANG", value_enum)]
    language: Option<Language>,

    /// The output format. Defaults to only reporting diagnostics.
    #[arg(short = 'e', long, value_name = "FORMAT", value_enum)]
    emit: Option<OutputFormat>,

    /// The plugin to run
    #[arg(long, value_name = "NAME", default_value = "check-parameter-names")]
    plugin: String,

    /// Zero or more arguments for the plugin
    #[arg(long = "plugin-arg", value_name = "ARG")]
    plugin_args: Vec<String>,

    /// Report warnings as errors
    #[arg(long)]
    werror: bool,

    /// Fail on input the parser had to skip
    #[arg(long)]
    strict_syntax: bool,

    /// List the registered plugins and exit
    #[arg(long)]
    pub list_plugins: bool,

    /// More logging, repeat for even more.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// The output file, use `-` for std out.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output_path: PathOrStd,
}

pub fn open_input_source(args: &Args) -> anyhow::Result<SimpleFile<String, String>> {
    match &args.input_path {
        PathOrStd::Path(path) => {
            if !path.exists() {
                bail!("Input file `{}` doesn't exist", path.display());
            }
            let mut handle = File::open(path)
                .with_context(|| format!("Failed to open input file `{}`", path.display()))?;
            let mut s = String::new();
            handle
                .read_to_string(&mut s)
                .with_context(|| format!("Failed to read from input file `{}`", path.display()))?;

            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            Ok(SimpleFile::new(name, s))
        }
        PathOrStd::StdStream => {
            let mut handle = std::io::stdin().lock();
            let mut s = String::new();
            handle
                .read_to_string(&mut s)
                .context("Failed to read from stdin")?;

            Ok(SimpleFile::new("stdin stream".to_owned(), s))
        }
    }
}

pub fn extract_analyze_opts(args: &Args) -> anyhow::Result<AnalyzeOpts> {
    let language = match args.language {
        Some(Language::C) => analyze::Language::C,
        Some(Language::Cpp) => analyze::Language::Cpp,
        None => args
            .input_path
            .path()
            .and_then(analyze::Language::from_path)
            .unwrap_or_default(),
    };

    let opts = AnalyzeOptsBuilder::new()
        .language(language)
        .plugin(&args.plugin)
        .warnings_as_errors(args.werror);

    let opts = if let Some(format) = args.emit {
        let format = match format {
            OutputFormat::Diagnostics => analyze::OutputFormat::Diagnostics,
            OutputFormat::TreeSexp => analyze::OutputFormat::TreeSexp,
            OutputFormat::DeclDot => analyze::OutputFormat::DeclDot,
            OutputFormat::DeclRustDbg => analyze::OutputFormat::DeclRustDbg,
        };
        opts.output_format(format)
    } else {
        opts
    };

    let opts = if args.strict_syntax {
        opts.strict_syntax()
    } else {
        opts
    };

    let opts = args
        .plugin_args
        .iter()
        .fold(opts, |opts, arg| opts.plugin_arg(arg));

    opts.build().context("Invalid plugin configuration")
}

pub fn list_plugins() -> anyhow::Result<()> {
    let registry = plugin::registry();
    let width = registry.iter().map(|p| p.name().len()).max().unwrap_or(0);

    let mut out = std::io::stdout().lock();
    for entry in registry.iter() {
        writeln!(out, "{:<width$}  {}", entry.name(), entry.description())
            .context("Failed to write to stdout")?;
    }
    Ok(())
}

pub fn open_output(args: &Args) -> anyhow::Result<Box<dyn std::io::Write>> {
    match &args.output_path {
        PathOrStd::Path(path) => std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)
            .map(|f| Box::new(f) as Box<dyn std::io::Write>)
            .with_context(|| format!("Failed to open output file `{}`", path.display())),
        PathOrStd::StdStream => Ok(Box::new(std::io::stdout().lock())),
    }
}
