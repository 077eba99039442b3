mod cli;
mod logging;
mod report;
mod util;

use anyhow::{bail, Context, Result};
use clap::Parser;

use pncheck_lib::analyze::analyze;
use std::io::Write;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    logging::init(args.verbose);

    if args.list_plugins {
        return cli::list_plugins();
    }

    let source = cli::open_input_source(&args)?;

    let analyze_opts = cli::extract_analyze_opts(&args)?;
    let res = analyze(source.source(), source.name(), &analyze_opts);

    if !res.is_ok() {
        report::eprint_aggregate(&res, &source);
    }

    let Some(output) = res.into_value() else {
        bail!("couldn't analyze due to the previous errors");
    };

    cli::open_output(&args)?
        .write_all(&output)
        .with_context(|| "Failed to write to output".to_string())?;

    Ok(())
}
