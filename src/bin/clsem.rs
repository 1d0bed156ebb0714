use anyhow::{Context, Result, bail};
use clap::Parser;
use clsem::{ClsemConfig, Session};
use std::path::PathBuf;

/// Load JVM class files into a semantic model and describe what was entered.
#[derive(Parser, Debug)]
#[command(name = "clsem", version, about)]
struct Args {
    /// JSON configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the linearization of every loaded class.
    #[arg(long)]
    linearize: bool,

    /// Print the declarations of every loaded class and its statics module.
    #[arg(long)]
    members: bool,

    /// Class files to load, in order.
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    // No-op unless CLSEM_LOG or RUST_LOG is set.
    clsem::tracing_config::init_tracing();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ClsemConfig::load(path)?,
        None => ClsemConfig::default(),
    };

    let artifacts = args
        .files
        .iter()
        .map(|path| {
            let bytes =
                std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok((path.display().to_string(), bytes))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut session = Session::new(config).context("failed to set up the root definitions")?;
    let report = session.load_all(artifacts);

    let mut report_errors = 0usize;
    for entry in &report.classes {
        let description = session.describe(entry, args.linearize, args.members);
        for line in &description.lines {
            println!("{line}");
        }
        report_errors += description.errors;
    }
    if report.skipped > 0 {
        println!("{} file(s) skipped after the first failure", report.skipped);
    }

    let failed = report.failures().count();
    if failed > 0 || report.skipped > 0 {
        bail!("{failed} of {} class file(s) failed to load", args.files.len());
    }
    if report_errors > 0 {
        bail!("{report_errors} class description(s) could not be computed");
    }
    Ok(())
}
