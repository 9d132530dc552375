use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use inifile::Ini;
use tracing::debug;

/// Parse an INI file and print it back in canonical form.
#[derive(Parser, Debug)]
#[command(name = "inifile", version, about)]
struct Cli {
    /// File to parse.
    path: PathBuf,

    /// Print only the sections with this exact name.
    #[arg(short, long, value_name = "NAME", conflicts_with = "find")]
    section: Option<String>,

    /// Print only the sections whose names match this regular expression.
    #[arg(short, long, value_name = "REGEX")]
    find: Option<String>,

    /// Write the parsed file to this path, keeping the previous file as `<PATH>.bak`.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    debug!(?cli, "parsed arguments");

    let ini = Ini::open(&cli.path)
        .with_context(|| format!("failed to parse {}", cli.path.display()))?;

    let mut stdout = io::stdout().lock();
    if let Some(name) = &cli.section {
        ini.write_section(name, &mut stdout)
            .with_context(|| format!("failed to print section {name:?}"))?;
    } else if let Some(pattern) = &cli.find {
        for section in ini.find(pattern)? {
            write!(stdout, "{section}")?;
        }
    } else {
        ini.write_to(&mut stdout)?;
    }
    stdout.flush()?;

    if let Some(path) = &cli.save {
        ini.save(path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }

    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(())
}
