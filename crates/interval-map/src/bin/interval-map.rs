//! Run an interval map script and print what it emits

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]

use std::{
    fs,
    io::{self, prelude::*},
    path::PathBuf,
};

use anyhow::Context;
use interval_map::script::Interpreter;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

#[derive(Debug, clap::Parser)]
struct Opts {
    /// Value every key starts out with
    #[arg(long, env = "INTERVAL_MAP_BASE", default_value = "a")]
    base: String,

    /// Prefix each output line with the command that produced it
    #[arg(long, env = "INTERVAL_MAP_ECHO")]
    echo: bool,

    /// Script to run, or stdin if omitted
    file: Option<PathBuf>,
}

fn main() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::Registry::default()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
                    .unwrap(),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr)),
    )
    .expect("Failed to set default tracing subscriber");

    let opts: Opts = clap::Parser::parse();

    std::process::exit(match run(opts) {
        Ok(()) => 0,
        Err(e) => {
            error!("{e:?}");
            1
        },
    });
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let Opts { base, echo, file } = opts;

    let src = if let Some(file) = file {
        fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?
    } else {
        let mut s = String::new();
        io::stdin()
            .read_to_string(&mut s)
            .context("Failed to read script from stdin")?;
        s
    };

    let mut interp = Interpreter::new(base);
    let out = interp.run(&src).context("Script failed")?;

    let mut stdout = io::stdout().lock();
    for (cmd, line) in &out {
        if echo {
            writeln!(stdout, "{cmd}: {line}")?;
        } else {
            writeln!(stdout, "{line}")?;
        }
    }

    info!(
        lines = out.len(),
        breakpoints = interp.map().len(),
        "Script finished"
    );

    Ok(())
}
