//! `nexbot` command-line front end.

use clap::{Parser, Subcommand};
use nexbot::{Assistant, SELF_TEST_OK};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nexbot", version, about = "Nexbot — offline FAQ and small-talk assistant")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "nexbot.toml")]
    config: PathBuf,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the corpus answer closest to a question
    Answer {
        /// Question words
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Print a conversational reply
    Respond {
        /// Message words
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Run the self test; exits non-zero when the corpus is unusable
    Check,
    /// Read messages from stdin and print one reply per line
    Chat,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    info!(config = %cli.config.display(), "starting nexbot");
    let assistant = Assistant::from_config_path(Some(&cli.config));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(&assistant, cli.command, stdin.lock(), &mut stdout.lock())
}

fn run(
    assistant: &Assistant,
    command: Commands,
    input: impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Answer { query } => {
            writeln!(out, "{}", assistant.get_answer(&query.join(" ")))?;
        }
        Commands::Respond { query } => {
            writeln!(out, "{}", assistant.get_response(&query.join(" ")))?;
        }
        Commands::Check => {
            let report = assistant.self_test();
            writeln!(out, "{report}")?;
            if report != SELF_TEST_OK {
                anyhow::bail!("self test failed");
            }
        }
        Commands::Chat => chat(assistant, input, out)?,
    }
    Ok(())
}

fn chat(assistant: &Assistant, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    let mut turns = 0usize;
    for line in input.lines() {
        let line = line?;
        writeln!(out, "{}", assistant.get_response(&line))?;
        out.flush()?;
        turns += 1;
    }
    info!(turns, "chat finished");
    Ok(())
}
