mod check;
mod completions;
mod generate;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;

/// Extension trait for exiting on event-script errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for vkcereal_schema::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

impl<T> UnwrapOrExit<T> for vkcereal_codegen::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Banner recorded in generated files: this invocation with paths made
/// relative, so reruns from the same directory reproduce it exactly.
pub(crate) fn invocation_banner() -> String {
    vkcereal_core::banner_command(
        std::iter::once("vkcereal".to_string()).chain(std::env::args().skip(1)),
    )
}

#[derive(Parser)]
#[command(name = "vkcereal")]
#[command(version)]
#[command(about = "Generate Vulkan marshaling sources from registry event scripts")]
pub(crate) struct Cli {
    /// Log every feature and entity as it is handled
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the goldfish sources and Android.mk from an event script
    Generate(GenerateCommand),

    /// Replay an event script without touching the output directory
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
