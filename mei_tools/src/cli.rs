use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::batch::BatchOptions;

#[derive(Parser, Debug)]
#[command(
    about = "Inspect compiled scenario command scripts (dialogue, assets, unknown opcodes)",
    version
)]
pub struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Stop at the first script that fails instead of reporting all failures at the end
    #[arg(long, global = true)]
    fail_fast: bool,

    /// Treat per-command binding errors as a failure of the whole script
    #[arg(long, global = true)]
    strict: bool,

    /// Log discovery and run statistics (RUST_LOG overrides)
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Print every spoken line with its command index and translated speaker
    Lines {
        /// Script JSON files to read, processed in order
        #[arg(required = true, value_name = "SCRIPT")]
        scripts: Vec<PathBuf>,

        /// JSON object of extra source -> target name translations
        #[arg(long, value_name = "FILE")]
        names: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Collect outfit, background, music, sound effect and shader names
    Assets {
        #[arg(required = true, value_name = "SCRIPT")]
        scripts: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print a stub signature for each unregistered opcode, once per script
    Discover {
        #[arg(required = true, value_name = "SCRIPT")]
        scripts: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also print per-script command statistics to stderr
        #[arg(long)]
        summary: bool,
    },
    /// List every registered opcode name and its handler signature
    Opcodes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug)]
pub struct Invocation {
    pub verbose: bool,
    pub command: Command,
}

#[derive(Debug)]
pub enum Command {
    Lines(LinesArgs),
    Assets(AssetsArgs),
    Discover(DiscoverArgs),
    Opcodes,
}

#[derive(Debug)]
pub struct LinesArgs {
    pub scripts: Vec<PathBuf>,
    pub names: Option<PathBuf>,
    pub format: OutputFormat,
    pub batch: BatchOptions,
}

#[derive(Debug)]
pub struct AssetsArgs {
    pub scripts: Vec<PathBuf>,
    pub format: OutputFormat,
    pub batch: BatchOptions,
}

#[derive(Debug)]
pub struct DiscoverArgs {
    pub scripts: Vec<PathBuf>,
    pub format: OutputFormat,
    pub summary: bool,
    pub batch: BatchOptions,
}

pub fn parse() -> Result<Invocation> {
    let args = Args::parse();
    args.into_invocation()
}

impl Args {
    fn into_invocation(self) -> Result<Invocation> {
        let batch = BatchOptions {
            fail_fast: self.fail_fast,
            strict: self.strict,
        };
        let command = match self.mode {
            Mode::Lines {
                scripts,
                names,
                format,
            } => Command::Lines(LinesArgs {
                scripts,
                names,
                format,
                batch,
            }),
            Mode::Assets { scripts, format } => Command::Assets(AssetsArgs {
                scripts,
                format,
                batch,
            }),
            Mode::Discover {
                scripts,
                format,
                summary,
            } => Command::Discover(DiscoverArgs {
                scripts,
                format,
                summary,
                batch,
            }),
            Mode::Opcodes => {
                if self.fail_fast || self.strict {
                    bail!("--fail-fast and --strict only apply to commands that read scripts");
                }
                Command::Opcodes
            }
        };
        Ok(Invocation {
            verbose: self.verbose,
            command,
        })
    }
}
