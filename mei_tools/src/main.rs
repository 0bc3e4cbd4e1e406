use std::io::{self, Write};

use anyhow::{Context, Result};
use mei_script::{run_script, Opcode};

mod assets;
mod batch;
mod cli;
mod discover;
mod lines;
mod names;

use assets::AssetCatalog;
use batch::run_batch;
use cli::{AssetsArgs, Command, DiscoverArgs, LinesArgs, OutputFormat};
use discover::{describe_run, write_stubs, FileDiscovery};
use lines::{FileLines, LineExtractor};
use names::NameTable;

fn main() -> Result<()> {
    let invocation = cli::parse()?;
    init_logging(invocation.verbose);

    match invocation.command {
        Command::Lines(args) => run_lines(args),
        Command::Assets(args) => run_assets(args),
        Command::Discover(args) => run_discover(args),
        Command::Opcodes => list_opcodes(),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run_lines(args: LinesArgs) -> Result<()> {
    let names = NameTable::from_json_file(args.names.as_deref()).context("loading name table")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut collected = Vec::new();

    let outcome = run_batch(
        &args.scripts,
        args.batch,
        |_, script| {
            let mut extractor = LineExtractor::new(&names);
            let summary = run_script(script, &mut extractor);
            Ok((summary, extractor.into_rows()))
        },
        |path, rows| {
            let file = path.display().to_string();
            match args.format {
                OutputFormat::Text => lines::write_text(&mut out, &file, &rows)?,
                OutputFormat::Json => collected.push(FileLines { file, lines: rows }),
            }
            Ok(())
        },
    );

    if args.format == OutputFormat::Json {
        write_json(&mut out, &collected)?;
    }
    outcome.into_result()
}

fn run_assets(args: AssetsArgs) -> Result<()> {
    let mut catalog = AssetCatalog::default();
    let outcome = run_batch(
        &args.scripts,
        args.batch,
        |_, script| {
            let mut found = AssetCatalog::default();
            let summary = run_script(script, &mut found);
            Ok((summary, found))
        },
        |_, found| {
            catalog.merge(found);
            Ok(())
        },
    );

    if catalog.is_empty() {
        eprintln!("[mei_tools] no asset references found");
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => catalog.write_text(&mut out)?,
        OutputFormat::Json => write_json(&mut out, &catalog)?,
    }
    outcome.into_result()
}

fn run_discover(args: DiscoverArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut collected = Vec::new();
    let label_files = args.scripts.len() > 1;

    let outcome = run_batch(
        &args.scripts,
        args.batch,
        |path, script| {
            let summary = run_script(script, &mut ());
            if args.summary {
                eprintln!(
                    "[mei_tools] {}",
                    describe_run(&path.display().to_string(), &summary)
                );
            }
            let discovered = summary.discovered.clone();
            Ok((summary, discovered))
        },
        |path, discovered| {
            let file = path.display().to_string();
            match args.format {
                OutputFormat::Text => {
                    if label_files {
                        writeln!(out, "// {file}")?;
                    }
                    write_stubs(&mut out, &discovered)?;
                }
                OutputFormat::Json => collected.push(FileDiscovery { file, discovered }),
            }
            Ok(())
        },
    );

    if args.format == OutputFormat::Json {
        write_json(&mut out, &collected)?;
    }
    outcome.into_result()
}

fn list_opcodes() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (name, opcode) in Opcode::names() {
        writeln!(out, "{name} -> {}", opcode.signature())?;
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("serializing JSON output")?;
    writeln!(out)?;
    Ok(())
}
