//! Tab C Transpiler Driver
//!
//! Command-line entry point: reads a source file, transpiles it and writes
//! the C text next to it (or wherever it is told to).

use clap::Parser;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use tabc_common::{CompilerError, Diagnostic};
use tabc_frontend::{CodeGenerator, Frontend, GeneratorOptions};

#[derive(Parser, Debug)]
#[command(name = "tabc")]
#[command(about = "Transpile indentation-structured source into C")]
#[command(version)]
struct Args {
    /// Input source file
    input: PathBuf,

    /// Output C file (defaults to the input path without its extension)
    output: Option<PathBuf>,

    /// Write the generated C to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Drop comments from the generated C
    #[arg(long)]
    no_comments: bool,

    /// Print the parsed tree as JSON before generating
    #[arg(long, conflicts_with = "stdout")]
    dump_tree: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::init();
    }

    if let Err(e) = run(&args) {
        eprintln!("{}", Diagnostic::from(&e));
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CompilerError> {
    let source = fs::read_to_string(&args.input)?;
    let filename = args.input.display().to_string();

    // Parse fully before touching the output so a failed run writes nothing
    let tree = Frontend::parse_source(&source, &filename)?;

    if args.dump_tree {
        let json = serde_json::to_string_pretty(&tree)
            .map_err(|e| CompilerError::InternalError { message: e.to_string() })?;
        println!("{}", json);
    }

    let options = GeneratorOptions {
        emit_comments: !args.no_comments,
    };
    let output = CodeGenerator::with_options(&tree, options).generate();

    if args.stdout {
        print!("{}", output);
        return Ok(());
    }

    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(&args.input)?,
    };
    fs::write(&output_path, output)?;
    info!("{} -> {}", args.input.display(), output_path.display());

    Ok(())
}

/// The input path with its extension stripped
fn default_output_path(input: &Path) -> Result<PathBuf, CompilerError> {
    let output = input.with_extension("");
    if output == input {
        return Err(CompilerError::io_error(format!(
            "{} has no extension to strip; pass an output path",
            input.display()
        )));
    }
    Ok(output)
}
