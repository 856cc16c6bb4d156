//! The Quill compiler CLI.
//!
//! Provides the `quillc build` subcommand, which reads a source file (or
//! stdin via `-`), runs the full pipeline, and writes assembly to stdout or
//! a file. `--run` additionally assembles and links the result against a
//! tiny runtime object and executes it, for local verification only
//! (`spec.md` §6 treats the driver CLI itself as out of scope).

use std::io::Read;
use std::path::PathBuf;
use std::process::{self, Command};

use ariadne::{Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};

#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "quillc", version, about = "The Quill compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Quill source file to assembly
    Build {
        /// Path to the source file, or `-` to read from stdin
        input: PathBuf,

        /// Output path for the assembly; defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Assemble, link against the test runtime, and run the result
        #[arg(long)]
        run: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, run } => {
            if let Err(()) = build(&input, output.as_deref(), run) {
                process::exit(1);
            }
        }
    }
}

fn build(input: &std::path::Path, output: Option<&std::path::Path>, run: bool) -> Result<(), ()> {
    let source = read_source(input);
    let file_name = input.display().to_string();

    let assembly = match quillc::compile(&source) {
        Ok(asm) => asm,
        Err(err) => {
            report_diagnostic(&source, &file_name, &err);
            return Err(());
        }
    };

    if run {
        run_assembly(&assembly).map_err(|e| eprintln!("error: {e}"))?;
        return Ok(());
    }

    match output {
        Some(path) => std::fs::write(path, assembly).map_err(|e| eprintln!("error writing {}: {e}", path.display()))?,
        None => print!("{assembly}"),
    }
    Ok(())
}

fn read_source(input: &std::path::Path) -> String {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).expect("failed to read stdin");
        buf
    } else {
        std::fs::read_to_string(input)
            .unwrap_or_else(|e| panic!("failed to read '{}': {e}", input.display()))
    }
}

fn report_diagnostic(source: &str, _file_name: &str, err: &quillc::CompileError) {
    let span = err.span();
    let start = span.start as usize;
    let end = (span.end as usize).max(start + 1);
    let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
        .with_message(err.to_string())
        .with_label(Label::new(start..end).with_message(err.to_string()))
        .finish()
        .eprint(Source::from(source));
}

/// Assemble with `as`, link with `cc` against the test runtime object, and
/// run the resulting binary, streaming its stdout/stderr through.
fn run_assembly(assembly: &str) -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|e| e.to_string())?;
    let asm_path = dir.path().join("out.s");
    let bin_path = dir.path().join("out");
    std::fs::write(&asm_path, assembly).map_err(|e| e.to_string())?;

    let runtime_path = runtime_source_path();
    let status = Command::new("cc")
        .arg(&asm_path)
        .arg(&runtime_path)
        .arg("-o")
        .arg(&bin_path)
        .status()
        .map_err(|e| format!("failed to invoke cc: {e}"))?;
    if !status.success() {
        return Err("assembling/linking failed".to_string());
    }

    let status = Command::new(&bin_path).status().map_err(|e| format!("failed to run binary: {e}"))?;
    if !status.success() {
        return Err(format!("program exited with status {:?}", status.code()));
    }
    Ok(())
}

fn runtime_source_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("runtime").join("runtime.c")
}
