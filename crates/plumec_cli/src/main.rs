#![doc = include_str!("../README.md")]

use crate::args::Args;
use crate::dump::Dumper;
use crate::render::Colored;
use clap::Parser;
use eyre::WrapErr;
use owo_colors::Stream;
use plume_tokens::source::Source;
use plumec::error::PlumeCError;
use plumec::PlumeC;
use std::io;
use std::io::{stderr, stdout, BufRead, Read, Stderr, StderrLock, Stdout, StdoutLock, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::metadata::LevelFilter;
use tracing::{debug, info, trace, Level, Metadata};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

mod args;
mod dump;
mod render;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting plumec with args: {args:?}");
    debug!("plumec version: {}", env!("CARGO_PKG_VERSION"));

    let plume_c = PlumeC::builder()
        .abort_after_declaration_errors(!args.keep_going)
        .build();
    let mut dumper = Dumper::new(args.dump.clone(), args.time);

    if args.interactive {
        interactive(&plume_c, &mut dumper)?;
        return Ok(ExitCode::SUCCESS);
    }

    let sources = read_sources(&args.files)?;
    debug!("sources to compile: {:?}", sources.iter().map(|s| s.id()).collect::<Vec<_>>());
    match plume_c.compile_all(&sources, &mut dumper) {
        Ok(compiled) => {
            info!("{} source(s) are valid", compiled.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            report(&error);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Reads every file, or stdin when there are none
fn read_sources(files: &[PathBuf]) -> eyre::Result<Vec<Source>> {
    if files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .wrap_err("could not read source from stdin")?;
        return Ok(vec![Source::new("<stdin>", text)]);
    }
    files
        .iter()
        .map(|path| -> eyre::Result<Source> {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("could not read {path:?}"))?;
            Ok(Source::new(path.to_string_lossy(), text))
        })
        .collect()
}

/// Reads sources from stdin until it is closed. Each source ends at an empty line.
fn interactive(plume_c: &PlumeC, dumper: &mut Dumper) -> eyre::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("Enter a program, followed by an empty line:");
        stdout().flush()?;

        let mut text = String::new();
        let mut closed = true;
        for line in lines.by_ref() {
            let line = line?;
            if line.trim().is_empty() {
                closed = false;
                break;
            }
            text.push_str(&line);
            text.push('\n');
        }

        if !text.is_empty() {
            let source = Source::new("input", text);
            match plume_c.compile_observed(&source, dumper) {
                Ok(typed) => info!("{} function(s) are valid", typed.program.functions.len()),
                Err(error) => report(&error),
            }
        }
        if closed {
            return Ok(());
        }
    }
}

/// Renders every diagnostic of an error to stderr
fn report(error: &PlumeCError) {
    let diagnostics = error.diagnostics();
    if diagnostics.is_empty() {
        eprintln!("{error}");
    }
    for diagnostic in &diagnostics {
        eprintln!("{}\n", Colored::new(diagnostic, Stream::Stderr));
    }
    debug!("reported {} diagnostic(s)", diagnostics.len());
}

struct StdioWriter {
    stdout: Stdout,
    stderr: Stderr,
}

enum StdioLock<'a> {
    Stdout(StdoutLock<'a>),
    Stderr(StderrLock<'a>),
}

impl<'a> io::Write for StdioLock<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StdioLock::Stdout(stdout) => stdout.write(buf),
            StdioLock::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StdioLock::Stdout(stdout) => stdout.flush(),
            StdioLock::Stderr(stderr) => stderr.flush(),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            StdioLock::Stdout(stdout) => stdout.write_all(buf),
            StdioLock::Stderr(stderr) => stderr.write_all(buf),
        }
    }
}

impl<'a> MakeWriter<'a> for StdioWriter {
    type Writer = StdioLock<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        StdioLock::Stdout(self.stdout.lock())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        // ERROR < WARN < INFO in tracing's ordering
        if meta.level() <= &Level::WARN {
            StdioLock::Stderr(self.stderr.lock())
        } else {
            StdioLock::Stdout(self.stdout.lock())
        }
    }
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(StdioWriter {
                    stdout: stdout(),
                    stderr: stderr(),
                })
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
