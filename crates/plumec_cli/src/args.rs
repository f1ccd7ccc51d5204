//! the args for running plumec

use clap::{value_parser, ArgAction, ValueEnum};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Checks plume source files")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Specify which source files to compile. Reads a single source from stdin when
    /// none are given
    #[clap(value_name = "source file", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
    /// Repeatedly read sources from stdin, each ended by an empty line
    #[clap(short = 'i', long, conflicts_with = "files")]
    pub interactive: bool,
    /// Print an intermediate result of compilation.
    ///
    /// Can be given many times, or as a comma separated list.
    #[clap(long, value_enum, value_delimiter = ',')]
    pub dump: Vec<Dump>,
    /// Print how long each phase of compilation took
    #[clap(long)]
    pub time: bool,
    /// Check function bodies even when declarations have errors
    #[clap(long)]
    pub keep_going: bool,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }
}

/// An intermediate result that can be printed
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Dump {
    /// Every token, including whitespace
    Tokens,
    /// The concrete syntax tree
    Cst,
    /// The abstract syntax tree
    Ast,
    /// The type inferred for every expression
    Types,
}

/// Common way to set logging levels
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct LoggingArgs {
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action=ArgAction::Count, conflicts_with="quiet")]
    verbose: u8,
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action=ArgAction::Count, conflicts_with="verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used,
    pub fn log_level_filter(&self) -> LevelFilter {
        let sum = self.verbose as i8 - self.quiet as i8;
        match sum {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            2..=i8::MAX => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_args_parsing() {
        let test = "plumec main.plume other.plume";
        let args = Args::try_parse_from(test.split(' ')).expect("could not parse test string");
        assert_eq!(args.files[0], Path::new("main.plume"));
        assert_eq!(args.files[1], Path::new("other.plume"));
        assert!(!args.interactive);
        assert!(args.dump.is_empty());
        assert_eq!(args.logging().log_level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn test_no_files_reads_stdin() {
        let args = Args::try_parse_from(["plumec"]).expect("could not parse test string");
        assert!(args.files.is_empty());
    }

    #[test]
    fn test_dump_parsing() {
        let test = "plumec --dump tokens,ast --dump types --time --keep-going main.plume";
        let args = Args::try_parse_from(test.split(' ')).expect("could not parse test string");
        assert_eq!(args.dump, [Dump::Tokens, Dump::Ast, Dump::Types]);
        assert!(args.time);
        assert!(args.keep_going);
    }

    #[test]
    fn test_interactive_conflicts_with_files() {
        assert!(Args::try_parse_from(["plumec", "-i"]).is_ok());
        assert!(Args::try_parse_from(["plumec", "-i", "main.plume"]).is_err());
    }

    #[test]
    fn test_log_levels() {
        let level = |test: &str| {
            Args::try_parse_from(test.split(' '))
                .expect("could not parse test string")
                .logging()
                .log_level_filter()
        };
        assert_eq!(level("plumec -v"), LevelFilter::DEBUG);
        assert_eq!(level("plumec -vv"), LevelFilter::TRACE);
        assert_eq!(level("plumec -q"), LevelFilter::ERROR);
        assert_eq!(level("plumec -qq"), LevelFilter::OFF);
        assert!(Args::try_parse_from(["plumec", "-v", "-q"]).is_err());
    }
}
