use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{
    arg,
    command,
    value_parser,
    ArgMatches,
};
use log::info;
use toy_lexer::{Scanner, ScannerConfig};
use tracing_subscriber::EnvFilter;

fn command() -> ArgMatches {
    command!()
        .arg(arg!(--file <FILE> "Toy source file").short('f').required(true).value_parser(value_parser!(PathBuf)))
        .arg(arg!(--dump_tokens "Print token kinds, one line per source line").short('l'))
        .arg(arg!(--dump_symbols "Print the symbol table").short('s'))
        .arg(
            arg!(--trie_capacity <CELLS> "Symbol table size in cells")
                .short('c')
                .required(false)
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(-v --verbose "Log scanner decisions"))
        .get_matches()
}

/// `log` records from the library crates reach this subscriber through its `tracing-log` bridge.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}

fn execute_lexer(args: &ArgMatches) -> Result<()> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("no input file given")?;

    let mut config = ScannerConfig::default();
    if let Some(&cells) = args.get_one::<usize>("trie_capacity") {
        config.trie_capacity = cells;
    }

    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut scanner = Scanner::from_reader(BufReader::new(file), &config)?;
    scanner
        .run()
        .with_context(|| format!("scanning {} failed", path.display()))?;
    info!(
        "{}: {} tokens, {} symbols",
        path.display(),
        scanner.tokens().len(),
        scanner.symbols().len()
    );

    let dump_tokens = args.get_flag("dump_tokens");
    let dump_symbols = args.get_flag("dump_symbols");
    if dump_tokens || !dump_symbols {
        println!("{}", scanner.tokens());
    }
    if dump_symbols {
        println!("{}", scanner.symbols());
        for (word, class) in scanner.symbols().words() {
            println!("{:<12}{}", class, word);
        }
    }

    let errors = scanner.diagnostics().len();
    if errors > 0 {
        eprintln!("{}: {} lexical error(s)", path.display(), errors);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = command();
    init_logging(args.get_flag("verbose"))?;
    execute_lexer(&args)
}
