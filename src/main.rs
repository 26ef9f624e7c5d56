use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tacfront::{LexMode, Options, compile};

/// Compile a single assignment into three-address code.
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Source text. Falls back to --file, then stdin.
  source: Option<String>,

  /// Read the source from a file.
  #[arg(short, long, conflicts_with = "source")]
  file: Option<PathBuf>,

  /// Reject unrecognized characters instead of skipping them.
  #[arg(long)]
  strict: bool,

  /// Print the token stream before the code.
  #[arg(long)]
  tokens: bool,

  /// Print the syntax tree before the code.
  #[arg(long)]
  ast: bool,

  /// Increase log verbosity (-v debug, -vv trace).
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn init_logging(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(io::stderr)
    .init();
}

fn read_source(args: &Args) -> io::Result<String> {
  if let Some(source) = &args.source {
    return Ok(source.clone());
  }
  if let Some(path) = &args.file {
    return std::fs::read_to_string(path);
  }
  let mut buf = String::new();
  io::stdin().read_to_string(&mut buf)?;
  Ok(buf)
}

fn main() {
  let args = Args::parse();
  init_logging(args.verbose);

  let source = match read_source(&args) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("failed to read source: {err}");
      process::exit(1);
    }
  };

  let options = Options {
    lex_mode: if args.strict {
      LexMode::Strict
    } else {
      LexMode::Lenient
    },
  };
  debug!(?options, bytes = source.len(), "compiling");

  match compile(&source, &options) {
    Ok(out) => {
      if args.tokens {
        for token in &out.tokens {
          println!("{token}");
        }
      }
      if args.ast {
        println!("{}", out.ast);
      }
      print!("{}", out.tac);
    }
    Err(err) => {
      eprintln!("{}", err.render(&source));
      process::exit(1);
    }
  }
}
