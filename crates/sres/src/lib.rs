//! sres - shader resources
//!
//! A build time utility that embeds text files (mostly shader sources) into generated C code,
//! as string literal declarations. This way, the final program doesn't have to read these files
//! from disk at runtime.

use clap::{ArgAction, Parser};
use embedder::{EmbedConfig, Embedder, InputFile, DEFAULT_CHAR_TYPE, DEFAULT_PREFIX};
use error::EmbedError;
use log::*;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use utils::{ok, AnyResult, OtherwiseExt};

pub mod embedder;
pub mod error;
pub mod transform;
pub mod utils;

/// Embed files as C strings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Remove C-style `//` comments
    #[arg(long, short = 'c')]
    pub strip_comments: bool,
    /// Add prefix to variable names
    #[arg(long, short = 'p', default_value = DEFAULT_PREFIX)]
    pub prefix: String,
    /// Pointer type used in the declarations
    #[arg(long = "type", short = 't', default_value = DEFAULT_CHAR_TYPE)]
    pub char_type: String,
    /// Output file. Standard output is used if it's omitted or `-`.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Print more diagnostics. Can be repeated.
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
    /// Input files. `-` reads from standard input.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn config(&self) -> EmbedConfig {
        EmbedConfig {
            strip_comments: self.strip_comments,
            prefix: self.prefix.clone(),
            char_type: self.char_type.clone(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Runs `sres` as if it was ran from the command line.
///
/// This function is provided to allow invocation from build scripts, without spawning
/// a separate process.
pub fn run(cli: Cli) -> AnyResult {
    let config = cli.config();

    // All inputs are opened before the output gets created or truncated, so a bad input path
    // doesn't leave a half-written file behind.
    let inputs = cli
        .files
        .iter()
        .map(|path| InputFile::open(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = open_output(cli.output.as_deref())?;
    Embedder::new(&config).run(inputs, &mut output)?;
    output.flush().otherwise("couldn't flush the output")?;

    ok()
}

fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>, EmbedError> {
    let sink: Box<dyn Write> = match path {
        None => Box::new(io::stdout()),
        Some(path) if path == Path::new("-") => Box::new(io::stdout()),
        Some(path) => {
            debug!("Writing to {path:?}");
            Box::new(File::create(path).map_err(|source| EmbedError::CreateOutput {
                path: path.to_owned(),
                source,
            })?)
        }
    };

    Ok(BufWriter::new(sink))
}
