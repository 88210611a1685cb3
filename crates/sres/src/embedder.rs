//! The embedder, turning text files into C string declarations.
//!
//! Every input file produces one declaration:
//!
//! ```text
//! static const GLchar* _blit_frag =
//!     "#version 330\n"
//!     "void main() {}\n"
//!     ;
//!
//! ```

use crate::{error::EmbedError, transform};
use log::*;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

pub const DEFAULT_PREFIX: &str = "_";
pub const DEFAULT_CHAR_TYPE: &str = "GLchar*";

/// Name given to standard input, when it's used as a source.
pub const STDIN_NAME: &str = "<stdin>";

/// Anything that can be read line by line, once, from start to end.
pub trait LineSource {
    /// Reads the next line, including its terminator. `Ok(None)` marks the end of input.
    ///
    /// Lines end with `\n`, `\r\n` or a lone `\r`.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> LineSource for R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();

        loop {
            let buf = match self.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            if buf.is_empty() {
                break;
            }

            match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(index) => {
                    let terminator = buf[index];
                    line.extend_from_slice(&buf[..=index]);
                    self.consume(index + 1);

                    // `\r\n` is a single terminator, even when split between two buffer fills
                    if terminator == b'\r' && self.fill_buf()?.first() == Some(&b'\n') {
                        line.push(b'\n');
                        self.consume(1);
                    }
                    break;
                }
                None => {
                    let length = buf.len();
                    line.extend_from_slice(buf);
                    self.consume(length);
                }
            }
        }

        if line.is_empty() {
            return Ok(None);
        }

        String::from_utf8(line)
            .map(Some)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

/// Anything generated text can be written into, line by line.
pub trait TextSink {
    /// Writes the line, followed by a `\n`.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl<W: Write> TextSink for W {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")
    }
}

/// A named source of lines. The name is the base name of the file (without any directories),
/// and is what the declaration's identifier gets derived from.
pub struct InputFile<S> {
    name: String,
    source: S,
}

impl<S: LineSource> InputFile<S> {
    pub fn new(name: impl Into<String>, source: S) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl InputFile<Box<dyn BufRead>> {
    /// Opens a file for reading. A path of `-` stands for standard input.
    pub fn open(path: &Path) -> Result<Self, EmbedError> {
        if path == Path::new("-") {
            return Ok(Self::new(STDIN_NAME, Box::new(BufReader::new(io::stdin()))));
        }

        let file = File::open(path).map_err(|source| EmbedError::OpenInput {
            path: path.to_owned(),
            source,
        })?;

        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => path.to_string_lossy().into_owned(),
        };

        Ok(Self::new(name, Box::new(BufReader::new(file))))
    }
}

/// Settings shared by every declaration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Whether `//` comments get removed from the embedded text.
    pub strip_comments: bool,
    /// Prepended to every generated identifier.
    pub prefix: String,
    /// Pointer type used in declaration headers.
    pub char_type: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            strip_comments: false,
            prefix: DEFAULT_PREFIX.to_owned(),
            char_type: DEFAULT_CHAR_TYPE.to_owned(),
        }
    }
}

pub struct Embedder<'a> {
    config: &'a EmbedConfig,
}

impl<'a> Embedder<'a> {
    pub fn new(config: &'a EmbedConfig) -> Self {
        Self { config }
    }

    /// Writes one declaration per file, in the order the files are given.
    ///
    /// The first failure stops the run. Whatever was already written to `sink` stays there.
    pub fn run<S, I>(&self, files: I, sink: &mut impl TextSink) -> Result<(), EmbedError>
    where
        S: LineSource,
        I: IntoIterator<Item = InputFile<S>>,
    {
        let mut count = 0usize;
        for mut file in files {
            self.process_file(&mut file, sink)?;
            count += 1;
        }

        info!("Wrote {count} declaration(s)");
        Ok(())
    }

    /// Consumes all lines of `file`, writing a single declaration into `sink`. Neither of them
    /// gets closed.
    pub fn process_file<S: LineSource>(
        &self,
        file: &mut InputFile<S>,
        sink: &mut impl TextSink,
    ) -> Result<(), EmbedError> {
        let identifier = transform::sanitize_identifier(&self.config.prefix, &file.name);
        debug!("Embedding {} as {identifier}", file.name);

        let write_error = |source| EmbedError::Write {
            name: file.name.clone(),
            source,
        };

        sink.write_line(&format!(
            "static const {} {identifier} =",
            self.config.char_type
        ))
        .map_err(write_error)?;

        let mut fragments = 0usize;
        loop {
            let line = match file.source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(source) => {
                    return Err(EmbedError::Read {
                        name: file.name.clone(),
                        source,
                    })
                }
            };

            let Some(line) = transform::prepare_line(&line, self.config.strip_comments) else {
                continue;
            };

            sink.write_line(&format!("    {}", transform::escape_fragment(line)))
                .map_err(write_error)?;
            fragments += 1;
        }

        sink.write_line("    ;\n").map_err(write_error)?;

        trace!("{identifier}: {fragments} fragment(s)");
        Ok(())
    }
}
