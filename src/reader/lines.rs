// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use snafu::ResultExt;

use crate::error::{InputRead, Result};
use crate::parser::RawLine;

/// Where a batch of lines comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
  Stdin,
  File(PathBuf)
}

impl fmt::Display for Input {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Input::Stdin => f.write_str("<stdin>"),
      Input::File(path) => write!(f, "{}", path.display())
    }
  }
}

/// Lazily yields numbered lines from a reader.
///
/// Invalid UTF-8 is replaced rather than rejected so a corrupted line still
/// reaches the parser (and most likely ends up unmatched). An I/O error ends
/// iteration early and is returned from `finish`.
pub struct LineSource<R> {
  name: String,
  reader: R,
  index: usize,
  error: Option<io::Error>
}

impl<R: BufRead> LineSource<R> {
  pub fn new<S: Into<String>>(name: S, reader: R) -> Self {
    LineSource {
      name: name.into(),
      reader,
      index: 0,
      error: None
    }
  }

  /// Returns the error that stopped iteration, if any
  pub fn finish(self) -> Result<()> {
    match self.error {
      Some(source) => Err(source).context(InputRead { input: self.name }),
      None => Ok(())
    }
  }
}

impl<R: BufRead> Iterator for LineSource<R> {
  type Item = RawLine;

  fn next(&mut self) -> Option<RawLine> {
    if self.error.is_some() {
      return None;
    }

    let mut buf = Vec::new();
    match self.reader.read_until(b'\n', &mut buf) {
      Ok(0) => None,
      Ok(_) => {
        if buf.ends_with(b"\n") {
          buf.pop();

          if buf.ends_with(b"\r") {
            buf.pop();
          }
        }

        self.index += 1;
        Some(RawLine::new(self.index, String::from_utf8_lossy(&buf)))
      },
      Err(e) => {
        self.error = Some(e);
        None
      }
    }
  }
}

/// Opens an input for reading
pub fn open(input: &Input) -> Result<LineSource<Box<dyn BufRead>>> {
  let reader: Box<dyn BufRead> = match input {
    Input::Stdin => Box::new(BufReader::new(io::stdin())),
    Input::File(path) => {
      let file = File::open(path).context(InputRead { input: input.to_string() })?;

      Box::new(BufReader::new(file))
    }
  };

  Ok(LineSource::new(input.to_string(), reader))
}
