// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

mod pattern;
mod types;
pub mod util;

use tracing::{debug, info};

use crate::error::{Error, Result, Stage};
pub use pattern::{FormatPattern, PatternSet};
pub use types::{ParsedRecord, ParseReport, RawLine, Slot, Tokenized, UnmatchedLine};

/// Tries each pattern in order, returning the first structural match.
///
/// Later patterns are never consulted once one matches, even if they would
/// capture more of the line.
pub fn tokenize(line: RawLine, patterns: &PatternSet) -> Tokenized {
  for pattern in patterns.iter() {
    if let Some(record) = pattern.apply(&line) {
      return Tokenized::Parsed(record);
    }
  }

  Tokenized::Unmatched(UnmatchedLine { line })
}

/// Parses every line independently. Lines that match no pattern are kept in
/// `unmatched` rather than failing the batch; only an input with no lines at
/// all is an error.
pub fn parse<I>(lines: I, patterns: &PatternSet) -> Result<ParseReport>
where
  I: IntoIterator<Item = RawLine>
{
  let mut records = Vec::new();
  let mut unmatched = Vec::new();
  let mut total: usize = 0;

  for line in lines {
    total += 1;

    match tokenize(line, patterns) {
      Tokenized::Parsed(record) => records.push(record),
      Tokenized::Unmatched(u) => {
        debug!(index = u.line.index, text = %u.line.text, "unmatched line");
        unmatched.push(u);
      }
    };
  }

  if total == 0 {
    return Err(Error::EmptyInput { stage: Stage::Parse });
  }

  let match_rate = records.len() as f64 / total as f64;
  info!(
    total,
    matched = records.len(),
    unmatched = unmatched.len(),
    match_rate,
    "parsed input"
  );

  Ok(ParseReport { records, unmatched, total, match_rate })
}
