// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::fmt;

use chrono::DateTime;
use chrono::offset::Utc;
use serde::{Serialize, Deserialize};

/// A single line of input as it was read, numbered from 1
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RawLine {
  pub index: usize,
  pub text: String
}

impl RawLine {
  pub fn new<S: Into<String>>(index: usize, text: S) -> RawLine {
    RawLine { index, text: text.into() }
  }
}

/// Named capture slots a FormatPattern may fill. The regex group names are
/// the snake_case forms of these.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
  Timestamp,
  Manager,
  LogType,
  Message
}

impl Slot {
  pub fn group_name(self) -> &'static str {
    match self {
      Slot::Timestamp => "timestamp",
      Slot::Manager => "manager",
      Slot::LogType => "log_type",
      Slot::Message => "message"
    }
  }
}

impl fmt::Display for Slot {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.group_name())
  }
}

/// A line that some FormatPattern matched.
///
/// Slots the matching pattern did not produce are `None` and serialize as
/// `null`, so they stay distinguishable from an empty capture.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ParsedRecord {
  pub source_line_index: usize,

  /// The line's timestamp, normalized to UTC
  pub timestamp: Option<DateTime<Utc>>,

  /// Subsystem that emitted the line, e.g. `RecMgr`
  pub manager: Option<String>,

  /// Severity token, e.g. `ERROR`
  pub log_type: Option<String>,

  pub message: String,

  /// Id of the FormatPattern that produced this record
  pub matched_pattern_id: String
}

/// A line no FormatPattern could parse
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UnmatchedLine {
  pub line: RawLine
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tokenized {
  Parsed(ParsedRecord),
  Unmatched(UnmatchedLine)
}

/// The outcome of parsing a whole input.
///
/// `records.len() + unmatched.len() == total` always holds.
#[derive(Serialize, Debug, Clone)]
pub struct ParseReport {
  pub records: Vec<ParsedRecord>,
  pub unmatched: Vec<UnmatchedLine>,
  pub total: usize,
  pub match_rate: f64
}
