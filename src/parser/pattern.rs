// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::collections::HashSet;

use chrono::format::{Item, StrftimeItems};
use regex::{Captures, Regex};
use serde::Deserialize;

use crate::config::de_regex;
use crate::error::{Error, Result};
use super::types::{ParsedRecord, RawLine, Slot};
use super::util::parse_datetime;

/// rfc3339 with fractional seconds and a mandatory offset, as the recorder
/// writes them
const H1_TIMESTAMP: &str =
  r"(?P<timestamp>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2}))";

/// `host svc Manager[pid]:`
const H1_PROCESS: &str = r"\S+ \S+ (?P<manager>\w+)\[\d+\]:";

lazy_static! {
  static ref BUILTIN: PatternSet = PatternSet {
    patterns: vec![
      FormatPattern::new(
        "h1",
        &format!(
          r"^{} {} (?P<log_type>\S+)\s*: (?P<message>.*)$",
          H1_TIMESTAMP, H1_PROCESS
        ),
        &[Slot::Timestamp, Slot::Manager, Slot::LogType]
      ),
      FormatPattern::new(
        "h1-untyped",
        &format!(r"^{} {}\s*(?P<message>.*)$", H1_TIMESTAMP, H1_PROCESS),
        &[Slot::Timestamp, Slot::Manager]
      )
    ]
  };
}

fn default_datetime() -> String {
  String::from("rfc3339")
}

fn default_required() -> Vec<Slot> {
  vec![Slot::Timestamp, Slot::Manager, Slot::LogType]
}

/// A named regex whose groups map onto the ParsedRecord slots
#[derive(Debug, Clone, Deserialize)]
pub struct FormatPattern {
  pub id: String,

  /// Named groups `timestamp`, `manager`, `log_type` and `message` are
  /// mapped into the record, any other groups are ignored
  #[serde(deserialize_with = "de_regex")]
  pub pattern: Regex,

  /// How to convert the `timestamp` group, see `util::parse_datetime`
  #[serde(default = "default_datetime")]
  pub datetime: String,

  /// Slots that must be captured (and for `timestamp`, converted) for the
  /// pattern to match at all
  #[serde(default = "default_required")]
  pub required: Vec<Slot>
}

impl FormatPattern {
  /// Builds one of the compiled-in patterns; these are constant and known to
  /// be valid
  fn new(id: &str, pattern: &str, required: &[Slot]) -> FormatPattern {
    FormatPattern {
      id: id.to_string(),
      pattern: Regex::new(pattern).unwrap(),
      datetime: default_datetime(),
      required: required.to_vec()
    }
  }

  fn has_group(&self, slot: Slot) -> bool {
    self.pattern.capture_names().any(|n| n == Some(slot.group_name()))
  }

  fn is_required(&self, slot: Slot) -> bool {
    self.required.contains(&slot)
  }

  /// Named formats are always valid; a strftime string must parse and name at
  /// least one field
  fn validate_datetime(&self) -> Result<()> {
    match self.datetime.as_str() {
      "rfc3339" | "rfc2822" | "fuzzy" => return Ok(()),
      _ => ()
    }

    let mut has_field = false;
    for item in StrftimeItems::new(&self.datetime) {
      match item {
        Item::Error => {
          return Err(Error::configuration(format!(
            "format pattern {} has an invalid datetime format: {}",
            self.id, self.datetime
          )));
        },
        Item::Numeric(..) | Item::Fixed(..) => has_field = true,
        _ => ()
      }
    }

    if !has_field {
      return Err(Error::configuration(format!(
        "format pattern {} datetime format names no fields: {}",
        self.id, self.datetime
      )));
    }

    Ok(())
  }

  fn validate(&self) -> Result<()> {
    if !self.has_group(Slot::Message) {
      return Err(Error::configuration(format!(
        "format pattern {} has no `message` capture group", self.id
      )));
    }

    for slot in &self.required {
      if !self.has_group(*slot) {
        return Err(Error::configuration(format!(
          "format pattern {} requires `{}` but has no such capture group",
          self.id, slot
        )));
      }
    }

    self.validate_datetime()
  }

  /// Returns the captured text for a slot, or Err(()) if the slot is required
  /// and missing or empty. An optional group that took part in the match
  /// yields its text even when empty; one that did not yields None.
  fn slot<'t>(&self, caps: &Captures<'t>, slot: Slot) -> Result<Option<&'t str>, ()> {
    match caps.name(slot.group_name()).map(|m| m.as_str()) {
      Some("") | None if self.is_required(slot) => Err(()),
      capture => Ok(capture)
    }
  }

  /// Attempts a structural match of this pattern against a line. Returns
  /// None if the regex does not match or any required slot fails.
  pub fn apply(&self, line: &RawLine) -> Option<ParsedRecord> {
    let caps = self.pattern.captures(&line.text)?;

    let timestamp = match self.slot(&caps, Slot::Timestamp).ok()? {
      Some(raw) => match parse_datetime(&self.datetime, raw) {
        Some(t) => Some(t),
        None if self.is_required(Slot::Timestamp) => return None,
        None => None
      },
      None => None
    };

    let manager = self.slot(&caps, Slot::Manager).ok()?.map(String::from);
    let log_type = self.slot(&caps, Slot::LogType).ok()?.map(String::from);

    // message is never absent, only empty
    let message = caps.name("message")
      .map(|m| m.as_str().to_string())
      .unwrap_or_default();

    Some(ParsedRecord {
      source_line_index: line.index,
      matched_pattern_id: self.id.clone(),
      timestamp, manager, log_type, message
    })
  }
}

/// An ordered, validated list of FormatPatterns. Patterns are tried in order
/// and the first to match wins.
#[derive(Debug, Clone)]
pub struct PatternSet {
  patterns: Vec<FormatPattern>
}

impl PatternSet {
  pub fn new(patterns: Vec<FormatPattern>) -> Result<PatternSet> {
    if patterns.is_empty() {
      return Err(Error::configuration("no format patterns configured"));
    }

    let mut ids = HashSet::new();
    for pattern in &patterns {
      pattern.validate()?;

      if !ids.insert(pattern.id.as_str()) {
        return Err(Error::configuration(format!(
          "duplicate format pattern id: {}", pattern.id
        )));
      }
    }

    Ok(PatternSet { patterns })
  }

  /// The compiled-in patterns for CobanH1 recorder logs
  pub fn builtin() -> PatternSet {
    BUILTIN.clone()
  }

  /// Appends patterns after the existing ones. Existing patterns keep their
  /// priority.
  pub fn extended(&self, extra: Vec<FormatPattern>) -> Result<PatternSet> {
    let mut patterns = self.patterns.clone();
    patterns.extend(extra);

    PatternSet::new(patterns)
  }

  pub fn iter(&self) -> impl Iterator<Item = &FormatPattern> {
    self.patterns.iter()
  }
}
