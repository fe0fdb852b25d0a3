// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::error::Error;
use std::marker::Sized;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use simple_error::{SimpleError, SimpleResult};

use crate::parser::ParsedRecord;

/// Selects records by their semantic content: the log type and the message.
/// Timestamps, managers and the rest of the raw line are never searched.
pub trait Filter {
  fn new(query: &str, case_sensitive: bool) -> SimpleResult<Self> where Self: Sized;

  /// Determines if the given record matches the filter
  fn filter(&self, record: &ParsedRecord) -> bool;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FilterMode {
  Text,
  Regex
}

impl FromStr for FilterMode {
  type Err = Box<dyn Error>;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "text" => Ok(FilterMode::Text),
      "regex" => Ok(FilterMode::Regex),
      _ => bail!(format!("invalid filter mode: {}", s))
    }
  }
}

pub struct KeywordFilter {
  query: String,
  case_sensitive: bool
}

impl KeywordFilter {
  fn build(query: &str, case_sensitive: bool) -> KeywordFilter {
    let query = if case_sensitive {
      query.to_string()
    } else {
      query.to_lowercase()
    };

    KeywordFilter { query, case_sensitive }
  }
}

impl Filter for KeywordFilter {
  fn new(query: &str, case_sensitive: bool) -> SimpleResult<KeywordFilter> {
    Ok(KeywordFilter::build(query, case_sensitive))
  }

  fn filter(&self, record: &ParsedRecord) -> bool {
    let fields = record.log_type.iter().chain(Some(&record.message));

    for field in fields {
      let found = if self.case_sensitive {
        field.contains(&self.query)
      } else {
        field.to_lowercase().contains(&self.query)
      };

      if found {
        return true;
      }
    }

    false
  }
}

pub struct RegexFilter {
  re: Regex
}

impl Filter for RegexFilter {
  fn new(expr: &str, case_sensitive: bool) -> SimpleResult<Self> {
    RegexBuilder::new(expr)
      .case_insensitive(!case_sensitive)
      .build()
      .map_err(SimpleError::from)
      .map(|re| RegexFilter { re })
  }

  fn filter(&self, record: &ParsedRecord) -> bool {
    if let Some(log_type) = &record.log_type {
      if self.re.is_match(log_type) {
        return true;
      }
    }

    self.re.is_match(&record.message)
  }
}

/// Returns the records passing `filter`, in their original order
pub fn filter_with<'a>(
  records: &'a [ParsedRecord], filter: &dyn Filter
) -> Vec<&'a ParsedRecord> {
  records.iter().filter(|r| filter.filter(r)).collect()
}

/// Returns the records whose log type or message contains `keyword`
pub fn filter<'a>(
  records: &'a [ParsedRecord], keyword: &str, case_sensitive: bool
) -> Vec<&'a ParsedRecord> {
  filter_with(records, &KeywordFilter::build(keyword, case_sensitive))
}

#[cfg(test)]
mod tests {
  use super::*;

  use spectral::prelude::*;

  fn record(index: usize, manager: &str, message: &str) -> ParsedRecord {
    ParsedRecord {
      source_line_index: index,
      timestamp: None,
      manager: Some(manager.to_string()),
      log_type: None,
      message: message.to_string(),
      matched_pattern_id: String::from("h1")
    }
  }

  fn records() -> Vec<ParsedRecord> {
    vec![
      record(1, "RecMgr", "ERROR: camera init failed"),
      record(2, "ErrorMgr", "download started"),
      record(3, "NetMgr", "curl returned error 7"),
      record(4, "UsbMgr", "Error writing to usb"),
    ]
  }

  fn indexes(filtered: &[&ParsedRecord]) -> Vec<usize> {
    filtered.iter().map(|r| r.source_line_index).collect()
  }

  #[test]
  fn test_case_insensitive_default() {
    let records = records();

    let upper = filter(&records, "ERROR", false);
    let lower = filter(&records, "error", false);

    assert_that!(indexes(&upper)).is_equal_to(vec![1, 3, 4]);
    assert_that!(upper).is_equal_to(lower);
  }

  #[test]
  fn test_case_sensitive() {
    let records = records();

    assert_that!(indexes(&filter(&records, "ERROR", true))).is_equal_to(vec![1]);
    assert_that!(indexes(&filter(&records, "Error", true))).is_equal_to(vec![4]);
  }

  #[test]
  fn test_manager_not_searched() {
    let records = records();

    // "ErrorMgr" is a manager, not message content
    assert_that!(indexes(&filter(&records, "mgr", false))).is_equal_to(vec![]);
  }

  #[test]
  fn test_log_type_searched() {
    let mut typed = record(5, "RecMgr", "camera init failed");
    typed.log_type = Some(String::from("ERROR"));

    let mut untyped = record(6, "RecMgr", "camera init failed");
    untyped.log_type = None;

    let records = vec![typed, untyped];

    assert_that!(indexes(&filter(&records, "error", false))).is_equal_to(vec![5]);
    assert_that!(indexes(&filter(&records, "error", true))).is_equal_to(vec![]);
  }

  #[test]
  fn test_no_match_is_empty() {
    let records = records();

    assert_that!(filter(&records, "printlevel", false)).is_equal_to(vec![]);
    assert_that!(filter(&[], "error", false)).is_equal_to(vec![]);
  }

  #[test]
  fn test_regex_mode() {
    let records = records();
    let f = RegexFilter::new(r"^(error|curl)\b", false).unwrap();

    assert_that!(indexes(&filter_with(&records, &f))).is_equal_to(vec![1, 3, 4]);
  }

  #[test]
  fn test_invalid_regex() {
    assert_that!(RegexFilter::new("(", false).is_err()).is_true();
  }

  #[test]
  fn test_mode_from_str() {
    assert_that!("text".parse::<FilterMode>().ok()).is_equal_to(Some(FilterMode::Text));
    assert_that!("fuzzy".parse::<FilterMode>().is_err()).is_true();
  }
}
