// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::parser::ParsedRecord;

/// Operational buckets for recorder error messages
#[derive(Serialize, Deserialize, Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
  /// Startup and configuration noise that shows up at every boot
  BeginnerError,
  Camera,
  Connection,
  Download,

  /// Low or failing USB storage, worth attention
  Usb,

  /// Messages known to carry no useful information
  Ignore,

  Other
}

impl ErrorCategory {
  pub const ALL: [ErrorCategory; 7] = [
    ErrorCategory::BeginnerError,
    ErrorCategory::Camera,
    ErrorCategory::Connection,
    ErrorCategory::Download,
    ErrorCategory::Usb,
    ErrorCategory::Ignore,
    ErrorCategory::Other
  ];

  pub fn name(self) -> &'static str {
    match self {
      ErrorCategory::BeginnerError => "beginner_error",
      ErrorCategory::Camera => "camera",
      ErrorCategory::Connection => "connection",
      ErrorCategory::Download => "download",
      ErrorCategory::Usb => "usb",
      ErrorCategory::Ignore => "ignore",
      ErrorCategory::Other => "other"
    }
  }
}

impl fmt::Display for ErrorCategory {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for ErrorCategory {
  type Err = Box<dyn Error>;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match ErrorCategory::ALL.iter().find(|c| c.name() == s) {
      Some(category) => Ok(*category),
      None => bail!(format!("invalid error category: {}", s))
    }
  }
}

/// Records grouped by category. Every category is present, and records in
/// each bucket keep their input order.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct ClassificationResult<'a> {
  buckets: BTreeMap<ErrorCategory, Vec<&'a ParsedRecord>>
}

impl<'a> ClassificationResult<'a> {
  pub(super) fn new() -> ClassificationResult<'a> {
    ClassificationResult {
      buckets: ErrorCategory::ALL.iter().map(|c| (*c, Vec::new())).collect()
    }
  }

  pub(super) fn push(&mut self, category: ErrorCategory, record: &'a ParsedRecord) {
    self.buckets.entry(category).or_insert_with(Vec::new).push(record);
  }

  pub fn records(&self, category: ErrorCategory) -> &[&'a ParsedRecord] {
    self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Total number of classified records
  pub fn len(&self) -> usize {
    self.buckets.values().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.buckets.values().all(Vec::is_empty)
  }
}
