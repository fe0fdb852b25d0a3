// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

mod rules;
mod types;

use tracing::{debug, info};

use crate::error::{Error, Result, Stage};
use crate::parser::ParsedRecord;
pub use rules::{Rule, RuleSet};
pub use types::{ClassificationResult, ErrorCategory};

/// Assigns every record to exactly one category, in input order. The input is
/// usually the output of a keyword filter for "error".
pub fn classify<'a, I>(records: I, rules: &RuleSet) -> Result<ClassificationResult<'a>>
where
  I: IntoIterator<Item = &'a ParsedRecord>
{
  let mut result = ClassificationResult::new();

  for record in records {
    let category = rules.categorize(&record.message);
    debug!(index = record.source_line_index, %category, "classified");

    result.push(category, record);
  }

  if result.is_empty() {
    return Err(Error::EmptyInput { stage: Stage::Classify });
  }

  info!(classified = result.len(), "classified records");

  Ok(result)
}
