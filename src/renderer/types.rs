// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::io::{self, Write};

use serde::Serialize;

use crate::classifier::ClassificationResult;
use crate::parser::ParseReport;

/// Everything produced for one input, borrowed from the pipeline stages
#[derive(Debug, Serialize)]
pub struct Analysis<'a> {
  /// Display name of the input, e.g. a path or `<stdin>`
  pub source: String,

  pub keyword: &'a str,

  pub report: &'a ParseReport,

  /// Number of records that passed the keyword filter
  pub filtered: usize,

  /// None when no record passed the filter
  pub classification: Option<ClassificationResult<'a>>
}

pub type Renderer = fn(out: &mut dyn Write, analysis: &Analysis) -> io::Result<()>;
