// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::io::{self, Write};

use crate::classifier::ErrorCategory;
use crate::parser::ParsedRecord;
use crate::renderer::types::*;

fn render_record(record: &ParsedRecord) -> String {
  let timestamp = match &record.timestamp {
    Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
    None => "-".to_string()
  };

  format!(
    "{:>6}  {}  {}  {}",
    record.source_line_index,
    timestamp,
    record.manager.as_ref().map(String::as_str).unwrap_or("-"),
    record.message
  )
}

/// Writes a human-readable summary: the match rate, every unmatched line, and
/// the non-empty category buckets
pub fn plain_renderer(out: &mut dyn Write, analysis: &Analysis) -> io::Result<()> {
  let report = analysis.report;

  writeln!(out, "== {}", analysis.source)?;
  writeln!(
    out,
    "parsed {} of {} lines ({:.1}%), {} unmatched",
    report.records.len(),
    report.total,
    report.match_rate * 100.0,
    report.unmatched.len()
  )?;

  if !report.unmatched.is_empty() {
    writeln!(out, "unmatched:")?;

    for u in &report.unmatched {
      writeln!(out, "{:>6}  {}", u.line.index, u.line.text)?;
    }
  }

  writeln!(out, "{} records matching {:?}", analysis.filtered, analysis.keyword)?;

  if let Some(classification) = &analysis.classification {
    for category in ErrorCategory::ALL.iter() {
      let records = classification.records(*category);
      if records.is_empty() {
        continue;
      }

      writeln!(out, "{} ({})", category, records.len())?;
      for record in records {
        writeln!(out, "{}", render_record(record))?;
      }
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  use spectral::prelude::*;

  use crate::classifier::{classify, RuleSet};
  use crate::filter::filter;
  use crate::parser::{parse, PatternSet, RawLine};

  fn render(lines: Vec<RawLine>) -> String {
    let report = parse(lines, &PatternSet::builtin()).unwrap();
    let errors = filter(&report.records, "error", false);

    let analysis = Analysis {
      source: String::from("unit.log"),
      keyword: "error",
      filtered: errors.len(),
      classification: classify(errors, &RuleSet::builtin()).ok(),
      report: &report
    };

    let mut out = Vec::new();
    plain_renderer(&mut out, &analysis).unwrap();

    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_plain_summary() {
    let text = render(vec![
      RawLine::new(1, "2022-11-23T12:00:00.000-05:00 host svc MGR[123]: ERROR : camera init failed"),
      RawLine::new(2, "2022-11-23T12:00:01.000-05:00 host svc MGR[124]: INFO : download started"),
      RawLine::new(3, "garbage line with no structure"),
    ]);

    let expected = vec![
      "== unit.log",
      "parsed 2 of 3 lines (66.7%), 1 unmatched",
      "unmatched:",
      "     3  garbage line with no structure",
      "1 records matching \"error\"",
      "camera (1)",
      "     1  2022-11-23 17:00:00  MGR  camera init failed",
      ""
    ].join("\n");

    assert_that!(text).is_equal_to(expected);
  }

  #[test]
  fn test_plain_without_errors() {
    let text = render(vec![
      RawLine::new(1, "2022-11-23T12:00:01.000-05:00 host svc MGR[124]: INFO : all good"),
    ]);

    assert_that!(text).is_equal_to(
      "== unit.log\nparsed 1 of 1 lines (100.0%), 0 unmatched\n0 records matching \"error\"\n"
        .to_string()
    );
  }
}
