// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::io::{self, Write};

use serde_json;

use crate::renderer::types::*;

/// Writes one json document per input. Absent slots are written as `null`.
pub fn json_renderer(out: &mut dyn Write, analysis: &Analysis) -> io::Result<()> {
  match serde_json::to_string(analysis) {
    Ok(s) => writeln!(out, "{}", s),
    Err(e) => Err(io::Error::new(
      io::ErrorKind::InvalidData,
      format!("error converting analysis to json: {:?}", e)
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use serde_json::{json, Value};
  use spectral::prelude::*;

  use crate::classifier::{classify, RuleSet};
  use crate::filter::filter;
  use crate::parser::{parse, PatternSet, RawLine};

  #[test]
  fn test_json_document() {
    let lines = vec![
      RawLine::new(1, "2022-11-23T12:00:00.000-05:00 host svc RecMgr[1]: ERROR : camera init failed"),
      RawLine::new(2, "2022-11-23T12:00:05.000-05:00 host svc RecMgr[1]:recording error"),
      RawLine::new(3, "garbage"),
    ];
    let report = parse(lines, &PatternSet::builtin()).unwrap();
    let errors = filter(&report.records, "error", false);
    let filtered = errors.len();

    let analysis = Analysis {
      source: String::from("unit.log"),
      keyword: "error",
      report: &report,
      filtered,
      classification: classify(errors, &RuleSet::builtin()).ok()
    };

    let mut out = Vec::new();
    json_renderer(&mut out, &analysis).unwrap();
    let value: Value = serde_json::from_slice(&out).unwrap();

    assert_that!(value["source"]).is_equal_to(json!("unit.log"));
    assert_that!(value["filtered"]).is_equal_to(json!(2));
    assert_that!(value["report"]["total"]).is_equal_to(json!(3));
    assert_that!(value["report"]["records"][0]).is_equal_to(json!({
      "source_line_index": 1,
      "timestamp": "2022-11-23T17:00:00Z",
      "manager": "RecMgr",
      "log_type": "ERROR",
      "message": "camera init failed",
      "matched_pattern_id": "h1"
    }));

    // absent, not empty
    assert_that!(value["report"]["records"][1]["log_type"]).is_equal_to(json!(null));
    assert_that!(value["report"]["unmatched"][0]["line"])
      .is_equal_to(json!({ "index": 3, "text": "garbage" }));

    let classification = &value["classification"];
    assert_that!(classification["camera"][0]["source_line_index"]).is_equal_to(json!(1));
    assert_that!(classification["other"][0]["message"]).is_equal_to(json!("recording error"));
    assert_that!(classification["usb"]).is_equal_to(json!([]));
  }
}
