// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::collections::HashMap;

use chrono::prelude::*;
use dtparse::{Parser, ParseError};

/// Convert a datetime to UTC if an offset is available
pub fn normalize_datetime(
  datetime: &NaiveDateTime, offset: Option<FixedOffset>
) -> DateTime<Utc> {
  if let Some(offset) = offset {
    if let Some(local_fixed) = offset.from_local_datetime(&datetime).earliest() {
      return Utc.from_utc_datetime(&local_fixed.naive_utc());
    }
  }

  // if we can't convert, just assume utc
  Utc.from_utc_datetime(datetime)
}

/// Leniently parses a timestamp using dtparse
fn parse_fuzzy(timestamp: &str) -> Result<(NaiveDateTime, Option<FixedOffset>), ParseError> {
  let parser = Parser::default();

  // adapted from https://github.com/bspeice/dtparse/blob/master/src/lib.rs#L1285
  let res = parser.parse(
    timestamp,
    None, // dayfirst
    None, // yearfirst
    true, // fuzzy
    false, // fuzzy_with_tokens
    None, // default
    false, // ignoretz
    &HashMap::new() // tzinfos
  )?;

  Ok((res.0, res.1))
}

fn parse_rfc2822(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc2822(s).ok().map(|d| d.with_timezone(&Utc))
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s).ok().map(|d| d.with_timezone(&Utc))
}

fn parse_format(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
  // formats carrying an offset (%z, %:z) parse directly, anything else is
  // assumed to already be utc
  if let Ok(d) = DateTime::parse_from_str(s, fmt) {
    return Some(d.with_timezone(&Utc));
  }

  NaiveDateTime::parse_from_str(s, fmt)
    .ok()
    .map(|naive| normalize_datetime(&naive, None))
}

/// Converts a captured timestamp using the named format: `rfc3339`,
/// `rfc2822`, `fuzzy`, or a chrono strftime string
pub fn parse_datetime(fmt: &str, datetime: &str) -> Option<DateTime<Utc>> {
  match fmt {
    "rfc3339" => parse_rfc3339(datetime),
    "rfc2822" => parse_rfc2822(datetime),
    "fuzzy" => match parse_fuzzy(datetime) {
      Ok((naive, offset)) => Some(normalize_datetime(&naive, offset)),
      Err(_) => None
    },
    _ => parse_format(datetime, fmt)
  }
}
