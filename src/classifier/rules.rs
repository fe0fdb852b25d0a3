// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::config::de_regex;
use super::types::ErrorCategory;

lazy_static! {
  static ref BUILTIN: RuleSet = RuleSet {
    rules: vec![
      // always logged during boot
      Rule::keywords(ErrorCategory::BeginnerError, &["main()", "CFG ID"]),
      Rule::keywords(ErrorCategory::Camera, &["camera"]),
      Rule::keywords(
        ErrorCategory::Connection,
        &["curl", "connection", "http", "ntp", "connect"]
      ),
      Rule::keywords(ErrorCategory::Download, &["download"]),
      Rule::keywords(ErrorCategory::Usb, &["usb"]),
      Rule::keywords(ErrorCategory::Ignore, &["printlevel"])
    ]
  };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePredicate {
  /// Matches if any keyword is a case-insensitive substring of the message
  Keywords(Vec<String>),

  /// Matches if the regex finds a match anywhere in the message
  Pattern(#[serde(deserialize_with = "de_regex")] Regex)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
  pub category: ErrorCategory,

  #[serde(rename = "match")]
  pub predicate: RulePredicate
}

impl Rule {
  pub fn keywords(category: ErrorCategory, keywords: &[&str]) -> Rule {
    Rule {
      category,
      predicate: RulePredicate::Keywords(
        keywords.iter().map(|k| k.to_lowercase()).collect()
      )
    }
  }

  /// `lowered` must already be lowercase
  fn matches(&self, message: &str, lowered: &str) -> bool {
    match &self.predicate {
      RulePredicate::Keywords(keywords) => {
        keywords.iter().any(|k| lowered.contains(k.as_str()))
      },
      RulePredicate::Pattern(re) => re.is_match(message)
    }
  }

  /// Normalizes keywords to lowercase and rejects rules that could never
  /// match
  fn normalized(self, index: usize) -> Result<Rule> {
    let predicate = match self.predicate {
      RulePredicate::Keywords(keywords) => {
        if keywords.is_empty() || keywords.iter().any(|k| k.is_empty()) {
          return Err(Error::configuration(format!(
            "rule #{} ({}) has an empty keyword list or an empty keyword",
            index, self.category
          )));
        }

        RulePredicate::Keywords(keywords.iter().map(|k| k.to_lowercase()).collect())
      },
      pattern => pattern
    };

    Ok(Rule { category: self.category, predicate })
  }
}

/// An ordered rule chain. The first matching rule decides the category;
/// messages no rule matches are `Other`.
#[derive(Debug, Clone)]
pub struct RuleSet {
  rules: Vec<Rule>
}

impl RuleSet {
  pub fn new(rules: Vec<Rule>) -> Result<RuleSet> {
    if rules.is_empty() {
      return Err(Error::configuration("no classification rules configured"));
    }

    let rules = rules.into_iter()
      .enumerate()
      .map(|(i, rule)| rule.normalized(i + 1))
      .collect::<Result<Vec<Rule>>>()?;

    Ok(RuleSet { rules })
  }

  pub fn builtin() -> RuleSet {
    BUILTIN.clone()
  }

  /// Appends rules after the existing ones, which keep their precedence
  pub fn extended(&self, extra: Vec<Rule>) -> Result<RuleSet> {
    let mut rules = self.rules.clone();
    rules.extend(extra);

    RuleSet::new(rules)
  }

  pub fn categorize(&self, message: &str) -> ErrorCategory {
    let lowered = message.to_lowercase();

    self.rules.iter()
      .find(|rule| rule.matches(message, &lowered))
      .map(|rule| rule.category)
      .unwrap_or(ErrorCategory::Other)
  }
}
