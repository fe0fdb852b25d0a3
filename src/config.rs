// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::error::Error as StdError;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::str::FromStr;

use regex::Regex;
use serde::Deserialize;
use serde::de::{self, Visitor, Deserializer};
use shellexpand;
use snafu::ResultExt;
use structopt::StructOpt;

use crate::classifier::{Rule, RuleSet};
use crate::error::{ConfigDeserialize, ConfigRead, Error, Result};
use crate::filter::FilterMode;
use crate::parser::{FormatPattern, PatternSet};
use crate::reader::Input;
use crate::renderer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RendererType {
  Plain,
  Json
}

impl RendererType {
  pub fn get_renderer(self) -> renderer::Renderer {
    match self {
      RendererType::Plain => renderer::plain_renderer,
      RendererType::Json => renderer::json_renderer
    }
  }
}

impl FromStr for RendererType {
  type Err = Box<dyn StdError>;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s {
      "plain" => Ok(RendererType::Plain),
      "json" => Ok(RendererType::Json),
      _ => bail!(format!("invalid renderer type: {}", s))
    }
  }
}

struct RegexFromStr;

impl<'de> Visitor<'de> for RegexFromStr {
  type Value = Regex;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("a string containing a valid regular expression")
  }

  fn visit_str<E>(self, s: &str) -> std::result::Result<Self::Value, E>
  where
    E: de::Error
  {
    match Regex::new(s) {
      Ok(r) => Ok(r),
      Err(e) => Err(de::Error::custom(format!(
        "could not compile regex: {:?}", e
      )))
    }
  }
}

pub fn de_regex<'de, D>(deserializer: D) -> std::result::Result<Regex, D::Error>
where
  D: Deserializer<'de>
{
  deserializer.deserialize_str(RegexFromStr)
}

/// Site-specific additions to the built-in patterns and rules, loaded from a
/// yaml file:
///
/// ```yaml
/// patterns:
///   - id: legacy
///     pattern: '^(?P<timestamp>\S+ \S+) (?P<manager>\w+) (?P<log_type>\w+) (?P<message>.*)$'
///     datetime: '%Y-%m-%d %H:%M:%S'
/// rules:
///   - category: usb
///     match:
///       keywords: [mass storage]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ExtensionConfig {
  #[serde(default)]
  pub patterns: Vec<FormatPattern>,

  #[serde(default)]
  pub rules: Vec<Rule>
}

impl ExtensionConfig {
  pub fn load(path: &str) -> Result<ExtensionConfig> {
    let expanded_path = shellexpand::full(path)
      .map_err(|e| Error::configuration(format!("{}: {}", path, e)))?;
    let path = PathBuf::from(expanded_path.as_ref());

    let file = File::open(&path).context(ConfigRead { path: path.clone() })?;
    let reader = BufReader::new(file);

    serde_yaml::from_reader(reader).context(ConfigDeserialize { path })
  }
}

impl FromStr for ExtensionConfig {
  type Err = Error;

  fn from_str(path: &str) -> Result<Self> {
    ExtensionConfig::load(path)
  }
}

#[derive(Debug, StructOpt)]
#[structopt(
  name = "logsort",
  rename_all = "kebab-case",
  raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
pub struct Config {
  /// Log files to read. If none are given, reads standard input.
  #[structopt(parse(from_os_str))]
  pub inputs: Vec<PathBuf>,

  /// A yaml file with extra format patterns and classification rules
  ///
  /// Extra patterns and rules are tried after the built-in ones, so they can
  /// only pick up lines and messages the defaults leave alone.
  #[structopt(long, short = "c", env = "LS_CONFIG")]
  pub config: Option<ExtensionConfig>,

  /// Ignore the built-in patterns and rules, using only those in --config
  #[structopt(long)]
  pub no_defaults: bool,

  /// Keyword selecting the records to classify
  #[structopt(long, short = "k", default_value = "error", env = "LS_KEYWORD")]
  pub keyword: String,

  /// Match the keyword case-sensitively
  #[structopt(long)]
  pub case_sensitive: bool,

  /// How the keyword is interpreted, one of: text, regex
  #[structopt(long, short = "m", default_value = "text", env = "LS_FILTER_MODE")]
  pub filter_mode: FilterMode,

  /// Output format, one of: plain, json
  #[structopt(long, short, default_value = "plain", env = "LS_RENDERER")]
  pub renderer: RendererType,

  /// Log verbosity on stderr, may be repeated (-v info, -vv debug).
  /// RUST_LOG takes precedence when set.
  #[structopt(short, long, parse(from_occurrences))]
  pub verbose: u8
}

impl Config {
  fn extensions(&self) -> (Vec<FormatPattern>, Vec<Rule>) {
    match &self.config {
      Some(c) => (c.patterns.clone(), c.rules.clone()),
      None => (Vec::new(), Vec::new())
    }
  }

  /// Builds the pattern and rule sets, failing before any input is read if
  /// either is empty or invalid
  pub fn load_sets(&self) -> Result<(PatternSet, RuleSet)> {
    let (patterns, rules) = self.extensions();

    if self.no_defaults {
      Ok((PatternSet::new(patterns)?, RuleSet::new(rules)?))
    } else {
      Ok((
        PatternSet::builtin().extended(patterns)?,
        RuleSet::builtin().extended(rules)?
      ))
    }
  }

  pub fn inputs(&self) -> Vec<Input> {
    if self.inputs.is_empty() {
      vec![Input::Stdin]
    } else {
      self.inputs.iter().cloned().map(Input::File).collect()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::env;
  use std::fs;

  use spectral::prelude::*;

  use crate::classifier::ErrorCategory;
  use crate::parser::{tokenize, RawLine, Tokenized};

  const EXTENSIONS: &str = r#"
patterns:
  - id: legacy
    pattern: '^(?P<timestamp>\S+ \S+) (?P<manager>\w+) (?P<log_type>\w+) (?P<message>.*)$'
    datetime: '%Y-%m-%d %H:%M:%S'
rules:
  - category: usb
    match:
      keywords: [mass storage]
"#;

  fn config(args: &[&str]) -> Config {
    Config::from_iter_safe(args.iter()).unwrap()
  }

  fn write_temp(name: &str, content: &str) -> String {
    let path = env::temp_dir().join(name);
    fs::write(&path, content).unwrap();

    path.to_string_lossy().into_owned()
  }

  #[test]
  fn test_defaults() {
    let c = config(&["logsort"]);

    assert_that!(c.keyword).is_equal_to("error".to_string());
    assert_that!(c.filter_mode).is_equal_to(FilterMode::Text);
    assert_that!(c.renderer).is_equal_to(RendererType::Plain);
    assert_that!(c.inputs()).is_equal_to(vec![Input::Stdin]);
    assert_that!(c.load_sets().is_ok()).is_true();
  }

  #[test]
  fn test_inputs() {
    let c = config(&["logsort", "a.log", "b.log"]);

    assert_that!(c.inputs()).is_equal_to(vec![
      Input::File(PathBuf::from("a.log")),
      Input::File(PathBuf::from("b.log"))
    ]);
  }

  #[test]
  fn test_extensions_appended() {
    let path = write_temp("logsort_test_extensions.yaml", EXTENSIONS);
    let c = config(&["logsort", "--config", &path]);

    let (patterns, rules) = c.load_sets().unwrap();

    let ids: Vec<&str> = patterns.iter().map(|p| p.id.as_str()).collect();
    assert_that!(ids).is_equal_to(vec!["h1", "h1-untyped", "legacy"]);

    let line = RawLine::new(1, "2021-07-07 09:30:00 UsbMgr ERROR mass storage gone");
    match tokenize(line, &patterns) {
      Tokenized::Parsed(record) => {
        assert_that!(record.matched_pattern_id).is_equal_to("legacy".to_string());
        assert_that!(rules.categorize(&record.message)).is_equal_to(ErrorCategory::Usb);
      },
      Tokenized::Unmatched(_) => panic!("expected legacy pattern to match")
    }
  }

  #[test]
  fn test_no_defaults_without_config() {
    let c = config(&["logsort", "--no-defaults"]);

    assert_that!(c.load_sets().is_err()).is_true();
  }

  #[test]
  fn test_no_defaults_with_config() {
    let path = write_temp("logsort_test_no_defaults.yaml", EXTENSIONS);
    let c = config(&["logsort", "--no-defaults", "--config", &path]);

    let (patterns, rules) = c.load_sets().unwrap();

    assert_that!(patterns.iter().count()).is_equal_to(1);
    assert_that!(rules.categorize("camera lost")).is_equal_to(ErrorCategory::Other);
  }

  #[test]
  fn test_missing_config_file() {
    let result = Config::from_iter_safe(
      ["logsort", "--config", "/nonexistent/logsort.yaml"].iter()
    );

    assert_that!(result.is_err()).is_true();
  }

  #[test]
  fn test_unreadable_config_names_path() {
    match ExtensionConfig::load("/nonexistent/logsort.yaml") {
      Err(Error::ConfigRead { path, .. }) => {
        assert_that!(path).is_equal_to(PathBuf::from("/nonexistent/logsort.yaml"));
      },
      other => panic!("expected a config read error, got {:?}", other)
    }
  }

  #[test]
  fn test_invalid_config_regex() {
    let path = write_temp(
      "logsort_test_bad_regex.yaml",
      "patterns:\n  - id: broken\n    pattern: '(?P<message>'\n"
    );

    match ExtensionConfig::load(&path) {
      Err(Error::ConfigDeserialize { .. }) => (),
      other => panic!("expected a config deserialize error, got {:?}", other)
    }
  }

  #[test]
  fn test_invalid_datetime_format_fails_fast() {
    let path = write_temp(
      "logsort_test_bad_datetime.yaml",
      "patterns:\n  - id: odd\n    pattern: '^(?P<timestamp>\\S+) (?P<manager>\\w+) (?P<log_type>\\w+) (?P<message>.*)$'\n    datetime: '%Y-%m-%dT%Q'\n"
    );
    let c = config(&["logsort", "--config", &path]);

    assert_that!(c.load_sets().is_err()).is_true();
  }

  #[test]
  fn test_invalid_renderer() {
    let result = Config::from_iter_safe(["logsort", "--renderer", "styled"].iter());

    assert_that!(result.is_err()).is_true();
  }
}
