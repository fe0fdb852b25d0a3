// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::fmt;
use std::path::PathBuf;

use snafu::Snafu;

/// The pipeline stage that refused an empty input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
  Parse,
  Classify
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Stage::Parse => f.write_str("parse"),
      Stage::Classify => f.write_str("classify")
    }
  }
}

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
  #[snafu(display("nothing to {}: input contained no entries", stage))]
  EmptyInput {
    stage: Stage
  },

  #[snafu(display("invalid configuration: {}", reason))]
  Configuration {
    reason: String
  },

  #[snafu(display(
    "unable to read config at {}: {}",
    path.display(), source
  ))]
  ConfigRead {
    path: PathBuf,
    source: std::io::Error
  },

  #[snafu(display(
    "unable to deserialize config at {}: {}",
    path.display(), source
  ))]
  ConfigDeserialize {
    path: PathBuf,
    source: serde_yaml::Error
  },

  #[snafu(display("unable to read input {}: {}", input, source))]
  InputRead {
    input: String,
    source: std::io::Error
  }
}

impl Error {
  pub fn configuration<S: Into<String>>(reason: S) -> Error {
    Error::Configuration { reason: reason.into() }
  }

  /// True for whole-batch "nothing to do" conditions the caller may choose
  /// to tolerate
  pub fn is_empty_input(&self) -> bool {
    match self {
      Error::EmptyInput { .. } => true,
      _ => false
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
