// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use simple_error::{SimpleError, SimpleResult};
use tracing_subscriber::EnvFilter;

/// Maps the -v count to a default filter directive
fn default_directive(verbosity: u8) -> &'static str {
  match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace"
  }
}

/// Installs a tracing subscriber writing to stderr, so log output never mixes
/// with rendered results on stdout. RUST_LOG overrides the -v count.
pub fn init(verbosity: u8) -> SimpleResult<()> {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init()
    .map_err(|e| SimpleError::new(format!("unable to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
  use super::*;

  use spectral::prelude::*;

  #[test]
  fn test_default_directive() {
    assert_that!(default_directive(0)).is_equal_to("warn");
    assert_that!(default_directive(2)).is_equal_to("debug");
    assert_that!(default_directive(9)).is_equal_to("trace");
  }
}
