// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

extern crate atty;
extern crate chrono;
extern crate dtparse;
#[macro_use] extern crate lazy_static;
extern crate regex;
extern crate shellexpand;
#[macro_use] extern crate simple_error;
extern crate structopt;

use std::error::Error;
use std::io::{self, Write};
use std::process;

use atty::Stream;
use structopt::StructOpt;
use tracing::warn;

mod config;
mod error;
mod logging;
mod filter;
mod reader;
mod parser;
mod classifier;
mod renderer;

use config::Config;
use filter::{Filter, FilterMode, RegexFilter};
use reader::Input;
use renderer::Analysis;

fn process_input(
  config: &Config,
  input: &Input,
  patterns: &parser::PatternSet,
  rules: &classifier::RuleSet,
  out: &mut dyn Write
) -> Result<(), Box<dyn Error>> {
  let mut source = reader::open(input)?;
  let parsed = parser::parse(&mut source, patterns);
  source.finish()?;

  let report = match parsed {
    Ok(report) => report,
    Err(e) if e.is_empty_input() => {
      warn!(input = %input, "skipping empty input");
      return Ok(());
    },
    Err(e) => return Err(e.into())
  };

  let selected = match config.filter_mode {
    FilterMode::Text => {
      filter::filter(&report.records, &config.keyword, config.case_sensitive)
    },
    FilterMode::Regex => {
      let re = RegexFilter::new(&config.keyword, config.case_sensitive)?;
      filter::filter_with(&report.records, &re)
    }
  };
  let filtered = selected.len();

  // nothing matching the keyword is a normal outcome, not an error
  let classification = match classifier::classify(selected, rules) {
    Ok(c) => Some(c),
    Err(e) if e.is_empty_input() => None,
    Err(e) => return Err(e.into())
  };

  let analysis = Analysis {
    source: input.to_string(),
    keyword: &config.keyword,
    report: &report,
    filtered,
    classification
  };

  let render = config.renderer.get_renderer();
  render(out, &analysis)?;

  Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
  let config = Config::from_args();
  logging::init(config.verbose)?;

  // configuration problems are fatal before any input is touched
  let (patterns, rules) = config.load_sets()?;

  let inputs = config.inputs();
  if inputs == vec![Input::Stdin] && atty::is(Stream::Stdin) {
    eprintln!(
      "{}\n\n{}\n\n{}",
      "error: no input files were given and nothing was piped in",
      Config::clap().get_matches().usage(),
      "For more information, see --help"
    );

    process::exit(1);
  }

  let stdout = io::stdout();
  let mut out = stdout.lock();

  for input in &inputs {
    process_input(&config, input, &patterns, &rules, &mut out)?;
  }

  Ok(())
}
