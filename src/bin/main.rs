extern crate samfilt;

use samfilt::config::{load_filter_config, FilterConfig, RunConfig};
use samfilt::error::ConfigError;
use samfilt::process::sam;

use clap::{load_yaml, App, ArgMatches};
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

// Parses an optional flag, leaving the current value in place when the flag is absent
fn parse_flag<T: FromStr>(
    matches: &ArgMatches,
    flag: &str,
    name: &'static str,
    current: T,
) -> Result<T, ConfigError> {
    match matches.value_of(flag) {
        Some(v) => v.parse::<T>().map_err(|_| ConfigError::InvalidValue {
            name,
            value: v.to_string(),
        }),
        None => Ok(current),
    }
}

// Layers defaults, then the JSON config file, then explicit flags
fn get_run_config(matches: &ArgMatches) -> Result<RunConfig, ConfigError> {
    let mut filter = match matches.value_of("config") {
        Some(path) => load_filter_config(Path::new(path), FilterConfig::default())?,
        None => FilterConfig::default(),
    };

    filter.min_read_length = parse_flag(matches, "length", "min_read_length", filter.min_read_length)?;
    filter.min_match_ratio = parse_flag(matches, "matchlength", "min_match_ratio", filter.min_match_ratio)?;
    filter.min_score = parse_flag(matches, "score", "min_score", filter.min_score)?;
    filter.max_length_to_score_ratio = parse_flag(
        matches,
        "lengthscore",
        "max_length_to_score_ratio",
        filter.max_length_to_score_ratio,
    )?;
    filter.worker_count = parse_flag(matches, "threads", "worker_count", filter.worker_count)?;
    if matches.is_present("no-strict") {
        filter.strict = false;
    } else if matches.is_present("strict") {
        filter.strict = true;
    }

    RunConfig::new(
        matches.value_of("input").map(String::from),
        matches.value_of("output").map(String::from),
        matches.value_of("report").map(String::from),
        filter,
    )
}

fn main() {
    env_logger::init();

    let yaml = load_yaml!("cli.yml");

    // Parse command line arguments based on the yaml schema
    let app = App::from_yaml(yaml);
    let mut help = app.clone();
    let matches = app.get_matches();

    let run_config = match get_run_config(&matches) {
        Ok(run_config) => run_config,
        Err(e) => {
            eprintln!("Error -- {}\n", e);
            let _ = help.print_help();
            eprintln!();
            exit(2);
        }
    };

    match sam::process(&run_config) {
        Ok(summary) => {
            println!(
                "Processed {} records ({} eligible), kept {}",
                summary.records,
                summary.report.eligible(),
                summary.report.kept
            );

            if summary.report.malformed > 0 {
                println!("Skipped {} malformed records", summary.report.malformed);
            }
        }
        Err(e) => {
            eprintln!("Error -- {}", e);
            exit(1);
        }
    }
}
