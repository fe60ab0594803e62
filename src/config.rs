use std::fs::read_to_string;
use std::path::Path;

use serde_json::Value;

use crate::error::ConfigError;

pub const DEFAULT_MIN_READ_LENGTH: i64 = 1000;
pub const DEFAULT_MIN_MATCH_RATIO: f64 = 0.5;
pub const DEFAULT_MIN_SCORE: i64 = 1;
pub const DEFAULT_MAX_LENGTH_TO_SCORE_RATIO: f64 = 2.0;
pub const DEFAULT_WORKER_COUNT: usize = 1;

/// Thresholds applied to every eligible read. Built once before the run and
/// shared read-only by all workers.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// May be negative, in which case every non-empty read passes the length check
    pub min_read_length: i64,
    pub min_match_ratio: f64,
    pub min_score: i64,
    pub max_length_to_score_ratio: f64,
    pub worker_count: usize,
    /// Abort the run on the first malformed record instead of skipping it
    pub strict: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            min_read_length: DEFAULT_MIN_READ_LENGTH,
            min_match_ratio: DEFAULT_MIN_MATCH_RATIO,
            min_score: DEFAULT_MIN_SCORE,
            max_length_to_score_ratio: DEFAULT_MAX_LENGTH_TO_SCORE_RATIO,
            worker_count: DEFAULT_WORKER_COUNT,
            strict: false,
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                name: "worker_count",
                value: self.worker_count.to_string(),
            });
        }

        if !self.min_match_ratio.is_finite() {
            return Err(ConfigError::InvalidValue {
                name: "min_match_ratio",
                value: self.min_match_ratio.to_string(),
            });
        }

        if !self.max_length_to_score_ratio.is_finite() {
            return Err(ConfigError::InvalidValue {
                name: "max_length_to_score_ratio",
                value: self.max_length_to_score_ratio.to_string(),
            });
        }

        Ok(())
    }

    // Overrides any thresholds present in the given JSON object, leaving the rest untouched
    pub fn apply_json(&mut self, config_obj: &Value) -> Result<(), ConfigError> {
        if let Some(v) = config_obj.get("min_read_length") {
            self.min_read_length = v.as_i64().ok_or_else(|| invalid("min_read_length", v))?;
        }

        if let Some(v) = config_obj.get("min_match_ratio") {
            self.min_match_ratio = v.as_f64().ok_or_else(|| invalid("min_match_ratio", v))?;
        }

        if let Some(v) = config_obj.get("min_score") {
            self.min_score = v.as_i64().ok_or_else(|| invalid("min_score", v))?;
        }

        if let Some(v) = config_obj.get("max_length_to_score_ratio") {
            self.max_length_to_score_ratio = v
                .as_f64()
                .ok_or_else(|| invalid("max_length_to_score_ratio", v))?;
        }

        if let Some(v) = config_obj.get("worker_count") {
            self.worker_count = v
                .as_u64()
                .map(|n| n as usize)
                .ok_or_else(|| invalid("worker_count", v))?;
        }

        if let Some(v) = config_obj.get("strict") {
            self.strict = v.as_bool().ok_or_else(|| invalid("strict", v))?;
        }

        Ok(())
    }
}

fn invalid(name: &'static str, value: &Value) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    }
}

// Reads a JSON threshold file and layers it over the given config
pub fn load_filter_config(path: &Path, base: FilterConfig) -> Result<FilterConfig, ConfigError> {
    let raw_json_string = read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;

    let v: Value =
        serde_json::from_str(&raw_json_string).map_err(|source| ConfigError::Unparseable {
            path: path.display().to_string(),
            source,
        })?;

    let mut config = base;
    config.apply_json(&v)?;
    Ok(config)
}

/// Everything a run needs: where to read, where to write, and the thresholds.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: String,
    pub output_path: String,
    pub report_path: Option<String>,
    pub filter: FilterConfig,
}

impl RunConfig {
    // Checked once before the run starts; a missing path is a usage error
    pub fn new(
        input_path: Option<String>,
        output_path: Option<String>,
        report_path: Option<String>,
        filter: FilterConfig,
    ) -> Result<RunConfig, ConfigError> {
        let input_path = input_path
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::ConfigMissing("input"))?;
        let output_path = output_path
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::ConfigMissing("output"))?;

        filter.validate()?;

        Ok(RunConfig {
            input_path,
            output_path,
            report_path,
            filter,
        })
    }
}
