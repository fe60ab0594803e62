use std::io::Write;

use crate::filter::read::FilterReason;

/// Per-reason tallies for one run, or one chunk of a run before merging.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterReport {
    pub evaluated: usize,
    pub kept: usize,
    pub not_primary: usize,
    pub score_below_threshold: usize,
    pub length_to_score_ratio: usize,
    pub short_read: usize,
    pub low_match_ratio: usize,
    pub malformed: usize,
}

impl FilterReport {
    pub fn record(&mut self, outcome: Option<FilterReason>) {
        self.evaluated += 1;

        match outcome {
            None => self.kept += 1,
            Some(FilterReason::NotPrimary) => self.not_primary += 1,
            Some(FilterReason::ScoreBelowThreshold) => self.score_below_threshold += 1,
            Some(FilterReason::LengthToScoreRatio) => self.length_to_score_ratio += 1,
            Some(FilterReason::ShortRead) => self.short_read += 1,
            Some(FilterReason::LowMatchRatio) => self.low_match_ratio += 1,
        }
    }

    pub fn record_malformed(&mut self) {
        self.evaluated += 1;
        self.malformed += 1;
    }

    pub fn merge(&mut self, other: &FilterReport) {
        self.evaluated += other.evaluated;
        self.kept += other.kept;
        self.not_primary += other.not_primary;
        self.score_below_threshold += other.score_below_threshold;
        self.length_to_score_ratio += other.length_to_score_ratio;
        self.short_read += other.short_read;
        self.low_match_ratio += other.low_match_ratio;
        self.malformed += other.malformed;
    }

    // Records whose flag made them candidates for filtering
    pub fn eligible(&self) -> usize {
        self.evaluated - self.not_primary - self.malformed
    }

    pub fn rows(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("records evaluated", self.evaluated),
            ("records kept", self.kept),
            ("not a primary alignment", self.not_primary),
            ("score at or below minimum", self.score_below_threshold),
            ("length to score ratio too high", self.length_to_score_ratio),
            ("read too short", self.short_read),
            ("match ratio too low", self.low_match_ratio),
            ("malformed record", self.malformed),
        ]
    }
}

// Writes the report as a two-column TSV
pub fn write_report<W: Write>(report: &FilterReport, writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    writer.write_record(&["reason", "count"])?;
    for (reason, count) in report.rows() {
        let count = count.to_string();
        writer.write_record(&[reason, count.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}
