use crate::cigar::{get_alignment_stats, AlignmentStats};
use crate::config::FilterConfig;
use crate::error::RecordError;
use crate::record::AlignmentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterReason {
    NotPrimary,
    ScoreBelowThreshold,
    LengthToScoreRatio,
    ShortRead,
    LowMatchRatio,
}

// Score must exceed the minimum and the length-per-score ratio must stay under the maximum
pub fn is_good_score(total_length: u64, score: i64, config: &FilterConfig) -> bool {
    check_score(total_length, score, config).is_none()
}

// Read must be longer than the minimum and match the reference over more than the minimum fraction
pub fn meets_coverage(total_length: u64, match_length: u64, config: &FilterConfig) -> bool {
    check_coverage(total_length, match_length, config).is_none()
}

fn check_score(total_length: u64, score: i64, config: &FilterConfig) -> Option<FilterReason> {
    if score <= config.min_score {
        return Some(FilterReason::ScoreBelowThreshold);
    }

    // Only reachable with a negative minimum score
    if score == 0 {
        return Some(FilterReason::LengthToScoreRatio);
    }

    if (total_length as f64 / score as f64) < config.max_length_to_score_ratio {
        None
    } else {
        Some(FilterReason::LengthToScoreRatio)
    }
}

fn check_coverage(
    total_length: u64,
    match_length: u64,
    config: &FilterConfig,
) -> Option<FilterReason> {
    if total_length == 0 || i128::from(total_length) <= i128::from(config.min_read_length) {
        return Some(FilterReason::ShortRead);
    }

    if (match_length as f64 / total_length as f64) > config.min_match_ratio {
        None
    } else {
        Some(FilterReason::LowMatchRatio)
    }
}

/* Takes the CIGAR statistics and alignment score of a read and returns the reason it fails,
 * or None if it should be kept. The score predicate is checked first; the coverage predicate
 * only runs once the score passes. */
pub fn filter_read(stats: &AlignmentStats, score: i64, config: &FilterConfig) -> Option<FilterReason> {
    check_score(stats.total_length, score, config)
        .or_else(|| check_coverage(stats.total_length, stats.match_length, config))
}

// Takes one raw alignment line and decides whether it survives. Non-primary records are never scored.
pub fn evaluate_line(line: &str, config: &FilterConfig) -> Result<Option<FilterReason>, RecordError> {
    let record = AlignmentRecord::parse(line)?;

    if !record.is_primary() {
        return Ok(Some(FilterReason::NotPrimary));
    }

    let score = record.score()?;
    let stats = get_alignment_stats(record.cigar()?)?;

    Ok(filter_read(&stats, score, config))
}
