use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RecordError;

// Only these four codes are counted. Any other operation (D, N, P, =, X) is skipped by the scan.
const CIGAR_TOKEN_PATTERN: &str = "([0-9]*)([MISH])";

static CIGAR_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(CIGAR_TOKEN_PATTERN).expect("CIGAR token pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Match,
    Insertion,
    SoftClip,
    HardClip,
}

impl OperationKind {
    fn from_code(code: &str) -> Option<OperationKind> {
        match code {
            "M" => Some(OperationKind::Match),
            "I" => Some(OperationKind::Insertion),
            "S" => Some(OperationKind::SoftClip),
            "H" => Some(OperationKind::HardClip),
            _ => None,
        }
    }

    fn code(&self) -> char {
        match self {
            OperationKind::Match => 'M',
            OperationKind::Insertion => 'I',
            OperationKind::SoftClip => 'S',
            OperationKind::HardClip => 'H',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentOperation {
    pub length: u64,
    pub kind: OperationKind,
}

/// Aggregate length statistics for one CIGAR string.
///
/// `total_length` counts every recognised operation, `match_length` only `M`,
/// so `match_length <= total_length` always holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentStats {
    pub total_length: u64,
    pub match_length: u64,
}

impl AlignmentStats {
    // Fails instead of wrapping when the running total no longer fits in 64 bits
    pub fn add(&mut self, operation: &AlignmentOperation) -> Result<(), RecordError> {
        let overflow =
            || RecordError::InvalidCigarLength(format!("{}{}", operation.length, operation.kind.code()));

        self.total_length = self
            .total_length
            .checked_add(operation.length)
            .ok_or_else(overflow)?;

        if operation.kind == OperationKind::Match {
            self.match_length = self
                .match_length
                .checked_add(operation.length)
                .ok_or_else(overflow)?;
        }

        Ok(())
    }
}

// Takes a CIGAR string and returns an iterator over the M/I/S/H operations it contains, left to right
pub fn operations(
    cigar: &str,
) -> impl Iterator<Item = Result<AlignmentOperation, RecordError>> + '_ {
    CIGAR_TOKEN.captures_iter(cigar).filter_map(|token| {
        let kind = OperationKind::from_code(token.get(2)?.as_str())?;
        let digits = token.get(1).map_or("", |m| m.as_str());

        Some(
            digits
                .parse::<u64>()
                .map(|length| AlignmentOperation { length, kind })
                .map_err(|_| RecordError::InvalidCigarLength(token[0].to_string())),
        )
    })
}

/* Takes a CIGAR string and sums the lengths of its recognised operations.
 * "*" or a string with no M/I/S/H tokens yields zeroed stats, which the read filter then rejects.
 * A recognised code with no usable length (e.g. a bare "M") is a malformed record. */
pub fn get_alignment_stats(cigar: &str) -> Result<AlignmentStats, RecordError> {
    let mut stats = AlignmentStats::default();

    for operation in operations(cigar) {
        stats.add(&operation?)?;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::{AlignmentOperation, AlignmentStats, OperationKind};
    use crate::error::RecordError;

    // Case where every operation kind is present
    #[test]
    fn stats_mixed_operations() {
        let results = super::get_alignment_stats("76M2I22S5H").unwrap();
        let expected_results = AlignmentStats {
            total_length: 105,
            match_length: 76,
        };

        assert_eq!(results, expected_results);
    }

    // Case where only matches are present -- matches equal the total
    #[test]
    fn stats_only_matches() {
        let results = super::get_alignment_stats("100M").unwrap();

        assert_eq!(results.total_length, 100);
        assert_eq!(results.match_length, 100);
    }

    // Case where the CIGAR is unavailable
    #[test]
    fn stats_star_cigar() {
        let results = super::get_alignment_stats("*").unwrap();
        assert_eq!(results, AlignmentStats::default());
    }

    // Case where the CIGAR is empty
    #[test]
    fn stats_empty_cigar() {
        let results = super::get_alignment_stats("").unwrap();
        assert_eq!(results, AlignmentStats::default());
    }

    // Case where only unrecognised codes are present -- nothing is counted
    #[test]
    fn stats_unrecognised_codes() {
        let results = super::get_alignment_stats("10D5N3=2X1P").unwrap();
        assert_eq!(results, AlignmentStats::default());
    }

    // Case where unrecognised codes are interleaved with recognised ones
    #[test]
    fn stats_skip_deletions() {
        let results = super::get_alignment_stats("50M10D20M5N3I").unwrap();
        let expected_results = AlignmentStats {
            total_length: 73,
            match_length: 70,
        };

        assert_eq!(results, expected_results);
    }

    // Case where a recognised code has no length
    #[test]
    fn stats_missing_length() {
        let results = super::get_alignment_stats("10DM");
        assert_eq!(results, Err(RecordError::InvalidCigarLength(String::from("M"))));
    }

    // Case where the length does not fit in 64 bits
    #[test]
    fn stats_overflowing_length() {
        let results = super::get_alignment_stats("99999999999999999999999M");
        assert!(matches!(results, Err(RecordError::InvalidCigarLength(_))));
    }

    // Case where each length fits but their sum does not -- an error rather than a capped total
    #[test]
    fn stats_overflowing_total() {
        let results = super::get_alignment_stats("18446744073709551615M10S");
        assert_eq!(results, Err(RecordError::InvalidCigarLength(String::from("10S"))));

        let results = super::get_alignment_stats("18446744073709551615S1M");
        assert_eq!(results, Err(RecordError::InvalidCigarLength(String::from("1M"))));
    }

    // Operations come back in string order
    #[test]
    fn operations_in_order() {
        let results: Vec<AlignmentOperation> = super::operations("3S10M2D1I4H")
            .collect::<Result<_, _>>()
            .unwrap();

        let expected_results = vec![
            AlignmentOperation { length: 3, kind: OperationKind::SoftClip },
            AlignmentOperation { length: 10, kind: OperationKind::Match },
            AlignmentOperation { length: 1, kind: OperationKind::Insertion },
            AlignmentOperation { length: 4, kind: OperationKind::HardClip },
        ];

        assert_eq!(results, expected_results);
    }

    // Randomised M/I/S/H strings: the total is the sum of all lengths and matches never exceed it
    #[test]
    fn stats_sum_property() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let codes = ['M', 'I', 'S', 'H'];

        for _ in 0..500 {
            let mut cigar = String::new();
            let mut expected_total = 0;
            let mut expected_matches = 0;

            for _ in 0..rng.gen_range(1..12) {
                let length: u64 = rng.gen_range(1..5000);
                let code = codes[rng.gen_range(0..codes.len())];
                cigar += &format!("{}{}", length, code);

                expected_total += length;
                if code == 'M' {
                    expected_matches += length;
                }
            }

            let results = super::get_alignment_stats(&cigar).unwrap();
            assert_eq!(results.total_length, expected_total);
            assert_eq!(results.match_length, expected_matches);
            assert!(results.match_length <= results.total_length);
        }
    }
}
