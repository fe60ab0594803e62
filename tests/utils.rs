use std::fs;
use std::path::{Path, PathBuf};

use samfilt::config::{FilterConfig, RunConfig};
use tempfile::TempDir;

pub const HEADERS: &str = "\
@HD\tVN:1.6\tSO:unsorted
@SQ\tSN:chrM\tLN:16569
@PG\tID:minimap2\tPN:minimap2\tVN:2.17";

// Builds one SAM line with the alignment score tag in field 13
pub fn sam_line(name: &str, flag: u32, cigar: &str, score: i64) -> String {
    format!(
        "{}\t{}\tchrM\t1\t60\t{}\t*\t0\t0\t*\t*\tNM:i:0\tms:i:{}\tAS:i:{}\tnn:i:0\ttp:A:P",
        name, flag, cigar, score, score
    )
}

pub fn write_input(dir: &TempDir, file_name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(file_name);
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(&path, contents).expect("Could not write test input");
    path
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Could not read test output")
        .lines()
        .map(String::from)
        .collect()
}

pub fn run_config(input: &Path, output: &Path, filter: FilterConfig) -> RunConfig {
    RunConfig::new(
        Some(input.to_string_lossy().to_string()),
        Some(output.to_string_lossy().to_string()),
        None,
        filter,
    )
    .expect("Could not build run config")
}

// A mix of reads: some kept by the defaults, some filtered for each reason, some never eligible
pub fn mixed_records() -> Vec<String> {
    vec![
        sam_line("kept_forward", 0, "1800M200S", 2500),
        sam_line("kept_reverse", 16, "20H1500M100I", 1600),
        sam_line("low_ratio", 0, "100M", 50),
        sam_line("clipped_ratio", 16, "50M10S", 10),
        sam_line("long_low_score", 0, "1500M", 5),
        sam_line("zero_score", 0, "2000M", 0),
        sam_line("short", 0, "900M", 1000),
        sam_line("mostly_clipped", 0, "400M1600S", 2500),
        sam_line("secondary", 256, "2000M", 2500),
        sam_line("supplementary", 2048, "2000M", 2500),
        sam_line("unmapped", 4, "*", 0),
        sam_line("no_cigar", 0, "*", 2500),
        sam_line("deletions_ignored", 16, "1200M500D10N", 1300),
    ]
}
