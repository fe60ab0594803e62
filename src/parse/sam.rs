use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{Result, SamfiltError};

pub const HEADER_PREFIX: char = '@';

/// Whole alignment file held in memory, headers split from records.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SamContents {
    pub headers: Vec<String>,
    pub records: Vec<String>,
}

// Takes a line reader and separates '@' header lines from alignment records, keeping the order of both
pub fn read_sam<R: BufRead>(reader: R) -> std::io::Result<SamContents> {
    let mut contents = SamContents::default();

    for line in reader.lines() {
        let line = line?;

        if line.starts_with(HEADER_PREFIX) {
            contents.headers.push(line);
        } else if !line.is_empty() {
            contents.records.push(line);
        }
    }

    Ok(contents)
}

// Opens a plain or compressed alignment file and reads it fully into memory
pub fn read_sam_file(file_path: &str) -> Result<SamContents> {
    let io_error = |source| SamfiltError::Io {
        path: file_path.to_string(),
        source,
    };

    let reader: Box<dyn Read> = match niffler::from_path(Path::new(file_path)) {
        Ok((reader, _)) => reader,
        // Too short to sniff a compression format, so it can only be plain text
        Err(niffler::Error::FileTooShort) => Box::new(File::open(file_path).map_err(io_error)?),
        Err(source) => {
            return Err(SamfiltError::Open {
                path: file_path.to_string(),
                source,
            })
        }
    };

    read_sam(BufReader::new(reader)).map_err(|source| SamfiltError::Io {
        path: file_path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::SamContents;

    #[test]
    fn split_headers_and_records() {
        let data = "\
@HD\tVN:1.6\tSO:unsorted
@SQ\tSN:chr1\tLN:1000
r1\t0\tchr1
@PG\tID:aligner
r2\t16\tchr1
";

        let results = super::read_sam(data.as_bytes()).unwrap();

        let expected_results = SamContents {
            headers: vec![
                String::from("@HD\tVN:1.6\tSO:unsorted"),
                String::from("@SQ\tSN:chr1\tLN:1000"),
                String::from("@PG\tID:aligner"),
            ],
            records: vec![String::from("r1\t0\tchr1"), String::from("r2\t16\tchr1")],
        };

        assert_eq!(results, expected_results);
    }

    // Case where the file has Windows line endings and blank lines
    #[test]
    fn crlf_and_blank_lines() {
        let data = "@HD\tVN:1.6\r\n\r\nr1\t0\tchr1\r\n\n";

        let results = super::read_sam(data.as_bytes()).unwrap();

        assert_eq!(results.headers, vec![String::from("@HD\tVN:1.6")]);
        assert_eq!(results.records, vec![String::from("r1\t0\tchr1")]);
    }

    #[test]
    fn missing_file() {
        let results = super::read_sam_file("/nonexistent/path/to/input.sam");
        assert!(results.is_err());
    }
}
