use std::fs::File;
use std::io::{BufWriter, Write};

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};

use crate::error::{Result, SamfiltError};
use crate::filter::report::{write_report, FilterReport};

enum OutputWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputWriter {
    fn create(output_path: &str) -> std::io::Result<OutputWriter> {
        let file = BufWriter::new(File::create(output_path)?);

        if is_gzip(output_path) {
            Ok(OutputWriter::Gzip(
                GzBuilder::new()
                    .filename(output_path)
                    .write(file, Compression::default()),
            ))
        } else {
            Ok(OutputWriter::Plain(file))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            OutputWriter::Plain(w) => w,
            OutputWriter::Gzip(w) => w,
        }
    }

    fn finish(self) -> std::io::Result<()> {
        match self {
            OutputWriter::Plain(mut w) => w.flush(),
            OutputWriter::Gzip(w) => w.finish()?.flush(),
        }
    }
}

// Determine if an output should be compressed based on file extension
pub fn is_gzip(file: &str) -> bool {
    file.rsplit('.').next().map_or(false, |ext| ext == "gz") && file.contains('.')
}

// Writes every header line, then the records whose indices are listed in `kept`, one per line
pub fn write_sam<W: Write + ?Sized>(
    writer: &mut W,
    headers: &[String],
    records: &[String],
    kept: &[usize],
) -> std::io::Result<()> {
    for header in headers {
        writer.write_all(header.as_bytes())?;
        writer.write_all(b"\n")?;
    }

    for &idx in kept {
        writer.write_all(records[idx].as_bytes())?;
        writer.write_all(b"\n")?;
    }

    Ok(())
}

pub fn write_sam_file(
    output_path: &str,
    headers: &[String],
    records: &[String],
    kept: &[usize],
) -> Result<()> {
    let io_error = |source| SamfiltError::Io {
        path: output_path.to_string(),
        source,
    };

    let mut output = OutputWriter::create(output_path).map_err(io_error)?;
    write_sam(output.writer(), headers, records, kept).map_err(io_error)?;
    output.finish().map_err(io_error)
}

pub fn write_report_file(report_path: &str, report: &FilterReport) -> Result<()> {
    let file = File::create(report_path).map_err(|source| SamfiltError::Io {
        path: report_path.to_string(),
        source,
    })?;

    write_report(report, BufWriter::new(file)).map_err(|source| SamfiltError::Report {
        path: report_path.to_string(),
        source,
    })
}
