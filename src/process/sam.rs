use std::time::Instant;

use log::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::evaluate::{CancelToken, ParallelEvaluator};
use crate::filter::report::FilterReport;
use crate::parse::sam::read_sam_file;
use crate::utils::{write_report_file, write_sam_file};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub headers: usize,
    pub records: usize,
    pub report: FilterReport,
}

pub fn process(run_config: &RunConfig) -> Result<RunSummary> {
    process_with_cancel(run_config, CancelToken::new())
}

/* Reads the whole input into memory, filters the records in parallel, then writes headers
 * followed by survivors. Nothing is written unless every record was evaluated. */
pub fn process_with_cancel(run_config: &RunConfig, cancel: CancelToken) -> Result<RunSummary> {
    let start = Instant::now();

    let contents = read_sam_file(&run_config.input_path)?;
    info!(
        "Read {} header lines and {} records into memory ({:.2}s)",
        contents.headers.len(),
        contents.records.len(),
        start.elapsed().as_secs_f64()
    );

    let evaluation = ParallelEvaluator::new(&run_config.filter)
        .with_cancel_token(cancel)
        .evaluate(&contents.records)?;
    info!(
        "Done filtering reads, {} of {} kept ({:.2}s)",
        evaluation.kept.len(),
        contents.records.len(),
        start.elapsed().as_secs_f64()
    );

    write_sam_file(
        &run_config.output_path,
        &contents.headers,
        &contents.records,
        &evaluation.kept,
    )?;
    info!("Output written to {}", run_config.output_path);

    if let Some(report_path) = &run_config.report_path {
        write_report_file(report_path, &evaluation.report)?;
        info!("Filter report written to {}", report_path);
    }

    Ok(RunSummary {
        headers: contents.headers.len(),
        records: contents.records.len(),
        report: evaluation.report,
    })
}
