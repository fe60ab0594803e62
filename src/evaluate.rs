use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::FilterConfig;
use crate::error::{EvaluateError, RecordError};
use crate::filter::read::evaluate_line;
use crate::filter::report::FilterReport;

// Fraction of the per-worker share handed out as one unit of work
const CHUNK_FRACTION: f64 = 0.2;
const MAX_RECORD_ERROR_REPORT_SIZE: usize = 100;

/// Shared flag for stopping a run between chunks. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Surviving record indices, in input order, and the merged tallies.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Evaluation {
    pub kept: Vec<usize>,
    pub report: FilterReport,
}

enum ChunkOutcome {
    Done {
        kept: Vec<usize>,
        report: FilterReport,
    },
    Failed {
        index: usize,
        error: RecordError,
        unevaluated: Range<usize>,
    },
    Skipped(Range<usize>),
}

// floor(0.2 * records / workers), never below one record per chunk
pub fn get_chunk_size(record_count: usize, worker_count: usize) -> usize {
    let chunk_size = (CHUNK_FRACTION * record_count as f64 / worker_count.max(1) as f64).floor();
    (chunk_size as usize).max(1)
}

pub struct ParallelEvaluator<'a> {
    config: &'a FilterConfig,
    cancel: CancelToken,
    error_reports: AtomicUsize,
}

impl<'a> ParallelEvaluator<'a> {
    pub fn new(config: &'a FilterConfig) -> Self {
        ParallelEvaluator {
            config,
            cancel: CancelToken::new(),
            error_reports: AtomicUsize::new(0),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /* Runs every record through the read filter on a pool of `worker_count` threads.
     * Each chunk fills its own buffer; buffers are merged in chunk order once all workers
     * are done, so survivors come back in input order whatever the worker count. */
    pub fn evaluate<S: AsRef<str> + Sync>(&self, records: &[S]) -> Result<Evaluation, EvaluateError> {
        let chunk_size = get_chunk_size(records.len(), self.config.worker_count);
        let halt = AtomicBool::new(false);

        info!(
            "Evaluating {} records in chunks of {} on {} worker(s)",
            records.len(),
            chunk_size,
            self.config.worker_count
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_count)
            .build()?;

        let outcomes: Vec<ChunkOutcome> = pool.install(|| {
            records
                .par_chunks(chunk_size)
                .enumerate()
                .map(|(chunk_idx, chunk)| self.evaluate_chunk(chunk_idx * chunk_size, chunk, &halt))
                .collect()
        });

        self.merge_outcomes(outcomes)
    }

    fn evaluate_chunk<S: AsRef<str>>(
        &self,
        start: usize,
        chunk: &[S],
        halt: &AtomicBool,
    ) -> ChunkOutcome {
        let end = start + chunk.len();

        if halt.load(Ordering::SeqCst) || self.cancel.is_cancelled() {
            return ChunkOutcome::Skipped(start..end);
        }

        let mut kept = Vec::new();
        let mut report = FilterReport::default();

        for (offset, line) in chunk.iter().enumerate() {
            let index = start + offset;

            match evaluate_line(line.as_ref(), self.config) {
                Ok(None) => {
                    kept.push(index);
                    report.record(None);
                }
                Ok(reason) => report.record(reason),
                Err(error) if self.config.strict => {
                    halt.store(true, Ordering::SeqCst);
                    return ChunkOutcome::Failed {
                        index,
                        error,
                        unevaluated: index..end,
                    };
                }
                Err(error) => {
                    if self.error_reports.fetch_add(1, Ordering::Relaxed) < MAX_RECORD_ERROR_REPORT_SIZE {
                        warn!("Skipping malformed record {}: {}", index, error);
                    }
                    report.record_malformed();
                }
            }
        }

        debug!("Chunk {}-{} done, {} kept", start, end, kept.len());
        ChunkOutcome::Done { kept, report }
    }

    fn merge_outcomes(&self, outcomes: Vec<ChunkOutcome>) -> Result<Evaluation, EvaluateError> {
        let mut evaluation = Evaluation::default();
        let mut unevaluated: Vec<Range<usize>> = Vec::new();
        let mut failure: Option<(usize, RecordError)> = None;

        for outcome in outcomes {
            match outcome {
                ChunkOutcome::Done { kept, report } => {
                    evaluation.kept.extend(kept);
                    evaluation.report.merge(&report);
                }
                ChunkOutcome::Failed {
                    index,
                    error,
                    unevaluated: range,
                } => {
                    if failure.is_none() {
                        failure = Some((index, error));
                    }
                    push_range(&mut unevaluated, range);
                }
                ChunkOutcome::Skipped(range) => push_range(&mut unevaluated, range),
            }
        }

        let malformed = evaluation.report.malformed;
        if malformed > MAX_RECORD_ERROR_REPORT_SIZE {
            warn!(
                "{} malformed records skipped in total, only the first {} were reported",
                malformed, MAX_RECORD_ERROR_REPORT_SIZE
            );
        }

        if let Some((index, source)) = failure {
            return Err(EvaluateError::WorkerFailed {
                index,
                source,
                unevaluated,
            });
        }

        if !unevaluated.is_empty() {
            return Err(EvaluateError::Cancelled {
                partial: Box::new(evaluation.report),
                kept: evaluation.kept,
                unevaluated,
            });
        }

        Ok(evaluation)
    }
}

// Appends a range, joining it to the previous one when they touch
fn push_range(ranges: &mut Vec<Range<usize>>, range: Range<usize>) {
    if range.is_empty() {
        return;
    }

    match ranges.last_mut() {
        Some(last) if last.end == range.start => last.end = range.end,
        _ => ranges.push(range),
    }
}
