use super::extract::{self, Analysis, ExtractionOutcome};
use crate::core::archive::Archive;
use crate::engine::config::ExtractionConfig;
use crate::engine::error::{IdentifiedError, PipelineError};
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// One archive file to process, optionally with an explicit identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    pub path: PathBuf,
    pub identifier: Option<String>,
}

impl BatchInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            identifier: None,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

#[derive(Debug)]
pub struct ItemReport {
    pub identifier: String,
    pub path: PathBuf,
    pub result: Result<ExtractionOutcome, PipelineError>,
}

impl ItemReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the failure with its identifier attached, if this item failed.
    pub fn into_error(self) -> Option<IdentifiedError> {
        self.result
            .err()
            .map(|source| IdentifiedError::new(self.identifier, source))
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn recognized(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.result, Ok(ExtractionOutcome::Framework { .. })))
            .count()
    }

    /// True when at least one item was given and none succeeded.
    pub fn all_failed(&self) -> bool {
        !self.items.is_empty() && self.succeeded() == 0
    }
}

/// Chooses the identifier: explicit, then `metadata.mainfile`, then the file stem.
pub fn resolve_identifier(input: &BatchInput, archive: Option<&Archive>) -> String {
    input
        .identifier
        .clone()
        .or_else(|| archive.and_then(Archive::identifier_from_mainfile))
        .unwrap_or_else(|| file_stem(&input.path))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

struct Analysed {
    identifier: String,
    path: PathBuf,
    analysis: Result<Analysis, PipelineError>,
}

fn load_and_analyze(input: &BatchInput, config: &ExtractionConfig) -> Analysed {
    let (identifier, analysis) = match Archive::from_path(&input.path) {
        Ok(archive) => (
            resolve_identifier(input, Some(&archive)),
            extract::analyze(&archive, config),
        ),
        Err(e) => (resolve_identifier(input, None), Err(e.into())),
    };
    Analysed {
        identifier,
        path: input.path.clone(),
        analysis,
    }
}

/// Processes many archives, reporting a result per input instead of stopping at the first failure.
///
/// Loading and analysis run in parallel on the current rayon pool. Persistence then
/// runs on the calling thread in input order, so each store has a single writer.
#[instrument(skip_all, name = "batch_workflow", fields(inputs = inputs.len()))]
pub fn run(
    inputs: &[BatchInput],
    config: &ExtractionConfig,
    reporter: &ProgressReporter,
) -> BatchReport {
    let analysed: Vec<Analysed> = reporter.phase("Analysis", || {
        inputs
            .par_iter()
            .map(|input| load_and_analyze(input, config))
            .collect()
    });

    let report = reporter.phase("Persistence", || {
        reporter.report(Progress::TaskStart {
            total_steps: analysed.len() as u64,
        });
        let items = analysed
            .into_iter()
            .map(|item| {
                let result = item
                    .analysis
                    .and_then(|analysis| extract::persist(&item.identifier, &analysis, config));
                if let Err(e) = &result {
                    error!(
                        identifier = %item.identifier,
                        path = %item.path.display(),
                        error = %e,
                        "Extraction failed."
                    );
                    reporter.report(Progress::ItemFailed {
                        identifier: item.identifier.clone(),
                        reason: e.to_string(),
                    });
                }
                reporter.report(Progress::TaskIncrement);
                ItemReport {
                    identifier: item.identifier,
                    path: item.path,
                    result,
                }
            })
            .collect();
        reporter.report(Progress::TaskFinish);
        BatchReport { items }
    });

    info!(
        succeeded = report.succeeded(),
        recognized = report.recognized(),
        failed = report.failed(),
        "Batch finished."
    );
    report
}
