//! Two-phase evaluation harness.
//!
//! Per dataset: an optional training pass replays a deterministically
//! sampled subset of the shape sequence into the strategy's field-layout
//! simulator, which may return a revised field-to-column assignment; the
//! full pass then replays every row into the record-layout simulator and
//! the result is scored against the ground truth.

use colsim_model::{DatasetLayout, Layout};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::error::SimResult;
use crate::score::{analyze, Analysis};
use crate::strategy::{RecordProcessor, StrategyFactory};

/// Default segment fill size for record packers.
pub const DEFAULT_SEGMENT_FILL_SIZE: usize = 50_000;

/// Default fraction of rows replayed into the training pass.
pub const DEFAULT_SAMPLE_RATE: f64 = 0.1;

/// Harness configuration.
///
/// Segment fill sizes are a strategy concern and are configured on the
/// individual factories; the harness only controls the training pass.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fraction of rows the field-layout training pass sees. Rates at
    /// or above 1 (or below 0) disable sampling entirely.
    pub sample_rate: f64,

    /// Seed for the sampling PRNG. The same seed is used for every
    /// dataset, every run, so sampled subsets are reproducible.
    pub sample_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            sample_seed: 0,
        }
    }
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the training-pass sampling rate.
    #[must_use]
    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Sets the sampling seed.
    #[must_use]
    pub const fn sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = seed;
        self
    }
}

/// One textual record per (company, dataset, strategy) evaluation: the
/// surface an external reporting collaborator consumes.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    /// Company the dataset belongs to.
    pub company: String,
    /// Dataset name.
    pub dataset: String,
    /// Strategy display name.
    pub strategy: String,
    /// Scoring result.
    pub analysis: Analysis,
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {}",
            self.company, self.dataset, self.strategy, self.analysis
        )
    }
}

/// Replays the ground-truth shape sequence into a processor at the
/// given sampling rate.
///
/// A fresh PRNG is seeded from `seed` on every call, so the surviving
/// subset depends only on `(rate, seed)` and the sequence itself,
/// never on evaluation order. Rates at or above 1 (or below 0) replay
/// every row.
pub fn replay<P>(dataset: &DatasetLayout, processor: &mut P, rate: f64, seed: u64)
where
    P: RecordProcessor + ?Sized,
{
    let mut prng = StdRng::seed_from_u64(seed);
    for segment in &dataset.segments {
        for &shape in segment {
            if rate < 0.0 || rate >= 1.0 || prng.gen::<f64>() < rate {
                processor.process_record(shape);
            }
        }
    }
}

/// Evaluates one strategy against one dataset.
///
/// Returns `Ok(None)` for datasets with no rows; no strategy is
/// invoked for them. Phase 1 runs the optional field-layout simulator
/// over the sampled sequence; phase 2 runs the record-layout simulator
/// over the full sequence, flushes it exactly once at the end, and
/// scores the produced segments.
pub fn evaluate_dataset(
    factory: &dyn StrategyFactory,
    dataset: &DatasetLayout,
    config: &Config,
) -> SimResult<Option<Analysis>> {
    if dataset.is_empty() {
        return Ok(None);
    }

    let mut fields = dataset.fields.clone();
    if let Some(mut field_sim) = factory.field_strategy(&dataset.shapes, &fields) {
        replay(dataset, &mut *field_sim, config.sample_rate, config.sample_seed);
        fields = field_sim.into_fields();
    }

    let mut record_sim = factory.record_strategy(&dataset.shapes, &fields);
    replay(dataset, &mut *record_sim, 1.0, config.sample_seed);
    record_sim.flush();
    let segments = record_sim.into_segments();

    analyze(&segments, &fields, dataset).map(Some)
}

/// Evaluates one strategy against every dataset of a captured layout.
///
/// A schema or consistency violation abandons that one (dataset,
/// strategy) pair: its score is meaningless and is not reported.
/// Sibling evaluations continue. Companies and datasets are
/// visited in deterministic (sorted) order.
pub fn evaluate_layout(
    factory: &dyn StrategyFactory,
    layout: &Layout,
    config: &Config,
) -> Vec<DatasetReport> {
    let mut reports = Vec::new();
    for (company, company_layout) in &layout.companies {
        for (dataset, snapshot) in &company_layout.datasets {
            debug!(company, dataset, strategy = factory.name(), "evaluating dataset");
            match evaluate_dataset(factory, snapshot, config) {
                Ok(Some(analysis)) => reports.push(DatasetReport {
                    company: company.clone(),
                    dataset: dataset.clone(),
                    strategy: factory.name().to_string(),
                    analysis,
                }),
                Ok(None) => {
                    debug!(company, dataset, "skipping empty dataset");
                }
                Err(err) => {
                    warn!(
                        company,
                        dataset,
                        strategy = factory.name(),
                        %err,
                        "evaluation abandoned"
                    );
                }
            }
        }
    }
    reports
}

/// Sums the estimated byte cost across reports. Commutative, so the
/// total does not depend on evaluation order.
#[must_use]
pub fn total_used_bytes(reports: &[DatasetReport]) -> u64 {
    reports.iter().map(|r| r.analysis.used_bytes).sum()
}
