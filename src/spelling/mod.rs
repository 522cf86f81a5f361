//! Composite spell-correction pipeline (spec components 4.C–4.G).
//!
//! A [`Corrector`] is one independent correction strategy (edit-distance,
//! keyboard-layout, phonetic, query-log analytics, or an external
//! model-backed one). The [`CompositeCorrector`] runs a priority-ordered
//! sequence of them, absorbing per-stage faults so that one broken corrector
//! never aborts the whole call.

mod cache;
mod composite;
mod edit_distance;
mod keyboard;
mod llm;
mod phonetic;
mod query_log;

pub use cache::{CacheEntry, SpellCache};
pub use composite::{CompositeCorrector, DetailedResult};
pub use edit_distance::{levenshtein, EditDistanceCorrector};
pub use keyboard::KeyboardLayoutCorrector;
pub use llm::ModelCorrector;
pub use phonetic::PhoneticCorrector;
pub use query_log::{IndexClient, QueryLogCorrector};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by an individual correction stage. Per spec §7, these are
/// absorbed and logged by the composite pipeline — they never propagate to
/// the caller of `CompositeCorrector::try_correct`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorrectorError {
    #[error("cancelled")]
    Cancelled,
    #[error("stage '{0}' exceeded its deadline")]
    Timeout(String),
    #[error("stage '{0}' failed: {1}")]
    Stage(String, String),
}

/// A single correction step in a correction trace. Invariant: for steps
/// `k` and `k-1` in the same trace, `steps[k].before == steps[k-1].after`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionStep {
    pub method: String,
    pub before: String,
    pub after: String,
    pub confidence: f64,
    pub reason: String,
}

/// The result a single [`Corrector`] returns for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectorOutcome {
    pub original: String,
    pub corrected: String,
    pub has_correction: bool,
    pub success: bool,
    pub source: String,
    pub message: Option<String>,
}

impl CorrectorOutcome {
    pub fn unchanged(source: &str, query: &str) -> Self {
        Self {
            original: query.to_string(),
            corrected: query.to_string(),
            has_correction: false,
            success: true,
            source: source.to_string(),
            message: None,
        }
    }

    pub fn changed(source: &str, original: &str, corrected: &str) -> Self {
        Self {
            original: original.to_string(),
            corrected: corrected.to_string(),
            has_correction: original != corrected,
            success: true,
            source: source.to_string(),
            message: None,
        }
    }
}

/// Cooperative cancellation signal, checked between pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Contract implemented by every correction strategy, including
/// third-party/model-backed ones (spec §6). Smaller `priority` runs first.
#[async_trait]
pub trait Corrector: Send + Sync {
    /// Smaller runs first. Suggested ranges: rule-based 1-5, analytics 6-9,
    /// model-based 10+.
    fn priority(&self) -> i32;

    fn name(&self) -> &str;

    /// Attempt a correction. `deadline`, if set, is this stage's own
    /// upper-bound — external correctors MUST honor it themselves.
    async fn try_correct(
        &self,
        query: &str,
        cancel: &CancelToken,
        deadline: Option<Duration>,
    ) -> Result<CorrectorOutcome, CorrectorError>;
}
