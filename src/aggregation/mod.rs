//! Aggregation strategies for the provenance record.
//!
//! Both strategies implement [`ProvenanceAggregator`] and must produce the
//! same [`RawSections`] shape for the same batch:
//!
//! * [`precomputed::PrecomputedAggregator`] asks the data layer for the whole
//!   record in one round trip through a stored routine.
//! * [`traversal::LiveTraversalAggregator`] walks the relation graph hop by hop
//!   and is used when the routine is unavailable or misbehaves.

pub mod precomputed;
pub mod sections;
pub mod traversal;

use async_trait::async_trait;
use sea_orm::DbErr;
use strum::Display;
use thiserror::Error;

pub use precomputed::{PrecomputedAggregator, SqlTraceRoutine, TraceRoutine, TraceRoutineRow};
pub use sections::{DistributionRow, OverviewRow, ProcessingRow, RawSections, Section, StorageRow};
pub use traversal::{LiveTraversalAggregator, MissingLink, Traversal};

/// Names the strategy in logs and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    Precomputed,
    LiveTraversal,
}

/// Reasons an aggregation call could not complete.
///
/// None of these mean the code is unknown; they make the orchestrator fall
/// back to the other strategy.
#[derive(Debug, Error)]
pub enum AggregationFailure {
    #[error("data layer error: {0}")]
    Database(#[from] DbErr),

    #[error("aggregation routine returned no rows")]
    EmptyResult,

    #[error("aggregation routine reported unknown status '{0}'")]
    UnknownStatus(String),

    #[error("section '{0}' is missing from an ok row")]
    MissingSection(Section),

    #[error("section '{section}' is malformed: {source}")]
    MalformedSection {
        section: Section,
        #[source]
        source: serde_json::Error,
    },

    #[error("aggregation routine unsupported: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum AggregateError {
    /// The code does not resolve to any batch. Carries the submitted code.
    #[error("no batch found for code '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Failed(#[from] AggregationFailure),
}

impl From<DbErr> for AggregateError {
    fn from(err: DbErr) -> Self {
        AggregateError::Failed(AggregationFailure::Database(err))
    }
}

/// A way of assembling the raw provenance sections for one code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProvenanceAggregator: Send + Sync {
    fn strategy(&self) -> Strategy;

    async fn aggregate(&self, code: &str) -> Result<RawSections, AggregateError>;
}
