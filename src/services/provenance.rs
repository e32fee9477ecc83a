use crate::{
    aggregation::{
        AggregateError, LiveTraversalAggregator, PrecomputedAggregator, ProvenanceAggregator,
        RawSections, SqlTraceRoutine,
    },
    config::AppConfig,
    db::DbPool,
    dto::{normalize, ProvenanceRecord},
    entities::batch,
    errors::ServiceError,
    repositories::{RelationGraph, SeaOrmRelationGraph},
};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Confirms that a scanned code names an existing batch.
#[derive(Clone)]
pub struct BatchResolver {
    graph: Arc<dyn RelationGraph>,
}

impl BatchResolver {
    pub fn new(graph: Arc<dyn RelationGraph>) -> Self {
        Self { graph }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, code: &str) -> Result<batch::Model, ServiceError> {
        self.graph
            .batch_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::batch_not_found(code))
    }
}

/// Resolves a scanned code to its provenance record.
///
/// The primary strategy runs first when configured; any failure other than
/// NotFound is logged and answered by the fallback strategy instead.
#[derive(Clone)]
pub struct ProvenanceService {
    resolver: BatchResolver,
    primary: Option<Arc<dyn ProvenanceAggregator>>,
    fallback: Arc<dyn ProvenanceAggregator>,
}

impl ProvenanceService {
    pub fn new(
        resolver: BatchResolver,
        primary: Option<Arc<dyn ProvenanceAggregator>>,
        fallback: Arc<dyn ProvenanceAggregator>,
    ) -> Self {
        Self {
            resolver,
            primary,
            fallback,
        }
    }

    /// Wires the database-backed strategies: the stored routine as primary
    /// (unless disabled) and the relation graph walk as fallback.
    pub fn from_config(db: Arc<DbPool>, config: &AppConfig) -> Self {
        let graph: Arc<dyn RelationGraph> = Arc::new(SeaOrmRelationGraph::new(db.clone()));

        let primary: Option<Arc<dyn ProvenanceAggregator>> = if config.trace_primary_enabled {
            let routine = SqlTraceRoutine::new(db, config.trace_routine.clone());
            Some(Arc::new(PrecomputedAggregator::new(Arc::new(routine))))
        } else {
            info!("Precomputed trace routine disabled, using relation graph traversal only");
            None
        };

        Self::new(
            BatchResolver::new(graph.clone()),
            primary,
            Arc::new(LiveTraversalAggregator::new(graph)),
        )
    }

    #[instrument(skip(self))]
    pub async fn trace(&self, code: &str) -> Result<ProvenanceRecord, ServiceError> {
        let start = Instant::now();

        if let Err(err) = self.resolver.resolve(code).await {
            if matches!(err, ServiceError::NotFound(_)) {
                counter!("farmtrace.provenance.not_found", 1);
            }
            return Err(err);
        }

        let raw = match &self.primary {
            Some(primary) => match primary.aggregate(code).await {
                Ok(raw) => {
                    record_resolved(primary.as_ref());
                    raw
                }
                Err(AggregateError::NotFound(missing)) => {
                    counter!("farmtrace.provenance.not_found", 1);
                    return Err(ServiceError::batch_not_found(&missing));
                }
                Err(AggregateError::Failed(failure)) => {
                    warn!(
                        strategy = %primary.strategy(),
                        error = %failure,
                        "Primary aggregation failed, falling back"
                    );
                    counter!("farmtrace.provenance.fallback", 1);
                    self.run_fallback(code).await?
                }
            },
            None => self.run_fallback(code).await?,
        };

        histogram!(
            "farmtrace.provenance.duration_ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(normalize(raw))
    }

    async fn run_fallback(&self, code: &str) -> Result<RawSections, ServiceError> {
        match self.fallback.aggregate(code).await {
            Ok(raw) => {
                record_resolved(self.fallback.as_ref());
                Ok(raw)
            }
            Err(AggregateError::NotFound(missing)) => {
                counter!("farmtrace.provenance.not_found", 1);
                Err(ServiceError::batch_not_found(&missing))
            }
            Err(AggregateError::Failed(failure)) => {
                error!(
                    strategy = %self.fallback.strategy(),
                    error = %failure,
                    "Fallback aggregation failed for an existing batch"
                );
                counter!("farmtrace.provenance.failed", 1);
                Err(ServiceError::TraceUnavailable(format!(
                    "code '{}': {}",
                    code, failure
                )))
            }
        }
    }
}

fn record_resolved(aggregator: &dyn ProvenanceAggregator) {
    counter!(
        "farmtrace.provenance.resolved",
        1,
        "strategy" => aggregator.strategy().to_string()
    );
}
