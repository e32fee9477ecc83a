use super::{
    AggregateError, AggregationFailure, DistributionRow, OverviewRow, ProcessingRow,
    ProvenanceAggregator, RawSections, Section, StorageRow, Strategy,
};
use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, Statement,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Status reported by the routine when the batch exists.
pub const STATUS_OK: &str = "ok";
/// Status reported by the routine when no batch carries the code.
pub const STATUS_NOT_FOUND: &str = "not_found";

/// Single row returned by the stored trace routine.
///
/// Each section column holds an independently encoded JSON document (or NULL).
#[derive(Debug, Clone, Default, PartialEq, Eq, FromQueryResult)]
pub struct TraceRoutineRow {
    pub status: String,
    pub overview: Option<String>,
    pub certifications: Option<String>,
    pub processing_logs: Option<String>,
    pub storage_logs: Option<String>,
    pub distribution_logs: Option<String>,
}

/// Data-layer seam for the precomputed aggregation call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TraceRoutine: Send + Sync {
    /// Performs exactly one round trip. `Ok(None)` means the routine produced no row.
    async fn invoke(&self, code: &str) -> Result<Option<TraceRoutineRow>, AggregationFailure>;
}

/// Calls the trace routine as a set-returning SQL function (Postgres).
#[derive(Debug, Clone)]
pub struct SqlTraceRoutine {
    db: Arc<DatabaseConnection>,
    routine: String,
}

impl SqlTraceRoutine {
    /// `routine` must already be a validated SQL identifier (see `AppConfig::trace_routine`).
    pub fn new(db: Arc<DatabaseConnection>, routine: impl Into<String>) -> Self {
        Self {
            db,
            routine: routine.into(),
        }
    }

    fn statement(&self, code: &str) -> Statement {
        let sql = format!(
            "SELECT status::text AS status, overview::text AS overview, \
             certifications::text AS certifications, processing_logs::text AS processing_logs, \
             storage_logs::text AS storage_logs, distribution_logs::text AS distribution_logs \
             FROM {}($1)",
            self.routine
        );
        Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, [code.into()])
    }
}

#[async_trait]
impl TraceRoutine for SqlTraceRoutine {
    async fn invoke(&self, code: &str) -> Result<Option<TraceRoutineRow>, AggregationFailure> {
        let backend = self.db.get_database_backend();
        if backend != DatabaseBackend::Postgres {
            return Err(AggregationFailure::Unsupported(format!(
                "{} is only available on Postgres, connected backend is {:?}",
                self.routine, backend
            )));
        }

        let row = TraceRoutineRow::find_by_statement(self.statement(code))
            .one(self.db.as_ref())
            .await?;
        Ok(row)
    }
}

/// Strategy A: one call to the stored routine, sections decoded independently.
#[derive(Clone)]
pub struct PrecomputedAggregator {
    routine: Arc<dyn TraceRoutine>,
}

impl PrecomputedAggregator {
    pub fn new(routine: Arc<dyn TraceRoutine>) -> Self {
        Self { routine }
    }
}

#[async_trait]
impl ProvenanceAggregator for PrecomputedAggregator {
    fn strategy(&self) -> Strategy {
        Strategy::Precomputed
    }

    #[instrument(skip(self))]
    async fn aggregate(&self, code: &str) -> Result<RawSections, AggregateError> {
        let row = self
            .routine
            .invoke(code)
            .await?
            .ok_or(AggregationFailure::EmptyResult)?;

        match row.status.trim().to_ascii_lowercase().as_str() {
            STATUS_OK => {}
            STATUS_NOT_FOUND => return Err(AggregateError::NotFound(code.to_string())),
            other => return Err(AggregationFailure::UnknownStatus(other.to_string()).into()),
        }

        let sections = decode_sections(&row)?;
        debug!(
            processing = sections.processing_logs.len(),
            storage = sections.storage_logs.len(),
            distribution = sections.distribution_logs.len(),
            "decoded precomputed trace"
        );
        Ok(sections)
    }
}

/// Certifications arrive either as bare labels or as `{"certification": ..}` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum CertificationLabel {
    Plain(String),
    Tagged { certification: String },
}

impl From<CertificationLabel> for String {
    fn from(label: CertificationLabel) -> Self {
        match label {
            CertificationLabel::Plain(label) | CertificationLabel::Tagged { certification: label } => {
                label
            }
        }
    }
}

/// Decodes every section; one malformed section fails the whole row.
///
/// An `ok` row always describes an existing batch, so its overview is required.
pub fn decode_sections(row: &TraceRoutineRow) -> Result<RawSections, AggregationFailure> {
    let overview: OverviewRow =
        decode::<Option<OverviewRow>>(Section::Overview, row.overview.as_deref())?
            .flatten()
            .ok_or(AggregationFailure::MissingSection(Section::Overview))?;
    let certifications: Vec<CertificationLabel> =
        decode_list(Section::Certifications, row.certifications.as_deref())?;
    let processing_logs: Vec<ProcessingRow> =
        decode_list(Section::ProcessingLogs, row.processing_logs.as_deref())?;
    let storage_logs: Vec<StorageRow> =
        decode_list(Section::StorageLogs, row.storage_logs.as_deref())?;
    let distribution_logs: Vec<DistributionRow> =
        decode_list(Section::DistributionLogs, row.distribution_logs.as_deref())?;

    Ok(RawSections {
        overview: Some(overview),
        certifications: certifications.into_iter().map(String::from).collect(),
        processing_logs,
        storage_logs,
        distribution_logs,
    })
}

fn decode<T: DeserializeOwned>(
    section: Section,
    raw: Option<&str>,
) -> Result<Option<T>, AggregationFailure> {
    raw.map(|text| {
        serde_json::from_str(text)
            .map_err(|source| AggregationFailure::MalformedSection { section, source })
    })
    .transpose()
}

// NULL and JSON `null` both mean "no rows" for list sections.
fn decode_list<T: DeserializeOwned>(
    section: Section,
    raw: Option<&str>,
) -> Result<Vec<T>, AggregationFailure> {
    Ok(decode::<Option<Vec<T>>>(section, raw)?
        .flatten()
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn ok_row() -> TraceRoutineRow {
        TraceRoutineRow {
            status: STATUS_OK.into(),
            overview: Some(
                r#"{"code":"BATCH-001","harvest_date":"2024-05-02","farm_name":"Green Valley","region":"Lam Dong, Vietnam"}"#
                    .into(),
            ),
            certifications: Some(r#"["VietGAP", {"certification": "Organic"}]"#.into()),
            processing_logs: Some(
                r#"[{"facility_name":"Da Lat Packing","weight_per_unit":0.5,"processing_date":"2024-05-04"}]"#
                    .into(),
            ),
            storage_logs: Some(r#"[{"warehouse_address":"12 Kho Lanh","quantity":300}]"#.into()),
            distribution_logs: Some(
                r#"[{"shipment_status":"in_transit","destination":"Ho Chi Minh City","carrier_company":"Nam Viet Logistics"}]"#
                    .into(),
            ),
        }
    }

    fn aggregator_returning(row: Option<TraceRoutineRow>) -> PrecomputedAggregator {
        let mut routine = MockTraceRoutine::new();
        routine
            .expect_invoke()
            .times(1)
            .returning(move |_| Ok(row.clone()));
        PrecomputedAggregator::new(Arc::new(routine))
    }

    #[tokio::test]
    async fn decodes_all_five_sections() {
        let sections = aggregator_returning(Some(ok_row()))
            .aggregate("BATCH-001")
            .await
            .expect("sections");

        let overview = sections.overview.expect("overview");
        assert_eq!(overview.code, "BATCH-001");
        assert_eq!(overview.region.as_deref(), Some("Lam Dong, Vietnam"));
        assert_eq!(sections.certifications, vec!["VietGAP", "Organic"]);
        assert_eq!(sections.processing_logs[0].weight_per_unit, Some(0.5));
        assert_eq!(sections.storage_logs[0].quantity, Some(300.0));
        assert_eq!(
            sections.distribution_logs[0].carrier_company.as_deref(),
            Some("Nam Viet Logistics")
        );
    }

    #[tokio::test]
    async fn not_found_status_is_not_a_failure() {
        let row = TraceRoutineRow {
            status: "NOT_FOUND".into(),
            ..Default::default()
        };
        let result = aggregator_returning(Some(row)).aggregate("DOES-NOT-EXIST").await;
        assert_matches!(result, Err(AggregateError::NotFound(code)) if code == "DOES-NOT-EXIST");
    }

    #[tokio::test]
    async fn missing_row_is_a_failure() {
        let result = aggregator_returning(None).aggregate("BATCH-001").await;
        assert_matches!(
            result,
            Err(AggregateError::Failed(AggregationFailure::EmptyResult))
        );
    }

    #[rstest]
    #[case("error")]
    #[case("")]
    #[case("partial")]
    #[tokio::test]
    async fn unknown_status_is_a_failure(#[case] status: &str) {
        let row = TraceRoutineRow {
            status: status.to_string(),
            ..ok_row()
        };
        let result = aggregator_returning(Some(row)).aggregate("BATCH-001").await;
        assert_matches!(
            result,
            Err(AggregateError::Failed(AggregationFailure::UnknownStatus(_)))
        );
    }

    #[rstest]
    #[case(Section::Overview)]
    #[case(Section::Certifications)]
    #[case(Section::ProcessingLogs)]
    #[case(Section::StorageLogs)]
    #[case(Section::DistributionLogs)]
    fn one_malformed_section_rejects_the_whole_row(#[case] broken: Section) {
        let mut row = ok_row();
        let garbage = Some("{\"truncated\": [".to_string());
        match broken {
            Section::Overview => row.overview = garbage,
            Section::Certifications => row.certifications = garbage,
            Section::ProcessingLogs => row.processing_logs = garbage,
            Section::StorageLogs => row.storage_logs = garbage,
            Section::DistributionLogs => row.distribution_logs = garbage,
        }

        let result = decode_sections(&row);
        assert_matches!(
            result,
            Err(AggregationFailure::MalformedSection { section, .. }) if section == broken
        );
    }

    #[test]
    fn null_list_sections_mean_no_rows() {
        let row = TraceRoutineRow {
            status: STATUS_OK.into(),
            overview: Some(r#"{"code":"BATCH-001"}"#.into()),
            certifications: None,
            processing_logs: Some("null".into()),
            storage_logs: Some("[]".into()),
            distribution_logs: None,
        };

        let sections = decode_sections(&row).expect("sections");
        assert_eq!(sections.overview.map(|o| o.code).as_deref(), Some("BATCH-001"));
        assert!(sections.certifications.is_empty());
        assert!(sections.processing_logs.is_empty());
        assert!(sections.storage_logs.is_empty());
        assert!(sections.distribution_logs.is_empty());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("null"))]
    #[tokio::test]
    async fn ok_row_without_overview_is_a_failure(#[case] overview: Option<&str>) {
        let row = TraceRoutineRow {
            overview: overview.map(str::to_string),
            ..ok_row()
        };
        let result = aggregator_returning(Some(row)).aggregate("BATCH-001").await;
        assert_matches!(
            result,
            Err(AggregateError::Failed(AggregationFailure::MissingSection(
                Section::Overview
            )))
        );
    }

    #[test]
    fn statement_targets_configured_routine() {
        let db = Arc::new(DatabaseConnection::Disconnected);
        let routine = SqlTraceRoutine::new(db, "trace.get_batch_trace");
        let stmt = routine.statement("BATCH-001");
        assert!(stmt.sql.ends_with("FROM trace.get_batch_trace($1)"));
        assert_eq!(stmt.values.map(|v| v.0.len()), Some(1));
    }

    #[tokio::test]
    async fn non_postgres_backend_is_unsupported() {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("sqlite");
        let routine = SqlTraceRoutine::new(Arc::new(db), "get_batch_trace");

        let result = routine.invoke("BATCH-001").await;
        assert_matches!(result, Err(AggregationFailure::Unsupported(_)));
    }
}
