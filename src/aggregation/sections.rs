//! Raw section shapes shared by both aggregation strategies.
//!
//! Field names follow the column names emitted by the stored trace routine,
//! so Strategy A can deserialize its sub-documents straight into these rows
//! and Strategy B builds the very same rows from the relation graph.

use serde::{Deserialize, Serialize};
use strum::Display;

/// The five independently encoded sections of a traceability record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Section {
    Overview,
    Certifications,
    ProcessingLogs,
    StorageLogs,
    DistributionLogs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewRow {
    pub code: String,
    /// ISO-8601 date
    pub harvest_date: Option<String>,
    pub grade: Option<String>,
    pub seed_batch: Option<String>,
    pub created_by: Option<String>,
    pub product_name: Option<String>,
    pub product_image: Option<String>,
    pub variety: Option<String>,
    pub category: Option<String>,
    pub farm_name: Option<String>,
    pub farm_owner: Option<String>,
    pub farm_contact: Option<String>,
    /// "<province>, <country>"
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRow {
    pub facility_name: Option<String>,
    pub facility_address: Option<String>,
    pub license_number: Option<String>,
    pub processing_date: Option<String>,
    pub packaging_date: Option<String>,
    pub packaging_type: Option<String>,
    pub weight_per_unit: Option<f64>,
    pub processed_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageRow {
    pub warehouse_address: Option<String>,
    pub store_condition: Option<String>,
    pub quantity: Option<f64>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionRow {
    pub shipment_status: Option<String>,
    pub destination: Option<String>,
    pub driver_name: Option<String>,
    pub temperature_profile: Option<String>,
    pub route_description: Option<String>,
    pub carrier_company: Option<String>,
    pub distributor_name: Option<String>,
    pub distributor_contact: Option<String>,
    pub distributor_type: Option<String>,
    pub retail_format: Option<String>,
}

/// Un-normalized output of an aggregation strategy.
///
/// List order is the order produced by the strategy and is preserved all the
/// way to the response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSections {
    pub overview: Option<OverviewRow>,
    pub certifications: Vec<String>,
    pub processing_logs: Vec<ProcessingRow>,
    pub storage_logs: Vec<StorageRow>,
    pub distribution_logs: Vec<DistributionRow>,
}
