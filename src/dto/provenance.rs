use crate::aggregation::{DistributionRow, OverviewRow, ProcessingRow, RawSections, StorageRow};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// Canonical traceability record for one scanned code.
///
/// Identical in shape whichever aggregation strategy produced it. Absent
/// optional fields are omitted from the JSON rather than sent as `null` or `""`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "overview": {
        "code": "BATCH-001",
        "harvestDate": "2024-05-02",
        "productName": "Arabica Coffee",
        "variety": "Catimor",
        "category": "Coffee",
        "farmName": "Green Valley",
        "farmLocation": "Lam Dong, Vietnam"
    },
    "certifications": [{"certification": "VietGAP"}, {"certification": "Organic"}],
    "processing": [],
    "storage": [],
    "shipping": [],
    "pricing": []
}))]
pub struct ProvenanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    pub certifications: Vec<CertificationEntry>,
    pub processing: Vec<ProcessingEntry>,
    pub storage: Vec<StorageEntry>,
    pub shipping: Vec<ShippingEntry>,
    /// Reserved. Always empty until vendor pricing is linked to batches.
    #[schema(value_type = Vec<Object>)]
    pub pricing: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image: Option<String>,
    /// Product type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_contact: Option<String>,
    /// "Province, Country"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Lam Dong, Vietnam")]
    pub farm_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CertificationEntry {
    #[schema(example = "VietGAP")]
    pub certification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_format: Option<String>,
}

impl From<OverviewRow> for Overview {
    fn from(row: OverviewRow) -> Self {
        Self {
            code: row.code,
            harvest_date: row.harvest_date,
            grade: row.grade,
            seed_batch: row.seed_batch,
            created_by: row.created_by,
            product_name: row.product_name,
            product_image: row.product_image,
            variety: row.variety,
            category: row.category,
            farm_name: row.farm_name,
            farm_owner: row.farm_owner,
            farm_contact: row.farm_contact,
            farm_location: row.region,
        }
    }
}

impl From<ProcessingRow> for ProcessingEntry {
    fn from(row: ProcessingRow) -> Self {
        Self {
            facility_name: row.facility_name,
            facility_address: row.facility_address,
            facility_license: row.license_number,
            processing_date: row.processing_date,
            packaging_date: row.packaging_date,
            packaging_type: row.packaging_type,
            weight_per_unit: row.weight_per_unit,
            processed_by: row.processed_by,
        }
    }
}

impl From<StorageRow> for StorageEntry {
    fn from(row: StorageRow) -> Self {
        Self {
            warehouse_address: row.warehouse_address,
            store_condition: row.store_condition,
            quantity: row.quantity,
            check_in_date: row.check_in,
            check_out_date: row.check_out,
        }
    }
}

impl From<DistributionRow> for ShippingEntry {
    fn from(row: DistributionRow) -> Self {
        Self {
            status: row.shipment_status,
            destination: row.destination,
            driver_name: row.driver_name,
            temperature: row.temperature_profile,
            route: row.route_description,
            carrier_company: row.carrier_company,
            distributor_name: row.distributor_name,
            distributor_contact: row.distributor_contact,
            distributor_type: row.distributor_type,
            retail_format: row.retail_format,
        }
    }
}

/// Maps raw strategy output into the canonical record. List order is kept as given.
pub fn normalize(raw: RawSections) -> ProvenanceRecord {
    ProvenanceRecord {
        overview: raw.overview.map(Overview::from),
        certifications: raw
            .certifications
            .into_iter()
            .map(|certification| CertificationEntry { certification })
            .collect(),
        processing: raw.processing_logs.into_iter().map(Into::into).collect(),
        storage: raw.storage_logs.into_iter().map(Into::into).collect(),
        shipping: raw.distribution_logs.into_iter().map(Into::into).collect(),
        pricing: Vec::new(),
    }
}
