//! Read-only accessors over the relation graph rooted at a batch.
//!
//! The resolver depends only on [`RelationGraph`], one accessor per hop, so a
//! missing province and a missing farm surface as two different `None`s
//! instead of one collapsed join.

use async_trait::async_trait;
use sea_orm::DbErr;

use crate::entities::{
    batch, carrier_company, category, country, distributor, facility, farm, farm_certification,
    processing, product, product_type, province, shipment, storage_assignment, transport_leg,
    vendor, vendor_retail, warehouse,
};

pub mod memory;
pub mod relation_graph;

pub use memory::InMemoryRelationGraph;
pub use relation_graph::SeaOrmRelationGraph;

/// Every list accessor returns rows in primary-key order.
#[async_trait]
pub trait RelationGraph: Send + Sync {
    async fn batch_by_code(&self, code: &str) -> Result<Option<batch::Model>, DbErr>;

    async fn product(&self, id: i32) -> Result<Option<product::Model>, DbErr>;
    async fn product_type(&self, id: i32) -> Result<Option<product_type::Model>, DbErr>;
    async fn category(&self, id: i32) -> Result<Option<category::Model>, DbErr>;

    async fn farm(&self, id: i32) -> Result<Option<farm::Model>, DbErr>;
    async fn province(&self, id: i32) -> Result<Option<province::Model>, DbErr>;
    async fn country(&self, id: i32) -> Result<Option<country::Model>, DbErr>;
    async fn farm_certifications(
        &self,
        farm_id: i32,
    ) -> Result<Vec<farm_certification::Model>, DbErr>;

    async fn processing_with_facility(
        &self,
        batch_id: i32,
    ) -> Result<Vec<(processing::Model, Option<facility::Model>)>, DbErr>;

    async fn storage_with_warehouse(
        &self,
        batch_id: i32,
    ) -> Result<Vec<(storage_assignment::Model, Option<warehouse::Model>)>, DbErr>;

    /// Shipments the batch is a member of, in membership order.
    async fn shipments_for_batch(&self, batch_id: i32) -> Result<Vec<shipment::Model>, DbErr>;
    async fn transport_legs(&self, shipment_id: i32) -> Result<Vec<transport_leg::Model>, DbErr>;
    async fn carrier_company(&self, vendor_id: i32)
        -> Result<Option<carrier_company::Model>, DbErr>;
    async fn distributor(&self, vendor_id: i32) -> Result<Option<distributor::Model>, DbErr>;
    async fn vendor(&self, id: i32) -> Result<Option<vendor::Model>, DbErr>;
    async fn retail_formats(&self, vendor_id: i32) -> Result<Vec<vendor_retail::Model>, DbErr>;
}
