use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use super::RelationGraph;
use crate::entities::{
    batch, carrier_company, category, country, distributor, facility, farm, farm_certification,
    processing, product, product_type, province, shipment, shipment_batch, storage_assignment,
    transport_leg, vendor, vendor_retail, warehouse,
};

/// Relation graph backed by a live database connection.
#[derive(Debug, Clone)]
pub struct SeaOrmRelationGraph {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRelationGraph {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl RelationGraph for SeaOrmRelationGraph {
    async fn batch_by_code(&self, code: &str) -> Result<Option<batch::Model>, DbErr> {
        batch::Entity::find()
            .filter(batch::Column::Code.eq(code))
            .one(self.get_db())
            .await
    }

    async fn product(&self, id: i32) -> Result<Option<product::Model>, DbErr> {
        product::Entity::find_by_id(id).one(self.get_db()).await
    }

    async fn product_type(&self, id: i32) -> Result<Option<product_type::Model>, DbErr> {
        product_type::Entity::find_by_id(id).one(self.get_db()).await
    }

    async fn category(&self, id: i32) -> Result<Option<category::Model>, DbErr> {
        category::Entity::find_by_id(id).one(self.get_db()).await
    }

    async fn farm(&self, id: i32) -> Result<Option<farm::Model>, DbErr> {
        farm::Entity::find_by_id(id).one(self.get_db()).await
    }

    async fn province(&self, id: i32) -> Result<Option<province::Model>, DbErr> {
        province::Entity::find_by_id(id).one(self.get_db()).await
    }

    async fn country(&self, id: i32) -> Result<Option<country::Model>, DbErr> {
        country::Entity::find_by_id(id).one(self.get_db()).await
    }

    async fn farm_certifications(
        &self,
        farm_id: i32,
    ) -> Result<Vec<farm_certification::Model>, DbErr> {
        farm_certification::Entity::find()
            .filter(farm_certification::Column::FarmId.eq(farm_id))
            .order_by_asc(farm_certification::Column::Id)
            .all(self.get_db())
            .await
    }

    async fn processing_with_facility(
        &self,
        batch_id: i32,
    ) -> Result<Vec<(processing::Model, Option<facility::Model>)>, DbErr> {
        processing::Entity::find()
            .filter(processing::Column::BatchId.eq(batch_id))
            .find_also_related(facility::Entity)
            .order_by_asc(processing::Column::Id)
            .all(self.get_db())
            .await
    }

    async fn storage_with_warehouse(
        &self,
        batch_id: i32,
    ) -> Result<Vec<(storage_assignment::Model, Option<warehouse::Model>)>, DbErr> {
        storage_assignment::Entity::find()
            .filter(storage_assignment::Column::BatchId.eq(batch_id))
            .find_also_related(warehouse::Entity)
            .order_by_asc(storage_assignment::Column::Id)
            .all(self.get_db())
            .await
    }

    async fn shipments_for_batch(&self, batch_id: i32) -> Result<Vec<shipment::Model>, DbErr> {
        let memberships = shipment_batch::Entity::find()
            .filter(shipment_batch::Column::BatchId.eq(batch_id))
            .find_also_related(shipment::Entity)
            .order_by_asc(shipment_batch::Column::Id)
            .all(self.get_db())
            .await?;

        // A membership pointing at a deleted shipment contributes nothing.
        Ok(memberships
            .into_iter()
            .filter_map(|(_, shipment)| shipment)
            .collect())
    }

    async fn transport_legs(&self, shipment_id: i32) -> Result<Vec<transport_leg::Model>, DbErr> {
        transport_leg::Entity::find()
            .filter(transport_leg::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(transport_leg::Column::Id)
            .all(self.get_db())
            .await
    }

    async fn carrier_company(
        &self,
        vendor_id: i32,
    ) -> Result<Option<carrier_company::Model>, DbErr> {
        carrier_company::Entity::find_by_id(vendor_id)
            .one(self.get_db())
            .await
    }

    async fn distributor(&self, vendor_id: i32) -> Result<Option<distributor::Model>, DbErr> {
        distributor::Entity::find_by_id(vendor_id)
            .one(self.get_db())
            .await
    }

    async fn vendor(&self, id: i32) -> Result<Option<vendor::Model>, DbErr> {
        vendor::Entity::find_by_id(id).one(self.get_db()).await
    }

    async fn retail_formats(&self, vendor_id: i32) -> Result<Vec<vendor_retail::Model>, DbErr> {
        vendor_retail::Entity::find()
            .filter(vendor_retail::Column::VendorId.eq(vendor_id))
            .order_by_asc(vendor_retail::Column::Id)
            .all(self.get_db())
            .await
    }
}
