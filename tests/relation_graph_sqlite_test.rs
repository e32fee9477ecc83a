mod common;

use std::sync::Arc;

use farmtrace_api::{
    aggregation::{LiveTraversalAggregator, ProvenanceAggregator},
    dto::normalize,
    entities::{
        batch, carrier_company, category, country, distributor, facility, farm,
        farm_certification, processing, product, product_type, province, shipment,
        shipment_batch, storage_assignment, transport_leg, vendor, vendor_retail, warehouse,
    },
    repositories::{InMemoryRelationGraph, RelationGraph, SeaOrmRelationGraph},
};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    EntityTrait, IntoActiveModel, Schema,
};

async fn create_tables(db: &DatabaseConnection) {
    let backend = db.get_database_backend();
    let schema = Schema::new(DbBackend::Sqlite);
    let statements = [
        schema.create_table_from_entity(country::Entity),
        schema.create_table_from_entity(province::Entity),
        schema.create_table_from_entity(category::Entity),
        schema.create_table_from_entity(product_type::Entity),
        schema.create_table_from_entity(product::Entity),
        schema.create_table_from_entity(farm::Entity),
        schema.create_table_from_entity(farm_certification::Entity),
        schema.create_table_from_entity(batch::Entity),
        schema.create_table_from_entity(facility::Entity),
        schema.create_table_from_entity(processing::Entity),
        schema.create_table_from_entity(warehouse::Entity),
        schema.create_table_from_entity(storage_assignment::Entity),
        schema.create_table_from_entity(vendor::Entity),
        schema.create_table_from_entity(carrier_company::Entity),
        schema.create_table_from_entity(distributor::Entity),
        schema.create_table_from_entity(vendor_retail::Entity),
        schema.create_table_from_entity(shipment::Entity),
        schema.create_table_from_entity(shipment_batch::Entity),
        schema.create_table_from_entity(transport_leg::Entity),
    ];
    for stmt in statements {
        db.execute(backend.build(&stmt))
            .await
            .expect("create table");
    }
}

macro_rules! insert_rows {
    ($db:expr, $rows:expr, $module:ident) => {
        for row in $rows {
            $module::Entity::insert(row.into_active_model().reset_all())
                .exec_without_returning($db)
                .await
                .expect("insert fixture row");
        }
    };
}

/// Copies an in-memory fixture into SQLite, parents first.
async fn seed(db: &DatabaseConnection, g: InMemoryRelationGraph) {
    insert_rows!(db, g.countries, country);
    insert_rows!(db, g.provinces, province);
    insert_rows!(db, g.categories, category);
    insert_rows!(db, g.product_types, product_type);
    insert_rows!(db, g.products, product);
    insert_rows!(db, g.farms, farm);
    insert_rows!(db, g.certifications, farm_certification);
    insert_rows!(db, g.batches, batch);
    insert_rows!(db, g.facilities, facility);
    insert_rows!(db, g.processing, processing);
    insert_rows!(db, g.warehouses, warehouse);
    insert_rows!(db, g.storage, storage_assignment);
    insert_rows!(db, g.vendors, vendor);
    insert_rows!(db, g.carrier_companies, carrier_company);
    insert_rows!(db, g.distributors, distributor);
    insert_rows!(db, g.retail_formats, vendor_retail);
    insert_rows!(db, g.shipments, shipment);
    insert_rows!(db, g.shipment_batches, shipment_batch);
    insert_rows!(db, g.transport_legs, transport_leg);
}

async fn sqlite_graph(g: InMemoryRelationGraph) -> SeaOrmRelationGraph {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt)
        .await
        .expect("sqlite connection");
    create_tables(&db).await;
    seed(&db, g).await;
    SeaOrmRelationGraph::new(Arc::new(db))
}

#[tokio::test]
async fn sqlite_graph_matches_in_memory_fixture() {
    let graph = sqlite_graph(common::shipped_graph()).await;

    let from_db = LiveTraversalAggregator::new(Arc::new(graph))
        .aggregate(common::BATCH_CODE)
        .await
        .expect("sqlite traversal");
    let from_memory = LiveTraversalAggregator::new(Arc::new(common::shipped_graph()))
        .aggregate(common::BATCH_CODE)
        .await
        .expect("memory traversal");

    assert_eq!(normalize(from_db), normalize(from_memory));
}

#[tokio::test]
async fn lists_come_back_in_id_order() {
    let graph = sqlite_graph(common::shipped_graph()).await;

    let labels: Vec<String> = graph
        .farm_certifications(20)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.certification)
        .collect();
    assert_eq!(labels, vec!["VietGAP", "Organic"]);

    let legs = graph.transport_legs(70).await.unwrap();
    assert_eq!(legs.iter().map(|l| l.id).collect::<Vec<_>>(), vec![80, 81]);
}

#[tokio::test]
async fn unknown_code_has_no_batch() {
    let graph = sqlite_graph(common::green_valley_graph()).await;
    assert!(graph.batch_by_code("DOES-NOT-EXIST").await.unwrap().is_none());
    assert!(graph.shipments_for_batch(1).await.unwrap().is_empty());
}
