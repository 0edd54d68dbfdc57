use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsonapi_core::hydrator::{Hydrator, HydratorDefinition};
use jsonapi_core::mapper::FieldNaming;
use jsonapi_core::test_utils::{fixture_metadata, DocumentBuilder, InMemoryRepository};
use jsonapi_core::EntityFieldMapper;
use serde_json::json;
use std::sync::Arc;

fn device_hydrator(repository: Arc<InMemoryRepository>) -> Hydrator<InMemoryRepository> {
    Hydrator::new(
        HydratorDefinition::new("Device", "devices")
            .attribute("name")
            .attribute("enabled")
            .attribute("position")
            .attribute("temperature")
            .attribute("state")
            .attribute("location")
            .attribute("street")
            .attribute("city")
            .relationship("owner")
            .relationship("channels"),
        Arc::new(fixture_metadata()),
        repository,
    )
}

fn benchmark_field_mapping(c: &mut Criterion) {
    let metadata = fixture_metadata();
    let naming = FieldNaming::new()
        .with_attribute("name", "name")
        .with_attribute("state", "state")
        .with_attribute("createdAt", "created-at")
        .with_relationship("owner", "owner");

    c.bench_function("map_entity", |b| {
        b.iter(|| {
            EntityFieldMapper::new(&metadata, &naming)
                .map_entity(black_box("Device"))
                .map(|mapping| mapping.len())
        })
    });
}

fn benchmark_create_hydration(c: &mut Criterion) {
    let repository = Arc::new(InMemoryRepository::new());
    let owner = repository.create("Owner");
    let channels: Vec<_> = (0..8).map(|_| repository.create("Channel").id).collect();
    let hydrator = device_hydrator(repository);

    let document = DocumentBuilder::new("devices")
        .attribute("name", json!("Thermostat"))
        .attribute("enabled", json!(true))
        .attribute("position", json!("4"))
        .attribute("temperature", json!(21.5))
        .attribute("state", json!("ready"))
        .attribute("location", json!({ "street": "Main 1", "city": "Brno" }))
        .has_one("owner", "owners", Some(owner.id))
        .has_many("channels", "channels", &channels)
        .build();

    c.bench_function("hydrate_create", |b| {
        b.iter(|| hydrator.hydrate(black_box(&document), None))
    });
}

fn benchmark_invalid_document(c: &mut Criterion) {
    let hydrator = device_hydrator(Arc::new(InMemoryRepository::new()));
    let document = DocumentBuilder::new("devices")
        .id("not-a-uuid")
        .attribute("name", json!(null))
        .attribute("state", json!("unknown"))
        .build();

    c.bench_function("hydrate_invalid", |b| {
        b.iter(|| hydrator.hydrate(black_box(&document), None))
    });
}

criterion_group!(
    benches,
    benchmark_field_mapping,
    benchmark_create_hydration,
    benchmark_invalid_document
);
criterion_main!(benches);
