mod common;

use common::*;
use jsonapi_core::hydrator::{Hydrator, HydratorDefinition};
use jsonapi_core::registry::HydratorRegistry;
use jsonapi_core::test_utils::{fixture_metadata, DocumentBuilder, InMemoryRepository};
use jsonapi_core::JsonApiError;
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn registry(repository: Arc<InMemoryRepository>) -> HydratorRegistry<InMemoryRepository> {
    let registry = HydratorRegistry::new();
    registry.add(device_hydrator(repository.clone()));
    registry.add(Hydrator::new(
        HydratorDefinition::new("Channel", "channels")
            .attribute("name")
            .relationship("device"),
        Arc::new(fixture_metadata()),
        repository,
    ));
    registry
}

#[test]
fn test_documents_are_routed_by_resource_type() {
    let repository = Arc::new(InMemoryRepository::new());
    let device = repository.create("Device");
    let registry = registry(repository);

    let channel = DocumentBuilder::new("channels")
        .attribute("name", json!("Humidity"))
        .has_one("device", "devices", Some(device.id))
        .build();
    let record = registry.hydrate(&channel, None).unwrap();

    assert_eq!(record.entity_class(), Some("Channel"));
    assert_eq!(record.get("device").and_then(|v| v.as_entity()), Some(&device));

    let lamp = DocumentBuilder::new("devices")
        .attribute("name", json!("Lamp"))
        .build();
    assert_eq!(
        registry.hydrate(&lamp, None).unwrap().entity_class(),
        Some("Device")
    );
}

#[test]
fn test_unroutable_document_fails_at_type() {
    let registry = registry(Arc::new(InMemoryRepository::new()));
    let document = DocumentBuilder::new("sensors").id("abc").build();

    assert!(registry.find_hydrator(&document).is_none());

    let error = registry.hydrate(&document, None).unwrap_err();
    assert!(matches!(&error, JsonApiError::Single(e) if e.pointer() == Some("/data/type")));
    assert_eq!(error.status_code(), 422);
    assert_eq!(
        error.errors()[0].error_type.as_deref(),
        Some("resourceInvalid")
    );
}

#[test]
fn test_hydrator_errors_pass_through() {
    let registry = registry(Arc::new(InMemoryRepository::new()));
    let document = DocumentBuilder::new("devices")
        .id("not-a-uuid")
        .attribute("name", json!("Lamp"))
        .build();

    let error = registry.hydrate(&document, None).unwrap_err();
    assert_eq!(error_pointers(&error), vec!["/data/id".to_string()]);
}

#[test]
fn test_registry_is_shareable_across_threads() {
    let registry: Arc<HydratorRegistry<InMemoryRepository>> = Arc::new(HydratorRegistry::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.add(device_hydrator(Arc::new(InMemoryRepository::new()))))
        })
        .collect();

    let added = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|added| *added)
        .count();

    assert_eq!(added, 1);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("devices"));
}
