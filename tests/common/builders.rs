use jsonapi_core::hydrator::{Hydrator, HydratorDefinition};
use jsonapi_core::metadata::AnnotationCrudReader;
use jsonapi_core::test_utils::{fixture_metadata, InMemoryRepository, StoredEntity};
use jsonapi_core::JsonApiError;
use std::sync::Arc;

/// Definition exposing every hydratable member of the fixture `Device`
pub fn device_definition() -> HydratorDefinition<StoredEntity> {
    HydratorDefinition::new("Device", "devices")
        .attribute("name")
        .attribute("comment")
        .attribute("enabled")
        .attribute("position")
        .attribute("temperature")
        .attribute("params")
        .attribute_as("created-at", "createdAt")
        .attribute("state")
        .attribute("level")
        .attribute("label")
        .attribute("location")
        .attribute("street")
        .attribute("city")
        .relationship("owner")
        .relationship("channels")
}

/// Hydrator without a CRUD reader: every non-constructor field is optional and writable
pub fn device_hydrator(repository: Arc<InMemoryRepository>) -> Hydrator<InMemoryRepository> {
    Hydrator::new(device_definition(), Arc::new(fixture_metadata()), repository)
}

/// Hydrator reading the fixture's CRUD annotations
pub fn annotated_device_hydrator(
    repository: Arc<InMemoryRepository>,
) -> Hydrator<InMemoryRepository> {
    device_hydrator(repository).with_crud_reader(Arc::new(AnnotationCrudReader))
}

/// Pointers of every error object carried by `error`
pub fn error_pointers(error: &JsonApiError) -> Vec<String> {
    error
        .errors()
        .iter()
        .filter_map(|e| e.pointer().map(str::to_string))
        .collect()
}
