//! Attribute pass: wire `attributes` => record values.

use super::{EntityRepository, HydrationPass};
use crate::constants::{pointers, record_keys};
use crate::document::Attributes;
use crate::error::Result;
use crate::fields::{FieldKind, FieldMapping};
use crate::translator::MessageKey;
use crate::value::{HydratedRecord, HydratedValue};
use serde_json::Value;
use tracing::debug;

impl<'h, R: EntityRepository> HydrationPass<'h, R> {
    /// Hydrate the attributes of `class_name`.
    ///
    /// `root` is the wire path of the embedded object being hydrated, `None` at the
    /// top level; it only shapes error pointers.
    pub(super) fn hydrate_attributes(
        &mut self,
        class_name: &str,
        attributes: &Attributes,
        mapping: &FieldMapping,
        root: Option<&str>,
    ) -> Result<HydratedRecord<R::Entity>> {
        let creating = self.creating();
        let hydrator = self.hydrator;
        let naming = hydrator.definition.naming();
        let hooks = hydrator.definition.hooks();
        let mut data = HydratedRecord::new();

        for field in mapping.attributes() {
            if !attributes.has(field.mapped_name()) && !naming.is_composited(field.field_name()) {
                continue;
            }

            let value = match hooks.call_attribute(field.field_name(), attributes, self.existing) {
                Some(result) => result?,
                None => field.get_value(attributes)?,
            };

            if value.is_none() && field.is_required() && creating {
                self.add_error(
                    MessageKey::MissingRequiredAttribute,
                    pointers::attribute(root, field.mapped_name()),
                );
                continue;
            }

            if !field.accepts_value(creating) {
                debug!(
                    entity = %class_name,
                    field = %field.field_name(),
                    "Ignoring attribute that is not writable"
                );
                continue;
            }

            if let FieldKind::SingleEntity(target) = field.kind() {
                if let Some(nested) = attributes.get_object(field.mapped_name()) {
                    let nested_root = pointers::nested_path(root, field.mapped_name());
                    let nested_mapping = self.nested_mapping(&target.class_name)?;
                    let mut record = self.hydrate_attributes(
                        &target.class_name,
                        &nested,
                        &nested_mapping,
                        Some(&nested_root),
                    )?;
                    if record.entity_class().is_none() {
                        record.set_entity(&target.class_name);
                    }
                    data.insert(field.field_name(), HydratedValue::Record(record));
                    continue;
                }
            }

            match value {
                Some(value) => data.insert(field.field_name(), value),
                None if field.is_nullable() => data.insert(field.field_name(), HydratedValue::Null),
                None => {}
            }
        }

        self.hydrate_constructor_parameters(class_name, attributes, mapping, &mut data)?;
        data.set_entity(class_name);

        if !creating {
            data.retain(|key| key == record_keys::ENTITY || mapping.contains_field(key));
        }

        Ok(data)
    }

    /// Mapping of an embedded value class; classes without metadata have no fields
    fn nested_mapping(&self, class_name: &str) -> Result<FieldMapping> {
        if self.hydrator.metadata.describe(class_name).is_none() {
            debug!(class = %class_name, "Embedded class has no metadata, using empty mapping");
            return Ok(FieldMapping::default());
        }
        self.mapper.map_entity(class_name)
    }

    /// Fill constructor parameters the field pass did not cover.
    ///
    /// Parameters are looked up by their renamed or literal name, falling back to
    /// their position rendered as a string key. Parameters backed by a mapped field
    /// were already decided by the field pass and are left alone.
    fn hydrate_constructor_parameters(
        &self,
        class_name: &str,
        attributes: &Attributes,
        mapping: &FieldMapping,
        data: &mut HydratedRecord<R::Entity>,
    ) -> Result<()> {
        let Some(descriptor) = self.hydrator.metadata.describe(class_name) else {
            return Ok(());
        };
        let naming = self.hydrator.definition.naming();

        for (position, parameter) in descriptor.constructor_parameters().iter().enumerate() {
            let named_key = naming
                .attribute_key(&parameter.name)
                .unwrap_or(parameter.name.as_str());

            if !parameter.variadic && attributes.has(named_key) {
                if data.contains_key(&parameter.name) || mapping.contains_field(&parameter.name) {
                    continue;
                }
                let value = self.hook_or_raw(&parameter.name, named_key, attributes)?;
                data.insert(parameter.name.clone(), value);
                continue;
            }

            let index = position.to_string();
            let positional_key = naming.attribute_key(&index).unwrap_or(index.as_str());
            if attributes.has(positional_key) && !data.contains_key(&index) {
                let value = self.hook_or_raw(&index, positional_key, attributes)?;
                data.insert(index.clone(), value);
            }
        }

        Ok(())
    }

    fn hook_or_raw(
        &self,
        hook_name: &str,
        wire_key: &str,
        attributes: &Attributes,
    ) -> Result<HydratedValue<R::Entity>> {
        let hooks = self.hydrator.definition.hooks();
        match hooks.call_attribute(hook_name, attributes, self.existing) {
            Some(result) => Ok(result?.unwrap_or(HydratedValue::Null)),
            None => Ok(HydratedValue::from_json(
                attributes.get(wire_key).cloned().unwrap_or(Value::Null),
            )),
        }
    }
}
