//! Relationship pass: wire `relationships` => related entities.

use super::{EntityRepository, HydrationPass};
use crate::constants::pointers;
use crate::document::{RelationshipObject, Relationships, ResourceObject};
use crate::error::Result;
use crate::fields::{EntityTarget, Field, FieldMapping};
use crate::translator::MessageKey;
use crate::value::{HydratedRecord, HydratedValue};
use tracing::debug;

impl<'h, R: EntityRepository> HydrationPass<'h, R> {
    pub(super) fn hydrate_relationships(
        &mut self,
        relationships: &Relationships,
        mapping: &FieldMapping,
        included: Option<&[ResourceObject]>,
    ) -> Result<HydratedRecord<R::Entity>> {
        let hydrator = self.hydrator;
        let hooks = hydrator.definition.hooks();
        let mut data = HydratedRecord::new();

        for field in mapping.relationships() {
            let Some(target) = field.target() else {
                continue;
            };

            let Some(relationship) = relationships.get(field.mapped_name()) else {
                if field.is_required() && self.creating() {
                    self.add_error(
                        MessageKey::MissingRequiredRelation,
                        pointers::relationship_identifier(field.mapped_name()),
                    );
                }
                continue;
            };

            if let Some(value) =
                hooks.call_relationship(field.mapped_name(), relationship, included, self.existing)?
            {
                data.insert(field.field_name(), value);
                continue;
            }

            if relationship.is_has_one() {
                let value = self
                    .hydrate_has_one(field, target, relationship)
                    .map_or(HydratedValue::Null, HydratedValue::Entity);
                data.insert(field.field_name(), value);
            } else if relationship.is_has_many() {
                let entities = self.hydrate_has_many(field, target, relationship);
                data.insert(field.field_name(), HydratedValue::Entities(entities));
            } else {
                debug!(
                    relationship = %field.mapped_name(),
                    "Relationship carries no resource linkage"
                );
            }
        }

        Ok(data)
    }

    fn hydrate_has_one(
        &mut self,
        field: &Field,
        target: &EntityTarget,
        relationship: &RelationshipObject,
    ) -> Option<R::Entity> {
        let creating = self.creating();
        if !field.accepts_value(creating) {
            return None;
        }

        let found = relationship.identifier().and_then(|identifier| {
            self.hydrator
                .find_related(&target.class_name, identifier.id.as_deref())
        });

        if found.is_none() && creating && field.is_required() {
            self.add_error(
                MessageKey::MissingRequiredRelation,
                pointers::relationship_identifier(field.mapped_name()),
            );
        }

        found
    }

    /// Resolve every identifier, keeping only the entities that were found
    fn hydrate_has_many(
        &mut self,
        field: &Field,
        target: &EntityTarget,
        relationship: &RelationshipObject,
    ) -> Vec<R::Entity> {
        let creating = self.creating();
        if !field.accepts_value(creating) {
            return Vec::new();
        }

        let hydrator = self.hydrator;
        let entities: Vec<R::Entity> = relationship
            .identifiers()
            .iter()
            .filter_map(|identifier| {
                hydrator.find_related(&target.class_name, identifier.id.as_deref())
            })
            .collect();

        if entities.is_empty() && creating && field.is_required() {
            self.add_error(
                MessageKey::MissingRequiredRelation,
                pointers::relationship_data(field.mapped_name()),
            );
        }

        entities
    }
}
