//! Material graph slots.
//!
//! Sample records for the serializer: a shared [`MaterialSlot`] base embedded
//! by concrete slots, the [`Slot`] base view and the [`SlotHasValue`]
//! capability view.

mod material_slot;
mod types;
mod vector2;

use glam::Vec2;

pub use material_slot::{MaterialSlot, Slot, SlotHasValue};
pub use types::{
    ConcreteSlotValueType, OutputPrecision, PreviewProperty, PropertyType, ShaderStage, SlotType,
    SlotValueType,
};
pub use vector2::Vector2MaterialSlot;

use crate::error::RegistryError;
use crate::registry::TypeRegistry;

/// Register every concrete slot type with its views.
pub fn register_slot_types(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
    registry
        .register::<Vector2MaterialSlot>()?
        .view::<dyn Slot>(|slot| slot as Box<dyn Slot>)
        .view::<dyn SlotHasValue<Vec2>>(|slot| slot as Box<dyn SlotHasValue<Vec2>>);
    Ok(())
}
