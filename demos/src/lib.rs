//! # RedLilium Serial Demos
//!
//! ## Available Demos
//!
//! - `slot_graph_demo` - serializes a generated slot graph through its base
//!   view, reloads it and reads it back through the value capability view

pub mod args;

use glam::Vec2;
use thiserror::Error;

use redlilium_serial::slot::{
    OutputPrecision, ShaderStage, Slot, SlotHasValue, SlotType, Vector2MaterialSlot,
    register_slot_types,
};
use redlilium_serial::{
    DeserializeError, ElementContainer, Format, RegistryError, SerializeError, TypeRegistry,
};

pub use args::{CliFormat, CliPrecision, DemoArgs};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error(transparent)]
    Deserialize(#[from] DeserializeError),
    #[error("reloaded {found} slots, expected {expected}")]
    CountMismatch { expected: usize, found: usize },
}

/// Outcome of one demo run.
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub format: Format,
    /// Container text as written.
    pub text: String,
    /// One shader variable per reloaded slot, in order.
    pub variables: Vec<String>,
    /// Sum of every reloaded value, read through the capability view.
    pub value_sum: Vec2,
}

/// Alternating input/output slots with distinct values and stages.
pub fn sample_slots(count: usize) -> Vec<Box<dyn Slot>> {
    (0..count)
        .map(|i| -> Box<dyn Slot> {
            let id = i as i32;
            let (slot_type, name) = if i % 2 == 0 {
                (SlotType::Input, format!("In{i}"))
            } else {
                (SlotType::Output, format!("Out{i}"))
            };
            let stage = match i % 3 {
                0 => ShaderStage::Dynamic,
                1 => ShaderStage::Vertex,
                _ => ShaderStage::Fragment,
            };
            let value = Vec2::new(i as f32 * 0.5, 1.0 - i as f32);
            Box::new(
                Vector2MaterialSlot::new(id, name.clone(), name.to_lowercase(), slot_type, value)
                    .with_stage(stage)
                    .with_hidden(i % 5 == 4),
            )
        })
        .collect()
}

/// Serialize `count` slots, parse the container back and reload it twice.
pub fn run(args: &DemoArgs) -> Result<DemoReport, DemoError> {
    let format = Format::from(args.format);
    let precision = OutputPrecision::from(args.precision);

    let mut registry = TypeRegistry::new();
    register_slot_types(&mut registry)?;
    let serializer = registry.serializer().with_format(format);

    let slots = sample_slots(args.count);
    let container = serializer.serialize_container(&slots)?;
    let text = container.to_text(format)?;
    log::info!(
        "Serialized {} slots into {} bytes of {}",
        container.len(),
        text.len(),
        format
    );

    let parsed = ElementContainer::from_text(&text, format)?;
    let reloaded: Vec<Box<dyn Slot>> = serializer.deserialize_container(&parsed)?;
    if reloaded.len() != slots.len() {
        return Err(DemoError::CountMismatch {
            expected: slots.len(),
            found: reloaded.len(),
        });
    }
    let variables = reloaded
        .iter()
        .map(|slot| slot.concrete_slot_value_as_variable(precision))
        .collect();

    let values: Vec<Box<dyn SlotHasValue<Vec2>>> = serializer.deserialize_container(&parsed)?;
    let value_sum: Vec2 = values.iter().map(|slot| slot.value()).sum();

    Ok(DemoReport {
        format,
        text,
        variables,
        value_sum,
    })
}
