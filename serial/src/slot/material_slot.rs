//! Base record and view traits for material slots.

use crate::object::SerialObject;
use crate::Serializable;

use super::types::{
    ConcreteSlotValueType, OutputPrecision, PreviewProperty, ShaderStage, SlotType, SlotValueType,
};

/// Fields every material slot carries.
///
/// Embedded with `#[serial(extends)]` by concrete slots; never registered
/// on its own.
#[derive(Debug, Clone, Default, PartialEq, Serializable)]
pub struct MaterialSlot {
    pub id: i32,
    pub display_name: String,
    pub shader_output_name: String,
    pub slot_type: SlotType,
    pub shader_stage: ShaderStage,
    pub hidden: bool,
}

impl MaterialSlot {
    pub fn new(
        id: i32,
        display_name: impl Into<String>,
        shader_output_name: impl Into<String>,
        slot_type: SlotType,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            shader_output_name: shader_output_name.into(),
            slot_type,
            shader_stage: ShaderStage::default(),
            hidden: false,
        }
    }

    pub fn is_input(&self) -> bool {
        self.slot_type == SlotType::Input
    }

    pub fn is_output(&self) -> bool {
        self.slot_type == SlotType::Output
    }
}

/// Base view over every concrete slot type.
pub trait Slot: SerialObject {
    fn material_slot(&self) -> &MaterialSlot;

    fn material_slot_mut(&mut self) -> &mut MaterialSlot;

    fn value_type(&self) -> SlotValueType;

    fn concrete_value_type(&self) -> ConcreteSlotValueType;

    /// Shader expression for the slot's current value, e.g. `half2 (1,2)`.
    fn concrete_slot_value_as_variable(&self, precision: OutputPrecision) -> String;

    fn preview_property(&self, name: &str) -> PreviewProperty;

    fn id(&self) -> i32 {
        self.material_slot().id
    }

    fn display_name(&self) -> &str {
        &self.material_slot().display_name
    }

    fn shader_output_name(&self) -> &str {
        &self.material_slot().shader_output_name
    }
}

/// Capability view: a slot holding an editable value of type `T`.
pub trait SlotHasValue<T>: SerialObject {
    fn value(&self) -> T;

    fn set_value(&mut self, value: T);

    fn default_value(&self) -> T;
}
