//! Two-component vector slot.

use glam::{Vec2, Vec4};

use crate::Serializable;

use super::material_slot::{MaterialSlot, Slot, SlotHasValue};
use super::types::{
    ConcreteSlotValueType, OutputPrecision, PreviewProperty, PropertyType, ShaderStage, SlotType,
    SlotValueType,
};

#[derive(Debug, Clone, Default, PartialEq, Serializable)]
pub struct Vector2MaterialSlot {
    #[serial(extends)]
    pub slot: MaterialSlot,
    pub value: Vec2,
    pub default_value: Vec2,
}

impl Vector2MaterialSlot {
    /// A dynamic-stage, visible slot. The default value starts at zero.
    pub fn new(
        id: i32,
        display_name: impl Into<String>,
        shader_output_name: impl Into<String>,
        slot_type: SlotType,
        value: Vec2,
    ) -> Self {
        Self {
            slot: MaterialSlot::new(id, display_name, shader_output_name, slot_type),
            value,
            default_value: Vec2::ZERO,
        }
    }

    pub fn with_default_value(mut self, default_value: Vec2) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn with_stage(mut self, stage: ShaderStage) -> Self {
        self.slot.shader_stage = stage;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.slot.hidden = hidden;
        self
    }
}

impl Slot for Vector2MaterialSlot {
    fn material_slot(&self) -> &MaterialSlot {
        &self.slot
    }

    fn material_slot_mut(&mut self) -> &mut MaterialSlot {
        &mut self.slot
    }

    fn value_type(&self) -> SlotValueType {
        SlotValueType::Vector2
    }

    fn concrete_value_type(&self) -> ConcreteSlotValueType {
        ConcreteSlotValueType::Vector2
    }

    fn concrete_slot_value_as_variable(&self, precision: OutputPrecision) -> String {
        format!("{precision}2 ({},{})", self.value.x, self.value.y)
    }

    fn preview_property(&self, name: &str) -> PreviewProperty {
        let Vec2 { x, y } = self.value;
        PreviewProperty {
            name: name.to_owned(),
            prop_type: PropertyType::from(self.concrete_value_type()),
            vector4: Vec4::new(x, y, 0.0, 0.0),
            float: x,
            color: Vec4::new(x, x, 0.0, 0.0),
        }
    }
}

impl SlotHasValue<Vec2> for Vector2MaterialSlot {
    fn value(&self) -> Vec2 {
        self.value
    }

    fn set_value(&mut self, value: Vec2) {
        self.value = value;
    }

    fn default_value(&self) -> Vec2 {
        self.default_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::{Format, SerialObject, TypeRegistry};

    fn slot() -> Vector2MaterialSlot {
        Vector2MaterialSlot::new(3, "UV", "uv", SlotType::Input, Vec2::new(1.0, 2.5))
    }

    #[test]
    fn variable_expression() {
        let slot = slot();
        assert_eq!(
            slot.concrete_slot_value_as_variable(OutputPrecision::Half),
            "half2 (1,2.5)"
        );
        assert_eq!(
            slot.concrete_slot_value_as_variable(OutputPrecision::Float),
            "float2 (1,2.5)"
        );
    }

    #[test]
    fn default_value_starts_at_zero() {
        let mut slot = slot();
        slot.set_value(Vec2::new(-1.0, 0.0));
        assert_eq!(slot.default_value(), Vec2::ZERO);
        assert_eq!(SlotHasValue::value(&slot), Vec2::new(-1.0, 0.0));

        let slot = slot.with_default_value(Vec2::new(1.0, 2.5));
        assert_eq!(slot.default_value(), Vec2::new(1.0, 2.5));
    }

    #[test]
    fn preview_property_layout() {
        let property = slot().preview_property("_UV");
        assert_eq!(property.name, "_UV");
        assert_eq!(property.prop_type, PropertyType::Vector2);
        assert_eq!(property.vector4, Vec4::new(1.0, 2.5, 0.0, 0.0));
        assert_eq!(property.float, 1.0);
        assert_eq!(property.color, Vec4::new(1.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn builder_flags() {
        let slot = slot().with_stage(ShaderStage::Fragment).with_hidden(true);
        assert_eq!(slot.slot.shader_stage, ShaderStage::Fragment);
        assert!(slot.slot.hidden);
        assert!(slot.material_slot().is_input());
        assert_eq!(slot.id(), 3);
    }

    #[test]
    fn payload_layout() {
        let mut registry = TypeRegistry::new();
        registry.register::<Vector2MaterialSlot>().unwrap();
        let payload = codec::encode(&registry, &slot().with_stage(ShaderStage::Vertex), Format::Json)
            .unwrap();
        assert_eq!(
            payload,
            concat!(
                r#"{"id":3,"display_name":"UV","shader_output_name":"uv","slot_type":"Input","#,
                r#""shader_stage":"Vertex","hidden":false,"#,
                r#""value":{"length":2,"items":[1.0,2.5]},"default_value":{"length":2,"items":[0.0,0.0]}}"#
            )
        );
        let object: &dyn SerialObject = &slot();
        assert_eq!(object.serial_name(), "Vector2MaterialSlot");
    }
}
