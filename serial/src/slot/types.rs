//! Enumerations shared by material slots.

use std::fmt;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::serde_field;

/// Direction of a slot on its node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotType {
    #[default]
    Input,
    Output,
}

/// Pipeline stage a slot's value is evaluated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderStage {
    #[default]
    Dynamic,
    Vertex,
    Fragment,
}

serde_field!(SlotType => Enum, ShaderStage => Enum);

/// Numeric precision tag used when emitting shader variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputPrecision {
    Fixed,
    #[default]
    Half,
    Float,
}

impl OutputPrecision {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputPrecision::Fixed => "fixed",
            OutputPrecision::Half => "half",
            OutputPrecision::Float => "float",
        }
    }
}

impl fmt::Display for OutputPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputPrecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(OutputPrecision::Fixed),
            "half" => Ok(OutputPrecision::Half),
            "float" => Ok(OutputPrecision::Float),
            other => Err(format!("unknown precision '{other}'")),
        }
    }
}

/// Value shape a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotValueType {
    Dynamic,
    Vector1,
    Vector2,
    Vector3,
    Vector4,
}

/// Value shape a slot resolves to once connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcreteSlotValueType {
    Vector1,
    Vector2,
    Vector3,
    Vector4,
}

impl ConcreteSlotValueType {
    /// Number of float components.
    pub fn channels(self) -> usize {
        match self {
            ConcreteSlotValueType::Vector1 => 1,
            ConcreteSlotValueType::Vector2 => 2,
            ConcreteSlotValueType::Vector3 => 3,
            ConcreteSlotValueType::Vector4 => 4,
        }
    }
}

/// Kind of material property a preview binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Color,
    Texture,
    Float,
    Vector2,
    Vector3,
    Vector4,
}

impl From<ConcreteSlotValueType> for PropertyType {
    fn from(value: ConcreteSlotValueType) -> Self {
        match value {
            ConcreteSlotValueType::Vector1 => PropertyType::Float,
            ConcreteSlotValueType::Vector2 => PropertyType::Vector2,
            ConcreteSlotValueType::Vector3 => PropertyType::Vector3,
            ConcreteSlotValueType::Vector4 => PropertyType::Vector4,
        }
    }
}

/// Property handed to the material preview for one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewProperty {
    pub name: String,
    pub prop_type: PropertyType,
    pub vector4: Vec4,
    pub float: f32,
    pub color: Vec4,
}
