//! Textual encodings for payloads and element containers.

use crate::error::{DeserializeError, SerializeError};

/// Supported text formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// Compact JSON.
    #[default]
    Json,
    /// Indented JSON.
    JsonPretty,
    /// RON (Rusty Object Notation).
    #[cfg(feature = "serialize-ron")]
    Ron,
}

impl Format {
    /// Encode a serde-serializable value as text.
    pub fn to_text<T: serde::Serialize + ?Sized>(self, value: &T) -> Result<String, SerializeError> {
        match self {
            Format::Json => {
                serde_json::to_string(value).map_err(|e| SerializeError::Format(e.to_string()))
            }
            Format::JsonPretty => serde_json::to_string_pretty(value)
                .map_err(|e| SerializeError::Format(e.to_string())),
            #[cfg(feature = "serialize-ron")]
            Format::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| SerializeError::Format(e.to_string())),
        }
    }

    /// Decode text into a serde-deserializable value.
    pub fn from_text<T: serde::de::DeserializeOwned>(self, text: &str) -> Result<T, DeserializeError> {
        match self {
            Format::Json | Format::JsonPretty => {
                serde_json::from_str(text).map_err(|e| DeserializeError::Format(e.to_string()))
            }
            #[cfg(feature = "serialize-ron")]
            Format::Ron => ron::from_str(text).map_err(|e| DeserializeError::Format(e.to_string())),
        }
    }

    /// Name accepted by [`FromStr`](std::str::FromStr).
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::JsonPretty => "json-pretty",
            #[cfg(feature = "serialize-ron")]
            Format::Ron => "ron",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "json-pretty" => Ok(Format::JsonPretty),
            #[cfg(feature = "serialize-ron")]
            "ron" => Ok(Format::Ron),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn record() -> Value {
        Value::Map(vec![
            ("label".into(), Value::String("ABCD".into())),
            ("weight".into(), Value::F32(7.7)),
            ("samples".into(), Value::array(vec![Value::I64(1), Value::I64(2)])),
        ])
    }

    #[test]
    fn json_roundtrip_keeps_order() {
        let text = Format::Json.to_text(&record()).unwrap();
        assert_eq!(
            text,
            r#"{"label":"ABCD","weight":7.7,"samples":{"length":2,"items":[1,2]}}"#
        );
        let back: Value = Format::Json.from_text(&text).unwrap();
        let Value::Map(entries) = back else {
            panic!("expected Map");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["label", "weight", "samples"]);
    }

    #[test]
    fn pretty_json_parses_back() {
        let text = Format::JsonPretty.to_text(&record()).unwrap();
        assert!(text.contains('\n'));
        let back: Value = Format::JsonPretty.from_text(&text).unwrap();
        assert_eq!(Format::Json.to_text(&back).unwrap(), Format::Json.to_text(&record()).unwrap());
    }

    #[cfg(feature = "serialize-ron")]
    #[test]
    fn ron_roundtrip() {
        let text = Format::Ron.to_text(&record()).unwrap();
        let back: Value = Format::Ron.from_text(&text).unwrap();
        assert_eq!(Format::Json.to_text(&back).unwrap(), Format::Json.to_text(&record()).unwrap());
    }

    #[test]
    fn syntax_error_is_format_error() {
        let result: Result<Value, _> = Format::Json.from_text("{\"label\":");
        assert!(matches!(result, Err(DeserializeError::Format(_))));
    }

    #[test]
    fn parse_names() {
        assert_eq!("json".parse::<Format>(), Ok(Format::Json));
        assert_eq!("json-pretty".parse::<Format>(), Ok(Format::JsonPretty));
        assert!("yaml".parse::<Format>().is_err());
        assert_eq!(Format::default().to_string(), "json");
    }
}
