//! Flat stream schemas and their JSON Schema rendering.

use serde_json::{json, Map, Value};

use crate::definition::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    String,
}

impl FieldType {
    fn json_type(self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::String => "string",
        }
    }

    /// Whether `value` fits this type. Null always fits: every property is
    /// nullable.
    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (FieldType::String, Value::String(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: Option<&'static str>,
}

impl Property {
    #[must_use]
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Integer,
            description: None,
        }
    }

    #[must_use]
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::String,
            description: None,
        }
    }

    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Ordered property list of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    properties: Vec<Property>,
}

impl Schema {
    #[must_use]
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Render as a JSON Schema object with nullable properties.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|p| {
                let mut property = json!({ "type": [p.field_type.json_type(), "null"] });
                if let Some(description) = p.description {
                    property["description"] = json!(description);
                }
                (p.name.to_string(), property)
            })
            .collect();

        json!({ "type": "object", "properties": properties })
    }

    /// Drop fields the schema does not declare.
    ///
    /// Returns the names of dropped fields so the caller can report them.
    pub fn conform(&self, record: &mut Record) -> Vec<String> {
        let undeclared: Vec<String> = record
            .keys()
            .filter(|k| self.get(k).is_none())
            .cloned()
            .collect();
        for key in &undeclared {
            record.remove(key);
        }
        undeclared
    }

    /// Names of declared fields whose value has the wrong JSON type.
    #[must_use]
    pub fn type_mismatches(&self, record: &Record) -> Vec<&'static str> {
        self.properties
            .iter()
            .filter(|p| record.get(p.name).is_some_and(|v| !p.field_type.accepts(v)))
            .map(|p| p.name)
            .collect()
    }
}
