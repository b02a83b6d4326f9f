//! Typed event model
//!
//! [`TraceEvent`] is the tagged union of everything the tracer records:
//! function enter/exit pairs from the instrumentation hooks, syscalls and
//! statistical samples from the kernel-delivered record streams.
//!
//! Traced argument and return values are carried as [`TypedValue`]s, a
//! self-describing encoding: each value travels with its [`TypeInfo`], so
//! formatters can render nested structs and enum variants without a schema
//! registry. Construction recurses structurally (a struct value serializes
//! each field with the field's own type, a variant carries its tag and
//! payload).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position attached at instrumentation-insertion time. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self { file: file.into(), line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Static type description for a [`TypedValue`]
///
/// `fields` is `None` for primitives and `Some` (ordered `(name, type)`
/// pairs) for structs and enums, which is what makes the encoding
/// self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fields: Option<Vec<(String, String)>>,
}

impl TypeInfo {
    /// Type info for a primitive (no field list)
    #[must_use]
    pub fn primitive(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: None }
    }

    /// Type info for a struct or enum with an ordered field list
    #[must_use]
    pub fn composite(name: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self { name: name.into(), fields: Some(fields) }
    }
}

/// Language-neutral structured value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    #[serde(rename = "uint")]
    UInt(u64),
    Float(f64),
    Str(String),
    /// Ordered field mapping (struct)
    Struct(Vec<(String, TypedValue)>),
    /// Tagged variant payload (enum)
    Variant {
        tag: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        payload: Option<Box<TypedValue>>,
    },
}

/// A traced value together with its static type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub type_info: TypeInfo,
    pub value: Value,
}

impl TypedValue {
    #[must_use]
    pub fn unit() -> Self {
        Self { type_info: TypeInfo::primitive("unit"), value: Value::Unit }
    }

    #[must_use]
    pub fn bool(v: bool) -> Self {
        Self { type_info: TypeInfo::primitive("bool"), value: Value::Bool(v) }
    }

    #[must_use]
    pub fn int(v: i64) -> Self {
        Self { type_info: TypeInfo::primitive("i64"), value: Value::Int(v) }
    }

    #[must_use]
    pub fn uint(v: u64) -> Self {
        Self { type_info: TypeInfo::primitive("u64"), value: Value::UInt(v) }
    }

    #[must_use]
    pub fn float(v: f64) -> Self {
        Self { type_info: TypeInfo::primitive("f64"), value: Value::Float(v) }
    }

    #[must_use]
    pub fn string(v: impl Into<String>) -> Self {
        Self { type_info: TypeInfo::primitive("string"), value: Value::Str(v.into()) }
    }

    /// Build a struct value; the field list in the type info is derived
    /// from the field values' own types, preserving declaration order.
    #[must_use]
    pub fn structure(type_name: impl Into<String>, fields: Vec<(String, TypedValue)>) -> Self {
        let field_types = fields
            .iter()
            .map(|(name, value)| (name.clone(), value.type_info.name.clone()))
            .collect();
        Self {
            type_info: TypeInfo::composite(type_name, field_types),
            value: Value::Struct(fields),
        }
    }

    /// Build an enum variant value with an optional payload
    #[must_use]
    pub fn variant(
        type_name: impl Into<String>,
        tag: impl Into<String>,
        payload: Option<TypedValue>,
    ) -> Self {
        let tag = tag.into();
        let field_types = payload
            .as_ref()
            .map(|p| vec![(tag.clone(), p.type_info.name.clone())])
            .unwrap_or_default();
        Self {
            type_info: TypeInfo::composite(type_name, field_types),
            value: Value::Variant { tag, payload: payload.map(Box::new) },
        }
    }

    /// Render for the text formatter: scalars plain, structs as
    /// `Name { field: value, ... }`, variants as `Tag(payload)`.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.value {
            Value::Unit => "()".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::UInt(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Str(v) => format!("\"{v}\""),
            Value::Struct(fields) => {
                let inner: Vec<String> =
                    fields.iter().map(|(name, value)| format!("{name}: {}", value.render())).collect();
                format!("{} {{ {} }}", self.type_info.name, inner.join(", "))
            }
            Value::Variant { tag, payload } => match payload {
                Some(p) => format!("{tag}({})", p.render()),
                None => tag.clone(),
            },
        }
    }
}

/// The tagged union of everything the tracer can record
///
/// Serialized with an explicit `type` tag so the trace document is
/// self-identifying: `function_enter`, `function_exit`, `syscall`, `sample`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    FunctionEnter {
        name: String,
        args: Vec<TypedValue>,
        location: SourceLocation,
        timestamp_ns: u64,
        thread_id: u32,
    },
    FunctionExit {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        return_value: Option<TypedValue>,
        duration_ns: u64,
        timestamp_ns: u64,
        thread_id: u32,
    },
    Syscall {
        number: u64,
        name: String,
        args: Vec<TypedValue>,
        return_value: i64,
        duration_ns: u64,
        timestamp_ns: u64,
        pid: u32,
        tid: u32,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        parent_function: Option<String>,
    },
    Sample {
        instruction_pointer: u64,
        /// Raw return-address stack, leaf-first
        stack: Vec<u64>,
        thread_id: u32,
        timestamp_ns: u64,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        parent_function: Option<String>,
    },
}

impl TraceEvent {
    /// Pure constructor for a function-entry event. No I/O, no side effects.
    #[must_use]
    pub fn function_enter(
        name: impl Into<String>,
        args: Vec<TypedValue>,
        location: SourceLocation,
        timestamp_ns: u64,
        thread_id: u32,
    ) -> Self {
        TraceEvent::FunctionEnter { name: name.into(), args, location, timestamp_ns, thread_id }
    }

    /// Pure constructor for a function-exit event
    #[must_use]
    pub fn function_exit(
        name: impl Into<String>,
        return_value: Option<TypedValue>,
        duration_ns: u64,
        timestamp_ns: u64,
        thread_id: u32,
    ) -> Self {
        TraceEvent::FunctionExit {
            name: name.into(),
            return_value,
            duration_ns,
            timestamp_ns,
            thread_id,
        }
    }

    /// Timestamp of the event in nanoseconds
    #[must_use]
    pub fn timestamp_ns(&self) -> u64 {
        match self {
            TraceEvent::FunctionEnter { timestamp_ns, .. }
            | TraceEvent::FunctionExit { timestamp_ns, .. }
            | TraceEvent::Syscall { timestamp_ns, .. }
            | TraceEvent::Sample { timestamp_ns, .. } => *timestamp_ns,
        }
    }

    /// Thread the event belongs to (syscalls report their TID)
    #[must_use]
    pub fn thread_id(&self) -> u32 {
        match self {
            TraceEvent::FunctionEnter { thread_id, .. }
            | TraceEvent::FunctionExit { thread_id, .. }
            | TraceEvent::Sample { thread_id, .. } => *thread_id,
            TraceEvent::Syscall { tid, .. } => *tid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_type_info_has_no_fields() {
        let v = TypedValue::int(42);
        assert_eq!(v.type_info.name, "i64");
        assert!(v.type_info.fields.is_none());
    }

    #[test]
    fn test_struct_value_derives_ordered_field_list() {
        let v = TypedValue::structure(
            "Point",
            vec![
                ("x".to_string(), TypedValue::int(1)),
                ("y".to_string(), TypedValue::int(2)),
            ],
        );
        assert_eq!(
            v.type_info.fields,
            Some(vec![
                ("x".to_string(), "i64".to_string()),
                ("y".to_string(), "i64".to_string())
            ])
        );
    }

    #[test]
    fn test_nested_value_renders_structurally() {
        let inner = TypedValue::structure(
            "Point",
            vec![
                ("x".to_string(), TypedValue::int(1)),
                ("y".to_string(), TypedValue::int(2)),
            ],
        );
        let v = TypedValue::variant("Shape", "At", Some(inner));
        assert_eq!(v.render(), "At(Point { x: 1, y: 2 })");
    }

    #[test]
    fn test_unit_variant_renders_bare_tag() {
        let v = TypedValue::variant("Shape", "Empty", None);
        assert_eq!(v.render(), "Empty");
    }

    #[test]
    fn test_event_accessors() {
        let e = TraceEvent::function_enter(
            "f",
            vec![],
            SourceLocation::new("main.x", 1, 1),
            100,
            7,
        );
        assert_eq!(e.timestamp_ns(), 100);
        assert_eq!(e.thread_id(), 7);

        let s = TraceEvent::Syscall {
            number: 1,
            name: "write".to_string(),
            args: vec![],
            return_value: 0,
            duration_ns: 10,
            timestamp_ns: 200,
            pid: 1,
            tid: 9,
            parent_function: None,
        };
        assert_eq!(s.thread_id(), 9);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let e = TraceEvent::function_enter(
            "f",
            vec![TypedValue::uint(3)],
            SourceLocation::new("main.x", 4, 2),
            100,
            7,
        );
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "function_enter");
        assert_eq!(json["name"], "f");
        assert_eq!(json["location"]["line"], 4);
    }
}
