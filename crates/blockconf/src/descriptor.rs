//! Field descriptors: how one configurable attribute is recognized,
//! decoded and rendered back into a console command.
//!
//! Tables are declared as `const` [`FieldSpec`] slices and compiled once
//! into a [`FieldTable`], whose order is the command emission order.

use crate::error::{Error, Result};
use crate::resource::ResourceRecord;
use crate::value::{Value, ValueType};
use regex::Regex;
use std::collections::BTreeMap;

/// Default value of a field, in a form usable in `const` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Sentinel "not configured"
    Absent,
    /// Flag off
    False,
    /// Number
    Int(i64),
    /// Keyword, as written in the configuration
    Symbol(&'static str),
    /// No elements
    EmptyList,
}

impl DefaultValue {
    /// Materialize the default.
    pub fn to_value(self) -> Value {
        match self {
            Self::Absent => Value::Absent,
            Self::False => Value::Bool(false),
            Self::Int(i) => Value::Int(i),
            Self::Symbol(s) => Value::symbol(s),
            Self::EmptyList => Value::List(Vec::new()),
        }
    }
}

/// Declarative description of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Field name, unique within the kind
    pub name: &'static str,
    /// Regex matching a configuration line; group 1 captures the value
    pub pattern: &'static str,
    /// Declared type
    pub value_type: ValueType,
    /// Value when the field is not configured
    pub default: DefaultValue,
    /// Command template; `{value}` is replaced by the rendered argument
    pub template: &'static str,
}

/// A compiled field descriptor.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name, unique within the kind
    pub name: &'static str,
    /// Declared type
    pub value_type: ValueType,
    /// Value when the field is not configured
    pub default: Value,
    /// Command template
    pub template: &'static str,
    matcher: Regex,
}

impl FieldDescriptor {
    /// Compile one [`FieldSpec`].
    pub fn compile(spec: &FieldSpec) -> Result<Self> {
        let matcher = Regex::new(spec.pattern).map_err(|source| Error::Pattern {
            field: spec.name,
            source,
        })?;

        Ok(Self {
            name: spec.name,
            value_type: spec.value_type,
            default: spec.default.to_value(),
            template: spec.template,
            matcher,
        })
    }

    /// Test a line against this field.
    ///
    /// Returns `None` when the line does not set the field, otherwise the
    /// captured text (which is itself `None` for presence flags).
    pub fn capture<'l>(&self, line: &'l str) -> Option<Option<&'l str>> {
        self.matcher
            .captures(line)
            .map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    /// Decode a capture and merge it into the record slot.
    ///
    /// Lists accumulate in encounter order, scalars are last-write-wins.
    pub fn merge(&self, slot: &mut Value, raw: Option<&str>, line: usize) -> Result<()> {
        if self.value_type == ValueType::List {
            let Some(raw) = raw else {
                return Err(self.decode_error("", line));
            };
            match slot {
                Value::List(items) => items.push(raw.to_string()),
                other => *other = Value::List(vec![raw.to_string()]),
            }
            return Ok(());
        }

        *slot = self
            .value_type
            .decode(raw)
            .ok_or_else(|| self.decode_error(raw.unwrap_or_default(), line))?;
        Ok(())
    }

    /// Check that a value may be stored in this field.
    pub fn check(&self, value: &Value) -> Result<()> {
        if self.value_type.accepts(value) {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                field: self.name.to_string(),
                expected: self.value_type.name(),
                got: format!("{} `{}`", value.kind_name(), value),
            })
        }
    }

    fn decode_error(&self, raw: &str, line: usize) -> Error {
        Error::TypeDecode {
            field: self.name,
            raw: raw.to_string(),
            expected: self.value_type.name(),
            line,
        }
    }
}

/// Render the command that sets a field.
///
/// Without an argument the placeholder and its leading space are dropped,
/// which yields the bare keyword used for flags and negations.
pub fn render(descriptor: &FieldDescriptor, value: Option<&str>) -> String {
    match value {
        Some(v) => descriptor.template.replace("{value}", v),
        None => descriptor
            .template
            .replace(" {value}", "")
            .replace("{value}", "")
            .trim_end()
            .to_string(),
    }
}

/// Prefix a command with `no`.
pub fn negate(command: &str) -> String {
    format!("no {}", command)
}

/// Ordered field descriptors of one resource kind.
#[derive(Debug)]
pub struct FieldTable {
    kind: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl FieldTable {
    /// Compile a table, reporting the first bad pattern.
    pub fn try_compile(kind: &'static str, specs: &[FieldSpec]) -> Result<Self> {
        let fields = specs
            .iter()
            .map(FieldDescriptor::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { kind, fields })
    }

    /// Compile a built-in table.
    ///
    /// # Panics
    /// If a pattern does not compile. Built-in tables are static, so this
    /// only fires on a programming error.
    pub fn compile(kind: &'static str, specs: &[FieldSpec]) -> Self {
        Self::try_compile(kind, specs).unwrap_or_else(|e| panic!("{kind} field table: {e}"))
    }

    /// Resource kind this table describes.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Fields in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the table has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by name, failing for unknown names.
    pub fn require(&self, name: &str) -> Result<&FieldDescriptor> {
        self.field(name).ok_or_else(|| Error::UnknownField {
            kind: self.kind,
            field: name.to_string(),
        })
    }

    /// Find the first field, in table order, that a line sets.
    pub fn classify<'l>(&self, line: &'l str) -> Option<(&FieldDescriptor, Option<&'l str>)> {
        self.fields
            .iter()
            .find_map(|field| field.capture(line).map(|raw| (field, raw)))
    }

    /// Every field at its default value.
    pub fn defaults(&self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.default.clone()))
            .collect()
    }

    /// Typed accessor for one field.
    pub fn accessor(&self, name: &str) -> Result<FieldAccessor<'_>> {
        Ok(FieldAccessor {
            descriptor: self.require(name)?,
        })
    }
}

/// A `{get, set}` pair for one field of a record.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'t> {
    descriptor: &'t FieldDescriptor,
}

impl<'t> FieldAccessor<'t> {
    /// The field this accessor reads and writes.
    pub fn descriptor(&self) -> &'t FieldDescriptor {
        self.descriptor
    }

    /// Read the field, falling back to its default.
    pub fn get<'r>(&self, record: &'r ResourceRecord) -> &'r Value
    where
        't: 'r,
    {
        record
            .fields
            .get(self.descriptor.name)
            .unwrap_or(&self.descriptor.default)
    }

    /// Write the field after checking the value's type.
    pub fn set(&self, record: &mut ResourceRecord, value: Value) -> Result<()> {
        self.descriptor.check(&value)?;
        record
            .fields
            .insert(self.descriptor.name.to_string(), value);
        Ok(())
    }
}
