//! Resource kinds and records
//!
//! A [`BlockKind`] describes one family of configuration blocks: how its
//! block-start lines look, which fields live inside, and how the block is
//! entered again from configuration mode. A [`ResourceRecord`] is one
//! materialized instance of a kind.

use crate::descriptor::FieldTable;
use crate::error::Result;
use crate::parents::ParentIndex;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifying data recovered from block headers (AS number, route-map action).
pub type Attributes = BTreeMap<String, String>;

/// Whether a resource exists on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Existence {
    /// The block is configured
    #[default]
    Present,
    /// The block is not configured
    Absent,
}

impl fmt::Display for Existence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Existence::Present => write!(f, "present"),
            Existence::Absent => write!(f, "absent"),
        }
    }
}

/// How many records a kind produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Exactly one record, absent when its block is not configured
    Singleton {
        /// Fixed identity of the record
        identity: &'static str,
    },
    /// Zero or more records keyed by their block headers
    Keyed,
}

/// How a present record is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// Enter the scope and negate its innermost block-start command
    RemoveBlock,
    /// Enter the scope and negate every field that is not at its default
    ClearFields,
}

/// Identity hints extracted from a block-start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Identity of the record the block opens
    pub identity: String,
    /// Header data that is not a field
    pub attributes: Attributes,
}

impl BlockHeader {
    /// Create a header with no attributes.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            attributes: Attributes::new(),
        }
    }

    /// Attach an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A family of configuration blocks.
pub trait BlockKind: Send + Sync + fmt::Debug {
    /// Kind name (e.g., "ospf", "route_map")
    fn name(&self) -> &'static str;

    /// Field descriptors, in emission order
    fn fields(&self) -> &FieldTable;

    /// Record cardinality
    fn layout(&self) -> Layout;

    /// Recognize a top-level line that opens one of this kind's blocks.
    fn open_block(&self, line: &str) -> Option<BlockHeader>;

    /// Recognize an indented line that opens a sibling record inside the
    /// current block (e.g., `address-family` inside `router bgp`).
    ///
    /// The enclosing block's header is passed in so that its attributes
    /// can be carried over.
    fn open_section(&self, _line: &str, _block: &BlockHeader) -> Option<BlockHeader> {
        None
    }

    /// Recognize an indented line that closes the current section without
    /// opening one of this kind's records.
    ///
    /// Field lines are ignored from there until the next section, block
    /// start or top-level line.
    fn ends_section(&self, _line: &str) -> bool {
        false
    }

    /// Whether fields live at top level with no enclosing block.
    fn is_blockless(&self) -> bool {
        false
    }

    /// How Delete removes a record.
    ///
    /// Blockless kinds have no block to negate, so they clear their fields.
    fn teardown(&self) -> Teardown {
        if self.is_blockless() {
            Teardown::ClearFields
        } else {
            Teardown::RemoveBlock
        }
    }

    /// Header attributes that cannot be changed in place.
    ///
    /// A differing value turns an update into a replace.
    fn fixed_attributes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Commands that enter the record's configuration context, outermost first.
    ///
    /// `parents` is the index of top-level blocks built before parsing; it is
    /// consulted when the record's own attributes do not identify its parent.
    fn scope(
        &self,
        identity: &str,
        attributes: &Attributes,
        parents: &ParentIndex,
    ) -> Result<Vec<String>>;
}

/// One materialized unit of configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    /// Kind name
    pub kind: &'static str,
    /// Stable key among records of the same kind
    pub identity: String,
    /// Whether the block exists
    pub existence: Existence,
    /// Header data that is not a field
    pub attributes: Attributes,
    /// Commands entering the record's context
    pub scope: Vec<String>,
    /// Every field of the kind, at its parsed or default value
    pub fields: BTreeMap<String, Value>,
}

impl ResourceRecord {
    /// Create a record with every field at its default.
    pub fn new(
        kind: &'static str,
        identity: impl Into<String>,
        existence: Existence,
        table: &FieldTable,
    ) -> Self {
        Self {
            kind,
            identity: identity.into(),
            existence,
            attributes: Attributes::new(),
            scope: Vec::new(),
            fields: table.defaults(),
        }
    }

    /// Open a present record from a block header.
    pub fn from_header(kind: &'static str, header: &BlockHeader, table: &FieldTable) -> Self {
        let mut record = Self::new(kind, header.identity.clone(), Existence::Present, table);
        record.attributes = header.attributes.clone();
        record
    }

    /// Current value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Header attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the record exists on the device.
    pub fn is_present(&self) -> bool {
        self.existence == Existence::Present
    }
}

/// Declared state for one resource.
///
/// Only the properties the caller manages are listed; everything else is
/// left as the device has it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DesiredState {
    /// Identity of the resource
    pub identity: String,
    /// Whether the resource should exist
    pub ensure: Existence,
    /// Header data (route-map action, AS number override)
    pub attributes: Attributes,
    /// Managed fields
    pub properties: BTreeMap<String, Value>,
}

impl DesiredState {
    /// Declare a resource that should exist.
    pub fn present(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            ensure: Existence::Present,
            ..Default::default()
        }
    }

    /// Declare a resource that should not exist.
    pub fn absent(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            ensure: Existence::Absent,
            ..Default::default()
        }
    }

    /// Manage a field.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Attach a header attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check every property against the kind's field table.
    pub fn validate(&self, table: &FieldTable) -> Result<()> {
        for (name, value) in &self.properties {
            table.require(name)?.check(value)?;
        }
        Ok(())
    }

    /// Build the full record this declaration describes.
    ///
    /// Unmanaged fields take their defaults; the scope is resolved through
    /// the kind, which may consult `parents`.
    pub fn to_record(&self, kind: &dyn BlockKind, parents: &ParentIndex) -> Result<ResourceRecord> {
        let table = kind.fields();
        let mut record = ResourceRecord::new(kind.name(), self.identity.clone(), self.ensure, table);
        record.attributes = self.attributes.clone();

        for (name, value) in &self.properties {
            table.accessor(name)?.set(&mut record, value.clone())?;
        }

        record.scope = kind.scope(&record.identity, &record.attributes, parents)?;
        Ok(record)
    }
}
