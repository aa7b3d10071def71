//! Desired-state document
//!
//! ```toml
//! [ospf]
//! router_id = "10.0.0.1"
//! opaque = true
//!
//! [pim]
//! ip_multicast_routing = true
//!
//! [bgp_address_family.ipv6_unicast]
//! asn = 65001
//! networks = ["2001:db8::/32"]
//!
//! [route_map."CONNECTED 10"]
//! action = "permit"
//! match = ["ip address prefix-list CONNECTED_NETWORKS"]
//! ```

use anyhow::{Context, Result, bail};
use blockconf::{BlockKind, DesiredState, Existence, FieldDescriptor, Value, ValueType};
use quaggakit::kinds::{self, bgp_address_family, ospf, pim_router, route_map};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Keys accepted for compatibility and otherwise ignored.
const IGNORED_KEYS: &[&str] = &["purge"];

/// The whole desired-state file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredConfig {
    /// The OSPF process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ospf: Option<Entry>,

    /// Global PIM switches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pim: Option<Entry>,

    /// BGP address families keyed by `<afi>_<safi>`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bgp_address_family: BTreeMap<String, Entry>,

    /// Route-map sequences keyed by `"<name> <seq>"`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub route_map: BTreeMap<String, Entry>,
}

/// One declared resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Whether the resource should exist
    #[serde(default)]
    pub ensure: Existence,

    /// Route-map action (`permit` or `deny`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// AS number of the enclosing `router bgp`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,

    /// Field values, by field name
    #[serde(flatten)]
    pub fields: BTreeMap<String, toml::Value>,
}

/// A declared resource ready for planning.
#[derive(Debug)]
pub struct Declared {
    pub kind: &'static dyn BlockKind,
    pub state: DesiredState,
}

impl Declared {
    /// `kind.identity`, the form `--target` matches against.
    pub fn id(&self) -> String {
        format!("{}.{}", self.kind.name(), self.state.identity)
    }
}

impl DesiredConfig {
    /// Load a desired-state file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read desired state: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid desired state in {}", path.display()))
    }

    /// Parse a desired-state document.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML format")
    }

    /// Number of declared resources.
    pub fn len(&self) -> usize {
        usize::from(self.ospf.is_some())
            + usize::from(self.pim.is_some())
            + self.bgp_address_family.len()
            + self.route_map.len()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every declared resource in apply order, converted to typed state.
    pub fn resources(&self) -> Result<Vec<Declared>> {
        let mut resources = Vec::with_capacity(self.len());

        for kind in kinds::all() {
            let entries: Vec<(&str, &Entry)> = match kind.name() {
                "ospf" => self.ospf.iter().map(|e| (ospf::IDENTITY, e)).collect(),
                "pim_router" => self.pim.iter().map(|e| (pim_router::IDENTITY, e)).collect(),
                "bgp_address_family" => self
                    .bgp_address_family
                    .iter()
                    .map(|(k, e)| (k.as_str(), e))
                    .collect(),
                "route_map" => self
                    .route_map
                    .iter()
                    .map(|(k, e)| (k.as_str(), e))
                    .collect(),
                _ => Vec::new(),
            };

            for (identity, entry) in entries {
                let state = entry
                    .to_desired(kind, identity)
                    .with_context(|| format!("Invalid {} `{}`", kind.name(), identity))?;
                resources.push(Declared { kind, state });
            }
        }

        Ok(resources)
    }
}

impl Entry {
    /// Convert to engine state, typing every field through the kind's table.
    pub fn to_desired(&self, kind: &dyn BlockKind, identity: &str) -> Result<DesiredState> {
        let mut state = DesiredState::present(identity);
        state.ensure = self.ensure;

        match (&self.action, kind.name()) {
            (Some(action), "route_map") => {
                state = state.with_attribute(route_map::ACTION, action.as_str());
            }
            (Some(_), other) => bail!("`action` is not valid for {}", other),
            (None, _) => {}
        }

        match (self.asn, kind.name()) {
            (Some(asn), "bgp_address_family") => {
                state = state.with_attribute(bgp_address_family::ASN, asn.to_string());
            }
            (Some(_), other) => bail!("`asn` is not valid for {}", other),
            (None, _) => {}
        }

        for (key, raw) in &self.fields {
            if IGNORED_KEYS.contains(&key.as_str()) {
                log::warn!("Ignoring `{}` on {} `{}`", key, kind.name(), identity);
                continue;
            }
            let field = kind.fields().require(key)?;
            let value = to_value(field, raw)?;
            field.check(&value)?;
            state.properties.insert(key.clone(), value);
        }

        Ok(state)
    }
}

/// Convert a TOML value into the field's typed value.
///
/// `true`/`false` are accepted for every scalar field: `false` removes the
/// field, `true` sets it without an argument.
fn to_value(field: &FieldDescriptor, raw: &toml::Value) -> Result<Value> {
    let value = match (field.value_type, raw) {
        (_, toml::Value::Boolean(b)) if field.value_type != ValueType::List => Value::Bool(*b),
        (ValueType::List, toml::Value::Array(items)) => {
            let items = items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => Ok(s.clone()),
                    other => bail!("`{}` items must be strings, got {}", field.name, other),
                })
                .collect::<Result<Vec<_>>>()?;
            Value::List(items)
        }
        (ValueType::List, toml::Value::String(s)) => Value::List(vec![s.clone()]),
        (ValueType::Integer, toml::Value::Integer(i)) => Value::Int(*i),
        (ValueType::String, toml::Value::String(s)) => Value::Str(s.clone()),
        (ValueType::String, toml::Value::Integer(i)) => Value::Str(i.to_string()),
        (ValueType::Symbol, toml::Value::String(s)) => Value::symbol(s),
        (expected, other) => bail!(
            "`{}` expects {}, got `{}`",
            field.name,
            expected.name(),
            other
        ),
    };
    Ok(value)
}
