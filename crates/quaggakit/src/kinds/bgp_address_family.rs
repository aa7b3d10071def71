//! BGP address families (`address-family ...` inside `router bgp <asn>`)
//!
//! Lines directly under `router bgp` belong to the implicit `ipv4_unicast`
//! family. Each ` address-family` line opens a sibling record; an explicit
//! `address-family ipv4` reopens the implicit one. Families not modelled here
//! (vpnv4, VRFs, evpn) end the current record and their lines are skipped.

use blockconf::{
    Attributes, BlockHeader, BlockKind, DefaultValue, Error, FieldSpec, FieldTable, Layout,
    ParentIndex, Result, Teardown, ValueType,
};
use regex::Regex;
use std::sync::LazyLock;

/// Attribute carrying the AS number of the enclosing `router bgp`.
pub const ASN: &str = "asn";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "aggregate_address",
        pattern: r"^\s+aggregate-address\s(.+)$",
        value_type: ValueType::List,
        default: DefaultValue::EmptyList,
        template: "aggregate-address {value}",
    },
    FieldSpec {
        name: "maximum_ebgp_paths",
        pattern: r"^\s+maximum-paths\s(\d+)$",
        value_type: ValueType::Integer,
        default: DefaultValue::Int(1),
        template: "maximum-paths {value}",
    },
    FieldSpec {
        name: "maximum_ibgp_paths",
        pattern: r"^\s+maximum-paths\sibgp\s(\d+)$",
        value_type: ValueType::Integer,
        default: DefaultValue::Int(1),
        template: "maximum-paths ibgp {value}",
    },
    FieldSpec {
        name: "networks",
        pattern: r"^\s+network\s(.+)$",
        value_type: ValueType::List,
        default: DefaultValue::EmptyList,
        template: "network {value}",
    },
];

static TABLE: LazyLock<FieldTable> =
    LazyLock::new(|| FieldTable::compile("bgp_address_family", FIELDS));
static ROUTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^router\sbgp\s(\d+)$").expect("static regex"));
static SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+address-family\s(ipv4|ipv6)(?:\s(unicast|multicast))?$")
        .expect("static regex")
});
static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(?:address-family\s|exit-address-family$)").expect("static regex")
});

/// Address family / subsequent address family pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFamily {
    /// `ipv4` or `ipv6`
    pub afi: &'static str,
    /// `unicast` or `multicast`
    pub safi: &'static str,
}

impl AddressFamily {
    /// Parse an `<afi>_<safi>` identity.
    pub fn parse(identity: &str) -> Option<Self> {
        let (afi, safi) = identity.split_once('_')?;
        Some(Self {
            afi: afi_of(afi)?,
            safi: safi_of(safi)?,
        })
    }

    /// Record identity.
    pub fn identity(&self) -> String {
        format!("{}_{}", self.afi, self.safi)
    }

    /// Command that enters this family inside `router bgp`.
    ///
    /// IPv6 unicast is entered without its SAFI.
    pub fn command(&self) -> String {
        match (self.afi, self.safi) {
            ("ipv6", "unicast") => "address-family ipv6".to_string(),
            (afi, safi) => format!("address-family {} {}", afi, safi),
        }
    }
}

fn afi_of(s: &str) -> Option<&'static str> {
    match s {
        "ipv4" => Some("ipv4"),
        "ipv6" => Some("ipv6"),
        _ => None,
    }
}

fn safi_of(s: &str) -> Option<&'static str> {
    match s {
        "unicast" => Some("unicast"),
        "multicast" => Some("multicast"),
        _ => None,
    }
}

/// BGP address-family settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BgpAddressFamilyKind;

impl BlockKind for BgpAddressFamilyKind {
    fn name(&self) -> &'static str {
        "bgp_address_family"
    }

    fn fields(&self) -> &FieldTable {
        &TABLE
    }

    fn layout(&self) -> Layout {
        Layout::Keyed
    }

    fn open_block(&self, line: &str) -> Option<BlockHeader> {
        let caps = ROUTER.captures(line)?;
        Some(BlockHeader::new("ipv4_unicast").with_attribute(ASN, &caps[1]))
    }

    fn open_section(&self, line: &str, block: &BlockHeader) -> Option<BlockHeader> {
        let caps = SECTION.captures(line)?;
        let family = AddressFamily {
            afi: afi_of(&caps[1])?,
            safi: caps.get(2).map_or(Some("unicast"), |m| safi_of(m.as_str()))?,
        };
        let mut header = BlockHeader::new(family.identity());
        header.attributes = block.attributes.clone();
        Some(header)
    }

    fn ends_section(&self, line: &str) -> bool {
        BOUNDARY.is_match(line)
    }

    fn teardown(&self) -> Teardown {
        Teardown::ClearFields
    }

    fn scope(
        &self,
        identity: &str,
        attributes: &Attributes,
        parents: &ParentIndex,
    ) -> Result<Vec<String>> {
        let family = AddressFamily::parse(identity).ok_or_else(|| Error::InvalidIdentity {
            kind: self.name(),
            identity: identity.to_string(),
        })?;

        let asn = attributes
            .get(ASN)
            .cloned()
            .or_else(|| parents.capture(&ROUTER, 1))
            .ok_or_else(|| Error::IdentityResolution {
                kind: self.name(),
                identity: identity.to_string(),
                parent: "router bgp <asn>",
            })?;

        Ok(vec![format!("router bgp {}", asn), family.command()])
    }
}
