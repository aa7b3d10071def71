//! Quagga resource kinds.
//!
//! Each kind describes one family of records in the running configuration:
//! how its blocks open, which lines belong to it, and how to enter its
//! configuration context.

pub mod bgp_address_family;
pub mod ospf;
pub mod pim_router;
pub mod route_map;

pub use bgp_address_family::BgpAddressFamilyKind;
pub use ospf::OspfKind;
pub use pim_router::PimRouterKind;
pub use route_map::RouteMapKind;

use blockconf::BlockKind;

static OSPF: OspfKind = OspfKind;
static BGP_ADDRESS_FAMILY: BgpAddressFamilyKind = BgpAddressFamilyKind;
static PIM_ROUTER: PimRouterKind = PimRouterKind;
static ROUTE_MAP: RouteMapKind = RouteMapKind;

/// Names of every supported kind, in apply order.
pub const NAMES: &[&str] = &["ospf", "bgp_address_family", "pim_router", "route_map"];

/// Every supported kind, in apply order.
///
/// Route-maps come last so that anything referencing them exists first.
pub fn all() -> [&'static dyn BlockKind; 4] {
    [&OSPF, &BGP_ADDRESS_FAMILY, &PIM_ROUTER, &ROUTE_MAP]
}

/// Look up a kind by name.
pub fn by_name(name: &str) -> Option<&'static dyn BlockKind> {
    all().into_iter().find(|kind| kind.name() == name)
}
