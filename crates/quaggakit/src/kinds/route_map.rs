//! Route-map entries (`route-map NAME ACTION SEQ`)
//!
//! A record is one sequence of a route-map, identified as `"<name> <seq>"`.
//! The action is a header attribute; changing it rewrites the entry.

use blockconf::{
    Attributes, BlockHeader, BlockKind, DefaultValue, Error, FieldSpec, FieldTable, Layout,
    ParentIndex, Result, ValueType,
};
use regex::Regex;
use std::sync::LazyLock;

/// Attribute holding `permit` or `deny`.
pub const ACTION: &str = "action";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "match",
        pattern: r"^\s+match\s(.+)$",
        value_type: ValueType::List,
        default: DefaultValue::EmptyList,
        template: "match {value}",
    },
    FieldSpec {
        name: "on_match",
        pattern: r"^\s+on-match\s(.+)$",
        value_type: ValueType::String,
        default: DefaultValue::Absent,
        template: "on-match {value}",
    },
    FieldSpec {
        name: "set",
        pattern: r"^\s+set\s(.+)$",
        value_type: ValueType::List,
        default: DefaultValue::EmptyList,
        template: "set {value}",
    },
];

static TABLE: LazyLock<FieldTable> = LazyLock::new(|| FieldTable::compile("route_map", FIELDS));
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^route-map\s([\w-]+)\s(deny|permit)\s(\d+)$").expect("static regex")
});
static IDENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w-]+)\s(\d+)$").expect("static regex"));

/// Route-map sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteMapKind;

impl BlockKind for RouteMapKind {
    fn name(&self) -> &'static str {
        "route_map"
    }

    fn fields(&self) -> &FieldTable {
        &TABLE
    }

    fn layout(&self) -> Layout {
        Layout::Keyed
    }

    fn open_block(&self, line: &str) -> Option<BlockHeader> {
        let caps = HEADER.captures(line)?;
        let identity = format!("{} {}", &caps[1], &caps[3]);
        Some(BlockHeader::new(identity).with_attribute(ACTION, &caps[2]))
    }

    fn fixed_attributes(&self) -> &'static [&'static str] {
        &[ACTION]
    }

    fn scope(
        &self,
        identity: &str,
        attributes: &Attributes,
        _parents: &ParentIndex,
    ) -> Result<Vec<String>> {
        let caps = IDENTITY
            .captures(identity)
            .ok_or_else(|| Error::InvalidIdentity {
                kind: self.name(),
                identity: identity.to_string(),
            })?;

        let action = match attributes.get(ACTION).map(String::as_str) {
            Some(action @ ("permit" | "deny")) => action,
            Some(other) => {
                return Err(Error::InvalidIdentity {
                    kind: self.name(),
                    identity: format!("{} ({})", identity, other),
                });
            }
            None => {
                return Err(Error::MissingAttribute {
                    kind: self.name(),
                    identity: identity.to_string(),
                    attribute: ACTION,
                });
            }
        };

        Ok(vec![format!("route-map {} {} {}", &caps[1], action, &caps[2])])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockconf::{read_records, Action, DesiredState, ErrorCategory, Reconciler, Value};

    const RUNNING: &str = r"!
route-map CONNECTED permit 10
 match ip address prefix-list CONNECTED_NETWORKS
!
interface eth0
 description uplink
!
route-map AS8631_out deny 20
 match ip address prefix-list LOOPBACK
 set local-preference 200
 set community 65000:1
 on-match next
!
line vty
!";

    #[test]
    fn test_parse_entries_across_foreign_blocks() {
        let records = read_records(&RouteMapKind, RUNNING).unwrap();
        assert_eq!(records.len(), 2);

        let connected = &records[0];
        assert_eq!(connected.identity, "CONNECTED 10");
        assert_eq!(connected.attribute(ACTION), Some("permit"));
        assert_eq!(
            connected.get("match"),
            Some(&Value::list(["ip address prefix-list CONNECTED_NETWORKS"]))
        );
        assert_eq!(connected.get("on_match"), Some(&Value::Absent));
        assert_eq!(connected.scope, ["route-map CONNECTED permit 10"]);

        let out = &records[1];
        assert_eq!(out.identity, "AS8631_out 20");
        assert_eq!(out.attribute(ACTION), Some("deny"));
        assert_eq!(
            out.get("set"),
            Some(&Value::list(["local-preference 200", "community 65000:1"]))
        );
        assert_eq!(out.get("on_match"), Some(&Value::Str("next".into())));
    }

    #[test]
    fn test_foreign_block_lines_not_captured() {
        let text = "route-map A permit 10\n!\ninterface eth0\n set nothing\n!\n";
        let records = read_records(&RouteMapKind, text).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].get("set").is_some_and(|v| v.items().is_empty()));
    }

    #[test]
    fn test_create_requires_action() {
        let reconciler = Reconciler::from_config(RUNNING);
        let err = reconciler
            .plan(&RouteMapKind, &DesiredState::present("NEW 5"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { .. }));
        assert_eq!(err.category(), ErrorCategory::Input);

        let desired = DesiredState::present("NEW 5")
            .with_attribute(ACTION, "permit")
            .with_property("set", Value::list(["metric 10"]));
        let diff = reconciler.plan(&RouteMapKind, &desired).unwrap();
        assert_eq!(diff.action, Action::Create);
        assert_eq!(
            diff.plan.commands(),
            [
                "configure terminal",
                "route-map NEW permit 5",
                "set metric 10",
                "end",
                "write memory"
            ]
        );
    }

    #[test]
    fn test_update_in_place() {
        let reconciler = Reconciler::from_config(RUNNING);
        let desired = DesiredState::present("AS8631_out 20")
            .with_attribute(ACTION, "deny")
            .with_property("on_match", Value::Absent)
            .with_property("set", Value::list(["local-preference 200"]));
        let diff = reconciler.plan(&RouteMapKind, &desired).unwrap();
        assert_eq!(diff.action, Action::Update);
        assert_eq!(
            diff.plan.body(),
            [
                "route-map AS8631_out deny 20",
                "no on-match",
                "no set community 65000:1"
            ]
        );
    }

    #[test]
    fn test_bare_on_match_is_reasserted() {
        let reconciler = Reconciler::from_config(RUNNING);
        let desired = DesiredState::present("AS8631_out 20")
            .with_attribute(ACTION, "deny")
            .with_property("on_match", true);
        let diff = reconciler.plan(&RouteMapKind, &desired).unwrap();
        assert_eq!(diff.action, Action::Update);
        assert_eq!(
            diff.plan.body(),
            ["route-map AS8631_out deny 20", "no on-match", "on-match"]
        );
    }

    #[test]
    fn test_action_change_replaces() {
        let reconciler = Reconciler::from_config(RUNNING);
        let desired = DesiredState::present("CONNECTED 10").with_attribute(ACTION, "deny");
        let diff = reconciler.plan(&RouteMapKind, &desired).unwrap();
        assert_eq!(diff.action, Action::Replace);
        assert_eq!(
            diff.plan.commands(),
            [
                "configure terminal",
                "route-map CONNECTED permit 10",
                "no route-map CONNECTED permit 10",
                "route-map CONNECTED deny 10",
                "match ip address prefix-list CONNECTED_NETWORKS",
                "end",
                "write memory"
            ]
        );
    }

    #[test]
    fn test_delete() {
        let reconciler = Reconciler::from_config(RUNNING);
        let diff = reconciler
            .plan(&RouteMapKind, &DesiredState::absent("CONNECTED 10"))
            .unwrap();
        assert_eq!(diff.action, Action::Delete);
        assert_eq!(
            diff.plan.body(),
            [
                "route-map CONNECTED permit 10",
                "no route-map CONNECTED permit 10"
            ]
        );

        let missing = reconciler
            .plan(&RouteMapKind, &DesiredState::absent("GONE 1"))
            .unwrap();
        assert_eq!(missing.action, Action::Noop);
    }

    #[test]
    fn test_malformed_identity() {
        let reconciler = Reconciler::from_config(RUNNING);
        let desired = DesiredState::present("no-sequence").with_attribute(ACTION, "permit");
        assert!(matches!(
            reconciler.plan(&RouteMapKind, &desired),
            Err(Error::InvalidIdentity { .. })
        ));
    }
}
