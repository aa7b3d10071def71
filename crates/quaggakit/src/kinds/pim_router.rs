//! PIM router settings
//!
//! These are global, top-level lines with no enclosing block.

use blockconf::{
    Attributes, BlockHeader, BlockKind, DefaultValue, FieldSpec, FieldTable, Layout, ParentIndex,
    Result, ValueType,
};
use std::sync::LazyLock;

/// Identity of the single PIM record.
pub const IDENTITY: &str = "pim";

const FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "ip_multicast_routing",
    pattern: r"^ip\smulticast-routing$",
    value_type: ValueType::Boolean,
    default: DefaultValue::False,
    template: "ip multicast-routing",
}];

static TABLE: LazyLock<FieldTable> = LazyLock::new(|| FieldTable::compile("pim_router", FIELDS));

/// Global PIM switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PimRouterKind;

impl BlockKind for PimRouterKind {
    fn name(&self) -> &'static str {
        "pim_router"
    }

    fn fields(&self) -> &FieldTable {
        &TABLE
    }

    fn layout(&self) -> Layout {
        Layout::Singleton { identity: IDENTITY }
    }

    fn open_block(&self, _line: &str) -> Option<BlockHeader> {
        None
    }

    fn is_blockless(&self) -> bool {
        true
    }

    fn scope(
        &self,
        _identity: &str,
        _attributes: &Attributes,
        _parents: &ParentIndex,
    ) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockconf::{read_records, Action, DesiredState, Existence, Reconciler, Value};

    const RUNNING: &str = "!\nhostname r1\nip multicast-routing\n!\ninterface eth0\n ip pim sm\n!\n";

    #[test]
    fn test_parse_top_level_flag() {
        let records = read_records(&PimRouterKind, RUNNING).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity, "pim");
        assert!(records[0].is_present());
        assert_eq!(records[0].get("ip_multicast_routing"), Some(&Value::Bool(true)));
        assert!(records[0].scope.is_empty());
    }

    #[test]
    fn test_absent_when_unset() {
        let records = read_records(&PimRouterKind, "hostname r1\n").unwrap();
        assert_eq!(records[0].existence, Existence::Absent);
        assert_eq!(records[0].get("ip_multicast_routing"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_enable_from_absent() {
        let reconciler = Reconciler::from_config("hostname r1\n");
        let desired = DesiredState::present(IDENTITY).with_property("ip_multicast_routing", true);
        let diff = reconciler.plan(&PimRouterKind, &desired).unwrap();
        assert_eq!(diff.action, Action::Create);
        assert_eq!(
            diff.plan.commands(),
            [
                "configure terminal",
                "ip multicast-routing",
                "end",
                "write memory"
            ]
        );

        // nothing to create when every field stays at its default
        let diff = reconciler
            .plan(&PimRouterKind, &DesiredState::present(IDENTITY))
            .unwrap();
        assert_eq!(diff.action, Action::Noop);
        assert!(diff.plan.is_empty());
    }

    #[test]
    fn test_disable_and_delete() {
        let reconciler = Reconciler::from_config(RUNNING);

        let update = reconciler
            .plan(
                &PimRouterKind,
                &DesiredState::present(IDENTITY).with_property("ip_multicast_routing", false),
            )
            .unwrap();
        assert_eq!(update.plan.body(), ["no ip multicast-routing"]);

        let delete = reconciler
            .plan(&PimRouterKind, &DesiredState::absent(IDENTITY))
            .unwrap();
        assert_eq!(delete.action, Action::Delete);
        assert_eq!(delete.plan.body(), ["no ip multicast-routing"]);
    }
}
