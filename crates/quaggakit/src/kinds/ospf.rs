//! OSPF process (`router ospf`)

use blockconf::{
    Attributes, BlockHeader, BlockKind, DefaultValue, FieldSpec, FieldTable, Layout, ParentIndex,
    Result, ValueType,
};
use regex::Regex;
use std::sync::LazyLock;

/// Identity of the single OSPF record.
pub const IDENTITY: &str = "ospf";

const BLOCK: &str = "router ospf";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "router_id",
        pattern: r"^\s+ospf\srouter-id\s(.*)$",
        value_type: ValueType::String,
        default: DefaultValue::Absent,
        template: "ospf router-id {value}",
    },
    FieldSpec {
        name: "opaque",
        pattern: r"^\s+capability\sopaque$",
        value_type: ValueType::Boolean,
        default: DefaultValue::False,
        template: "capability opaque",
    },
    FieldSpec {
        name: "rfc1583",
        pattern: r"^\s+compatible\srfc1583$",
        value_type: ValueType::Boolean,
        default: DefaultValue::False,
        template: "compatible rfc1583",
    },
    FieldSpec {
        name: "abr_type",
        pattern: r"^\s+ospf\sabr-type\s(\w+)$",
        value_type: ValueType::Symbol,
        default: DefaultValue::Symbol("cisco"),
        template: "ospf abr-type {value}",
    },
    FieldSpec {
        name: "log_adjacency_changes",
        pattern: r"^\s+log-adjacency-changes(?:\s(detail))?$",
        value_type: ValueType::Symbol,
        default: DefaultValue::False,
        template: "log-adjacency-changes {value}",
    },
];

static TABLE: LazyLock<FieldTable> = LazyLock::new(|| FieldTable::compile("ospf", FIELDS));
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^router\sospf$").expect("static regex"));

/// The OSPF routing process. There is at most one per daemon.
#[derive(Debug, Clone, Copy, Default)]
pub struct OspfKind;

impl BlockKind for OspfKind {
    fn name(&self) -> &'static str {
        "ospf"
    }

    fn fields(&self) -> &FieldTable {
        &TABLE
    }

    fn layout(&self) -> Layout {
        Layout::Singleton { identity: IDENTITY }
    }

    fn open_block(&self, line: &str) -> Option<BlockHeader> {
        HEADER
            .is_match(line)
            .then(|| BlockHeader::new(IDENTITY))
    }

    fn scope(
        &self,
        _identity: &str,
        _attributes: &Attributes,
        _parents: &ParentIndex,
    ) -> Result<Vec<String>> {
        Ok(vec![BLOCK.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockconf::{
        plan_create, plan_delete, plan_update, read_records, ChangeSet, DesiredState, Existence,
        Reconciler, Value,
    };

    #[test]
    fn test_block_boundary() {
        let text = "!\nrouter ospf\n ospf router-id 10.0.0.1\n capability opaque\ninterface eth0\n";
        let records = read_records(&OspfKind, text).unwrap();
        assert_eq!(records.len(), 1);

        let ospf = &records[0];
        assert_eq!(ospf.identity, "ospf");
        assert!(ospf.is_present());
        assert_eq!(ospf.get("router_id"), Some(&Value::Str("10.0.0.1".into())));
        assert_eq!(ospf.get("opaque"), Some(&Value::Bool(true)));
        assert_eq!(ospf.get("rfc1583"), Some(&Value::Bool(false)));
        assert_eq!(ospf.get("abr_type"), Some(&Value::symbol("cisco")));
        assert_eq!(ospf.get("log_adjacency_changes"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_missing_block_is_absent_singleton() {
        let records = read_records(&OspfKind, "hostname r1\n!\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].existence, Existence::Absent);
        assert_eq!(records[0].fields.len(), 5);
    }

    #[test]
    fn test_log_adjacency_changes_qualifier() {
        let plain = read_records(&OspfKind, "router ospf\n log-adjacency-changes\n").unwrap();
        assert_eq!(plain[0].get("log_adjacency_changes"), Some(&Value::Bool(true)));

        let detail =
            read_records(&OspfKind, "router ospf\n log-adjacency-changes detail\n").unwrap();
        assert_eq!(
            detail[0].get("log_adjacency_changes"),
            Some(&Value::symbol("detail"))
        );
    }

    #[test]
    fn test_abr_type_symbol() {
        let records = read_records(&OspfKind, "router ospf\n ospf abr-type shortcut\n").unwrap();
        assert_eq!(records[0].get("abr_type"), Some(&Value::symbol("shortcut")));
    }

    #[test]
    fn test_default_create_round_trips() {
        let desired = DesiredState::present(IDENTITY)
            .to_record(&OspfKind, &ParentIndex::default())
            .unwrap();
        let plan = plan_create(&OspfKind, &desired);
        assert_eq!(
            plan.commands(),
            ["configure terminal", "router ospf", "end", "write memory"]
        );

        let config = plan.body().join("\n");
        let parsed = read_records(&OspfKind, &config).unwrap();
        assert_eq!(parsed, vec![desired]);
    }

    #[test]
    fn test_create_in_table_order() {
        let desired = DesiredState::present(IDENTITY)
            .with_property("log_adjacency_changes", Value::symbol("detail"))
            .with_property("abr_type", Value::symbol("ibm"))
            .with_property("router_id", "10.0.0.1")
            .to_record(&OspfKind, &ParentIndex::default())
            .unwrap();
        let plan = plan_create(&OspfKind, &desired);
        assert_eq!(
            plan.body(),
            [
                "router ospf",
                "ospf router-id 10.0.0.1",
                "ospf abr-type ibm",
                "log-adjacency-changes detail"
            ]
        );
    }

    #[test]
    fn test_update_flag_on_symbol_field() {
        let mut current = read_records(
            &OspfKind,
            "router ospf\n log-adjacency-changes detail\n ospf router-id 1.1.1.1\n",
        )
        .unwrap()
        .remove(0);

        let mut changes = ChangeSet::new();
        changes.push("router_id", Value::Absent);
        changes.push("log_adjacency_changes", Value::Bool(true));

        let plan = plan_update(&OspfKind, &mut current, &changes);
        assert_eq!(
            plan.body(),
            [
                "router ospf",
                "no ospf router-id",
                "no log-adjacency-changes",
                "log-adjacency-changes"
            ]
        );
    }

    #[test]
    fn test_delete() {
        let current = read_records(&OspfKind, "router ospf\n").unwrap().remove(0);
        assert_eq!(
            plan_delete(&OspfKind, &current).commands(),
            [
                "configure terminal",
                "router ospf",
                "no router ospf",
                "end",
                "write memory"
            ]
        );
    }

    #[test]
    fn test_reconcile_against_running_config() {
        let reconciler = Reconciler::from_config("router ospf\n capability opaque\n!\n");
        let diff = reconciler
            .plan(
                &OspfKind,
                &DesiredState::present(IDENTITY)
                    .with_property("opaque", false)
                    .with_property("rfc1583", true),
            )
            .unwrap();
        assert_eq!(
            diff.plan.body(),
            ["router ospf", "no capability opaque", "compatible rfc1583"]
        );

        let wrong = reconciler.plan(&OspfKind, &DesiredState::present("ospf2"));
        assert!(wrong.is_err());
    }
}
