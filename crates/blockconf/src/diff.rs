//! Diff computation between current and desired records

use crate::descriptor::FieldTable;
use crate::planner::CommandPlan;
use crate::resource::ResourceRecord;
use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Transition chosen for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Current state already matches
    Noop,
    /// ABSENT → PRESENT
    Create,
    /// PRESENT → PRESENT with changed fields
    Update,
    /// PRESENT → ABSENT
    Delete,
    /// PRESENT → PRESENT through a new block header
    Replace,
}

impl Action {
    /// Whether the action sends commands.
    pub fn is_change(&self) -> bool {
        !matches!(self, Action::Noop)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Noop => "unchanged",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Replace => "replace",
        };
        write!(f, "{}", s)
    }
}

/// Sparse set of fields whose desired value differs from the current one.
///
/// Entries are kept in field-table order, which is the emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<(&'static str, Value)>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare managed properties against a current record.
    ///
    /// Properties not named in `desired` are left alone. List order is
    /// ignored.
    pub fn between(
        table: &FieldTable,
        current: &ResourceRecord,
        desired: &BTreeMap<String, Value>,
    ) -> Self {
        let changes = table
            .iter()
            .filter_map(|field| {
                let want = desired.get(field.name)?;
                let have = current.get(field.name).unwrap_or(&field.default);
                (!want.equivalent(have)).then(|| (field.name, want.clone()))
            })
            .collect();
        Self { changes }
    }

    /// Add a change. The caller is responsible for ordering.
    pub fn push(&mut self, field: &'static str, value: Value) {
        self.changes.push((field, value));
    }

    /// Changes in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.changes.iter().map(|(name, value)| (*name, value))
    }

    /// Names of the changed fields.
    pub fn fields(&self) -> Vec<&'static str> {
        self.changes.iter().map(|(name, _)| *name).collect()
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Before and after of one field, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Field name
    pub field: &'static str,
    /// Value on the device
    pub from: Value,
    /// Desired value
    pub to: Value,
}

/// Planned change for one resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDiff {
    /// Kind name
    pub kind: &'static str,
    /// Record identity
    pub identity: String,
    /// Chosen transition
    pub action: Action,
    /// Field-level changes (empty for Noop and Delete)
    pub changes: Vec<FieldChange>,
    /// Commands that perform the transition
    pub plan: CommandPlan,
}

impl ResourceDiff {
    /// Stable resource id, `kind.identity`.
    pub fn id(&self) -> String {
        format!("{}.{}", self.kind, self.identity)
    }

    /// Human-readable description.
    pub fn description(&self) -> String {
        format!("{} {} `{}`", self.action, self.kind, self.identity)
    }

    /// Whether commands would be sent.
    pub fn has_changes(&self) -> bool {
        self.action.is_change() && !self.plan.is_empty()
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    /// Number of resources to create
    pub additions: usize,
    /// Number of resources to delete
    pub removals: usize,
    /// Number of resources to update in place
    pub modifications: usize,
    /// Number of resources to recreate
    pub replacements: usize,
    /// Number of resources already converged
    pub unchanged: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            if !diff.has_changes() {
                summary.unchanged += 1;
                continue;
            }
            match diff.action {
                Action::Create => summary.additions += 1,
                Action::Delete => summary.removals += 1,
                Action::Update => summary.modifications += 1,
                Action::Replace => summary.replacements += 1,
                Action::Noop => summary.unchanged += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications + self.replacements
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group diffs by kind, preserving order within each kind
pub fn group_by_kind(diffs: &[ResourceDiff]) -> BTreeMap<&'static str, Vec<&ResourceDiff>> {
    let mut groups: BTreeMap<&'static str, Vec<&ResourceDiff>> = BTreeMap::new();
    for diff in diffs {
        groups.entry(diff.kind).or_default().push(diff);
    }
    groups
}
