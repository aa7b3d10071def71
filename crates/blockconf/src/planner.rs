//! Command planning
//!
//! Every plan is a flat list of console commands bracketed by
//! `configure terminal` … `end` and terminated by `write memory`. A plan
//! with nothing to do is empty, wrapper included.

use crate::descriptor::{negate, render, FieldDescriptor};
use crate::diff::ChangeSet;
use crate::resource::{BlockKind, ResourceRecord, Teardown};
use crate::value::{Value, ValueType};
use serde::Serialize;

/// Enters configuration mode.
pub const CONFIGURE: &str = "configure terminal";
/// Leaves configuration mode.
pub const END: &str = "end";
/// Persists the running configuration.
pub const WRITE: &str = "write memory";

/// Ordered console commands for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandPlan {
    commands: Vec<String>,
}

impl CommandPlan {
    /// Wrap a body in the configuration-mode bracket.
    ///
    /// An empty body gives an empty plan.
    pub fn wrap(body: Vec<String>) -> Self {
        if body.is_empty() {
            return Self::default();
        }

        let mut commands = Vec::with_capacity(body.len() + 3);
        commands.push(CONFIGURE.to_string());
        commands.extend(body);
        commands.push(END.to_string());
        commands.push(WRITE.to_string());
        Self { commands }
    }

    /// Commands in send order.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Commands between the bracket.
    pub fn body(&self) -> &[String] {
        match self.commands.len() {
            0 => &[],
            n => &self.commands[1..n - 2],
        }
    }

    /// Whether there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands, bracket included.
    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

/// Commands that set `value` on a freshly created record.
fn set_commands(field: &FieldDescriptor, value: &Value) -> Vec<String> {
    match value {
        Value::List(items) => items.iter().map(|v| render(field, Some(v))).collect(),
        Value::Bool(true) => vec![render(field, None)],
        Value::Absent | Value::Bool(false) => vec![negate(&render(field, None))],
        other => vec![render(field, other.argument().as_deref())],
    }
}

/// Commands that move a field from `current` to `desired`.
fn change_commands(field: &FieldDescriptor, current: &Value, desired: &Value) -> Vec<String> {
    if desired.is_unset() {
        return vec![negate(&render(field, None))];
    }

    if desired.is_flag() && matches!(field.value_type, ValueType::Symbol | ValueType::String) {
        let cmd = render(field, None);
        return vec![negate(&cmd), cmd];
    }

    if desired.is_flag() {
        return vec![render(field, None)];
    }

    if let Value::List(want) = desired {
        let have = current.items();
        let removed = have
            .iter()
            .filter(|v| !want.contains(v))
            .map(|v| negate(&render(field, Some(v))));
        let added = want
            .iter()
            .filter(|v| !have.contains(v))
            .map(|v| render(field, Some(v)));
        return removed.chain(added).collect();
    }

    vec![render(field, desired.argument().as_deref())]
}

/// Commands that remove a configured field.
fn clear_commands(field: &FieldDescriptor, current: &Value) -> Vec<String> {
    match current {
        Value::List(items) => items
            .iter()
            .map(|v| negate(&render(field, Some(v))))
            .collect(),
        Value::Absent | Value::Bool(false) => Vec::new(),
        Value::Bool(true) => vec![negate(&render(field, None))],
        other => vec![negate(&render(field, other.argument().as_deref()))],
    }
}

fn create_body(kind: &dyn BlockKind, desired: &ResourceRecord) -> Vec<String> {
    let fields: Vec<String> = kind
        .fields()
        .iter()
        .filter_map(|field| {
            let value = desired.get(field.name)?;
            (!value.equivalent(&field.default)).then(|| set_commands(field, value))
        })
        .flatten()
        .collect();

    if kind.is_blockless() && fields.is_empty() {
        return Vec::new();
    }

    let mut body = desired.scope.clone();
    body.extend(fields);
    body
}

fn delete_body(kind: &dyn BlockKind, current: &ResourceRecord) -> Vec<String> {
    let mut body = current.scope.clone();

    match kind.teardown() {
        Teardown::RemoveBlock => {
            if let Some(block) = current.scope.last() {
                body.push(negate(block));
            }
        }
        Teardown::ClearFields => {
            let fields: Vec<String> = kind
                .fields()
                .iter()
                .filter_map(|field| {
                    let value = current.get(field.name)?;
                    (!value.equivalent(&field.default)).then(|| clear_commands(field, value))
                })
                .flatten()
                .collect();
            if fields.is_empty() {
                return Vec::new();
            }
            body.extend(fields);
        }
    }

    body
}

/// Plan an ABSENT → PRESENT transition.
///
/// The scope is followed by one command per field that differs from its
/// default, list fields one command per element.
pub fn plan_create(kind: &dyn BlockKind, desired: &ResourceRecord) -> CommandPlan {
    CommandPlan::wrap(create_body(kind, desired))
}

/// Plan a PRESENT → PRESENT transition over a sparse change set.
///
/// `current` is updated to the new values, so planning the same changes
/// again yields an empty plan.
pub fn plan_update(
    kind: &dyn BlockKind,
    current: &mut ResourceRecord,
    changes: &ChangeSet,
) -> CommandPlan {
    let mut fields = Vec::new();

    for (name, desired) in changes.iter() {
        let Some(field) = kind.fields().field(name) else {
            continue;
        };
        let have = current.get(name).unwrap_or(&field.default);
        if desired.equivalent(have) {
            continue;
        }

        fields.extend(change_commands(field, have, desired));
        current.fields.insert(name.to_string(), desired.clone());
    }

    if fields.is_empty() {
        return CommandPlan::default();
    }

    let mut body = current.scope.clone();
    body.extend(fields);
    CommandPlan::wrap(body)
}

/// Plan a PRESENT → ABSENT transition.
pub fn plan_delete(kind: &dyn BlockKind, current: &ResourceRecord) -> CommandPlan {
    CommandPlan::wrap(delete_body(kind, current))
}

/// Plan the removal of `current` and the creation of `desired` as one batch.
///
/// Used when a header attribute that cannot change in place differs.
pub fn plan_replace(
    kind: &dyn BlockKind,
    current: &ResourceRecord,
    desired: &ResourceRecord,
) -> CommandPlan {
    let mut body = delete_body(kind, current);
    body.extend(create_body(kind, desired));
    CommandPlan::wrap(body)
}
