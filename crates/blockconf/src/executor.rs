//! Reconciliation - reads the device once, plans per resource, applies
//! each resource's commands in one console invocation

use crate::context::{AutoConfirm, ConfirmCallback, Console, NoProgress, ProgressCallback};
use crate::diff::{Action, ChangeSet, FieldChange, ResourceDiff};
use crate::error::{Error, Result};
use crate::materialize::materialize;
use crate::parents::ParentIndex;
use crate::planner::{plan_create, plan_delete, plan_replace, plan_update, CommandPlan};
use crate::resource::{BlockKind, DesiredState, Existence, Layout, ResourceRecord};
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary};
use crate::value::Value;
use log::{debug, info};

/// Query returning the device's running configuration.
pub const RUNNING_CONFIG: &str = "show running-config";

/// One reconciliation cycle over a single read of the running configuration.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: String,
    parents: ParentIndex,
}

impl Reconciler {
    /// Read the running configuration from the console.
    pub fn read<C: Console + ?Sized>(console: &C) -> Result<Self> {
        let config = console.read(RUNNING_CONFIG)?;
        debug!("Read {} lines of running configuration", config.lines().count());
        Ok(Self::from_config(config))
    }

    /// Reconcile against an already captured configuration dump.
    pub fn from_config(config: impl Into<String>) -> Self {
        let config = config.into();
        let parents = ParentIndex::scan(&config);
        Self { config, parents }
    }

    /// The configuration this cycle works from.
    pub fn running_config(&self) -> &str {
        &self.config
    }

    /// Index of top-level blocks.
    pub fn parents(&self) -> &ParentIndex {
        &self.parents
    }

    /// Every record of a kind.
    pub fn records(&self, kind: &dyn BlockKind) -> Result<Vec<ResourceRecord>> {
        materialize(kind, &self.config, &self.parents)
    }

    /// The present record with the given identity, if any.
    pub fn current(&self, kind: &dyn BlockKind, identity: &str) -> Result<Option<ResourceRecord>> {
        Ok(self
            .records(kind)?
            .into_iter()
            .find(|r| r.identity == identity && r.is_present()))
    }

    /// Choose the transition for one desired resource and plan its commands.
    pub fn plan(&self, kind: &dyn BlockKind, desired: &DesiredState) -> Result<ResourceDiff> {
        if let Layout::Singleton { identity } = kind.layout() {
            if desired.identity != identity {
                return Err(Error::InvalidIdentity {
                    kind: kind.name(),
                    identity: desired.identity.clone(),
                });
            }
        }
        desired.validate(kind.fields())?;

        let current = self.current(kind, &desired.identity)?;
        let (action, changes, plan) = match (current, desired.ensure) {
            (None, Existence::Absent) => (Action::Noop, Vec::new(), CommandPlan::default()),
            (None, Existence::Present) => {
                let record = desired.to_record(kind, &self.parents)?;
                let changes = changed_from_defaults(kind, &record);
                (Action::Create, changes, plan_create(kind, &record))
            }
            (Some(current), Existence::Absent) => {
                (Action::Delete, Vec::new(), plan_delete(kind, &current))
            }
            (Some(current), Existence::Present) if needs_replace(kind, &current, desired) => {
                let target = overlay(kind, &current, desired, &self.parents)?;
                let set = ChangeSet::between(kind.fields(), &current, &desired.properties);
                let changes = field_changes(&current, &set);
                (Action::Replace, changes, plan_replace(kind, &current, &target))
            }
            (Some(mut current), Existence::Present) => {
                let set = ChangeSet::between(kind.fields(), &current, &desired.properties);
                let changes = field_changes(&current, &set);
                (Action::Update, changes, plan_update(kind, &mut current, &set))
            }
        };

        let action = if plan.is_empty() { Action::Noop } else { action };
        if action.is_change() {
            info!(
                "Planned {} for {} `{}` ({} commands)",
                action,
                kind.name(),
                desired.identity,
                plan.len()
            );
        }

        Ok(ResourceDiff {
            kind: kind.name(),
            identity: desired.identity.clone(),
            action,
            changes,
            plan,
        })
    }
}

fn needs_replace(kind: &dyn BlockKind, current: &ResourceRecord, desired: &DesiredState) -> bool {
    kind.fixed_attributes().iter().any(|attr| {
        desired
            .attributes
            .get(*attr)
            .is_some_and(|want| current.attribute(attr) != Some(want.as_str()))
    })
}

/// The current record with the desired attributes and properties laid over it.
fn overlay(
    kind: &dyn BlockKind,
    current: &ResourceRecord,
    desired: &DesiredState,
    parents: &ParentIndex,
) -> Result<ResourceRecord> {
    let mut target = current.clone();
    target
        .attributes
        .extend(desired.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    for (name, value) in &desired.properties {
        kind.fields().accessor(name)?.set(&mut target, value.clone())?;
    }
    target.scope = kind.scope(&target.identity, &target.attributes, parents)?;
    Ok(target)
}

fn field_changes(current: &ResourceRecord, set: &ChangeSet) -> Vec<FieldChange> {
    set.iter()
        .map(|(field, to)| FieldChange {
            field,
            from: current.get(field).cloned().unwrap_or(Value::Absent),
            to: to.clone(),
        })
        .collect()
}

fn changed_from_defaults(kind: &dyn BlockKind, record: &ResourceRecord) -> Vec<FieldChange> {
    kind.fields()
        .iter()
        .filter_map(|field| {
            let value = record.get(field.name)?;
            (!value.equivalent(&field.default)).then(|| FieldChange {
                field: field.name,
                from: field.default.clone(),
                to: value.clone(),
            })
        })
        .collect()
}

/// Apply planned changes, one console invocation per resource
///
/// # Arguments
/// * `console` - Console that receives the command lists
/// * `diffs` - Planned changes; unchanged resources are counted and skipped
/// * `opts` - Execution options (dry_run, verbose)
/// * `progress` - Progress callback
/// * `confirm` - Confirmation callback
///
/// # Returns
/// Summary of execution results
pub fn execute<C, P, F>(
    console: &C,
    diffs: &[ResourceDiff],
    opts: ExecuteOptions,
    progress: &mut P,
    confirm: &mut F,
) -> Result<ExecuteSummary>
where
    C: Console + ?Sized,
    P: ProgressCallback,
    F: ConfirmCallback,
{
    let pending: Vec<&ResourceDiff> = diffs.iter().filter(|d| d.has_changes()).collect();
    let mut summary = ExecuteSummary {
        no_change: diffs.len() - pending.len(),
        ..Default::default()
    };

    if pending.is_empty() {
        return Ok(summary);
    }

    // Confirm before proceeding (unless dry_run)
    if !opts.dry_run && !confirm.confirm(&format!("Apply {} change(s)?", pending.len()))? {
        summary.skipped += pending.len();
        return Ok(summary);
    }

    if opts.dry_run {
        summary.skipped += pending.len();
        return Ok(summary);
    }

    progress.on_batch_start(pending.len());
    for diff in pending {
        let id = diff.id();
        progress.on_resource_start(&id, &diff.description());
        let result = apply_diff(console, diff, opts.verbose);
        progress.on_resource_complete(&id, &result);
        summary.add_result(&result);
    }
    progress.on_batch_complete();

    Ok(summary)
}

/// Send one resource's command list
fn apply_diff<C: Console + ?Sized>(console: &C, diff: &ResourceDiff, verbose: bool) -> ApplyResult {
    info!("Applying {} ({} commands)", diff.id(), diff.plan.len());
    if verbose {
        for command in diff.plan.commands() {
            debug!("  {}", command);
        }
    }

    match console.exec(diff.plan.commands()) {
        Ok(output) if output.success => match diff.action {
            Action::Create => ApplyResult::Created,
            Action::Delete => ApplyResult::Removed,
            Action::Update | Action::Replace => ApplyResult::Modified,
            Action::Noop => ApplyResult::NoChange,
        },
        Ok(output) => ApplyResult::failed(&Error::console(
            format!("{} rejected: {}", diff.id(), output.combined().trim()),
            output.combined(),
        )),
        Err(e) => ApplyResult::failed(&e),
    }
}

/// Simple execution without callbacks
///
/// For basic use cases where you don't need progress or confirmation.
pub fn execute_simple<C: Console + ?Sized>(
    console: &C,
    diffs: &[ResourceDiff],
    opts: ExecuteOptions,
) -> Result<ExecuteSummary> {
    execute(console, diffs, opts, &mut NoProgress, &mut AutoConfirm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AutoDecline;
    use crate::error::ErrorCategory;
    use crate::resource::tests::SectionKind;
    use crate::types::CommandOutput;
    use std::cell::{Cell, RefCell};

    /// Console double that serves a fixed dump and records batches
    struct MockConsole {
        config: String,
        reads: Cell<usize>,
        batches: RefCell<Vec<Vec<String>>>,
        reject: bool,
        unreachable: bool,
    }

    impl MockConsole {
        fn new(config: &str) -> Self {
            Self {
                config: config.to_string(),
                reads: Cell::new(0),
                batches: RefCell::new(Vec::new()),
                reject: false,
                unreachable: false,
            }
        }
    }

    impl Console for MockConsole {
        fn read(&self, query: &str) -> Result<String> {
            assert_eq!(query, RUNNING_CONFIG);
            self.reads.set(self.reads.get() + 1);
            if self.unreachable {
                return Err(Error::console("failed to connect to any daemons", ""));
            }
            Ok(self.config.clone())
        }

        fn exec(&self, commands: &[String]) -> Result<CommandOutput> {
            self.batches.borrow_mut().push(commands.to_vec());
            if self.unreachable {
                return Err(Error::console("vtysh exited with 1", "Exiting: failed"));
            }
            if self.reject {
                Ok(CommandOutput {
                    stdout: b"% Unknown command.".to_vec(),
                    stderr: Vec::new(),
                    success: false,
                })
            } else {
                Ok(CommandOutput::ok(""))
            }
        }
    }

    const CONFIG: &str = r"!
section a
 description uplink
 member x
!
section b
 shutdown
!
";

    #[test]
    fn test_single_read_per_cycle() {
        let console = MockConsole::new(CONFIG);
        let reconciler = Reconciler::read(&console).unwrap();
        reconciler
            .plan(&SectionKind, &DesiredState::present("a"))
            .unwrap();
        reconciler
            .plan(&SectionKind, &DesiredState::absent("b"))
            .unwrap();
        assert_eq!(console.reads.get(), 1);
    }

    #[test]
    fn test_plan_actions() {
        let reconciler = Reconciler::from_config(CONFIG);

        let create = reconciler
            .plan(&SectionKind, &DesiredState::present("c").with_property("shutdown", true))
            .unwrap();
        assert_eq!(create.action, Action::Create);
        assert_eq!(create.plan.body(), ["section c", "shutdown"]);
        assert_eq!(create.changes.len(), 1);

        let update = reconciler
            .plan(
                &SectionKind,
                &DesiredState::present("a").with_property("members", Value::list(["y"])),
            )
            .unwrap();
        assert_eq!(update.action, Action::Update);
        assert_eq!(update.plan.body(), ["section a", "no member x", "member y"]);

        let delete = reconciler
            .plan(&SectionKind, &DesiredState::absent("b"))
            .unwrap();
        assert_eq!(delete.action, Action::Delete);
        assert_eq!(delete.plan.body(), ["section b", "no section b"]);

        let noop = reconciler
            .plan(&SectionKind, &DesiredState::absent("zzz"))
            .unwrap();
        assert_eq!(noop.action, Action::Noop);
        assert!(noop.plan.is_empty());
    }

    #[test]
    fn test_unmanaged_fields_are_left_alone() {
        let reconciler = Reconciler::from_config(CONFIG);
        let diff = reconciler
            .plan(&SectionKind, &DesiredState::present("a").with_property("member", true))
            .unwrap_err();
        assert!(matches!(diff, Error::UnknownField { .. }));

        // description is configured but not managed here
        let diff = reconciler
            .plan(
                &SectionKind,
                &DesiredState::present("a").with_property("members", Value::list(["x"])),
            )
            .unwrap();
        assert_eq!(diff.action, Action::Noop);
        assert!(diff.plan.is_empty());
    }

    #[test]
    fn test_execute_sends_one_batch_per_change() {
        let console = MockConsole::new(CONFIG);
        let reconciler = Reconciler::read(&console).unwrap();
        let diffs = vec![
            reconciler
                .plan(&SectionKind, &DesiredState::present("a").with_property("shutdown", true))
                .unwrap(),
            reconciler
                .plan(&SectionKind, &DesiredState::present("b"))
                .unwrap(),
            reconciler
                .plan(&SectionKind, &DesiredState::absent("b"))
                .unwrap(),
        ];

        let summary = execute_simple(&console, &diffs, ExecuteOptions::default()).unwrap();
        assert_eq!(summary.modified, 1);
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.no_change, 1);

        let batches = console.batches.borrow();
        assert_eq!(batches.len(), 2);
        assert_eq!(
            batches[0],
            ["configure terminal", "section a", "shutdown", "end", "write memory"]
        );
    }

    #[test]
    fn test_dry_run_and_decline_send_nothing() {
        let console = MockConsole::new(CONFIG);
        let reconciler = Reconciler::read(&console).unwrap();
        let diffs = vec![reconciler
            .plan(&SectionKind, &DesiredState::absent("a"))
            .unwrap()];

        let opts = ExecuteOptions {
            dry_run: true,
            ..Default::default()
        };
        let summary = execute(&console, &diffs, opts, &mut NoProgress, &mut AutoConfirm).unwrap();
        assert_eq!(summary.skipped, 1);

        let summary = execute(
            &console,
            &diffs,
            ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoDecline,
        )
        .unwrap();
        assert_eq!(summary.skipped, 1);
        assert!(console.batches.borrow().is_empty());
    }

    #[test]
    fn test_console_rejection_fails_resource() {
        let mut console = MockConsole::new(CONFIG);
        console.reject = true;
        let reconciler = Reconciler::from_config(CONFIG);
        let diffs = vec![reconciler
            .plan(&SectionKind, &DesiredState::absent("a"))
            .unwrap()];

        let summary = execute_simple(&console, &diffs, ExecuteOptions::default()).unwrap();
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());

        match apply_diff(&console, &diffs[0], false) {
            ApplyResult::Failed { error, category } => {
                assert_eq!(category, ErrorCategory::Console);
                assert!(error.contains("% Unknown command."));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_console_error_keeps_category() {
        let mut console = MockConsole::new(CONFIG);
        console.unreachable = true;
        let reconciler = Reconciler::from_config(CONFIG);
        let diff = reconciler
            .plan(&SectionKind, &DesiredState::absent("a"))
            .unwrap();

        let result = apply_diff(&console, &diff, false);
        assert_eq!(
            result,
            ApplyResult::Failed {
                error: "console failure: vtysh exited with 1".to_string(),
                category: ErrorCategory::Console,
            }
        );
    }

    #[test]
    fn test_failed_read_propagates() {
        let mut console = MockConsole::new(CONFIG);
        console.unreachable = true;
        let err = Reconciler::read(&console).unwrap_err();
        assert!(err.is_console());
        assert_eq!(console.reads.get(), 1);
    }
}
