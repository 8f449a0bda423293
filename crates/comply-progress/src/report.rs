//! Scope reductions and the full progress report

use crate::progress::{Progress, RequirementProgress};
use comply_graph::{GroupEntry, GroupMap, RequirementEntry, StepGroups};
use comply_schema::CapturedValues;
use indexmap::IndexMap;
use serde::Serialize;

/// Where to compute progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Every step
    Global,
    /// One step
    Step(&'a str),
    /// One group of one step
    Group {
        /// Step name
        step: &'a str,
        /// Group name
        group: &'a str,
    },
    /// One requirement of one group
    Requirement {
        /// Step name
        step: &'a str,
        /// Group name
        group: &'a str,
        /// Requirement key
        key: &'a str,
    },
}

/// Progress of a single requirement
pub fn requirement_progress<V>(requirement: &RequirementEntry, values: &V) -> RequirementProgress
where
    V: CapturedValues + ?Sized,
{
    RequirementProgress::from_progress(Progress::tally(requirement.implementations(), values))
}

/// Progress over every requirement of a group
pub fn group_progress<V>(group: &GroupEntry, values: &V) -> Progress
where
    V: CapturedValues + ?Sized,
{
    Progress::tally(
        group.requirements().flat_map(|(_, r)| r.implementations()),
        values,
    )
}

/// Progress over every group of a step
pub fn step_progress<V>(groups: &GroupMap, values: &V) -> Progress
where
    V: CapturedValues + ?Sized,
{
    Progress::tally(
        groups
            .values()
            .flat_map(|g| g.requirements())
            .flat_map(|(_, r)| r.implementations()),
        values,
    )
}

/// Progress over the whole hierarchy
pub fn progress<V>(steps: &StepGroups, values: &V) -> Progress
where
    V: CapturedValues + ?Sized,
{
    Progress::tally(
        steps.requirements().flat_map(|(_, _, r)| r.implementations()),
        values,
    )
}

/// Progress at a named scope
///
/// `None` when the scope does not exist in the hierarchy.
pub fn progress_at<V>(steps: &StepGroups, scope: Scope<'_>, values: &V) -> Option<Progress>
where
    V: CapturedValues + ?Sized,
{
    match scope {
        Scope::Global => Some(progress(steps, values)),
        Scope::Step(step) => steps.step(step).map(|g| step_progress(g, values)),
        Scope::Group { step, group } => steps.group(step, group).map(|g| group_progress(g, values)),
        Scope::Requirement { step, group, key } => steps
            .requirement(step, group, key)
            .map(|r| requirement_progress(r, values).progress),
    }
}

/// Group entry of a [`ProgressReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    /// Group coverage
    pub progress: Progress,
    /// Per-requirement coverage in registration order
    pub requirements: IndexMap<String, RequirementProgress>,
}

/// Step entry of a [`ProgressReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Step coverage
    pub progress: Progress,
    /// Per-group coverage in first-seen order
    pub groups: IndexMap<String, GroupReport>,
}

/// Progress at every scope of a hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProgressReport {
    /// Whole-hierarchy coverage
    pub global: Progress,
    /// Per-step coverage
    pub steps: IndexMap<String, StepReport>,
}

impl ProgressReport {
    /// Compute every scope from the current captured values
    pub fn compute<V>(steps: &StepGroups, values: &V) -> Self
    where
        V: CapturedValues + ?Sized,
    {
        let report = Self {
            global: progress(steps, values),
            steps: steps
                .steps()
                .map(|(name, groups)| (name.to_string(), step_report(groups, values)))
                .collect(),
        };

        tracing::debug!(
            total = report.global.total,
            with_evidence = report.global.with_evidence,
            percent = report.global.percent,
            complete = report.complete_count(),
            "computed progress"
        );
        report
    }

    /// One step's entry
    #[must_use]
    pub fn step(&self, step: &str) -> Option<&StepReport> {
        self.steps.get(step)
    }

    /// One group's entry
    #[must_use]
    pub fn group(&self, step: &str, group: &str) -> Option<&GroupReport> {
        self.step(step)?.groups.get(group)
    }

    /// One requirement's entry
    #[must_use]
    pub fn requirement(&self, step: &str, group: &str, key: &str) -> Option<&RequirementProgress> {
        self.group(step, group)?.requirements.get(key)
    }

    /// Every requirement entry
    pub fn requirements(&self) -> impl Iterator<Item = &RequirementProgress> {
        self.steps
            .values()
            .flat_map(|s| s.groups.values())
            .flat_map(|g| g.requirements.values())
    }

    /// Number of complete requirements
    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.requirements().filter(|r| r.complete).count()
    }
}

fn step_report<V>(groups: &GroupMap, values: &V) -> StepReport
where
    V: CapturedValues + ?Sized,
{
    StepReport {
        progress: step_progress(groups, values),
        groups: groups
            .iter()
            .map(|(name, group)| {
                let report = GroupReport {
                    progress: group_progress(group, values),
                    requirements: group
                        .requirements()
                        .map(|(key, r)| (key.to_string(), requirement_progress(r, values)))
                        .collect(),
                };
                (name.clone(), report)
            })
            .collect(),
    }
}
