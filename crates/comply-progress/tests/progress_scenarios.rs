use comply_graph::{ComplianceGraph, GraphBuilder};
use comply_progress::{
    group_progress, percent_of, progress, progress_at, Progress, ProgressReport, Scope,
};
use comply_schema::{NoValues, ValueStore};
use comply_test_utils::{sample_schema, sample_values, single_step_schema, Fixture};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const RISK: &str = "Article 21 - Risk management";
const REPORTING: &str = "Article 23 - Reporting";

fn sample_graph(values: &ValueStore) -> ComplianceGraph {
    GraphBuilder::new().build(&sample_schema(), values).unwrap()
}

#[test]
fn sample_report_at_every_scope() {
    let values = sample_values();
    let report = ProgressReport::compute(&sample_graph(&values).steps, &values);

    assert_eq!(report.global, Progress::new(4, 3));
    assert_eq!(report.global.percent, 75);

    let risk = report.step(RISK).unwrap();
    assert_eq!(risk.progress, Progress::new(3, 2));
    assert_eq!(risk.progress.percent, 67);

    let governance = report.group(RISK, "Governance").unwrap();
    assert_eq!(governance.progress.percent, 50);

    let a = report.requirement(RISK, "Governance", "21.2(a)").unwrap();
    assert_eq!(a.progress, Progress::new(2, 1));
    assert!(!a.complete);

    // Not Applicable: nothing linked, vacuously 100 but never complete
    let b = report.requirement(RISK, "Governance", "21.2(b)").unwrap();
    assert_eq!(b.progress.percent, 100);
    assert!(!b.complete);

    assert!(report.requirement(RISK, "Incident handling", "21.2(c)").unwrap().complete);
    assert!(report.requirement(REPORTING, "Reporting", "23.1").unwrap().complete);
    assert_eq!(report.complete_count(), 2);
}

#[test]
fn shared_implementation_counts_once() {
    let mut values = sample_values();
    values.set_status("21.2(b)", "Applicable");
    let graph = sample_graph(&values);

    // plan-1 now backs both 21.2(a) and 21.2(b)
    let governance = graph.steps.group(RISK, "Governance").unwrap();
    assert_eq!(group_progress(governance, &values), Progress::new(2, 1));
    assert_eq!(progress(&graph.steps, &values), Progress::new(4, 3));
}

#[test]
fn three_implementations_two_with_evidence() {
    let mut fx = Fixture::new();
    let r1 = fx.requirement("R1");
    let group = fx.group("G", vec![r1]);
    let i1 = fx.implementation("i1", "risk", "R1");
    let i2 = fx.implementation("i2", "plan", "R1");
    let i3 = fx.implementation("i3", "test", "R1");
    let schema = single_step_schema("Article 1", vec![group, i1, i2, i3]);

    let values = ValueStore::new()
        .with_status("R1", "Applicable")
        .with_evidence("i1", "doc")
        .with_evidence("i2", "ticket")
        .with_evidence("i3", "   ");
    let graph = GraphBuilder::new().build(&schema, &values).unwrap();
    let report = ProgressReport::compute(&graph.steps, &values);

    let r1 = report.requirement("Article 1", "G", "R1").unwrap();
    assert!(!r1.complete);
    assert_eq!(r1.progress, Progress::new(3, 2));
    assert_eq!(report.group("Article 1", "G").unwrap().progress, Progress::new(3, 2));
    assert_eq!(report.global, Progress::new(3, 2));
}

#[test]
fn separate_groups_match_their_requirement() {
    let mut fx = Fixture::new();
    let r1 = fx.requirement("R1");
    let a = fx.group("A", vec![r1]);
    let r2 = fx.requirement("R2");
    let b = fx.group("B", vec![r2]);
    let i1 = fx.implementation("i1", "risk", "R1");
    let i2 = fx.implementation("i2", "risk", "R2");
    let i3 = fx.implementation("i3", "risk", "R2");
    let schema = single_step_schema("Article 1", vec![a, b, i1, i2, i3]);

    let values = ValueStore::new()
        .with_status("R1", "Applicable")
        .with_status("R2", "Applicable")
        .with_evidence("i2", "x");
    let graph = GraphBuilder::new().build(&schema, &values).unwrap();
    let report = ProgressReport::compute(&graph.steps, &values);

    for (group, key) in [("A", "R1"), ("B", "R2")] {
        assert_eq!(
            report.group("Article 1", group).unwrap().progress,
            report.requirement("Article 1", group, key).unwrap().progress
        );
    }
}

#[test]
fn empty_graph_is_vacuously_complete() {
    let graph = GraphBuilder::new().build(&sample_schema(), &NoValues).unwrap();
    let report = ProgressReport::compute(&graph.steps, &NoValues);
    assert_eq!(report.global.percent, 100);
    assert_eq!(report.complete_count(), 0);
}

#[test]
fn progress_at_scopes() {
    let values = sample_values();
    let graph = sample_graph(&values);
    let steps = &graph.steps;

    assert_eq!(progress_at(steps, Scope::Global, &values), Some(Progress::new(4, 3)));
    assert_eq!(progress_at(steps, Scope::Step(REPORTING), &values), Some(Progress::new(1, 1)));
    assert_eq!(
        progress_at(steps, Scope::Group { step: RISK, group: "Incident handling" }, &values),
        Some(Progress::new(1, 1))
    );
    assert_eq!(
        progress_at(
            steps,
            Scope::Requirement { step: RISK, group: "Governance", key: "21.2(a)" },
            &values
        ),
        Some(Progress::new(2, 1))
    );
    assert_eq!(progress_at(steps, Scope::Step("Introduction"), &values), None);
}

#[test]
fn evidence_read_on_every_compute() {
    let mut values = sample_values();
    let graph = sample_graph(&values);

    values.set_evidence("plan-1", "review notes");
    let report = ProgressReport::compute(&graph.steps, &values);
    assert_eq!(report.global, Progress::new(4, 4));
    assert!(report.requirement(RISK, "Governance", "21.2(a)").unwrap().complete);
}

#[test]
fn report_serializes_in_order() {
    let values = sample_values();
    let report = ProgressReport::compute(&sample_graph(&values).steps, &values);
    let json = serde_json::to_value(&report).unwrap();

    let steps: Vec<_> = json["steps"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(steps, vec![RISK, REPORTING]);
    assert_eq!(json["global"]["withEvidence"], 3);
}

proptest! {
    #[test]
    fn prop_percent_bounded(total in 0usize..10_000, part in 0usize..10_000) {
        let p = Progress::new(total, part);
        prop_assert!(p.percent <= 100);
        prop_assert!(p.with_evidence <= p.total);
    }

    #[test]
    fn prop_zero_total_is_full(part in 0usize..100) {
        prop_assert_eq!(percent_of(part, 0), 100);
    }

    #[test]
    fn prop_extremes(total in 1usize..10_000) {
        prop_assert_eq!(percent_of(0, total), 0);
        prop_assert_eq!(percent_of(total, total), 100);
    }

    #[test]
    fn prop_percent_monotone(total in 1usize..1_000, part in 0usize..1_000) {
        let part = part.min(total - 1);
        prop_assert!(percent_of(part, total) <= percent_of(part + 1, total));
    }
}
