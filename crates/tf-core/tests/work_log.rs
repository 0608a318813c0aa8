//! Reads the fixture work logs end to end and checks the derived reports.

use std::path::PathBuf;

use chrono::NaiveDate;
use tf_core::{
    BalanceOptions, DayFilter, Reader, SELF_NAME, Statistics, Universe, ValueNode, calc_activity,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Reads the given fixtures in order, returning the universe and all output.
fn read(names: &[&str]) -> (Universe, String) {
    let mut universe = Universe::new();
    let mut out = Vec::new();
    let mut reader = Reader::new(&mut universe, &mut out);
    for name in names {
        reader.read(fixture(name));
    }
    (universe, String::from_utf8(out).unwrap())
}

fn value(tree: &ValueNode<'_>, path: &str) -> f64 {
    tree.get_node(path)
        .unwrap_or_else(|| panic!("no node {path}"))
        .value
}

#[test]
fn test_simple_project_reads_cleanly() {
    let (universe, out) = read(&["simple-project-1.fly"]);
    assert_eq!(out, "");
    assert_eq!(universe.input_files().len(), 2);
    assert_eq!(universe.input_files()[1].depth, 1);

    let aa = universe.work_package("project.sub1.aa").unwrap();
    assert_eq!(universe.packages().get(aa).effort, 2.0);
    let project = universe.work_package("project").unwrap();
    assert_eq!(universe.packages().total_effort(project), 2.0 + 3.5 + 10.0 + 4.0);
}

#[test]
fn test_july_activity() {
    let (universe, _) = read(&["simple-project-1.fly"]);
    let july = "2012-07".parse().unwrap();
    let tree = calc_activity(&universe, universe.packages().root(), &july);

    assert_eq!(value(&tree, "project.sub1.aa"), 2.0);
    assert_eq!(value(&tree, "project.sub3"), 3.0);
    assert_eq!(value(&tree, "project.sub2"), 10.0);
    assert_eq!(value(&tree, &format!("project.sub2.{SELF_NAME}")), 1.0);
    assert!(tree.get_node("project.sub1.bb").is_none());
    assert_eq!(tree.value, 15.0);
}

#[test]
fn test_august_activity() {
    let (universe, _) = read(&["simple-project-1.fly"]);
    let august = "2012-08".parse().unwrap();
    let tree = calc_activity(&universe, universe.packages().root(), &august);

    assert_eq!(value(&tree, "project.sub1.aa"), 1.5);
    assert_eq!(value(&tree, "project.sub1"), 4.0);
    assert_eq!(value(&tree, "project.sub2"), 4.5);
    assert!(tree.get_node("project.sub3").is_none());
    assert!(tree.get_node(&format!("project.sub2.{SELF_NAME}")).is_none());
}

#[test]
fn test_activities_are_in_date_order() {
    let (universe, _) = read(&["simple-project-1.fly"]);
    let bbb = universe.work_package("project.sub2.bbb").unwrap();
    let first = universe
        .activities(universe.packages().get(bbb).activity_ids())
        .next()
        .unwrap();
    assert_eq!(first.date(), date("2012-07-14"));
    assert_eq!(first.description.as_deref(), Some("first go at bbb"));
}

#[test]
fn test_rereading_does_not_double_totals() {
    let (once, _) = read(&["simple-project-1.fly"]);
    let (twice, out) = read(&["simple-project-1.fly", "simple-project-1.fly"]);

    let total = |universe: &Universe| {
        calc_activity(universe, universe.packages().root(), &DayFilter::All).value
    };
    assert_eq!(total(&twice), total(&once));
    assert_eq!(twice.errors(), 0);
    assert!(twice.warnings() > 0);
    assert!(
        out.contains("WARNING : re-defining activity (this file has already been read before)")
    );
}

#[test]
fn test_import_loop_warns_exactly_once() {
    let (universe, out) = read(&["loop-a.fly"]);

    assert_eq!(universe.warnings(), 1);
    assert_eq!(universe.errors(), 0);
    assert_eq!(out.matches("already processed").count(), 1);
    assert!(out.ends_with("1 warning.\n"));

    let looping = universe.work_package("looping").unwrap();
    assert_eq!(universe.packages().get(looping).activity_ids().len(), 1);
}

#[test]
fn test_full_day_leave_resolves_to_required_hours() {
    let (universe, _) = read(&["simple-project-1.fly"]);
    let day = universe.day(date("2012-08-03")).unwrap();
    assert_eq!(day.leave().hours(), 8.0);
    assert_eq!(day.leave().comment(), Some("summer break"));
    assert_eq!(day.calc_balance(), 0.0);
}

#[test]
fn test_booked_time_matches_time_at_work() {
    let (universe, _) = read(&["simple-project-1.fly"]);
    let report = Statistics::new(&universe).check_days(&DayFilter::All);
    assert!(report.is_ok(), "{:?}", report.findings);
}

#[test]
fn test_july_balance() {
    let (universe, _) = read(&["simple-project-1.fly"]);
    let july = "2012-07".parse().unwrap();
    let report = Statistics::new(&universe).calc_balance(&july, BalanceOptions::default());
    let total = report.total().unwrap();

    // 2012-07-04 to 2012-07-13 holds eight weekdays without a record.
    assert_eq!(total.worked, 8.0 + 5.0 + 2.0);
    assert_eq!(total.must, 16.0 + 8.0 * 8.0);
    assert_eq!(total.have, 15.0);
    // Day balances only: 0 on 07-02, -3 on 07-03, +2 on Saturday 07-14.
    assert_eq!(total.balance, -1.0);
}
