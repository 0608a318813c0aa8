//! Work package reports: hours per package (`-w`) and the package tree (`-s`).

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use tf_core::{Activity, PackageId, Universe, ValueNode, calc_activity};

use super::ReportOptions;
use super::util::description_suffix;

/// Extra indentation of activities below a summary line.
const ACTIVITY_INDENT: &str = "          ";

fn format_activities<'a>(
    output: &mut String,
    activities: impl IntoIterator<Item = &'a Activity>,
    indent: &str,
) {
    for activity in activities {
        writeln!(
            output,
            "{indent}- {} {:?}{}",
            activity.date(),
            activity.duration,
            description_suffix(activity.description.as_deref()),
        )
        .unwrap();
    }
}

fn format_value_node(
    output: &mut String,
    node: &ValueNode<'_>,
    depth: usize,
    options: &ReportOptions,
) {
    let indent = " ".repeat(depth * options.indent);
    writeln!(
        output,
        "{indent}{:7.2} : {}{}",
        node.value,
        node.name,
        description_suffix(node.description),
    )
    .unwrap();

    if options.activities {
        let indent = format!("{ACTIVITY_INDENT}{indent}");
        format_activities(output, node.activities.iter().copied(), &indent);
    }
    for child in &node.children {
        format_value_node(output, child, depth + 1, options);
    }
}

/// Formats an activity roll-up tree, one node per line.
pub fn format_summary(tree: &ValueNode<'_>, options: &ReportOptions) -> String {
    let mut output = String::new();
    format_value_node(&mut output, tree, 0, options);
    output
}

fn format_package(
    output: &mut String,
    universe: &Universe,
    id: PackageId,
    depth: usize,
    options: &ReportOptions,
) {
    let package = universe.packages().get(id);
    let indent = " ".repeat(depth * options.indent);
    writeln!(
        output,
        "{indent}{}{}",
        package.name(),
        description_suffix(package.description.as_deref()),
    )
    .unwrap();

    if options.activities {
        format_activities(output, universe.activities(package.activity_ids()), &indent);
    }
    for &child in package.children() {
        format_package(output, universe, child, depth + 1, options);
    }
}

/// Formats the declared work package tree.
pub fn format_breakdown(universe: &Universe, options: &ReportOptions) -> String {
    let mut output = String::new();
    format_package(&mut output, universe, universe.packages().root(), 0, options);
    output
}

/// Runs the work package summary.
pub fn run_summary<W: Write>(
    writer: &mut W,
    universe: &Universe,
    options: &ReportOptions,
) -> Result<()> {
    let spec = &options.filter;
    let tree = calc_activity(universe, universe.packages().root(), &spec.filter);

    if options.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&tree)?)?;
    } else {
        writeln!(writer, "Work package summary ({}):", spec.label)?;
        write!(writer, "{}", format_summary(&tree, options))?;
    }
    Ok(())
}

/// Runs the work package breakdown.
pub fn run_breakdown<W: Write>(
    writer: &mut W,
    universe: &Universe,
    options: &ReportOptions,
) -> Result<()> {
    writeln!(writer, "Work package breakdown:")?;
    write!(writer, "{}", format_breakdown(universe, options))?;
    Ok(())
}
