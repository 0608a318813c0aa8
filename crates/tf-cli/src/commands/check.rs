//! Day reconciliation report (`-c`).

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use tf_core::{CheckReport, Finding, Statistics, Universe, plural};

use super::ReportOptions;
use super::util::format_day;

fn format_finding(finding: &Finding) -> String {
    let day = format_day(finding.date());
    match *finding {
        Finding::Unbalanced {
            worked,
            booked,
            delta,
            ..
        } => format!("{day}: worked {worked:5.2}, allocated {booked:5.2}, delta {delta:5.2}"),
        Finding::ExcessSick { sick, required, .. } => format!(
            "{day}: more sick time ({sick:?}) taken than required working time ({required:?})."
        ),
        Finding::ExcessLeave {
            leave, required, ..
        } => format!(
            "{day}: more leave time ({leave:?}) taken than required working time ({required:?})."
        ),
        Finding::ExcessLeaveAndSick {
            total, required, ..
        } => format!(
            "{day}: more leave and sick time ({total:?}) taken than required working time \
             ({required:?})."
        ),
    }
}

/// Formats findings one per line, followed by a verdict.
pub fn format_check(report: &CheckReport) -> String {
    let mut output = String::new();
    for finding in &report.findings {
        writeln!(output, "{}", format_finding(finding)).unwrap();
    }

    if report.is_ok() {
        writeln!(output, "ok.").unwrap();
    } else {
        writeln!(output, "{} detected.", plural(report.problems(), "problem")).unwrap();
    }
    output
}

/// Runs the day check.
pub fn run<W: Write>(writer: &mut W, universe: &Universe, options: &ReportOptions) -> Result<()> {
    let spec = &options.filter;
    let report = Statistics::new(universe).check_days(&spec.filter);

    if options.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(writer, "Day check ({}):", spec.label)?;
        write!(writer, "{}", format_check(&report))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::commands::test_support::{SAMPLE, options, universe};

    fn output(contents: &str, options: &ReportOptions) -> String {
        let universe = universe(contents);
        let mut output = Vec::new();
        run(&mut output, &universe, options).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_balanced_log_is_ok() {
        assert_snapshot!(output(SAMPLE, &options("all")), @r"
Day check (all):
ok.
");
    }

    #[test]
    fn test_reports_problems() {
        let contents = "\
wp p

day 2012-07-02 8 17
- p 7.5
day 2012-07-03, sick 5, leave 4
day 2012-07-07, leave 2
day 2012-07-10, sick
";
        assert_snapshot!(output(contents, &options("2012-07")), @r"
Day check (2012-07):
2012-07-02 Mon: worked  9.00, allocated  7.50, delta -1.50
2012-07-03 Tue: more leave and sick time (9.0) taken than required working time (8.0).
2012-07-07 Sat: more leave time (2.0) taken than required working time (0.0).
3 problems detected.
");
    }

    #[test]
    fn test_json_output() {
        let mut options = options("all");
        options.json = true;
        let json: serde_json::Value =
            serde_json::from_str(&output("day 2012-07-02 8 9\n", &options)).unwrap();

        let finding = &json["findings"][0];
        assert_eq!(finding["kind"], "unbalanced");
        assert_eq!(finding["date"], "2012-07-02");
        assert_eq!(finding["delta"], -1.0);
    }
}
