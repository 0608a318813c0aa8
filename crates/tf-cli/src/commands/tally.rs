//! Work hour balance report (`-t`).

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use tf_core::{BalanceReport, BalanceRow, DayRow, Statistics, Tally, Universe};

use super::ReportOptions;
use super::util::{day_header, format_day, format_hours};

/// Indentation of day comments below their day row.
const COMMENT_PREFIX: &str = "              ; ";

fn format_day_row(output: &mut String, row: &DayRow, comments: bool) {
    let notes = if row.notes.is_empty() {
        String::new()
    } else {
        format!(" {}", row.notes.join("; "))
    };
    writeln!(
        output,
        "{}: {} {} {} {}{notes}",
        format_day(row.date),
        format_hours(row.worked),
        format_hours(row.leave),
        format_hours(row.sick),
        format_hours(row.balance),
    )
    .unwrap();

    if comments {
        for comment in &row.comments {
            writeln!(output, "{COMMENT_PREFIX}{comment}").unwrap();
        }
    }
}

fn format_period(output: &mut String, name: &str, tally: &Tally) {
    writeln!(
        output,
        "{name:>14}: {} {} {} {}",
        format_hours(tally.worked),
        format_hours(tally.leave_taken),
        format_hours(tally.sick),
        format_hours(tally.balance),
    )
    .unwrap();
}

/// Formats a balance report between two column headers.
pub fn format_balance(report: &BalanceReport, comments: bool) -> String {
    let mut output = String::new();
    writeln!(output, "{}", day_header()).unwrap();

    for row in &report.rows {
        match row {
            BalanceRow::MissingWeekday { date } => {
                writeln!(output, "missing weekday record for {date}").unwrap();
            }
            BalanceRow::Day(day) => format_day_row(&mut output, day, comments),
            BalanceRow::Period {
                scope,
                label,
                tally,
            } => {
                let name = match label {
                    Some(label) => format!("{} {label}", scope.as_str()),
                    None => scope.as_str().to_string(),
                };
                format_period(&mut output, &name, tally);
            }
        }
    }

    writeln!(output, "{}", day_header()).unwrap();
    output
}

/// Runs the balance report.
pub fn run<W: Write>(writer: &mut W, universe: &Universe, options: &ReportOptions) -> Result<()> {
    let spec = &options.filter;
    let report = Statistics::new(universe).calc_balance(&spec.filter, spec.balance);

    if options.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(writer, "Time at work overview ({}):", spec.label)?;
        write!(writer, "{}", format_balance(&report, options.comments))?;
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
    fn test_balance_report() {
        assert_snapshot!(output(SAMPLE, &options("all")), @r"
Time at work overview (all):
     when        worked   leave    sick balance
2012-07-02 Mon:    8.00 ----.-- ----.-- ----.-- lunch
missing weekday record for 2012-07-03
2012-07-04 Wed:    4.00 ----.-- ----.--   -4.00
missing weekday record for 2012-07-05
missing weekday record for 2012-07-06
2012-07-07 Sat:    2.00 ----.-- ----.--    2.00
  week 2012-27:   14.00 ----.-- ----.--   -2.00
2012-07-09 Mon: ----.--    8.00 ----.-- ----.-- vacation
  week 2012-28: ----.--    8.00 ----.-- ----.--
 month 2012-07:   14.00    8.00 ----.--   -2.00
         total:   14.00    8.00 ----.--   -2.00
     when        worked   leave    sick balance
");
    }

    #[test]
    fn test_monthly_rows_with_comments() {
        let mut options = options("2012-07,month,day");
        options.comments = true;
        assert_snapshot!(output(SAMPLE, &options), @r"
Time at work overview (2012-07, month, day):
     when        worked   leave    sick balance
2012-07-02 Mon:    8.00 ----.-- ----.-- ----.-- lunch
              ; productive
missing weekday record for 2012-07-03
2012-07-04 Wed:    4.00 ----.-- ----.--   -4.00
missing weekday record for 2012-07-05
missing weekday record for 2012-07-06
2012-07-07 Sat:    2.00 ----.-- ----.--    2.00
2012-07-09 Mon: ----.--    8.00 ----.-- ----.-- vacation
 month 2012-07:   14.00    8.00 ----.--   -2.00
         total:   14.00    8.00 ----.--   -2.00
     when        worked   leave    sick balance
");
    }

    #[test]
    fn test_reset_rows() {
        let contents = "day 2012-07-02 8 16\nday 2012-07-03 8 17, reset\n";
        let text = output(contents, &options("week"));
        assert!(text.contains("    week reset:    8.00 ----.-- ----.-- ----.--\n"));
        assert!(text.contains("   total reset:    8.00 ----.-- ----.-- ----.--\n"));
        assert!(text.contains("         total:    9.00 ----.-- ----.--    1.00\n"));
    }

    #[test]
    fn test_json_output() {
        let mut options = options("2012-07-09..2012-07-09");
        options.json = true;
        let json: serde_json::Value = serde_json::from_str(&output(SAMPLE, &options)).unwrap();

        assert_eq!(json["filter"]["kind"], "range");
        let rows = json["rows"].as_array().unwrap();
        assert_eq!(rows[0]["kind"], "day");
        assert_eq!(rows[0]["leave"], 8.0);
        assert_eq!(rows[0]["notes"][0], "vacation");
        assert_eq!(rows.last().unwrap()["scope"], "total");
        assert_eq!(rows.last().unwrap()["tally"]["balance"], 0.0);
    }
}
