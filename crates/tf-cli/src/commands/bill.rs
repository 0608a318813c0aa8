//! Bill of materials (`-b`): every file read, indented by import depth.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use tf_core::{InputFile, Universe, plural};

use super::ReportOptions;

/// Formats the input file list and a count line.
pub fn format_bill(files: &[InputFile], indent: usize) -> String {
    let mut output = String::new();
    for file in files {
        let indent = " ".repeat(file.depth * indent);
        writeln!(output, "{indent}{}", file.path).unwrap();
    }
    writeln!(output, "{} processed.", plural(files.len(), "file")).unwrap();
    output
}

/// Runs the bill of materials.
pub fn run<W: Write>(writer: &mut W, universe: &Universe, options: &ReportOptions) -> Result<()> {
    writeln!(writer, "Bill of materials:")?;
    write!(writer, "{}", format_bill(universe.input_files(), options.indent))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn file(path: &str, depth: usize) -> InputFile {
        InputFile {
            path: path.to_string(),
            depth,
        }
    }

    #[test]
    fn test_bill_indents_imports() {
        let files = [
            file("work.fly", 0),
            file("./projects.fly", 1),
            file("./projects/alpha.fly", 2),
            file("holidays.fly", 0),
        ];
        assert_snapshot!(format_bill(&files, 2), @r"
work.fly
  ./projects.fly
    ./projects/alpha.fly
holidays.fly
4 files processed.
");
    }

    #[test]
    fn test_empty_bill() {
        assert_eq!(format_bill(&[], 4), "no files processed.\n");
    }
}
