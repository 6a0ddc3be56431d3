//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::walk::{SkipReason, WalkReport};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of processed files followed by a one-line skip summary.
pub fn print_walk_summary(report: &WalkReport, delete_requested: bool) {
    if report.processed.is_empty() {
        info("No files were processed.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Input", "Output", "Source"]);

        for p in &report.processed {
            let source = if p.source_removed {
                "deleted"
            } else {
                "kept"
            };
            table.add_row(vec![
                p.input.display().to_string(),
                p.output.display().to_string(),
                source.to_string(),
            ]);
        }

        println!("{table}");
    }

    for path in report.replaced_outputs() {
        warning(&format!("Overwrote existing file: {}", path.display()));
    }

    if delete_requested {
        for path in report.retained_sources() {
            warning(&format!(
                "Could not delete original file: {}",
                path.display()
            ));
        }
    }

    let count = |reason: SkipReason| report.skipped.iter().filter(|(_, r)| *r == reason).count();
    let already = count(SkipReason::AlreadyDone);
    let special = count(SkipReason::NotRegular);
    if already + special > 0 {
        tip(&format!(
            "Skipped {already} already-processed and {special} non-regular entries."
        ));
    }
}
