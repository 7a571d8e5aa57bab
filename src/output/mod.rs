//! Console output for plans and run summaries
//!
//! Plan lines are the product in dry-run mode and go to stdout; run
//! diagnostics stay on the tracing subscriber.

use crate::domain::model::CopyReport;

/// Print the ordered plan, one `<action> <src> -> <dst>` line per
/// operation, followed by a totals line.
pub fn print_plan(report: &CopyReport) {
    for op in &report.ops {
        println!("{op}");
    }
    println!(
        "planned {} folder create(s) and {} file copy(ies); nothing was executed",
        report.folders_created, report.files_copied
    );
}

/// Print the end-of-run summary for a live copy
pub fn print_summary(report: &CopyReport) {
    match &report.root_id {
        Some(root_id) => println!(
            "done: created {} folder(s) and copied {} file(s); new root folder id: {}",
            report.folders_created, report.files_copied, root_id
        ),
        None => println!(
            "done: created {} folder(s) and copied {} file(s)",
            report.folders_created, report.files_copied
        ),
    }
}
