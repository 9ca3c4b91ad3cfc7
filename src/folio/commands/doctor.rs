use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore>(store: &mut S) -> Result<CmdResult> {
    let report = store.doctor()?;
    let mut result = CmdResult::default();

    if report.removed_entries == 0 && report.adopted_files == 0 && report.missing_snapshots == 0 {
        result.add_message(CmdMessage::success("No inconsistencies found."));
        return Ok(result);
    }

    result.add_message(CmdMessage::warning("Inconsistencies found:"));
    if report.removed_entries > 0 {
        result.add_message(CmdMessage::info(format!(
            "  - Removed {} document(s) listed in the index but missing from disk.",
            report.removed_entries
        )));
    }
    if report.adopted_files > 0 {
        result.add_message(CmdMessage::success(format!(
            "  - Recovered {} document(s) found on disk but missing from the index.",
            report.adopted_files
        )));
    }
    if report.missing_snapshots > 0 {
        result.add_message(CmdMessage::error(format!(
            "  - {} archived snapshot(s) are missing and cannot be reconstructed.",
            report.missing_snapshots
        )));
    }

    Ok(result)
}
