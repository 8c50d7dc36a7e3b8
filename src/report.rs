//! End-user text for run summaries and tool listings.

use crate::catalog::CatalogEntry;
use crate::install::Progress;
use crate::outcome::RunSummary;
use crate::status::InstallationState;
use crate::version::Version;
use std::fmt::Write;

pub fn progress_line(name: &str, progress: Progress) -> String {
    format!("[{}/{}] {name}", progress.position, progress.total)
}

/// One line per tool in processing order, then the totals
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    for (name, outcome) in summary.entries() {
        let _ = writeln!(out, "{name}: {outcome}");
    }

    let counts = summary.counts();
    let mut totals = vec![
        format!("{} installed", counts.installed),
        format!("{} reinstalled", counts.reinstalled),
        format!("{} removed", counts.removed),
        format!("{} skipped", counts.skipped),
        format!("{} failed", counts.failed),
    ];
    if counts.dry_run > 0 {
        totals.insert(0, format!("{} dry run", counts.dry_run));
    }
    let _ = writeln!(out, "Summary: {}", totals.join(", "));
    out
}

/// Catalog entry with its state; `None` when the entry failed validation
pub type ListRow<'a> = (&'a CatalogEntry, Option<InstallationState>);

/// `list` output: description, installed path/version and latest release
pub fn render_list(rows: &[ListRow<'_>]) -> String {
    let mut out = String::new();
    for (entry, state) in rows {
        match (&entry.definition, state) {
            (Err(err), _) => {
                let _ = writeln!(out, "{}  [{err}]", entry.name);
            }
            (Ok(def), Some(state)) => {
                let _ = writeln!(out, "{}  {}", entry.name, def.description);
                let installed = match &state.installed_path {
                    Some(path) => format!(
                        "{} ({})",
                        installed_version(state.installed_version.as_ref()),
                        path.display()
                    ),
                    None => "not installed".to_string(),
                };
                let _ = writeln!(out, "    installed: {installed}");
                let _ = writeln!(out, "    latest:    {}", latest(state));
            }
            (Ok(def), None) => {
                let _ = writeln!(out, "{}  {}", entry.name, def.description);
            }
        }
    }
    out
}

use crate::status::StatusRow;

/// `status` output: aligned installed-vs-latest columns
pub fn render_status(rows: &[StatusRow]) -> String {
    let width = rows
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max("TOOL".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:width$}  {:12}  {:12}", "TOOL", "INSTALLED", "LATEST");
    for (name, state) in rows {
        let state = match state {
            Ok(state) => state,
            Err(err) => {
                let _ = writeln!(out, "{name:width$}  [{err}]");
                continue;
            }
        };
        let installed = if state.is_installed() {
            installed_version(state.installed_version.as_ref())
        } else {
            "-".to_string()
        };
        let marker = if state.is_outdated() {
            "  update available"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{name:width$}  {installed:12}  {:12}{marker}",
            latest(state)
        );
    }
    out
}

fn installed_version(version: Option<&Version>) -> String {
    version.map_or_else(|| "unknown".to_string(), Version::to_string)
}

fn latest(state: &InstallationState) -> String {
    match &state.latest {
        Ok(version) => version.to_string(),
        Err(err) => format!("? ({err})"),
    }
}
