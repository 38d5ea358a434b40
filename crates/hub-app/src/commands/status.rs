use std::fmt::Write;

use hub_bridge::ProjectBackend;
use hub_common::ProjectEntry;

/// Plain-text report of what the host currently publishes.
pub fn render_status(backend: &dyn ProjectBackend) -> String {
    let mut out = String::new();
    let version = backend.engine_version();
    let _ = writeln!(
        out,
        "Engine version: {}",
        version.as_deref().unwrap_or("unknown")
    );

    render_list(&mut out, "Recent projects", &backend.recent_projects());
    render_list(&mut out, "Templates", &backend.project_templates());
    out
}

fn render_list(out: &mut String, title: &str, entries: &[ProjectEntry]) {
    let _ = writeln!(out, "\n{title} ({}):", entries.len());
    if entries.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "  [{index}] {entry}");
    }
}
