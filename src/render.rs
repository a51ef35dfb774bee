// Console rendering.
// Turns reports and raw events into the text printed by the CLI.

use crate::feed::Report;
use crate::github::RawEvent;

pub fn not_found_message(identity: &str) -> String {
    format!("User '{}' not found on GitHub.", identity)
}

pub fn no_activity_message(identity: &str) -> String {
    format!("No recent public activity for {}.", identity)
}

pub fn stale_notice(reason: &str) -> String {
    format!("Warning: showing cached activity, live fetch failed ({})", reason)
}

/// Render an aggregated report, one block per action.
pub fn render_report(identity: &str, report: &Report) -> String {
    if report.is_empty() {
        return format!("{}\n", no_activity_message(identity));
    }

    let mut out = format!("Recent activity for {}:\n", identity);
    for summary in &report.actions {
        out.push_str(&format!("{} ({})\n", summary.action, summary.total_events));
        for repo in &summary.repos {
            out.push_str(&format!("  - {} ({})\n", repo.repo, repo.count));
        }
    }
    out
}

/// Render events one per line in arrival order.
pub fn render_raw(identity: &str, events: &[RawEvent]) -> String {
    if events.is_empty() {
        return format!("{}\n", no_activity_message(identity));
    }

    events
        .iter()
        .map(|event| format!("- {} in {}\n", event.event_type, event.repo_name()))
        .collect()
}
