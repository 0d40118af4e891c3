//! Report rendering - text and JSON output
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::aggregate::TrafficSummary;

/// Render a summary as aligned-column text output
pub fn render_text(summary: &TrafficSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("Total requests: {}\n", summary.total_requests));

    if !summary.top_addresses.is_empty() {
        output.push_str(&format!(
            "\nTop {} client addresses:\n",
            summary.top_addresses.len()
        ));
        output.push_str(&format!("{:<40} {}\n", "ADDRESS", "REQUESTS"));
        for entry in &summary.top_addresses {
            output.push_str(&format!(
                "{:<40} {}\n",
                truncate_or_pad(&entry.address, 40),
                entry.requests
            ));
        }
    }

    if !summary.hours.is_empty() {
        output.push_str("\nRequests by hour:\n");
        output.push_str(&format!("{:<6} {}\n", "HOUR", "REQUESTS"));
        for entry in &summary.hours {
            output.push_str(&format!("{:<6} {}\n", entry.hour, entry.requests));
        }
    }

    output
}

/// Render a summary as JSON output
pub fn render_json(summary: &TrafficSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.len() > width {
        format!("{}...", &s[..width.saturating_sub(3)])
    } else {
        format!("{:<width$}", s, width = width)
    }
}
