//! Single-pass aggregation of access-log lines
//!
//! Converts a line source into two ranked frequency tables (requests per
//! client address, requests per hour-of-day) plus a total request count.
//!
//! Global invariants enforced:
//! - Every well-formed line increments exactly one entry in each table
//!   and the total, exactly once
//! - All counter state is local to one call; nothing survives between
//!   invocations

use crate::parser;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Request count for one client address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AddressCount {
    pub address: String,
    pub requests: u64,
}

/// Request count for one hour-of-day label ("00".."23")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct HourCount {
    pub hour: String,
    pub requests: u64,
}

/// Complete result of one aggregation pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TrafficSummary {
    /// Client addresses by request count, descending, at most N entries.
    /// Ties keep first-seen order.
    pub top_addresses: Vec<AddressCount>,
    /// Observed hours ascending by label; unseen hours are not zero-filled
    pub hours: Vec<HourCount>,
    pub total_requests: u64,
}

impl TrafficSummary {
    /// The "no data" summary rendered when the source is absent
    pub fn empty() -> Self {
        TrafficSummary {
            top_addresses: Vec::new(),
            hours: Vec::new(),
            total_requests: 0,
        }
    }
}

/// Aggregate lines from any fallible line source.
///
/// Lines that fail to parse are skipped and do not count toward the
/// total. Read errors abort the pass and propagate, so a half-read log is
/// never mistaken for a quiet one.
pub fn aggregate_lines<I>(lines: I, top_n: usize) -> Result<TrafficSummary>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    // (count, first-seen rank); the rank is the documented tie-break
    let mut address_counts: HashMap<String, (u64, usize)> = HashMap::new();
    let mut hour_counts: HashMap<String, u64> = HashMap::new();
    let mut total_requests = 0u64;

    for line in lines {
        let line = line.context("failed to read log line")?;
        let Some(parsed) = parser::parse_line(&line) else {
            continue;
        };

        let next_rank = address_counts.len();
        let entry = address_counts
            .entry(parsed.address.to_string())
            .or_insert((0, next_rank));
        entry.0 += 1;
        *hour_counts.entry(parsed.hour.to_string()).or_insert(0) += 1;
        total_requests += 1;
    }

    let mut ranked: Vec<(String, u64, usize)> = address_counts
        .into_iter()
        .map(|(address, (requests, rank))| (address, requests, rank))
        .collect();
    // Count descending, then first-seen ascending
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
    ranked.truncate(top_n);

    let mut hours: Vec<HourCount> = hour_counts
        .into_iter()
        .map(|(hour, requests)| HourCount { hour, requests })
        .collect();
    // Labels are fixed-width numeric strings, so lexicographic equals numeric order
    hours.sort_by(|a, b| a.hour.cmp(&b.hour));

    Ok(TrafficSummary {
        top_addresses: ranked
            .into_iter()
            .map(|(address, requests, _)| AddressCount { address, requests })
            .collect(),
        hours,
        total_requests,
    })
}

/// Aggregate the log file at `path`.
///
/// A file that does not exist or cannot be opened is the "no data" case
/// and yields the empty summary. Failures while reading an opened file
/// (I/O errors, invalid UTF-8) propagate.
pub fn aggregate_file(path: &Path, top_n: usize) -> Result<TrafficSummary> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return Ok(TrafficSummary::empty()),
    };

    let reader = BufReader::new(file);
    aggregate_lines(reader.lines(), top_n)
        .with_context(|| format!("failed to read log file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<io::Result<String>> {
        raw.iter().map(|l| Ok(l.to_string())).collect()
    }

    #[test]
    fn aggregates_addresses_hours_and_total() {
        let summary = aggregate_lines(
            lines(&[
                "1.1.1.1 - - [01/Jan/2024:05:00:00 +0000] GET",
                "1.1.1.1 - - [01/Jan/2024:05:30:00 +0000] GET",
                "2.2.2.2 - - [01/Jan/2024:06:00:00 +0000] GET",
            ]),
            10,
        )
        .unwrap();

        assert_eq!(summary.total_requests, 3);
        assert_eq!(
            summary.top_addresses,
            vec![
                AddressCount {
                    address: "1.1.1.1".to_string(),
                    requests: 2
                },
                AddressCount {
                    address: "2.2.2.2".to_string(),
                    requests: 1
                },
            ]
        );
        assert_eq!(
            summary.hours,
            vec![
                HourCount {
                    hour: "05".to_string(),
                    requests: 2
                },
                HourCount {
                    hour: "06".to_string(),
                    requests: 1
                },
            ]
        );
    }

    #[test]
    fn malformed_line_changes_nothing() {
        let with_garbage = aggregate_lines(
            lines(&[
                "1.1.1.1 - - [01/Jan/2024:05:00:00 +0000] GET",
                "3.3.3.3 malformed request",
                "",
                "2.2.2.2 - - [01/Jan/2024:06:00:00 +0000] GET",
            ]),
            10,
        )
        .unwrap();

        assert_eq!(with_garbage.total_requests, 2);
        assert_eq!(with_garbage.top_addresses.len(), 2);
        assert_eq!(with_garbage.hours.len(), 2);
    }

    #[test]
    fn total_equals_sum_of_each_table() {
        let summary = aggregate_lines(
            lines(&[
                "1.1.1.1 - - [01/Jan/2024:05:00:00 +0000] GET",
                "2.2.2.2 - - [01/Jan/2024:05:10:00 +0000] GET",
                "1.1.1.1 - - [01/Jan/2024:07:00:00 +0000] GET",
                "not a log line at all",
            ]),
            10,
        )
        .unwrap();

        let address_sum: u64 = summary.top_addresses.iter().map(|e| e.requests).sum();
        let hour_sum: u64 = summary.hours.iter().map(|e| e.requests).sum();
        assert_eq!(summary.total_requests, 3);
        assert_eq!(address_sum, 3);
        assert_eq!(hour_sum, 3);
    }

    #[test]
    fn truncates_to_top_n() {
        let raw: Vec<String> = (0..15)
            .map(|i| format!("10.0.0.{} - - [01/Jan/2024:12:00:00 +0000] GET", i))
            .collect();
        let summary = aggregate_lines(raw.into_iter().map(Ok), 10).unwrap();

        assert_eq!(summary.top_addresses.len(), 10);
        assert_eq!(summary.total_requests, 15);
        // Truncation only trims the address view; the hour table is complete
        assert_eq!(summary.hours[0].requests, 15);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let summary = aggregate_lines(
            lines(&[
                "9.9.9.9 - - [01/Jan/2024:01:00:00 +0000] GET",
                "1.1.1.1 - - [01/Jan/2024:02:00:00 +0000] GET",
                "5.5.5.5 - - [01/Jan/2024:03:00:00 +0000] GET",
            ]),
            10,
        )
        .unwrap();

        let order: Vec<&str> = summary
            .top_addresses
            .iter()
            .map(|e| e.address.as_str())
            .collect();
        assert_eq!(order, vec!["9.9.9.9", "1.1.1.1", "5.5.5.5"]);
    }

    #[test]
    fn higher_count_outranks_earlier_first_seen() {
        let summary = aggregate_lines(
            lines(&[
                "9.9.9.9 - - [01/Jan/2024:01:00:00 +0000] GET",
                "1.1.1.1 - - [01/Jan/2024:02:00:00 +0000] GET",
                "1.1.1.1 - - [01/Jan/2024:02:05:00 +0000] GET",
            ]),
            10,
        )
        .unwrap();

        assert_eq!(summary.top_addresses[0].address, "1.1.1.1");
        assert_eq!(summary.top_addresses[0].requests, 2);
    }

    #[test]
    fn hours_are_sorted_ascending_without_duplicates() {
        let summary = aggregate_lines(
            lines(&[
                "1.1.1.1 - - [01/Jan/2024:23:00:00 +0000] GET",
                "1.1.1.1 - - [01/Jan/2024:00:30:00 +0000] GET",
                "1.1.1.1 - - [01/Jan/2024:23:40:00 +0000] GET",
                "1.1.1.1 - - [01/Jan/2024:07:00:00 +0000] GET",
            ]),
            10,
        )
        .unwrap();

        let labels: Vec<&str> = summary.hours.iter().map(|e| e.hour.as_str()).collect();
        assert_eq!(labels, vec!["00", "07", "23"]);
        assert!(labels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_source_yields_empty_summary() {
        let summary = aggregate_lines(Vec::new(), 10).unwrap();
        assert_eq!(summary, TrafficSummary::empty());
    }

    #[test]
    fn read_error_aborts_the_pass() {
        let source = vec![
            Ok("1.1.1.1 - - [01/Jan/2024:05:00:00 +0000] GET".to_string()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad byte")),
        ];
        assert!(aggregate_lines(source, 10).is_err());
    }

    #[test]
    fn missing_file_yields_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = aggregate_file(&dir.path().join("absent.log"), 10).unwrap();
        assert_eq!(summary, TrafficSummary::empty());
    }
}
