//! Summary counts over structured log entries

use std::collections::{BTreeMap, BTreeSet};

use backend_api::models::LogEntry;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::Serialize;

/// Counts derived from the entries currently shown
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogStats {
    pub total: usize,
    pub failed_logins: usize,
    pub successful_logins: usize,
    pub commands: usize,
    pub connections: usize,
    pub errors: usize,
    pub warnings: usize,
    pub unique_ips: usize,
    pub unique_users: usize,
    pub unique_paths: usize,
    /// Entries stamped within the hour before `now`
    pub last_hour: usize,
    pub top_ip: Option<String>,
    pub top_path: Option<String>,
    pub top_method: Option<String>,
    /// Requests probing admin panels, traversal or SQL endpoints
    pub suspicious_requests: usize,
    /// Share of info/debug entries, in percent
    pub success_rate: f64,
    /// Share of warning/error entries, in percent
    pub failure_rate: f64,
}

const SUSPICIOUS_FRAGMENTS: [&str; 5] = ["admin", "wp-", "phpmyadmin", "..", "sql"];

fn event_is(entry: &LogEntry, names: &[&str]) -> bool {
    entry
        .event_type
        .as_deref()
        .is_some_and(|e| names.iter().any(|n| e.eq_ignore_ascii_case(n)))
}

fn level_is(entry: &LogEntry, names: &[&str]) -> bool {
    entry
        .level
        .as_deref()
        .is_some_and(|l| names.iter().any(|n| l.eq_ignore_ascii_case(n)))
}

fn is_suspicious(entry: &LogEntry) -> bool {
    let Some(path) = entry.path.as_deref().map(str::to_lowercase) else {
        return false;
    };
    let login_post = entry
        .method
        .as_deref()
        .is_some_and(|m| m.eq_ignore_ascii_case("POST"))
        && path.contains("login");
    login_post || SUSPICIOUS_FRAGMENTS.iter().any(|f| path.contains(f))
}

/// Parse RFC 3339 stamps, or naive ones read as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Most frequent value; ties go to the smallest
fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, _)| value.to_string())
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

fn count(entries: &[&LogEntry], pred: impl Fn(&LogEntry) -> bool) -> usize {
    entries.iter().filter(|e| pred(**e)).count()
}

fn distinct<'a>(entries: &[&'a LogEntry], field: impl Fn(&'a LogEntry) -> Option<&'a str>) -> usize {
    entries
        .iter()
        .filter_map(|e| field(*e))
        .collect::<BTreeSet<_>>()
        .len()
}

impl LogStats {
    pub fn from_entries(entries: &[&LogEntry], now: DateTime<Utc>) -> Self {
        let total = entries.len();
        let hour_ago = now - TimeDelta::hours(1);
        let successes = count(entries, |e| level_is(e, &["info", "debug"]));
        let failures = count(entries, |e| level_is(e, &["warning", "warn", "error"]));

        Self {
            total,
            failed_logins: count(entries, |e| event_is(e, &["failed_login"])),
            successful_logins: count(entries, |e| event_is(e, &["successful_login", "login"])),
            commands: count(entries, |e| event_is(e, &["command", "command_executed"])),
            connections: count(entries, |e| event_is(e, &["connection"])),
            errors: count(entries, |e| level_is(e, &["error"])),
            warnings: count(entries, |e| level_is(e, &["warning", "warn"])),
            unique_ips: distinct(entries, |e| e.ip.as_deref()),
            unique_users: distinct(entries, |e| e.user.as_deref()),
            unique_paths: distinct(entries, |e| e.path.as_deref()),
            last_hour: count(entries, |e| {
                e.timestamp
                    .as_deref()
                    .and_then(parse_timestamp)
                    .is_some_and(|t| t > hour_ago)
            }),
            top_ip: most_common(entries.iter().filter_map(|e| e.ip.as_deref())),
            top_path: most_common(entries.iter().filter_map(|e| e.path.as_deref())),
            top_method: most_common(entries.iter().filter_map(|e| e.method.as_deref())),
            suspicious_requests: count(entries, is_suspicious),
            success_rate: percent(successes, total),
            failure_rate: percent(failures, total),
        }
    }

    /// Terminal summary lines; web fields only appear when paths were seen
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "{} entries, {} in the last hour, {} unique IPs, {} unique users",
                self.total, self.last_hour, self.unique_ips, self.unique_users
            ),
            format!(
                "logins: {} failed, {} successful; {} commands, {} connections",
                self.failed_logins, self.successful_logins, self.commands, self.connections
            ),
            format!(
                "success rate {:.1}%, failure rate {:.1}% ({} errors, {} warnings)",
                self.success_rate, self.failure_rate, self.errors, self.warnings
            ),
        ];
        if let Some(ip) = &self.top_ip {
            lines.push(format!("top IP: {}", ip));
        }
        if self.unique_paths > 0 {
            lines.push(format!(
                "top endpoint: {} ({}), {} unique endpoints, {} suspicious requests",
                self.top_path.as_deref().unwrap_or("N/A"),
                self.top_method.as_deref().unwrap_or("N/A"),
                self.unique_paths,
                self.suspicious_requests
            ));
        }
        lines
    }
}
