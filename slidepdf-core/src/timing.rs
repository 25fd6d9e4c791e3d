//! Elapsed-time bookkeeping: the per-navigation timing log and the shutdown
//! report it turns into. Timestamps are whole seconds since the Unix epoch.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock seconds, injectable so timing tests are
/// deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingEntry {
    pub page: usize,
    pub at: u64,
}

/// Pages visited while the timer was engaged. Either empty (timer never
/// started) or seeded with the page that was current when timing began.
#[derive(Debug, Default)]
pub struct TimingLog {
    entries: Vec<TimingEntry>,
}

impl TimingLog {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TimingEntry] {
        &self.entries
    }

    /// Seconds at which timing started, if it ever did.
    pub fn started_at(&self) -> Option<u64> {
        self.entries.first().map(|entry| entry.at)
    }

    /// Clears the log and seeds it with the current page.
    pub fn reset(&mut self, page: usize, now: u64) {
        self.entries.clear();
        self.entries.push(TimingEntry { page, at: now });
    }

    /// Appends a navigation transition; a no-op until the log is seeded.
    pub fn record(&mut self, page: usize, now: u64) {
        if !self.entries.is_empty() {
            self.entries.push(TimingEntry { page, at: now });
        }
    }

    /// Closes the log with `now` as the terminal sentinel and produces the
    /// per-page report. `None` when the timer was never engaged.
    pub fn finish(&mut self, now: u64) -> Option<TimingReport> {
        if self.entries.is_empty() {
            return None;
        }
        let start = self.entries[0].at;
        let mut rows = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let leave_at = self
                .entries
                .get(index + 1)
                .map(|next| next.at)
                .unwrap_or(now);
            rows.push(ReportRow {
                page: entry.page,
                duration: leave_at.saturating_sub(entry.at),
                enter: entry.at.saturating_sub(start),
                leave: leave_at.saturating_sub(start),
            });
        }
        Some(TimingReport { rows })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRow {
    /// Zero-based page index; displayed one-based.
    pub page: usize,
    pub duration: u64,
    pub enter: u64,
    pub leave: u64,
}

/// Fixed-width `page duration enter leave` table, one row per transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingReport {
    rows: Vec<ReportRow>,
}

impl TimingReport {
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }
}

/// `seconds` rendered as `minutes:seconds`, seconds zero-padded, minutes
/// right-aligned to five columns so the whole field is eight wide.
pub fn format_minutes(seconds: u64) -> String {
    format!("{:>5}:{:02}", seconds / 60, seconds % 60)
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>8} {:>8} {:>8} {:>8}",
            "page", "duration", "enter", "leave"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>8} {} {} {}",
                row.page + 1,
                format_minutes(row.duration),
                format_minutes(row.enter),
                format_minutes(row.leave)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_ignored_until_seeded() {
        let mut log = TimingLog::default();
        log.record(3, 100);
        assert!(log.is_empty());

        log.reset(0, 100);
        log.record(1, 130);
        assert_eq!(log.len(), 2);
        assert_eq!(log.started_at(), Some(100));
    }

    #[test]
    fn finish_returns_none_without_entries() {
        let mut log = TimingLog::default();
        assert!(log.finish(42).is_none());
    }

    #[test]
    fn finish_computes_durations_relative_to_start() {
        let mut log = TimingLog::default();
        log.reset(0, 1000);
        log.record(1, 1030);
        log.record(2, 1100);

        let report = log.finish(1165).unwrap();
        assert_eq!(
            report.rows(),
            &[
                ReportRow {
                    page: 0,
                    duration: 30,
                    enter: 0,
                    leave: 30
                },
                ReportRow {
                    page: 1,
                    duration: 70,
                    enter: 30,
                    leave: 100
                },
                ReportRow {
                    page: 2,
                    duration: 65,
                    enter: 100,
                    leave: 165
                },
            ]
        );
    }

    #[test]
    fn report_formats_fixed_width_columns() {
        let mut log = TimingLog::default();
        log.reset(4, 0);
        let report = log.finish(65).unwrap();
        let text = report.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("    page duration    enter    leave"));
        assert_eq!(lines.next(), Some("       5     1:05     0:00     1:05"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn minutes_are_zero_padded_on_seconds_only() {
        assert_eq!(format_minutes(5), "    0:05");
        assert_eq!(format_minutes(65), "    1:05");
        assert_eq!(format_minutes(600), "   10:00");
    }

    #[test]
    fn round_trips_through_the_profile_parser() {
        let mut log = TimingLog::default();
        log.reset(0, 0);
        log.record(1, 30);
        log.record(2, 50);
        let report = log.finish(65).unwrap();

        let profile = crate::profile::PresentationProfile::parse(&report.to_string()).unwrap();
        assert_eq!(profile.expected(0), Some(30));
        assert_eq!(profile.expected(1), Some(50));
        assert_eq!(profile.expected(2), Some(65));
    }
}
