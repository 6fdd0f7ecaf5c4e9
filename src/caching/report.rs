//! Caching summary report
//!
//! Rendering is split from printing so the report content is testable.
//! A listener with no entries renders nothing at all: the cache subsystem
//! never ran, which is different from running with nothing to show.

use crate::caching::listener::{CacheEntryListener, CacheListener};
use crate::ui;

fn render_summary(entries: &[CacheEntryListener]) -> String {
    format!(
        "---------- Caching Summary -------------\n\
         Restored Entries Count: {}\n\
         \x20                 Size: {}\n\
         Saved Entries    Count: {}\n\
         \x20                 Size: {}",
        count(entries, |e| e.restored_size),
        sum(entries, |e| e.restored_size),
        count(entries, |e| e.saved_size),
        sum(entries, |e| e.saved_size),
    )
}

fn render_entry(entry: &CacheEntryListener) -> String {
    format!(
        "Entry: {}\n\
         \x20   Requested Key : {}\n\
         \x20   Restored  Key : {}\n\
         \x20             Size: {}\n\
         \x20   Saved     Key : {}\n\
         \x20             Size: {}",
        entry.entry_name,
        entry.requested_key.as_deref().unwrap_or(""),
        entry.restored_key.as_deref().unwrap_or(""),
        format_size(entry.restored_size),
        entry.saved_key.as_deref().unwrap_or(""),
        format_size(entry.saved_size),
    )
}

/// Render the caching summary, or `None` when no entries were tracked
pub fn render_caching_report(listener: &CacheListener) -> Option<String> {
    if listener.cache_entries.is_empty() {
        return None;
    }

    let mut report = render_summary(&listener.cache_entries);
    for entry in &listener.cache_entries {
        report.push('\n');
        report.push_str(&render_entry(entry));
    }
    Some(report)
}

/// Print the caching summary with the entry details grouped
pub fn log_caching_report(listener: &CacheListener) {
    if listener.cache_entries.is_empty() {
        return;
    }

    println!("{}", render_summary(&listener.cache_entries));

    ui::group_start("Cache Entry details");
    for entry in &listener.cache_entries {
        println!("{}", render_entry(entry));
    }
    ui::group_end();
}

/// Number of entries for which the selected size is defined
fn count<F>(entries: &[CacheEntryListener], size: F) -> usize
where
    F: Fn(&CacheEntryListener) -> Option<u64>,
{
    entries.iter().filter(|e| size(e).is_some()).count()
}

/// Formatted sum of the defined sizes
fn sum<F>(entries: &[CacheEntryListener], size: F) -> String
where
    F: Fn(&CacheEntryListener) -> Option<u64>,
{
    format_size(Some(entries.iter().filter_map(&size).sum()))
}

/// Format a byte count as `"<rounded MB> MB (<exact bytes> B)"`
///
/// Absent and zero both render as the empty string.
pub fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        None | Some(0) => String::new(),
        Some(b) => format!("{} MB ({} B)", (b as f64 / (1024.0 * 1024.0)).round(), b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_absent_and_zero() {
        assert_eq!(format_size(None), "");
        assert_eq!(format_size(Some(0)), "");
    }

    #[test]
    fn format_size_megabytes() {
        assert_eq!(format_size(Some(1048576)), "1 MB (1048576 B)");
        assert_eq!(format_size(Some(1600000)), "2 MB (1600000 B)");
        assert_eq!(format_size(Some(500)), "0 MB (500 B)");
    }

    #[test]
    fn empty_listener_renders_nothing() {
        assert!(render_caching_report(&CacheListener::new()).is_none());
    }

    #[test]
    fn report_counts_and_sums() {
        let mut listener = CacheListener::new();
        listener
            .entry("gradle-dependencies")
            .mark_requested("deps-k")
            .mark_restored("deps-k", 1048576)
            .mark_saved("deps-k2", 2097152);
        listener
            .entry("gradle-wrapper-dists")
            .mark_requested("wrapper-k")
            .mark_restored("wrapper-k", 1048576);
        listener.entry("gradle-build-cache").mark_requested("bc-k");

        let report = render_caching_report(&listener).unwrap();

        assert!(report.contains("Restored Entries Count: 2"));
        assert!(report.contains("Saved Entries    Count: 1"));
        // Restored sum and saved sum both come to 2 MB
        assert!(report.contains("2 MB (2097152 B)"));
        assert!(report.contains("Entry: gradle-dependencies"));
        assert!(report.contains("Requested Key : bc-k"));
    }

    #[test]
    fn report_blank_sizes_for_misses() {
        let mut listener = CacheListener::new();
        listener.entry("gradle-dependencies").mark_requested("deps-k");

        let report = render_caching_report(&listener).unwrap();

        assert!(report.contains("Restored Entries Count: 0"));
        assert!(report.contains("Restored  Key : \n"));
    }
}
