//! Per-run crawl statistics
//!
//! The coordinator fills a [`CrawlReport`] while it drains the frontier; the binary
//! prints it once the run is over.

use std::time::Duration;

/// Counters collected during one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Resources written to the output directory
    pub pages_saved: u64,

    /// Total bytes written
    pub bytes_written: u64,

    /// Items abandoned because the fetch failed
    pub fetch_failures: u64,

    /// HTML documents whose links could not be extracted
    pub parse_failures: u64,

    /// Items abandoned because the output file could not be written
    pub write_failures: u64,

    /// Dequeued items dropped because the URL was already visited
    pub revisits_skipped: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Items that failed at any stage
    pub fn total_failures(&self) -> u64 {
        self.fetch_failures + self.parse_failures + self.write_failures
    }

    /// Items that reached the fetch stage
    pub fn total_processed(&self) -> u64 {
        self.pages_saved + self.fetch_failures + self.write_failures
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Mirror Summary ===\n");

    println!("  Saved: {} ({} bytes)", report.pages_saved, report.bytes_written);
    println!("  Fetch failures: {}", report.fetch_failures);
    println!("  Parse failures: {}", report.parse_failures);
    println!("  Write failures: {}", report.write_failures);
    println!("  Revisits skipped: {}", report.revisits_skipped);
    println!("  Elapsed: {:.2?}", report.elapsed);

    let processed = report.total_processed();
    let success_rate = if processed > 0 {
        (report.pages_saved as f64 / processed as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "\nSuccess Rate: {:.1}% ({} / {} items saved)",
        success_rate, report.pages_saved, processed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let report = CrawlReport {
            pages_saved: 10,
            bytes_written: 2048,
            fetch_failures: 2,
            parse_failures: 1,
            write_failures: 1,
            revisits_skipped: 4,
            elapsed: Duration::from_secs(3),
        };

        assert_eq!(report.total_failures(), 4);
        assert_eq!(report.total_processed(), 13);
    }

    #[test]
    fn test_default_report_is_empty() {
        let report = CrawlReport::default();
        assert_eq!(report.total_failures(), 0);
        assert_eq!(report.total_processed(), 0);
    }
}
