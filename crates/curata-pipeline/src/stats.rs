//! Run-level statistics and reporting
//!
//! One summary per pipeline run, printed as a table in TTY mode and as log
//! lines otherwise so aggregators capture the same counts.

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use curata_core::fmt_num;

use crate::acquire::AcquireStats;

/// Aggregated counters for one curation run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Candidates collected from the feed
    pub collected: usize,
    /// Candidates dropped by the existence filter before enrichment
    pub already_persisted: usize,
    /// Candidates with accepted enrichment signals
    pub enriched: usize,
    /// Candidates with no signal (lookup failure or heuristic rejection)
    pub unmatched: usize,
    /// Winners selected by the ranker
    pub winners: usize,
    pub persisted: usize,
    pub duplicates: usize,
    pub download_failures: usize,
    pub rejected_content: usize,
    pub persist_errors: usize,
    /// A first interrupt arrived; counts below the phase it hit are partial
    pub interrupted: bool,
}

impl RunSummary {
    /// Fold the acquisition-phase counters into the run summary.
    pub fn absorb(&mut self, acquire: AcquireStats) {
        self.persisted = acquire.persisted;
        self.duplicates = acquire.duplicates;
        self.download_failures = acquire.download_failures;
        self.rejected_content = acquire.rejected_content;
        self.persist_errors = acquire.persist_errors;
        self.interrupted = self.interrupted || acquire.interrupted;
    }

    /// Print the summary table (TTY mode).
    pub fn print(&self) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Curation run")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Count").fg(Color::Cyan),
            ]);

        table.add_row(vec![Cell::new("Collected"), Cell::new(fmt_num(self.collected))]);
        table.add_row(vec![
            Cell::new("Already persisted"),
            Cell::new(fmt_num(self.already_persisted)),
        ]);
        table.add_row(vec![Cell::new("Enriched"), Cell::new(fmt_num(self.enriched))]);
        table.add_row(vec![Cell::new("No signal"), Cell::new(fmt_num(self.unmatched))]);
        table.add_row(vec![Cell::new("Winners"), Cell::new(fmt_num(self.winners))]);
        table.add_row(vec![
            Cell::new("Persisted").fg(Color::Green),
            Cell::new(fmt_num(self.persisted)).fg(Color::Green),
        ]);
        table.add_row(vec![Cell::new("Duplicates"), Cell::new(fmt_num(self.duplicates))]);
        table.add_row(vec![
            Cell::new("Download failures"),
            Cell::new(fmt_num(self.download_failures)),
        ]);
        table.add_row(vec![
            Cell::new("Rejected content"),
            Cell::new(fmt_num(self.rejected_content)),
        ]);
        table.add_row(vec![
            Cell::new("Persist errors"),
            Cell::new(fmt_num(self.persist_errors)),
        ]);
        if self.interrupted {
            table.add_row(vec![
                Cell::new("Interrupted").fg(Color::Yellow),
                Cell::new("yes — counts are partial").fg(Color::Yellow),
            ]);
        }

        eprintln!("\n{table}");
    }

    /// Log the summary (non-TTY mode).
    pub fn log(&self) {
        log::info!(
            "run summary: {} collected, {} already persisted, {} enriched, {} no signal, {} winners",
            fmt_num(self.collected),
            fmt_num(self.already_persisted),
            fmt_num(self.enriched),
            fmt_num(self.unmatched),
            fmt_num(self.winners),
        );
        log::info!(
            "run summary: {} persisted, {} duplicates, {} download failures, {} rejected, {} errors",
            fmt_num(self.persisted),
            fmt_num(self.duplicates),
            fmt_num(self.download_failures),
            fmt_num(self.rejected_content),
            fmt_num(self.persist_errors),
        );
        if self.interrupted {
            log::warn!("run interrupted — counts are partial");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_copies_acquire_counters() {
        let mut summary = RunSummary {
            collected: 10,
            ..Default::default()
        };
        summary.absorb(AcquireStats {
            persisted: 3,
            duplicates: 1,
            download_failures: 2,
            rejected_content: 1,
            persist_errors: 0,
            interrupted: true,
        });
        assert_eq!(summary.persisted, 3);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.download_failures, 2);
        assert_eq!(summary.rejected_content, 1);
        assert!(summary.interrupted);
        assert_eq!(summary.collected, 10);
    }

    #[test]
    fn absorb_keeps_earlier_interrupt() {
        let mut summary = RunSummary {
            interrupted: true,
            ..Default::default()
        };
        summary.absorb(AcquireStats::default());
        assert!(summary.interrupted);
    }
}
