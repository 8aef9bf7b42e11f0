//! Main execution logic for the curation run

use std::process::ExitCode;

use anyhow::{Context, Result};
use curata_arxiv::{Candidate, FeedCollector};
use curata_core::{HttpClient, SharedProgress, is_shutdown_requested};
use curata_scholar::{EnrichmentClient, relevance_score};
use curata_store::Store;

use crate::acquire::{Acquirer, acquire_batch};
use crate::config::PipelineConfig;
use crate::rank::select_winners;
use crate::stats::RunSummary;

/// Run the full curation pipeline once.
///
/// Phases run strictly in sequence over a single store connection. Only the
/// initial feed fetch and the store connection itself are fatal; every
/// per-item failure is logged and isolated. Returns exit code 130 when a
/// graceful interrupt cut the run short.
pub fn run(
    config: &PipelineConfig,
    client: &HttpClient,
    store: &mut Store,
    progress: &SharedProgress,
) -> Result<ExitCode> {
    let mut summary = RunSummary::default();

    // Phase 1: collection — abort the run on feed failure, nothing has been
    // persisted yet so a later retry needs no cleanup
    log::info!("phase 1: collecting candidates");
    let stage = progress.stage_line("collect");
    stage.set_message(format!("window: {} day(s)", config.window_days));
    let collector = FeedCollector::new(client, config.feed.clone());
    let candidates = collector
        .collect(config.window_days)
        .context("collection phase failed")?;
    stage.finish_and_clear();

    summary.collected = candidates.len();
    if candidates.is_empty() {
        log::info!("no candidates in the window, nothing to do");
        report(&summary, progress);
        return Ok(ExitCode::SUCCESS);
    }

    // Phase 2: existence filter + enrichment + scoring
    log::info!("phase 2: enriching {} candidates", candidates.len());
    let scored = enrich_candidates(config, client, store, candidates, &mut summary, progress)?;

    // Phase 3: ranking — always runs, even on partial enrichment
    let winners = select_winners(scored, config.top_n);
    summary.winners = winners.len();
    log::info!("phase 3: selected {} winners", winners.len());
    preview_winners(&winners, progress);

    if winners.is_empty() {
        report(&summary, progress);
        return Ok(exit_code(&summary));
    }

    // Phase 4: acquisition and persistence
    log::info!("phase 4: acquiring {} documents", winners.len());
    let acquirer = Acquirer::new(client, config)?;
    let pb = progress.item_bar("acquire", winners.len());
    let acquire_stats = acquire_batch(&acquirer, store, &winners, &pb);
    pb.finish_and_clear();
    summary.absorb(acquire_stats);

    report(&summary, progress);
    Ok(exit_code(&summary))
}

/// Per-candidate loop: skip already-persisted ids before spending an
/// enrichment call, attach scores, check the interrupt flag between lookups.
fn enrich_candidates(
    config: &PipelineConfig,
    client: &HttpClient,
    store: &Store,
    candidates: Vec<Candidate>,
    summary: &mut RunSummary,
    progress: &SharedProgress,
) -> Result<Vec<Candidate>> {
    let enricher = EnrichmentClient::new(client, config.enrichment.clone());
    let pb = progress.item_bar("enrich", candidates.len());
    let mut scored = Vec::with_capacity(candidates.len());

    for mut candidate in candidates {
        if is_shutdown_requested() {
            log::warn!("interrupt requested, halting before next lookup");
            summary.interrupted = true;
            break;
        }

        // Store-connection failure is fatal; a lost store makes the whole
        // run pointless
        if store
            .exists(&candidate.arxiv_id)
            .context("existence check failed")?
        {
            summary.already_persisted += 1;
            pb.inc(1);
            continue;
        }

        match enricher.lookup(&candidate.title) {
            Some(signals) => {
                candidate.score = relevance_score(&signals);
                summary.enriched += 1;
                log::debug!("{}: score {:.1}", candidate.arxiv_id, candidate.score);
            }
            None => summary.unmatched += 1,
        }
        scored.push(candidate);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(scored)
}

/// Show the five best winners before downloading anything.
fn preview_winners(winners: &[Candidate], progress: &SharedProgress) {
    for (i, w) in winners.iter().take(5).enumerate() {
        let line = format!("#{} [{:6.1}] {}", i + 1, w.score, w.title);
        if progress.is_tty() {
            progress.println(line);
        } else {
            log::info!("{line}");
        }
    }
}

fn report(summary: &RunSummary, progress: &SharedProgress) {
    if progress.is_tty() {
        summary.print();
    } else {
        summary.log();
    }
}

fn exit_code(summary: &RunSummary) -> ExitCode {
    if summary.interrupted {
        ExitCode::from(130)
    } else {
        ExitCode::SUCCESS
    }
}
