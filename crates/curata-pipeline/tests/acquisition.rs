//! Acquisition and persistence integration tests.
//!
//! Documents are pre-seeded into the cache directory so the acquirer's
//! cache-reuse path runs the full extract → validate → persist sequence
//! without any network access.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::NaiveDate;
use curata_arxiv::Candidate;
use curata_core::{HttpClient, shutdown_flag};
use curata_pipeline::{
    AcquireOutcome, Acquirer, PipelineConfig, acquire_batch, select_winners,
};
use curata_store::{ProcessingStatus, Store};
use indicatif::ProgressBar;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tempfile::TempDir;

/// Write a minimal single-page PDF containing `text`.
fn write_pdf(path: &Path, text: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn candidate(id: &str, score: f64) -> Candidate {
    Candidate {
        arxiv_id: id.to_string(),
        title: format!("Paper {id}"),
        abstract_text: "An abstract.".to_string(),
        authors: vec!["Jane Doe".to_string()],
        published: NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
        page_url: format!("http://arxiv.org/abs/{id}"),
        pdf_url: format!("http://arxiv.org/pdf/{id}"),
        tags: vec!["cs.LG".to_string(), "cs.AI".to_string(), "cs.LG".to_string()],
        score,
    }
}

fn config(dir: &TempDir, min_text_len: usize) -> PipelineConfig {
    PipelineConfig {
        min_text_len,
        pdf_dir: dir.path().join("pdfs"),
        download_timeout: Duration::from_secs(1),
        ..PipelineConfig::default()
    }
}

fn offline_client() -> HttpClient {
    HttpClient::new("curata-test/0.1", None, 0)
}

/// ~600 chars, comfortably above the default 500-char gate
fn long_text() -> String {
    "the quick brown fox jumps over the lazy dog ".repeat(14)
}

fn seed_pdf(acquirer: &Acquirer, id: &str, text: &str) {
    write_pdf(&acquirer.pdf_path(id), text);
}

#[test]
fn cached_document_persists_without_network() {
    let dir = TempDir::new().unwrap();
    let client = offline_client();
    let cfg = config(&dir, 10);
    let acquirer = Acquirer::new(&client, &cfg).unwrap();
    let mut store = Store::open_in_memory().unwrap();

    seed_pdf(&acquirer, "2401.10001v1", "Hello from a cached document!");
    let winner = candidate("2401.10001v1", 101.9);

    assert_eq!(
        acquirer.acquire_one(&mut store, &winner),
        AcquireOutcome::Persisted
    );

    let row = store.get_article("2401.10001v1").unwrap().unwrap();
    assert_eq!(row.processing_status, ProcessingStatus::Parsed);
    assert_eq!(row.relevance_score, Some(101.9));
    assert!(row.full_text.contains("Hello from a cached document"));
    // Tags mapped to keywords, deduplicated in first-seen order
    assert_eq!(row.keywords, vec!["Machine Learning", "Artificial Intelligence"]);
    assert_eq!(row.authors, vec!["Jane Doe"]);
}

#[test]
fn repeated_acquisition_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let client = offline_client();
    let cfg = config(&dir, 10);
    let acquirer = Acquirer::new(&client, &cfg).unwrap();
    let mut store = Store::open_in_memory().unwrap();

    seed_pdf(&acquirer, "2401.10001v1", "Hello from a cached document!");
    let winner = candidate("2401.10001v1", 7.0);

    assert_eq!(
        acquirer.acquire_one(&mut store, &winner),
        AcquireOutcome::Persisted
    );
    assert_eq!(
        acquirer.acquire_one(&mut store, &winner),
        AcquireOutcome::AlreadyPersisted
    );
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn short_text_discards_document_and_skips_persist() {
    let dir = TempDir::new().unwrap();
    let client = offline_client();
    let cfg = config(&dir, 500);
    let acquirer = Acquirer::new(&client, &cfg).unwrap();
    let mut store = Store::open_in_memory().unwrap();

    // Real PDF, but the extracted text is far below 500 chars
    seed_pdf(&acquirer, "2401.10002v1", "Too short.");
    let winner = candidate("2401.10002v1", 3.0);

    assert_eq!(
        acquirer.acquire_one(&mut store, &winner),
        AcquireOutcome::RejectedContent
    );
    assert!(!acquirer.pdf_path("2401.10002v1").exists());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn unreadable_document_discarded() {
    let dir = TempDir::new().unwrap();
    let client = offline_client();
    let cfg = config(&dir, 10);
    let acquirer = Acquirer::new(&client, &cfg).unwrap();
    let mut store = Store::open_in_memory().unwrap();

    std::fs::write(
        acquirer.pdf_path("2401.10003v1"),
        b"<html>502 Bad Gateway</html>",
    )
    .unwrap();
    let winner = candidate("2401.10003v1", 3.0);

    assert_eq!(
        acquirer.acquire_one(&mut store, &winner),
        AcquireOutcome::RejectedContent
    );
    assert!(!acquirer.pdf_path("2401.10003v1").exists());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn old_style_identifier_maps_to_flat_filename() {
    let dir = TempDir::new().unwrap();
    let client = offline_client();
    let cfg = config(&dir, 10);
    let acquirer = Acquirer::new(&client, &cfg).unwrap();

    let path = acquirer.pdf_path("cs/0112017v1");
    assert!(path.to_string_lossy().ends_with("cs_0112017v1.pdf"));
}

#[test]
fn selection_then_acquisition_keeps_only_valid_winners() {
    let dir = TempDir::new().unwrap();
    let client = offline_client();
    let cfg = config(&dir, 500);
    let acquirer = Acquirer::new(&client, &cfg).unwrap();
    let mut store = Store::open_in_memory().unwrap();

    // A scored well, B found no enrichment match
    let a = candidate("2401.20001v1", 101.9);
    let b = candidate("2401.20002v1", 0.0);
    seed_pdf(&acquirer, &a.arxiv_id, &long_text());
    seed_pdf(&acquirer, &b.arxiv_id, "10 chars.."); // below the content gate

    let winners = select_winners(vec![b.clone(), a.clone()], 20);
    assert_eq!(winners[0].arxiv_id, a.arxiv_id);
    assert_eq!(winners[1].arxiv_id, b.arxiv_id);

    let outcomes: Vec<AcquireOutcome> = winners
        .iter()
        .map(|w| acquirer.acquire_one(&mut store, w))
        .collect();
    assert_eq!(
        outcomes,
        vec![AcquireOutcome::Persisted, AcquireOutcome::RejectedContent]
    );

    // Exactly one row, for A, with the initial status and its score
    assert_eq!(store.count().unwrap(), 1);
    let row = store.get_article(&a.arxiv_id).unwrap().unwrap();
    assert_eq!(row.processing_status, ProcessingStatus::Parsed);
    assert!((row.relevance_score.unwrap() - 101.9).abs() < 1e-9);
    assert!(store.get_article(&b.arxiv_id).unwrap().is_none());
}

#[test]
fn interrupt_halts_before_next_winner() {
    let dir = TempDir::new().unwrap();
    let client = offline_client();
    let cfg = config(&dir, 10);
    let acquirer = Acquirer::new(&client, &cfg).unwrap();
    let mut store = Store::open_in_memory().unwrap();

    let winners = vec![candidate("2401.30001v1", 2.0), candidate("2401.30002v1", 1.0)];
    for w in &winners {
        seed_pdf(&acquirer, &w.arxiv_id, "Hello from a cached document!");
    }

    // Flag already set: the loop halts before the first unit, leaving the
    // store untouched — a clean, resumable stopping point
    shutdown_flag().store(true, Ordering::Relaxed);
    let stats = acquire_batch(&acquirer, &mut store, &winners, &ProgressBar::hidden());
    shutdown_flag().store(false, Ordering::Relaxed);

    assert!(stats.interrupted);
    assert_eq!(stats.persisted, 0);
    assert_eq!(store.count().unwrap(), 0);

    // The next run picks up exactly where the interrupt left off
    let stats = acquire_batch(&acquirer, &mut store, &winners, &ProgressBar::hidden());
    assert!(!stats.interrupted);
    assert_eq!(stats.persisted, 2);
    assert_eq!(store.count().unwrap(), 2);
}
