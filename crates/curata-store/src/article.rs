//! Persisted article row model

use chrono::NaiveDate;

/// Article lifecycle status.
///
/// The curation core only ever writes the initial `Parsed` state on insert;
/// downstream processing moves the status forward, never backward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessingStatus {
    Downloaded,
    Parsed,
    Translated,
    Completed,
    FailedTranslation,
}

impl ProcessingStatus {
    /// Parse a stored status string into the enum
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "downloaded" => Some(Self::Downloaded),
            "parsed" => Some(Self::Parsed),
            "translated" => Some(Self::Translated),
            "completed" => Some(Self::Completed),
            "failed_translation" => Some(Self::FailedTranslation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::Parsed => "parsed",
            Self::Translated => "translated",
            Self::Completed => "completed",
            Self::FailedTranslation => "failed_translation",
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted article.
///
/// `created_at` is assigned by the store on insert and is deliberately not a
/// field here — the client never writes it.
#[derive(Debug, Clone)]
pub struct Article {
    /// Candidate identifier, primary key
    pub id: String,
    pub title: String,
    /// Author names in listing order
    pub authors: Vec<String>,
    pub publication_date: NaiveDate,
    pub abstract_text: String,
    /// Mapped keywords, deduplicated, order preserved
    pub keywords: Vec<String>,
    pub full_text: String,
    pub source_url: String,
    pub original_pdf_path: String,
    pub processing_status: ProcessingStatus,
    pub relevance_score: Option<f64>,
}
