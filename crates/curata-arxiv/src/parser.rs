//! arXiv Atom feed parser using quick-xml
//!
//! Streaming parser for the query API response. A malformed top-level
//! document is an error (the whole collection aborts); a malformed single
//! entry is logged and skipped.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::model::Candidate;

/// Parse an Atom feed page into candidates.
///
/// Entries that fail to parse (missing id/date, bad date format) are skipped
/// with a warning; the page as a whole only fails on an XML-level error.
pub fn parse_feed(xml: &str) -> Result<Vec<Candidate>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut candidates = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"entry" => {
                match parse_entry(&mut reader) {
                    Ok(candidate) => candidates.push(candidate),
                    Err(e) => log::warn!("skipping malformed feed entry: {e:#}"),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e).context("XML parse error in feed response"),
            _ => {}
        }
        buf.clear();
    }

    Ok(candidates)
}

fn parse_entry(reader: &mut Reader<&[u8]>) -> Result<Candidate> {
    let mut id = String::new();
    let mut title = String::new();
    let mut abstract_text = String::new();
    let mut authors: Vec<String> = Vec::new();
    let mut published: Option<NaiveDate> = None;
    let mut page_url: Option<String> = None;
    let mut pdf_url: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"id" => id = read_clean_text(reader, &e)?,
                b"title" => title = read_clean_text(reader, &e)?,
                b"summary" => abstract_text = read_clean_text(reader, &e)?,
                b"published" => {
                    let text = read_clean_text(reader, &e)?;
                    published = Some(parse_published(&text)?);
                }
                // <name> only occurs inside <author>
                b"name" => authors.push(read_clean_text(reader, &e)?),
                b"link" => read_link(&e, &mut page_url, &mut pdf_url)?,
                b"category" => read_category(&e, &mut tags)?,
                _ => {}
            },
            // links and categories are usually self-closing
            Event::Empty(e) => match e.name().as_ref() {
                b"link" => read_link(&e, &mut page_url, &mut pdf_url)?,
                b"category" => read_category(&e, &mut tags)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"entry" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    anyhow::ensure!(!id.is_empty(), "entry has no <id>");
    let arxiv_id = id
        .split("/abs/")
        .next_back()
        .unwrap_or(id.as_str())
        .to_string();
    anyhow::ensure!(!title.is_empty(), "entry {arxiv_id} has no <title>");
    let published = published.with_context(|| format!("entry {arxiv_id} has no <published>"))?;

    // The <id> is the abstract page URL itself
    let page_url = page_url.unwrap_or_else(|| id.clone());
    let pdf_url = pdf_url.unwrap_or_else(|| derive_pdf_url(&page_url));

    Ok(Candidate {
        arxiv_id,
        title,
        abstract_text,
        authors,
        published,
        page_url,
        pdf_url,
        tags,
        score: 0.0,
    })
}

/// Document-link fallback: `/abs/` page URL → `/pdf/` URL.
fn derive_pdf_url(page_url: &str) -> String {
    format!("{}.pdf", page_url.replace("/abs/", "/pdf/"))
}

/// Read element text, unescaped, with all whitespace runs collapsed.
fn read_clean_text(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Result<String> {
    let text = reader.read_text(e.name())?;
    Ok(collapse_whitespace(&text))
}

/// Collapse newlines and repeated whitespace (arXiv wraps long titles).
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_published(text: &str) -> Result<NaiveDate> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%SZ")
        .map(|dt| dt.date())
        .with_context(|| format!("bad <published> date: {text}"))
}

fn read_link(
    e: &BytesStart,
    page_url: &mut Option<String>,
    pdf_url: &mut Option<String>,
) -> Result<()> {
    let href = attr_value(e, b"href")?;
    let Some(href) = href else { return Ok(()) };

    if attr_value(e, b"title")?.as_deref() == Some("pdf") {
        *pdf_url = Some(href);
    } else if attr_value(e, b"rel")?.as_deref() == Some("alternate") {
        *page_url = Some(href);
    }
    Ok(())
}

fn read_category(e: &BytesStart, tags: &mut Vec<String>) -> Result<()> {
    if let Some(term) = attr_value(e, b"term")? {
        if !term.is_empty() {
            tags.push(term);
        }
    }
    Ok(())
}

fn attr_value(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}
