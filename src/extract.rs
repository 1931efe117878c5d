use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::report::{Event, Reporter, SkipReason};

/// Placeholder written when a field cannot be located.
pub const NOT_AVAILABLE: &str = "N/A";

static CARD_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.product-card").unwrap());
static NAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.product-name").unwrap());
static PRICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.product-price").unwrap());
static RATING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.product-rating").unwrap());
static RATING_TEXT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.text-gray-600").unwrap());

/// One extracted product. Field order matches the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Product Name")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Rating")]
    pub rating: String,
}

/// Read and scrape a local HTML file. A missing or unreadable file is
/// reported through `reporter` and returned as an error; the caller treats
/// it as "no records" and skips the write.
pub fn extract_from_file(path: &Path, reporter: &mut dyn Reporter) -> anyhow::Result<Vec<Record>> {
    let html = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            reporter.report(Event::SourceMissing {
                path: path.to_path_buf(),
            });
            return Err(err).with_context(|| format!("reading '{}'", path.display()));
        }
    };

    reporter.report(Event::ParseStarted {
        path: path.to_path_buf(),
    });
    Ok(extract_products(&html, reporter))
}

/// Scrape product records out of an HTML document. The parser is
/// error-recovering, so malformed markup degrades to fewer matches rather
/// than a failure. Output order follows document order of the matched cards.
pub fn extract_products(html: &str, reporter: &mut dyn Reporter) -> Vec<Record> {
    let doc = Html::parse_document(html);
    let cards: Vec<ElementRef> = doc.select(&CARD_SEL).collect();

    if cards.is_empty() {
        reporter.report(Event::NoCardsFound);
        return Vec::new();
    }
    reporter.report(Event::CardsFound { count: cards.len() });

    let mut records = Vec::with_capacity(cards.len());
    for (index, card) in cards.into_iter().enumerate() {
        match extract_card(card) {
            CardOutcome::Keep(record) => records.push(record),
            // Nameless cards are visited but dropped without a diagnostic.
            CardOutcome::NoName => {}
            CardOutcome::Skip(reason) => {
                reporter.report(Event::CardSkipped { index, reason });
            }
        }
    }

    records
}

enum CardOutcome {
    Keep(Record),
    NoName,
    Skip(SkipReason),
}

fn extract_card(card: ElementRef) -> CardOutcome {
    // A half-present rating structure invalidates the whole card, even when
    // name and price look fine. A fully absent rating only gets the sentinel.
    let rating = match rating_lookup(card) {
        RatingLookup::Found(text) => text,
        RatingLookup::MissingOuter => NOT_AVAILABLE.to_string(),
        RatingLookup::MissingInner => return CardOutcome::Skip(SkipReason::RatingTextMissing),
    };

    let name = field_text(card, &NAME_SEL).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let price = field_text(card, &PRICE_SEL).unwrap_or_else(|| NOT_AVAILABLE.to_string());

    if name == NOT_AVAILABLE {
        return CardOutcome::NoName;
    }

    CardOutcome::Keep(Record { name, price, rating })
}

/// Result of descending the two-level rating structure.
enum RatingLookup {
    Found(String),
    MissingOuter,
    MissingInner,
}

fn rating_lookup(card: ElementRef) -> RatingLookup {
    let Some(wrapper) = card.select(&RATING_SEL).next() else {
        return RatingLookup::MissingOuter;
    };
    match wrapper.select(&RATING_TEXT_SEL).next() {
        Some(span) => RatingLookup::Found(element_text(span)),
        None => RatingLookup::MissingInner,
    }
}

fn field_text(card: ElementRef, sel: &Selector) -> Option<String> {
    card.select(sel).next().map(element_text)
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Tests ──
