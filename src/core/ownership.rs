//! Ownership facts scraped from the public ownership lookup page.
//!
//! The page is not an API and its markup changes without notice. Each fact
//! is extracted independently and any selector or pattern miss only blanks
//! that fact.

use crate::domain::model::OwnershipFact;
use crate::domain::ports::PageFetcher;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

const DEED_DATE_MARKER: &str = "Skødedato";
const SALE_PRICE_MARKER: &str = "Salgspris";
const DATE_FORMAT: &str = "%d-%m-%Y";

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d{2}-\d{4}").expect("valid date pattern"));

// The numeric part in front of the fixed "256" suffix differs between pages.
static DEED_PANEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"aria-controls="(collapse\d*256)""#).expect("valid panel pattern")
});

const SALE_PRICE_SELECTOR: &str = "div.ejedomsdataopslag-main-info div.col-xs-12.col-sm-7 p";
const SALE_HEADING_SELECTOR: &str = "div.ejedomsdataopslag-main-info div.col-xs-12.col-sm-7 h3";

pub struct OwnershipScraper<F: PageFetcher> {
    fetcher: F,
    base_url: String,
}

impl<F: PageFetcher> OwnershipScraper<F> {
    pub fn new(fetcher: F, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/{owner_reference}%7C{municipality_code}`, both parts percent-encoded.
    pub fn page_url(&self, municipality_code: &str, owner_reference: &str) -> String {
        format!(
            "{}/{}%7C{}",
            self.base_url,
            encode_segment(owner_reference),
            encode_segment(municipality_code)
        )
    }

    /// Never fails: an unreachable or unrecognisable page yields an empty fact.
    pub async fn fetch(&self, municipality_code: &str, owner_reference: &str) -> OwnershipFact {
        if owner_reference.trim().is_empty() {
            tracing::debug!("No owner reference, skipping ownership lookup");
            return OwnershipFact::default();
        }

        let url = self.page_url(municipality_code, owner_reference);
        match self.fetcher.fetch_page(&url).await {
            Some(html) => {
                let fact = parse_ownership_page(&html);
                if fact.is_empty() {
                    tracing::debug!("No ownership facts found on {}", url);
                }
                fact
            }
            None => OwnershipFact::default(),
        }
    }
}

fn encode_segment(value: &str) -> String {
    urlencoding::encode(value.trim()).into_owned()
}

pub fn parse_ownership_page(html: &str) -> OwnershipFact {
    let has_deed = html.contains(DEED_DATE_MARKER);
    let has_sale = html.contains(SALE_PRICE_MARKER);
    if !has_deed && !has_sale {
        return OwnershipFact::default();
    }

    let document = Html::parse_document(html);
    let deed_date = if has_deed {
        extract_deed_date(html, &document)
    } else {
        None
    };
    let (sale_price, sale_date) = if has_sale {
        (extract_sale_price(&document), extract_sale_date(&document))
    } else {
        (None, None)
    };

    OwnershipFact {
        deed_date,
        sale_date,
        sale_price,
    }
}

fn extract_deed_date(raw: &str, document: &Html) -> Option<NaiveDate> {
    let panel_id = DEED_PANEL_PATTERN.captures(raw)?.get(1)?.as_str();
    let selector = Selector::parse(&format!(r#"p a[aria-controls="{}"]"#, panel_id)).ok()?;
    let anchor = document.select(&selector).next()?;
    let block = anchor.parent().and_then(ElementRef::wrap)?;
    first_date(&element_text(&block))
}

fn extract_sale_price(document: &Html) -> Option<i64> {
    let text = select_text(document, SALE_PRICE_SELECTOR)?;
    // "1.250.000 kr." -> 1250000
    let digits: String = text
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| *c != '.')
        .collect();
    digits.parse().ok()
}

fn extract_sale_date(document: &Html) -> Option<NaiveDate> {
    let heading = select_text(document, SALE_HEADING_SELECTOR)?;
    let rest = heading.trim().trim_start_matches(SALE_PRICE_MARKER);
    first_date(rest)
}

fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next().map(|el| element_text(&el))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_date(text: &str) -> Option<NaiveDate> {
    let found = DATE_PATTERN.find(text)?;
    NaiveDate::parse_from_str(found.as_str(), DATE_FORMAT).ok()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
