use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A wanted person, keyed by their detail page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fugitive {
    pub detail_url: String,
    pub name: String,
    pub dob: NaiveDate,
    pub sex: String,
    pub race: String,
    pub address: String,
}

/// One warrant from a detail page's warrant history table.
///
/// `fugitive_url` refers to [`Fugitive::detail_url`]; the warrant does not own
/// its fugitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warrant {
    pub number: String,
    pub issue_date: NaiveDate,
    pub kind: String,
    pub offense: String,
    /// `None` means no bond.
    pub bail_amount: Option<Decimal>,
    pub fugitive_url: String,
}

/// Everything scraped from a single detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub fugitive: Fugitive,
    pub warrants: Vec<Warrant>,
}

/// Counters for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub letters_swept: usize,
    pub urls_discovered: usize,
    pub pages_processed: usize,
    pub pages_skipped: usize,
    pub warrants_seen: usize,
    pub warrants_published: usize,
}
