//! Detail URL discovery.
//!
//! The site has no index of fugitives, only a last-name prefix search. Sweeping
//! every letter of the alphabet covers everyone; a fugitive may show up under
//! more than one letter, so results are deduplicated by URL.

use indexmap::IndexMap;
use regex::Regex;
use scraper::{Html, Selector};
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use tracing::{debug, info};
use url::Url;

use crate::error::FetchResult;
use crate::traits::SourceSite;

/// One search per letter.
pub const ALPHABET: RangeInclusive<char> = 'a'..='z';

static RESULT_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr td a[href]").unwrap());
static SPACE_BEFORE_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+&").unwrap());

/// Detail URLs seen during one sweep, in first-seen order, with how many
/// times each was seen.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredUrls {
    seen: IndexMap<String, usize>,
}

impl DiscoveredUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sighting. Returns `true` the first time a URL is seen.
    pub fn record(&mut self, url: String) -> bool {
        let count = self.seen.entry(url).or_insert(0);
        *count += 1;
        *count == 1
    }

    pub fn count(&self, url: &str) -> usize {
        self.seen.get(url).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.seen.keys().map(String::as_str)
    }
}

/// Tidy a raw result-page href.
///
/// The site's links carry stray whitespace before query separators, quote
/// characters and unescaped spaces.
pub fn clean_href(href: &str) -> String {
    let href = href.trim().replace('"', "");
    SPACE_BEFORE_PARAM
        .replace_all(&href, "&")
        .replace(' ', "%20")
}

/// Absolute detail URLs linked from a search results page.
pub fn extract_detail_links(html: &str, base_url: &Url, detail_prefix: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(clean_href)
        .filter(|href| href.starts_with(detail_prefix))
        .filter_map(|href| base_url.join(&href).ok())
        .map(|url| url.to_string())
        .collect()
}

/// Sweep the alphabet and collect every detail URL.
///
/// A failed search aborts the sweep: skipping a letter would silently drop
/// everyone filed under it.
pub async fn discover_detail_urls<S>(site: &S, detail_prefix: &str) -> FetchResult<DiscoveredUrls>
where
    S: SourceSite + ?Sized,
{
    let mut discovered = DiscoveredUrls::new();

    for letter in ALPHABET {
        let html = site.search(&letter.to_string()).await?;
        let links = extract_detail_links(&html, site.search_url(), detail_prefix);

        let found = links.len();
        let new = links
            .into_iter()
            .map(|link| discovered.record(link))
            .filter(|first_sighting| *first_sighting)
            .count();

        info!(
            letter = %letter,
            links = found,
            new,
            "Fetched '{}' pages",
            letter
        );
    }

    debug!(urls = discovered.len(), "Discovery complete");
    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::testing::{search_results_html, MockSite};

    fn base() -> Url {
        Url::parse("http://www4.cookcountysheriff.org/locatename.asp").unwrap()
    }

    #[test]
    fn test_clean_href() {
        assert_eq!(
            clean_href(" wanted.asp?id=12 &dob=01/02/1980 "),
            "wanted.asp?id=12&dob=01/02/1980"
        );
        assert_eq!(
            clean_href("wanted.asp?name=\"DOE JOHN\"&id=3"),
            "wanted.asp?name=DOE%20JOHN&id=3"
        );
    }

    #[test]
    fn test_extract_detail_links() {
        let html = r#"
            <table>
              <tr><td><a href="wanted.asp?id=1">DOE, JOHN</a></td></tr>
              <tr><td><a href="wanted.asp?id=2 &dob=03/04/1975">ROE, JANE</a></td></tr>
              <tr><td><a href="help.asp">Help</a></td></tr>
            </table>
            <a href="wanted.asp?id=99">outside a table cell</a>
        "#;

        let links = extract_detail_links(html, &base(), "wanted.asp");

        assert_eq!(
            links,
            vec![
                "http://www4.cookcountysheriff.org/wanted.asp?id=1".to_string(),
                "http://www4.cookcountysheriff.org/wanted.asp?id=2&dob=03/04/1975".to_string(),
            ]
        );
    }

    #[test]
    fn test_discovered_urls_counts() {
        let mut urls = DiscoveredUrls::new();
        assert!(urls.record("http://x/1".into()));
        assert!(!urls.record("http://x/1".into()));
        assert!(urls.record("http://x/2".into()));

        assert_eq!(urls.len(), 2);
        assert_eq!(urls.count("http://x/1"), 2);
        assert_eq!(urls.count("http://x/3"), 0);
        assert!(!urls.is_empty());
        assert_eq!(urls.urls().collect::<Vec<_>>(), vec!["http://x/1", "http://x/2"]);
    }

    #[tokio::test]
    async fn test_sweeps_every_letter() {
        let site = MockSite::new();
        discover_detail_urls(&site, "wanted.asp").await.unwrap();

        let searches = site.searches();
        assert_eq!(searches.len(), 26);
        assert_eq!(searches.first().map(String::as_str), Some("a"));
        assert_eq!(searches.last().map(String::as_str), Some("z"));
    }

    #[tokio::test]
    async fn test_same_link_under_two_letters_is_kept_once() {
        let site = MockSite::new()
            .with_search("a", search_results_html(&["wanted.asp?id=7"]))
            .with_search("b", search_results_html(&["wanted.asp?id=7", "wanted.asp?id=8"]));

        let urls = discover_detail_urls(&site, "wanted.asp").await.unwrap();

        let expected = "http://www4.cookcountysheriff.org/wanted.asp?id=7";
        assert_eq!(urls.len(), 2);
        assert_eq!(urls.count(expected), 2);
        assert_eq!(urls.urls().filter(|u| *u == expected).count(), 1);
    }

    #[tokio::test]
    async fn test_failed_letter_aborts_sweep() {
        let site = MockSite::new().with_search_status("c", 500);

        let err = discover_detail_urls(&site, "wanted.asp").await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        assert_eq!(site.searches(), vec!["a", "b", "c"]);
    }
}
