//! Testing utilities including mock implementations.
//!
//! These let the importer run end to end without touching the network.

use async_trait::async_trait;
use chrono::NaiveDate;
use panda_client::DataObject;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

use crate::error::{FetchError, FetchResult, PublishError, PublishResult};
use crate::traits::{Publisher, SourceSite};
use crate::types::{Fugitive, Warrant};

pub const MOCK_SEARCH_URL: &str = "http://www4.cookcountysheriff.org/locatename.asp";

/// Canned response for one request.
#[derive(Debug, Clone)]
enum Canned {
    Page(String),
    Status(u16),
}

impl Canned {
    fn respond(&self, url: &str) -> FetchResult<String> {
        match self {
            Canned::Page(html) => Ok(html.clone()),
            Canned::Status(status) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
        }
    }
}

/// Mock source site.
///
/// Searches without a canned response return an empty results page. Detail
/// pages without a canned response return 404.
pub struct MockSite {
    search_url: Url,
    searches: Arc<RwLock<HashMap<String, Canned>>>,
    details: Arc<RwLock<HashMap<String, Canned>>>,
    search_calls: Arc<RwLock<Vec<String>>>,
    detail_calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockSite {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSite {
    pub fn new() -> Self {
        Self {
            search_url: Url::parse(MOCK_SEARCH_URL).unwrap(),
            searches: Default::default(),
            details: Default::default(),
            search_calls: Default::default(),
            detail_calls: Default::default(),
        }
    }

    /// Results page returned for a last-name search.
    pub fn with_search(self, last_name: &str, html: String) -> Self {
        self.searches
            .write()
            .unwrap()
            .insert(last_name.to_string(), Canned::Page(html));
        self
    }

    /// Make a last-name search fail with an HTTP status.
    pub fn with_search_status(self, last_name: &str, status: u16) -> Self {
        self.searches
            .write()
            .unwrap()
            .insert(last_name.to_string(), Canned::Status(status));
        self
    }

    /// Detail page returned for an absolute URL.
    pub fn with_detail(self, url: &str, html: String) -> Self {
        self.set_detail(url, html);
        self
    }

    /// Make a detail page fail with an HTTP status.
    pub fn with_detail_status(self, url: &str, status: u16) -> Self {
        self.details
            .write()
            .unwrap()
            .insert(url.to_string(), Canned::Status(status));
        self
    }

    /// Replace a detail page after construction.
    pub fn set_detail(&self, url: &str, html: String) {
        self.details
            .write()
            .unwrap()
            .insert(url.to_string(), Canned::Page(html));
    }

    /// Last names searched, in order.
    pub fn searches(&self) -> Vec<String> {
        self.search_calls.read().unwrap().clone()
    }

    /// Detail URLs fetched, in order.
    pub fn detail_fetches(&self) -> Vec<String> {
        self.detail_calls.read().unwrap().clone()
    }
}

#[async_trait]
impl SourceSite for MockSite {
    fn search_url(&self) -> &Url {
        &self.search_url
    }

    async fn search(&self, last_name: &str) -> FetchResult<String> {
        self.search_calls.write().unwrap().push(last_name.to_string());
        match self.searches.read().unwrap().get(last_name) {
            Some(canned) => canned.respond(self.search_url.as_str()),
            None => Ok(search_results_html(&[])),
        }
    }

    async fn fetch_detail(&self, url: &str) -> FetchResult<String> {
        self.detail_calls.write().unwrap().push(url.to_string());
        match self.details.read().unwrap().get(url) {
            Some(canned) => canned.respond(url),
            None => Canned::Status(404).respond(url),
        }
    }
}

/// Publisher that keeps every submitted record in memory.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Arc<RwLock<Vec<DataObject>>>,
    ensure_calls: Arc<RwLock<usize>>,
    fail_on: Option<String>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the record with this external id.
    pub fn failing_on(mut self, external_id: impl Into<String>) -> Self {
        self.fail_on = Some(external_id.into());
        self
    }

    pub fn published(&self) -> Vec<DataObject> {
        self.published.read().unwrap().clone()
    }

    pub fn ensure_calls(&self) -> usize {
        *self.ensure_calls.read().unwrap()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn ensure_dataset(&self) -> PublishResult<()> {
        *self.ensure_calls.write().unwrap() += 1;
        Ok(())
    }

    async fn publish(&self, object: &DataObject) -> PublishResult<()> {
        if self.fail_on.as_deref() == Some(object.external_id.as_str()) {
            return Err(PublishError::Record {
                external_id: object.external_id.clone(),
                source: panda_client::PandaError::Api {
                    status: 500,
                    message: "rejected".to_string(),
                },
            });
        }
        self.published.write().unwrap().push(object.clone());
        Ok(())
    }
}

/// A search results page linking to each href.
pub fn search_results_html(hrefs: &[&str]) -> String {
    let rows: String = hrefs
        .iter()
        .map(|href| format!("<tr><td><a href=\"{href}\">FUGITIVE</a></td><td>01/01/1970</td></tr>"))
        .collect();
    format!("<html><body><table>{rows}</table></body></html>")
}

/// Personal info rows of the reference detail page (the trailing unused row is
/// added by [`detail_page_html`]).
pub fn sample_personal() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Name", "Doe, John"),
        ("Sex", "M"),
        ("Race", "B"),
        ("DOB", "01/02/1980"),
        ("Address", "123 Main St"),
    ]
}

/// Warrant rows of the reference detail page: number, issue date, type,
/// offense, bail amount.
pub fn sample_warrant() -> [&'static str; 5] {
    ["W123", "06/15/2020", "FELONY", "THEFT", "$2,000.00"]
}

/// A detail page with a personal info table and a warrant table, each row
/// rendered as a label cell and a value cell.
pub fn detail_page_html(personal: &[(&str, &str)], warrants: &[[&str; 5]]) -> String {
    const WARRANT_LABELS: [&str; 5] = ["Warrant #", "Issue Date", "Type", "Offense", "Bail Amount"];
    const UNUSED_ROW: &str = "<tr><td>&nbsp;</td><td></td></tr>";

    let row = |label: &str, value: &str| format!("<tr><td>{label}</td><td>{value}</td></tr>");

    let mut personal_rows: String = personal.iter().map(|(l, v)| row(l, v)).collect();
    personal_rows.push_str(UNUSED_ROW);

    let mut warrant_rows = String::new();
    for warrant in warrants {
        for (label, value) in WARRANT_LABELS.iter().zip(warrant) {
            warrant_rows.push_str(&row(label, value));
        }
        warrant_rows.push_str(UNUSED_ROW);
    }

    format!(
        "<html><head><title>Wanted</title></head><body><table>{personal_rows}</table><table>{warrant_rows}</table></body></html>"
    )
}

/// A fugitive with the reference page's attributes.
pub fn fugitive(detail_url: &str, name: &str) -> Fugitive {
    Fugitive {
        detail_url: detail_url.to_string(),
        name: name.to_string(),
        dob: NaiveDate::from_ymd_opt(1980, 1, 2).unwrap(),
        sex: "M".to_string(),
        race: "B".to_string(),
        address: "123 Main St".to_string(),
    }
}

/// A warrant with the reference page's attributes.
pub fn warrant(number: &str, fugitive_url: &str) -> Warrant {
    Warrant {
        number: number.to_string(),
        issue_date: NaiveDate::from_ymd_opt(2020, 6, 15).unwrap(),
        kind: "FELONY".to_string(),
        offense: "THEFT".to_string(),
        bail_amount: Some(Decimal::new(200000, 2)),
        fugitive_url: fugitive_url.to_string(),
    }
}

/// One request captured by [`StubServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    /// Path and query, as sent.
    pub target: String,
    pub body: String,
}

/// Local HTTP server answering with canned `(status, body)` responses, one
/// per connection, in order. Every request is captured.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<RwLock<Vec<CapturedRequest>>>,
}

impl StubServer {
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<RwLock<Vec<CapturedRequest>>> = Default::default();

        let captured = requests.clone();
        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let Ok(request) = read_request(&mut stream).await else {
                    return;
                };
                captured.write().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { addr, requests }
    }

    /// Absolute URL on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.read().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    Ok(CapturedRequest {
        method: request_line.next().unwrap_or_default().to_string(),
        target: request_line.next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    })
}
