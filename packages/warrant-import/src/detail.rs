//! Detail page parsing: the fugitive's personal info and their warrant history.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::error::{ParseError, ParseResult};
use crate::layout::{self, personal, warrant};
use crate::normalize::{parse_bail_amount, parse_site_date};
use crate::types::{DetailPage, Fugitive, Warrant};

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());

/// Parse a whole detail page.
///
/// Fails if the page does not have exactly two tables, or if either table
/// does not have the expected row layout. Nothing from a failing page is
/// returned, so no warrant is extracted from a page whose fugitive could not
/// be read.
pub fn parse_detail_page(html: &str, url: &str) -> ParseResult<DetailPage> {
    let document = Html::parse_document(html);
    let tables = detail_tables(&document, url)?;

    let fugitive = parse_fugitive(tables[layout::PERSONAL_TABLE], url)?;
    let warrants = parse_warrants(tables[layout::WARRANT_TABLE], url)?;

    Ok(DetailPage { fugitive, warrants })
}

fn detail_tables<'a>(document: &'a Html, url: &str) -> ParseResult<Vec<ElementRef<'a>>> {
    let tables: Vec<_> = document.select(&TABLE).collect();
    if tables.len() != layout::DETAIL_TABLES {
        return Err(ParseError::TableCount {
            url: url.to_string(),
            expected: layout::DETAIL_TABLES,
            found: tables.len(),
        });
    }
    Ok(tables)
}

fn parse_fugitive(table: ElementRef<'_>, url: &str) -> ParseResult<Fugitive> {
    let rows: Vec<_> = table.select(&ROW).collect();
    if rows.len() != personal::ROWS {
        return Err(ParseError::PersonalRowCount {
            url: url.to_string(),
            expected: personal::ROWS,
            found: rows.len(),
        });
    }

    let field = |row: usize| -> ParseResult<String> {
        last_cell_text(rows[row], "personal info", row, url).map(|text| text.trim().to_string())
    };

    Ok(Fugitive {
        detail_url: url.to_string(),
        name: field(personal::NAME)?,
        sex: field(personal::SEX)?,
        race: field(personal::RACE)?,
        dob: parse_site_date("date of birth", &field(personal::DOB)?)?,
        address: field(personal::ADDRESS)?,
    })
}

fn parse_warrants(table: ElementRef<'_>, url: &str) -> ParseResult<Vec<Warrant>> {
    let rows: Vec<_> = table.select(&ROW).collect();
    if rows.len() % warrant::GROUP != 0 {
        return Err(ParseError::WarrantRowCount {
            url: url.to_string(),
            rows: rows.len(),
            group: warrant::GROUP,
        });
    }

    rows.chunks(warrant::GROUP)
        .enumerate()
        .map(|(group, chunk)| -> ParseResult<Warrant> {
            let cell = |offset: usize| {
                last_cell_text(chunk[offset], "warrant", group * warrant::GROUP + offset, url)
            };

            Ok(Warrant {
                number: cell(warrant::NUMBER)?,
                issue_date: parse_site_date("issue", &cell(warrant::ISSUE_DATE)?)?,
                kind: cell(warrant::TYPE)?.trim().to_string(),
                offense: cell(warrant::OFFENSE)?.trim().to_string(),
                bail_amount: parse_bail_amount(&cell(warrant::BAIL_AMOUNT)?),
                fugitive_url: url.to_string(),
            })
        })
        .collect()
}

fn last_cell_text(row: ElementRef<'_>, table: &'static str, index: usize, url: &str) -> ParseResult<String> {
    row.select(&CELL)
        .last()
        .map(|cell| cell.text().collect::<String>())
        .ok_or_else(|| ParseError::EmptyRow {
            url: url.to_string(),
            table,
            row: index,
        })
}
