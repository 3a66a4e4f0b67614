//! Row positions on the detail page.
//!
//! The site renders every field as its own `<tr>` with the value in the last
//! cell. These offsets are the only place that knows which row holds what.

/// Number of `<table>` elements on a detail page.
pub const DETAIL_TABLES: usize = 2;

pub const PERSONAL_TABLE: usize = 0;
pub const WARRANT_TABLE: usize = 1;

/// Personal info table: one row per field plus a trailing unused row.
pub mod personal {
    pub const ROWS: usize = 6;

    pub const NAME: usize = 0;
    pub const SEX: usize = 1;
    pub const RACE: usize = 2;
    pub const DOB: usize = 3;
    pub const ADDRESS: usize = 4;
}

/// Warrant table: repeating groups, one per warrant, each ending in an unused row.
pub mod warrant {
    pub const GROUP: usize = 6;

    pub const NUMBER: usize = 0;
    pub const ISSUE_DATE: usize = 1;
    pub const TYPE: usize = 2;
    pub const OFFENSE: usize = 3;
    pub const BAIL_AMOUNT: usize = 4;
}
