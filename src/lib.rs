/*!
# Transcription Factor Aging Database

A small web application for browsing human transcription factors ranked by
their association with aging, age-related diseases and longevity studies.

## Overview

The site serves a single curated table. Visitors can search it, filter it by
category, sort it by any rank, hide columns, page through it and download the
current view. Every view is fully described by its URL, so any state of the
grid can be bookmarked or shared.

## Architecture

### Data Layer
- **loader**: reads the shipped CSV files into typed rows (`RowSource`)
- **columns**: static registry of column metadata and category orders
- **row**: the row record and its `Rank` type

### Table Engine
- **filter**: global search plus per-column value filters
- **sort**: single-column sort with "not available" always last
- **pagination**: page index and page size arithmetic
- **colors**: per-column rank to palette mapping over the full row set
- **view_state**: encoding of the whole grid state in a query string
- **table**: composes the above into one page of rows

### Outer Surfaces
- **downloader**: CSV and Excel export of the current view
- **docs**: citation tables for the documentation page
- **mailer**: contact form relay over SMTP
- **app**: axum routes and page rendering

## Routes

- `/` - Home page
- `/table` - The data grid; state in `q`, `filters`, `sort`, `cols`, `page`, `size`
- `/gene/{symbol}` - Detail page for one transcription factor
- `/data` - Full row set as JSON
- `/data/detail?symbol=` - One row plus extra fields as JSON
- `/export` - Download the current view (`format=csv|xlsx`)
- `/docs` - Data source documentation
- `/contact` - Contact form
*/

pub mod colors;
pub mod columns;
pub mod config;
pub mod docs;
pub mod downloader;
pub mod error;
pub mod filter;
pub mod loader;
pub mod mailer;
pub mod pagination;
pub mod row;
pub mod sort;
pub mod table;
pub mod view_state;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod pages;

/// Re-export the types most callers need
pub use columns::{ColumnDescriptor, ColumnId, ColumnKind};
pub use config::Config;
pub use error::{DataError, ExportError, MailError};
pub use loader::{CsvRowSource, Dataset, RowSource};
pub use row::{Rank, Row};
pub use table::{TableEngine, TableView};
pub use view_state::ViewState;
