//! Citation tables for the documentation page
//!
//! Each `*.csv` file in the docs directory becomes one table. Files are shown
//! in name order; a leading `NN_` prefix only fixes that order and is dropped
//! from the title.

use crate::error::DataError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref ORDER_PREFIX: Regex = Regex::new(r"^\d+[_-]").unwrap();
}

#[derive(Debug, Clone, Serialize)]
pub struct DocCell {
    pub text: String,
    /// Set when the cell holds a link
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<DocCell>>,
}

/// Load every table in `dir`; a missing directory yields no tables
pub fn load_tables(dir: &Path) -> Result<Vec<DocTable>, DataError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| DataError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("csv"))
        .collect();
    paths.sort();

    paths.iter().map(|path| load_table(path)).collect()
}

fn load_table(path: &Path) -> Result<DocTable, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(to_cell).collect());
    }

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    Ok(DocTable {
        title: table_title(stem),
        headers,
        rows,
    })
}

fn to_cell(value: &str) -> DocCell {
    let href = (value.starts_with("http://") || value.starts_with("https://"))
        .then(|| value.to_string());
    DocCell {
        text: value.to_string(),
        href,
    }
}

/// `02_disease_sources` -> `Disease sources`
pub fn table_title(stem: &str) -> String {
    let words = ORDER_PREFIX.replace(stem, "").replace(['_', '-'], " ");
    let mut chars = words.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_drop_order_prefix() {
        assert_eq!(table_title("02_disease_sources"), "Disease sources");
        assert_eq!(table_title("aging-databases"), "Aging databases");
        assert_eq!(table_title(""), "");
    }

    #[test]
    fn loads_tables_in_name_order_and_detects_links() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("02_b.csv"), "Name,Link\nX,https://x.org\n").unwrap();
        fs::write(dir.path().join("01_a.csv"), "Name,Year\nY,2020\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let tables = load_tables(dir.path()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].title, "A");
        assert_eq!(tables[1].rows[0][1].href.as_deref(), Some("https://x.org"));
        assert_eq!(tables[0].rows[0][1].href, None);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_tables(&dir.path().join("docs")).unwrap().is_empty());
    }
}
