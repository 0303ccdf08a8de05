use crate::columns::{ColumnId, column_names};
use crate::error::DataError;
use crate::row::{Rank, Row};
use csv::StringRecord;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// File holding the main table
pub const TABLE_FILE: &str = "transcription_factors.csv";

/// Optional file with extra per-gene fields for the detail pages
pub const DETAILS_FILE: &str = "gene_details.csv";

lazy_static! {
    /// Symbols double as path segments of the gene pages
    static ref SYMBOL_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$").unwrap();
}

/// The full row set of one page view, as served by `GET /data`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub rows: Vec<Row>,
    pub column_names: Vec<&'static str>,
    pub total: usize,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        let total = rows.len();
        Dataset {
            rows,
            column_names: column_names(),
            total,
        }
    }

    pub fn find(&self, symbol: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.symbol == symbol)
    }
}

/// One expanded record for the detail page
#[derive(Debug, Clone, Serialize)]
pub struct GeneDetail {
    pub row: Row,
    /// Extra `(header, value)` pairs in source column order
    pub extra: Vec<(String, String)>,
}

/// Where the engine gets its rows from
///
/// The web layer loads once per page view; tests plug in fixed data.
pub trait RowSource: Send + Sync {
    fn load(&self) -> Result<Dataset, DataError>;

    fn detail(&self, symbol: &str) -> Result<GeneDetail, DataError> {
        let dataset = self.load()?;
        let row = dataset
            .find(symbol)
            .cloned()
            .ok_or_else(|| DataError::NotFound(symbol.to_string()))?;
        Ok(GeneDetail {
            row,
            extra: Vec::new(),
        })
    }
}

/// Reads the shipped CSV files from a data directory
pub struct CsvRowSource {
    dir: PathBuf,
}

impl CsvRowSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvRowSource { dir: dir.into() }
    }
}

impl RowSource for CsvRowSource {
    fn load(&self) -> Result<Dataset, DataError> {
        let path = self.dir.join(TABLE_FILE);
        let rows = from_csv_reader(open(&path)?)?;
        debug!("loaded {} rows from {}", rows.len(), path.display());
        Ok(Dataset::new(rows))
    }

    fn detail(&self, symbol: &str) -> Result<GeneDetail, DataError> {
        let dataset = self.load()?;
        let row = dataset
            .find(symbol)
            .cloned()
            .ok_or_else(|| DataError::NotFound(symbol.to_string()))?;

        let details_path = self.dir.join(DETAILS_FILE);
        let extra = if details_path.exists() {
            details_from_reader(open(&details_path)?, symbol)?
        } else {
            Vec::new()
        };

        Ok(GeneDetail { row, extra })
    }
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parse the main table
///
/// Columns are matched by header label (case-insensitive) or by column key,
/// so both display-header and camelCase files load. Symbols must be unique,
/// non-empty and made of letters, digits, `.`, `_` or `-`; the overall rank
/// must be present.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Row>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let positions = header_positions(&headers)?;

    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let field = |column: ColumnId| record.get(positions[column.index()]).unwrap_or("");
        let rank = |column: ColumnId| {
            Rank::parse(field(column)).map_err(|reason| DataError::Malformed {
                line,
                column: column.key(),
                reason,
            })
        };

        let symbol = field(ColumnId::Symbol).to_string();
        if symbol.is_empty() {
            return Err(DataError::EmptySymbol { line });
        }
        if !SYMBOL_PATTERN.is_match(&symbol) {
            return Err(DataError::InvalidSymbol { line, symbol });
        }
        if !seen.insert(symbol.clone()) {
            return Err(DataError::DuplicateSymbol { line, symbol });
        }

        let overall_rank = rank(ColumnId::OverallRank)?;
        if overall_rank == Rank::NotAvailable {
            return Err(DataError::Malformed {
                line,
                column: ColumnId::OverallRank.key(),
                reason: "is required".to_string(),
            });
        }

        let mut row = Row {
            symbol,
            overall_rank,
            all_diseases_rank: rank(ColumnId::AllDiseasesRank)?,
            ards_rank: rank(ColumnId::ArdsRank)?,
            strongest_linked_disease: field(ColumnId::StrongestLinkedDisease).to_string(),
            aging_db_entries_rank: rank(ColumnId::AgingDbEntriesRank)?,
            human_aging_evidence: field(ColumnId::HumanAgingEvidence).to_string(),
            mouse_influence: field(ColumnId::MouseInfluence).to_string(),
            worm_influence: field(ColumnId::WormInfluence).to_string(),
            fly_influence: field(ColumnId::FlyInfluence).to_string(),
            development_level: field(ColumnId::DevelopmentLevel).to_string(),
            pharos_tdl: field(ColumnId::PharosTdl).to_string(),
        };
        row.normalize_categories();
        rows.push(row);
    }

    Ok(rows)
}

fn header_positions(headers: &StringRecord) -> Result<[usize; 12], DataError> {
    let mut positions = [0usize; 12];
    for column in ColumnId::ALL {
        positions[column.index()] = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column.label()) || h == column.key())
            .ok_or_else(|| DataError::Malformed {
                line: 1,
                column: column.key(),
                reason: "is missing from the header".to_string(),
            })?;
    }
    Ok(positions)
}

/// Extra detail fields for one symbol; the first column holds the symbol
fn details_from_reader<R: Read>(reader: R, symbol: &str) -> Result<Vec<(String, String)>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    for record in csv_reader.records() {
        let record = record?;
        if record.get(0) != Some(symbol) {
            continue;
        }
        return Ok(headers
            .iter()
            .zip(record.iter())
            .skip(1)
            .filter(|(_, value)| !value.is_empty())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect());
    }

    Ok(Vec::new())
}
