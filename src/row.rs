use crate::columns::{ColumnId, ColumnKind};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::num::NonZeroU32;

/// Sentinel text for ranks the source does not provide
pub const NOT_AVAILABLE: &str = "not available";

/// A rank value: a positive integer, or explicitly not available
///
/// Missing ranks are never coerced to zero; "no rank" and "rank N" must stay
/// distinguishable for sorting and color mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Ranked(NonZeroU32),
    NotAvailable,
}

impl Rank {
    pub fn new(value: u32) -> Rank {
        NonZeroU32::new(value).map_or(Rank::NotAvailable, Rank::Ranked)
    }

    pub fn value(self) -> Option<u32> {
        match self {
            Rank::Ranked(v) => Some(v.get()),
            Rank::NotAvailable => None,
        }
    }

    /// Parse a source value
    ///
    /// Empty cells and the usual NA spellings become `NotAvailable`. Zero,
    /// negative and non-numeric values are rejected.
    pub fn parse(raw: &str) -> Result<Rank, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed == "-"
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE)
        {
            return Ok(Rank::NotAvailable);
        }

        let value = match trimmed.parse::<u32>() {
            Ok(v) => v,
            Err(_) => match trimmed.parse::<f64>() {
                Ok(f) if f.fract() == 0.0 && f >= 1.0 && f <= u32::MAX as f64 => f as u32,
                _ => return Err(format!("'{trimmed}' is not a positive integer rank")),
            },
        };

        NonZeroU32::new(value)
            .map(Rank::Ranked)
            .ok_or_else(|| "rank must be at least 1".to_string())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ranked(v) => write!(f, "{v}"),
            Rank::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rank::Ranked(v) => serializer.serialize_u32(v.get()),
            Rank::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// One transcription factor record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub symbol: String,
    pub overall_rank: Rank,
    pub all_diseases_rank: Rank,
    pub ards_rank: Rank,
    pub strongest_linked_disease: String,
    pub aging_db_entries_rank: Rank,
    pub human_aging_evidence: String,
    pub mouse_influence: String,
    pub worm_influence: String,
    pub fly_influence: String,
    pub development_level: String,
    #[serde(rename = "pharosTDL")]
    pub pharos_tdl: String,
}

/// A borrowed view of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellRef<'a> {
    Text(&'a str),
    Rank(Rank),
}

impl Row {
    pub fn cell(&self, column: ColumnId) -> CellRef<'_> {
        match column {
            ColumnId::Symbol => CellRef::Text(&self.symbol),
            ColumnId::OverallRank => CellRef::Rank(self.overall_rank),
            ColumnId::AllDiseasesRank => CellRef::Rank(self.all_diseases_rank),
            ColumnId::ArdsRank => CellRef::Rank(self.ards_rank),
            ColumnId::StrongestLinkedDisease => CellRef::Text(&self.strongest_linked_disease),
            ColumnId::AgingDbEntriesRank => CellRef::Rank(self.aging_db_entries_rank),
            ColumnId::HumanAgingEvidence => CellRef::Text(&self.human_aging_evidence),
            ColumnId::MouseInfluence => CellRef::Text(&self.mouse_influence),
            ColumnId::WormInfluence => CellRef::Text(&self.worm_influence),
            ColumnId::FlyInfluence => CellRef::Text(&self.fly_influence),
            ColumnId::DevelopmentLevel => CellRef::Text(&self.development_level),
            ColumnId::PharosTdl => CellRef::Text(&self.pharos_tdl),
        }
    }

    pub fn rank(&self, column: ColumnId) -> Option<Rank> {
        match self.cell(column) {
            CellRef::Rank(rank) => Some(rank),
            CellRef::Text(_) => None,
        }
    }

    /// Value as shown in the grid and compared by column filters
    pub fn display(&self, column: ColumnId) -> Cow<'_, str> {
        match self.cell(column) {
            CellRef::Text(text) => Cow::Borrowed(text),
            CellRef::Rank(rank) => Cow::Owned(rank.to_string()),
        }
    }

    /// Value written to exports; unavailable ranks become empty
    pub fn export_value(&self, column: ColumnId) -> Cow<'_, str> {
        match self.cell(column) {
            CellRef::Rank(Rank::NotAvailable) => Cow::Borrowed(""),
            _ => self.display(column),
        }
    }

    /// Normalize category columns through their ordering tables
    pub fn normalize_categories(&mut self) {
        for column in ColumnId::ALL {
            if let ColumnKind::Category(order) = column.descriptor().kind {
                if let Some(field) = self.category_mut(column) {
                    *field = order.normalize(field);
                }
            }
        }
    }

    fn category_mut(&mut self, column: ColumnId) -> Option<&mut String> {
        match column {
            ColumnId::HumanAgingEvidence => Some(&mut self.human_aging_evidence),
            ColumnId::MouseInfluence => Some(&mut self.mouse_influence),
            ColumnId::WormInfluence => Some(&mut self.worm_influence),
            ColumnId::FlyInfluence => Some(&mut self.fly_influence),
            ColumnId::DevelopmentLevel => Some(&mut self.development_level),
            ColumnId::PharosTdl => Some(&mut self.pharos_tdl),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_parsing() {
        assert_eq!(Rank::parse("7"), Ok(Rank::new(7)));
        assert_eq!(Rank::parse(" 12.0 "), Ok(Rank::new(12)));
        assert_eq!(Rank::parse(""), Ok(Rank::NotAvailable));
        assert_eq!(Rank::parse("Not Available"), Ok(Rank::NotAvailable));
        assert_eq!(Rank::parse("N/A"), Ok(Rank::NotAvailable));
        assert!(Rank::parse("0").is_err());
        assert!(Rank::parse("-3").is_err());
        assert!(Rank::parse("1.5").is_err());
        assert!(Rank::parse("high").is_err());
    }

    #[test]
    fn unavailable_rank_is_not_zero() {
        assert_eq!(Rank::new(0), Rank::NotAvailable);
        assert_eq!(Rank::NotAvailable.value(), None);
        assert_eq!(Rank::new(3).value(), Some(3));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(fixtures::row("FOXO3", 1)).unwrap();
        assert_eq!(json["symbol"], "FOXO3");
        assert_eq!(json["overallRank"], 1);
        assert_eq!(json["ardsRank"], NOT_AVAILABLE);
        assert_eq!(json["pharosTDL"], "None");
    }

    #[test]
    fn export_value_blanks_missing_ranks() {
        let row = fixtures::row("TP53", 2);
        assert_eq!(row.export_value(ColumnId::ArdsRank), "");
        assert_eq!(row.display(ColumnId::ArdsRank), NOT_AVAILABLE);
        assert_eq!(row.export_value(ColumnId::OverallRank), "2");
    }

    #[test]
    fn normalizes_category_aliases() {
        let mut row = fixtures::row("NFKB1", 4);
        row.human_aging_evidence = "Y".to_string();
        row.development_level = " medium to low ".to_string();
        row.normalize_categories();
        assert_eq!(row.human_aging_evidence, "Yes");
        assert_eq!(row.development_level, "Medium to Low");
    }
}
