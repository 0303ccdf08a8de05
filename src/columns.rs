use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one of the twelve table columns
///
/// Declaration order is the fixed display order. The first two columns are
/// required and can never be hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    #[serde(rename = "symbol")]
    Symbol,
    #[serde(rename = "overallRank")]
    OverallRank,
    #[serde(rename = "allDiseasesRank")]
    AllDiseasesRank,
    #[serde(rename = "ardsRank")]
    ArdsRank,
    #[serde(rename = "strongestLinkedDisease")]
    StrongestLinkedDisease,
    #[serde(rename = "agingDbEntriesRank")]
    AgingDbEntriesRank,
    #[serde(rename = "humanAgingEvidence")]
    HumanAgingEvidence,
    #[serde(rename = "mouseInfluence")]
    MouseInfluence,
    #[serde(rename = "wormInfluence")]
    WormInfluence,
    #[serde(rename = "flyInfluence")]
    FlyInfluence,
    #[serde(rename = "developmentLevel")]
    DevelopmentLevel,
    #[serde(rename = "pharosTDL")]
    PharosTdl,
}

/// Ordering table for an enum-valued column
///
/// `labels` are the canonical values in sort order; `aliases` map alternate
/// spellings found in source files onto a canonical label (case-insensitive).
#[derive(Debug)]
pub struct CategoryOrder {
    pub labels: &'static [&'static str],
    pub aliases: &'static [(&'static str, &'static str)],
}

impl CategoryOrder {
    /// Canonical label for a raw source value; unknown values are kept trimmed
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if let Some(label) = self
            .labels
            .iter()
            .find(|label| label.eq_ignore_ascii_case(trimmed))
        {
            return label.to_string();
        }
        if let Some((_, label)) = self
            .aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        {
            return label.to_string();
        }
        trimmed.to_string()
    }

    /// Sort position of a label; unknown labels come after every known one
    pub fn ordinal(&self, label: &str) -> usize {
        self.labels
            .iter()
            .position(|known| *known == label)
            .unwrap_or(self.labels.len())
    }
}

pub static EVIDENCE_ORDER: CategoryOrder = CategoryOrder {
    labels: &["Yes", "No", "None"],
    aliases: &[("Y", "Yes"), ("N", "No"), ("", "None")],
};

pub static INFLUENCE_ORDER: CategoryOrder = CategoryOrder {
    labels: &["Pro-Longevity", "Anti-Longevity", "Unclear", "None"],
    aliases: &[
        ("Pro Longevity", "Pro-Longevity"),
        ("Anti Longevity", "Anti-Longevity"),
        ("", "None"),
    ],
};

pub static DEVELOPMENT_ORDER: CategoryOrder = CategoryOrder {
    labels: &["High", "Medium", "Medium to Low", "Low", "None"],
    aliases: &[("Medium-Low", "Medium to Low"), ("", "None")],
};

pub static PHAROS_ORDER: CategoryOrder = CategoryOrder {
    labels: &["Tclin", "Tchem", "Tbio", "Tdark", "None"],
    aliases: &[("", "None")],
};

/// How a column's values behave in the engine
#[derive(Debug, Clone, Copy)]
pub enum ColumnKind {
    Symbol,
    Rank,
    Text,
    Category(&'static CategoryOrder),
}

/// Everything the engine and renderer need to know about one column
#[derive(Debug)]
pub struct ColumnDescriptor {
    pub id: ColumnId,
    pub label: &'static str,
    pub tooltip: &'static str,
    pub kind: ColumnKind,
    pub sortable: bool,
    pub filterable: bool,
    pub colorable: bool,
    pub required: bool,
}

static REGISTRY: [ColumnDescriptor; 12] = [
    ColumnDescriptor {
        id: ColumnId::Symbol,
        label: "Symbol",
        tooltip: "HGNC gene symbol of the transcription factor",
        kind: ColumnKind::Symbol,
        sortable: true,
        filterable: false,
        colorable: false,
        required: true,
    },
    ColumnDescriptor {
        id: ColumnId::OverallRank,
        label: "Overall Rank",
        tooltip: "Combined rank across all evidence sources (1 is strongest)",
        kind: ColumnKind::Rank,
        sortable: true,
        filterable: false,
        colorable: true,
        required: true,
    },
    ColumnDescriptor {
        id: ColumnId::AllDiseasesRank,
        label: "All Diseases Rank",
        tooltip: "Rank by association with age-related diseases",
        kind: ColumnKind::Rank,
        sortable: true,
        filterable: false,
        colorable: true,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::ArdsRank,
        label: "ARDs Rank",
        tooltip: "Rank by number of linked age-related diseases",
        kind: ColumnKind::Rank,
        sortable: true,
        filterable: false,
        colorable: true,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::StrongestLinkedDisease,
        label: "Strongest Linked Disease",
        tooltip: "Age-related disease with the strongest association",
        kind: ColumnKind::Text,
        sortable: false,
        filterable: true,
        colorable: false,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::AgingDbEntriesRank,
        label: "Aging DB Entries Rank",
        tooltip: "Rank by number of entries in ageing databases",
        kind: ColumnKind::Rank,
        sortable: true,
        filterable: false,
        colorable: true,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::HumanAgingEvidence,
        label: "Human Aging Evidence",
        tooltip: "Whether human studies link the gene to ageing",
        kind: ColumnKind::Category(&EVIDENCE_ORDER),
        sortable: true,
        filterable: true,
        colorable: false,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::MouseInfluence,
        label: "Mouse Influence",
        tooltip: "Effect on lifespan in mouse models",
        kind: ColumnKind::Category(&INFLUENCE_ORDER),
        sortable: true,
        filterable: true,
        colorable: false,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::WormInfluence,
        label: "Worm Influence",
        tooltip: "Effect on lifespan in C. elegans",
        kind: ColumnKind::Category(&INFLUENCE_ORDER),
        sortable: true,
        filterable: true,
        colorable: false,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::FlyInfluence,
        label: "Fly Influence",
        tooltip: "Effect on lifespan in D. melanogaster",
        kind: ColumnKind::Category(&INFLUENCE_ORDER),
        sortable: true,
        filterable: true,
        colorable: false,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::DevelopmentLevel,
        label: "Development Level",
        tooltip: "Maturity of drug development against the target",
        kind: ColumnKind::Category(&DEVELOPMENT_ORDER),
        sortable: true,
        filterable: true,
        colorable: false,
        required: false,
    },
    ColumnDescriptor {
        id: ColumnId::PharosTdl,
        label: "Pharos TDL",
        tooltip: "Pharos target development level",
        kind: ColumnKind::Category(&PHAROS_ORDER),
        sortable: true,
        filterable: true,
        colorable: false,
        required: false,
    },
];

impl ColumnId {
    /// All columns in display order
    pub const ALL: [ColumnId; 12] = [
        ColumnId::Symbol,
        ColumnId::OverallRank,
        ColumnId::AllDiseasesRank,
        ColumnId::ArdsRank,
        ColumnId::StrongestLinkedDisease,
        ColumnId::AgingDbEntriesRank,
        ColumnId::HumanAgingEvidence,
        ColumnId::MouseInfluence,
        ColumnId::WormInfluence,
        ColumnId::FlyInfluence,
        ColumnId::DevelopmentLevel,
        ColumnId::PharosTdl,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ColumnId::Symbol => "symbol",
            ColumnId::OverallRank => "overallRank",
            ColumnId::AllDiseasesRank => "allDiseasesRank",
            ColumnId::ArdsRank => "ardsRank",
            ColumnId::StrongestLinkedDisease => "strongestLinkedDisease",
            ColumnId::AgingDbEntriesRank => "agingDbEntriesRank",
            ColumnId::HumanAgingEvidence => "humanAgingEvidence",
            ColumnId::MouseInfluence => "mouseInfluence",
            ColumnId::WormInfluence => "wormInfluence",
            ColumnId::FlyInfluence => "flyInfluence",
            ColumnId::DevelopmentLevel => "developmentLevel",
            ColumnId::PharosTdl => "pharosTDL",
        }
    }

    /// Parse a column key; unknown keys yield `None`
    pub fn from_key(key: &str) -> Option<ColumnId> {
        ColumnId::ALL.into_iter().find(|id| id.key() == key)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static ColumnDescriptor {
        &REGISTRY[self.index()]
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    pub fn is_required(self) -> bool {
        self.descriptor().required
    }

    /// Rank columns, the ones the color mapper covers
    pub fn rank_columns() -> impl Iterator<Item = ColumnId> {
        ColumnId::ALL
            .into_iter()
            .filter(|id| id.descriptor().colorable)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Display headers in fixed order, as served in `columnNames`
pub fn column_names() -> Vec<&'static str> {
    ColumnId::ALL.iter().map(|id| id.label()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_indexed_by_display_order() {
        for (i, id) in ColumnId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(id.descriptor().id, *id);
        }
    }

    #[test]
    fn only_symbol_and_overall_rank_are_required() {
        let required: Vec<ColumnId> = ColumnId::ALL
            .into_iter()
            .filter(|id| id.is_required())
            .collect();
        assert_eq!(required, vec![ColumnId::Symbol, ColumnId::OverallRank]);
    }

    #[test]
    fn keys_round_trip() {
        for id in ColumnId::ALL {
            assert_eq!(ColumnId::from_key(id.key()), Some(id));
        }
        assert_eq!(ColumnId::from_key("nope"), None);
        assert_eq!(ColumnId::from_key("pharostdl"), None);
    }

    #[test]
    fn category_aliases_normalize() {
        assert_eq!(EVIDENCE_ORDER.normalize(" Y "), "Yes");
        assert_eq!(EVIDENCE_ORDER.normalize("n"), "No");
        assert_eq!(EVIDENCE_ORDER.normalize(""), "None");
        assert_eq!(EVIDENCE_ORDER.normalize("none"), "None");
        assert_eq!(DEVELOPMENT_ORDER.normalize("medium to low"), "Medium to Low");
        assert_eq!(PHAROS_ORDER.normalize("Tfoo"), "Tfoo");
    }

    #[test]
    fn unknown_labels_sort_after_known() {
        assert!(PHAROS_ORDER.ordinal("Tclin") < PHAROS_ORDER.ordinal("Tdark"));
        assert_eq!(PHAROS_ORDER.ordinal("Tfoo"), PHAROS_ORDER.labels.len());
    }
}
