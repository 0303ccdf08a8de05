use crate::columns::ColumnId;
use crate::row::{Rank, Row};
use std::collections::{BTreeSet, HashMap};

/// Ten-step palette, best rank first (dark) to worst rank last (light)
pub const PALETTE: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// Color for ranks that are not available; not part of the palette
pub const NEUTRAL: &str = "#d9d9d9";

/// Per-column mapping from observed rank value to palette color
///
/// Built once from the full unfiltered row set so that a given value keeps
/// its color whatever the current filter, sort or page.
#[derive(Debug, Clone, Default)]
pub struct ColorIndex {
    columns: HashMap<ColumnId, HashMap<u32, &'static str>>,
}

impl ColorIndex {
    /// Map every observed rank of each column onto the palette
    ///
    /// Values are normalized over the column's observed `[min, max]`, so the
    /// best rank gets the darkest color and the worst the lightest.
    ///
    /// # Arguments
    /// * `rows` - The full base row set, never a filtered subset
    /// * `rank_columns` - Columns to index; other columns stay neutral
    ///
    /// # Returns
    /// * `ColorIndex` - Lookup from `(column, rank)` to a palette color
    ///
    /// # Examples
    /// ```
    /// use tfdb::colors::{ColorIndex, NEUTRAL, PALETTE};
    /// use tfdb::{ColumnId, CsvRowSource, Rank, RowSource};
    ///
    /// let rows = CsvRowSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    ///     .load()
    ///     .unwrap()
    ///     .rows;
    /// let index = ColorIndex::build(&rows, &[ColumnId::OverallRank]);
    /// assert_eq!(index.color(ColumnId::OverallRank, Rank::new(1)), PALETTE[0]);
    /// assert_eq!(index.color(ColumnId::ArdsRank, Rank::NotAvailable), NEUTRAL);
    /// ```
    pub fn build<'a, I>(rows: I, rank_columns: &[ColumnId]) -> Self
    where
        I: IntoIterator<Item = &'a Row> + Clone,
    {
        let columns = rank_columns
            .iter()
            .map(|column| {
                let observed: BTreeSet<u32> = rows
                    .clone()
                    .into_iter()
                    .filter_map(|row| row.rank(*column).and_then(Rank::value))
                    .collect();
                (*column, column_colors(&observed))
            })
            .collect();

        ColorIndex { columns }
    }

    /// Color of a rank in a column; unknown columns and values are neutral
    pub fn color(&self, column: ColumnId, rank: Rank) -> &'static str {
        let Some(value) = rank.value() else {
            return NEUTRAL;
        };
        self.columns
            .get(&column)
            .and_then(|colors| colors.get(&value))
            .copied()
            .unwrap_or(NEUTRAL)
    }
}

fn column_colors(observed: &BTreeSet<u32>) -> HashMap<u32, &'static str> {
    let (Some(&min), Some(&max)) = (observed.first(), observed.last()) else {
        return HashMap::new();
    };

    observed
        .iter()
        .map(|&value| (value, PALETTE[palette_index(value, min, max)]))
        .collect()
}

/// Readable text color on top of a cell background
pub fn text_color(background: &str) -> &'static str {
    match PALETTE.iter().position(|color| *color == background) {
        Some(index) if index < 6 => "#ffffff",
        _ => "#000000",
    }
}

/// Palette slot for a value normalized over `[min, max]`
pub fn palette_index(value: u32, min: u32, max: u32) -> usize {
    if max <= min {
        return 0;
    }
    let normalized = ((value as f64 - min as f64) / (max as f64 - min as f64)).clamp(0.0, 1.0);
    let index = (normalized * (PALETTE.len() - 1) as f64).floor() as usize;
    index.min(PALETTE.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::fixtures::row;

    #[test]
    fn palette_has_ten_distinct_entries_and_neutral_is_separate() {
        let distinct: BTreeSet<&str> = PALETTE.iter().copied().collect();
        assert_eq!(distinct.len(), 10);
        assert!(!distinct.contains(NEUTRAL));
    }

    #[test]
    fn extremes_map_to_first_and_last() {
        assert_eq!(palette_index(1, 1, 100), 0);
        assert_eq!(palette_index(100, 1, 100), 9);
        assert_eq!(palette_index(50, 1, 100), 4);
        assert_eq!(palette_index(7, 7, 7), 0);
    }

    #[test]
    fn dark_colors_get_light_text() {
        assert_eq!(text_color(PALETTE[0]), "#ffffff");
        assert_eq!(text_color(PALETTE[9]), "#000000");
        assert_eq!(text_color(NEUTRAL), "#000000");
    }

    #[test]
    fn single_value_maps_to_first_color() {
        let rows = vec![row("A", 5), row("B", 5)];
        let index = ColorIndex::build(&rows, &[ColumnId::OverallRank]);
        assert_eq!(index.color(ColumnId::OverallRank, Rank::new(5)), PALETTE[0]);
    }

    #[test]
    fn unavailable_is_neutral() {
        let rows = vec![row("A", 1), row("B", 2)];
        let index = ColorIndex::build(&rows, &[ColumnId::OverallRank, ColumnId::ArdsRank]);
        assert_eq!(index.color(ColumnId::ArdsRank, Rank::NotAvailable), NEUTRAL);
        assert_eq!(index.color(ColumnId::OverallRank, Rank::new(1)), PALETTE[0]);
        assert_eq!(index.color(ColumnId::OverallRank, Rank::new(2)), PALETTE[9]);
    }

    #[test]
    fn rebuilding_from_a_different_base_can_change_colors() {
        let rows: Vec<Row> = (1..=10).map(|i| row(&format!("G{i}"), i)).collect();
        let full = ColorIndex::build(&rows, &[ColumnId::OverallRank]);
        let half = ColorIndex::build(&rows[..5], &[ColumnId::OverallRank]);
        assert_ne!(
            full.color(ColumnId::OverallRank, Rank::new(5)),
            half.color(ColumnId::OverallRank, Rank::new(5))
        );
    }
}
