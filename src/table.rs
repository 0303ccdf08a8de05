use crate::colors::ColorIndex;
use crate::columns::{ColumnDescriptor, ColumnId};
use crate::filter::{filter, filter_options};
use crate::loader::Dataset;
use crate::pagination::Pagination;
use crate::row::Row;
use crate::sort::{SortOptions, sort};
use crate::view_state::ViewState;

/// The grid over one loaded row set
///
/// Owns the base rows and the color index built from them; every view is
/// derived from a `ViewState` without touching either.
pub struct TableEngine {
    dataset: Dataset,
    colors: ColorIndex,
    options: SortOptions,
}

/// One rendered page of the grid
pub struct TableView<'a> {
    pub rows: Vec<&'a Row>,
    pub columns: Vec<&'static ColumnDescriptor>,
    pub pagination: Pagination,
    /// Rows left after search and filters
    pub matched: usize,
    /// Rows in the base set
    pub total: usize,
}

impl TableEngine {
    pub fn new(dataset: Dataset, options: SortOptions) -> Self {
        let rank_columns: Vec<ColumnId> = ColumnId::rank_columns().collect();
        let colors = ColorIndex::build(&dataset.rows, &rank_columns);
        TableEngine {
            dataset,
            colors,
            options,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn colors(&self) -> &ColorIndex {
        &self.colors
    }

    /// Filtered and sorted rows, before pagination
    pub fn matching_rows(&self, state: &ViewState) -> Vec<&Row> {
        let mut rows = filter(&self.dataset.rows, &state.search, &state.filters);
        sort(&mut rows, state.sort, self.options);
        rows
    }

    /// Pagination for a state, clamped against the filtered row count
    pub fn pagination(&self, state: &ViewState, matched: usize) -> Pagination {
        let page_index = i64::try_from(state.page_index).unwrap_or(i64::MAX);
        Pagination::new(matched, state.page_size).goto(page_index)
    }

    pub fn view(&self, state: &ViewState) -> TableView<'_> {
        let matching = self.matching_rows(state);
        let pagination = self.pagination(state, matching.len());
        let rows = pagination.page_slice(&matching).to_vec();
        let columns = state
            .visibility
            .visible_columns()
            .into_iter()
            .map(ColumnId::descriptor)
            .collect();

        TableView {
            rows,
            columns,
            pagination,
            matched: matching.len(),
            total: self.dataset.rows.len(),
        }
    }

    /// Distinct values offered by each filterable column
    pub fn filter_options(&self) -> Vec<(ColumnId, Vec<String>)> {
        ColumnId::ALL
            .into_iter()
            .filter(|column| column.descriptor().filterable)
            .map(|column| (column, filter_options(&self.dataset.rows, column)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::fixtures::row;
    use crate::row::Rank;

    fn engine(n: u32) -> TableEngine {
        let rows = (1..=n).map(|i| row(&format!("G{i:03}"), i)).collect();
        TableEngine::new(Dataset::new(rows), SortOptions::default())
    }

    #[test]
    fn view_pages_the_sorted_rows() {
        let engine = engine(45);
        let state = ViewState::from_query("sort=overallRank:desc&page=3");
        let view = engine.view(&state);
        assert_eq!(view.matched, 45);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.rows[0].symbol, "G005");
        assert_eq!(view.pagination.page_index(), 2);
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let engine = engine(10);
        let view = engine.view(&ViewState::from_query("page=99"));
        assert_eq!(view.pagination.page_index(), 0);
        assert_eq!(view.rows.len(), 10);
    }

    #[test]
    fn huge_page_numbers_clamp_to_the_last_page() {
        let engine = engine(45);
        for page in ["99", "9223372036854775807", "9223372036854775809", "18446744073709551615"] {
            let view = engine.view(&ViewState::from_query(&format!("page={page}")));
            assert_eq!(view.pagination.page_index(), 2, "page={page}");
            assert_eq!(view.rows.len(), 5);
        }
    }

    #[test]
    fn hidden_columns_are_not_in_view() {
        let engine = engine(3);
        let view = engine.view(&ViewState::from_query("cols=ardsRank:false"));
        assert_eq!(view.columns.len(), 11);
        assert!(view.columns.iter().all(|c| c.id != ColumnId::ArdsRank));
    }

    #[test]
    fn colors_do_not_depend_on_the_view() {
        let engine = engine(30);
        let before = engine.colors().color(ColumnId::OverallRank, Rank::new(12));
        let _ = engine.view(&ViewState::from_query("q=G01&sort=overallRank:desc"));
        assert_eq!(
            engine.colors().color(ColumnId::OverallRank, Rank::new(12)),
            before
        );
    }

    #[test]
    fn search_with_no_match_yields_one_empty_page() {
        let engine = engine(5);
        let view = engine.view(&ViewState::from_query("q=zzz"));
        assert!(view.rows.is_empty());
        assert_eq!(view.pagination.page_count(), 1);
    }
}
