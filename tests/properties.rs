use proptest::prelude::*;
use proptest::test_runner::Config;
use tfdb::filter::{ColumnFilters, filter};
use tfdb::pagination::{PageSize, Pagination};
use tfdb::sort::{Direction, SortOptions, SortSpec, sort};
use tfdb::{ColumnId, Dataset, Rank, Row, TableEngine, ViewState};

const EVIDENCE: [&str; 3] = ["Yes", "No", "None"];
const PHAROS: [&str; 5] = ["Tclin", "Tchem", "Tbio", "Tdark", "None"];

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        "[A-Z][A-Z0-9]{0,4}",
        1u32..60,
        prop::option::of(1u32..30),
        prop::sample::select(EVIDENCE.to_vec()),
        prop::sample::select(PHAROS.to_vec()),
    )
        .prop_map(|(symbol, overall, ards, evidence, pharos)| Row {
            symbol,
            overall_rank: Rank::new(overall),
            all_diseases_rank: Rank::NotAvailable,
            ards_rank: ards.map_or(Rank::NotAvailable, Rank::new),
            strongest_linked_disease: "unknown".to_string(),
            aging_db_entries_rank: Rank::NotAvailable,
            human_aging_evidence: evidence.to_string(),
            mouse_influence: "None".to_string(),
            worm_influence: "None".to_string(),
            fly_influence: "None".to_string(),
            development_level: "None".to_string(),
            pharos_tdl: pharos.to_string(),
        })
}

fn filters_strategy() -> impl Strategy<Value = ColumnFilters> {
    (
        prop::sample::subsequence(EVIDENCE.to_vec(), 0..=EVIDENCE.len()),
        prop::sample::subsequence(PHAROS.to_vec(), 0..=PHAROS.len()),
    )
        .prop_map(|(evidence, pharos)| {
            let mut filters = ColumnFilters::new();
            filters.insert(
                ColumnId::HumanAgingEvidence,
                evidence.into_iter().map(String::from).collect(),
            );
            filters.insert(
                ColumnId::PharosTdl,
                pharos.into_iter().map(String::from).collect(),
            );
            filters
        })
}

fn columns_where(keep: impl Fn(ColumnId) -> bool) -> Vec<ColumnId> {
    ColumnId::ALL.into_iter().filter(|column| keep(*column)).collect()
}

fn view_state_strategy() -> impl Strategy<Value = ViewState> {
    let optional = columns_where(|column| !column.is_required());
    let optional_count = optional.len();
    (
        prop_oneof![
            Just(String::new()),
            "[A-Za-z0-9]([A-Za-z0-9 |:&%+=?#-]{0,10}[A-Za-z0-9])?",
        ],
        prop::collection::vec(
            (
                prop::sample::select(columns_where(|column| column.descriptor().filterable)),
                "[A-Za-z0-9]([A-Za-z0-9 |:&%+-]{0,8}[A-Za-z0-9])?",
            ),
            0..5,
        ),
        prop::sample::select(columns_where(|column| column.descriptor().sortable)),
        prop::sample::select(vec![Direction::Asc, Direction::Desc]),
        0usize..500,
        prop::sample::select(PageSize::ALL.to_vec()),
        prop::sample::subsequence(optional, 0..=optional_count),
    )
        .prop_map(
            |(search, filters, column, direction, page_index, page_size, hidden)| {
                let mut state = ViewState {
                    search,
                    sort: SortSpec::new(column, direction),
                    page_index,
                    page_size,
                    ..ViewState::default()
                };
                for (column, value) in filters {
                    state.filters.entry(column).or_default().insert(value);
                }
                for column in hidden {
                    state.visibility.set(column, false);
                }
                state
            },
        )
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn filter_keeps_an_ordered_subset_and_is_idempotent(
        rows in prop::collection::vec(row_strategy(), 0..40),
        query in "[a-z0-9]{0,2}",
        filters in filters_strategy()
    ) {
        let once = filter(&rows, &query, &filters);

        let mut remaining = rows.iter();
        prop_assert!(once
            .iter()
            .all(|kept| remaining.any(|row| std::ptr::eq(row, *kept))));

        let expected = rows
            .iter()
            .filter(|row| row.symbol.to_lowercase().contains(&query))
            .filter(|row| {
                filters.iter().all(|(column, allowed)| {
                    allowed.is_empty() || allowed.contains(&*row.display(*column))
                })
            })
            .count();
        prop_assert_eq!(once.len(), expected);

        let twice = filter(once.iter().copied(), &query, &filters);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn sorting_up_down_up_restores_the_first_order(
        rows in prop::collection::vec(row_strategy(), 0..40),
        column in prop::sample::select(ColumnId::ALL.to_vec())
    ) {
        let options = SortOptions::default();
        let mut sorted: Vec<&Row> = rows.iter().collect();
        sort(&mut sorted, SortSpec::new(column, Direction::Asc), options);
        let ascending = sorted.clone();

        sort(&mut sorted, SortSpec::new(column, Direction::Desc), options);
        prop_assert_eq!(sorted.len(), rows.len());
        sort(&mut sorted, SortSpec::new(column, Direction::Asc), options);
        prop_assert_eq!(sorted, ascending);
    }

    #[test]
    fn unavailable_ranks_trail_in_either_direction(
        rows in prop::collection::vec(row_strategy(), 0..40),
        direction in prop::sample::select(vec![Direction::Asc, Direction::Desc])
    ) {
        let mut sorted: Vec<&Row> = rows.iter().collect();
        sort(&mut sorted, SortSpec::new(ColumnId::ArdsRank, direction), SortOptions::default());

        let first_missing = sorted
            .iter()
            .position(|row| row.ards_rank == Rank::NotAvailable)
            .unwrap_or(sorted.len());
        prop_assert!(sorted[first_missing..]
            .iter()
            .all(|row| row.ards_rank == Rank::NotAvailable));
    }

    #[test]
    fn pages_stay_in_bounds_and_cover_every_row(
        total in 0usize..3000,
        size in prop::sample::select(PageSize::ALL.to_vec()),
        target in any::<i64>()
    ) {
        let pagination = Pagination::new(total, size);
        let count = pagination.page_count();
        prop_assert_eq!(count, total.div_ceil(size.get()).max(1));

        let moved = pagination.goto(target);
        for page in [moved, moved.next(), moved.prev(), moved.first(), moved.last()] {
            prop_assert!(page.page_index() < count);
        }

        let rows: Vec<usize> = (0..total).collect();
        let slice = moved.page_slice(&rows);
        prop_assert!(slice.len() <= size.get());
        prop_assert_eq!(slice.is_empty(), total == 0);

        let mut seen = Vec::new();
        let mut page = pagination.first();
        loop {
            seen.extend_from_slice(page.page_slice(&rows));
            if page.is_last() {
                break;
            }
            page = page.next();
        }
        prop_assert_eq!(seen, rows);
    }

    #[test]
    fn any_requested_page_clamps_to_the_last(
        page_index in any::<usize>(),
        matched in 0usize..500,
        size in prop::sample::select(PageSize::ALL.to_vec())
    ) {
        let engine = TableEngine::new(Dataset::new(Vec::new()), SortOptions::default());
        let state = ViewState {
            page_index,
            page_size: size,
            ..ViewState::default()
        };
        let pagination = engine.pagination(&state, matched);
        let last = pagination.page_count() - 1;
        prop_assert_eq!(pagination.page_index(), page_index.min(last));
    }

    #[test]
    fn view_state_round_trips_through_the_query(state in view_state_strategy()) {
        let query = state.to_query();
        prop_assert_eq!(ViewState::from_query(&query), state.clone());
        prop_assert_eq!(ViewState::from_query(&format!("?{query}")), state);
    }
}
