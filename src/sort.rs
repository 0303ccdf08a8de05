use crate::columns::{ColumnId, ColumnKind};
use crate::row::{Rank, Row};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn flip(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Direction> {
        match raw {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// Active sort target and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: ColumnId,
    pub direction: Direction,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            column: ColumnId::OverallRank,
            direction: Direction::Asc,
        }
    }
}

impl SortSpec {
    pub fn new(column: ColumnId, direction: Direction) -> Self {
        SortSpec { column, direction }
    }

    /// Header click: same column flips, another column starts ascending
    ///
    /// Clicking a column without a comparator changes nothing.
    pub fn toggle(self, column: ColumnId) -> SortSpec {
        if !column.descriptor().sortable {
            return self;
        }
        if column == self.column {
            SortSpec::new(column, self.direction.flip())
        } else {
            SortSpec::new(column, Direction::Asc)
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column.key(), self.direction.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SortOptions {
    pub case_sensitive_symbols: bool,
}

/// Sort rows in place
///
/// Rank columns put unavailable values last in both directions; ties on
/// rank or category are broken by symbol ascending whatever the direction.
/// Sorting on a column without a comparator is a no-op.
///
/// # Arguments
/// * `rows` - Rows to reorder in place
/// * `spec` - Column and direction to sort by
/// * `options` - Whether symbols compare case-sensitively
///
/// # Examples
/// ```
/// use tfdb::sort::{Direction, SortOptions, SortSpec, sort};
/// use tfdb::{ColumnId, CsvRowSource, Row, RowSource};
///
/// let rows = CsvRowSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
///     .load()
///     .unwrap()
///     .rows;
/// let mut sorted: Vec<&Row> = rows.iter().collect();
/// sort(
///     &mut sorted,
///     SortSpec::new(ColumnId::OverallRank, Direction::Desc),
///     SortOptions::default(),
/// );
/// assert_eq!(sorted.last().unwrap().overall_rank.value(), Some(1));
/// ```
pub fn sort(rows: &mut [&Row], spec: SortSpec, options: SortOptions) {
    let descriptor = spec.column.descriptor();
    if !descriptor.sortable {
        return;
    }

    match descriptor.kind {
        ColumnKind::Symbol => {
            rows.sort_by(|a, b| spec.direction.apply(compare_symbols(a, b, options)));
        }
        ColumnKind::Rank => {
            rows.sort_by(|a, b| {
                compare_ranks(
                    a.rank(spec.column).unwrap_or(Rank::NotAvailable),
                    b.rank(spec.column).unwrap_or(Rank::NotAvailable),
                    spec.direction,
                )
                .then_with(|| tie_break(a, b))
            });
        }
        ColumnKind::Category(order) => {
            rows.sort_by(|a, b| {
                let a_pos = order.ordinal(&a.display(spec.column));
                let b_pos = order.ordinal(&b.display(spec.column));
                spec.direction
                    .apply(a_pos.cmp(&b_pos))
                    .then_with(|| tie_break(a, b))
            });
        }
        ColumnKind::Text => {}
    }
}

fn compare_ranks(a: Rank, b: Rank, direction: Direction) -> Ordering {
    match (a.value(), b.value()) {
        (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_symbols(a: &Row, b: &Row, options: SortOptions) -> Ordering {
    if options.case_sensitive_symbols {
        a.symbol.cmp(&b.symbol)
    } else {
        a.symbol
            .to_lowercase()
            .cmp(&b.symbol.to_lowercase())
            .then_with(|| a.symbol.cmp(&b.symbol))
    }
}

fn tie_break(a: &Row, b: &Row) -> Ordering {
    compare_symbols(a, b, SortOptions::default())
}
