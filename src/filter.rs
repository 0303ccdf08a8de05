use crate::columns::{ColumnId, ColumnKind};
use crate::row::Row;
use std::collections::{BTreeMap, BTreeSet};

/// Allowed values per column; a missing or empty set means no constraint
pub type ColumnFilters = BTreeMap<ColumnId, BTreeSet<String>>;

/// Rows matching the search text and every column filter
///
/// The query is a case-insensitive substring match on the symbol. Within a
/// column any allowed value matches; across columns all must match. Input
/// order is preserved.
///
/// # Arguments
/// * `rows` - Rows to narrow down, in display order
/// * `query` - Search text; blank matches every row
/// * `column_filters` - Allowed values per column
///
/// # Returns
/// * `Vec<&Row>` - The matching rows, a subsequence of the input
///
/// # Examples
/// ```
/// use tfdb::filter::{ColumnFilters, filter};
/// use tfdb::{ColumnId, CsvRowSource, RowSource};
///
/// let rows = CsvRowSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
///     .load()
///     .unwrap()
///     .rows;
/// let mut filters = ColumnFilters::new();
/// filters
///     .entry(ColumnId::HumanAgingEvidence)
///     .or_default()
///     .insert("Yes".to_string());
///
/// let matched = filter(&rows, "foxo", &filters);
/// assert!(matched.iter().all(|row| row.symbol.starts_with("FOXO")));
/// ```
pub fn filter<'a, I>(rows: I, query: &str, column_filters: &ColumnFilters) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let needle = query.trim().to_lowercase();
    let active: Vec<(ColumnId, BTreeSet<&str>)> = column_filters
        .iter()
        .filter(|(_, allowed)| !allowed.is_empty())
        .map(|(column, allowed)| (*column, allowed.iter().map(|v| v.trim()).collect()))
        .collect();

    rows.into_iter()
        .filter(|row| needle.is_empty() || row.symbol.to_lowercase().contains(&needle))
        .filter(|row| {
            active
                .iter()
                .all(|(column, allowed)| allowed.contains(row.display(*column).trim()))
        })
        .collect()
}

/// Distinct values of a filterable column, for the filter controls
///
/// Category columns list their values in table order, text columns
/// alphabetically. Non-filterable columns have no options.
pub fn filter_options(rows: &[Row], column: ColumnId) -> Vec<String> {
    let descriptor = column.descriptor();
    if !descriptor.filterable {
        return Vec::new();
    }

    let distinct: BTreeSet<String> = rows
        .iter()
        .map(|row| row.display(column).trim().to_string())
        .collect();
    let mut values: Vec<String> = distinct.into_iter().collect();

    if let ColumnKind::Category(order) = descriptor.kind {
        values.sort_by(|a, b| order.ordinal(a).cmp(&order.ordinal(b)).then_with(|| a.cmp(b)));
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::fixtures::row;

    fn sample() -> Vec<Row> {
        let mut yes = row("FOXO3", 1);
        yes.human_aging_evidence = "Yes".to_string();
        yes.pharos_tdl = "Tchem".to_string();
        let mut no = row("FOXA1", 2);
        no.human_aging_evidence = "No".to_string();
        no.pharos_tdl = "Tclin".to_string();
        let mut other = row("MYC", 3);
        other.human_aging_evidence = "Yes".to_string();
        other.pharos_tdl = "Tclin".to_string();
        vec![yes, no, other]
    }

    fn filters(pairs: &[(ColumnId, &[&str])]) -> ColumnFilters {
        pairs
            .iter()
            .map(|(c, values)| (*c, values.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    fn symbols(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.symbol.clone()).collect()
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let rows = sample();
        let out = filter(&rows, "fox", &ColumnFilters::new());
        assert_eq!(symbols(&out), vec!["FOXO3", "FOXA1"]);
        assert_eq!(filter(&rows, "  ", &ColumnFilters::new()).len(), 3);
    }

    #[test]
    fn or_within_column_and_across_columns() {
        let rows = sample();
        let f = filters(&[(ColumnId::PharosTdl, &["Tclin", "Tchem"])]);
        assert_eq!(filter(&rows, "", &f).len(), 3);

        let f = filters(&[
            (ColumnId::PharosTdl, &["Tclin"]),
            (ColumnId::HumanAgingEvidence, &["Yes"]),
        ]);
        assert_eq!(symbols(&filter(&rows, "", &f)), vec!["MYC"]);
    }

    #[test]
    fn empty_allow_list_is_no_constraint() {
        let rows = sample();
        let f = filters(&[(ColumnId::PharosTdl, &[])]);
        assert_eq!(filter(&rows, "", &f).len(), 3);
    }

    #[test]
    fn allowed_values_are_trimmed() {
        let rows = sample();
        let f = filters(&[(ColumnId::HumanAgingEvidence, &[" No "])]);
        assert_eq!(symbols(&filter(&rows, "", &f)), vec!["FOXA1"]);
    }

    #[test]
    fn options_follow_category_order() {
        let rows = sample();
        assert_eq!(filter_options(&rows, ColumnId::PharosTdl), vec!["Tclin", "Tchem"]);
        assert_eq!(filter_options(&rows, ColumnId::HumanAgingEvidence), vec!["Yes", "No"]);
        assert!(filter_options(&rows, ColumnId::OverallRank).is_empty());
    }
}
