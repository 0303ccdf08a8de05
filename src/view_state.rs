use crate::columns::ColumnId;
use crate::filter::ColumnFilters;
use crate::pagination::PageSize;
use crate::sort::{Direction, SortSpec};
use std::collections::BTreeSet;

const PARAM_SEARCH: &str = "q";
const PARAM_FILTERS: &str = "filters";
const PARAM_SORT: &str = "sort";
const PARAM_COLUMNS: &str = "cols";
const PARAM_PAGE: &str = "page";
const PARAM_SIZE: &str = "size";

/// Separates `column:value` pairs inside one parameter
const PAIR_DELIMITER: &str = "|";

/// Which columns are shown; required columns can never be hidden
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: BTreeSet<ColumnId>,
}

impl ColumnVisibility {
    pub fn is_visible(&self, column: ColumnId) -> bool {
        !self.hidden.contains(&column)
    }

    pub fn set(&mut self, column: ColumnId, visible: bool) {
        if visible || column.is_required() {
            self.hidden.remove(&column);
        } else {
            self.hidden.insert(column);
        }
    }

    /// Visible columns in display order
    pub fn visible_columns(&self) -> Vec<ColumnId> {
        ColumnId::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }

    pub fn all_visible(&self) -> bool {
        self.hidden.is_empty()
    }
}

/// Everything needed to reconstruct one grid view from a link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub filters: ColumnFilters,
    pub sort: SortSpec,
    /// 0-based; clamped against the filtered row count when rendering
    pub page_index: usize,
    pub page_size: PageSize,
    pub visibility: ColumnVisibility,
}

impl ViewState {
    /// Decode a query string, falling back to defaults for anything invalid
    ///
    /// # Arguments
    /// * `query` - Raw query string, with or without the leading `?`
    ///
    /// # Returns
    /// * `ViewState` - The decoded state; decoding never fails
    ///
    /// # Examples
    /// ```
    /// use tfdb::ViewState;
    /// use tfdb::pagination::PageSize;
    ///
    /// let state = ViewState::from_query("q=foxo+3&size=50&page=oops");
    /// assert_eq!(state.search, "foxo 3");
    /// assert_eq!(state.page_size, PageSize::Fifty);
    /// assert_eq!(state.page_index, 0);
    /// ```
    pub fn from_query(query: &str) -> ViewState {
        let mut state = ViewState::default();

        for (key, value) in parse_query(query) {
            match key.as_str() {
                PARAM_SEARCH => state.search = value.trim().to_string(),
                PARAM_FILTERS => state.filters = decode_filters(&value),
                PARAM_SORT => state.sort = decode_sort(&value).unwrap_or_default(),
                PARAM_COLUMNS => state.visibility = decode_visibility(&value),
                PARAM_PAGE => {
                    state.page_index = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|page| *page >= 1)
                        .map_or(0, |page| page - 1)
                }
                PARAM_SIZE => {
                    state.page_size = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(PageSize::from_value)
                        .unwrap_or_default()
                }
                _ => {}
            }
        }

        state
    }

    /// Parameters that differ from the defaults, in canonical order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if !self.search.is_empty() {
            params.push((PARAM_SEARCH, self.search.clone()));
        }
        let filters = encode_filters(&self.filters);
        if !filters.is_empty() {
            params.push((PARAM_FILTERS, filters));
        }
        if self.sort != SortSpec::default() {
            params.push((PARAM_SORT, self.sort.to_string()));
        }
        if !self.visibility.all_visible() {
            params.push((PARAM_COLUMNS, encode_visibility(&self.visibility)));
        }
        if self.page_index > 0 {
            params.push((PARAM_PAGE, (self.page_index + 1).to_string()));
        }
        if self.page_size != PageSize::default() {
            params.push((PARAM_SIZE, self.page_size.get().to_string()));
        }

        params
    }

    /// Canonical query string, without the leading `?`
    pub fn to_query(&self) -> String {
        self.params()
            .into_iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parameters the search form must carry along besides the query itself
    pub fn carried_params(&self) -> Vec<(&'static str, String)> {
        self.params()
            .into_iter()
            .filter(|(key, _)| *key != PARAM_SEARCH && *key != PARAM_PAGE)
            .collect()
    }

    pub fn with_search(&self, search: &str) -> ViewState {
        ViewState {
            search: search.trim().to_string(),
            page_index: 0,
            ..self.clone()
        }
    }

    /// Add or remove one allowed value, returning to the first page
    pub fn with_filter_toggled(&self, column: ColumnId, value: &str) -> ViewState {
        let mut next = self.clone();
        let allowed = next.filters.entry(column).or_default();
        if !allowed.remove(value) {
            allowed.insert(value.to_string());
        }
        if allowed.is_empty() {
            next.filters.remove(&column);
        }
        next.page_index = 0;
        next
    }

    pub fn without_filters(&self) -> ViewState {
        ViewState {
            search: String::new(),
            filters: ColumnFilters::new(),
            page_index: 0,
            ..self.clone()
        }
    }

    pub fn with_sort_toggled(&self, column: ColumnId) -> ViewState {
        let sort = self.sort.toggle(column);
        ViewState {
            sort,
            page_index: if sort == self.sort { self.page_index } else { 0 },
            ..self.clone()
        }
    }

    pub fn with_page(&self, page_index: usize) -> ViewState {
        ViewState {
            page_index,
            ..self.clone()
        }
    }

    pub fn with_page_size(&self, page_size: PageSize) -> ViewState {
        ViewState {
            page_size,
            ..self.clone()
        }
    }

    pub fn with_column_toggled(&self, column: ColumnId) -> ViewState {
        let mut next = self.clone();
        let visible = next.visibility.is_visible(column);
        next.visibility.set(column, !visible);
        next
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty() || self.filters.values().any(|allowed| !allowed.is_empty())
    }
}

/// Split a raw query string into decoded key/value pairs
///
/// `+` is treated as a space, as browsers submit GET forms that way.
/// Pairs that do not decode are skipped.
fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

fn encode_filters(filters: &ColumnFilters) -> String {
    filters
        .iter()
        .flat_map(|(column, allowed)| {
            allowed
                .iter()
                .map(move |value| format!("{}:{}", column.key(), urlencoding::encode(value)))
        })
        .collect::<Vec<_>>()
        .join(PAIR_DELIMITER)
}

fn decode_filters(raw: &str) -> ColumnFilters {
    let mut filters = ColumnFilters::new();
    for pair in raw.split(PAIR_DELIMITER) {
        let Some((key, value)) = pair.split_once(':') else {
            continue;
        };
        let Some(column) = ColumnId::from_key(key.trim()) else {
            continue;
        };
        if !column.descriptor().filterable {
            continue;
        }
        let Ok(value) = urlencoding::decode(value) else {
            continue;
        };
        let value = value.trim();
        if !value.is_empty() {
            filters
                .entry(column)
                .or_default()
                .insert(value.to_string());
        }
    }
    filters
}

fn decode_sort(raw: &str) -> Option<SortSpec> {
    let (key, direction) = raw.trim().split_once(':')?;
    let column = ColumnId::from_key(key)?;
    if !column.descriptor().sortable {
        return None;
    }
    Some(SortSpec::new(column, Direction::parse(direction)?))
}

fn encode_visibility(visibility: &ColumnVisibility) -> String {
    ColumnId::ALL
        .into_iter()
        .filter(|column| !column.is_required())
        .map(|column| format!("{}:{}", column.key(), visibility.is_visible(column)))
        .collect::<Vec<_>>()
        .join(PAIR_DELIMITER)
}

fn decode_visibility(raw: &str) -> ColumnVisibility {
    let mut visibility = ColumnVisibility::default();
    for pair in raw.split(PAIR_DELIMITER) {
        let Some((key, flag)) = pair.split_once(':') else {
            continue;
        };
        let (Some(column), Ok(visible)) = (ColumnId::from_key(key.trim()), flag.trim().parse::<bool>())
        else {
            continue;
        };
        visibility.set(column, visible);
    }
    visibility
}
