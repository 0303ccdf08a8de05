//! Template contexts for the HTML pages
//!
//! Every link in the grid carries a complete, re-encoded view state, so any
//! page of any view can be bookmarked or shared.

use crate::colors::text_color;
use crate::columns::ColumnId;
use crate::loader::GeneDetail;
use crate::pagination::{PageSize, Pagination, ScrollReset};
use crate::row::CellRef;
use crate::sort::Direction;
use crate::table::TableEngine;
use crate::view_state::ViewState;
use serde_json::{Value, json};

/// Anchor the grid scrolls back to after a page size change
const GRID_ANCHOR: &str = "grid-top";

pub fn table_href(state: &ViewState) -> String {
    let query = state.to_query();
    if query.is_empty() {
        "/table".to_string()
    } else {
        format!("/table?{query}")
    }
}

fn export_href(state: &ViewState, format: &str) -> String {
    let query = state.to_query();
    if query.is_empty() {
        format!("/export?format={format}")
    } else {
        format!("/export?{query}&format={format}")
    }
}

pub fn gene_href(symbol: &str) -> String {
    format!("/gene/{}", urlencoding::encode(symbol))
}

fn page_href(state: &ViewState, pagination: Pagination) -> String {
    table_href(&state.with_page(pagination.page_index()))
}

fn page_size_href(state: &ViewState, pagination: Pagination, size: PageSize) -> String {
    let (resized, ScrollReset) = pagination.set_page_size(size);
    let next = state
        .with_page_size(size)
        .with_page(resized.page_index());
    format!("{}#{GRID_ANCHOR}", table_href(&next))
}

/// Context for the grid page
pub fn table_context(engine: &TableEngine, state: &ViewState) -> Value {
    let view = engine.view(state);
    let pagination = view.pagination;
    // Links are built from the clamped page, not the one in the URL
    let state = &state.with_page(pagination.page_index());

    let columns: Vec<Value> = view
        .columns
        .iter()
        .map(|column| {
            let active = state.sort.column == column.id;
            json!({
                "key": column.id.key(),
                "label": column.label,
                "tooltip": column.tooltip,
                "sortable": column.sortable,
                "sort_href": table_href(&state.with_sort_toggled(column.id)),
                "sort_indicator": match (active, state.sort.direction) {
                    (false, _) => "",
                    (true, Direction::Asc) => "▲",
                    (true, Direction::Desc) => "▼",
                },
            })
        })
        .collect();

    let rows: Vec<Value> = view
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<Value> = view
                .columns
                .iter()
                .map(|column| match row.cell(column.id) {
                    CellRef::Text(symbol) if column.id == ColumnId::Symbol => {
                        json!({ "text": symbol, "href": gene_href(symbol) })
                    }
                    CellRef::Rank(rank) if column.colorable => {
                        let background = engine.colors().color(column.id, rank);
                        json!({
                            "text": rank.to_string(),
                            "background": background,
                            "foreground": text_color(background),
                        })
                    }
                    _ => json!({ "text": row.display(column.id) }),
                })
                .collect();
            json!({ "symbol": row.symbol, "cells": cells })
        })
        .collect();

    let sizes: Vec<Value> = PageSize::ALL
        .into_iter()
        .map(|size| {
            json!({
                "size": size.get(),
                "active": size == pagination.page_size(),
                "href": page_size_href(state, pagination, size),
            })
        })
        .collect();

    let toggles: Vec<Value> = ColumnId::ALL
        .into_iter()
        .filter(|column| !column.is_required())
        .map(|column| {
            json!({
                "label": column.label(),
                "visible": state.visibility.is_visible(column),
                "href": table_href(&state.with_column_toggled(column)),
            })
        })
        .collect();

    let filters: Vec<Value> = engine
        .filter_options()
        .into_iter()
        .map(|(column, values)| {
            let allowed = state.filters.get(&column);
            let options: Vec<Value> = values
                .iter()
                .map(|value| {
                    json!({
                        "value": value,
                        "active": allowed.is_some_and(|set| set.contains(value)),
                        "href": table_href(&state.with_filter_toggled(column, value)),
                    })
                })
                .collect();
            json!({ "key": column.key(), "label": column.label(), "options": options })
        })
        .collect();

    let carried: Vec<Value> = state
        .carried_params()
        .into_iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();

    json!({
        "title": "Browse",
        "canonical": table_href(state),
        "search": state.search,
        "carried": carried,
        "columns": columns,
        "rows": rows,
        "toggles": toggles,
        "filters": filters,
        "has_filters": state.has_active_filters(),
        "clear_href": table_href(&state.without_filters()),
        "export_csv_href": export_href(state, "csv"),
        "export_xlsx_href": export_href(state, "xlsx"),
        "grid_anchor": GRID_ANCHOR,
        "pager": {
            "page": pagination.page_index() + 1,
            "page_count": pagination.page_count(),
            "is_first": pagination.is_first(),
            "is_last": pagination.is_last(),
            "first_href": page_href(state, pagination.first()),
            "prev_href": page_href(state, pagination.prev()),
            "next_href": page_href(state, pagination.next()),
            "last_href": page_href(state, pagination.last()),
            "first_row": pagination.first_row_number(),
            "last_row": pagination.last_row_number(),
            "matched": view.matched,
            "total": view.total,
            "sizes": sizes,
        },
    })
}

/// Context for a gene detail page
pub fn gene_context(detail: &GeneDetail) -> Value {
    let fields: Vec<Value> = ColumnId::ALL
        .into_iter()
        .skip(1)
        .map(|column| {
            json!({
                "label": column.label(),
                "tooltip": column.descriptor().tooltip,
                "value": detail.row.display(column),
            })
        })
        .collect();
    let extra: Vec<Value> = detail
        .extra
        .iter()
        .map(|(label, value)| json!({ "label": label, "value": value }))
        .collect();

    json!({
        "title": detail.row.symbol,
        "symbol": detail.row.symbol,
        "fields": fields,
        "extra": extra,
    })
}
