use axum::{
    Form, Json, Router,
    extract::{Path, Query, RawQuery, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use handlebars::{Handlebars, TemplateError};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::docs;
use crate::downloader::{ExportRequest, export_csv, export_xlsx};
use crate::error::{DataError, MailError};
use crate::loader::{CsvRowSource, Dataset, GeneDetail, RowSource};
use crate::mailer::{ContactMessage, ContactRelay, DisabledRelay, Mailer};
use crate::pages;
use crate::sort::SortOptions;
use crate::table::TableEngine;
use crate::view_state::ViewState;

const TEMPLATES: [(&str, &str); 6] = [
    ("home", include_str!("./static/home.hbs")),
    ("table", include_str!("./static/table.hbs")),
    ("gene", include_str!("./static/gene.hbs")),
    ("docs", include_str!("./static/docs.hbs")),
    ("contact", include_str!("./static/contact.hbs")),
    ("error", include_str!("./static/error.hbs")),
];

const PARTIALS: [(&str, &str); 2] = [
    ("head", include_str!("./static/head.hbs")),
    ("foot", include_str!("./static/foot.hbs")),
];

/// Shown instead of transport details when a contact message cannot be relayed
const CONTACT_UNAVAILABLE: &str =
    "Your message could not be sent right now. Please try again later.";

pub struct AppState {
    pub config: Config,
    source: Arc<dyn RowSource>,
    relay: Arc<dyn ContactRelay>,
    templates: Handlebars<'static>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

impl StatusResponse {
    fn error(message: impl Into<String>) -> Self {
        StatusResponse {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct DetailQuery {
    symbol: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// `format` parameter of an export query; CSV when absent
    fn from_query(query: &str) -> Option<ExportFormat> {
        let value = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "format")
            .map(|(_, value)| value);
        match value {
            None | Some("csv") => Some(ExportFormat::Csv),
            Some("xlsx") => Some(ExportFormat::Xlsx),
            Some(_) => None,
        }
    }
}

impl AppState {
    pub fn new(
        config: Config,
        source: Arc<dyn RowSource>,
        relay: Arc<dyn ContactRelay>,
    ) -> Result<Self, TemplateError> {
        let mut templates = Handlebars::new();
        for (name, template) in PARTIALS {
            templates.register_partial(name, template)?;
        }
        for (name, template) in TEMPLATES {
            templates.register_template_string(name, template)?;
        }

        Ok(AppState {
            config,
            source,
            relay,
            templates,
        })
    }

    fn sort_options(&self) -> SortOptions {
        SortOptions {
            case_sensitive_symbols: self.config.case_sensitive_symbols,
        }
    }

    /// Read the row set on the blocking pool; parsing the CSV is file IO
    async fn load_dataset(&self) -> Result<Dataset, DataError> {
        let source = self.source.clone();
        tokio::task::spawn_blocking(move || source.load())
            .await
            .map_err(|e| DataError::Task(e.to_string()))?
    }

    async fn load_detail(&self, symbol: &str) -> Result<GeneDetail, DataError> {
        let source = self.source.clone();
        let symbol = symbol.to_string();
        tokio::task::spawn_blocking(move || source.detail(&symbol))
            .await
            .map_err(|e| DataError::Task(e.to_string()))?
    }

    /// Load the rows for one page view
    async fn load_engine(&self) -> Result<TableEngine, DataError> {
        let dataset = self.load_dataset().await?;
        Ok(TableEngine::new(dataset, self.sort_options()))
    }

    /// Validate and relay a contact message
    async fn deliver(&self, message: &ContactMessage) -> Result<(), MailError> {
        message.validate()?;
        let relay = self.relay.clone();
        let outgoing = message.clone();
        tokio::task::spawn_blocking(move || relay.send(&outgoing))
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?
    }

    fn render(&self, status: StatusCode, name: &str, data: &Value) -> Response {
        match self.templates.render(name, data) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!("failed to render template '{}': {}", name, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
            }
        }
    }

    /// Blocking error page with a link that retries the same view
    fn data_unavailable(&self, err: &DataError, retry_href: &str) -> Response {
        error!("dataset unavailable: {}", err);
        self.render(
            StatusCode::SERVICE_UNAVAILABLE,
            "error",
            &json!({
                "title": "Data unavailable",
                "heading": "The dataset could not be loaded",
                "message": "Please try again in a moment.",
                "link_href": retry_href,
                "link_label": "Retry",
            }),
        )
    }

    fn not_found(&self, symbol: &str) -> Response {
        self.render(
            StatusCode::NOT_FOUND,
            "error",
            &json!({
                "title": "Not found",
                "heading": "Gene not found",
                "message": format!("There is no transcription factor with symbol '{symbol}'."),
                "link_href": "/table",
                "link_label": "Back to the table",
            }),
        )
    }
}

/// Build the application router
///
/// # Arguments
/// * `state` - Shared templates, row source and contact relay
///
/// # Returns
/// * `Router` - Every page, the JSON endpoints, the export route and the
///   static assets under `/static`
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
/// use tfdb::app::{AppState, router};
/// use tfdb::mailer::DisabledRelay;
/// use tfdb::{Config, CsvRowSource};
///
/// # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let source = Arc::new(CsvRowSource::new(config.data_dir.clone()));
/// let state = AppState::new(config, source, Arc::new(DisabledRelay))?;
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
/// axum::serve(listener, router(Arc::new(state))).await?;
/// # Ok(())
/// # }
/// ```
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(serve_home))
        .route("/table", get(serve_table))
        .route("/data", get(get_data))
        .route("/data/detail", get(get_detail))
        .route("/gene/:symbol", get(serve_gene))
        .route("/docs", get(serve_docs))
        .route("/contact", get(serve_contact).post(submit_contact))
        .route("/export", get(export_table))
        .nest_service("/static", static_dir)
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let source: Arc<dyn RowSource> = Arc::new(CsvRowSource::new(config.data_dir.clone()));
    let relay: Arc<dyn ContactRelay> = match &config.smtp {
        Some(smtp) => match Mailer::new(smtp) {
            Ok(mailer) => {
                info!("contact form relays through {}:{}", smtp.host, smtp.port);
                Arc::new(mailer)
            }
            Err(e) => {
                warn!("SMTP settings rejected, contact form disabled: {}", e);
                Arc::new(DisabledRelay)
            }
        },
        None => {
            warn!("no SMTP settings, contact form disabled");
            Arc::new(DisabledRelay)
        }
    };

    let bind = config.bind.clone();
    let app_state = Arc::new(AppState::new(config, source, relay)?);
    let app = router(app_state);

    let listener = TcpListener::bind(&bind).await?;
    info!("Listening on http://{}", bind);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_home(State(state): State<Arc<AppState>>) -> Response {
    // The home page still renders when the data is broken
    let total = match state.load_dataset().await {
        Ok(dataset) => Some(dataset.total),
        Err(e) => {
            warn!("home page without row count: {}", e);
            None
        }
    };
    state.render(
        StatusCode::OK,
        "home",
        &json!({ "title": "Home", "total": total }),
    )
}

async fn serve_table(State(state): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let view_state = ViewState::from_query(query.as_deref().unwrap_or_default());
    match state.load_engine().await {
        Ok(engine) => state.render(
            StatusCode::OK,
            "table",
            &pages::table_context(&engine, &view_state),
        ),
        Err(e) => state.data_unavailable(&e, &pages::table_href(&view_state)),
    }
}

async fn get_data(State(state): State<Arc<AppState>>) -> Response {
    match state.load_dataset().await {
        Ok(dataset) => Json(dataset).into_response(),
        Err(e) => {
            error!("GET /data failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusResponse::error("dataset unavailable")),
            )
                .into_response()
        }
    }
}

async fn get_detail(
    Query(params): Query<DetailQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let symbol = params.symbol.unwrap_or_default();
    match state.load_detail(&symbol).await {
        Ok(detail) => {
            let extra: Vec<Value> = detail
                .extra
                .iter()
                .map(|(label, value)| json!({ "label": label, "value": value }))
                .collect();
            Json(json!({ "row": detail.row, "extra": extra })).into_response()
        }
        Err(e) if e.is_not_found() => (
            StatusCode::NOT_FOUND,
            Json(StatusResponse::error(e.to_string())),
        )
            .into_response(),
        Err(e) => {
            error!("detail for '{}' failed: {}", symbol, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusResponse::error("dataset unavailable")),
            )
                .into_response()
        }
    }
}

async fn serve_gene(Path(symbol): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    match state.load_detail(&symbol).await {
        Ok(detail) => state.render(StatusCode::OK, "gene", &pages::gene_context(&detail)),
        Err(e) if e.is_not_found() => state.not_found(&symbol),
        Err(e) => state.data_unavailable(&e, &pages::gene_href(&symbol)),
    }
}

async fn serve_docs(State(state): State<Arc<AppState>>) -> Response {
    match docs::load_tables(&state.config.docs_dir()) {
        Ok(tables) => state.render(
            StatusCode::OK,
            "docs",
            &json!({ "title": "Documentation", "tables": tables }),
        ),
        Err(e) => state.data_unavailable(&e, "/docs"),
    }
}

async fn serve_contact(State(state): State<Arc<AppState>>) -> Response {
    state.render(
        StatusCode::OK,
        "contact",
        &json!({ "title": "Contact", "form": ContactMessage::default() }),
    )
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Form(message): Form<ContactMessage>,
) -> Response {
    let message = message.trimmed();
    match state.deliver(&message).await {
        Ok(()) => {
            info!("contact message relayed");
            state.render(
                StatusCode::OK,
                "contact",
                &json!({ "title": "Contact", "form": ContactMessage::default(), "sent": true }),
            )
        }
        Err(e) if e.is_client_error() => state.render(
            StatusCode::BAD_REQUEST,
            "contact",
            &json!({ "title": "Contact", "form": message, "error": e.to_string() }),
        ),
        Err(e) => {
            error!("contact relay failed: {}", e);
            state.render(
                StatusCode::SERVICE_UNAVAILABLE,
                "contact",
                &json!({ "title": "Contact", "form": message, "error": CONTACT_UNAVAILABLE }),
            )
        }
    }
}

async fn export_table(State(state): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let query = query.unwrap_or_default();
    let Some(format) = ExportFormat::from_query(&query) else {
        return (StatusCode::BAD_REQUEST, "Unsupported export format").into_response();
    };

    let view_state = ViewState::from_query(&query);
    let engine = match state.load_engine().await {
        Ok(engine) => engine,
        Err(e) => return state.data_unavailable(&e, &pages::table_href(&view_state)),
    };

    let request = ExportRequest {
        rows: engine.matching_rows(&view_state),
        visibility: &view_state.visibility,
        sort: view_state.sort,
        options: state.sort_options(),
        dataset_name: &state.config.dataset_name,
    };
    let now = Local::now();
    let result = match format {
        ExportFormat::Csv => export_csv(&request, now),
        ExportFormat::Xlsx => export_xlsx(&request, now),
    };
    let export = match result {
        Ok(export) => export,
        Err(e) => {
            error!("{}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Export failed").into_response();
        }
    };

    info!("exported {} as {}", request.rows.len(), export.filename);
    (
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.bytes,
    )
        .into_response()
}
