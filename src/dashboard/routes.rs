//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`;
//! nothing in it is written after startup, so handlers never lock.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::chart::SalesChart;
use crate::config::{AppConfig, GeneralConfig, InputsConfig};
use crate::forecast::{self, RestockAdvice};
use crate::history;
use crate::registry::ModelRegistry;
use crate::types::{Advisory, ForecastError, Period, PriceTrack, ProductSelection};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub registry: ModelRegistry,
    pub app: GeneralConfig,
    pub inputs: InputsConfig,
    pub started_at: DateTime<Utc>,
}

impl DashboardState {
    pub fn new(registry: ModelRegistry, cfg: &AppConfig) -> Self {
        Self {
            registry,
            app: cfg.app.clone(),
            inputs: cfg.inputs.clone(),
            started_at: Utc::now(),
        }
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{amount:.2}", self.app.currency_symbol)
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub started_at: String,
    pub uptime_secs: i64,
    pub product_models: usize,
    pub max_product_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommodityOption {
    pub id: PriceTrack,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionsResponse {
    pub year_min: i32,
    pub year_max: i32,
    pub default_year: i32,
    pub default_month: u32,
    pub products: Vec<ProductSelection>,
    pub default_product: ProductSelection,
    pub history_window: usize,
    pub commodities: Vec<CommodityOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceRequest {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceResponse {
    pub request_id: Uuid,
    pub commodity: PriceTrack,
    pub period: Period,
    pub price: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestockView {
    pub commodity: PriceTrack,
    pub current_price: f64,
    pub previous_price: f64,
    pub previous_period: Period,
    pub advisory: Advisory,
    pub price_message: String,
    pub advice_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesResponse {
    pub request_id: Uuid,
    pub product: ProductSelection,
    pub prediction: f64,
    pub message: String,
    pub chart: SalesChart,
    pub restock: Option<RestockView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        let status = match &self {
            ForecastError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ForecastError::UnknownProduct(_) => StatusCode::NOT_FOUND,
            ForecastError::Prediction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ForecastError::Load { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(kind = self.kind(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();
    Json(StatusResponse {
        name: state.app.name.clone(),
        started_at: state.started_at.to_rfc3339(),
        uptime_secs: uptime,
        product_models: state.registry.product_count(),
        max_product_id: state.registry.max_product_id(),
    })
}

/// GET /api/options
pub async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let inputs = &state.inputs;
    Json(OptionsResponse {
        year_min: inputs.year_min,
        year_max: inputs.year_max,
        default_year: inputs.default_year,
        default_month: inputs.default_month,
        products: inputs.selectable(),
        default_product: ProductSelection::Product(1),
        history_window: inputs.history_window,
        commodities: PriceTrack::all()
            .iter()
            .map(|&id| CommodityOption { id, label: id.label() })
            .collect(),
    })
}

/// POST /api/predict/price/:commodity
pub async fn predict_price(
    State(state): State<AppState>,
    Path(commodity): Path<String>,
    body: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<PriceResponse>, ForecastError> {
    let commodity: PriceTrack = commodity.parse()?;
    let Json(req) = body.map_err(|e| ForecastError::InvalidInput(e.body_text()))?;
    let period = Period::new(req.year, req.month);
    state.inputs.validate_period(period)?;

    let price = forecast::predict_price(state.registry.price_estimator(commodity), period)?;
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        commodity = %commodity,
        period = %period,
        price = %format!("{price:.2}"),
        "Price predicted"
    );

    Ok(Json(PriceResponse {
        request_id,
        commodity,
        period,
        price,
        message: format!(
            "Predicted {} Price for {period}: {}",
            commodity.label(),
            state.money(price)
        ),
    }))
}

/// POST /api/predict/sales (multipart form)
pub async fn predict_sales(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SalesResponse>, ForecastError> {
    let multipart = multipart.map_err(|e| ForecastError::InvalidInput(e.body_text()))?;
    let form = SalesForm::read(multipart).await?;

    let selection: ProductSelection = form
        .product
        .as_deref()
        .ok_or_else(|| ForecastError::InvalidInput("product is required".into()))?
        .parse()?;
    state.inputs.validate_product(selection)?;

    let period = Period::new(
        parse_field(form.year.as_deref(), "year")?.unwrap_or(state.inputs.default_year),
        parse_field(form.month.as_deref(), "month")?.unwrap_or(state.inputs.default_month),
    );
    state.inputs.validate_period(period)?;

    let history = history::resolve(form.history.as_deref(), form.upload.as_deref())?;
    if history.is_empty() {
        return Err(ForecastError::InvalidInput(
            "enter past sales or upload a CSV file before predicting".into(),
        ));
    }

    let sales = forecast::forecast_sales(&state.registry, selection, history, period)?;
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        product = %selection,
        history_len = sales.history.len(),
        prediction = %format!("{:.2}", sales.prediction),
        advisory = ?sales.restock.as_ref().map(|r| r.advisory),
        "Sales predicted"
    );

    let restock = sales.restock.as_ref().map(|r| restock_view(&state, r));
    Ok(Json(SalesResponse {
        request_id,
        product: selection,
        prediction: sales.prediction,
        message: format!(
            "Predicted Sales for Product ID {selection}: {:.2}",
            sales.prediction
        ),
        chart: SalesChart::new(&sales.history, sales.prediction),
        restock,
    }))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn restock_view(state: &DashboardState, advice: &RestockAdvice) -> RestockView {
    RestockView {
        commodity: advice.commodity,
        current_price: advice.current_price,
        previous_price: advice.previous_price,
        previous_period: advice.previous_period,
        advisory: advice.advisory,
        price_message: format!(
            "Predicted {} Price: {}",
            advice.commodity.label(),
            state.money(advice.current_price)
        ),
        advice_message: advice.advisory.message(),
    }
}

/// Raw fields of the sales form, before validation.
#[derive(Debug, Default)]
struct SalesForm {
    product: Option<String>,
    year: Option<String>,
    month: Option<String>,
    history: Option<String>,
    upload: Option<Vec<u8>>,
}

impl SalesForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ForecastError> {
        let bad_form = |e: axum::extract::multipart::MultipartError| {
            ForecastError::InvalidInput(format!("malformed form data: {e}"))
        };

        let mut form = SalesForm::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let named = field.file_name().is_some_and(|n| !n.is_empty());
                    let data = field.bytes().await.map_err(bad_form)?;
                    // Browsers submit an empty, unnamed part when nothing was chosen.
                    if named || !data.is_empty() {
                        form.upload = Some(data.to_vec());
                    }
                }
                "product" => form.product = Some(field.text().await.map_err(bad_form)?),
                "year" => form.year = Some(field.text().await.map_err(bad_form)?),
                "month" => form.month = Some(field.text().await.map_err(bad_form)?),
                "history" => form.history = Some(field.text().await.map_err(bad_form)?),
                _ => {}
            }
        }
        Ok(form)
    }
}

fn parse_field<T: std::str::FromStr>(
    raw: Option<&str>,
    name: &str,
) -> Result<Option<T>, ForecastError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| ForecastError::InvalidInput(format!("{name} must be an integer, got {s:?}"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
