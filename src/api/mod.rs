use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    AdvisoryReport, CategoryShare, EngineError, ExpenseCategory, FieldError, NON_VITAL_CATEGORIES,
    RawFacts, VITAL_CATEGORIES, ValidationErrors, calendar, evaluate, income_shares, validate,
};

/// Body of `/api/advise`, also accepted as a query string (without expenses).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvisePayload {
    pub monthly_income: Option<f64>,
    pub current_savings: Option<f64>,
    pub target_amount: Option<f64>,
    pub timeline_months: Option<i64>,
    pub target_date: Option<String>,
    pub goal_description: Option<String>,
    pub expenses: BTreeMap<String, Option<f64>>,
    pub reference_date: Option<String>,
}

#[derive(Debug)]
pub struct AdviseRequest {
    pub raw: RawFacts,
    pub reference_date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviseResponse {
    pub reference_date: String,
    pub timeline_months: i64,
    pub result: AdvisoryReport,
    pub income_shares: Vec<CategoryShare>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesResponse {
    vital: Vec<ExpenseCategory>,
    non_vital: Vec<ExpenseCategory>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

#[derive(Debug, thiserror::Error)]
pub enum AdviseError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub async fn run_http_server(host: IpAddr, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::new(host, port);
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!("Savings advisor HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/api/advise");

    axum::serve(listener, app).await
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/categories", get(categories_handler))
        .route(
            "/api/advise",
            get(advise_get_handler).post(advise_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn categories_handler() -> Response {
    json_response(
        StatusCode::OK,
        CategoriesResponse {
            vital: VITAL_CATEGORIES.to_vec(),
            non_vital: NON_VITAL_CATEGORIES.to_vec(),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", Vec::new())
}

async fn advise_get_handler(Query(payload): Query<AdvisePayload>) -> Response {
    advise_handler_impl(payload).await
}

async fn advise_post_handler(Json(payload): Json<AdvisePayload>) -> Response {
    advise_handler_impl(payload).await
}

async fn advise_handler_impl(payload: AdvisePayload) -> Response {
    match advise_from_payload(payload, today()) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(AdviseError::Invalid(errors)) => {
            warn!(%errors, "rejected advise request");
            error_response(
                StatusCode::BAD_REQUEST,
                "Invalid input",
                errors.fields().to_vec(),
            )
        }
        Err(AdviseError::Engine(e)) => {
            warn!(error = %e, "advisory evaluation failed");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string(), Vec::new())
        }
    }
}

/// Validates, evaluates and renders one submission. `today` is used when the
/// payload does not pin a reference date.
pub fn advise_from_payload(
    payload: AdvisePayload,
    today: NaiveDate,
) -> Result<AdviseResponse, AdviseError> {
    let request = api_request_from_payload(payload, today)?;
    let facts = validate(request.raw)?;
    let evaluation = evaluate(&facts, request.reference_date)?;

    info!(
        goal = %facts.goal_description,
        savings_rate = evaluation.savings_rate,
        feasibility = ?evaluation.feasibility,
        "evaluated savings goal"
    );

    Ok(AdviseResponse {
        reference_date: request.reference_date.to_string(),
        timeline_months: facts.timeline_months,
        income_shares: income_shares(&facts, evaluation.savings_rate),
        result: evaluation.report(&facts),
    })
}

fn api_request_from_payload(
    payload: AdvisePayload,
    today: NaiveDate,
) -> Result<AdviseRequest, ValidationErrors> {
    let mut errors = Vec::new();

    let reference_date = match payload.reference_date.as_deref() {
        None => today,
        Some(raw) => calendar::parse_date(raw).unwrap_or_else(|e| {
            errors.push(FieldError {
                field: "reference_date".to_string(),
                message: e.to_string(),
            });
            today
        }),
    };

    let timeline_months = match (payload.timeline_months, payload.target_date.as_deref()) {
        (Some(months), _) => Some(months),
        (None, Some(raw)) => match calendar::parse_date(raw) {
            Ok(target) => Some(calendar::months_until(reference_date, target)),
            Err(e) => {
                errors.push(FieldError {
                    field: "target_date".to_string(),
                    message: e.to_string(),
                });
                None
            }
        },
        (None, None) => None,
    };

    let raw = RawFacts {
        monthly_income: payload.monthly_income,
        current_savings: payload.current_savings,
        target_amount: payload.target_amount,
        timeline_months,
        goal_description: payload.goal_description,
        expenses: payload.expenses,
    };

    if !errors.is_empty() {
        // Surface the remaining field problems alongside the date ones.
        if let Err(more) = validate(raw) {
            errors.extend(
                more.0
                    .into_iter()
                    .filter(|e| !(e.field == "timeline_months" && timeline_months.is_none())),
            );
        }
        return Err(ValidationErrors(errors));
    }

    Ok(AdviseRequest {
        raw,
        reference_date,
    })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str, fields: Vec<FieldError>) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            fields,
        },
    )
}
