use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    BalancePoint, BalanceSeries, InputError, ProjectionInputs, format_currency, project_inputs,
};

const MIN_YEARS: u32 = 1;
const MAX_YEARS: u32 = 50;

/// Exit status for rejected parameters, matching clap's usage errors.
const INVALID_INPUT_EXIT_CODE: i32 = 2;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    #[serde(alias = "initial")]
    initial_amount: Option<f64>,
    #[serde(alias = "rate", alias = "annualRatePercent")]
    annual_rate: Option<f64>,
    years: Option<i64>,
    #[serde(alias = "monthly")]
    monthly_contribution: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Savings growth projector (annual compounding + monthly contributions)",
    after_help = "Run `nestegg serve [port]` to start the HTTP API instead."
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 1000.0,
        allow_negative_numbers = true,
        help = "Starting balance in dollars"
    )]
    initial_amount: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        allow_negative_numbers = true,
        help = "Annual interest rate in percent, e.g. 5"
    )]
    annual_rate: f64,
    #[arg(
        long,
        default_value_t = 10,
        allow_negative_numbers = true,
        help = "Number of years to project (1-50)"
    )]
    years: i64,
    #[arg(
        long,
        default_value_t = 100.0,
        allow_negative_numbers = true,
        help = "Amount added every month, paid in as one lump at each year end"
    )]
    monthly_contribution: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    initial_amount: f64,
    annual_rate_percent: f64,
    years: u32,
    monthly_contribution: f64,
    final_balance: f64,
    final_balance_formatted: String,
    total_contributed: f64,
    total_growth: f64,
    balances: Vec<BalancePoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn build_inputs(cli: &Cli) -> Result<ProjectionInputs, InputError> {
    let years = u32::try_from(cli.years)
        .ok()
        .filter(|years| (MIN_YEARS..=MAX_YEARS).contains(years))
        .ok_or(InputError::YearsOutOfRange {
            years: cli.years,
            min: MIN_YEARS,
            max: MAX_YEARS,
        })?;

    ProjectionInputs::new(
        cli.initial_amount,
        cli.annual_rate,
        years,
        cli.monthly_contribution,
    )
}

/// Parses `args` (program name first) and prints one projection.
///
/// Returns the process exit status.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    let inputs = match build_inputs(&cli) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("error: {e}");
            return INVALID_INPUT_EXIT_CODE;
        }
    };

    let series = project_inputs(&inputs);
    log::debug!(
        "projected {} years from {} at {}%: final balance {}",
        inputs.years(),
        inputs.initial_amount(),
        inputs.annual_rate_percent(),
        series.final_balance()
    );

    match cli.output {
        OutputFormat::Text => print!("{}", render_text_report(&inputs, &series)),
        OutputFormat::Json => {
            match serde_json::to_string_pretty(&build_project_response(&inputs, &series)) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to serialize projection: {e}");
                    return 1;
                }
            }
        }
    }
    0
}

fn render_text_report(inputs: &ProjectionInputs, series: &BalanceSeries) -> String {
    let mut out = format!(
        "Final balance after {} years: {}\n",
        inputs.years(),
        format_currency(series.final_balance())
    );
    out.push_str(&format!(
        "Contributed: {}  Growth: {}\n\n",
        format_currency(series.total_contributed()),
        format_currency(series.total_growth())
    ));
    out.push_str(&format!("{:>4}  {:>18}\n", "Year", "Balance"));
    for point in series.points() {
        out.push_str(&format!(
            "{:>4}  {:>18}\n",
            point.year,
            format_currency(point.balance)
        ));
    }
    out
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    println!("nestegg HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => project_handler_impl(payload).await,
        Err(rejection) => malformed_payload_response(&rejection.body_text()),
    }
}

async fn project_post_handler(payload: Result<Json<ProjectPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => project_handler_impl(payload).await,
        Err(rejection) => malformed_payload_response(&rejection.body_text()),
    }
}

/// Extractor failures (bad types, duplicate keys, missing content type) are
/// reported as input errors rather than axum's plain-text rejections.
fn malformed_payload_response(detail: &str) -> Response {
    log::warn!("malformed projection request: {detail}");
    error_response(
        StatusCode::BAD_REQUEST,
        &format!("Invalid API payload: {detail}"),
    )
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = match api_request_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(e) => {
            log::warn!("rejected projection request ({}): {e}", e.field());
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    let series = project_inputs(&inputs);
    log::debug!(
        "projection request: {} years, final balance {}",
        inputs.years(),
        series.final_balance()
    );
    json_response(StatusCode::OK, build_project_response(&inputs, &series))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ProjectionInputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ProjectionInputs, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.initial_amount {
        cli.initial_amount = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    let defaults = ProjectionInputs::default();
    Cli {
        initial_amount: defaults.initial_amount(),
        annual_rate: defaults.annual_rate_percent(),
        years: i64::from(defaults.years()),
        monthly_contribution: defaults.monthly_contribution(),
        output: OutputFormat::Json,
    }
}

fn build_project_response(inputs: &ProjectionInputs, series: &BalanceSeries) -> ProjectResponse {
    ProjectResponse {
        initial_amount: inputs.initial_amount(),
        annual_rate_percent: inputs.annual_rate_percent(),
        years: inputs.years(),
        monthly_contribution: inputs.monthly_contribution(),
        final_balance: series.final_balance(),
        final_balance_formatted: format_currency(series.final_balance()),
        total_contributed: series.total_contributed(),
        total_growth: series.total_growth(),
        balances: series.points().collect(),
    }
}
