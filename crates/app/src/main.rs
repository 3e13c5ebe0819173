use anyhow::Context;
use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use campus_search_core::{AccessMode, PostgrestStore, SearchError, SearchService};
use chrono::Utc;
use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "campus-search-api", version)]
struct Cli {
    /// Supabase project base URL
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: String,

    /// Service-role key; when present every search bypasses row-level
    /// security
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    service_key: Option<String>,

    /// Publishable key used for caller-scoped and anonymous fetches
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    anon_key: String,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Whether the process was configured with a service-role key; drives
/// per-request access resolution.
#[derive(Clone, Copy)]
struct ServiceKeyConfigured(bool);

/// Service key wins when configured; otherwise a caller bearer token scopes
/// the fetch, and with neither the request runs anonymously.
fn resolve_access(service_key_configured: bool, headers: &HeaderMap) -> AccessMode {
    if service_key_configured {
        return AccessMode::Elevated;
    }

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).to_string());

    match bearer {
        Some(bearer) => AccessMode::CallerScoped { bearer },
        None => AccessMode::Anonymous,
    }
}

async fn handle_search(
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
    Extension(service): Extension<Arc<SearchService<PostgrestStore>>>,
    Extension(ServiceKeyConfigured(service_key_configured)): Extension<ServiceKeyConfigured>,
) -> Response {
    let raw_query = params.q.unwrap_or_default();
    let access = resolve_access(service_key_configured, &headers);

    match service.search(&raw_query, &access).await {
        Ok(response) => Json(response).into_response(),
        Err(SearchError::InvalidQuery) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing query" })),
        )
            .into_response(),
        Err(search_error) => {
            error!(error = %search_error, query = %raw_query, "search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Search failed" })),
            )
                .into_response()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let service_key_configured = cli.service_key.is_some();

    let store = PostgrestStore::new(&cli.supabase_url, cli.service_key, &cli.anon_key)
        .context("invalid supabase url")?;
    let service = Arc::new(SearchService::new(store));

    let app = Router::new()
        .route("/api/search", get(handle_search))
        .layer(Extension(service))
        .layer(Extension(ServiceKeyConfigured(service_key_configured)));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        bind = %cli.bind,
        elevated = service_key_configured,
        "campus-search-api boot"
    );

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
