mod assets;
mod config;
mod graphql;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use graphql::Schema;

async fn graphql_handler(State(schema): State<Schema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><title>Project Map</title></head>
<body>
<h1>Project Map</h1>
<p>Frontend not built yet. Visit <a href="/graphql">GraphiQL</a> to explore the API.</p>
</body>
</html>"#;

/// Build the full application router.
fn build_app(schema: Schema, assets_dir: &Path, dist_dir: &Path) -> Router {
    // Static file routers are stateless, merge them before adding app state
    let static_files = Router::new()
        .nest("/static", cached_static_router(assets_dir, CACHE_1DAY))
        .nest("/dist", cached_static_router(dist_dir, CACHE_IMMUTABLE))
        .nest(
            "/assets",
            cached_static_router(&dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    let index_path = dist_dir.join("index.html");
    let country_index = index_path.clone();

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/", get(move || serve_index(index_path.clone())))
        // Client-side route, the frontend opens the country's popup
        .route(
            "/country/{key}",
            get(move || serve_index(country_index.clone())),
        )
        .with_state(schema)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

async fn serve_index(index_path: PathBuf) -> Html<String> {
    // Serve the built frontend, fall back to a simple message
    match tokio::fs::read_to_string(&index_path).await {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::debug!(path = %index_path.display(), error = %e, "Serving fallback index");
            Html(FALLBACK_INDEX.to_string())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .init();

    let assets_dir = config::assets_dir();
    let dist_dir = config::dist_dir();

    let loaded_assets = match assets::Assets::load(&assets_dir) {
        Ok(a) => Arc::new(a),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load assets");
            std::process::exit(1);
        }
    };

    let schema = graphql::build_schema(loaded_assets);
    let app = build_app(schema, &assets_dir, &dist_dir);

    let port = config::port();
    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("Server running at http://localhost:{}", port);
    tracing::info!("GraphiQL playground at http://localhost:{}/graphql", port);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}
