// File: services/bookify_backend/src/main.rs
use axum::{routing::get, Router};
use bookify_common::log_result;
use bookify_config::load_config;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

mod app_state;

use app_state::AppState;

/// Routes under `/api`, Swagger UI when enabled, and the widget's static files.
fn build_app(state: &AppState) -> Router {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut api_router = bookify_common::routes()
        .route("/", get(|| async { "Welcome to the Bookify API!" }));

    #[cfg(feature = "gcal")]
    {
        if let Some(gcal_state) = &state.gcal_state {
            api_router = api_router.merge(bookify_gcal::routes(gcal_state.clone()));
        }
    }

    #[allow(unused_mut)]
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bookify API",
                version = "0.1.0",
                description = "Appointment availability and booking"
            ),
            tags( (name = "Bookify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)]
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "gcal")]
        openapi_doc.merge(bookify_gcal::doc::BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    if let Some(static_dir) = state.config.server.static_dir.as_deref() {
        info!("Serving static files from {}", static_dir);
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Arc::new(load_config()?);
    // Held until shutdown so the file writer flushes
    let _log_guard = bookify_common::logging::init(&config.logging);

    let state = log_result(
        AppState::new(config.clone()).await,
        "Application state ready",
        "Startup failed",
    )?;
    let app = build_app(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
