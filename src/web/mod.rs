//! Web layer module
//!
//! This module provides the HTTP interface for the TFT data API.
//!
//! # Architecture
//!
//! The web layer is organized into several components:
//! - **Handlers**: HTTP request handlers organized by domain
//! - **Responses**: Standardized response envelope and error mapping
//! - **Extractors**: Pagination, search and filter parameters
//!
//! Reference data and app telemetry live under `/api/v1`; images are served
//! from `/images/:asset_type/*key` and liveness from `/health`.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Config,
    database::Database,
    image_assets::AssetResolver,
    repositories::{
        FeedbackRepository, ItemRepository, RoleRepository, ScreenViewRepository,
        TftTraitRepository,
    },
};

pub mod extractors;
pub mod handlers;
pub mod responses;

// Re-export commonly used types
pub use extractors::{PaginationParams, SearchParams};
pub use responses::{handle_error, ApiResponse, PaginatedResponse};

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, database: Database, asset_resolver: AssetResolver) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = router(AppState::new(config, database, asset_resolver));

        Ok(Self { app, addr })
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Listening on http://{}", self.addr);
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api_v1_routes())
        .route(
            "/images/:asset_type/*key",
            get(handlers::images::serve_image),
        )
        // Middleware (applied in reverse order)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_v1_routes() -> Router<AppState> {
    use handlers::{feedback, items, roles, screen_tracking, traits};

    Router::new()
        // Items
        .route("/items", get(items::list_items).post(items::create_item))
        .route(
            "/items/:id",
            get(items::get_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        )
        // Traits
        .route("/traits", get(traits::list_traits).post(traits::create_trait))
        .route("/traits/key/:key", get(traits::get_trait_by_key))
        .route(
            "/traits/:id",
            get(traits::get_trait)
                .patch(traits::update_trait)
                .delete(traits::delete_trait),
        )
        // Roles
        .route("/roles", get(roles::list_roles).post(roles::create_role))
        .route(
            "/roles/:id",
            get(roles::get_role)
                .patch(roles::update_role)
                .delete(roles::delete_role),
        )
        // Feedback
        .route(
            "/feedback",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route(
            "/feedback/:id",
            get(feedback::get_feedback).delete(feedback::delete_feedback),
        )
        // Screen tracking
        .route(
            "/screen-tracking",
            get(screen_tracking::list_screen_views).post(screen_tracking::track_screen_view),
        )
        .route("/screen-tracking/stats", get(screen_tracking::screen_stats))
        .route(
            "/screen-tracking/:id",
            get(screen_tracking::get_screen_view).delete(screen_tracking::delete_screen_view),
        )
        .route("/screen-tracking/track", post(screen_tracking::track_screen_view))
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Config,
    pub asset_resolver: AssetResolver,
    pub items: ItemRepository,
    pub traits: TftTraitRepository,
    pub roles: RoleRepository,
    pub feedback: FeedbackRepository,
    pub screen_views: ScreenViewRepository,
}

impl AppState {
    pub fn new(config: Config, database: Database, asset_resolver: AssetResolver) -> Self {
        let pool = database.pool();
        Self {
            items: ItemRepository::new(pool.clone()),
            traits: TftTraitRepository::new(pool.clone()),
            roles: RoleRepository::new(pool.clone()),
            feedback: FeedbackRepository::new(pool.clone()),
            screen_views: ScreenViewRepository::new(pool),
            database,
            config,
            asset_resolver,
        }
    }
}
