// ABOUTME: Main entry point for the coffee diary API
// ABOUTME: Loads settings, opens storage, wires services into the router, and serves until shutdown

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod entities;
mod error;
mod extract;
mod migration;
mod routes;
mod service;
mod settings;
mod storage;
mod types;

#[cfg(test)]
mod storage_tests;

use service::{CoffeeService, RecipeService, UserService};
use storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub coffees: CoffeeService,
    pub users: UserService,
    pub recipes: RecipeService,
}

impl AppState {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            coffees: CoffeeService::new(storage.clone()),
            users: UserService::new(storage.clone()),
            recipes: RecipeService::new(storage),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/coffees", post(routes::create_coffee).get(routes::get_coffees))
        .route("/users", post(routes::create_user))
        .route("/users/:user_id", get(routes::get_user).delete(routes::delete_user))
        .route(
            "/users/:user_id/recipes",
            post(routes::create_recipe).get(routes::list_recipes),
        )
        .route(
            "/recipes/id/:recipe_id",
            get(routes::get_recipe)
                .put(routes::update_recipe)
                .delete(routes::delete_recipe),
        )
        .route("/recipes/id/:recipe_id/steps", post(routes::add_step))
        .route(
            "/recipes/id/:recipe_id/steps/:step_id",
            delete(routes::remove_step),
        )
        .route("/recipes/id/:recipe_id/user", get(routes::get_recipe_owner))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter)),
        )
        .init();

    let storage = Arc::new(Storage::connect(&settings.database.url).await?);
    let app = app(AppState::new(storage));

    let address = settings.server.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Coffee diary listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
