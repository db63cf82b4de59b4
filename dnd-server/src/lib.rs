//! HTTP API for AI-narrated D&D 5e sessions.
//!
//! Every route is served both at the root and under `/api`:
//!
//! | Method | Path                   |                               |
//! |--------|------------------------|-------------------------------|
//! | GET    | `/health`              | liveness                      |
//! | POST   | `/characters`          | create (201)                  |
//! | GET    | `/characters`          | list, oldest first            |
//! | GET    | `/characters/{id}`     | one character sheet           |
//! | PUT    | `/characters/{id}`     | full or partial update        |
//! | DELETE | `/characters/{id}`     | delete                        |
//! | POST   | `/game/start/{id}`     | start or restart a session    |
//! | POST   | `/game/action/{id}`    | `{ "action": "..." }`         |
//! | POST   | `/game/end/{id}`       | end (idempotent)              |
//! | GET    | `/game/state/{id}`     | current session               |

pub mod config;
pub mod error;
mod routes;

use axum::Router;
use dnd_engine::GameService;
use std::sync::Arc;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub game: Arc<GameService>,
}

impl AppState {
    pub fn new(game: GameService) -> Self {
        Self {
            game: Arc::new(game),
        }
    }
}

/// The application router without middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .nest("/api", routes::routes())
        .with_state(state)
}
