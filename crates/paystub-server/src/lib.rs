pub mod auth;
pub mod config;
pub mod logging;
pub mod routes;
pub mod state;

pub use auth::Credentials;
pub use config::ServerConfig;
pub use state::AppState;
