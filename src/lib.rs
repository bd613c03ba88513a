pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod issuer;
pub mod middleware;
pub mod render;
pub mod store;
pub mod users;

pub use app::{app, AppState};
pub use config::AppConfig;
