pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod gacha;
pub mod handlers;
pub mod i18n;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod store;
pub mod swagger;
pub mod utils;

pub use config::Config;
pub use error::{AppError, AppResult};
