pub mod api;
pub mod config;
pub mod dashboard;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod migrator;
pub mod openapi;
pub mod router;
pub mod seed;
pub mod telemetry;

pub use sea_orm;
