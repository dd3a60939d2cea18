pub mod cmd;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod loading;
pub mod queries;
pub mod server;
pub mod service;
pub mod utils;

pub use config::Config;
pub use db::Database;
pub use error::HirelinkError;
pub use loading::LoadStrategy;
pub use service::Hiring;
