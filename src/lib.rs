pub mod commands;
pub mod config;
pub mod content;
pub mod database;
pub mod email;
pub mod error;
pub mod logger;
pub mod media;
pub mod migration;
pub mod models;
pub mod sections;
pub mod sheets;

pub use error::{CmsError, Result};
