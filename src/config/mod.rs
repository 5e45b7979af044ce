//! Project configuration

pub mod project_toml;

pub use project_toml::ProjectConfig;
