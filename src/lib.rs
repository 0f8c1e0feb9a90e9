use anyhow::{Context, Result};
use config::Config;
use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub mod cli;
pub mod display;
pub mod domain;
pub mod error;
pub mod manager;
pub mod models;
pub mod roles;
pub mod roster;
pub mod schema;
pub mod views;

use crate::manager::RegistryManager;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Opens the registry database named in `config.toml`, falling back to the
/// `DATABASE_URL` environment variable.
pub fn create_default_manager() -> Result<RegistryManager> {
    let settings = Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .build()?;

    let database_url = match settings.get_string("registry.database_url") {
        Ok(url) => url,
        Err(_) => {
            dotenvy::dotenv().ok();
            std::env::var("DATABASE_URL")
                .context("set registry.database_url in config.toml or the DATABASE_URL variable")?
        }
    };

    Ok(RegistryManager::open(&database_url)?)
}
