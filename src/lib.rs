pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{BotArgs, ImportArgs};

pub use adapters::sqlite::SqliteListingStore;
pub use config::BotConfig;
pub use core::{
    importer::ImportTable,
    patterns::PatternTable,
    resolver::LocationResolver,
    session::{Session, TurnOutcome},
};
pub use utils::error::{BotError, Result};
