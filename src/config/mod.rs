#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::patterns::PatternTable;
use crate::core::session::DEFAULT_EXIT_WORDS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use toml_config::BotToml;

pub const DEFAULT_STORE_PATH: &str = "listings.db";
pub const DEFAULT_TOP_N: usize = 10;

/// Effective bot settings: command line over config file over defaults.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub store_path: String,
    pub top_n: usize,
    pub loop_mode: bool,
    pub exit_words: Vec<String>,
    pub patterns: PatternTable,
}

impl BotConfig {
    pub fn from_toml(file: &BotToml) -> Result<Self> {
        let patterns = match file.pattern_table()? {
            Some(table) => table,
            None => PatternTable::berlin()?,
        };

        Ok(Self {
            store_path: file
                .store_path()
                .unwrap_or(DEFAULT_STORE_PATH)
                .to_string(),
            top_n: file.top_n().unwrap_or(DEFAULT_TOP_N),
            loop_mode: file.loop_mode().unwrap_or(false),
            exit_words: file
                .exit_words()
                .map(|words| words.to_vec())
                .unwrap_or_else(|| DEFAULT_EXIT_WORDS.iter().map(|w| w.to_string()).collect()),
            patterns,
        })
    }

    #[cfg(feature = "cli")]
    pub fn from_args(args: &cli::BotArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                BotToml::from_file(path)?
            }
            None => BotToml::default(),
        };

        let mut config = Self::from_toml(&file)?;

        // 應用命令列覆蓋設定
        if let Some(db) = &args.db {
            config.store_path = db.clone();
        }
        if let Some(top_n) = args.top_n {
            config.top_n = top_n;
        }
        if args.loop_mode {
            config.loop_mode = true;
        }

        Ok(config)
    }
}

impl ConfigProvider for BotConfig {
    fn store_path(&self) -> &str {
        &self.store_path
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn loop_mode(&self) -> bool {
        self.loop_mode
    }

    fn exit_words(&self) -> &[String] {
        &self.exit_words
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<()> {
        validate_path("store.path", &self.store_path)?;
        validate_positive_number("session.top_n", self.top_n, 1)?;
        Ok(())
    }
}
