use crate::core::patterns::PatternTable;
use crate::utils::error::{BotError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotToml {
    pub store: Option<StoreConfig>,
    pub session: Option<SessionConfig>,
    pub patterns: Option<Vec<PatternConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub top_n: Option<usize>,
    pub loop_mode: Option<bool>,
    pub exit_words: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    pub matcher: String,
    pub district: String,
}

impl BotToml {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LISTINGS_DB})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Custom pattern table, when the file defines one.
    pub fn pattern_table(&self) -> Result<Option<PatternTable>> {
        match &self.patterns {
            Some(patterns) => PatternTable::from_pairs(
                patterns
                    .iter()
                    .map(|p| (p.matcher.as_str(), p.district.as_str())),
            )
            .map(Some),
            None => Ok(None),
        }
    }

    pub fn store_path(&self) -> Option<&str> {
        self.store.as_ref().map(|s| s.path.as_str())
    }

    pub fn top_n(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.top_n)
    }

    pub fn loop_mode(&self) -> Option<bool> {
        self.session.as_ref().and_then(|s| s.loop_mode)
    }

    pub fn exit_words(&self) -> Option<&[String]> {
        self.session
            .as_ref()
            .and_then(|s| s.exit_words.as_deref())
    }
}
