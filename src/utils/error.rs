use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Die Datei {path} konnte nicht gefunden werden!")]
    StoreNotFound { path: String },

    #[error("SQLite error: {0}")]
    StoreError(#[from] rusqlite::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid location pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Table '{table}' does not exist in the store")]
    MissingTable { table: String },

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Required column '{column}' is missing from the import file")]
    MissingColumn { column: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Storage,
    Import,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::ConfigError { .. }
            | BotError::ConfigValidationError { .. }
            | BotError::InvalidConfigValueError { .. }
            | BotError::InvalidPattern(_) => ErrorCategory::Configuration,
            BotError::StoreNotFound { .. }
            | BotError::StoreError(_)
            | BotError::MissingTable { .. }
            | BotError::UnknownColumn { .. } => ErrorCategory::Storage,
            BotError::CsvError(_) | BotError::MissingColumn { .. } => ErrorCategory::Import,
            BotError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Import => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 給終端使用者看的訊息（德文，與對話內容一致）
    pub fn user_friendly_message(&self) -> String {
        match self {
            BotError::StoreNotFound { .. } => self.to_string(),
            BotError::StoreError(_) | BotError::MissingTable { .. } | BotError::UnknownColumn { .. } => {
                "Die Wohnungsdatenbank konnte nicht geöffnet werden.".to_string()
            }
            BotError::CsvError(_) | BotError::MissingColumn { .. } => {
                format!("Die Importdatei ist ungültig: {}", self)
            }
            BotError::InvalidPattern(_)
            | BotError::ConfigError { .. }
            | BotError::ConfigValidationError { .. }
            | BotError::InvalidConfigValueError { .. } => {
                format!("Die Konfiguration ist ungültig: {}", self)
            }
            BotError::IoError(_) => format!("Ein Systemfehler ist aufgetreten: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BotError::StoreNotFound { .. } => {
                "Run `import-listings --csv listings.csv` first or pass --db with an existing file"
            }
            BotError::StoreError(_) => "Check that the database file is a valid SQLite file",
            BotError::MissingTable { .. } | BotError::UnknownColumn { .. } => {
                "Re-import the listings CSV so the 'listings' table has the expected columns"
            }
            BotError::CsvError(_) => "Check that the CSV file is well-formed and has a header row",
            BotError::MissingColumn { .. } => {
                "The CSV needs name, neighbourhood, neighbourhood_group and price columns"
            }
            BotError::InvalidPattern(_) => "Fix the regular expression in the [[patterns]] section",
            BotError::ConfigError { .. }
            | BotError::ConfigValidationError { .. }
            | BotError::InvalidConfigValueError { .. } => "Check the command line flags and config file",
            BotError::IoError(_) => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
