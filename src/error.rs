use thiserror::Error;

use crate::color::ColorError;

#[derive(Error, Debug)]
pub enum LangstatError {
    #[error("invalid color for language {language}: {source}")]
    InvalidColor {
        language: String,
        #[source]
        source: ColorError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Config(#[from] json5::Error),

    #[error("PNG export failed: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, LangstatError>;
