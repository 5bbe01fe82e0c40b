// src/error.rs
//! Ошибки генерации
//!
//! Все ошибки генератора — это ошибки конфигурации или нарушенные предусловия.
//! Частичного результата не бывает: либо раскладка построена целиком, либо
//! возвращается одна фатальная ошибка с именем проблемного поля.

use thiserror::Error;

/// Результат операций генератора
pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    /// Недопустимое значение параметра конфигурации
    #[error("invalid configuration field `{field}`: {reason}")]
    Config { field: &'static str, reason: String },

    /// Пустой или перевёрнутый диапазон, переданный генератору случайных чисел
    #[error("empty random range [{from}, {to})")]
    EmptyRange { from: i64, to: i64 },

    #[error("empty random range [{from}, {to})")]
    EmptyFloatRange { from: f32, to: f32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl GenError {
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        GenError::Config {
            field,
            reason: reason.into(),
        }
    }
}

/// Привязывает ошибку пустого диапазона к полю конфигурации,
/// из которого этот диапазон был получен.
pub trait FieldContext<T> {
    fn field(self, field: &'static str) -> Result<T>;
}

impl<T> FieldContext<T> for Result<T> {
    fn field(self, field: &'static str) -> Result<T> {
        self.map_err(|err| match err {
            GenError::EmptyRange { from, to } => {
                GenError::config(field, format!("empty range [{from}, {to})"))
            }
            GenError::EmptyFloatRange { from, to } => {
                GenError::config(field, format!("empty range [{from}, {to})"))
            }
            other => other,
        })
    }
}
