// pooling_utils/src/lib.rs

#![warn(
    missing_docs, // Предупреждать, если публичные элементы не документированы.
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used, // Предупреждать об использовании .unwrap()
    clippy::expect_used  // Предупреждать об использовании .expect()
)]
#![deny(
    unsafe_code,        // Запретить использование unsafe блоков.
    unused_mut,         // Запретить неиспользуемые изменяемые переменные.
    unused_imports,     // Запретить неиспользуемые импорты.
    unused_attributes   // Запретить неиспользуемые атрибуты.
)]

//! `pooling_utils` предоставляет общую обработку ошибок, инициализацию логирования
//! и загрузку настроек для крейта `pooling_core`.
//!
//! # Основные модули:
//!
//! - [`error`]: Общий тип ошибки `UtilsError`.
//! - [`logger`]: Инициализация `tracing` (консоль + опционально файл с ротацией
//!   при включенной фиче `logger_utils_feature`).
//! - [`config`]: (фича `config_toml`) `PoolingSettings` - настройки пулинг-головы
//!   и логирования из TOML-файла и переменных окружения.
//!
//! Фича `default` включает оба модуля с опциональными зависимостями.

// --- Модуль для общих ошибок ---
pub mod error;
pub use error::UtilsError;

// --- Логирование ---
pub mod logger;
pub use logger::{init_tracing_logger, parse_level};

/// Модуль для загрузки настроек пулинга.
///
/// Активируется фичей `config_toml`.
#[cfg(feature = "config_toml")]
pub mod config;
#[cfg(feature = "config_toml")]
pub use config::{LoggingSection, PoolingSection, PoolingSettings};
