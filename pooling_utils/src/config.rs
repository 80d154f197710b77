// pooling_utils/src/config.rs

#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![deny(unsafe_code, unused_mut, unused_imports, unused_attributes)]

//! Настройки пулинг-головы и логирования.
//!
//! Источники (в порядке приоритета, последний побеждает):
//! 1. значения по умолчанию;
//! 2. TOML-файл (необязательный);
//! 3. переменные окружения вида `POOLING__POOLING__HIDDEN_SIZE=1024`.

use std::path::Path;

use ::config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::UtilsError;

/// Префикс переменных окружения, перекрывающих настройки.
pub const ENV_PREFIX: &str = "POOLING";
/// Разделитель уровней вложенности в именах переменных окружения.
pub const ENV_SEPARATOR: &str = "__";

/// Корневая структура настроек.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolingSettings {
    /// Параметры пулинг-головы.
    #[serde(default)]
    pub pooling: PoolingSection,

    /// Параметры логирования.
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Секция `[pooling]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolingSection {
    /// Имя стратегии: `weighted-layer`, `attention`, `mean`, `conv`, `lstm`.
    pub strategy: String,
    /// Размерность скрытых состояний энкодера.
    pub hidden_size: usize,
    /// Количество слоев энкодера (без слоя эмбеддингов).
    pub num_hidden_layers: usize,
    /// Первый слой, участвующий во взвешенном пулинге.
    pub layer_start: usize,
    /// Фиксированные веса слоев для взвешенного пулинга.
    pub layer_weights: Option<Vec<f32>>,
    /// Обучаемы ли веса слоев. `None` - обучаемы, только если `layer_weights` не заданы.
    pub trainable_layer_weights: Option<bool>,
    /// Размер ядра свертки.
    pub kernel_size: usize,
    /// Паддинг свертки.
    pub padding_size: usize,
    /// Число каналов промежуточной свертки.
    pub conv_channels: usize,
    /// Размер скрытого состояния LSTM. `None` - равен `hidden_size`.
    pub lstm_hidden_size: Option<usize>,
    /// Вероятность дропаута после LSTM.
    pub dropout: f64,
}

impl Default for PoolingSection {
    fn default() -> Self {
        Self {
            strategy: "mean".to_string(),
            hidden_size: 768,
            num_hidden_layers: 12,
            layer_start: 4,
            layer_weights: None,
            trainable_layer_weights: None,
            kernel_size: 2,
            padding_size: 1,
            conv_channels: 256,
            lstm_hidden_size: None,
            dropout: 0.1,
        }
    }
}

/// Секция `[logging]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Уровень логирования (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Директория для файлов логов. `None` - только консоль.
    pub log_dir: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl PoolingSettings {
    /// Загружает настройки из TOML-файла с перекрытием переменными окружения.
    /// Если файл не найден, используются значения по умолчанию.
    ///
    /// # Errors
    /// `UtilsError::Io` с путем, если файл существует, но не читается.
    /// `UtilsError::Config` при ошибках парсинга TOML, неверных типах значений
    /// или непрошедшей валидации.
    pub fn load_from_toml(file_path: &Path) -> Result<Self, UtilsError> {
        if !file_path.exists() {
            warn!(
                "Файл настроек пулинга не найден: {:?}, используются значения по умолчанию.",
                file_path
            );
            return Self::build(Config::builder());
        }
        let toml = std::fs::read_to_string(file_path)
            .map_err(|e| UtilsError::io_with_path(e, file_path.display().to_string()))?;
        Self::from_toml_str(&toml)
    }

    /// Разбирает настройки из строки TOML (с перекрытием переменными окружения).
    ///
    /// # Errors
    /// См. [`PoolingSettings::load_from_toml`].
    pub fn from_toml_str(toml: &str) -> Result<Self, UtilsError> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, UtilsError> {
        let settings: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .and_then(Config::try_deserialize::<Self>)
            .map_err(|e| {
                UtilsError::Config(format!("Не удалось разобрать настройки пулинга: {e}"))
            })?;
        settings.validate()?;
        debug!(strategy = %settings.pooling.strategy, "Настройки пулинга загружены");
        Ok(settings)
    }

    /// Проверяет числовые диапазоны, которые не выражаются типами.
    ///
    /// # Errors
    /// `UtilsError::Config` с описанием первого нарушения.
    pub fn validate(&self) -> Result<(), UtilsError> {
        let p = &self.pooling;
        if p.hidden_size == 0 {
            return Err(UtilsError::Config("pooling.hidden_size должен быть > 0".into()));
        }
        if p.kernel_size == 0 {
            return Err(UtilsError::Config("pooling.kernel_size должен быть > 0".into()));
        }
        if !(0.0..1.0).contains(&p.dropout) {
            return Err(UtilsError::Config(format!(
                "pooling.dropout должен лежать в [0, 1), получено {}",
                p.dropout
            )));
        }
        crate::logger::parse_level(&self.logging.level)
            .map_err(|e| UtilsError::Config(e.to_string()))?;
        Ok(())
    }
}
