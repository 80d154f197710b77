// pooling_utils/src/logger.rs

#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![deny(unsafe_code, unused_mut, unused_imports, unused_attributes)]

//! Инициализация глобального логгера на основе `tracing`.
//!
//! Запись в файл с ротацией активируется фичей `logger_utils_feature`.

use std::{io, path::Path};

use tracing::Level;
use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::error::UtilsError;

/// Собирает директиву вида `app_name=level` для `EnvFilter`.
fn app_directive(app_name: &str, level: Level) -> Result<Directive, UtilsError> {
    // EnvFilter не принимает дефисы в именах целей.
    let sanitized_app_name = app_name.replace('-', "_");
    format!("{sanitized_app_name}={level}")
        .parse()
        .map_err(|e| {
            UtilsError::InvalidParameter(format!(
                "Неверная директива логирования для '{app_name}': {e}"
            ))
        })
}

/// Базовый фильтр из `RUST_LOG`, по умолчанию `info`.
fn base_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Слой записи в файл с ежедневной ротацией.
///
/// Возвращает `None`, если директорию логов создать не удалось.
#[cfg(feature = "logger_utils_feature")]
fn file_layer(
    app_name: &str,
    file_level: Level,
    dir: &Path,
) -> Result<Option<BoxedLayer>, UtilsError> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        // tracing еще не инициализирован, поэтому eprintln!.
        eprintln!(
            "[ПРЕДУПРЕЖДЕНИЕ] Не удалось создать директорию логов {dir:?}: {e}. Логирование в файл будет отключено."
        );
        return Ok(None);
    }
    let file_appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let file_filter = base_env_filter().add_directive(app_directive(app_name, file_level)?);
    let layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(file_filter);
    Ok(Some(layer.boxed()))
}

#[cfg(not(feature = "logger_utils_feature"))]
#[allow(clippy::unnecessary_wraps)]
fn file_layer(
    _app_name: &str,
    _file_level: Level,
    dir: &Path,
) -> Result<Option<BoxedLayer>, UtilsError> {
    eprintln!("[ПРЕДУПРЕЖДЕНИЕ] Фича `logger_utils_feature` выключена, лог в {dir:?} не пишется.");
    Ok(None)
}

/// Разбирает строковый уровень логирования (`"info"`, `"DEBUG"`, ...).
///
/// # Errors
/// `UtilsError::InvalidParameter`, если строка не является уровнем `tracing`.
pub fn parse_level(level: &str) -> Result<Level, UtilsError> {
    level.trim().parse::<Level>().map_err(|_| {
        UtilsError::InvalidParameter(format!("Неизвестный уровень логирования: '{level}'"))
    })
}

/// Инициализирует глобальный подписчик `tracing`.
///
/// Настраивает вывод в консоль (stderr) и, опционально, в файл с ежедневной ротацией.
/// Базовый фильтр берется из `RUST_LOG` (по умолчанию `info`), поверх него
/// добавляется явный уровень для `app_name`.
///
/// # Аргументы
/// * `app_name` - Имя приложения (цель фильтра и префикс имени файла лога).
/// * `console_level` - Уровень для консоли.
/// * `file_level` - Уровень для файла.
/// * `log_dir` - Опциональная директория для файлов логов.
///
/// # Errors
/// `UtilsError::Generic`, если глобальный подписчик уже установлен.
/// `UtilsError::InvalidParameter` при невалидном `app_name`.
/// Ошибка создания директории логов не считается фатальной: логирование
/// продолжается только в консоль.
pub fn init_tracing_logger(
    app_name: &str,
    console_level: Level,
    file_level: Level,
    log_dir: Option<&Path>,
) -> Result<(), UtilsError> {
    let console_filter = base_env_filter().add_directive(app_directive(app_name, console_level)?);

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .pretty()
        .with_filter(console_filter);

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(console_layer.boxed());

    let file = match log_dir {
        Some(dir) => file_layer(app_name, file_level, dir)?,
        None => None,
    };
    let file_logging = file.is_some();
    layers.extend(file);

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| UtilsError::Generic(format!("Не удалось инициализировать логгер: {e}")))?;

    match log_dir {
        Some(dir) if file_logging => tracing::info!(
            "Логгер инициализирован. Уровень консоли: {}. Логирование в файл: {:?} (уровень {}).",
            console_level,
            dir,
            file_level
        ),
        Some(dir) => tracing::warn!(
            "Логгер инициализирован. Уровень консоли: {}. Логирование в файл в {:?} недоступно.",
            console_level,
            dir
        ),
        None => tracing::info!(
            "Логгер инициализирован. Только вывод в консоль (уровень {}).",
            console_level
        ),
    }
    Ok(())
}
