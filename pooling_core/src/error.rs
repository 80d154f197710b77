// pooling_core/src/error.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Тип ошибок крейта.

// Условная компиляция: если активирована фича `with_pooling_utils`,
// тогда импортируем и используем ошибку из `pooling_utils`.
#[cfg(feature = "with_pooling_utils")]
use pooling_utils::error::UtilsError;

/// Перечисление всех возможных ошибок крейта `pooling_core`.
///
/// Сами тензорные операции Burn паникуют при несовпадении форм, поэтому
/// пулинг-головы проверяют формы заранее и возвращают эти варианты.
#[derive(thiserror::Error, Debug)]
pub enum PoolingError {
    /// Некорректная конфигурация головы: неверные размерности, пустые веса и т.п.
    #[error("Некорректная конфигурация: {0}")]
    InvalidConfig(String),

    /// Несовместимые размеры тензоров на входе головы.
    #[error("Несовместимые размеры или форма тензора: {0}")]
    IncompatibleShape(String),

    /// Входные данные формально корректны по форме, но непригодны (например, пустой список слоев).
    #[error("Некорректные входные данные: {0}")]
    InvalidInput(String),

    /// В `EncoderFeatures` отсутствует поле, нужное выбранной стратегии.
    #[error("Отсутствует признак: {0}")]
    MissingFeature(String),

    /// Ошибка, возникшая во вспомогательном крейте `pooling_utils`.
    /// Этот вариант доступен только если активирована фича `with_pooling_utils`.
    #[cfg(feature = "with_pooling_utils")]
    #[error("Ошибка из pooling_utils: {0}")]
    Utils(#[from] UtilsError),
}
