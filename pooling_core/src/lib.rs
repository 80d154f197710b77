// pooling_core/src/lib.rs

// Включаем строгие правила линтинга для всего крейта.
#![warn(
    missing_docs, // Предупреждать об отсутствующей документации для публичных элементов.
    clippy::all, // Все стандартные проверки Clippy.
    clippy::pedantic, // Более строгие ("педантичные") проверки Clippy.
    clippy::nursery // Экспериментальные проверки Clippy (могут быть нестабильны).
)]
// Запрещаем использование небезопасных конструкций и потенциально проблемных методов.
#![deny(
    unsafe_code, // Запрет `unsafe` блоков без явного `allow`.
    clippy::unwrap_used, // Запрет использования `.unwrap()`.
    clippy::expect_used // Запрет использования `.expect()`.
)]

//! # `pooling_core`
//!
//! Пулинг-головы на фреймворке [Burn](https://burn.dev/): сворачивают
//! поточечные скрытые состояния трансформера в один вектор фиксированного
//! размера (эмбеддинг предложения).
//!
//! ## Стратегии
//!
//! - `WeightedLayerPooling`: взвешенная сумма промежуточных слоев.
//! - `AttentionPooling`: обучаемое внимание по токенам.
//! - `MeanPooling`: среднее по реальным токенам.
//! - `ConvPooling`: две свертки и максимум по последовательности.
//! - `LstmPooling`: LSTM по `[CLS]`-векторам слоев.
//!
//! ## Структура
//!
//! - `pooling`: реализации стратегий.
//! - `head`: `PoolingHead`, выбор стратегии по конфигурации.
//! - `features`: `EncoderFeatures`, входные данные голов.
//! - `error`: тип ошибок крейта.

pub mod error;
pub mod features;
pub mod head;
pub mod pooling;

// Ошибки
pub use error::PoolingError;

// Входные данные
pub use features::EncoderFeatures;

// Единая голова
pub use head::{Pooler, PoolingHead, PoolingHeadConfig, PoolingStrategy};

// Стратегии, их конфигурации и Record-структуры
pub use pooling::{
    mean_pooling,
    AttentionPooling,
    AttentionPoolingConfig,
    AttentionPoolingRecord,
    ConvPooling,
    ConvPoolingConfig,
    ConvPoolingRecord,
    LstmPooling,
    LstmPoolingConfig,
    LstmPoolingRecord,
    MeanPooling,
    WeightedLayerPooling,
    WeightedLayerPoolingConfig,
    WeightedLayerPoolingRecord,
};
