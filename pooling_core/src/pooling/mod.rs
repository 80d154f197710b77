// pooling_core/src/pooling/mod.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Реализации стратегий пулинга.
//!
//! Каждая стратегия живет в своем подмодуле: конфигурация (`*Config`) и
//! модуль Burn с методом `forward`.

pub mod attention;      // Пулинг вниманием
pub mod conv;           // Сверточный пулинг
pub mod lstm;           // LSTM по [CLS]-векторам слоев
pub mod mean;           // Маскированное среднее
pub mod weighted_layer; // Взвешенная сумма слоев

pub use attention::{AttentionPooling, AttentionPoolingConfig, AttentionPoolingRecord};
pub use conv::{ConvPooling, ConvPoolingConfig, ConvPoolingRecord};
pub use lstm::{LstmPooling, LstmPoolingConfig, LstmPoolingRecord};
pub use mean::{mean_pooling, MeanPooling};
pub use weighted_layer::{
    WeightedLayerPooling, WeightedLayerPoolingConfig, WeightedLayerPoolingRecord,
};
