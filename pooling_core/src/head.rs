// pooling_core/src/head.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Единая точка входа: выбор стратегии пулинга по конфигурации.
//!
//! `PoolingHead` принимает `EncoderFeatures` и всегда возвращает один вектор
//! на последовательность, какую бы стратегию ни выбрали.

use std::{fmt, str::FromStr};

use burn::{config::Config, tensor::backend::Backend, tensor::Tensor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    pooling::{
        mean_pooling, AttentionPooling, AttentionPoolingConfig, ConvPooling, ConvPoolingConfig,
        LstmPooling, LstmPoolingConfig, MeanPooling, WeightedLayerPooling,
        WeightedLayerPoolingConfig,
    },
    EncoderFeatures, PoolingError,
};

#[cfg(feature = "with_pooling_utils")]
use pooling_utils::config::PoolingSettings;

/// Стратегия пулинга.
///
/// В конфигурационных файлах записывается в kebab-case: `"weighted-layer"`, `"lstm"` и т.д.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PoolingStrategy {
    /// Взвешенная сумма слоев + маскированное среднее.
    WeightedLayer,
    /// Пулинг вниманием.
    Attention,
    /// Маскированное среднее последнего слоя.
    Mean,
    /// Сверточный пулинг (выход - один логит).
    Conv,
    /// LSTM по `[CLS]`-векторам слоев.
    Lstm,
}

impl PoolingStrategy {
    /// Имя стратегии в kebab-case.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightedLayer => "weighted-layer",
            Self::Attention => "attention",
            Self::Mean => "mean",
            Self::Conv => "conv",
            Self::Lstm => "lstm",
        }
    }
}

impl fmt::Display for PoolingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolingStrategy {
    type Err = PoolingError;

    /// Регистр и `_`/`-` не различаются: `"Weighted_Layer"` == `"weighted-layer"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "weighted-layer" | "weighted" => Ok(Self::WeightedLayer),
            "attention" => Ok(Self::Attention),
            "mean" => Ok(Self::Mean),
            "conv" | "convolution" => Ok(Self::Conv),
            "lstm" => Ok(Self::Lstm),
            other => Err(PoolingError::InvalidConfig(format!(
                "Неизвестная стратегия пулинга: '{other}'."
            ))),
        }
    }
}

/// Конфигурация для `PoolingHead`.
///
/// Содержит параметры всех стратегий; используются только относящиеся к `strategy`.
#[derive(Config, Debug)]
pub struct PoolingHeadConfig {
    /// Выбранная стратегия.
    pub strategy: PoolingStrategy,
    /// Размерность скрытых состояний энкодера.
    pub hidden_size: usize,
    /// Количество слоев энкодера (без слоя эмбеддингов).
    pub num_hidden_layers: usize,
    /// Первый слой взвешенной суммы.
    #[config(default = 4)]
    pub layer_start: usize,
    /// Фиксированные веса слоев для взвешенной суммы.
    pub layer_weights: Option<Vec<f32>>,
    /// Обучаемы ли веса слоев; `None` - только если `layer_weights` не заданы.
    pub trainable_layer_weights: Option<bool>,
    /// Размер ядра свертки.
    #[config(default = 2)]
    pub kernel_size: usize,
    /// Паддинг свертки.
    #[config(default = 1)]
    pub padding_size: usize,
    /// Каналы промежуточной свертки.
    #[config(default = 256)]
    pub conv_channels: usize,
    /// Размер скрытого состояния LSTM; `None` - `hidden_size`.
    pub lstm_hidden_size: Option<usize>,
    /// Дропаут после LSTM.
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl PoolingHeadConfig {
    /// Размер вектора, который вернет голова.
    pub fn output_size(&self) -> usize {
        match self.strategy {
            PoolingStrategy::WeightedLayer | PoolingStrategy::Attention | PoolingStrategy::Mean => {
                self.hidden_size
            }
            PoolingStrategy::Conv => 1,
            PoolingStrategy::Lstm => self.lstm_hidden_size.unwrap_or(self.hidden_size),
        }
    }

    /// Создает голову выбранной стратегии.
    ///
    /// # Errors
    /// `PoolingError::InvalidConfig` от конфигурации выбранной стратегии.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<PoolingHead<B>, PoolingError> {
        if self.hidden_size == 0 {
            return Err(PoolingError::InvalidConfig(
                "hidden_size должен быть > 0.".to_string(),
            ));
        }

        let pooler = match self.strategy {
            PoolingStrategy::WeightedLayer => Pooler::WeightedLayer(
                WeightedLayerPoolingConfig::new(self.num_hidden_layers)
                    .with_layer_start(self.layer_start)
                    .with_layer_weights(self.layer_weights.clone())
                    .with_trainable(self.trainable_layer_weights)
                    .init(device)?,
            ),
            PoolingStrategy::Attention => {
                Pooler::Attention(AttentionPoolingConfig::new(self.hidden_size).init(device)?)
            }
            PoolingStrategy::Mean => Pooler::Mean(MeanPooling::new()),
            PoolingStrategy::Conv => Pooler::Conv(
                ConvPoolingConfig::new(self.hidden_size, self.kernel_size, self.padding_size)
                    .with_hidden_channels(self.conv_channels)
                    .init(device)?,
            ),
            PoolingStrategy::Lstm => Pooler::Lstm(
                LstmPoolingConfig::new(
                    self.num_hidden_layers,
                    self.hidden_size,
                    self.output_size(),
                )
                .with_dropout(self.dropout)
                .init(device)?,
            ),
        };

        let output_size = self.output_size();
        debug!(
            strategy = %self.strategy,
            hidden_size = self.hidden_size,
            output_size,
            "Создана пулинг-голова"
        );
        Ok(PoolingHead {
            strategy: self.strategy,
            pooler,
            output_size,
        })
    }
}

#[cfg(feature = "with_pooling_utils")]
impl PoolingHeadConfig {
    /// Строит конфигурацию головы из загруженных настроек.
    ///
    /// # Errors
    /// `PoolingError::InvalidConfig`, если имя стратегии неизвестно.
    pub fn from_settings(settings: &PoolingSettings) -> Result<Self, PoolingError> {
        let section = &settings.pooling;
        let strategy: PoolingStrategy = section.strategy.parse()?;
        Ok(Self::new(strategy, section.hidden_size, section.num_hidden_layers)
            .with_layer_start(section.layer_start)
            .with_layer_weights(section.layer_weights.clone())
            .with_trainable_layer_weights(section.trainable_layer_weights)
            .with_kernel_size(section.kernel_size)
            .with_padding_size(section.padding_size)
            .with_conv_channels(section.conv_channels)
            .with_lstm_hidden_size(section.lstm_hidden_size)
            .with_dropout(section.dropout))
    }
}

/// Конкретная реализация пулинга внутри `PoolingHead`.
#[derive(Debug)]
pub enum Pooler<B: Backend> {
    /// См. [`WeightedLayerPooling`].
    WeightedLayer(WeightedLayerPooling<B>),
    /// См. [`AttentionPooling`].
    Attention(AttentionPooling<B>),
    /// См. [`MeanPooling`].
    Mean(MeanPooling),
    /// См. [`ConvPooling`].
    Conv(ConvPooling<B>),
    /// См. [`LstmPooling`].
    Lstm(LstmPooling<B>),
}

/// Пулинг-голова с выбранной стратегией.
#[derive(Debug)]
pub struct PoolingHead<B: Backend> {
    strategy: PoolingStrategy,
    pooler: Pooler<B>,
    output_size: usize,
}

impl<B: Backend> PoolingHead<B> {
    /// Активная стратегия.
    pub const fn strategy(&self) -> PoolingStrategy {
        self.strategy
    }

    /// Размер выходного вектора.
    pub const fn output_size(&self) -> usize {
        self.output_size
    }

    /// Доступ к конкретной реализации (например, к весам слоев).
    pub const fn pooler(&self) -> &Pooler<B> {
        &self.pooler
    }

    /// Сворачивает признаки энкодера в вектор `[batch_size, output_size]`.
    ///
    /// - `weighted-layer`: взвешенная сумма слоев, затем маскированное среднее;
    /// - `attention`, `mean`: последний слой + маска;
    /// - `conv`: последний слой;
    /// - `lstm`: все слои.
    ///
    /// # Errors
    /// `PoolingError::IncompatibleShape` при несогласованных формах,
    /// `PoolingError::MissingFeature`, если стратегии нужны все слои, а их нет.
    pub fn forward(&self, features: EncoderFeatures<B>) -> Result<Tensor<B, 2>, PoolingError> {
        features.validate()?;

        let needs_all_layers = matches!(self.pooler, Pooler::WeightedLayer(_) | Pooler::Lstm(_));
        if needs_all_layers && features.all_layer_embeddings.is_empty() {
            return Err(PoolingError::MissingFeature(format!(
                "Стратегия '{}' требует all_layer_embeddings.",
                self.strategy
            )));
        }

        match &self.pooler {
            Pooler::WeightedLayer(pooling) => {
                let attention_mask = features.attention_mask.clone();
                let features = pooling.forward_features(features)?;
                let token_embeddings = features.token_embeddings.ok_or_else(|| {
                    PoolingError::MissingFeature("token_embeddings".to_string())
                })?;
                Ok(mean_pooling(token_embeddings, attention_mask))
            }
            Pooler::Attention(pooling) => {
                pooling.forward(features.last_hidden_state, features.attention_mask)
            }
            Pooler::Mean(pooling) => {
                pooling.forward(features.last_hidden_state, features.attention_mask)
            }
            Pooler::Conv(pooling) => pooling.forward(features.last_hidden_state),
            Pooler::Lstm(pooling) => pooling.forward(&features.all_layer_embeddings),
        }
    }
}
