// pooling_core/src/pooling/conv.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Сверточный пулинг.
//!
//! Две одномерные свертки вдоль последовательности сжимают признаки в один
//! канал, затем берется максимум по позициям. `kernel_size` играет роль окна.
//! Подходит для голов-фильтров (токсичность, негативные отзывы и т.п.).

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv1d, Conv1dConfig},
        PaddingConfig1d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

use crate::PoolingError;

/// Конфигурация для `ConvPooling`.
#[derive(Config, Debug)]
pub struct ConvPoolingConfig {
    /// Число входных каналов (размерность скрытых состояний).
    pub feature_size: usize,
    /// Размер ядра обеих сверток.
    pub kernel_size: usize,
    /// Паддинг с каждой стороны для обеих сверток.
    pub padding_size: usize,
    /// Число каналов между свертками.
    #[config(default = 256)]
    pub hidden_channels: usize,
}

impl ConvPoolingConfig {
    /// Создает новый экземпляр `ConvPooling`.
    ///
    /// # Errors
    /// `PoolingError::InvalidConfig`, если `feature_size`, `kernel_size` или
    /// `hidden_channels` равны нулю.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<ConvPooling<B>, PoolingError> {
        if self.feature_size == 0 || self.kernel_size == 0 || self.hidden_channels == 0 {
            return Err(PoolingError::InvalidConfig(format!(
                "feature_size ({}), kernel_size ({}) и hidden_channels ({}) должны быть > 0.",
                self.feature_size, self.kernel_size, self.hidden_channels
            )));
        }
        let padding = PaddingConfig1d::Explicit(self.padding_size);
        let conv_in = Conv1dConfig::new(self.feature_size, self.hidden_channels, self.kernel_size)
            .with_padding(padding.clone())
            .init(device);
        let conv_out = Conv1dConfig::new(self.hidden_channels, 1, self.kernel_size)
            .with_padding(padding)
            .init(device);

        Ok(ConvPooling {
            conv_in,
            activation: Relu::new(),
            conv_out,
            feature_size: self.feature_size,
            kernel_size: self.kernel_size,
            padding_size: self.padding_size,
        })
    }
}

/// Сверточный пулинг: `Conv1d -> ReLU -> Conv1d -> max по последовательности`.
#[derive(Module, Debug)]
pub struct ConvPooling<B: Backend> {
    conv_in: Conv1d<B>,
    activation: Relu,
    conv_out: Conv1d<B>,
    feature_size: usize,
    kernel_size: usize,
    padding_size: usize,
}

impl<B: Backend> ConvPooling<B> {
    /// Длина последовательности после одной свертки: `L + 2p - k + 1`.
    /// `None`, если окно не помещается.
    pub const fn conv_output_len(&self, seq_len: usize) -> Option<usize> {
        match (seq_len + 2 * self.padding_size + 1).checked_sub(self.kernel_size) {
            Some(0) | None => None,
            Some(len) => Some(len),
        }
    }

    /// Выполняет сверточный пулинг.
    ///
    /// # Аргументы
    /// * `last_hidden_state`: `[batch_size, seq_len, feature_size]`.
    ///
    /// # Возвращает
    /// Логит `[batch_size, 1]`.
    ///
    /// # Errors
    /// `PoolingError::IncompatibleShape`, если размерность признаков не равна
    /// `feature_size`, последовательность пуста или короче окна свертки.
    pub fn forward(&self, last_hidden_state: Tensor<B, 3>) -> Result<Tensor<B, 2>, PoolingError> {
        let [batch_size, seq_len, hidden_size] = last_hidden_state.dims();
        if hidden_size != self.feature_size {
            return Err(PoolingError::IncompatibleShape(format!(
                "ConvPooling ожидает feature_size {}, получено {hidden_size}.",
                self.feature_size
            )));
        }
        let out_len = Some(seq_len)
            .filter(|&len| len > 0)
            .and_then(|len| self.conv_output_len(len))
            .and_then(|len| self.conv_output_len(len))
            .ok_or_else(|| {
                PoolingError::IncompatibleShape(format!(
                    "Последовательность длины {seq_len} слишком коротка для kernel_size {} и padding {}.",
                    self.kernel_size, self.padding_size
                ))
            })?;

        // [batch, feature, seq]
        let embeddings = last_hidden_state.swap_dims(1, 2);
        let x = self.conv_in.forward(embeddings);
        let x = self.activation.forward(x);
        let logits = self.conv_out.forward(x); // [batch, 1, out_len]
        debug_assert_eq!(logits.dims(), [batch_size, 1, out_len]);

        Ok(logits.max_dim(2).reshape([batch_size, 1]))
    }
}
