// pooling_core/src/pooling/attention.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Пулинг вниманием (A Structured Self-Attentive Sentence Embedding, Lin et al., 2017).
//!
//! Небольшая сеть оценивает каждый токен, оценки нормируются softmax по
//! реальным токенам, результат - взвешенная сумма скрытых состояний.

use burn::{
    config::Config,
    module::Module,
    nn::{Gelu, LayerNorm, LayerNormConfig, Linear, LinearConfig},
    tensor::{activation::softmax, backend::Backend, Int, Tensor},
};

use crate::{features::check_mask, PoolingError};

/// Конфигурация для `AttentionPooling`.
#[derive(Config, Debug)]
pub struct AttentionPoolingConfig {
    /// Размерность скрытых состояний энкодера.
    pub in_dim: usize,
}

impl AttentionPoolingConfig {
    /// Создает новый экземпляр `AttentionPooling`.
    ///
    /// Оценочная сеть: `Linear(in_dim, in_dim) -> LayerNorm -> GELU -> Linear(in_dim, 1)`.
    ///
    /// # Errors
    /// `PoolingError::InvalidConfig`, если `in_dim == 0`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<AttentionPooling<B>, PoolingError> {
        if self.in_dim == 0 {
            return Err(PoolingError::InvalidConfig(
                "in_dim для AttentionPooling должен быть > 0.".to_string(),
            ));
        }
        Ok(AttentionPooling {
            projection: LinearConfig::new(self.in_dim, self.in_dim).init(device),
            norm: LayerNormConfig::new(self.in_dim).init(device),
            activation: Gelu::new(),
            score: LinearConfig::new(self.in_dim, 1).init(device),
            in_dim: self.in_dim,
        })
    }
}

/// Пулинг вниманием.
#[derive(Module, Debug)]
pub struct AttentionPooling<B: Backend> {
    projection: Linear<B>,
    norm: LayerNorm<B>,
    activation: Gelu,
    /// Проекция в скалярную оценку токена.
    score: Linear<B>,
    in_dim: usize,
}

impl<B: Backend> AttentionPooling<B> {
    /// Ненормированные оценки токенов, `[batch_size, seq_len, 1]`.
    pub fn scores(&self, last_hidden_state: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = self.projection.forward(last_hidden_state);
        let x = self.norm.forward(x);
        let x = self.activation.forward(x);
        self.score.forward(x)
    }

    /// Выполняет пулинг вниманием.
    ///
    /// # Аргументы
    /// * `last_hidden_state`: `[batch_size, seq_len, in_dim]`.
    /// * `attention_mask`: `[batch_size, seq_len]`, 0 - паддинг.
    ///
    /// # Возвращает
    /// `[batch_size, in_dim]`. Строка, где все токены замаскированы, дает нулевой вектор.
    ///
    /// # Errors
    /// `PoolingError::IncompatibleShape` при несовпадении `in_dim`, формы маски
    /// или пустой последовательности.
    pub fn forward(
        &self,
        last_hidden_state: Tensor<B, 3>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Result<Tensor<B, 2>, PoolingError> {
        let [batch_size, seq_len, hidden_size] = last_hidden_state.dims();
        if hidden_size != self.in_dim {
            return Err(PoolingError::IncompatibleShape(format!(
                "AttentionPooling ожидает hidden_size {}, получено {hidden_size}.",
                self.in_dim
            )));
        }
        check_mask(&attention_mask, last_hidden_state.dims())?;
        if seq_len == 0 {
            return Err(PoolingError::IncompatibleShape(
                "AttentionPooling: пустая последовательность (seq_len = 0).".to_string(),
            ));
        }

        let padding = attention_mask.equal_elem(0).reshape([batch_size, seq_len, 1]);

        let w = self
            .scores(last_hidden_state.clone())
            .mask_fill(padding.clone(), f32::NEG_INFINITY);
        // softmax по оси последовательности; полностью замаскированные строки
        // дают NaN (-inf - -inf), они обнуляются вторым mask_fill.
        let w = softmax(w, 1).mask_fill(padding, 0.0);

        let attention_embeddings: Tensor<B, 2> = (w.expand([batch_size, seq_len, hidden_size])
            * last_hidden_state)
            .sum_dim(1)
            .reshape([batch_size, hidden_size]);
        Ok(attention_embeddings)
    }
}
