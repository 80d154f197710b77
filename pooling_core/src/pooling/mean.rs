// pooling_core/src/pooling/mean.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Маскированный средний пулинг.

use burn::tensor::{backend::Backend, Int, Tensor};

use crate::{features::check_mask, PoolingError};

/// Нижняя граница знаменателя: строка без реальных токенов дает нулевой вектор, а не NaN.
pub const MEAN_POOLING_EPS: f64 = 1e-9;

/// Среднее скрытых состояний по реальным токенам.
///
/// `sum_s(mask_s * h_s) / max(sum_s(mask_s), 1e-9)`
///
/// # Аргументы
/// * `last_hidden_state`: `[batch_size, seq_len, hidden_size]`.
/// * `attention_mask`: `[batch_size, seq_len]`, 1 - токен, 0 - паддинг.
///
/// # Возвращает
/// `[batch_size, hidden_size]`. Формы не проверяются, см. [`MeanPooling::forward`].
pub fn mean_pooling<B: Backend>(
    last_hidden_state: Tensor<B, 3>,
    attention_mask: Tensor<B, 2, Int>,
) -> Tensor<B, 2> {
    let [batch_size, seq_len, hidden_size] = last_hidden_state.dims();

    // [batch, seq] -> [batch, seq, hidden]
    let input_mask_expanded = attention_mask
        .float()
        .reshape([batch_size, seq_len, 1])
        .expand([batch_size, seq_len, hidden_size]);

    let sum_embeddings: Tensor<B, 2> = (last_hidden_state * input_mask_expanded.clone())
        .sum_dim(1)
        .reshape([batch_size, hidden_size]);
    let sum_mask: Tensor<B, 2> = input_mask_expanded
        .sum_dim(1)
        .reshape([batch_size, hidden_size])
        .clamp_min(MEAN_POOLING_EPS);

    sum_embeddings / sum_mask
}

/// Средний пулинг без обучаемых параметров.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanPooling;

impl MeanPooling {
    /// Создает голову среднего пулинга.
    pub const fn new() -> Self {
        Self
    }

    /// Выполняет средний пулинг с проверкой форм.
    ///
    /// # Errors
    /// `PoolingError::IncompatibleShape`, если маска не совпадает с `[batch, seq]` скрытых состояний.
    pub fn forward<B: Backend>(
        &self,
        last_hidden_state: Tensor<B, 3>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Result<Tensor<B, 2>, PoolingError> {
        check_mask(&attention_mask, last_hidden_state.dims())?;
        Ok(mean_pooling(last_hidden_state, attention_mask))
    }
}
