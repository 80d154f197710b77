// pooling_core/src/features.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Набор выходов энкодера, который получают пулинг-головы.

use burn::tensor::{backend::Backend, Int, Tensor};

use crate::PoolingError;

/// Выходы энкодера для одного батча.
///
/// Все тензоры делят первые две размерности `[batch_size, seq_len]`.
#[derive(Debug, Clone)]
pub struct EncoderFeatures<B: Backend> {
    /// Скрытые состояния всех слоев, включая слой эмбеддингов под индексом 0.
    /// Каждый тензор имеет форму `[batch_size, seq_len, hidden_size]`.
    pub all_layer_embeddings: Vec<Tensor<B, 3>>,
    /// Выход последнего слоя, `[batch_size, seq_len, hidden_size]`.
    pub last_hidden_state: Tensor<B, 3>,
    /// Маска внимания `[batch_size, seq_len]`: 1 - реальный токен, 0 - паддинг.
    pub attention_mask: Tensor<B, 2, Int>,
    /// Поточечные эмбеддинги, записанные `WeightedLayerPooling`.
    pub token_embeddings: Option<Tensor<B, 3>>,
}

impl<B: Backend> EncoderFeatures<B> {
    /// Собирает признаки из скрытых состояний всех слоев.
    /// `last_hidden_state` берется из последнего элемента списка.
    ///
    /// # Errors
    /// `PoolingError::InvalidInput`, если список слоев пуст.
    pub fn new(
        all_layer_embeddings: Vec<Tensor<B, 3>>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Result<Self, PoolingError> {
        let last_hidden_state = all_layer_embeddings.last().cloned().ok_or_else(|| {
            PoolingError::InvalidInput("Список скрытых состояний слоев пуст.".to_string())
        })?;
        Ok(Self {
            all_layer_embeddings,
            last_hidden_state,
            attention_mask,
            token_embeddings: None,
        })
    }

    /// Признаки только из последнего слоя (для голов, которым не нужны промежуточные слои).
    pub fn from_last_hidden_state(
        last_hidden_state: Tensor<B, 3>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Self {
        Self {
            all_layer_embeddings: Vec::new(),
            last_hidden_state,
            attention_mask,
            token_embeddings: None,
        }
    }

    /// Размер батча.
    pub fn batch_size(&self) -> usize {
        self.last_hidden_state.dims()[0]
    }

    /// Длина последовательности.
    pub fn seq_len(&self) -> usize {
        self.last_hidden_state.dims()[1]
    }

    /// Размерность скрытых состояний.
    pub fn hidden_size(&self) -> usize {
        self.last_hidden_state.dims()[2]
    }

    /// Проверяет согласованность форм всех тензоров.
    ///
    /// # Errors
    /// `PoolingError::IncompatibleShape` при первом несовпадении.
    pub fn validate(&self) -> Result<(), PoolingError> {
        let expected = self.last_hidden_state.dims();
        check_mask(&self.attention_mask, expected)?;

        for (index, layer) in self.all_layer_embeddings.iter().enumerate() {
            if layer.dims() != expected {
                return Err(PoolingError::IncompatibleShape(format!(
                    "Слой {index} имеет форму {:?}, ожидалась {expected:?}.",
                    layer.dims()
                )));
            }
        }
        if let Some(tokens) = &self.token_embeddings {
            if tokens.dims()[..2] != expected[..2] {
                return Err(PoolingError::IncompatibleShape(format!(
                    "token_embeddings имеет форму {:?}, ожидалась [{}, {}, _].",
                    tokens.dims(),
                    expected[0],
                    expected[1]
                )));
            }
        }
        Ok(())
    }
}

/// Проверяет, что маска `[batch, seq]` соответствует скрытым состояниям `[batch, seq, hidden]`.
pub(crate) fn check_mask<B: Backend>(
    attention_mask: &Tensor<B, 2, Int>,
    hidden_dims: [usize; 3],
) -> Result<(), PoolingError> {
    let mask_dims = attention_mask.dims();
    if mask_dims != [hidden_dims[0], hidden_dims[1]] {
        return Err(PoolingError::IncompatibleShape(format!(
            "Маска внимания имеет форму {mask_dims:?}, ожидалась [{}, {}].",
            hidden_dims[0], hidden_dims[1]
        )));
    }
    Ok(())
}
