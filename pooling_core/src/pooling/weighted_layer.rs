// pooling_core/src/pooling/weighted_layer.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Взвешенная комбинация промежуточных слоев энкодера.
//!
//! Верхние слои трансформера несут разную информацию, поэтому вместо одного
//! последнего слоя берется взвешенное среднее слоев `layer_start..=num_hidden_layers`.

use burn::{
    config::Config,
    module::{Module, Param},
    tensor::{backend::Backend, Tensor, TensorData},
};
use tracing::warn;

use crate::{EncoderFeatures, PoolingError};

/// Конфигурация для `WeightedLayerPooling`.
#[derive(Config, Debug)]
pub struct WeightedLayerPoolingConfig {
    /// Количество слоев энкодера (без слоя эмбеддингов).
    pub num_hidden_layers: usize,
    /// Индекс первого слоя (в списке вместе со слоем эмбеддингов), входящего в сумму.
    #[config(default = 4)]
    pub layer_start: usize,
    /// Явно заданные веса слоев. Длина: `num_hidden_layers + 1 - layer_start`.
    /// `None` - обучаемые веса, инициализированные единицами.
    pub layer_weights: Option<Vec<f32>>,
    /// Обучаемы ли веса. `None` - обучаемы, только если не заданы явно.
    pub trainable: Option<bool>,
}

impl WeightedLayerPoolingConfig {
    /// Количество слоев, участвующих во взвешенной сумме.
    pub const fn num_weighted_layers(&self) -> usize {
        (self.num_hidden_layers + 1).saturating_sub(self.layer_start)
    }

    /// Создает новый экземпляр `WeightedLayerPooling`.
    ///
    /// # Errors
    /// `PoolingError::InvalidConfig`, если `layer_start > num_hidden_layers`,
    /// длина явных весов не совпадает с числом слоев, веса содержат
    /// не-конечные значения или их сумма равна нулю.
    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<WeightedLayerPooling<B>, PoolingError> {
        if self.layer_start > self.num_hidden_layers {
            return Err(PoolingError::InvalidConfig(format!(
                "layer_start ({}) не может превышать num_hidden_layers ({}).",
                self.layer_start, self.num_hidden_layers
            )));
        }
        let num_layers = self.num_weighted_layers();

        let (values, explicit) = match &self.layer_weights {
            Some(weights) => {
                validate_weights(weights, num_layers)?;
                (weights.clone(), true)
            }
            None => (vec![1.0_f32; num_layers], false),
        };
        // Явно переданные веса по умолчанию заморожены.
        let trainable = self.trainable.unwrap_or(!explicit);

        let tensor = Tensor::<B, 1>::from_data(TensorData::new(values, [num_layers]), device);
        let layer_weights = Param::from_tensor(tensor).set_require_grad(trainable);

        Ok(WeightedLayerPooling {
            layer_weights,
            num_hidden_layers: self.num_hidden_layers,
            layer_start: self.layer_start,
        })
    }
}

fn validate_weights(weights: &[f32], num_layers: usize) -> Result<(), PoolingError> {
    if weights.len() != num_layers {
        return Err(PoolingError::InvalidConfig(format!(
            "Ожидалось {num_layers} весов слоев, получено {}.",
            weights.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(PoolingError::InvalidConfig(
            "Веса слоев должны быть конечными числами.".to_string(),
        ));
    }
    let sum: f32 = weights.iter().sum();
    if sum.abs() <= f32::EPSILON {
        return Err(PoolingError::InvalidConfig(
            "Сумма весов слоев равна нулю: нормировка невозможна.".to_string(),
        ));
    }
    if weights.iter().any(|w| *w < 0.0) {
        warn!(?weights, "Среди весов слоев есть отрицательные значения.");
    }
    Ok(())
}

/// Взвешенный пулинг по слоям.
///
/// `output = sum_i(w_i * layer_i) / sum_i(w_i)` для слоев `layer_start..`.
#[derive(Module, Debug)]
pub struct WeightedLayerPooling<B: Backend> {
    /// Веса слоев, форма `[num_hidden_layers + 1 - layer_start]`.
    layer_weights: Param<Tensor<B, 1>>,
    num_hidden_layers: usize,
    layer_start: usize,
}

impl<B: Backend> WeightedLayerPooling<B> {
    /// Текущие веса слоев.
    pub fn layer_weights(&self) -> Tensor<B, 1> {
        self.layer_weights.val()
    }

    /// Индекс первого слоя, входящего в сумму.
    pub const fn layer_start(&self) -> usize {
        self.layer_start
    }

    /// Взвешенное среднее слоев.
    ///
    /// # Аргументы
    /// * `all_layers`: скрытые состояния всех слоев (включая эмбеддинги),
    ///   `num_hidden_layers + 1` тензоров формы `[batch_size, seq_len, hidden_size]`.
    ///
    /// # Возвращает
    /// `[batch_size, seq_len, hidden_size]`.
    ///
    /// # Errors
    /// `PoolingError::IncompatibleShape` при неверном числе слоев или разных формах.
    pub fn forward(&self, all_layers: &[Tensor<B, 3>]) -> Result<Tensor<B, 3>, PoolingError> {
        let expected_layers = self.num_hidden_layers + 1;
        if all_layers.len() != expected_layers {
            return Err(PoolingError::IncompatibleShape(format!(
                "Ожидалось {expected_layers} скрытых состояний (эмбеддинги + {} слоев), получено {}.",
                self.num_hidden_layers,
                all_layers.len()
            )));
        }

        let selected = &all_layers[self.layer_start..];
        let [batch_size, seq_len, hidden_size] = selected[0].dims();
        if let Some(bad) = selected.iter().find(|l| l.dims() != [batch_size, seq_len, hidden_size]) {
            return Err(PoolingError::IncompatibleShape(format!(
                "Слои имеют разные формы: {:?} и {:?}.",
                [batch_size, seq_len, hidden_size],
                bad.dims()
            )));
        }

        let num_layers = selected.len();
        // [num_layers, batch, seq, hidden]
        let all_layer_embedding: Tensor<B, 4> = Tensor::stack(selected.to_vec(), 0);

        let weights = self.layer_weights.val();
        let weight_factor = weights
            .clone()
            .reshape([num_layers, 1, 1, 1])
            .expand([num_layers, batch_size, seq_len, hidden_size]);

        let weighted_sum: Tensor<B, 3> = (weight_factor * all_layer_embedding)
            .sum_dim(0)
            .reshape([batch_size, seq_len, hidden_size]);
        let total_weight = weights
            .sum()
            .reshape([1, 1, 1])
            .expand([batch_size, seq_len, hidden_size]);

        Ok(weighted_sum / total_weight)
    }

    /// Записывает результат [`forward`](Self::forward) в `features.token_embeddings`.
    ///
    /// # Errors
    /// См. [`WeightedLayerPooling::forward`].
    pub fn forward_features(
        &self,
        mut features: EncoderFeatures<B>,
    ) -> Result<EncoderFeatures<B>, PoolingError> {
        let token_embeddings = self.forward(&features.all_layer_embeddings)?;
        features.token_embeddings = Some(token_embeddings);
        Ok(features)
    }
}
