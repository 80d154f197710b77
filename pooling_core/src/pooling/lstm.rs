// pooling_core/src/pooling/lstm.rs

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Рекуррентный пулинг по слоям.
//!
//! Вектор первого токена (`[CLS]`) каждого слоя энкодера рассматривается как
//! шаг последовательности "по глубине". LSTM проходит слои снизу вверх,
//! выход последнего шага становится эмбеддингом предложения.

use burn::{
    config::Config,
    module::Module,
    nn::{Dropout, DropoutConfig, Lstm, LstmConfig},
    tensor::{backend::Backend, Tensor},
};

use crate::PoolingError;

/// Конфигурация для `LstmPooling`.
#[derive(Config, Debug)]
pub struct LstmPoolingConfig {
    /// Количество слоев энкодера (без слоя эмбеддингов) = число шагов LSTM.
    pub num_hidden_layers: usize,
    /// Размерность скрытых состояний энкодера (вход LSTM).
    pub hidden_size: usize,
    /// Размер скрытого состояния LSTM (выход головы).
    pub hidden_dim_lstm: usize,
    /// Вероятность дропаута на выходе.
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl LstmPoolingConfig {
    /// Создает новый экземпляр `LstmPooling`: однослойный однонаправленный LSTM и дропаут.
    ///
    /// # Errors
    /// `PoolingError::InvalidConfig` при нулевых размерностях или `dropout` вне `[0, 1)`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<LstmPooling<B>, PoolingError> {
        if self.num_hidden_layers == 0 || self.hidden_size == 0 || self.hidden_dim_lstm == 0 {
            return Err(PoolingError::InvalidConfig(format!(
                "num_hidden_layers ({}), hidden_size ({}) и hidden_dim_lstm ({}) должны быть > 0.",
                self.num_hidden_layers, self.hidden_size, self.hidden_dim_lstm
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(PoolingError::InvalidConfig(format!(
                "dropout должен лежать в [0, 1), получено {}.",
                self.dropout
            )));
        }

        Ok(LstmPooling {
            lstm: LstmConfig::new(self.hidden_size, self.hidden_dim_lstm, true).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            num_hidden_layers: self.num_hidden_layers,
            hidden_size: self.hidden_size,
            hidden_dim_lstm: self.hidden_dim_lstm,
        })
    }
}

/// LSTM-пулинг по `[CLS]`-векторам слоев.
#[derive(Module, Debug)]
pub struct LstmPooling<B: Backend> {
    lstm: Lstm<B>,
    /// Активен только на autodiff-бэкенде (при обучении).
    dropout: Dropout,
    num_hidden_layers: usize,
    hidden_size: usize,
    hidden_dim_lstm: usize,
}

impl<B: Backend> LstmPooling<B> {
    /// Размер выходного вектора.
    pub const fn output_size(&self) -> usize {
        self.hidden_dim_lstm
    }

    /// Выполняет LSTM-пулинг.
    ///
    /// # Аргументы
    /// * `all_hidden_states`: `num_hidden_layers + 1` тензоров `[batch_size, seq_len, hidden_size]`,
    ///   индекс 0 - слой эмбеддингов (не используется).
    ///
    /// # Возвращает
    /// `[batch_size, hidden_dim_lstm]`.
    ///
    /// # Errors
    /// `PoolingError::IncompatibleShape` при неверном числе слоев, пустой
    /// последовательности или несовпадении размерностей.
    pub fn forward(&self, all_hidden_states: &[Tensor<B, 3>]) -> Result<Tensor<B, 2>, PoolingError> {
        let expected_layers = self.num_hidden_layers + 1;
        if all_hidden_states.len() != expected_layers {
            return Err(PoolingError::IncompatibleShape(format!(
                "Ожидалось {expected_layers} скрытых состояний (эмбеддинги + {} слоев), получено {}.",
                self.num_hidden_layers,
                all_hidden_states.len()
            )));
        }

        let [batch_size, _, _] = all_hidden_states[1].dims();
        let mut cls_vectors = Vec::with_capacity(self.num_hidden_layers);
        for (index, layer) in all_hidden_states.iter().enumerate().skip(1) {
            let [layer_batch, seq_len, hidden_size] = layer.dims();
            if layer_batch != batch_size || seq_len == 0 || hidden_size != self.hidden_size {
                return Err(PoolingError::IncompatibleShape(format!(
                    "Слой {index}: форма {:?}, ожидалась [{batch_size}, >0, {}].",
                    layer.dims(),
                    self.hidden_size
                )));
            }
            // [batch, 1, hidden]: первый токен слоя.
            cls_vectors.push(layer.clone().slice([0..batch_size, 0..1, 0..hidden_size]));
        }

        // [batch, num_hidden_layers, hidden]
        let hidden_states = Tensor::cat(cls_vectors, 1);
        let (out, _state) = self.lstm.forward(hidden_states, None);

        let last_step = self.num_hidden_layers - 1;
        let last = out
            .slice([0..batch_size, last_step..self.num_hidden_layers, 0..self.hidden_dim_lstm])
            .reshape([batch_size, self.hidden_dim_lstm]);
        Ok(self.dropout.forward(last))
    }
}
