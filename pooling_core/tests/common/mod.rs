// Общие помощники для интеграционных тестов pooling_core.
#![allow(dead_code)]

use burn::tensor::{backend::Backend, Int, Tensor};

pub type TestBackend = burn_ndarray::NdArray<f32>;
pub type TestAutodiffBackend = burn::backend::Autodiff<TestBackend>;

pub const TOLERANCE: f32 = 1e-5;

/// Значения тензора в виде плоского вектора.
pub fn values<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Vec<f32> {
    tensor.into_data().convert::<f32>().to_vec::<f32>().unwrap()
}

/// `num_layers` слоев `[batch, seq, hidden]`, слой `i` заполнен значением `i`.
pub fn constant_layers<B: Backend>(
    num_layers: usize,
    dims: [usize; 3],
    device: &B::Device,
) -> Vec<Tensor<B, 3>> {
    (0..num_layers)
        .map(|i| Tensor::<B, 3>::ones(dims, device).mul_scalar(i as f32))
        .collect()
}

/// `num_layers` слоев со случайными значениями.
pub fn random_layers<B: Backend>(
    num_layers: usize,
    dims: [usize; 3],
    device: &B::Device,
) -> Vec<Tensor<B, 3>> {
    (0..num_layers)
        .map(|_| Tensor::<B, 3>::random(dims, burn::tensor::Distribution::Default, device))
        .collect()
}

/// Маска из единиц `[batch, seq]`.
pub fn full_mask<B: Backend>(batch: usize, seq: usize, device: &B::Device) -> Tensor<B, 2, Int> {
    Tensor::<B, 2, Int>::ones([batch, seq], device)
}

pub fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "разная длина: {actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        approx::assert_abs_diff_eq!(*a, *e, epsilon = TOLERANCE);
    }
}
