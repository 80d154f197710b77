mod common;

use burn::tensor::{Int, Tensor};
use common::{assert_close, values, TestBackend};
use pooling_core::{mean_pooling, MeanPooling, PoolingError};

type B = TestBackend;

fn padded_batch(device: &<B as burn::tensor::backend::Backend>::Device) -> Tensor<B, 3> {
    Tensor::<B, 3>::from_floats(
        [
            [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0], [9.0, 9.0, 9.0, 9.0]],
            [[2.0, 2.0, 2.0, 2.0], [2.0, 2.0, 2.0, 2.0], [100.0, 100.0, 100.0, 100.0]],
        ],
        device,
    )
}

#[test]
fn test_mean_pooling_ignores_padding() {
    let device = Default::default();
    let mask = Tensor::<B, 2, Int>::from_ints([[1, 1, 0], [1, 1, 0]], &device);

    let pooled = mean_pooling(padded_batch(&device), mask);

    assert_eq!(pooled.dims(), [2, 4]);
    assert_close(&values(pooled), &[3.0, 4.0, 5.0, 6.0, 2.0, 2.0, 2.0, 2.0]);
}

#[test]
fn test_mean_pooling_full_mask_is_plain_mean() {
    let device = Default::default();
    let mask = Tensor::<B, 2, Int>::from_ints([[1, 1, 1], [1, 0, 0]], &device);

    let pooled = MeanPooling::new().forward(padded_batch(&device), mask).unwrap();

    assert_close(&values(pooled), &[5.0, 17.0 / 3.0, 19.0 / 3.0, 7.0, 2.0, 2.0, 2.0, 2.0]);
}

#[test]
fn test_mean_pooling_fully_masked_row_is_zero() {
    let device = Default::default();
    let mask = Tensor::<B, 2, Int>::from_ints([[0, 0, 0], [1, 1, 1]], &device);

    let pooled = MeanPooling::new().forward(padded_batch(&device), mask).unwrap();
    let pooled = values(pooled);

    assert!(pooled.iter().all(|v| v.is_finite()));
    assert_close(&pooled[..4], &[0.0, 0.0, 0.0, 0.0]);
    assert_close(&pooled[4..], &[104.0 / 3.0; 4]);
}

#[test]
fn test_mean_pooling_rejects_mask_shape_mismatch() {
    let device = Default::default();
    let mask = Tensor::<B, 2, Int>::from_ints([[1, 1], [1, 1]], &device);

    match MeanPooling::new().forward(padded_batch(&device), mask) {
        Err(PoolingError::IncompatibleShape(msg)) => assert!(msg.contains("[2, 3]")),
        other => panic!("Ожидалась IncompatibleShape, получено {other:?}"),
    }
}
