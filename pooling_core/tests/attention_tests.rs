mod common;

use burn::tensor::{Distribution, Int, Tensor};
use common::{assert_close, full_mask, values, TestBackend};
use pooling_core::{AttentionPoolingConfig, PoolingError};

type B = TestBackend;

#[test]
fn test_attention_output_shape() {
    let device = Default::default();
    let pooler = AttentionPoolingConfig::new(8).init::<B>(&device).unwrap();
    let hidden = Tensor::<B, 3>::random([3, 5, 8], Distribution::Default, &device);

    assert_eq!(pooler.scores(hidden.clone()).dims(), [3, 5, 1]);

    let out = pooler.forward(hidden, full_mask::<B>(3, 5, &device)).unwrap();
    assert_eq!(out.dims(), [3, 8]);
}

#[test]
fn test_attention_single_token_returns_its_state() {
    let device = Default::default();
    let pooler = AttentionPoolingConfig::new(4).init::<B>(&device).unwrap();
    let hidden = Tensor::<B, 3>::random([2, 3, 4], Distribution::Default, &device);
    let mask = Tensor::<B, 2, Int>::from_ints([[1, 0, 0], [0, 0, 1]], &device);

    let out = values(pooler.forward(hidden.clone(), mask).unwrap());

    let first = values(hidden.clone().slice([0..1, 0..1, 0..4]));
    let second = values(hidden.slice([1..2, 2..3, 0..4]));
    assert_close(&out[..4], &first);
    assert_close(&out[4..], &second);
}

#[test]
fn test_attention_ignores_padded_positions() {
    let device = Default::default();
    let pooler = AttentionPoolingConfig::new(4).init::<B>(&device).unwrap();
    let hidden = Tensor::<B, 3>::random([2, 4, 4], Distribution::Default, &device);
    let noise = Tensor::<B, 3>::random([2, 2, 4], Distribution::Default, &device).mul_scalar(50.0);
    let noisy = hidden.clone().slice_assign([0..2, 2..4, 0..4], noise);
    let mask = Tensor::<B, 2, Int>::from_ints([[1, 1, 0, 0], [1, 1, 0, 0]], &device);

    let clean = pooler.forward(hidden, mask.clone()).unwrap();
    let noisy = pooler.forward(noisy, mask).unwrap();

    assert_close(&values(clean), &values(noisy));
}

#[test]
fn test_attention_is_convex_combination() {
    let device = Default::default();
    let pooler = AttentionPoolingConfig::new(4).init::<B>(&device).unwrap();
    // У всех токенов одинаковое скрытое состояние: любая выпуклая комбинация равна ему.
    let hidden = Tensor::<B, 3>::from_floats([[[0.5, -1.0, 2.0, 3.0]; 3]], &device);

    let out = pooler.forward(hidden, full_mask::<B>(1, 3, &device)).unwrap();
    assert_close(&values(out), &[0.5, -1.0, 2.0, 3.0]);
}

#[test]
fn test_attention_fully_masked_row_is_zero() {
    let device = Default::default();
    let pooler = AttentionPoolingConfig::new(4).init::<B>(&device).unwrap();
    let hidden = Tensor::<B, 3>::random([2, 3, 4], Distribution::Default, &device);
    let mask = Tensor::<B, 2, Int>::from_ints([[0, 0, 0], [1, 1, 1]], &device);

    let out = values(pooler.forward(hidden, mask).unwrap());

    assert!(out.iter().all(|v| v.is_finite()));
    assert_close(&out[..4], &[0.0; 4]);
}

#[test]
fn test_attention_shape_errors() {
    let device = Default::default();
    let pooler = AttentionPoolingConfig::new(4).init::<B>(&device).unwrap();

    let wrong_hidden = Tensor::<B, 3>::zeros([1, 3, 6], &device);
    assert!(matches!(
        pooler.forward(wrong_hidden, full_mask::<B>(1, 3, &device)),
        Err(PoolingError::IncompatibleShape(_))
    ));

    let hidden = Tensor::<B, 3>::zeros([1, 3, 4], &device);
    assert!(matches!(
        pooler.forward(hidden, full_mask::<B>(1, 2, &device)),
        Err(PoolingError::IncompatibleShape(_))
    ));
}

#[test]
fn test_attention_empty_sequence() {
    let device = Default::default();
    let pooler = AttentionPoolingConfig::new(4).init::<B>(&device).unwrap();
    let hidden = Tensor::<B, 3>::zeros([2, 0, 4], &device);
    let mask = Tensor::<B, 2, Int>::zeros([2, 0], &device);

    match pooler.forward(hidden, mask) {
        Err(PoolingError::IncompatibleShape(msg)) => assert!(msg.contains("seq_len")),
        other => panic!("Ожидалась IncompatibleShape, получено {other:?}"),
    }
}

#[test]
fn test_attention_zero_dim_config() {
    let device: <B as burn::tensor::backend::Backend>::Device = Default::default();
    assert!(matches!(
        AttentionPoolingConfig::new(0).init::<B>(&device),
        Err(PoolingError::InvalidConfig(_))
    ));
}
