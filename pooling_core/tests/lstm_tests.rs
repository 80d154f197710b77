mod common;

use burn::tensor::{Distribution, Tensor};
use common::{assert_close, random_layers, values, TestBackend};
use pooling_core::{LstmPoolingConfig, PoolingError};

type B = TestBackend;

const DIMS: [usize; 3] = [2, 5, 8];

#[test]
fn test_lstm_output_shape() {
    let device = Default::default();
    let pooler = LstmPoolingConfig::new(3, 8, 6).init::<B>(&device).unwrap();
    assert_eq!(pooler.output_size(), 6);

    let out = pooler.forward(&random_layers::<B>(4, DIMS, &device)).unwrap();
    assert_eq!(out.dims(), [2, 6]);
}

#[test]
fn test_lstm_uses_only_cls_of_encoder_layers() {
    let device = Default::default();
    let pooler = LstmPoolingConfig::new(3, 8, 6)
        .with_dropout(0.0)
        .init::<B>(&device)
        .unwrap();
    let layers = random_layers::<B>(4, DIMS, &device);

    // Слой эмбеддингов и все токены, кроме первого, не влияют на результат.
    let mut changed: Vec<Tensor<B, 3>> = layers
        .iter()
        .map(|layer| {
            let noise = Tensor::<B, 3>::random([2, 4, 8], Distribution::Default, &device);
            layer.clone().slice_assign([0..2, 1..5, 0..8], noise)
        })
        .collect();
    changed[0] = Tensor::<B, 3>::random(DIMS, Distribution::Default, &device);

    let expected = pooler.forward(&layers).unwrap();
    let actual = pooler.forward(&changed).unwrap();
    assert_close(&values(actual), &values(expected));
}

#[test]
fn test_lstm_depends_on_cls_vectors() {
    let device = Default::default();
    let pooler = LstmPoolingConfig::new(2, 8, 4).init::<B>(&device).unwrap();
    let layers = random_layers::<B>(3, DIMS, &device);
    let mut changed = layers.clone();
    changed[2] = layers[2].clone().add_scalar(1.0);

    let a = values(pooler.forward(&layers).unwrap());
    let b = values(pooler.forward(&changed).unwrap());
    assert!(a.iter().zip(&b).any(|(x, y)| (x - y).abs() > 1e-6));
}

#[test]
fn test_lstm_wrong_layer_count() {
    let device = Default::default();
    let pooler = LstmPoolingConfig::new(3, 8, 6).init::<B>(&device).unwrap();

    match pooler.forward(&random_layers::<B>(3, DIMS, &device)) {
        Err(PoolingError::IncompatibleShape(msg)) => assert!(msg.contains('4')),
        other => panic!("Ожидалась IncompatibleShape, получено {other:?}"),
    }
}

#[test]
fn test_lstm_hidden_size_mismatch() {
    let device = Default::default();
    let pooler = LstmPoolingConfig::new(2, 8, 6).init::<B>(&device).unwrap();

    let result = pooler.forward(&random_layers::<B>(3, [2, 5, 4], &device));
    assert!(matches!(result, Err(PoolingError::IncompatibleShape(_))));
}

#[test]
fn test_lstm_invalid_config() {
    let device: <B as burn::tensor::backend::Backend>::Device = Default::default();

    assert_eq!(LstmPoolingConfig::new(3, 8, 6).dropout, 0.1);
    assert!(matches!(
        LstmPoolingConfig::new(3, 8, 6).with_dropout(1.0).init::<B>(&device),
        Err(PoolingError::InvalidConfig(_))
    ));
    assert!(matches!(
        LstmPoolingConfig::new(0, 8, 6).init::<B>(&device),
        Err(PoolingError::InvalidConfig(_))
    ));
    assert!(matches!(
        LstmPoolingConfig::new(3, 8, 0).init::<B>(&device),
        Err(PoolingError::InvalidConfig(_))
    ));
}
