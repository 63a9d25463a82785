#![allow(dead_code)]

use ndlogic::{Array, Bool};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 数値リテラル（NaNは不明値）から論理配列を作成
pub fn bools(values: &[f32], shape: &[usize]) -> Array<Bool> {
    Array::<Bool>::from_f32s(values, shape)
}

pub fn floats(values: &[f32], shape: &[usize]) -> Array<f32> {
    Array::from_vec(values.to_vec(), shape)
}

/// 論理配列を数値表現と比較（NaN同士は一致とみなす）
pub fn assert_bools(actual: &Array<Bool>, expected: &[f32]) {
    let got = actual.to_f32_vec();
    assert_eq!(got.len(), expected.len(), "length mismatch: {got:?} vs {expected:?}");
    for (i, (g, e)) in got.iter().zip(expected).enumerate() {
        let same = (g.is_nan() && e.is_nan()) || g == e;
        assert!(same, "element {i}: got {g}, expected {e} ({got:?} vs {expected:?})");
    }
}
