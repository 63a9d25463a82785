//! Array構造体とエラー型
//!
//! `Array<T>`は形状と行優先のフラットバッファを持つ不変の値です。
//! 演算は入力を変更せず、常に新しい出力バッファを確保します。

use crate::dtype::{ArrayElement, Bool, DType};
use crate::shape::Shape;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// エラー型
// ============================================================================

/// 形状不一致の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    /// 末尾揃えで比較した軸の大きさが等しくも1でもない
    Broadcast { axis: usize },
    /// 選択演算の`a`と`b`の形状が異なる
    ValueShapes,
    /// 条件の形状が`a`と一致せず、先頭軸マスクとしても使えない
    Condition,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::Broadcast { axis } => {
                write!(f, "dimensions at axis {axis} are neither equal nor 1")
            }
            MismatchReason::ValueShapes => write!(f, "`a` and `b` must have the same shape"),
            MismatchReason::Condition => write!(
                f,
                "condition must match the shape of `a` or be a rank-1 mask over its leading dimension"
            ),
        }
    }
}

/// 配列操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// 形状不一致
    #[error("{op}: shape mismatch: {reason} (expected {expected:?}, got {actual:?})")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
        reason: MismatchReason,
    },

    /// 条件配列に不明値が含まれる（`UnknownConditionPolicy::Reject`のときのみ）
    #[error("{op}: condition element {index} is unknown")]
    UnknownCondition { op: &'static str, index: usize },
}

impl ArrayError {
    /// 形状不一致かどうか
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, ArrayError::ShapeMismatch { .. })
    }

    /// エラーを発生させた演算名
    pub fn op(&self) -> &'static str {
        match self {
            ArrayError::ShapeMismatch { op, .. } | ArrayError::UnknownCondition { op, .. } => op,
        }
    }

    /// 演算名を付け替える
    pub(crate) fn with_op(mut self, name: &'static str) -> Self {
        match &mut self {
            ArrayError::ShapeMismatch { op, .. } | ArrayError::UnknownCondition { op, .. } => {
                *op = name
            }
        }
        self
    }
}

// ============================================================================
// Array - メイン構造体
// ============================================================================

/// N次元配列
///
/// 形状とフラットバッファ（行優先）の組です。バッファ長は常に形状の要素数と
/// 一致し、構築時に検証されます（不一致はプログラムの誤りとしてpanicします）。
/// バッファは`Arc`で共有されるため、`clone`は安価です。
///
/// # 例
/// ```
/// use ndlogic::{Array, Bool};
///
/// let mask = Array::<Bool>::from_f32s(&[1.0, 0.0, f32::NAN], [3]);
/// assert_eq!(mask.shape().dims(), &[3]);
/// assert!(mask.get(2).is_unknown());
/// ```
#[derive(Clone, PartialEq)]
pub struct Array<T: ArrayElement> {
    shape: Shape,
    data: Arc<[T]>,
}

impl<T: ArrayElement> Array<T> {
    /// バッファと形状から配列を作成
    ///
    /// # Panics
    /// バッファ長が形状の要素数と一致しない場合
    pub fn from_vec(data: Vec<T>, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        assert_eq!(
            data.len(),
            shape.numel(),
            "buffer length {} does not match shape {}",
            data.len(),
            shape
        );

        Self {
            shape,
            data: data.into(),
        }
    }

    /// スカラー（0次元配列）を作成
    pub fn scalar(value: T) -> Self {
        Self::from_vec(vec![value], Shape::scalar())
    }

    /// 指定値で初期化された配列を作成
    pub fn full(shape: impl Into<Shape>, value: T) -> Self {
        let shape = shape.into();
        Self::from_vec(vec![value; shape.numel()], shape)
    }

    /// ゼロで初期化された配列を作成
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        Self::full(shape, T::zero())
    }

    /// 1で初期化された配列を作成
    pub fn ones(shape: impl Into<Shape>) -> Self {
        Self::full(shape, T::one())
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// 次元数を取得
    pub fn ndim(&self) -> usize {
        self.shape.rank()
    }

    /// 要素数を取得
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DType {
        T::dtype()
    }

    /// フラットバッファ（行優先）への参照
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// フラットインデックスで要素を取得
    pub fn get(&self, flat: usize) -> T {
        self.data[flat]
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

impl Array<Bool> {
    /// 数値リテラルから論理配列を作成
    ///
    /// 0は`False`、NaNは`Unknown`、それ以外は`True`になります。
    pub fn from_f32s(values: &[f32], shape: impl Into<Shape>) -> Self {
        Self::from_vec(values.iter().copied().map(Bool::from_f32).collect(), shape)
    }

    /// `bool`のスライスから論理配列を作成
    pub fn from_bools(values: &[bool], shape: impl Into<Shape>) -> Self {
        Self::from_vec(values.iter().copied().map(Bool::from).collect(), shape)
    }

    /// 数値表現に変換（不明値はNaN）
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.data.iter().map(|b| b.to_f32()).collect()
    }

    /// 不明値を含むかどうか
    pub fn has_unknown(&self) -> bool {
        self.data.iter().any(|b| b.is_unknown())
    }
}

impl<T: ArrayElement> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("shape", &self.shape)
            .field("dtype", &T::dtype())
            .field("data", &self.data)
            .finish()
    }
}
