//! ndlogic: N次元配列の論理演算と条件選択
//!
//! 論理配列に対する要素ごとの論理演算（NOT, AND, OR, XOR）と、
//! 条件に従って二つの配列から要素を選ぶ条件選択（where）を提供します。
//!
//! # 特徴
//!
//! - **ブロードキャスト**: 末尾揃えで形状を比較し、大きさ1の軸を拡張
//!   （小さい側の配列はコピーせず、インデックスの対応だけを計算）
//! - **不明値**: 論理値は三値（`False`/`True`/`Unknown`）。`Unknown`は論理演算を
//!   無条件に伝播します
//! - **二種類の選択モード**: 形状完全一致と、1次元条件による先頭軸マスク
//! - **キャッシュ**: 同じ形状の組に対するブロードキャスト計画を再利用
//!
//! # Example
//!
//! ```
//! use ndlogic::prelude::*;
//!
//! let a = Array::<Bool>::from_f32s(&[1.0, 0.0], [2, 1]);
//! let b = Array::<Bool>::from_f32s(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0], [2, 3]);
//!
//! let c = a.logical_or(&b)?;
//! assert_eq!(c.shape().dims(), &[2, 3]);
//! assert_eq!(c.to_f32_vec(), vec![1.0, 1.0, 1.0, 0.0, 1.0, 0.0]);
//! # Ok::<(), ndlogic::ArrayError>(())
//! ```

pub mod array;
pub mod cache;
pub mod context;
pub mod dtype;
pub mod ops;
pub mod shape;

// Re-exports
pub use array::{Array, ArrayError, MismatchReason};
pub use cache::BroadcastCache;
pub use context::{ExecutionConfig, ExecutionContext, UnknownConditionPolicy};
pub use dtype::{ArrayElement, BOOL_UNKNOWN, Bool, DType};
pub use ops::{LogicalOp, SelectMode, and, not, or, select, xor};
pub use shape::{BroadcastPlan, Shape};

/// Prelude module - 主要な型をまとめてインポート
pub mod prelude {
    pub use crate::array::{Array, ArrayError};
    pub use crate::dtype::{ArrayElement, BOOL_UNKNOWN, Bool};
    pub use crate::ops::{and, not, or, select, xor};
    pub use crate::shape::Shape;
}
