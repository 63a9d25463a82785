//! 配列演算
//!
//! - `logical`: 論理演算（NOT, AND, OR, XOR）
//! - `select`: 条件選択
//!
//! ここの自由関数はすべて`ExecutionContext::global()`で実行されます。
//! 設定を変えたい場合は`ExecutionContext`のメソッドを直接使ってください。

pub mod logical;
pub mod select;

pub use logical::LogicalOp;
pub use select::SelectMode;

use crate::array::{Array, ArrayError};
use crate::context::ExecutionContext;
use crate::dtype::{ArrayElement, Bool};

/// 論理否定
pub fn not(x: &Array<Bool>) -> Array<Bool> {
    ExecutionContext::global().logical_not(x)
}

/// 論理積（ブロードキャストあり）
pub fn and(a: &Array<Bool>, b: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
    ExecutionContext::global().logical_and(a, b)
}

/// 論理和（ブロードキャストあり）
pub fn or(a: &Array<Bool>, b: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
    ExecutionContext::global().logical_or(a, b)
}

/// 排他的論理和（ブロードキャストあり）
pub fn xor(a: &Array<Bool>, b: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
    ExecutionContext::global().logical_xor(a, b)
}

/// 条件選択
pub fn select<T: ArrayElement>(
    condition: &Array<Bool>,
    a: &Array<T>,
    b: &Array<T>,
) -> Result<Array<T>, ArrayError> {
    ExecutionContext::global().select(condition, a, b)
}
