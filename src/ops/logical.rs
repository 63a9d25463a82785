//! 論理演算（NOT, AND, OR, XOR）
//!
//! 論理配列（`Array<Bool>`）に対する要素ごとの論理演算を提供します。
//! 二項演算は形状をブロードキャストします。
//!
//! # 不明値の伝播
//! どちらかの要素が`Bool::Unknown`なら、結果は常に`Unknown`です。
//! AND の`False`や OR の`True`のような支配的な値があっても吸収されません。

use crate::array::{Array, ArrayError};
use crate::context::ExecutionContext;
use crate::dtype::Bool;

// ============================================================================
// LogicalOp - 二項論理演算の種類
// ============================================================================

/// 二項論理演算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Xor,
}

impl LogicalOp {
    /// エラーやログに使う演算名
    pub fn name(self) -> &'static str {
        match self {
            LogicalOp::And => "logical_and",
            LogicalOp::Or => "logical_or",
            LogicalOp::Xor => "logical_xor",
        }
    }

    /// 二つの要素に演算を適用
    pub fn apply(self, lhs: Bool, rhs: Bool) -> Bool {
        let (Some(l), Some(r)) = (lhs.to_bool(), rhs.to_bool()) else {
            return Bool::Unknown;
        };

        let result = match self {
            LogicalOp::And => l.min(r),
            LogicalOp::Or => l.max(r),
            LogicalOp::Xor => l != r,
        };
        Bool::from(result)
    }
}

/// 論理否定を一要素に適用
pub fn not_element(x: Bool) -> Bool {
    match x {
        Bool::False => Bool::True,
        Bool::True => Bool::False,
        Bool::Unknown => Bool::Unknown,
    }
}

// ============================================================================
// ExecutionContext上の演算
// ============================================================================

impl ExecutionContext {
    /// 論理否定。出力形状は入力と同じ
    pub fn logical_not(&self, x: &Array<Bool>) -> Array<Bool> {
        log::trace!("logical_not {}", x.shape());
        let data = x.as_slice().iter().copied().map(not_element).collect();
        Array::from_vec(data, x.shape().clone())
    }

    /// 二項論理演算を適用
    ///
    /// 形状がブロードキャスト不可能な場合は`ArrayError::ShapeMismatch`を返します。
    pub fn logical_binary(
        &self,
        op: LogicalOp,
        lhs: &Array<Bool>,
        rhs: &Array<Bool>,
    ) -> Result<Array<Bool>, ArrayError> {
        let plan = self
            .broadcast_plan(lhs.shape(), rhs.shape())
            .map_err(|e| e.with_op(op.name()))?;
        log::trace!(
            "{} {} x {} -> {}",
            op.name(),
            lhs.shape(),
            rhs.shape(),
            plan.out_shape()
        );

        let l = lhs.as_slice();
        let r = rhs.as_slice();
        let data = plan
            .indices()
            .map(|(i, j)| op.apply(l[i], r[j]))
            .collect();

        Ok(Array::from_vec(data, plan.out_shape().clone()))
    }

    /// 論理積
    pub fn logical_and(&self, lhs: &Array<Bool>, rhs: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
        self.logical_binary(LogicalOp::And, lhs, rhs)
    }

    /// 論理和
    pub fn logical_or(&self, lhs: &Array<Bool>, rhs: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
        self.logical_binary(LogicalOp::Or, lhs, rhs)
    }

    /// 排他的論理和
    pub fn logical_xor(&self, lhs: &Array<Bool>, rhs: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
        self.logical_binary(LogicalOp::Xor, lhs, rhs)
    }
}

// ============================================================================
// メソッド形式（チェイン用）
// ============================================================================

impl Array<Bool> {
    /// 論理否定
    ///
    /// # Example
    /// ```
    /// use ndlogic::{Array, Bool};
    ///
    /// let a = Array::<Bool>::from_f32s(&[1.0, 0.0, 0.0], [3]);
    /// assert_eq!(a.logical_not().to_f32_vec(), vec![0.0, 1.0, 1.0]);
    /// ```
    pub fn logical_not(&self) -> Array<Bool> {
        ExecutionContext::global().logical_not(self)
    }

    /// 論理積
    pub fn logical_and(&self, other: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
        ExecutionContext::global().logical_and(self, other)
    }

    /// 論理和
    pub fn logical_or(&self, other: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
        ExecutionContext::global().logical_or(self, other)
    }

    /// 排他的論理和
    pub fn logical_xor(&self, other: &Array<Bool>) -> Result<Array<Bool>, ArrayError> {
        ExecutionContext::global().logical_xor(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::MismatchReason;
    use rstest::rstest;

    const F: Bool = Bool::False;
    const T: Bool = Bool::True;
    const U: Bool = Bool::Unknown;

    #[rstest]
    #[case(LogicalOp::And, [F, F, F, T])]
    #[case(LogicalOp::Or, [F, T, T, T])]
    #[case(LogicalOp::Xor, [F, T, T, F])]
    fn test_truth_table(#[case] op: LogicalOp, #[case] expected: [Bool; 4]) {
        let pairs = [(F, F), (F, T), (T, F), (T, T)];
        for ((l, r), want) in pairs.into_iter().zip(expected) {
            assert_eq!(op.apply(l, r), want, "{:?}({l}, {r})", op);
        }
    }

    #[rstest]
    fn test_unknown_dominates(
        #[values(LogicalOp::And, LogicalOp::Or, LogicalOp::Xor)] op: LogicalOp,
        #[values(F, T, U)] other: Bool,
    ) {
        assert_eq!(op.apply(U, other), U);
        assert_eq!(op.apply(other, U), U);
    }

    #[test]
    fn test_not_element() {
        assert_eq!(not_element(T), F);
        assert_eq!(not_element(F), T);
        assert_eq!(not_element(U), U);
    }

    #[test]
    fn test_mismatch_carries_op_name() {
        let ctx = ExecutionContext::new();
        let a = Array::<Bool>::from_f32s(&[1.0, 0.0], [2]);
        let b = Array::<Bool>::from_f32s(&[0.0, 1.0, 0.0], [3]);

        let err = ctx.logical_xor(&a, &b).unwrap_err();
        assert_eq!(
            err,
            ArrayError::ShapeMismatch {
                op: "logical_xor",
                expected: vec![2],
                actual: vec![3],
                reason: MismatchReason::Broadcast { axis: 0 },
            }
        );
    }

    #[test]
    fn test_scalar_broadcast() {
        let ctx = ExecutionContext::new();
        let a = Array::scalar(T);
        let b = Array::<Bool>::from_f32s(&[1.0, 0.0, f32::NAN], [3]);
        let out = ctx.logical_and(&a, &b).unwrap();
        assert_eq!(out.shape().dims(), &[3]);
        assert_eq!(out.to_vec(), vec![T, F, U]);
    }
}
