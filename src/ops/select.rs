//! 条件選択（where）
//!
//! 論理配列`condition`に従い、同じ形状の二つの配列`a`, `b`から要素を選択します。
//! 出力形状は常に`a`の形状です。
//!
//! 論理演算の一般的なブロードキャストとは異なり、次の二つのモードのみを許可します。
//! - `SelectMode::Exact`: `condition`の形状が`a`と完全に一致
//! - `SelectMode::LeadingMask`: `condition`が1次元で、その長さが`a`（2次元以上）の
//!   先頭軸の大きさと一致。`condition[i]`が`a[i, ...]`全体の選択に使われる

use crate::array::{Array, ArrayError, MismatchReason};
use crate::context::{ExecutionContext, UnknownConditionPolicy};
use crate::dtype::{ArrayElement, Bool};
use crate::shape::Shape;

const OP_NAME: &str = "select";

/// 選択モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// 要素ごとに一対一で選択
    Exact,
    /// 先頭軸ごとに、長さ`slice_len`の部分配列をまとめて選択
    LeadingMask { slice_len: usize },
}

impl SelectMode {
    /// 形状から選択モードを決定
    ///
    /// 検査は次の順に行い、最初に失敗したものを`ArrayError::ShapeMismatch`として返します。
    /// 1. `a`と`b`の形状が一致すること（値配列間のブロードキャストはしない）
    /// 2. `condition`が`Exact`または`LeadingMask`の条件を満たすこと
    pub fn resolve(condition: &Shape, a: &Shape, b: &Shape) -> Result<Self, ArrayError> {
        if a != b {
            return Err(ArrayError::ShapeMismatch {
                op: OP_NAME,
                expected: a.dims().to_vec(),
                actual: b.dims().to_vec(),
                reason: MismatchReason::ValueShapes,
            });
        }

        if condition == a {
            return Ok(SelectMode::Exact);
        }

        if condition.rank() == 1 && a.rank() >= 2 && condition.leading_dim() == a.leading_dim() {
            let slice_len = a.dims()[1..].iter().product();
            return Ok(SelectMode::LeadingMask { slice_len });
        }

        Err(ArrayError::ShapeMismatch {
            op: OP_NAME,
            expected: a.dims().to_vec(),
            actual: condition.dims().to_vec(),
            reason: MismatchReason::Condition,
        })
    }
}

impl ExecutionContext {
    /// 条件選択
    ///
    /// `condition`の要素が`True`なら`a`、`False`なら`b`から取ります。
    /// `Unknown`の扱いは`ExecutionConfig::unknown_condition`に従います。
    pub fn select<T: ArrayElement>(
        &self,
        condition: &Array<Bool>,
        a: &Array<T>,
        b: &Array<T>,
    ) -> Result<Array<T>, ArrayError> {
        let mode = SelectMode::resolve(condition.shape(), a.shape(), b.shape())?;
        log::debug!(
            "select {:?}: condition {} over {}",
            mode,
            condition.shape(),
            a.shape()
        );

        let cond = condition.as_slice();
        let (xs, ys) = (a.as_slice(), b.as_slice());
        let mut data = Vec::with_capacity(a.len());

        match mode {
            SelectMode::Exact => {
                for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
                    data.push(if self.is_selected(cond[i], i)? { x } else { y });
                }
            }
            // 大きさ0の軸を含む場合は出力も空
            SelectMode::LeadingMask { slice_len: 0 } => {}
            SelectMode::LeadingMask { slice_len } => {
                let rows = xs.chunks(slice_len).zip(ys.chunks(slice_len));
                for (i, (row_a, row_b)) in rows.enumerate() {
                    let picked = if self.is_selected(cond[i], i)? {
                        row_a
                    } else {
                        row_b
                    };
                    data.extend_from_slice(picked);
                }
            }
        }

        Ok(Array::from_vec(data, a.shape().clone()))
    }

    fn is_selected(&self, c: Bool, index: usize) -> Result<bool, ArrayError> {
        match c {
            Bool::True => Ok(true),
            Bool::False => Ok(false),
            Bool::Unknown => match self.config().unknown_condition {
                UnknownConditionPolicy::Falsy => Ok(false),
                UnknownConditionPolicy::Reject => {
                    Err(ArrayError::UnknownCondition { op: OP_NAME, index })
                }
            },
        }
    }
}

impl Array<Bool> {
    /// この配列を条件として`a`, `b`から選択
    ///
    /// # Example
    /// ```
    /// use ndlogic::{Array, Bool};
    ///
    /// let c = Array::<Bool>::from_f32s(&[1.0, 0.0], [2]);
    /// let a = Array::from_vec(vec![10.0f32, 10.0, 10.0, 10.0], [2, 2]);
    /// let b = Array::from_vec(vec![5.0f32, 5.0, 5.0, 5.0], [2, 2]);
    /// assert_eq!(c.select(&a, &b)?.to_vec(), vec![10.0, 10.0, 5.0, 5.0]);
    /// # Ok::<(), ndlogic::ArrayError>(())
    /// ```
    pub fn select<T: ArrayElement>(&self, a: &Array<T>, b: &Array<T>) -> Result<Array<T>, ArrayError> {
        ExecutionContext::global().select(self, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExecutionConfig;
    use rstest::rstest;

    fn shape(dims: &[usize]) -> Shape {
        Shape::from(dims)
    }

    #[rstest]
    #[case(&[], &[], SelectMode::Exact)]
    #[case(&[4], &[4], SelectMode::Exact)]
    #[case(&[2, 3], &[2, 3], SelectMode::Exact)]
    #[case(&[4], &[4, 2], SelectMode::LeadingMask { slice_len: 2 })]
    #[case(&[4], &[4, 1], SelectMode::LeadingMask { slice_len: 1 })]
    #[case(&[4], &[4, 2, 1, 1], SelectMode::LeadingMask { slice_len: 2 })]
    fn test_resolve_ok(#[case] cond: &[usize], #[case] a: &[usize], #[case] expected: SelectMode) {
        let mode = SelectMode::resolve(&shape(cond), &shape(a), &shape(a)).unwrap();
        assert_eq!(mode, expected);
    }

    #[rstest]
    // rank1同士で長さ不一致
    #[case(&[4], &[3])]
    // 先頭軸不一致
    #[case(&[4], &[2, 2])]
    #[case(&[4], &[2, 2, 2, 1])]
    // rank2以上で形状不一致
    #[case(&[2, 2], &[2, 3])]
    #[case(&[2, 2, 1], &[2, 3, 1])]
    // 末尾軸へのマスクは不可
    #[case(&[2], &[4, 2])]
    // スカラー条件は一般ブロードキャストしない
    #[case(&[], &[3])]
    #[case(&[1], &[])]
    fn test_resolve_condition_mismatch(#[case] cond: &[usize], #[case] a: &[usize]) {
        let err = SelectMode::resolve(&shape(cond), &shape(a), &shape(a)).unwrap_err();
        match err {
            ArrayError::ShapeMismatch { op, reason, .. } => {
                assert_eq!(op, "select");
                assert_eq!(reason, MismatchReason::Condition);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_value_shapes_checked_first() {
        // conditionも不正だが、a/bの不一致が先に報告される
        let err = SelectMode::resolve(&shape(&[7]), &shape(&[2, 3]), &shape(&[2, 2])).unwrap_err();
        assert!(matches!(
            err,
            ArrayError::ShapeMismatch {
                reason: MismatchReason::ValueShapes,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_condition_falsy() {
        let ctx = ExecutionContext::new();
        let c = Array::from_vec(vec![Bool::True, Bool::Unknown, Bool::False], [3]);
        let a = Array::from_vec(vec![1i32, 2, 3], [3]);
        let b = Array::from_vec(vec![-1i32, -2, -3], [3]);
        assert_eq!(ctx.select(&c, &a, &b).unwrap().to_vec(), vec![1, -2, -3]);
    }

    #[test]
    fn test_unknown_condition_reject() {
        let config = ExecutionConfig::default().with_unknown_condition(UnknownConditionPolicy::Reject);
        let ctx = ExecutionContext::with_config(config);
        let c = Array::from_vec(vec![Bool::True, Bool::False, Bool::Unknown], [3]);
        let a = Array::from_vec(vec![1i32, 2, 3, 4, 5, 6], [3, 2]);
        let b = Array::from_vec(vec![0i32; 6], [3, 2]);

        let err = ctx.select(&c, &a, &b).unwrap_err();
        assert_eq!(err, ArrayError::UnknownCondition { op: "select", index: 2 });
    }

    #[test]
    fn test_leading_mask_with_empty_slice() {
        let ctx = ExecutionContext::new();
        let c = Array::<Bool>::from_f32s(&[1.0, 0.0], [2]);
        let a = Array::<f32>::zeros([2, 0]);
        let b = Array::<f32>::zeros([2, 0]);
        let out = ctx.select(&c, &a, &b).unwrap();
        assert_eq!(out.shape().dims(), &[2, 0]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_value_nan_passes_through() {
        let ctx = ExecutionContext::new();
        let c = Array::<Bool>::from_f32s(&[1.0, 0.0], [2]);
        let a = Array::from_vec(vec![f32::NAN, 1.0], [2]);
        let b = Array::from_vec(vec![2.0f32, f32::NAN], [2]);
        let out = ctx.select(&c, &a, &b).unwrap();
        assert!(out.as_slice().iter().all(|v| v.is_nan()));
    }
}
