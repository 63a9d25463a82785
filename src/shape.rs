//! 形状とブロードキャスト解決
//!
//! 配列の形状（`Shape`）と、二つの形状からブロードキャスト後の出力形状および
//! 各入力へのインデックス対応を求める`BroadcastPlan`を提供します。
//!
//! # ブロードキャスト規則
//! 末尾の次元を揃えて比較し、各次元が等しいか一方が1であれば互換です。
//! 次元数が足りない側は先頭に1が補われたものとして扱います。

use crate::array::{ArrayError, MismatchReason};
use std::fmt;
use std::iter::FusedIterator;

// ============================================================================
// Shape - 形状
// ============================================================================

/// 配列の形状（各軸の大きさ）
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// 次元のリストから形状を作成
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Shape(dims.into())
    }

    /// スカラー（0次元）の形状
    pub fn scalar() -> Self {
        Shape(vec![])
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// 次元数（ランク）
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    /// 要素数。スカラーは1、大きさ0の軸を含む場合は0
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    /// i番目の軸の大きさ
    pub fn dim(&self, i: usize) -> usize {
        self.0[i]
    }

    /// 先頭の軸（最外側）の大きさ
    pub fn leading_dim(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// ブロードキャスト後の形状を計算
    ///
    /// 互換でない場合は`None`を返します。
    pub fn broadcast(&self, other: &Shape) -> Option<Shape> {
        broadcast_dims(self, other).ok().map(Shape)
    }

    /// 行優先（row-major）の連続レイアウトでのストライド
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.rank()];
        for i in (0..self.rank().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.0[i + 1];
        }
        strides
    }

    /// 多次元インデックスからフラットインデックスを計算
    pub fn flat_index(&self, indices: &[usize]) -> usize {
        indices
            .iter()
            .zip(self.strides())
            .map(|(i, s)| i * s)
            .sum()
    }

    /// フラットインデックスから多次元インデックスを計算
    ///
    /// # Panics
    /// `flat`が要素数以上の場合（大きさ0の軸を含む形状では常に）
    pub fn multi_index(&self, mut flat: usize) -> Vec<usize> {
        assert!(
            flat < self.numel(),
            "flat index {flat} out of range for shape {self}"
        );
        let mut indices = vec![0; self.rank()];
        for (axis, &dim) in self.0.iter().enumerate().rev() {
            indices[axis] = flat % dim;
            flat /= dim;
        }
        indices
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.0)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        if self.0.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Shape(v)
    }
}

impl From<&[usize]> for Shape {
    fn from(v: &[usize]) -> Self {
        Shape(v.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(v: [usize; N]) -> Self {
        Shape(v.to_vec())
    }
}

impl From<&Shape> for Shape {
    fn from(v: &Shape) -> Self {
        v.clone()
    }
}

impl From<()> for Shape {
    fn from(_: ()) -> Self {
        Shape::scalar()
    }
}

impl From<usize> for Shape {
    fn from(v: usize) -> Self {
        Shape(vec![v])
    }
}

// ============================================================================
// ブロードキャスト解決
// ============================================================================

/// 末尾揃えでi番目（出力ランク基準）の軸の大きさを取得
fn aligned_dim(shape: &Shape, rank: usize, axis: usize) -> usize {
    let offset = rank - shape.rank();
    if axis < offset {
        1
    } else {
        shape.0[axis - offset]
    }
}

/// 出力形状の各次元を計算。互換でない場合は最初に衝突した軸を返す
fn broadcast_dims(a: &Shape, b: &Shape) -> Result<Vec<usize>, usize> {
    let rank = a.rank().max(b.rank());
    let mut result = Vec::with_capacity(rank);

    for axis in 0..rank {
        let d1 = aligned_dim(a, rank, axis);
        let d2 = aligned_dim(b, rank, axis);

        if d1 == d2 || d2 == 1 {
            result.push(d1);
        } else if d1 == 1 {
            result.push(d2);
        } else {
            return Err(axis);
        }
    }

    Ok(result)
}

/// 出力ランクに揃えたストライド。大きさ1の軸と補われた軸は0になる
fn broadcast_strides(src: &Shape, out: &Shape) -> Vec<usize> {
    let rank_diff = out.rank() - src.rank();
    let mut strides = vec![0; out.rank()];

    for (i, (&dim, stride)) in src.0.iter().zip(src.strides()).enumerate() {
        if dim != 1 {
            strides[i + rank_diff] = stride;
        }
    }

    strides
}

/// 二項演算のブロードキャスト計画
///
/// 出力形状と、出力のフラットインデックスから各入力のフラットインデックスへの
/// 対応規則を保持します。小さい側の入力を展開したコピーは作りません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastPlan {
    out_shape: Shape,
    lhs_strides: Vec<usize>,
    rhs_strides: Vec<usize>,
}

impl BroadcastPlan {
    /// 二つの形状からブロードキャスト計画を作成
    ///
    /// 末尾揃えで比較した次元の組が等しくも1でもない場合は
    /// `ArrayError::ShapeMismatch`を返します。
    pub fn new(lhs: &Shape, rhs: &Shape) -> Result<Self, ArrayError> {
        let dims = broadcast_dims(lhs, rhs).map_err(|axis| ArrayError::ShapeMismatch {
            op: "broadcast",
            expected: lhs.dims().to_vec(),
            actual: rhs.dims().to_vec(),
            reason: MismatchReason::Broadcast { axis },
        })?;

        let out_shape = Shape(dims);
        let lhs_strides = broadcast_strides(lhs, &out_shape);
        let rhs_strides = broadcast_strides(rhs, &out_shape);

        Ok(Self {
            out_shape,
            lhs_strides,
            rhs_strides,
        })
    }

    pub fn out_shape(&self) -> &Shape {
        &self.out_shape
    }

    /// 出力の要素数
    pub fn numel(&self) -> usize {
        self.out_shape.numel()
    }

    /// 出力のフラットインデックスに対応する左辺のフラットインデックス
    ///
    /// 全要素を走査する場合は`indices()`の方が速い
    pub fn lhs_index(&self, flat: usize) -> usize {
        self.map_index(flat, &self.lhs_strides)
    }

    /// 出力のフラットインデックスに対応する右辺のフラットインデックス
    ///
    /// 全要素を走査する場合は`indices()`の方が速い
    pub fn rhs_index(&self, flat: usize) -> usize {
        self.map_index(flat, &self.rhs_strides)
    }

    fn map_index(&self, mut flat: usize, strides: &[usize]) -> usize {
        debug_assert!(flat < self.numel(), "flat index {flat} out of range");
        let mut idx = 0;
        for (axis, &dim) in self.out_shape.0.iter().enumerate().rev() {
            idx += (flat % dim) * strides[axis];
            flat /= dim;
        }
        idx
    }

    /// 出力の全要素について`(左辺インデックス, 右辺インデックス)`を行優先で列挙
    pub fn indices(&self) -> BroadcastIndices<'_> {
        BroadcastIndices {
            plan: self,
            coords: vec![0; self.out_shape.rank()],
            lhs: 0,
            rhs: 0,
            remaining: self.numel(),
        }
    }
}

/// `BroadcastPlan::indices`のイテレータ
///
/// 各ステップで座標を再計算せず、オドメータ式に座標とオフセットを進めます。
pub struct BroadcastIndices<'a> {
    plan: &'a BroadcastPlan,
    coords: Vec<usize>,
    lhs: usize,
    rhs: usize,
    remaining: usize,
}

impl BroadcastIndices<'_> {
    fn advance(&mut self) {
        let dims = self.plan.out_shape.dims();
        for axis in (0..dims.len()).rev() {
            let lhs_stride = self.plan.lhs_strides[axis];
            let rhs_stride = self.plan.rhs_strides[axis];

            self.coords[axis] += 1;
            self.lhs += lhs_stride;
            self.rhs += rhs_stride;
            if self.coords[axis] < dims[axis] {
                return;
            }

            // 桁上がり: この軸を先頭に巻き戻す
            self.coords[axis] = 0;
            self.lhs -= lhs_stride * dims[axis];
            self.rhs -= rhs_stride * dims[axis];
        }
    }
}

impl Iterator for BroadcastIndices<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let item = (self.lhs, self.rhs);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BroadcastIndices<'_> {}

impl FusedIterator for BroadcastIndices<'_> {}
