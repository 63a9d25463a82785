//! 要素型
//!
//! 配列要素として使える型（`f32`, `i32`, `Bool`）と、要素型ごとの
//! 「不明値」（NaN相当）を定義します。
//!
//! 論理値は数値の0/1ではなく、三値のタグ付き型`Bool`で表します。
//! 不明値の判定は常に専用の述語（`is_nan`, `Bool::is_unknown`）で行い、
//! 浮動小数点のNaN比較（NaN != NaN）には依存しません。

use std::fmt;

// ============================================================================
// DType - データ型タグ
// ============================================================================

/// 要素のデータ型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    I32,
    F32,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Bool => write!(f, "bool"),
            DType::I32 => write!(f, "int32"),
            DType::F32 => write!(f, "float32"),
        }
    }
}

// ============================================================================
// Bool - 三値論理値
// ============================================================================

/// 論理配列の要素
///
/// `False`/`True`に加えて、未定義の論理値を表す`Unknown`を持ちます。
/// 生のエンコーディングは0, 1, 255です。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Bool {
    #[default]
    False = 0,
    True = 1,
    /// 不明値（論理値のNaN）
    Unknown = 255,
}

/// 論理値の不明値（プロセス全体で共有される定数）
pub const BOOL_UNKNOWN: Bool = Bool::Unknown;

impl Bool {
    /// 不明値
    pub const UNKNOWN: Bool = Bool::Unknown;

    /// `Unknown`のときの生のエンコーディング
    pub const UNKNOWN_RAW: u8 = 255;

    /// 不明値かどうか
    pub fn is_unknown(self) -> bool {
        matches!(self, Bool::Unknown)
    }

    pub fn is_true(self) -> bool {
        matches!(self, Bool::True)
    }

    /// `bool`に変換。不明値は`None`
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Bool::False => Some(false),
            Bool::True => Some(true),
            Bool::Unknown => None,
        }
    }

    /// 数値リテラルから変換
    ///
    /// 0は`False`、NaNは`Unknown`、それ以外は`True`になります。
    pub fn from_f32(value: f32) -> Self {
        if value.is_nan() {
            Bool::Unknown
        } else if value == 0.0 {
            Bool::False
        } else {
            Bool::True
        }
    }

    /// 数値に変換。不明値はNaN
    pub fn to_f32(self) -> f32 {
        match self {
            Bool::False => 0.0,
            Bool::True => 1.0,
            Bool::Unknown => f32::NAN,
        }
    }

    /// 生のエンコーディングから変換。0, 1, 255以外は`None`
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Bool::False),
            1 => Some(Bool::True),
            Self::UNKNOWN_RAW => Some(Bool::Unknown),
            _ => None,
        }
    }

    pub fn to_raw(self) -> u8 {
        self as u8
    }
}

impl From<bool> for Bool {
    fn from(value: bool) -> Self {
        if value { Bool::True } else { Bool::False }
    }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bool::False => write!(f, "false"),
            Bool::True => write!(f, "true"),
            Bool::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// ArrayElement - 配列要素トレイト
// ============================================================================

/// 配列要素として使用可能な型
pub trait ArrayElement: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// 対応するDType
    fn dtype() -> DType;

    /// デフォルト値（ゼロ相当）
    fn zero() -> Self;

    /// 単位元（1相当）
    fn one() -> Self;

    /// この型の不明値（NaN相当）
    fn nan() -> Self;

    /// 不明値かどうか
    fn is_nan(&self) -> bool;
}

impl ArrayElement for f32 {
    fn dtype() -> DType {
        DType::F32
    }
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn nan() -> Self {
        f32::NAN
    }
    fn is_nan(&self) -> bool {
        f32::is_nan(*self)
    }
}

impl ArrayElement for i32 {
    fn dtype() -> DType {
        DType::I32
    }
    fn zero() -> Self {
        0
    }
    fn one() -> Self {
        1
    }
    // i32には表現がないため最小値を予約する
    fn nan() -> Self {
        i32::MIN
    }
    fn is_nan(&self) -> bool {
        *self == i32::MIN
    }
}

impl ArrayElement for Bool {
    fn dtype() -> DType {
        DType::Bool
    }
    fn zero() -> Self {
        Bool::False
    }
    fn one() -> Self {
        Bool::True
    }
    fn nan() -> Self {
        Bool::Unknown
    }
    fn is_nan(&self) -> bool {
        self.is_unknown()
    }
}
