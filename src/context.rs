//! 実行コンテキスト
//!
//! 演算の設定（`ExecutionConfig`）とブロードキャスト計画のキャッシュをまとめます。
//! 自由関数やメソッド形式の演算はプロセス全体で共有される
//! `ExecutionContext::global()`を使用します。

use crate::array::ArrayError;
use crate::cache::BroadcastCache;
use crate::shape::{BroadcastPlan, Shape};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// キャッシュを無効化する環境変数（値は問わない）
pub const ENV_NO_CACHE: &str = "NDLOGIC_NO_CACHE";

/// 条件配列の不明値の扱いを指定する環境変数（`falsy` | `reject`）
pub const ENV_UNKNOWN_CONDITION: &str = "NDLOGIC_UNKNOWN_CONDITION";

// ============================================================================
// UnknownConditionPolicy
// ============================================================================

/// 選択演算の条件配列に不明値が現れたときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownConditionPolicy {
    /// 偽として扱い、`b`から選択する
    #[default]
    Falsy,
    /// `ArrayError::UnknownCondition`を返す
    Reject,
}

impl FromStr for UnknownConditionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "falsy" => Ok(Self::Falsy),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown condition policy: {other}")),
        }
    }
}

impl fmt::Display for UnknownConditionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Falsy => write!(f, "falsy"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

// ============================================================================
// ExecutionConfig - 実行設定
// ============================================================================

/// 実行設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// ブロードキャスト計画のキャッシュを有効化
    pub enable_cache: bool,
    /// キャッシュの最大エントリ数
    pub cache_capacity: usize,
    /// 条件配列の不明値の扱い
    pub unknown_condition: UnknownConditionPolicy,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            cache_capacity: 256,
            unknown_condition: UnknownConditionPolicy::Falsy,
        }
    }
}

impl ExecutionConfig {
    /// デフォルト設定に環境変数を重ねる
    ///
    /// 解釈できない値は警告を出して無視します。
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if std::env::var_os(ENV_NO_CACHE).is_some() {
            config.enable_cache = false;
        }

        if let Ok(value) = std::env::var(ENV_UNKNOWN_CONDITION) {
            match value.parse() {
                Ok(policy) => config.unknown_condition = policy,
                Err(e) => log::warn!("ignoring {ENV_UNKNOWN_CONDITION}: {e}"),
            }
        }

        config
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub fn with_unknown_condition(mut self, policy: UnknownConditionPolicy) -> Self {
        self.unknown_condition = policy;
        self
    }
}

// ============================================================================
// ExecutionContext - 実行コンテキスト
// ============================================================================

/// 実行コンテキスト
///
/// 設定とブロードキャスト計画のキャッシュを保持します。
/// 論理演算は`ops::logical`、選択演算は`ops::select`でメソッドとして実装されています。
pub struct ExecutionContext {
    config: ExecutionConfig,
    cache: BroadcastCache,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext {
    /// デフォルト設定でコンテキストを作成
    pub fn new() -> Self {
        Self::with_config(ExecutionConfig::default())
    }

    /// 指定した設定でコンテキストを作成
    pub fn with_config(config: ExecutionConfig) -> Self {
        let capacity = if config.enable_cache {
            config.cache_capacity
        } else {
            0
        };

        Self {
            config,
            cache: BroadcastCache::new(capacity),
        }
    }

    /// プロセス全体で共有されるコンテキスト
    ///
    /// 初回呼び出し時に`ExecutionConfig::from_env()`で初期化されます。
    pub fn global() -> &'static ExecutionContext {
        static CTX: OnceLock<ExecutionContext> = OnceLock::new();
        CTX.get_or_init(|| {
            let config = ExecutionConfig::from_env();
            log::debug!("initializing global execution context: {:?}", config);
            ExecutionContext::with_config(config)
        })
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// キャッシュへの参照
    pub fn cache(&self) -> &BroadcastCache {
        &self.cache
    }

    /// 二つの形状のブロードキャスト計画を取得
    pub fn broadcast_plan(&self, lhs: &Shape, rhs: &Shape) -> Result<Arc<BroadcastPlan>, ArrayError> {
        if self.config.enable_cache {
            self.cache.get_or_resolve(lhs, rhs)
        } else {
            BroadcastPlan::new(lhs, rhs).map(Arc::new)
        }
    }
}
