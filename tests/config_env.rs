//! 環境変数による設定の上書き
//!
//! 環境変数はプロセス全体で共有されるため、このバイナリは単一のテストだけを持ちます。

mod common;

use common::init_logger;
use ndlogic::context::{ENV_NO_CACHE, ENV_UNKNOWN_CONDITION};
use ndlogic::{ExecutionConfig, ExecutionContext, UnknownConditionPolicy};
use std::ffi::OsString;

/// 環境変数を設定し、drop時に元の値へ戻す
struct EnvGuard {
    key: &'static str,
    saved: Option<OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let saved = std::env::var_os(key);
        // SAFETY: このバイナリのテストは一つだけで、他のスレッドは環境変数を読まない
        unsafe {
            std::env::set_var(key, value);
        }
        Self { key, saved }
    }

    fn unset(key: &'static str) -> Self {
        let saved = std::env::var_os(key);
        // SAFETY: 同上
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: 同上
        unsafe {
            match &self.saved {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }
}

#[test]
fn test_from_env_overrides() {
    init_logger();

    // 変数なしならデフォルトと同じ
    {
        let _a = EnvGuard::unset(ENV_NO_CACHE);
        let _b = EnvGuard::unset(ENV_UNKNOWN_CONDITION);
        assert_eq!(ExecutionConfig::from_env(), ExecutionConfig::default());
    }

    // 両方を上書き（値の大文字小文字は問わない）
    {
        let _a = EnvGuard::set(ENV_NO_CACHE, "1");
        let _b = EnvGuard::set(ENV_UNKNOWN_CONDITION, "Reject");
        let config = ExecutionConfig::from_env();
        assert!(!config.enable_cache);
        assert_eq!(config.unknown_condition, UnknownConditionPolicy::Reject);
        assert_eq!(config.cache_capacity, ExecutionConfig::default().cache_capacity);

        let ctx = ExecutionContext::with_config(config);
        assert_eq!(ctx.cache().capacity(), 0);
    }

    // 空文字でも設定されていればキャッシュは無効
    {
        let _a = EnvGuard::set(ENV_NO_CACHE, "");
        let _b = EnvGuard::unset(ENV_UNKNOWN_CONDITION);
        assert!(!ExecutionConfig::from_env().enable_cache);
    }

    // 解釈できない値は無視される
    {
        let _a = EnvGuard::unset(ENV_NO_CACHE);
        let _b = EnvGuard::set(ENV_UNKNOWN_CONDITION, "maybe");
        let config = ExecutionConfig::from_env();
        assert!(config.enable_cache);
        assert_eq!(config.unknown_condition, UnknownConditionPolicy::Falsy);
    }
}
