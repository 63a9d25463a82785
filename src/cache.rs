//! ブロードキャスト計画のキャッシュ
//!
//! 同じ形状の組に対する`BroadcastPlan`を再利用するための機構を提供します。
//! 計画は不変なので、キャッシュの有無は結果に影響しません。

use crate::array::ArrayError;
use crate::shape::{BroadcastPlan, Shape};
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// キャッシュのキー（左辺と右辺の形状）
pub type PlanKey = (Shape, Shape);

/// ブロードキャスト計画のキャッシュ
///
/// スレッドセーフなキャッシュで、同じ形状の組に対する計画を再利用します。
/// エントリ数が`capacity`に達した場合は全消去してから挿入します。
pub struct BroadcastCache {
    cache: RwLock<FxHashMap<PlanKey, Arc<BroadcastPlan>>>,
    capacity: usize,
}

impl Default for BroadcastCache {
    fn default() -> Self {
        Self::new(256)
    }
}

impl BroadcastCache {
    /// 新しいキャッシュを作成
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(FxHashMap::default()),
            capacity,
        }
    }

    /// キャッシュから計画を取得
    pub fn get(&self, lhs: &Shape, rhs: &Shape) -> Option<Arc<BroadcastPlan>> {
        let key = (lhs.clone(), rhs.clone());
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// キャッシュに計画を挿入
    pub fn insert(&self, key: PlanKey, plan: BroadcastPlan) -> Arc<BroadcastPlan> {
        let plan = Arc::new(plan);
        if self.capacity == 0 {
            return plan;
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= self.capacity && !cache.contains_key(&key) {
            log::debug!("broadcast cache full ({} entries), clearing", cache.len());
            cache.clear();
        }
        cache.insert(key, plan.clone());
        plan
    }

    /// キャッシュから取得、なければ解決して挿入
    ///
    /// 解決に失敗した場合はキャッシュに何も残しません。
    pub fn get_or_resolve(&self, lhs: &Shape, rhs: &Shape) -> Result<Arc<BroadcastPlan>, ArrayError> {
        if let Some(plan) = self.get(lhs, rhs) {
            log::trace!("broadcast cache hit: {} x {}", lhs, rhs);
            return Ok(plan);
        }

        let plan = BroadcastPlan::new(lhs, rhs)?;
        log::debug!(
            "resolved broadcast {} x {} -> {}",
            lhs,
            rhs,
            plan.out_shape()
        );
        Ok(self.insert((lhs.clone(), rhs.clone()), plan))
    }

    /// キャッシュをクリア
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// キャッシュのエントリ数を取得
    pub fn len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// キャッシュが空かどうか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
