//! 内存题库 - 基础设施层
//!
//! 与 MongoDB 题库使用相同的匹配规则，用于离线运行和测试

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use regex::RegexBuilder;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::infrastructure::question_store::{difficulty_prefix_pattern, QuestionStore};
use crate::models::QuestionRecord;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<QuestionRecord>>,
    queries: AtomicUsize,
    reject_inserts: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置题目，没有 ID 的记录会分配新的 ObjectId
    pub fn with_records(records: impl IntoIterator<Item = QuestionRecord>) -> Self {
        let store = Self::new();
        store.lock().extend(records.into_iter().map(with_id));
        store
    }

    /// 所有写入都失败，用于模拟存储不可用
    pub fn rejecting_inserts() -> Self {
        Self {
            reject_inserts: true,
            ..Self::default()
        }
    }

    /// 当前全部题目的快照
    pub fn records(&self) -> Vec<QuestionRecord> {
        self.lock().clone()
    }

    /// 已执行的 query 次数
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<QuestionRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn with_id(mut record: QuestionRecord) -> QuestionRecord {
    if record.id.is_none() {
        record.id = Some(ObjectId::new());
    }
    record
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, records: &[QuestionRecord]) -> Option<usize> {
        if records.is_empty() {
            warn!("⚠️ 没有需要写入的题目");
            return Some(0);
        }
        if self.reject_inserts {
            warn!("❌ 写入题目失败: 内存题库拒绝写入");
            return None;
        }

        self.lock().extend(records.iter().cloned().map(with_id));
        info!("✅ 成功写入 {} 道题目", records.len());
        Some(records.len())
    }

    async fn query(
        &self,
        topic: &str,
        difficulty_prefix: &str,
        limit: usize,
    ) -> Vec<QuestionRecord> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let matcher = match RegexBuilder::new(&difficulty_prefix_pattern(difficulty_prefix))
            .case_insensitive(true)
            .build()
        {
            Ok(matcher) => matcher,
            Err(e) => {
                warn!("❌ 难度前缀无法构造正则: {}", e);
                return Vec::new();
            }
        };

        self.lock()
            .iter()
            .filter(|record| record.topic == topic && matcher.is_match(&record.difficulty))
            .take(limit)
            .cloned()
            .collect()
    }

    async fn distinct_difficulties(&self, topic: &str) -> BTreeSet<String> {
        self.lock()
            .iter()
            .filter(|record| record.topic == topic)
            .map(|record| record.difficulty.clone())
            .collect()
    }
}
