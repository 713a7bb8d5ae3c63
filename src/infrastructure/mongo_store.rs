//! MongoDB 题库 - 基础设施层
//!
//! 持有唯一的数据库连接，启动时建立一次，之后所有操作复用

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::StoreError;
use crate::infrastructure::question_store::{difficulty_prefix_pattern, QuestionStore};
use crate::models::QuestionRecord;

/// MongoDB 题库
///
/// 职责：
/// - 持有 Client / Collection
/// - 只暴露增查能力
/// - 不认识试卷和组卷策略
pub struct MongoStore {
    uri: String,
    database: Database,
    collection: Collection<QuestionRecord>,
}

impl MongoStore {
    /// 连接数据库并确认可达，失败直接返回错误
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let uri = config.mongodb_uri.clone();
        let timeout = Duration::from_secs(config.store_timeout_secs);

        let mut options = ClientOptions::parse(&uri)
            .await
            .map_err(|e| StoreError::connection_failed(&uri, e))?;
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);

        let client =
            Client::with_options(options).map_err(|e| StoreError::connection_failed(&uri, e))?;
        let database = client.database(&config.database_name);
        let collection = database.collection::<QuestionRecord>(&config.collection_name);

        let store = Self {
            uri,
            database,
            collection,
        };

        if let Err(e) = store.ping().await {
            error!("❌ MongoDB 连接失败: {}", e);
            return Err(e);
        }

        info!("✅ MongoDB 连接成功");
        info!("数据库: {}", config.database_name);
        info!("集合: {}", config.collection_name);

        Ok(store)
    }

    async fn try_query(&self, filter: Document, limit: i64) -> Result<Vec<QuestionRecord>, StoreError> {
        // 按原始文档读取，单条文档字段不全不影响整个查询
        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(filter)
            .limit(limit)
            .await
            .map_err(|e| StoreError::operation_failed("find", e))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::operation_failed("find", e))?;

        Ok(decode_records(documents))
    }

    async fn try_distinct(&self, topic: &str) -> Result<BTreeSet<String>, StoreError> {
        let values = self
            .collection
            .distinct("Difficulty", doc! { "Topic": topic })
            .await
            .map_err(|e| StoreError::operation_failed("distinct", e))?;

        Ok(values
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect())
    }
}

#[async_trait]
impl QuestionStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::connection_failed(&self.uri, e))
    }

    async fn insert(&self, records: &[QuestionRecord]) -> Option<usize> {
        if records.is_empty() {
            warn!("⚠️ 没有需要写入的题目");
            return Some(0);
        }

        match self.collection.insert_many(records).await {
            Ok(result) => {
                info!("✅ 成功写入 {} 道题目", result.inserted_ids.len());
                debug!("写入的 ID: {:?}", result.inserted_ids.values().collect::<Vec<_>>());
                Some(result.inserted_ids.len())
            }
            Err(e) => {
                error!("❌ 写入题目失败: {}", e);
                None
            }
        }
    }

    async fn query(
        &self,
        topic: &str,
        difficulty_prefix: &str,
        limit: usize,
    ) -> Vec<QuestionRecord> {
        // MongoDB 中 limit(0) 表示不限制
        if limit == 0 {
            return Vec::new();
        }

        let filter = doc! {
            "Topic": topic,
            "Difficulty": {
                "$regex": difficulty_prefix_pattern(difficulty_prefix),
                "$options": "i",
            },
        };
        debug!("查询条件: {}", filter);

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        match self.try_query(filter, limit).await {
            Ok(questions) => {
                info!(
                    "✅ 查询到 {} 道题目 (主题: {}, 难度: {})",
                    questions.len(),
                    topic,
                    difficulty_prefix
                );
                questions
            }
            Err(e) => {
                error!("❌ 查询题目失败: {}", e);
                Vec::new()
            }
        }
    }

    async fn distinct_difficulties(&self, topic: &str) -> BTreeSet<String> {
        match self.try_distinct(topic).await {
            Ok(labels) => labels,
            Err(e) => {
                error!("❌ 查询难度列表失败: {}", e);
                BTreeSet::new()
            }
        }
    }
}

/// 逐条反序列化，格式不符的文档记录警告后跳过
fn decode_records(documents: Vec<Document>) -> Vec<QuestionRecord> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get("_id").cloned();
            match bson::from_document::<QuestionRecord>(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("⚠️ 跳过格式不符的题目 (_id: {:?}): {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::sample_record;

    #[test]
    fn test_decode_skips_documents_missing_fields() {
        let good = bson::to_document(&sample_record(1, "Algebra", "Easy")).unwrap();
        let missing_explanation = doc! {
            "Question Number": 2,
            "Topic": "Algebra",
            "Question Text": "2 + 2 = ?",
            "Option A": "3",
            "Option B": "4",
            "Option C": "5",
            "Option D": "6",
            "Correct Answer": "B",
            "Difficulty": "Easy",
        };
        let free_form = doc! { "Topic": "Algebra", "Difficulty": "Easy", "text": "raw output" };
        let also_good = bson::to_document(&sample_record(3, "Algebra", "Easy")).unwrap();

        let records = decode_records(vec![good, missing_explanation, free_form, also_good]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question_number, "1");
        assert_eq!(records[1].question_number, "3");
    }

    #[test]
    fn test_decode_keeps_stored_id_and_integer_number() {
        let id = bson::oid::ObjectId::new();
        let mut document = bson::to_document(&sample_record(7, "Algebra", "Hard")).unwrap();
        document.insert("_id", id);
        document.insert("Question Number", 7_i32);

        let records = decode_records(vec![document]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(id));
        assert_eq!(records[0].question_number, "7");
    }
}
