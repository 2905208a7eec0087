use serde::{Deserialize, Serialize};

use super::requests::CreateReadingRequest;

// 阅读材料实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub lesson_id: i64,
    pub order_number: i32,
    pub url: String,
    pub caption: Option<String>,
    pub before_lesson: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Reading {
    /// 复制为未保存的创建请求，不带 id
    pub fn duplicate(&self) -> CreateReadingRequest {
        CreateReadingRequest::from(self.clone())
    }
}

/// 课时阅读材料的筛选范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingScope {
    #[default]
    All,
    /// 课前阅读
    Pre,
    /// 课后阅读
    Post,
}
