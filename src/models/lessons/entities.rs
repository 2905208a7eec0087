use serde::{Deserialize, Serialize};

// 课时实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub course_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub outline: Option<String>,
    pub pre_class_assignment_id: Option<i64>,
    pub in_class_assignment_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
