use serde::{Deserialize, Serialize};

// 课程实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub term_id: Option<i64>,
    pub name: String,
    pub course_code: String,
    pub color: Option<String>,
    // 主讲教师，与教师列表相互独立
    pub primary_instructor_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
