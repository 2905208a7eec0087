use serde::{Deserialize, Serialize};

// 课程学生关联
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStudent {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

// 课程教师关联
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInstructor {
    pub id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}
