use serde::{Deserialize, Serialize};

// 作业实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub course_id: Option<i64>,
    pub name: String,
    pub percent_of_grade: f64,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub active_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 作业成绩实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentGrade {
    pub id: i64,
    pub assignment_id: i64,
    // 学生退课后置空
    pub course_student_id: Option<i64>,
    pub final_grade: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
