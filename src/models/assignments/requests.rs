use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::entities::Assignment;
use crate::models::common::validation::{ValidationErrors, ValidationRule};

// 作业创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAssignmentRequest {
    pub course_id: Option<i64>,
    pub name: Option<String>,
    pub percent_of_grade: Option<f64>,
    pub due_at: Option<DateTime<Utc>>,
    pub active_at: Option<DateTime<Utc>>,
}

impl CreateAssignmentRequest {
    /// 字段规则；课程内名称唯一性由存储层在事务中检查
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", self.name.as_deref());
        if errors.require("percent_of_grade", self.percent_of_grade.as_ref())
            && self.percent_of_grade.is_some_and(|p| !p.is_finite())
        {
            errors.add("percent_of_grade", ValidationRule::Invalid);
        }
        if let (Some(due_at), Some(active_at)) = (self.due_at, self.active_at)
            && due_at < active_at
        {
            errors.add("due_at", ValidationRule::BeforeActiveAt);
        }
        errors
    }
}

impl From<Assignment> for CreateAssignmentRequest {
    fn from(assignment: Assignment) -> Self {
        Self {
            course_id: assignment.course_id,
            name: Some(assignment.name),
            percent_of_grade: Some(assignment.percent_of_grade),
            due_at: assignment.due_at,
            active_at: assignment.active_at,
        }
    }
}

// 作业更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub name: Option<String>,
    pub percent_of_grade: Option<f64>,
    pub due_at: Option<DateTime<Utc>>,
    pub active_at: Option<DateTime<Utc>>,
}

impl UpdateAssignmentRequest {
    pub fn merge_into(self, mut current: CreateAssignmentRequest) -> CreateAssignmentRequest {
        if let Some(name) = self.name {
            current.name = Some(name);
        }
        if let Some(percent) = self.percent_of_grade {
            current.percent_of_grade = Some(percent);
        }
        if let Some(due_at) = self.due_at {
            current.due_at = Some(due_at);
        }
        if let Some(active_at) = self.active_at {
            current.active_at = Some(active_at);
        }
        current
    }
}

// 作业成绩创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAssignmentGradeRequest {
    pub assignment_id: Option<i64>,
    pub course_student_id: Option<i64>,
    pub final_grade: Option<f64>,
}

impl CreateAssignmentGradeRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("assignment_id", self.assignment_id.as_ref());
        if self.final_grade.is_some_and(|g| !g.is_finite()) {
            errors.add("final_grade", ValidationRule::Invalid);
        }
        errors
    }
}

// 作业成绩更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentGradeRequest {
    pub final_grade: Option<f64>,
}
