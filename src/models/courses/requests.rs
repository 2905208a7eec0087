use serde::Deserialize;

use super::entities::Course;
use crate::models::common::{
    nullable::nullable,
    validation::{ValidationErrors, ValidationRule},
};
use crate::utils::validate_course_code;

// 课程创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCourseRequest {
    pub term_id: Option<i64>,
    pub name: Option<String>,
    pub course_code: Option<String>,
    pub color: Option<String>,
}

impl CreateCourseRequest {
    /// 字段规则；学期内唯一性由存储层在事务中检查
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", self.name.as_deref());
        if errors.require_text("course_code", self.course_code.as_deref())
            && let Some(code) = self.course_code.as_deref()
            && validate_course_code(code).is_err()
        {
            errors.add("course_code", ValidationRule::Invalid);
        }
        errors
    }
}

impl From<Course> for CreateCourseRequest {
    fn from(course: Course) -> Self {
        Self {
            term_id: course.term_id,
            name: Some(course.name),
            course_code: Some(course.course_code),
            color: course.color,
        }
    }
}

// 课程更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub course_code: Option<String>,
    /// `Some(None)` 清空颜色
    #[serde(default, deserialize_with = "nullable")]
    pub color: Option<Option<String>>,
}

impl UpdateCourseRequest {
    pub fn merge_into(self, mut current: CreateCourseRequest) -> CreateCourseRequest {
        if let Some(name) = self.name {
            current.name = Some(name);
        }
        if let Some(course_code) = self.course_code {
            current.course_code = Some(course_code);
        }
        if let Some(color) = self.color {
            current.color = color;
        }
        current
    }
}
