use serde::Deserialize;

use super::entities::Lesson;
use crate::models::common::{nullable::nullable, validation::ValidationErrors};

// 课时创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLessonRequest {
    pub course_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub outline: Option<String>,
    pub pre_class_assignment_id: Option<i64>,
    pub in_class_assignment_id: Option<i64>,
}

impl CreateLessonRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", self.name.as_deref());
        errors
    }
}

impl From<Lesson> for CreateLessonRequest {
    fn from(lesson: Lesson) -> Self {
        Self {
            course_id: lesson.course_id,
            name: Some(lesson.name),
            description: lesson.description,
            outline: lesson.outline,
            pre_class_assignment_id: lesson.pre_class_assignment_id,
            in_class_assignment_id: lesson.in_class_assignment_id,
        }
    }
}

/// 课时更新请求
///
/// 可空字段为 `Some(None)` 时清空原值。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLessonRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub outline: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub pre_class_assignment_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub in_class_assignment_id: Option<Option<i64>>,
}

impl UpdateLessonRequest {
    pub fn merge_into(self, mut current: CreateLessonRequest) -> CreateLessonRequest {
        if let Some(name) = self.name {
            current.name = Some(name);
        }
        if let Some(description) = self.description {
            current.description = description;
        }
        if let Some(outline) = self.outline {
            current.outline = outline;
        }
        if let Some(id) = self.pre_class_assignment_id {
            current.pre_class_assignment_id = id;
        }
        if let Some(id) = self.in_class_assignment_id {
            current.in_class_assignment_id = id;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson() -> CreateLessonRequest {
        CreateLessonRequest {
            course_id: Some(1),
            name: Some("Intro".to_string()),
            description: Some("Setup".to_string()),
            outline: Some("1. Install Ruby".to_string()),
            pre_class_assignment_id: Some(4),
            in_class_assignment_id: Some(5),
        }
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let merged = UpdateLessonRequest::default().merge_into(lesson());
        assert_eq!(merged.description.as_deref(), Some("Setup"));
        assert_eq!(merged.pre_class_assignment_id, Some(4));
        assert_eq!(merged.in_class_assignment_id, Some(5));
    }

    #[test]
    fn test_update_clears_nullable_fields() {
        let merged = UpdateLessonRequest {
            outline: Some(None),
            pre_class_assignment_id: Some(None),
            in_class_assignment_id: Some(Some(9)),
            ..Default::default()
        }
        .merge_into(lesson());

        assert_eq!(merged.outline, None);
        assert_eq!(merged.pre_class_assignment_id, None);
        assert_eq!(merged.in_class_assignment_id, Some(9));
        assert_eq!(merged.description.as_deref(), Some("Setup"));
    }
}
