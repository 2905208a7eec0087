use serde::Deserialize;

use super::entities::Reading;
use crate::models::common::{
    nullable::nullable,
    validation::{ValidationErrors, ValidationRule},
};
use crate::utils::validate_reading_url;

// 阅读材料创建请求
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateReadingRequest {
    pub lesson_id: Option<i64>,
    pub order_number: Option<i32>,
    pub url: Option<String>,
    pub caption: Option<String>,
    #[serde(default)]
    pub before_lesson: bool,
}

impl CreateReadingRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("order_number", self.order_number.as_ref());
        errors.require("lesson_id", self.lesson_id.as_ref());
        if errors.require_text("url", self.url.as_deref())
            && let Some(url) = self.url.as_deref()
            && validate_reading_url(url).is_err()
        {
            errors.add("url", ValidationRule::Invalid);
        }
        errors
    }
}

impl From<Reading> for CreateReadingRequest {
    fn from(reading: Reading) -> Self {
        Self {
            lesson_id: Some(reading.lesson_id),
            order_number: Some(reading.order_number),
            url: Some(reading.url),
            caption: reading.caption,
            before_lesson: reading.before_lesson,
        }
    }
}

// 阅读材料更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReadingRequest {
    pub order_number: Option<i32>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub caption: Option<Option<String>>,
    pub before_lesson: Option<bool>,
}

impl UpdateReadingRequest {
    pub fn merge_into(self, mut current: CreateReadingRequest) -> CreateReadingRequest {
        if let Some(order_number) = self.order_number {
            current.order_number = Some(order_number);
        }
        if let Some(url) = self.url {
            current.url = Some(url);
        }
        if let Some(caption) = self.caption {
            current.caption = caption;
        }
        if let Some(before_lesson) = self.before_lesson {
            current.before_lesson = before_lesson;
        }
        current
    }
}
