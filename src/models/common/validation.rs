//! 字段级校验结果
//!
//! 写入前收集所有失败的 `(字段, 规则)`，一次性返回给调用方。

use serde::Serialize;
use std::fmt;

use crate::errors::{RecordsError, Result};

/// 校验规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// 必填字段缺失或为空白
    Blank,
    /// 格式不符合要求
    Invalid,
    /// 作用域内已存在相同值
    Taken,
    /// 引用的记录不存在
    MissingTarget,
    /// 截止时间早于开放时间
    BeforeActiveAt,
}

impl ValidationRule {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationRule::Blank => "can't be blank",
            ValidationRule::Invalid => "is invalid",
            ValidationRule::Taken => "has already been taken",
            ValidationRule::MissingTarget => "must exist",
            ValidationRule::BeforeActiveAt => "must not precede active_at",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: ValidationRule,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.rule.message())
    }
}

/// 一次校验中收集到的全部错误
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, rule: ValidationRule) {
        let error = FieldError { field, rule };
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    /// 必填文本：`None` 或仅含空白均视为缺失
    pub fn require_text(&mut self, field: &'static str, value: Option<&str>) -> bool {
        match value {
            Some(v) if !v.trim().is_empty() => true,
            _ => {
                self.add(field, ValidationRule::Blank);
                false
            }
        }
    }

    pub fn require<T>(&mut self, field: &'static str, value: Option<&T>) -> bool {
        if value.is_none() {
            self.add(field, ValidationRule::Blank);
            return false;
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn has(&self, field: &str, rule: ValidationRule) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && e.rule == rule)
    }

    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for e in &self.errors {
            if !fields.contains(&e.field) {
                fields.push(e.field);
            }
        }
        fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// 没有错误时返回 `Ok(())`，否则转换为 `RecordsError::Validation`
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(RecordsError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}
