use chrono::NaiveDate;
use serde::Deserialize;

use super::entities::Term;
use crate::models::common::validation::ValidationErrors;

// 学期创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTermRequest {
    pub school_id: Option<i64>,
    pub name: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

impl CreateTermRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", self.name.as_deref());
        errors.require("starts_on", self.starts_on.as_ref());
        errors.require("ends_on", self.ends_on.as_ref());
        errors.require("school_id", self.school_id.as_ref());
        errors
    }
}

impl From<Term> for CreateTermRequest {
    fn from(term: Term) -> Self {
        Self {
            school_id: Some(term.school_id),
            name: Some(term.name),
            starts_on: Some(term.starts_on),
            ends_on: Some(term.ends_on),
        }
    }
}

// 学期更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTermRequest {
    pub name: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

impl UpdateTermRequest {
    pub fn merge_into(self, mut current: CreateTermRequest) -> CreateTermRequest {
        if let Some(name) = self.name {
            current.name = Some(name);
        }
        if let Some(starts_on) = self.starts_on {
            current.starts_on = Some(starts_on);
        }
        if let Some(ends_on) = self.ends_on {
            current.ends_on = Some(ends_on);
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::validation::ValidationRule;

    #[test]
    fn test_term_requires_dates_and_school() {
        let errors = CreateTermRequest {
            name: Some("Fall 2016 Cohort".to_string()),
            ..Default::default()
        }
        .validate();

        assert_eq!(errors.fields(), vec!["starts_on", "ends_on", "school_id"]);
        assert!(errors.has("school_id", ValidationRule::Blank));
    }

    #[test]
    fn test_complete_term_is_valid() {
        let request = CreateTermRequest {
            school_id: Some(1),
            name: Some("Spring 2016 Cohort".to_string()),
            starts_on: NaiveDate::from_ymd_opt(2016, 2, 1),
            ends_on: NaiveDate::from_ymd_opt(2016, 5, 22),
        };
        assert!(request.validate().is_empty());
    }
}
