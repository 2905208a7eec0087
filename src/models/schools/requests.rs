use serde::Deserialize;

use super::entities::School;
use crate::models::common::validation::ValidationErrors;

// 学校创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSchoolRequest {
    pub name: Option<String>,
}

impl CreateSchoolRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", self.name.as_deref());
        errors
    }
}

impl From<School> for CreateSchoolRequest {
    fn from(school: School) -> Self {
        Self {
            name: Some(school.name),
        }
    }
}

// 学校更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
}

impl UpdateSchoolRequest {
    pub fn merge_into(self, mut current: CreateSchoolRequest) -> CreateSchoolRequest {
        if let Some(name) = self.name {
            current.name = Some(name);
        }
        current
    }
}
