use serde::Deserialize;

use super::entities::User;
use crate::models::common::validation::{ValidationErrors, ValidationRule};
use crate::utils::{validate_email, validate_photo_url};

// 用户创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub instructor: bool,
}

impl CreateUserRequest {
    /// 字段规则；邮箱全局唯一性由存储层在事务中检查
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("first_name", self.first_name.as_deref());
        errors.require_text("last_name", self.last_name.as_deref());
        if errors.require_text("email", self.email.as_deref())
            && let Some(email) = self.email.as_deref()
            && validate_email(email).is_err()
        {
            errors.add("email", ValidationRule::Invalid);
        }
        // photo_url 可以为空，填写时必须是合法 URL
        if let Some(url) = self.photo_url.as_deref()
            && !url.trim().is_empty()
            && validate_photo_url(url).is_err()
        {
            errors.add("photo_url", ValidationRule::Invalid);
        }
        errors
    }
}

impl From<User> for CreateUserRequest {
    fn from(user: User) -> Self {
        Self {
            first_name: Some(user.first_name),
            last_name: Some(user.last_name),
            email: Some(user.email),
            photo_url: user.photo_url,
            instructor: user.instructor,
        }
    }
}

// 用户更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub instructor: Option<bool>,
}

impl UpdateUserRequest {
    pub fn merge_into(self, mut current: CreateUserRequest) -> CreateUserRequest {
        if let Some(first_name) = self.first_name {
            current.first_name = Some(first_name);
        }
        if let Some(last_name) = self.last_name {
            current.last_name = Some(last_name);
        }
        if let Some(email) = self.email {
            current.email = Some(email);
        }
        if let Some(photo_url) = self.photo_url {
            current.photo_url = Some(photo_url);
        }
        if let Some(instructor) = self.instructor {
            current.instructor = instructor;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_alone_is_not_enough() {
        let request = CreateUserRequest {
            first_name: Some("Brian".to_string()),
            ..Default::default()
        };
        let errors = request.validate();
        assert_eq!(errors.fields(), vec!["last_name", "email"]);

        let request = CreateUserRequest {
            last_name: Some("Yarsawich".to_string()),
            email: Some("testing@test.com".to_string()),
            ..request
        };
        assert!(request.validate().is_empty());
    }

    #[test]
    fn test_email_and_photo_format() {
        let request = CreateUserRequest {
            first_name: Some("Da-Me".to_string()),
            last_name: Some("Kim".to_string()),
            email: Some("dame.kim".to_string()),
            photo_url: Some("not a url".to_string()),
            instructor: false,
        };
        let errors = request.validate();
        assert!(errors.has("email", ValidationRule::Invalid));
        assert!(errors.has("photo_url", ValidationRule::Invalid));
    }

    #[test]
    fn test_blank_photo_url_is_allowed() {
        let request = CreateUserRequest {
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("john@doe.com".to_string()),
            photo_url: Some(String::new()),
            instructor: true,
        };
        assert!(request.validate().is_empty());
    }
}
