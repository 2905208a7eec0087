//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 校验失败单独携带结构化的字段错误列表。

use std::fmt;

use crate::models::common::validation::ValidationErrors;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义（`Validation` 变体固定携带 `ValidationErrors`）
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_records_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum RecordsError {
            Validation(ValidationErrors),
            $($variant(String),)*
        }

        impl RecordsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    RecordsError::Validation(_) => "E001",
                    $(RecordsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    RecordsError::Validation(_) => "Validation Error",
                    $(RecordsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> String {
                match self {
                    RecordsError::Validation(errors) => errors.to_string(),
                    $(RecordsError::$variant(msg) => msg.clone(),)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl RecordsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        RecordsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_records_errors! {
    DeleteRestricted("E002", "Delete Restricted"),
    NotFound("E003", "Resource Not Found"),
    DatabaseConfig("E004", "Database Configuration Error"),
    DatabaseConnection("E005", "Database Connection Error"),
    DatabaseOperation("E006", "Database Operation Error"),
}

impl RecordsError {
    /// 校验失败时返回字段错误
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            RecordsError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RecordsError::Validation(_))
    }

    pub fn is_delete_restricted(&self) -> bool {
        matches!(self, RecordsError::DeleteRestricted(_))
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RecordsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RecordsError {}

impl From<ValidationErrors> for RecordsError {
    fn from(errors: ValidationErrors) -> Self {
        RecordsError::Validation(errors)
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for RecordsError {
    fn from(err: sea_orm::DbErr) -> Self {
        RecordsError::DatabaseOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecordsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::validation::ValidationRule;

    #[test]
    fn test_error_codes() {
        assert_eq!(RecordsError::delete_restricted("test").code(), "E002");
        assert_eq!(RecordsError::not_found("test").code(), "E003");
        assert_eq!(RecordsError::database_config("test").code(), "E004");
        assert_eq!(
            RecordsError::Validation(ValidationErrors::new()).code(),
            "E001"
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            RecordsError::delete_restricted("test").error_type(),
            "Delete Restricted"
        );
        assert_eq!(
            RecordsError::database_operation("test").error_type(),
            "Database Operation Error"
        );
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("url", ValidationRule::Invalid);
        let err = RecordsError::from(errors);
        assert_eq!(err.message(), "url is invalid");
        assert!(err.validation_errors().is_some_and(|e| e.has("url", ValidationRule::Invalid)));
    }

    #[test]
    fn test_format_simple() {
        let err = RecordsError::delete_restricted("Term 1 still owns 2 course(s)");
        let formatted = err.format_simple();
        assert!(formatted.contains("Delete Restricted"));
        assert!(formatted.contains("Term 1"));
        assert!(err.is_delete_restricted());
    }
}
