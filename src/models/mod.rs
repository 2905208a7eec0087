//! 业务数据模型
//!
//! 每个领域对象拆分为 `entities`（读取结果）与 `requests`（写入请求及字段规则）。

pub mod assignments;
pub mod common;
pub mod course_members;
pub mod courses;
pub mod lessons;
pub mod readings;
pub mod schools;
pub mod terms;
pub mod users;

pub use common::validation::{FieldError, ValidationErrors, ValidationRule};
