//! School Records - 学校教务记录存储库
//!
//! 管理学校、学期、课程、课时、阅读材料、作业、用户及选课关系，
//! 在写入前完成字段校验，并维护关联的级联与限制删除规则。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型与请求校验
//! - `runtime`: 运行时生命周期管理
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod runtime;
pub mod storage;
pub mod utils;
