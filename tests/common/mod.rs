#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_school_records::config::DatabaseConfig;
use rust_school_records::models::{
    courses::{entities::Course, requests::CreateCourseRequest},
    lessons::{entities::Lesson, requests::CreateLessonRequest},
    schools::{entities::School, requests::CreateSchoolRequest},
    terms::{entities::Term, requests::CreateTermRequest},
    users::{entities::User, requests::CreateUserRequest},
};
use rust_school_records::storage::{Storage, create_storage_with};

/// 每个测试独立的内存数据库，已完成迁移
pub async fn setup_storage() -> Arc<dyn Storage> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    create_storage_with(&config)
        .await
        .expect("Failed to create in-memory storage")
}

pub async fn seed_school(storage: &Arc<dyn Storage>, name: &str) -> School {
    storage
        .create_school(CreateSchoolRequest {
            name: Some(name.to_string()),
        })
        .await
        .expect("Failed to create school")
}

pub async fn seed_term(storage: &Arc<dyn Storage>, school_id: i64, name: &str) -> Term {
    storage
        .create_term(CreateTermRequest {
            school_id: Some(school_id),
            name: Some(name.to_string()),
            starts_on: NaiveDate::from_ymd_opt(2016, 2, 1),
            ends_on: NaiveDate::from_ymd_opt(2016, 5, 22),
        })
        .await
        .expect("Failed to create term")
}

pub async fn seed_course(storage: &Arc<dyn Storage>, term_id: Option<i64>, code: &str) -> Course {
    storage
        .create_course(CreateCourseRequest {
            term_id,
            name: Some(format!("Course {code}")),
            course_code: Some(code.to_string()),
            color: Some("Violet".to_string()),
        })
        .await
        .expect("Failed to create course")
}

pub async fn seed_lesson(storage: &Arc<dyn Storage>, course_id: i64, name: &str) -> Lesson {
    storage
        .create_lesson(CreateLessonRequest {
            course_id: Some(course_id),
            name: Some(name.to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create lesson")
}

pub async fn seed_user(storage: &Arc<dyn Storage>, first: &str, last: &str) -> User {
    storage
        .create_user(CreateUserRequest {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: Some(format!(
                "{}.{}@example.com",
                first.to_lowercase(),
                last.to_lowercase()
            )),
            ..Default::default()
        })
        .await
        .expect("Failed to create user")
}
