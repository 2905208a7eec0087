//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 关联、级联与默认排序都在这里以显式查询实现，写操作包在事务中。

mod assignment_grades;
mod assignments;
mod course_members;
mod courses;
mod lessons;
mod readings;
mod schools;
mod terms;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{RecordsError, Result};
use crate::models::common::validation::{ValidationErrors, ValidationRule};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PrimaryKeyTrait, TransactionTrait,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| RecordsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    ///
    /// 内存数据库只保留一个常驻连接，否则每个连接都会看到各自独立的空库。
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| RecordsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        if !in_memory {
            opt = opt
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory");
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size)
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| RecordsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| RecordsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(RecordsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 开启事务
    pub(crate) async fn begin(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| RecordsError::database_operation(format!("开启事务失败: {e}")))
    }
}

/// 提交事务
pub(crate) async fn commit(txn: DatabaseTransaction) -> Result<()> {
    txn.commit()
        .await
        .map_err(|e| RecordsError::database_operation(format!("提交事务失败: {e}")))
}

/// 当前时间戳（秒）
pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 按主键判断记录是否存在
pub(crate) async fn record_exists<E, C>(db: &C, id: i64) -> Result<bool>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
    C: ConnectionTrait,
{
    let found = E::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("查询关联记录失败: {e}")))?;

    Ok(found.is_some())
}

/// 外键目标校验：给出了 id 但记录不存在时记为 `MissingTarget`
pub(crate) async fn check_reference<E, C>(
    db: &C,
    id: Option<i64>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Result<()>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
    C: ConnectionTrait,
{
    if let Some(id) = id
        && !record_exists::<E, C>(db, id).await?
    {
        errors.add(field, ValidationRule::MissingTarget);
    }
    Ok(())
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentGrade},
        requests::{
            CreateAssignmentGradeRequest, CreateAssignmentRequest, UpdateAssignmentGradeRequest,
            UpdateAssignmentRequest,
        },
    },
    course_members::entities::{CourseInstructor, CourseStudent},
    courses::{
        entities::Course,
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    lessons::{
        entities::Lesson,
        requests::{CreateLessonRequest, UpdateLessonRequest},
    },
    readings::{
        entities::{Reading, ReadingScope},
        requests::{CreateReadingRequest, UpdateReadingRequest},
    },
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, UpdateSchoolRequest},
    },
    terms::{
        entities::Term,
        requests::{CreateTermRequest, UpdateTermRequest},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学校模块
    async fn create_school(&self, school: CreateSchoolRequest) -> Result<School> {
        self.create_school_impl(school).await
    }

    async fn get_school_by_id(&self, school_id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(school_id).await
    }

    async fn list_schools(&self) -> Result<Vec<School>> {
        self.list_schools_impl().await
    }

    async fn update_school(
        &self,
        school_id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        self.update_school_impl(school_id, update).await
    }

    async fn delete_school(&self, school_id: i64) -> Result<bool> {
        self.delete_school_impl(school_id).await
    }

    async fn list_school_terms(&self, school_id: i64) -> Result<Vec<Term>> {
        self.list_school_terms_impl(school_id).await
    }

    async fn list_school_courses(&self, school_id: i64) -> Result<Vec<Course>> {
        self.list_school_courses_impl(school_id).await
    }

    // 学期模块
    async fn create_term(&self, term: CreateTermRequest) -> Result<Term> {
        self.create_term_impl(term).await
    }

    async fn get_term_by_id(&self, term_id: i64) -> Result<Option<Term>> {
        self.get_term_by_id_impl(term_id).await
    }

    async fn update_term(&self, term_id: i64, update: UpdateTermRequest) -> Result<Option<Term>> {
        self.update_term_impl(term_id, update).await
    }

    async fn assign_term_to_school(&self, term_id: i64, school_id: i64) -> Result<Term> {
        self.assign_term_to_school_impl(term_id, school_id).await
    }

    async fn delete_term(&self, term_id: i64) -> Result<bool> {
        self.delete_term_impl(term_id).await
    }

    async fn list_term_courses(&self, term_id: i64) -> Result<Vec<Course>> {
        self.list_term_courses_impl(term_id).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn assign_course_to_term(&self, course_id: i64, term_id: i64) -> Result<Course> {
        self.assign_course_to_term_impl(course_id, term_id).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn list_course_lessons(&self, course_id: i64) -> Result<Vec<Lesson>> {
        self.list_course_lessons_impl(course_id).await
    }

    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>> {
        self.list_course_assignments_impl(course_id).await
    }

    async fn list_course_readings(&self, course_id: i64) -> Result<Vec<Reading>> {
        self.list_course_readings_impl(course_id).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<User>> {
        self.list_course_students_impl(course_id).await
    }

    async fn list_course_instructors(&self, course_id: i64) -> Result<Vec<User>> {
        self.list_course_instructors_impl(course_id).await
    }

    async fn set_primary_instructor(&self, course_id: i64, user_id: i64) -> Result<Course> {
        self.set_primary_instructor_impl(course_id, Some(user_id))
            .await
    }

    async fn clear_primary_instructor(&self, course_id: i64) -> Result<Course> {
        self.set_primary_instructor_impl(course_id, None).await
    }

    async fn get_primary_instructor(&self, course_id: i64) -> Result<Option<User>> {
        self.get_primary_instructor_impl(course_id).await
    }

    // 课时模块
    async fn create_lesson(&self, lesson: CreateLessonRequest) -> Result<Lesson> {
        self.create_lesson_impl(lesson).await
    }

    async fn get_lesson_by_id(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        self.get_lesson_by_id_impl(lesson_id).await
    }

    async fn update_lesson(
        &self,
        lesson_id: i64,
        update: UpdateLessonRequest,
    ) -> Result<Option<Lesson>> {
        self.update_lesson_impl(lesson_id, update).await
    }

    async fn assign_lesson_to_course(&self, lesson_id: i64, course_id: i64) -> Result<Lesson> {
        self.assign_lesson_to_course_impl(lesson_id, course_id)
            .await
    }

    async fn delete_lesson(&self, lesson_id: i64) -> Result<bool> {
        self.delete_lesson_impl(lesson_id).await
    }

    async fn list_lesson_readings(
        &self,
        lesson_id: i64,
        scope: ReadingScope,
    ) -> Result<Vec<Reading>> {
        self.list_lesson_readings_impl(lesson_id, scope).await
    }

    // 阅读材料模块
    async fn create_reading(&self, reading: CreateReadingRequest) -> Result<Reading> {
        self.create_reading_impl(reading).await
    }

    async fn get_reading_by_id(&self, reading_id: i64) -> Result<Option<Reading>> {
        self.get_reading_by_id_impl(reading_id).await
    }

    async fn update_reading(
        &self,
        reading_id: i64,
        update: UpdateReadingRequest,
    ) -> Result<Option<Reading>> {
        self.update_reading_impl(reading_id, update).await
    }

    async fn assign_reading_to_lesson(&self, reading_id: i64, lesson_id: i64) -> Result<Reading> {
        self.assign_reading_to_lesson_impl(reading_id, lesson_id)
            .await
    }

    async fn delete_reading(&self, reading_id: i64) -> Result<bool> {
        self.delete_reading_impl(reading_id).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn assignment_exists(&self, assignment_id: i64) -> Result<bool> {
        record_exists::<crate::entity::prelude::Assignments, _>(&self.db, assignment_id).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn assign_assignment_to_course(
        &self,
        assignment_id: i64,
        course_id: i64,
    ) -> Result<Assignment> {
        self.assign_assignment_to_course_impl(assignment_id, course_id)
            .await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    async fn list_assignment_grades(&self, assignment_id: i64) -> Result<Vec<AssignmentGrade>> {
        self.list_assignment_grades_impl(assignment_id).await
    }

    async fn list_assignment_lessons(&self, assignment_id: i64) -> Result<Vec<Lesson>> {
        self.list_assignment_lessons_impl(assignment_id).await
    }

    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn update_user(&self, user_id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(user_id, update).await
    }

    async fn list_student_courses(&self, user_id: i64) -> Result<Vec<Course>> {
        self.list_student_courses_impl(user_id).await
    }

    async fn list_instructor_courses(&self, user_id: i64) -> Result<Vec<Course>> {
        self.list_instructor_courses_impl(user_id).await
    }

    // 课程成员模块
    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<CourseStudent> {
        self.enroll_student_impl(course_id, student_id).await
    }

    async fn withdraw_student(&self, course_id: i64, student_id: i64) -> Result<bool> {
        self.withdraw_student_impl(course_id, student_id).await
    }

    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<CourseStudent>> {
        self.list_course_enrollments_impl(course_id).await
    }

    async fn add_course_instructor(
        &self,
        course_id: i64,
        instructor_id: i64,
    ) -> Result<CourseInstructor> {
        self.add_course_instructor_impl(course_id, instructor_id)
            .await
    }

    async fn remove_course_instructor(&self, course_id: i64, instructor_id: i64) -> Result<bool> {
        self.remove_course_instructor_impl(course_id, instructor_id)
            .await
    }

    async fn list_course_instructor_links(&self, course_id: i64) -> Result<Vec<CourseInstructor>> {
        self.list_course_instructor_links_impl(course_id).await
    }

    // 作业成绩模块
    async fn create_assignment_grade(
        &self,
        grade: CreateAssignmentGradeRequest,
    ) -> Result<AssignmentGrade> {
        self.create_assignment_grade_impl(grade).await
    }

    async fn get_assignment_grade_by_id(&self, grade_id: i64) -> Result<Option<AssignmentGrade>> {
        self.get_assignment_grade_by_id_impl(grade_id).await
    }

    async fn update_assignment_grade(
        &self,
        grade_id: i64,
        update: UpdateAssignmentGradeRequest,
    ) -> Result<Option<AssignmentGrade>> {
        self.update_assignment_grade_impl(grade_id, update).await
    }

    async fn delete_assignment_grade(&self, grade_id: i64) -> Result<bool> {
        self.delete_assignment_grade_impl(grade_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("records.db").unwrap(),
            "sqlite://records.db?mode=rwc"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://localhost/records").is_ok());
        assert_eq!(
            SeaOrmStorage::build_database_url("redis://localhost")
                .unwrap_err()
                .code(),
            "E004"
        );
    }
}
