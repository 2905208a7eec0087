use std::sync::Arc;

use crate::config::DatabaseConfig;
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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 存储边界
///
/// 每个写操作在单个事务中完成校验与写入；校验失败返回 `RecordsError::Validation`，
/// 被依赖项阻止的删除返回 `RecordsError::DeleteRestricted`，两者均不产生部分写入。
/// 所有集合查询都带显式排序。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学校管理方法
    // 创建学校
    async fn create_school(&self, school: CreateSchoolRequest) -> Result<School>;
    // 通过ID获取学校
    async fn get_school_by_id(&self, school_id: i64) -> Result<Option<School>>;
    // 列出学校，按名称排序
    async fn list_schools(&self) -> Result<Vec<School>>;
    // 更新学校
    async fn update_school(
        &self,
        school_id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>>;
    // 删除学校，仍有学期时拒绝
    async fn delete_school(&self, school_id: i64) -> Result<bool>;
    // 学校的学期
    async fn list_school_terms(&self, school_id: i64) -> Result<Vec<Term>>;
    // 经由学期的学校课程
    async fn list_school_courses(&self, school_id: i64) -> Result<Vec<Course>>;

    /// 学期管理方法
    async fn create_term(&self, term: CreateTermRequest) -> Result<Term>;
    async fn get_term_by_id(&self, term_id: i64) -> Result<Option<Term>>;
    async fn update_term(&self, term_id: i64, update: UpdateTermRequest) -> Result<Option<Term>>;
    // 将学期挂到学校下
    async fn assign_term_to_school(&self, term_id: i64, school_id: i64) -> Result<Term>;
    // 删除学期，仍有课程时拒绝
    async fn delete_term(&self, term_id: i64) -> Result<bool>;
    async fn list_term_courses(&self, term_id: i64) -> Result<Vec<Course>>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    // 将课程挂到学期下（重新检查学期内课程代码唯一）
    async fn assign_course_to_term(&self, course_id: i64, term_id: i64) -> Result<Course>;
    // 删除课程：有学生或教师时拒绝，否则级联删除课时、阅读材料、作业及成绩
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    async fn list_course_lessons(&self, course_id: i64) -> Result<Vec<Lesson>>;
    // 按 due_at、active_at 排序
    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>>;
    // 经由课时的课程阅读材料
    async fn list_course_readings(&self, course_id: i64) -> Result<Vec<Reading>>;
    // 按 last_name、first_name 排序
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<User>>;
    async fn list_course_instructors(&self, course_id: i64) -> Result<Vec<User>>;
    // 设置主讲教师，后写覆盖
    async fn set_primary_instructor(&self, course_id: i64, user_id: i64) -> Result<Course>;
    async fn clear_primary_instructor(&self, course_id: i64) -> Result<Course>;
    async fn get_primary_instructor(&self, course_id: i64) -> Result<Option<User>>;

    /// 课时管理方法
    async fn create_lesson(&self, lesson: CreateLessonRequest) -> Result<Lesson>;
    async fn get_lesson_by_id(&self, lesson_id: i64) -> Result<Option<Lesson>>;
    async fn update_lesson(
        &self,
        lesson_id: i64,
        update: UpdateLessonRequest,
    ) -> Result<Option<Lesson>>;
    async fn assign_lesson_to_course(&self, lesson_id: i64, course_id: i64) -> Result<Lesson>;
    // 删除课时并级联删除阅读材料
    async fn delete_lesson(&self, lesson_id: i64) -> Result<bool>;
    async fn list_lesson_readings(&self, lesson_id: i64, scope: ReadingScope)
    -> Result<Vec<Reading>>;

    /// 阅读材料管理方法
    async fn create_reading(&self, reading: CreateReadingRequest) -> Result<Reading>;
    async fn get_reading_by_id(&self, reading_id: i64) -> Result<Option<Reading>>;
    async fn update_reading(
        &self,
        reading_id: i64,
        update: UpdateReadingRequest,
    ) -> Result<Option<Reading>>;
    async fn assign_reading_to_lesson(&self, reading_id: i64, lesson_id: i64) -> Result<Reading>;
    async fn delete_reading(&self, reading_id: i64) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn assignment_exists(&self, assignment_id: i64) -> Result<bool>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 将作业挂到课程下（重新检查课程内名称唯一）
    async fn assign_assignment_to_course(
        &self,
        assignment_id: i64,
        course_id: i64,
    ) -> Result<Assignment>;
    // 删除作业并级联删除成绩，清空课时引用
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;
    async fn list_assignment_grades(&self, assignment_id: i64) -> Result<Vec<AssignmentGrade>>;
    // 以课前或课内作业引用它的课时
    async fn list_assignment_lessons(&self, assignment_id: i64) -> Result<Vec<Lesson>>;

    /// 用户管理方法
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_user(&self, user_id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn list_student_courses(&self, user_id: i64) -> Result<Vec<Course>>;
    async fn list_instructor_courses(&self, user_id: i64) -> Result<Vec<Course>>;

    /// 课程成员管理方法
    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<CourseStudent>;
    async fn withdraw_student(&self, course_id: i64, student_id: i64) -> Result<bool>;
    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<CourseStudent>>;
    async fn add_course_instructor(
        &self,
        course_id: i64,
        instructor_id: i64,
    ) -> Result<CourseInstructor>;
    async fn remove_course_instructor(&self, course_id: i64, instructor_id: i64) -> Result<bool>;
    async fn list_course_instructor_links(&self, course_id: i64) -> Result<Vec<CourseInstructor>>;

    /// 作业成绩管理方法
    async fn create_assignment_grade(
        &self,
        grade: CreateAssignmentGradeRequest,
    ) -> Result<AssignmentGrade>;
    async fn get_assignment_grade_by_id(&self, grade_id: i64) -> Result<Option<AssignmentGrade>>;
    async fn update_assignment_grade(
        &self,
        grade_id: i64,
        update: UpdateAssignmentGradeRequest,
    ) -> Result<Option<AssignmentGrade>>;
    async fn delete_assignment_grade(&self, grade_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let config = crate::config::AppConfig::get();
    create_storage_with(&config.database).await
}

pub async fn create_storage_with(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async(config).await?;
    Ok(Arc::new(storage))
}
