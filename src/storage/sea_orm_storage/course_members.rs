//! 课程成员存储操作（学生选课与教师任教）

use super::{SeaOrmStorage, check_reference, commit, now};
use crate::entity::assignment_grades::{self, Entity as AssignmentGrades};
use crate::entity::course_instructors::{self, Entity as CourseInstructors};
use crate::entity::course_students::{self, Entity as CourseStudents};
use crate::entity::courses::Entity as Courses;
use crate::entity::users::Entity as Users;
use crate::errors::{RecordsError, Result};
use crate::models::{
    common::validation::{ValidationErrors, ValidationRule},
    course_members::entities::{CourseInstructor, CourseStudent},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;

impl SeaOrmStorage {
    /// 学生选课
    pub async fn enroll_student_impl(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<CourseStudent> {
        let txn = self.begin().await?;

        let mut errors = ValidationErrors::new();
        check_reference::<Courses, _>(&txn, Some(course_id), "course_id", &mut errors).await?;
        check_reference::<Users, _>(&txn, Some(student_id), "student_id", &mut errors).await?;

        let existing = CourseStudents::find()
            .filter(course_students::Column::CourseId.eq(course_id))
            .filter(course_students::Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询选课记录失败: {e}")))?;
        if existing.is_some() {
            errors.add("student_id", ValidationRule::Taken);
        }
        errors.into_result()?;

        let model = course_students::ActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            enrolled_at: Set(now()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("学生选课失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_course_student())
    }

    /// 学生退课，保留成绩但清空其选课引用
    pub async fn withdraw_student_impl(&self, course_id: i64, student_id: i64) -> Result<bool> {
        let txn = self.begin().await?;

        let Some(link) = CourseStudents::find()
            .filter(course_students::Column::CourseId.eq(course_id))
            .filter(course_students::Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询选课记录失败: {e}")))?
        else {
            return Ok(false);
        };

        let cleared = AssignmentGrades::update_many()
            .col_expr(
                assignment_grades::Column::CourseStudentId,
                Expr::value(Option::<i64>::None),
            )
            .col_expr(assignment_grades::Column::UpdatedAt, Expr::value(now()))
            .filter(assignment_grades::Column::CourseStudentId.eq(link.id))
            .exec(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("清空成绩引用失败: {e}")))?;

        let result = CourseStudents::delete_by_id(link.id)
            .exec(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("学生退课失败: {e}")))?;

        commit(txn).await?;
        debug!(
            "学生 {} 退出课程 {}，{} 条成绩已解除关联",
            student_id, course_id, cleared.rows_affected
        );
        Ok(result.rows_affected > 0)
    }

    /// 课程的选课记录
    pub async fn list_course_enrollments_impl(&self, course_id: i64) -> Result<Vec<CourseStudent>> {
        let links = CourseStudents::find()
            .filter(course_students::Column::CourseId.eq(course_id))
            .order_by_asc(course_students::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(links.into_iter().map(|m| m.into_course_student()).collect())
    }

    /// 添加课程教师
    pub async fn add_course_instructor_impl(
        &self,
        course_id: i64,
        instructor_id: i64,
    ) -> Result<CourseInstructor> {
        let txn = self.begin().await?;

        let mut errors = ValidationErrors::new();
        check_reference::<Courses, _>(&txn, Some(course_id), "course_id", &mut errors).await?;
        check_reference::<Users, _>(&txn, Some(instructor_id), "instructor_id", &mut errors)
            .await?;

        let existing = CourseInstructors::find()
            .filter(course_instructors::Column::CourseId.eq(course_id))
            .filter(course_instructors::Column::InstructorId.eq(instructor_id))
            .one(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询任教记录失败: {e}")))?;
        if existing.is_some() {
            errors.add("instructor_id", ValidationRule::Taken);
        }
        errors.into_result()?;

        let model = course_instructors::ActiveModel {
            course_id: Set(course_id),
            instructor_id: Set(instructor_id),
            assigned_at: Set(now()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("添加课程教师失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_course_instructor())
    }

    /// 移除课程教师，不影响主讲教师
    pub async fn remove_course_instructor_impl(
        &self,
        course_id: i64,
        instructor_id: i64,
    ) -> Result<bool> {
        let result = CourseInstructors::delete_many()
            .filter(course_instructors::Column::CourseId.eq(course_id))
            .filter(course_instructors::Column::InstructorId.eq(instructor_id))
            .exec(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("移除课程教师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 课程的任教记录
    pub async fn list_course_instructor_links_impl(
        &self,
        course_id: i64,
    ) -> Result<Vec<CourseInstructor>> {
        let links = CourseInstructors::find()
            .filter(course_instructors::Column::CourseId.eq(course_id))
            .order_by_asc(course_instructors::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询任教记录失败: {e}")))?;

        Ok(links.into_iter().map(|m| m.into_course_instructor()).collect())
    }
}
