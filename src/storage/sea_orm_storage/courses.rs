//! 课程存储操作

use super::{SeaOrmStorage, assignments::purge_assignment_dependents, check_reference, commit, now};
use crate::entity::assignments::{self, Entity as Assignments};
use crate::entity::course_instructors::{self, Entity as CourseInstructors};
use crate::entity::course_students::{self, Entity as CourseStudents};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses, Model};
use crate::entity::lessons::{self, Entity as Lessons};
use crate::entity::readings::{self, Entity as Readings};
use crate::entity::terms::Entity as Terms;
use crate::entity::users::{self, Entity as Users};
use crate::errors::{RecordsError, Result};
use crate::models::{
    assignments::entities::Assignment,
    common::validation::{ValidationErrors, ValidationRule},
    courses::{
        entities::Course,
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    lessons::entities::Lesson,
    readings::entities::Reading,
    users::entities::User,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::{info, warn};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let txn = self.begin().await?;
        validate_course(&txn, &req, None).await?;

        let now = now();
        let model = ActiveModel {
            term_id: Set(req.term_id),
            name: Set(req.name.unwrap_or_default()),
            course_code: Set(req.course_code.unwrap_or_default()),
            color: Set(req.color),
            primary_instructor_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("创建课程失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = find_course(&self.db, course_id).await?;
        Ok(result.map(|m| m.into_course()))
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let txn = self.begin().await?;
        let Some(existing) = find_course(&txn, course_id).await? else {
            return Ok(None);
        };

        let candidate = update.merge_into(CreateCourseRequest::from(existing.into_course()));
        validate_course(&txn, &candidate, Some(course_id)).await?;

        let result = write_course(&txn, course_id, candidate).await?;
        commit(txn).await?;
        Ok(Some(result))
    }

    /// 将课程挂到学期下，按目标学期重新检查课程代码唯一
    pub async fn assign_course_to_term_impl(&self, course_id: i64, term_id: i64) -> Result<Course> {
        let txn = self.begin().await?;
        let existing = find_course(&txn, course_id)
            .await?
            .ok_or_else(|| RecordsError::not_found(format!("Course {course_id} not found")))?;

        let mut candidate = CreateCourseRequest::from(existing.into_course());
        candidate.term_id = Some(term_id);
        validate_course(&txn, &candidate, Some(course_id)).await?;

        let result = write_course(&txn, course_id, candidate).await?;
        commit(txn).await?;
        Ok(result)
    }

    /// 删除课程
    ///
    /// 仍有学生或教师关联时拒绝；否则在同一事务中删除课时及其阅读材料、
    /// 作业及其成绩，清空其他课时对这些作业的引用，最后删除课程本身。
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let txn = self.begin().await?;
        if find_course(&txn, course_id).await?.is_none() {
            return Ok(false);
        }

        let student_count = CourseStudents::find()
            .filter(course_students::Column::CourseId.eq(course_id))
            .count(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("统计课程学生失败: {e}")))?;
        let instructor_count = CourseInstructors::find()
            .filter(course_instructors::Column::CourseId.eq(course_id))
            .count(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("统计课程教师失败: {e}")))?;

        if student_count > 0 || instructor_count > 0 {
            warn!(
                "课程 {} 仍有 {} 名学生、{} 名教师，拒绝删除",
                course_id, student_count, instructor_count
            );
            return Err(RecordsError::delete_restricted(format!(
                "Course {course_id} still has {student_count} student(s) and {instructor_count} instructor(s)"
            )));
        }

        let assignment_ids: Vec<i64> = Assignments::find()
            .select_only()
            .column(assignments::Column::Id)
            .filter(assignments::Column::CourseId.eq(course_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询课程作业失败: {e}")))?;
        purge_assignment_dependents(&txn, &assignment_ids).await?;

        let lesson_ids: Vec<i64> = Lessons::find()
            .select_only()
            .column(lessons::Column::Id)
            .filter(lessons::Column::CourseId.eq(course_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询课程课时失败: {e}")))?;

        if !lesson_ids.is_empty() {
            Readings::delete_many()
                .filter(readings::Column::LessonId.is_in(lesson_ids.clone()))
                .exec(&txn)
                .await
                .map_err(|e| RecordsError::database_operation(format!("删除阅读材料失败: {e}")))?;

            Lessons::delete_many()
                .filter(lessons::Column::Id.is_in(lesson_ids.clone()))
                .exec(&txn)
                .await
                .map_err(|e| RecordsError::database_operation(format!("删除课时失败: {e}")))?;
        }

        if !assignment_ids.is_empty() {
            Assignments::delete_many()
                .filter(assignments::Column::Id.is_in(assignment_ids.clone()))
                .exec(&txn)
                .await
                .map_err(|e| RecordsError::database_operation(format!("删除作业失败: {e}")))?;
        }

        let result = Courses::delete_by_id(course_id)
            .exec(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("删除课程失败: {e}")))?;

        commit(txn).await?;
        info!(
            "课程 {} 已删除，级联删除 {} 个课时、{} 个作业",
            course_id,
            lesson_ids.len(),
            assignment_ids.len()
        );
        Ok(result.rows_affected > 0)
    }

    /// 课程的课时
    pub async fn list_course_lessons_impl(&self, course_id: i64) -> Result<Vec<Lesson>> {
        let lessons = Lessons::find()
            .filter(lessons::Column::CourseId.eq(course_id))
            .order_by_asc(lessons::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询课时列表失败: {e}")))?;

        Ok(lessons.into_iter().map(|m| m.into_lesson()).collect())
    }

    /// 课程的作业，按 due_at、active_at 排序
    pub async fn list_course_assignments_impl(&self, course_id: i64) -> Result<Vec<Assignment>> {
        let assignments = Assignments::find()
            .filter(assignments::Column::CourseId.eq(course_id))
            .order_by_asc(assignments::Column::DueAt)
            .order_by_asc(assignments::Column::ActiveAt)
            .order_by_asc(assignments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(assignments.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 经由课时获取课程的阅读材料
    pub async fn list_course_readings_impl(&self, course_id: i64) -> Result<Vec<Reading>> {
        let readings = Readings::find()
            .join(JoinType::InnerJoin, readings::Relation::Lesson.def())
            .filter(lessons::Column::CourseId.eq(course_id))
            .order_by_asc(readings::Column::OrderNumber)
            .order_by_asc(readings::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询阅读材料失败: {e}")))?;

        Ok(readings.into_iter().map(|m| m.into_reading()).collect())
    }

    /// 课程学生，按姓、名排序
    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<User>> {
        let users = Users::find()
            .join(JoinType::InnerJoin, users::Relation::CourseStudents.def())
            .filter(course_students::Column::CourseId.eq(course_id))
            .order_by_asc(users::Column::LastName)
            .order_by_asc(users::Column::FirstName)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询课程学生失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 课程教师，按加入顺序
    pub async fn list_course_instructors_impl(&self, course_id: i64) -> Result<Vec<User>> {
        let users = Users::find()
            .join(JoinType::InnerJoin, users::Relation::CourseInstructors.def())
            .filter(course_instructors::Column::CourseId.eq(course_id))
            .order_by_asc(course_instructors::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询课程教师失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 设置或清空主讲教师，后写覆盖，不改动教师列表
    pub async fn set_primary_instructor_impl(
        &self,
        course_id: i64,
        user_id: Option<i64>,
    ) -> Result<Course> {
        let txn = self.begin().await?;
        if find_course(&txn, course_id).await?.is_none() {
            return Err(RecordsError::not_found(format!("Course {course_id} not found")));
        }

        let mut errors = ValidationErrors::new();
        check_reference::<Users, _>(&txn, user_id, "primary_instructor_id", &mut errors).await?;
        errors.into_result()?;

        let model = ActiveModel {
            id: Set(course_id),
            primary_instructor_id: Set(user_id),
            updated_at: Set(now()),
            ..Default::default()
        };

        let result = model
            .update(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("更新主讲教师失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_course())
    }

    /// 课程的主讲教师
    pub async fn get_primary_instructor_impl(&self, course_id: i64) -> Result<Option<User>> {
        let Some(course) = find_course(&self.db, course_id).await? else {
            return Ok(None);
        };
        let Some(user_id) = course.primary_instructor_id else {
            return Ok(None);
        };

        let result = Users::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }
}

async fn find_course<C: ConnectionTrait>(db: &C, course_id: i64) -> Result<Option<Model>> {
    Courses::find_by_id(course_id)
        .one(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("查询课程失败: {e}")))
}

/// 字段规则 + 学期存在性 + 学期内课程代码唯一
async fn validate_course<C: ConnectionTrait>(
    db: &C,
    req: &CreateCourseRequest,
    exclude_id: Option<i64>,
) -> Result<()> {
    let mut errors = req.validate();
    check_reference::<Terms, _>(db, req.term_id, "term_id", &mut errors).await?;

    // term_id 为空时不参与比较
    if let (Some(term_id), Some(code)) = (req.term_id, req.course_code.as_deref()) {
        let mut select = Courses::find()
            .filter(Column::TermId.eq(term_id))
            .filter(Column::CourseCode.eq(code));
        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let taken = select
            .count(db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("检查课程代码失败: {e}")))?;
        if taken > 0 {
            errors.add("course_code", ValidationRule::Taken);
        }
    }

    errors.into_result()
}

async fn write_course<C: ConnectionTrait>(
    db: &C,
    course_id: i64,
    req: CreateCourseRequest,
) -> Result<Course> {
    let model = ActiveModel {
        id: Set(course_id),
        term_id: Set(req.term_id),
        name: Set(req.name.unwrap_or_default()),
        course_code: Set(req.course_code.unwrap_or_default()),
        color: Set(req.color),
        updated_at: Set(now()),
        ..Default::default()
    };

    let result = model
        .update(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("更新课程失败: {e}")))?;

    Ok(result.into_course())
}
