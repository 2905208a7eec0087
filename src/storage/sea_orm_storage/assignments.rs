//! 作业存储操作

use super::{SeaOrmStorage, check_reference, commit, now};
use crate::entity::assignment_grades::{self, Entity as AssignmentGrades};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments, Model};
use crate::entity::courses::Entity as Courses;
use crate::entity::lessons::{self, Entity as Lessons};
use crate::errors::{RecordsError, Result};
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentGrade},
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    common::validation::ValidationRule,
    lessons::entities::Lesson,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let txn = self.begin().await?;
        validate_assignment(&txn, &req, None).await?;

        let now = now();
        let model = ActiveModel {
            course_id: Set(req.course_id),
            name: Set(req.name.unwrap_or_default()),
            percent_of_grade: Set(req.percent_of_grade.unwrap_or_default()),
            due_at: Set(req.due_at.map(|t| t.timestamp())),
            active_at: Set(req.active_at.map(|t| t.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("创建作业失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = find_assignment(&self.db, assignment_id).await?;
        Ok(result.map(|m| m.into_assignment()))
    }

    /// 更新作业信息
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let txn = self.begin().await?;
        let Some(existing) = find_assignment(&txn, assignment_id).await? else {
            return Ok(None);
        };

        let candidate = update.merge_into(CreateAssignmentRequest::from(existing.into_assignment()));
        validate_assignment(&txn, &candidate, Some(assignment_id)).await?;

        let result = write_assignment(&txn, assignment_id, candidate).await?;
        commit(txn).await?;
        Ok(Some(result))
    }

    /// 将作业挂到课程下，按目标课程重新检查名称唯一
    pub async fn assign_assignment_to_course_impl(
        &self,
        assignment_id: i64,
        course_id: i64,
    ) -> Result<Assignment> {
        let txn = self.begin().await?;
        let existing = find_assignment(&txn, assignment_id).await?.ok_or_else(|| {
            RecordsError::not_found(format!("Assignment {assignment_id} not found"))
        })?;

        let mut candidate = CreateAssignmentRequest::from(existing.into_assignment());
        candidate.course_id = Some(course_id);
        validate_assignment(&txn, &candidate, Some(assignment_id)).await?;

        let result = write_assignment(&txn, assignment_id, candidate).await?;
        commit(txn).await?;
        Ok(result)
    }

    /// 删除作业，级联删除成绩并清空课时引用
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let txn = self.begin().await?;
        if find_assignment(&txn, assignment_id).await?.is_none() {
            return Ok(false);
        }

        purge_assignment_dependents(&txn, &[assignment_id]).await?;

        let result = Assignments::delete_by_id(assignment_id)
            .exec(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("删除作业失败: {e}")))?;

        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// 作业的成绩
    pub async fn list_assignment_grades_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<AssignmentGrade>> {
        let grades = AssignmentGrades::find()
            .filter(assignment_grades::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(assignment_grades::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_assignment_grade()).collect())
    }

    /// 以课前或课内作业引用它的课时
    pub async fn list_assignment_lessons_impl(&self, assignment_id: i64) -> Result<Vec<Lesson>> {
        let lessons = Lessons::find()
            .filter(
                Condition::any()
                    .add(lessons::Column::PreClassAssignmentId.eq(assignment_id))
                    .add(lessons::Column::InClassAssignmentId.eq(assignment_id)),
            )
            .order_by_asc(lessons::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询课时列表失败: {e}")))?;

        Ok(lessons.into_iter().map(|m| m.into_lesson()).collect())
    }
}

/// 删除作业前的清理：删除成绩，清空课时的课前/课内引用
pub(super) async fn purge_assignment_dependents<C: ConnectionTrait>(
    db: &C,
    assignment_ids: &[i64],
) -> Result<()> {
    if assignment_ids.is_empty() {
        return Ok(());
    }

    AssignmentGrades::delete_many()
        .filter(assignment_grades::Column::AssignmentId.is_in(assignment_ids.to_vec()))
        .exec(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("删除作业成绩失败: {e}")))?;

    Lessons::update_many()
        .col_expr(
            lessons::Column::PreClassAssignmentId,
            Expr::value(Option::<i64>::None),
        )
        .filter(lessons::Column::PreClassAssignmentId.is_in(assignment_ids.to_vec()))
        .exec(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("清空课前作业引用失败: {e}")))?;

    Lessons::update_many()
        .col_expr(
            lessons::Column::InClassAssignmentId,
            Expr::value(Option::<i64>::None),
        )
        .filter(lessons::Column::InClassAssignmentId.is_in(assignment_ids.to_vec()))
        .exec(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("清空课内作业引用失败: {e}")))?;

    Ok(())
}

async fn find_assignment<C: ConnectionTrait>(db: &C, assignment_id: i64) -> Result<Option<Model>> {
    Assignments::find_by_id(assignment_id)
        .one(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("查询作业失败: {e}")))
}

/// 字段规则 + 课程存在性 + 课程内名称唯一
async fn validate_assignment<C: ConnectionTrait>(
    db: &C,
    req: &CreateAssignmentRequest,
    exclude_id: Option<i64>,
) -> Result<()> {
    let mut errors = req.validate();
    check_reference::<Courses, _>(db, req.course_id, "course_id", &mut errors).await?;

    // course_id 为空时不参与比较
    if let (Some(course_id), Some(name)) = (req.course_id, req.name.as_deref()) {
        let mut select = Assignments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Name.eq(name));
        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let taken = select
            .count(db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("检查作业名称失败: {e}")))?;
        if taken > 0 {
            errors.add("name", ValidationRule::Taken);
        }
    }

    errors.into_result()
}

async fn write_assignment<C: ConnectionTrait>(
    db: &C,
    assignment_id: i64,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    let model = ActiveModel {
        id: Set(assignment_id),
        course_id: Set(req.course_id),
        name: Set(req.name.unwrap_or_default()),
        percent_of_grade: Set(req.percent_of_grade.unwrap_or_default()),
        due_at: Set(req.due_at.map(|t| t.timestamp())),
        active_at: Set(req.active_at.map(|t| t.timestamp())),
        updated_at: Set(now()),
        ..Default::default()
    };

    let result = model
        .update(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("更新作业失败: {e}")))?;

    Ok(result.into_assignment())
}
