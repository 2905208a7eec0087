//! 作业成绩存储操作

use super::{SeaOrmStorage, check_reference, commit, now};
use crate::entity::assignment_grades::{ActiveModel, Entity as AssignmentGrades};
use crate::entity::assignments::Entity as Assignments;
use crate::entity::course_students::Entity as CourseStudents;
use crate::errors::{RecordsError, Result};
use crate::models::{
    assignments::{
        entities::AssignmentGrade,
        requests::{CreateAssignmentGradeRequest, UpdateAssignmentGradeRequest},
    },
    common::validation::{ValidationErrors, ValidationRule},
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set};

impl SeaOrmStorage {
    /// 录入成绩
    pub async fn create_assignment_grade_impl(
        &self,
        req: CreateAssignmentGradeRequest,
    ) -> Result<AssignmentGrade> {
        let txn = self.begin().await?;

        let mut errors = req.validate();
        check_reference::<Assignments, _>(&txn, req.assignment_id, "assignment_id", &mut errors)
            .await?;
        check_reference::<CourseStudents, _>(
            &txn,
            req.course_student_id,
            "course_student_id",
            &mut errors,
        )
        .await?;
        errors.into_result()?;

        let now = now();
        let model = ActiveModel {
            assignment_id: Set(req.assignment_id.unwrap_or_default()),
            course_student_id: Set(req.course_student_id),
            final_grade: Set(req.final_grade),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("录入成绩失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_assignment_grade())
    }

    /// 通过 ID 获取成绩
    pub async fn get_assignment_grade_by_id_impl(
        &self,
        grade_id: i64,
    ) -> Result<Option<AssignmentGrade>> {
        let result = AssignmentGrades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment_grade()))
    }

    /// 更新成绩
    pub async fn update_assignment_grade_impl(
        &self,
        grade_id: i64,
        update: UpdateAssignmentGradeRequest,
    ) -> Result<Option<AssignmentGrade>> {
        if self.get_assignment_grade_by_id_impl(grade_id).await?.is_none() {
            return Ok(None);
        }

        if update.final_grade.is_some_and(|g| !g.is_finite()) {
            let mut errors = ValidationErrors::new();
            errors.add("final_grade", ValidationRule::Invalid);
            return Err(errors.into());
        }

        let model = ActiveModel {
            id: Set(grade_id),
            final_grade: update.final_grade.map_or(NotSet, |g| Set(Some(g))),
            updated_at: Set(now()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("更新成绩失败: {e}")))?;

        Ok(Some(result.into_assignment_grade()))
    }

    /// 删除成绩
    pub async fn delete_assignment_grade_impl(&self, grade_id: i64) -> Result<bool> {
        let result = AssignmentGrades::delete_by_id(grade_id)
            .exec(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
