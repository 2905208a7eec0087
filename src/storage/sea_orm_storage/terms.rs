//! 学期存储操作

use super::{SeaOrmStorage, check_reference, commit, now};
use crate::entity::courses::{self, Entity as Courses};
use crate::entity::schools::Entity as Schools;
use crate::entity::terms::{ActiveModel, Entity as Terms, Model};
use crate::errors::{RecordsError, Result};
use crate::models::{
    courses::entities::Course,
    terms::{
        entities::Term,
        requests::{CreateTermRequest, UpdateTermRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建学期
    pub async fn create_term_impl(&self, req: CreateTermRequest) -> Result<Term> {
        let txn = self.begin().await?;
        validate_term(&txn, &req).await?;

        let now = now();
        let model = ActiveModel {
            school_id: Set(req.school_id.unwrap_or_default()),
            name: Set(req.name.unwrap_or_default()),
            starts_on: Set(req.starts_on.unwrap_or_default()),
            ends_on: Set(req.ends_on.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("创建学期失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_term())
    }

    /// 通过 ID 获取学期
    pub async fn get_term_by_id_impl(&self, term_id: i64) -> Result<Option<Term>> {
        let result = find_term(&self.db, term_id).await?;
        Ok(result.map(|m| m.into_term()))
    }

    /// 更新学期信息
    pub async fn update_term_impl(
        &self,
        term_id: i64,
        update: UpdateTermRequest,
    ) -> Result<Option<Term>> {
        let txn = self.begin().await?;
        let Some(existing) = find_term(&txn, term_id).await? else {
            return Ok(None);
        };

        let candidate = update.merge_into(CreateTermRequest::from(existing.into_term()));
        validate_term(&txn, &candidate).await?;

        let result = write_term(&txn, term_id, candidate).await?;
        commit(txn).await?;
        Ok(Some(result))
    }

    /// 将学期挂到学校下
    pub async fn assign_term_to_school_impl(&self, term_id: i64, school_id: i64) -> Result<Term> {
        let txn = self.begin().await?;
        let existing = find_term(&txn, term_id)
            .await?
            .ok_or_else(|| RecordsError::not_found(format!("Term {term_id} not found")))?;

        let mut candidate = CreateTermRequest::from(existing.into_term());
        candidate.school_id = Some(school_id);
        validate_term(&txn, &candidate).await?;

        let result = write_term(&txn, term_id, candidate).await?;
        commit(txn).await?;
        Ok(result)
    }

    /// 删除学期，仍有课程时拒绝
    pub async fn delete_term_impl(&self, term_id: i64) -> Result<bool> {
        let txn = self.begin().await?;
        if find_term(&txn, term_id).await?.is_none() {
            return Ok(false);
        }

        let course_count = Courses::find()
            .filter(courses::Column::TermId.eq(term_id))
            .count(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("统计课程失败: {e}")))?;

        if course_count > 0 {
            warn!("学期 {} 仍有 {} 门课程，拒绝删除", term_id, course_count);
            return Err(RecordsError::delete_restricted(format!(
                "Term {term_id} still owns {course_count} course(s)"
            )));
        }

        let result = Terms::delete_by_id(term_id)
            .exec(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("删除学期失败: {e}")))?;

        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// 学期下的课程
    pub async fn list_term_courses_impl(&self, term_id: i64) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .filter(courses::Column::TermId.eq(term_id))
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }
}

async fn find_term<C: ConnectionTrait>(db: &C, term_id: i64) -> Result<Option<Model>> {
    Terms::find_by_id(term_id)
        .one(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("查询学期失败: {e}")))
}

async fn validate_term<C: ConnectionTrait>(db: &C, req: &CreateTermRequest) -> Result<()> {
    let mut errors = req.validate();
    check_reference::<Schools, _>(db, req.school_id, "school_id", &mut errors).await?;
    errors.into_result()
}

async fn write_term<C: ConnectionTrait>(
    db: &C,
    term_id: i64,
    req: CreateTermRequest,
) -> Result<Term> {
    let model = ActiveModel {
        id: Set(term_id),
        school_id: Set(req.school_id.unwrap_or_default()),
        name: Set(req.name.unwrap_or_default()),
        starts_on: Set(req.starts_on.unwrap_or_default()),
        ends_on: Set(req.ends_on.unwrap_or_default()),
        updated_at: Set(now()),
        ..Default::default()
    };

    let result = model
        .update(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("更新学期失败: {e}")))?;

    Ok(result.into_term())
}
