//! 学校存储操作

use super::{SeaOrmStorage, commit, now};
use crate::entity::courses::{self, Entity as Courses};
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::entity::terms::{self, Entity as Terms};
use crate::errors::{RecordsError, Result};
use crate::models::{
    courses::entities::Course,
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, UpdateSchoolRequest},
    },
    terms::entities::Term,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建学校
    pub async fn create_school_impl(&self, req: CreateSchoolRequest) -> Result<School> {
        req.validate().into_result()?;

        let now = now();
        let model = ActiveModel {
            name: Set(req.name.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("创建学校失败: {e}")))?;

        Ok(result.into_school())
    }

    /// 通过 ID 获取学校
    pub async fn get_school_by_id_impl(&self, school_id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(school_id)
            .one(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 列出所有学校
    pub async fn list_schools_impl(&self) -> Result<Vec<School>> {
        let schools = Schools::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询学校列表失败: {e}")))?;

        Ok(schools.into_iter().map(|m| m.into_school()).collect())
    }

    /// 更新学校信息
    pub async fn update_school_impl(
        &self,
        school_id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        let Some(existing) = self.get_school_by_id_impl(school_id).await? else {
            return Ok(None);
        };

        let candidate = update.merge_into(CreateSchoolRequest::from(existing));
        candidate.validate().into_result()?;

        let model = ActiveModel {
            id: Set(school_id),
            name: Set(candidate.name.unwrap_or_default()),
            updated_at: Set(now()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("更新学校失败: {e}")))?;

        Ok(Some(result.into_school()))
    }

    /// 删除学校，仍有学期时拒绝
    pub async fn delete_school_impl(&self, school_id: i64) -> Result<bool> {
        let txn = self.begin().await?;

        if Schools::find_by_id(school_id)
            .one(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询学校失败: {e}")))?
            .is_none()
        {
            return Ok(false);
        }

        let term_count = Terms::find()
            .filter(terms::Column::SchoolId.eq(school_id))
            .count(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("统计学期失败: {e}")))?;

        if term_count > 0 {
            warn!("学校 {} 仍有 {} 个学期，拒绝删除", school_id, term_count);
            return Err(RecordsError::delete_restricted(format!(
                "School {school_id} still owns {term_count} term(s)"
            )));
        }

        let result = Schools::delete_by_id(school_id)
            .exec(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("删除学校失败: {e}")))?;

        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// 学校的学期
    pub async fn list_school_terms_impl(&self, school_id: i64) -> Result<Vec<Term>> {
        let terms = Terms::find()
            .filter(terms::Column::SchoolId.eq(school_id))
            .order_by_asc(terms::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询学期列表失败: {e}")))?;

        Ok(terms.into_iter().map(|m| m.into_term()).collect())
    }

    /// 经由学期获取学校的课程
    pub async fn list_school_courses_impl(&self, school_id: i64) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .join(JoinType::InnerJoin, courses::Relation::Term.def())
            .filter(terms::Column::SchoolId.eq(school_id))
            .order_by_asc(terms::Column::Id)
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }
}
