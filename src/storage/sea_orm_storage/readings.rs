//! 阅读材料存储操作

use super::{SeaOrmStorage, check_reference, commit, now};
use crate::entity::lessons::Entity as Lessons;
use crate::entity::readings::{ActiveModel, Entity as Readings, Model};
use crate::errors::{RecordsError, Result};
use crate::models::readings::{
    entities::Reading,
    requests::{CreateReadingRequest, UpdateReadingRequest},
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 创建阅读材料
    pub async fn create_reading_impl(&self, req: CreateReadingRequest) -> Result<Reading> {
        let txn = self.begin().await?;
        validate_reading(&txn, &req).await?;

        let now = now();
        let model = ActiveModel {
            lesson_id: Set(req.lesson_id.unwrap_or_default()),
            order_number: Set(req.order_number.unwrap_or_default()),
            url: Set(req.url.unwrap_or_default()),
            caption: Set(req.caption),
            before_lesson: Set(req.before_lesson),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("创建阅读材料失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_reading())
    }

    /// 通过 ID 获取阅读材料
    pub async fn get_reading_by_id_impl(&self, reading_id: i64) -> Result<Option<Reading>> {
        let result = find_reading(&self.db, reading_id).await?;
        Ok(result.map(|m| m.into_reading()))
    }

    /// 更新阅读材料
    pub async fn update_reading_impl(
        &self,
        reading_id: i64,
        update: UpdateReadingRequest,
    ) -> Result<Option<Reading>> {
        let txn = self.begin().await?;
        let Some(existing) = find_reading(&txn, reading_id).await? else {
            return Ok(None);
        };

        let candidate = update.merge_into(CreateReadingRequest::from(existing.into_reading()));
        validate_reading(&txn, &candidate).await?;

        let result = write_reading(&txn, reading_id, candidate).await?;
        commit(txn).await?;
        Ok(Some(result))
    }

    /// 将阅读材料挂到课时下
    pub async fn assign_reading_to_lesson_impl(
        &self,
        reading_id: i64,
        lesson_id: i64,
    ) -> Result<Reading> {
        let txn = self.begin().await?;
        let existing = find_reading(&txn, reading_id)
            .await?
            .ok_or_else(|| RecordsError::not_found(format!("Reading {reading_id} not found")))?;

        let mut candidate = CreateReadingRequest::from(existing.into_reading());
        candidate.lesson_id = Some(lesson_id);
        validate_reading(&txn, &candidate).await?;

        let result = write_reading(&txn, reading_id, candidate).await?;
        commit(txn).await?;
        Ok(result)
    }

    /// 删除阅读材料
    pub async fn delete_reading_impl(&self, reading_id: i64) -> Result<bool> {
        let result = Readings::delete_by_id(reading_id)
            .exec(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("删除阅读材料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

async fn find_reading<C: ConnectionTrait>(db: &C, reading_id: i64) -> Result<Option<Model>> {
    Readings::find_by_id(reading_id)
        .one(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("查询阅读材料失败: {e}")))
}

async fn validate_reading<C: ConnectionTrait>(db: &C, req: &CreateReadingRequest) -> Result<()> {
    let mut errors = req.validate();
    check_reference::<Lessons, _>(db, req.lesson_id, "lesson_id", &mut errors).await?;
    errors.into_result()
}

async fn write_reading<C: ConnectionTrait>(
    db: &C,
    reading_id: i64,
    req: CreateReadingRequest,
) -> Result<Reading> {
    let model = ActiveModel {
        id: Set(reading_id),
        lesson_id: Set(req.lesson_id.unwrap_or_default()),
        order_number: Set(req.order_number.unwrap_or_default()),
        url: Set(req.url.unwrap_or_default()),
        caption: Set(req.caption),
        before_lesson: Set(req.before_lesson),
        updated_at: Set(now()),
        ..Default::default()
    };

    let result = model
        .update(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("更新阅读材料失败: {e}")))?;

    Ok(result.into_reading())
}
