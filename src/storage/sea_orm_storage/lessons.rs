//! 课时存储操作

use super::{SeaOrmStorage, check_reference, commit, now};
use crate::entity::assignments::Entity as Assignments;
use crate::entity::courses::Entity as Courses;
use crate::entity::lessons::{ActiveModel, Entity as Lessons, Model};
use crate::entity::readings::{self, Entity as Readings};
use crate::errors::{RecordsError, Result};
use crate::models::{
    lessons::{
        entities::Lesson,
        requests::{CreateLessonRequest, UpdateLessonRequest},
    },
    readings::entities::{Reading, ReadingScope},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建课时
    pub async fn create_lesson_impl(&self, req: CreateLessonRequest) -> Result<Lesson> {
        let txn = self.begin().await?;
        validate_lesson(&txn, &req).await?;

        let now = now();
        let model = ActiveModel {
            course_id: Set(req.course_id),
            name: Set(req.name.unwrap_or_default()),
            description: Set(req.description),
            outline: Set(req.outline),
            pre_class_assignment_id: Set(req.pre_class_assignment_id),
            in_class_assignment_id: Set(req.in_class_assignment_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("创建课时失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_lesson())
    }

    /// 通过 ID 获取课时
    pub async fn get_lesson_by_id_impl(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        let result = find_lesson(&self.db, lesson_id).await?;
        Ok(result.map(|m| m.into_lesson()))
    }

    /// 更新课时信息
    pub async fn update_lesson_impl(
        &self,
        lesson_id: i64,
        update: UpdateLessonRequest,
    ) -> Result<Option<Lesson>> {
        let txn = self.begin().await?;
        let Some(existing) = find_lesson(&txn, lesson_id).await? else {
            return Ok(None);
        };

        let candidate = update.merge_into(CreateLessonRequest::from(existing.into_lesson()));
        validate_lesson(&txn, &candidate).await?;

        let result = write_lesson(&txn, lesson_id, candidate).await?;
        commit(txn).await?;
        Ok(Some(result))
    }

    /// 将课时挂到课程下
    pub async fn assign_lesson_to_course_impl(&self, lesson_id: i64, course_id: i64) -> Result<Lesson> {
        let txn = self.begin().await?;
        let existing = find_lesson(&txn, lesson_id)
            .await?
            .ok_or_else(|| RecordsError::not_found(format!("Lesson {lesson_id} not found")))?;

        let mut candidate = CreateLessonRequest::from(existing.into_lesson());
        candidate.course_id = Some(course_id);
        validate_lesson(&txn, &candidate).await?;

        let result = write_lesson(&txn, lesson_id, candidate).await?;
        commit(txn).await?;
        Ok(result)
    }

    /// 删除课时并级联删除阅读材料
    pub async fn delete_lesson_impl(&self, lesson_id: i64) -> Result<bool> {
        let txn = self.begin().await?;
        if find_lesson(&txn, lesson_id).await?.is_none() {
            return Ok(false);
        }

        Readings::delete_many()
            .filter(readings::Column::LessonId.eq(lesson_id))
            .exec(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("删除阅读材料失败: {e}")))?;

        let result = Lessons::delete_by_id(lesson_id)
            .exec(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("删除课时失败: {e}")))?;

        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// 课时的阅读材料，按 order_number 排序
    pub async fn list_lesson_readings_impl(
        &self,
        lesson_id: i64,
        scope: ReadingScope,
    ) -> Result<Vec<Reading>> {
        let mut select = Readings::find().filter(readings::Column::LessonId.eq(lesson_id));

        select = match scope {
            ReadingScope::All => select,
            ReadingScope::Pre => select.filter(readings::Column::BeforeLesson.eq(true)),
            ReadingScope::Post => select.filter(readings::Column::BeforeLesson.ne(true)),
        };

        let readings = select
            .order_by_asc(readings::Column::OrderNumber)
            .order_by_asc(readings::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询阅读材料失败: {e}")))?;

        Ok(readings.into_iter().map(|m| m.into_reading()).collect())
    }
}

async fn find_lesson<C: ConnectionTrait>(db: &C, lesson_id: i64) -> Result<Option<Model>> {
    Lessons::find_by_id(lesson_id)
        .one(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("查询课时失败: {e}")))
}

/// 字段规则 + 课程与课前/课内作业存在性
async fn validate_lesson<C: ConnectionTrait>(db: &C, req: &CreateLessonRequest) -> Result<()> {
    let mut errors = req.validate();
    check_reference::<Courses, _>(db, req.course_id, "course_id", &mut errors).await?;
    check_reference::<Assignments, _>(
        db,
        req.pre_class_assignment_id,
        "pre_class_assignment_id",
        &mut errors,
    )
    .await?;
    check_reference::<Assignments, _>(
        db,
        req.in_class_assignment_id,
        "in_class_assignment_id",
        &mut errors,
    )
    .await?;
    errors.into_result()
}

async fn write_lesson<C: ConnectionTrait>(
    db: &C,
    lesson_id: i64,
    req: CreateLessonRequest,
) -> Result<Lesson> {
    let model = ActiveModel {
        id: Set(lesson_id),
        course_id: Set(req.course_id),
        name: Set(req.name.unwrap_or_default()),
        description: Set(req.description),
        outline: Set(req.outline),
        pre_class_assignment_id: Set(req.pre_class_assignment_id),
        in_class_assignment_id: Set(req.in_class_assignment_id),
        updated_at: Set(now()),
        ..Default::default()
    };

    let result = model
        .update(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("更新课时失败: {e}")))?;

    Ok(result.into_lesson())
}
