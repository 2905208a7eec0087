//! 用户存储操作

use super::{SeaOrmStorage, commit, now};
use crate::entity::course_instructors;
use crate::entity::course_students;
use crate::entity::courses::{self, Entity as Courses};
use crate::entity::users::{ActiveModel, Column, Entity as Users, Model};
use crate::errors::{RecordsError, Result};
use crate::models::{
    common::validation::ValidationRule,
    courses::entities::Course,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, mut req: CreateUserRequest) -> Result<User> {
        req.email = normalize_email(req.email);
        let txn = self.begin().await?;
        validate_user(&txn, &req, None).await?;

        let now = now();
        let model = ActiveModel {
            first_name: Set(req.first_name.unwrap_or_default()),
            last_name: Set(req.last_name.unwrap_or_default()),
            email: Set(req.email.unwrap_or_default()),
            photo_url: Set(normalize_photo_url(req.photo_url)),
            instructor: Set(req.instructor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("创建用户失败: {e}")))?;

        commit(txn).await?;
        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, user_id: i64) -> Result<Option<User>> {
        let result = find_user(&self.db, user_id).await?;
        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        user_id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let txn = self.begin().await?;
        let Some(existing) = find_user(&txn, user_id).await? else {
            return Ok(None);
        };

        let mut candidate = update.merge_into(CreateUserRequest::from(existing.into_user()));
        candidate.email = normalize_email(candidate.email);
        validate_user(&txn, &candidate, Some(user_id)).await?;

        let model = ActiveModel {
            id: Set(user_id),
            first_name: Set(candidate.first_name.unwrap_or_default()),
            last_name: Set(candidate.last_name.unwrap_or_default()),
            email: Set(candidate.email.unwrap_or_default()),
            photo_url: Set(normalize_photo_url(candidate.photo_url)),
            instructor: Set(candidate.instructor),
            updated_at: Set(now()),
            ..Default::default()
        };

        let result = model
            .update(&txn)
            .await
            .map_err(|e| RecordsError::database_operation(format!("更新用户失败: {e}")))?;

        commit(txn).await?;
        Ok(Some(result.into_user()))
    }

    /// 学生选修的课程
    pub async fn list_student_courses_impl(&self, user_id: i64) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .join(JoinType::InnerJoin, courses::Relation::CourseStudents.def())
            .filter(course_students::Column::StudentId.eq(user_id))
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询学生课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    /// 教师任教的课程
    pub async fn list_instructor_courses_impl(&self, user_id: i64) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .join(JoinType::InnerJoin, courses::Relation::CourseInstructors.def())
            .filter(course_instructors::Column::InstructorId.eq(user_id))
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("查询教师课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }
}

async fn find_user<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<Option<Model>> {
    Users::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| RecordsError::database_operation(format!("查询用户失败: {e}")))
}

/// 字段规则 + 邮箱全局唯一
async fn validate_user<C: ConnectionTrait>(
    db: &C,
    req: &CreateUserRequest,
    exclude_id: Option<i64>,
) -> Result<()> {
    let mut errors = req.validate();

    if let Some(email) = req.email.as_deref()
        && !email.trim().is_empty()
    {
        let mut select = Users::find().filter(Column::Email.eq(email));
        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let taken = select
            .count(db)
            .await
            .map_err(|e| RecordsError::database_operation(format!("检查邮箱失败: {e}")))?;
        if taken > 0 {
            errors.add("email", ValidationRule::Taken);
        }
    }

    errors.into_result()
}

// 邮箱不区分大小写，统一以小写保存和比较
fn normalize_email(email: Option<String>) -> Option<String> {
    email.map(|email| email.trim().to_lowercase())
}

// 空白的 photo_url 按未填写保存
fn normalize_photo_url(photo_url: Option<String>) -> Option<String> {
    photo_url.filter(|url| !url.trim().is_empty())
}
