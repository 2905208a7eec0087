//! 课时实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: Option<i64>,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub outline: Option<String>,
    pub pre_class_assignment_id: Option<i64>,
    pub in_class_assignment_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

// 课前/课内作业两条引用指向同一张表，不实现 Related<assignments::Entity>
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::PreClassAssignmentId",
        to = "super::assignments::Column::Id"
    )]
    PreClassAssignment,
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::InClassAssignmentId",
        to = "super::assignments::Column::Id"
    )]
    InClassAssignment,
    #[sea_orm(has_many = "super::readings::Entity")]
    Readings,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::readings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Readings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_lesson(self) -> crate::models::lessons::entities::Lesson {
        use crate::models::lessons::entities::Lesson;
        use chrono::{DateTime, Utc};

        Lesson {
            id: self.id,
            course_id: self.course_id,
            name: self.name,
            description: self.description,
            outline: self.outline,
            pre_class_assignment_id: self.pre_class_assignment_id,
            in_class_assignment_id: self.in_class_assignment_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
