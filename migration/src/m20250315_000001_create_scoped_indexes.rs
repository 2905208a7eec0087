use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::{
    Assignments, CourseInstructors, CourseStudents, Courses, Lessons, Readings, Terms, Users,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 外键索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_terms_school_id")
                    .table(Terms::Table)
                    .col(Terms::SchoolId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lessons_course_id")
                    .table(Lessons::Table)
                    .col(Lessons::CourseId)
                    .to_owned(),
            )
            .await?;

        // 阅读材料默认按 order_number 排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_readings_lesson_order")
                    .table(Readings::Table)
                    .col(Readings::LessonId)
                    .col(Readings::OrderNumber)
                    .to_owned(),
            )
            .await?;

        // 课程作业按 due_at、active_at 排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_course_schedule")
                    .table(Assignments::Table)
                    .col(Assignments::CourseId)
                    .col(Assignments::DueAt)
                    .col(Assignments::ActiveAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_last_first_name")
                    .table(Users::Table)
                    .col(Users::LastName)
                    .col(Users::FirstName)
                    .to_owned(),
            )
            .await?;

        // ==================== 作用域唯一约束 ====================
        // NULL 作用域互不比较，与存储层的校验一致
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uniq_courses_term_course_code")
                    .table(Courses::Table)
                    .col(Courses::TermId)
                    .col(Courses::CourseCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uniq_assignments_course_name")
                    .table(Assignments::Table)
                    .col(Assignments::CourseId)
                    .col(Assignments::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uniq_course_students_course_student")
                    .table(CourseStudents::Table)
                    .col(CourseStudents::CourseId)
                    .col(CourseStudents::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uniq_course_instructors_course_instructor")
                    .table(CourseInstructors::Table)
                    .col(CourseInstructors::CourseId)
                    .col(CourseInstructors::InstructorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let indexes = [
            ("uniq_course_instructors_course_instructor", "course_instructors"),
            ("uniq_course_students_course_student", "course_students"),
            ("uniq_assignments_course_name", "assignments"),
            ("uniq_courses_term_course_code", "courses"),
            ("idx_users_last_first_name", "users"),
            ("idx_assignments_course_schedule", "assignments"),
            ("idx_readings_lesson_order", "readings"),
            ("idx_lessons_course_id", "lessons"),
            ("idx_terms_school_id", "terms"),
        ];

        for (name, table) in indexes {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }

        Ok(())
    }
}
