//! 预导入模块，方便使用

pub use super::assignment_grades::{
    ActiveModel as AssignmentGradeActiveModel, Entity as AssignmentGrades,
    Model as AssignmentGradeModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::course_instructors::{
    ActiveModel as CourseInstructorActiveModel, Entity as CourseInstructors,
    Model as CourseInstructorModel,
};
pub use super::course_students::{
    ActiveModel as CourseStudentActiveModel, Entity as CourseStudents,
    Model as CourseStudentModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::lessons::{ActiveModel as LessonActiveModel, Entity as Lessons, Model as LessonModel};
pub use super::readings::{
    ActiveModel as ReadingActiveModel, Entity as Readings, Model as ReadingModel,
};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::terms::{ActiveModel as TermActiveModel, Entity as Terms, Model as TermModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
