mod common;

use common::{seed_course, seed_user, setup_storage};
use rust_school_records::models::{
    ValidationRule,
    assignments::requests::{CreateAssignmentGradeRequest, CreateAssignmentRequest},
    users::requests::{CreateUserRequest, UpdateUserRequest},
};

#[tokio::test]
async fn test_user_requires_names_and_email() {
    let storage = setup_storage().await;

    let brian = CreateUserRequest {
        first_name: Some("Brian".to_string()),
        ..Default::default()
    };
    let err = storage
        .create_user(brian.clone())
        .await
        .expect_err("First name alone must be rejected");
    assert_eq!(
        err.validation_errors().map(|e| e.fields()),
        Some(vec!["last_name", "email"])
    );

    let user = storage
        .create_user(CreateUserRequest {
            last_name: Some("Yarsawich".to_string()),
            email: Some("testing@test.com".to_string()),
            ..brian
        })
        .await
        .expect("Complete user should be accepted");
    assert_eq!(user.full_name(), "Brian Yarsawich");
    assert!(!user.instructor);
}

#[tokio::test]
async fn test_email_is_globally_unique() {
    let storage = setup_storage().await;

    let request = CreateUserRequest {
        first_name: Some("John".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("john@doe.com".to_string()),
        ..Default::default()
    };
    let first = storage.create_user(request.clone()).await.unwrap();

    let err = storage
        .create_user(CreateUserRequest {
            first_name: Some("Jane".to_string()),
            ..request
        })
        .await
        .expect_err("Second user with the same email must be rejected");
    assert!(err.validation_errors().is_some_and(|e| e.has("email", ValidationRule::Taken)));

    let found = storage.get_user_by_email("john@doe.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(first.id));
}

#[tokio::test]
async fn test_email_uniqueness_ignores_case() {
    let storage = setup_storage().await;

    let request = CreateUserRequest {
        first_name: Some("Jess".to_string()),
        last_name: Some("Kirk".to_string()),
        email: Some("a@b.com".to_string()),
        ..Default::default()
    };
    let first = storage.create_user(request.clone()).await.unwrap();

    let err = storage
        .create_user(CreateUserRequest {
            email: Some("A@B.com".to_string()),
            ..request
        })
        .await
        .expect_err("Case variant of an existing email must be rejected");
    assert!(err.validation_errors().is_some_and(|e| e.has("email", ValidationRule::Taken)));

    let mixed = storage
        .create_user(CreateUserRequest {
            first_name: Some("Mason".to_string()),
            last_name: Some("Matthews".to_string()),
            email: Some("Mason@Example.COM".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mixed.email, "mason@example.com");

    let found = storage.get_user_by_email("A@b.COM").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(first.id));
}

#[tokio::test]
async fn test_update_user_validates_email_and_photo() {
    let storage = setup_storage().await;
    let kim = seed_user(&storage, "Da-Me", "Kim").await;
    let doe = seed_user(&storage, "John", "Doe").await;

    let err = storage
        .update_user(
            kim.id,
            UpdateUserRequest {
                email: Some(doe.email.clone()),
                photo_url: Some("not a url".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    let errors = err.validation_errors().expect("Expected validation errors");
    assert!(errors.has("email", ValidationRule::Taken));
    assert!(errors.has("photo_url", ValidationRule::Invalid));

    let updated = storage
        .update_user(
            kim.id,
            UpdateUserRequest {
                photo_url: Some("https://avatars.example.com/kim.png".to_string()),
                instructor: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("User should exist");
    assert!(updated.instructor);
    assert_eq!(updated.email, kim.email);
    assert_eq!(
        updated.photo_url.as_deref(),
        Some("https://avatars.example.com/kim.png")
    );
}

#[tokio::test]
async fn test_duplicate_enrollment_is_rejected() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let student = seed_user(&storage, "Brian", "Yarsawich").await;

    storage.enroll_student(course.id, student.id).await.unwrap();
    let err = storage.enroll_student(course.id, student.id).await.unwrap_err();
    assert!(err.validation_errors().is_some_and(|e| e.has("student_id", ValidationRule::Taken)));

    let err = storage.enroll_student(course.id, 9999).await.unwrap_err();
    assert!(err.validation_errors().is_some_and(|e| e.has("student_id", ValidationRule::MissingTarget)));

    assert_eq!(storage.list_course_enrollments(course.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_course_projections() {
    let storage = setup_storage().await;
    let ror = seed_course(&storage, None, "ROR600").await;
    let jss = seed_course(&storage, None, "JSS600").await;
    let student = seed_user(&storage, "Brian", "Yarsawich").await;
    let instructor = seed_user(&storage, "Mason", "Matthews").await;

    storage.enroll_student(jss.id, student.id).await.unwrap();
    storage.enroll_student(ror.id, student.id).await.unwrap();
    storage.add_course_instructor(jss.id, instructor.id).await.unwrap();

    let courses: Vec<i64> = storage
        .list_student_courses(student.id)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(courses, vec![ror.id, jss.id]);

    let taught = storage.list_instructor_courses(instructor.id).await.unwrap();
    assert_eq!(taught.len(), 1);
    assert_eq!(taught[0].id, jss.id);

    let links = storage.list_course_instructor_links(jss.id).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].instructor_id, instructor.id);

    let err = storage.add_course_instructor(jss.id, instructor.id).await.unwrap_err();
    assert!(err.validation_errors().is_some_and(|e| e.has("instructor_id", ValidationRule::Taken)));
}

#[tokio::test]
async fn test_withdraw_keeps_grades_without_link() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let student = seed_user(&storage, "John", "Doe").await;
    let link = storage.enroll_student(course.id, student.id).await.unwrap();

    let assignment = storage
        .create_assignment(CreateAssignmentRequest {
            course_id: Some(course.id),
            name: Some("Battleship".to_string()),
            percent_of_grade: Some(10.0),
            ..Default::default()
        })
        .await
        .unwrap();
    let grade = storage
        .create_assignment_grade(CreateAssignmentGradeRequest {
            assignment_id: Some(assignment.id),
            course_student_id: Some(link.id),
            final_grade: Some(75.0),
        })
        .await
        .unwrap();
    assert_eq!(grade.course_student_id, Some(link.id));

    assert!(storage.withdraw_student(course.id, student.id).await.unwrap());
    assert!(!storage.withdraw_student(course.id, student.id).await.unwrap());
    assert!(storage.list_course_students(course.id).await.unwrap().is_empty());

    let grade = storage
        .get_assignment_grade_by_id(grade.id)
        .await
        .unwrap()
        .expect("Grade must survive withdrawal");
    assert_eq!(grade.course_student_id, None);
    assert_eq!(grade.final_grade, Some(75.0));
}
