mod common;

use chrono::{TimeZone, Utc};
use common::{seed_course, seed_lesson, setup_storage};
use rust_school_records::models::{
    ValidationRule,
    assignments::requests::{
        CreateAssignmentGradeRequest, CreateAssignmentRequest, UpdateAssignmentGradeRequest,
        UpdateAssignmentRequest,
    },
    lessons::requests::{CreateLessonRequest, UpdateLessonRequest},
    readings::{
        entities::ReadingScope,
        requests::{CreateReadingRequest, UpdateReadingRequest},
    },
};

fn reading(lesson_id: i64, order_number: i32, before_lesson: bool) -> CreateReadingRequest {
    CreateReadingRequest {
        lesson_id: Some(lesson_id),
        order_number: Some(order_number),
        url: Some(format!("https://example.com/reading/{order_number}")),
        caption: None,
        before_lesson,
    }
}

#[tokio::test]
async fn test_reading_url_must_have_scheme() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let lesson = seed_lesson(&storage, course.id, "Intro").await;

    let err = storage
        .create_reading(CreateReadingRequest {
            url: Some("www.google.com".to_string()),
            ..reading(lesson.id, 1, false)
        })
        .await
        .expect_err("Reading url without scheme must be rejected");
    assert!(err.validation_errors().is_some_and(|e| e.has("url", ValidationRule::Invalid)));

    for url in ["http://x.com", "https://x.com/a"] {
        storage
            .create_reading(CreateReadingRequest {
                url: Some(url.to_string()),
                ..reading(lesson.id, 1, false)
            })
            .await
            .expect("Reading with scheme should be accepted");
    }
}

#[tokio::test]
async fn test_reading_requires_existing_lesson() {
    let storage = setup_storage().await;

    let err = storage.create_reading(reading(404, 1, false)).await.unwrap_err();
    assert!(err.validation_errors().is_some_and(|e| e.has("lesson_id", ValidationRule::MissingTarget)));
}

#[tokio::test]
async fn test_lesson_readings_scopes_and_order() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let lesson = seed_lesson(&storage, course.id, "Intro").await;

    let third = storage.create_reading(reading(lesson.id, 3, true)).await.unwrap();
    let first = storage.create_reading(reading(lesson.id, 1, false)).await.unwrap();
    let second = storage.create_reading(reading(lesson.id, 2, true)).await.unwrap();

    let ids = |readings: Vec<rust_school_records::models::readings::entities::Reading>| {
        readings.into_iter().map(|r| r.id).collect::<Vec<_>>()
    };

    assert_eq!(
        ids(storage.list_lesson_readings(lesson.id, ReadingScope::All).await.unwrap()),
        vec![first.id, second.id, third.id]
    );
    assert_eq!(
        ids(storage.list_lesson_readings(lesson.id, ReadingScope::Pre).await.unwrap()),
        vec![second.id, third.id]
    );
    assert_eq!(
        ids(storage.list_lesson_readings(lesson.id, ReadingScope::Post).await.unwrap()),
        vec![first.id]
    );
}

#[tokio::test]
async fn test_course_readings_through_lessons() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let other = seed_course(&storage, None, "JSS600").await;
    let intro = seed_lesson(&storage, course.id, "Intro").await;
    let models = seed_lesson(&storage, course.id, "Models").await;
    let foreign = seed_lesson(&storage, other.id, "Closures").await;

    let b = storage.create_reading(reading(models.id, 1, false)).await.unwrap();
    let a = storage.create_reading(reading(intro.id, 1, true)).await.unwrap();
    let c = storage.create_reading(reading(intro.id, 2, false)).await.unwrap();
    storage.create_reading(reading(foreign.id, 1, false)).await.unwrap();

    let ids: Vec<i64> = storage
        .list_course_readings(course.id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![b.id, a.id, c.id]);
}

#[tokio::test]
async fn test_duplicate_reading_and_update() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let lesson = seed_lesson(&storage, course.id, "Intro").await;
    let other_lesson = seed_lesson(&storage, course.id, "Models").await;

    let original = storage.create_reading(reading(lesson.id, 1, true)).await.unwrap();
    let copy = storage
        .create_reading(original.duplicate())
        .await
        .expect("Duplicate should persist as a new reading");
    assert_ne!(copy.id, original.id);
    assert_eq!(copy.url, original.url);
    assert_eq!(copy.lesson_id, original.lesson_id);

    let err = storage
        .update_reading(
            copy.id,
            UpdateReadingRequest {
                url: Some("ftp://example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let moved = storage.assign_reading_to_lesson(copy.id, other_lesson.id).await.unwrap();
    assert_eq!(moved.lesson_id, other_lesson.id);
    assert!(storage.delete_reading(copy.id).await.unwrap());
    assert!(!storage.delete_reading(copy.id).await.unwrap());
}

#[tokio::test]
async fn test_lesson_delete_cascades_readings() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let lesson = seed_lesson(&storage, course.id, "Intro").await;
    let kept = seed_lesson(&storage, course.id, "Models").await;

    let gone = storage.create_reading(reading(lesson.id, 1, false)).await.unwrap();
    let stays = storage.create_reading(reading(kept.id, 1, false)).await.unwrap();

    assert!(storage.delete_lesson(lesson.id).await.unwrap());
    assert!(storage.get_reading_by_id(gone.id).await.unwrap().is_none());
    assert!(storage.get_reading_by_id(stays.id).await.unwrap().is_some());
    assert_eq!(
        storage.list_course_lessons(course.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_lesson_assignment_references_must_exist() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;

    let err = storage
        .create_lesson(CreateLessonRequest {
            course_id: Some(course.id),
            name: Some("Intro".to_string()),
            pre_class_assignment_id: Some(77),
            in_class_assignment_id: Some(78),
            ..Default::default()
        })
        .await
        .unwrap_err();
    let errors = err.validation_errors().expect("Expected validation errors");
    assert!(errors.has("pre_class_assignment_id", ValidationRule::MissingTarget));
    assert!(errors.has("in_class_assignment_id", ValidationRule::MissingTarget));
}

#[tokio::test]
async fn test_lesson_update_can_unlink_assignment() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let assignment = storage
        .create_assignment(CreateAssignmentRequest {
            course_id: Some(course.id),
            name: Some("Battleship".to_string()),
            percent_of_grade: Some(10.0),
            ..Default::default()
        })
        .await
        .unwrap();

    let lesson = storage
        .create_lesson(CreateLessonRequest {
            course_id: Some(course.id),
            name: Some("Intro".to_string()),
            outline: Some("1. Boards".to_string()),
            pre_class_assignment_id: Some(assignment.id),
            in_class_assignment_id: Some(assignment.id),
            ..Default::default()
        })
        .await
        .unwrap();

    let untouched = storage
        .update_lesson(lesson.id, UpdateLessonRequest::default())
        .await
        .unwrap()
        .expect("Lesson should exist");
    assert_eq!(untouched.pre_class_assignment_id, Some(assignment.id));

    let unlinked = storage
        .update_lesson(
            lesson.id,
            UpdateLessonRequest {
                pre_class_assignment_id: Some(None),
                outline: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("Lesson should exist");
    assert_eq!(unlinked.pre_class_assignment_id, None);
    assert_eq!(unlinked.in_class_assignment_id, Some(assignment.id));
    assert_eq!(unlinked.outline, None);

    // 仍被课内引用
    assert_eq!(storage.list_assignment_lessons(assignment.id).await.unwrap().len(), 1);

    storage
        .update_lesson(
            lesson.id,
            UpdateLessonRequest {
                in_class_assignment_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(storage.list_assignment_lessons(assignment.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reading_caption_can_be_cleared() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let lesson = seed_lesson(&storage, course.id, "Intro").await;

    let reading = storage
        .create_reading(CreateReadingRequest {
            caption: Some("Rails Guides".to_string()),
            ..reading(lesson.id, 1, false)
        })
        .await
        .unwrap();
    assert_eq!(reading.caption.as_deref(), Some("Rails Guides"));

    let cleared = storage
        .update_reading(
            reading.id,
            UpdateReadingRequest {
                caption: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("Reading should exist");
    assert_eq!(cleared.caption, None);
    assert_eq!(cleared.url, reading.url);
}

#[tokio::test]
async fn test_assignment_name_unique_within_course() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;
    let other = seed_course(&storage, None, "JSS600").await;

    let battleship = |course_id: Option<i64>| CreateAssignmentRequest {
        course_id,
        name: Some("Battleship".to_string()),
        percent_of_grade: Some(10.0),
        ..Default::default()
    };

    storage.create_assignment(battleship(Some(course.id))).await.unwrap();
    let err = storage.create_assignment(battleship(Some(course.id))).await.unwrap_err();
    assert!(err.validation_errors().is_some_and(|e| e.has("name", ValidationRule::Taken)));

    let elsewhere = storage.create_assignment(battleship(Some(other.id))).await.unwrap();
    storage.create_assignment(battleship(None)).await.unwrap();
    let floating = storage.create_assignment(battleship(None)).await.unwrap();

    let err = storage
        .assign_assignment_to_course(floating.id, course.id)
        .await
        .unwrap_err();
    assert!(err.validation_errors().is_some_and(|e| e.has("name", ValidationRule::Taken)));

    let renamed = storage
        .update_assignment(
            elsewhere.id,
            UpdateAssignmentRequest {
                percent_of_grade: Some(15.0),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("Assignment should exist");
    assert_eq!(renamed.percent_of_grade, 15.0);
}

#[tokio::test]
async fn test_assignment_due_at_checked_on_update() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;

    let assignment = storage
        .create_assignment(CreateAssignmentRequest {
            course_id: Some(course.id),
            name: Some("Currency Converter".to_string()),
            percent_of_grade: Some(5.0),
            due_at: Utc.with_ymd_and_hms(2016, 9, 15, 0, 0, 0).single(),
            active_at: Utc.with_ymd_and_hms(2016, 9, 1, 0, 0, 0).single(),
        })
        .await
        .unwrap();

    let err = storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                active_at: Utc.with_ymd_and_hms(2016, 9, 20, 0, 0, 0).single(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.validation_errors().is_some_and(|e| e.has("due_at", ValidationRule::BeforeActiveAt)));

    let unchanged = storage.get_assignment_by_id(assignment.id).await.unwrap().unwrap();
    assert_eq!(unchanged.active_at, assignment.active_at);
}

#[tokio::test]
async fn test_assignment_delete_cascades_grades_and_clears_lessons() {
    let storage = setup_storage().await;
    let course = seed_course(&storage, None, "ROR600").await;

    let assignment = storage
        .create_assignment(CreateAssignmentRequest {
            course_id: Some(course.id),
            name: Some("Blackjack".to_string()),
            percent_of_grade: Some(20.0),
            ..Default::default()
        })
        .await
        .unwrap();

    let lesson = seed_lesson(&storage, course.id, "Intro").await;
    storage
        .update_lesson(
            lesson.id,
            UpdateLessonRequest {
                pre_class_assignment_id: Some(Some(assignment.id)),
                in_class_assignment_id: Some(Some(assignment.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        storage.list_assignment_lessons(assignment.id).await.unwrap().len(),
        1
    );

    let grade = storage
        .create_assignment_grade(CreateAssignmentGradeRequest {
            assignment_id: Some(assignment.id),
            final_grade: Some(88.0),
            ..Default::default()
        })
        .await
        .unwrap();
    let updated = storage
        .update_assignment_grade(
            grade.id,
            UpdateAssignmentGradeRequest {
                final_grade: Some(91.0),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.final_grade, Some(91.0));
    assert_eq!(storage.list_assignment_grades(assignment.id).await.unwrap().len(), 1);

    assert!(storage.delete_assignment(assignment.id).await.unwrap());
    assert!(!storage.assignment_exists(assignment.id).await.unwrap());
    assert!(storage.get_assignment_grade_by_id(grade.id).await.unwrap().is_none());

    let lesson = storage.get_lesson_by_id(lesson.id).await.unwrap().unwrap();
    assert_eq!(lesson.pre_class_assignment_id, None);
    assert_eq!(lesson.in_class_assignment_id, None);
}

#[tokio::test]
async fn test_grade_requires_existing_assignment() {
    let storage = setup_storage().await;

    let err = storage
        .create_assignment_grade(CreateAssignmentGradeRequest {
            assignment_id: Some(5),
            course_student_id: Some(6),
            final_grade: None,
        })
        .await
        .unwrap_err();
    let errors = err.validation_errors().expect("Expected validation errors");
    assert!(errors.has("assignment_id", ValidationRule::MissingTarget));
    assert!(errors.has("course_student_id", ValidationRule::MissingTarget));
}
