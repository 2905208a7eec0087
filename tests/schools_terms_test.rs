mod common;

use chrono::NaiveDate;
use common::{seed_course, seed_school, seed_term, setup_storage};
use rust_school_records::models::{
    ValidationRule,
    schools::requests::{CreateSchoolRequest, UpdateSchoolRequest},
    terms::requests::{CreateTermRequest, UpdateTermRequest},
};

#[tokio::test]
async fn test_schools_are_listed_by_name() {
    let storage = setup_storage().await;

    seed_school(&storage, "The Iron Yard").await;
    seed_school(&storage, "Durham Campus").await;
    seed_school(&storage, "Atlanta Campus").await;

    let names: Vec<String> = storage
        .list_schools()
        .await
        .expect("Failed to list schools")
        .into_iter()
        .map(|s| s.name)
        .collect();

    assert_eq!(names, vec!["Atlanta Campus", "Durham Campus", "The Iron Yard"]);
}

#[tokio::test]
async fn test_school_name_is_required() {
    let storage = setup_storage().await;

    let err = storage
        .create_school(CreateSchoolRequest {
            name: Some("  ".to_string()),
        })
        .await
        .expect_err("Blank school name must be rejected");

    assert!(err.validation_errors().is_some_and(|e| e.has("name", ValidationRule::Blank)));
    assert!(storage.list_schools().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_school_keeps_id_and_rejects_blank() {
    let storage = setup_storage().await;
    let school = seed_school(&storage, "Durham").await;

    let updated = storage
        .update_school(
            school.id,
            UpdateSchoolRequest {
                name: Some("Durham Campus".to_string()),
            },
        )
        .await
        .expect("Failed to update school")
        .expect("School should exist");
    assert_eq!(updated.id, school.id);
    assert_eq!(updated.name, "Durham Campus");

    let err = storage
        .update_school(
            school.id,
            UpdateSchoolRequest {
                name: Some(String::new()),
            },
        )
        .await
        .expect_err("Blank name must be rejected");
    assert!(err.is_validation());

    let missing = storage
        .update_school(9999, UpdateSchoolRequest::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_term_requires_existing_school() {
    let storage = setup_storage().await;

    let err = storage
        .create_term(CreateTermRequest {
            school_id: Some(42),
            name: Some("Fall 2016 Cohort".to_string()),
            starts_on: NaiveDate::from_ymd_opt(2016, 8, 29),
            ends_on: NaiveDate::from_ymd_opt(2016, 11, 18),
        })
        .await
        .expect_err("Term with unknown school must be rejected");

    let errors = err.validation_errors().expect("Expected validation errors");
    assert!(errors.has("school_id", ValidationRule::MissingTarget));
}

#[tokio::test]
async fn test_update_term_dates() {
    let storage = setup_storage().await;
    let school = seed_school(&storage, "The Iron Yard").await;
    let term = seed_term(&storage, school.id, "Spring 2016 Cohort").await;

    let ends_on = NaiveDate::from_ymd_opt(2016, 6, 3);
    let updated = storage
        .update_term(
            term.id,
            UpdateTermRequest {
                ends_on,
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("Term should exist");

    assert_eq!(Some(updated.ends_on), ends_on);
    assert_eq!(updated.starts_on, term.starts_on);
    assert_eq!(updated.name, "Spring 2016 Cohort");
}

#[tokio::test]
async fn test_term_delete_restricted_while_it_owns_courses() {
    let storage = setup_storage().await;
    let school = seed_school(&storage, "The Iron Yard").await;
    let term = seed_term(&storage, school.id, "Spring 2016 Cohort").await;
    let course = seed_course(&storage, Some(term.id), "ROR600").await;

    let err = storage
        .delete_term(term.id)
        .await
        .expect_err("Term with courses must not be deleted");
    assert!(err.is_delete_restricted());
    assert!(storage.get_term_by_id(term.id).await.unwrap().is_some());

    assert!(storage.delete_course(course.id).await.unwrap());
    assert!(storage.delete_term(term.id).await.unwrap());
    assert!(storage.get_term_by_id(term.id).await.unwrap().is_none());
    assert!(!storage.delete_term(term.id).await.unwrap());
}

#[tokio::test]
async fn test_school_delete_restricted_while_it_owns_terms() {
    let storage = setup_storage().await;
    let school = seed_school(&storage, "The Iron Yard").await;
    let term = seed_term(&storage, school.id, "Fall 2016 Cohort").await;

    let err = storage.delete_school(school.id).await.unwrap_err();
    assert!(err.is_delete_restricted());

    assert!(storage.delete_term(term.id).await.unwrap());
    assert!(storage.delete_school(school.id).await.unwrap());
}

#[tokio::test]
async fn test_school_courses_through_terms() {
    let storage = setup_storage().await;
    let durham = seed_school(&storage, "Durham").await;
    let atlanta = seed_school(&storage, "Atlanta").await;

    let spring = seed_term(&storage, durham.id, "Spring").await;
    let fall = seed_term(&storage, durham.id, "Fall").await;
    let other = seed_term(&storage, atlanta.id, "Spring").await;

    let ror = seed_course(&storage, Some(spring.id), "ROR600").await;
    let jss = seed_course(&storage, Some(fall.id), "JSS600").await;
    seed_course(&storage, Some(other.id), "PYT600").await;

    let terms = storage.list_school_terms(durham.id).await.unwrap();
    assert_eq!(
        terms.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![spring.id, fall.id]
    );

    let courses = storage.list_school_courses(durham.id).await.unwrap();
    assert_eq!(
        courses.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![ror.id, jss.id]
    );
}

#[tokio::test]
async fn test_assign_term_to_school() {
    let storage = setup_storage().await;
    let durham = seed_school(&storage, "Durham").await;
    let atlanta = seed_school(&storage, "Atlanta").await;
    let term = seed_term(&storage, durham.id, "Spring").await;

    let moved = storage
        .assign_term_to_school(term.id, atlanta.id)
        .await
        .expect("Failed to move term");
    assert_eq!(moved.school_id, atlanta.id);
    assert!(storage.list_school_terms(durham.id).await.unwrap().is_empty());

    let err = storage.assign_term_to_school(term.id, 9999).await.unwrap_err();
    assert!(err.validation_errors().is_some_and(|e| e.has("school_id", ValidationRule::MissingTarget)));
    assert_eq!(
        storage.get_term_by_id(term.id).await.unwrap().map(|t| t.school_id),
        Some(atlanta.id)
    );
}
