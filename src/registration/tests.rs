use crate::db::{FakeDatabase, UniqueField};
use crate::registration::error::RegistrationError;
use crate::registration::service::{RegistrationForm, RegistrationService};
use crate::test_utils::sample_form;
use std::sync::Arc;

const SCREENSHOT: &str = "uploads/1-receipt.png";

fn screenshot() -> Option<String> {
    Some(SCREENSHOT.to_string())
}

fn service() -> RegistrationService<FakeDatabase> {
    RegistrationService::new(FakeDatabase::new())
}

#[tokio::test]
async fn valid_submission_persists_and_increments_count() {
    let service = service();
    assert_eq!(service.count().await.unwrap(), 0);

    let created = service
        .submit(sample_form("a"), screenshot())
        .await
        .unwrap();

    assert_eq!(created.email, "a@example.com");
    assert_eq!(created.payment_screenshot, SCREENSHOT);
    assert_eq!(service.count().await.unwrap(), 1);
}

#[tokio::test]
async fn missing_attachment_wins_regardless_of_field_validity() {
    let service = service();

    // Fully valid form, no file
    let err = service.submit(sample_form("a"), None).await.unwrap_err();
    assert!(matches!(err, RegistrationError::MissingFile));

    // Entirely empty form, no file: still the attachment error
    let err = service
        .submit(RegistrationForm::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistrationError::MissingFile));

    // An empty stored path counts as missing
    let err = service
        .submit(sample_form("a"), Some(String::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistrationError::MissingFile));

    assert_eq!(service.count().await.unwrap(), 0);
}

#[tokio::test]
async fn blank_fields_fail_validation_with_the_field_name() {
    let service = service();

    let mut form = sample_form("a");
    form.name = "  ".to_string();
    let err = service.submit(form, screenshot()).await.unwrap_err();
    assert!(matches!(err, RegistrationError::MissingField("name")));

    let mut form = sample_form("a");
    form.email = String::new();
    let err = service.submit(form, screenshot()).await.unwrap_err();
    assert!(matches!(err, RegistrationError::MissingField("email")));

    assert_eq!(service.count().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_email_is_reported_per_field() {
    let service = service();
    service
        .submit(sample_form("a"), screenshot())
        .await
        .unwrap();

    let mut form = sample_form("b");
    form.email = "a@example.com".to_string();
    let err = service.submit(form, screenshot()).await.unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::DuplicateField(UniqueField::Email)
    ));
    assert_eq!(service.count().await.unwrap(), 1);
}

#[tokio::test]
async fn conflict_priority_is_email_phone_reg_no_roll_no() {
    let service = service();
    service
        .submit(sample_form("a"), screenshot())
        .await
        .unwrap();

    // All four collide: email is reported
    let mut form = sample_form("b");
    form.email = "a@example.com".to_string();
    form.phone = "phone-a".to_string();
    form.reg_no = "reg-a".to_string();
    form.roll_no = "roll-a".to_string();
    let err = service.submit(form, screenshot()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::DuplicateField(UniqueField::Email)
    ));

    // Phone, reg_no and roll_no collide: phone is reported
    let mut form = sample_form("c");
    form.phone = "phone-a".to_string();
    form.reg_no = "reg-a".to_string();
    form.roll_no = "roll-a".to_string();
    let err = service.submit(form, screenshot()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::DuplicateField(UniqueField::Phone)
    ));

    // reg_no and roll_no collide: reg_no is reported
    let mut form = sample_form("d");
    form.reg_no = "reg-a".to_string();
    form.roll_no = "roll-a".to_string();
    let err = service.submit(form, screenshot()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::DuplicateField(UniqueField::RegNo)
    ));

    // Only roll_no collides
    let mut form = sample_form("e");
    form.roll_no = "roll-a".to_string();
    let err = service.submit(form, screenshot()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::DuplicateField(UniqueField::RollNo)
    ));

    assert_eq!(service.count().await.unwrap(), 1);
}

#[tokio::test]
async fn count_matches_number_of_successful_submissions() {
    let service = service();
    assert_eq!(service.count().await.unwrap(), 0);

    for i in 1..=5 {
        service
            .submit(sample_form(&format!("tag{}", i)), screenshot())
            .await
            .unwrap();
        assert_eq!(service.count().await.unwrap(), i);
    }
}

#[tokio::test]
async fn race_loser_maps_to_duplicate_registration() {
    let database = FakeDatabase::new();
    let service = RegistrationService::new(database.clone());
    service
        .submit(sample_form("a"), screenshot())
        .await
        .unwrap();

    // Blind the pre-insert lookup, simulating a submission that raced past
    // the check while the first insert was still in flight
    database.fake_hide_conflicts();

    let mut form = sample_form("b");
    form.email = "a@example.com".to_string();
    let err = service.submit(form, screenshot()).await.unwrap_err();

    assert!(matches!(err, RegistrationError::DuplicateRegistration));
    assert_eq!(service.count().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_identical_submissions_persist_exactly_one() {
    let database = FakeDatabase::new();
    // Both submissions pass the lookup; the insert decides the winner
    database.fake_hide_conflicts();
    let service = Arc::new(RegistrationService::new(database));

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.submit(sample_form("a"), screenshot()).await })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move { service.submit(sample_form("a"), screenshot()).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(err, RegistrationError::DuplicateRegistration));
        }
    }
    assert_eq!(service.count().await.unwrap(), 1);
}

#[tokio::test]
async fn storage_failures_surface_as_internal_errors() {
    let database = FakeDatabase::new();
    database.fake_fail_inserts();
    let service = RegistrationService::new(database);

    let err = service
        .submit(sample_form("a"), screenshot())
        .await
        .unwrap_err();
    assert!(matches!(err, RegistrationError::Internal(_)));
}

#[tokio::test]
async fn repeat_email_after_success_keeps_count_at_one() {
    let service = service();

    let mut form = sample_form("x");
    form.name = "A".to_string();
    form.roll_no = "R1".to_string();
    form.reg_no = "G1".to_string();
    form.year = "2".to_string();
    form.phone = "111".to_string();
    form.email = "a@x.com".to_string();
    service.submit(form, screenshot()).await.unwrap();
    assert_eq!(service.count().await.unwrap(), 1);

    let mut retry = sample_form("y");
    retry.email = "a@x.com".to_string();
    let err = service.submit(retry, screenshot()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::DuplicateField(UniqueField::Email)
    ));
    assert_eq!(service.count().await.unwrap(), 1);
}
