//! Integration tests for `SqliteStore` against an in-memory database.

use quad_core::{
  Error,
  account::{NewAccount, ProfileUpdate},
  appointment::{AppointmentStatus, NewAppointment, Resolution, VisitReason},
  audit::{AUDIT_LOG_CAP, NewAuditEntry, Severity},
  grading::{Course, Grade, NewGpaRecord},
  reference::{DEFAULT_LECTURERS, DEFAULT_VENDORS, NewLecturer, NewVendor},
  review::{NewReview, TargetKind},
  store::{PortalStore, StudentFilter},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_account(name: &str, matric: &str) -> NewAccount {
  NewAccount {
    full_name:       name.to_string(),
    matric:          matric.to_string(),
    email:           format!("{matric}@quad.edu").to_lowercase(),
    credential_hash: "$argon2id$test-hash".to_string(),
    phone:           None,
    avatar_url:      None,
    department:      Some("Computer Science".to_string()),
    faculty:         None,
  }
}

fn new_appointment(student_id: Uuid) -> NewAppointment {
  NewAppointment {
    student_id,
    student_name: "Jane Doe".to_string(),
    student_matric: "COSC/001".to_string(),
    reason: VisitReason::GeneralCheckup,
    date: "2025-03-14".to_string(),
    time: "10:30".to_string(),
    note: String::new(),
  }
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_account() {
  let s = store().await;

  let account = s.add_account(new_account("Jane Doe", "COSC/001")).await.unwrap();
  assert_eq!(account.matric.as_deref(), Some("COSC/001"));

  let fetched = s.get_account(account.account_id).await.unwrap().unwrap();
  assert_eq!(fetched.account_id, account.account_id);
  assert_eq!(fetched.full_name, "Jane Doe");
}

#[tokio::test]
async fn duplicate_matric_is_rejected_and_nothing_inserted() {
  let s = store().await;
  s.add_account(new_account("Jane Doe", "COSC/001")).await.unwrap();

  let err = s
    .add_account(new_account("John Roe", "COSC/001"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateMatric(m) if m == "COSC/001"));

  let students = s.list_students(&StudentFilter::default()).await.unwrap();
  assert_eq!(students.len(), 1);
  assert_eq!(students[0].full_name, "Jane Doe");
}

#[tokio::test]
async fn find_student_by_matric_includes_credential() {
  let s = store().await;
  s.add_account(new_account("Jane Doe", "COSC/001")).await.unwrap();

  let record = s.find_student_by_matric("COSC/001").await.unwrap().unwrap();
  assert_eq!(record.account.full_name, "Jane Doe");
  assert_eq!(record.credential_hash, "$argon2id$test-hash");

  assert!(s.find_student_by_matric("COSC/999").await.unwrap().is_none());
}

#[tokio::test]
async fn list_students_filters_over_name_matric_and_email() {
  let s = store().await;
  s.add_account(new_account("Jane Doe", "COSC/001")).await.unwrap();
  s.add_account(new_account("Ada Eze", "MATH/042")).await.unwrap();

  let by_name = StudentFilter { text: Some("jane".to_string()) };
  assert_eq!(s.list_students(&by_name).await.unwrap().len(), 1);

  let by_matric = StudentFilter { text: Some("MATH".to_string()) };
  let hits = s.list_students(&by_matric).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].full_name, "Ada Eze");

  let miss = StudentFilter { text: Some("physics".to_string()) };
  assert!(s.list_students(&miss).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_profile_changes_only_supplied_fields() {
  let s = store().await;
  let account = s.add_account(new_account("Jane Doe", "COSC/001")).await.unwrap();

  let updated = s
    .update_profile(account.account_id, ProfileUpdate {
      phone: Some("0803-000-0000".to_string()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.phone.as_deref(), Some("0803-000-0000"));
  assert_eq!(updated.full_name, "Jane Doe");
  assert_eq!(updated.matric.as_deref(), Some("COSC/001"));
}

#[tokio::test]
async fn update_profile_unknown_account_returns_none() {
  let s = store().await;
  let result = s
    .update_profile(Uuid::new_v4(), ProfileUpdate::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn set_credential_hash_replaces_the_stored_hash() {
  let s = store().await;
  let account = s.add_account(new_account("Jane Doe", "COSC/001")).await.unwrap();

  assert!(
    s.set_credential_hash(account.account_id, "$argon2id$new".to_string())
      .await
      .unwrap()
  );
  let record = s.find_student_by_matric("COSC/001").await.unwrap().unwrap();
  assert_eq!(record.credential_hash, "$argon2id$new");

  assert!(
    !s.set_credential_hash(Uuid::new_v4(), "x".to_string()).await.unwrap()
  );
}

#[tokio::test]
async fn delete_account_keeps_owned_records() {
  let s = store().await;
  let account = s.add_account(new_account("Jane Doe", "COSC/001")).await.unwrap();
  s.add_appointment(new_appointment(account.account_id)).await.unwrap();

  assert!(s.delete_account(account.account_id).await.unwrap());
  assert!(s.get_account(account.account_id).await.unwrap().is_none());

  // The appointment survives through its denormalised fields.
  let orphaned = s.appointments_for(account.account_id).await.unwrap();
  assert_eq!(orphaned.len(), 1);
  assert_eq!(orphaned[0].student_name, "Jane Doe");
}

// ─── Appointments ────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_appointments_start_pending_and_list_newest_first() {
  let s = store().await;
  let student_id = Uuid::new_v4();

  let first = s.add_appointment(new_appointment(student_id)).await.unwrap();
  assert_eq!(first.status, AppointmentStatus::Pending);

  let mut input = new_appointment(student_id);
  input.reason = VisitReason::FollowUp;
  let second = s.add_appointment(input).await.unwrap();

  let listed = s.appointments_for(student_id).await.unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].appointment_id, second.appointment_id);
  assert_eq!(listed[1].appointment_id, first.appointment_id);
}

#[tokio::test]
async fn resolve_moves_pending_to_terminal() {
  let s = store().await;
  let appointment =
    s.add_appointment(new_appointment(Uuid::new_v4())).await.unwrap();

  let resolved = s
    .resolve_appointment(appointment.appointment_id, Resolution::Accepted)
    .await
    .unwrap();
  assert_eq!(resolved.status, AppointmentStatus::Accepted);
}

#[tokio::test]
async fn resolve_unknown_id_fails() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s.resolve_appointment(id, Resolution::Accepted).await.unwrap_err();
  assert!(matches!(err, Error::AppointmentNotFound(found) if found == id));
}

#[tokio::test]
async fn second_resolution_fails_and_keeps_the_first() {
  let s = store().await;
  let appointment =
    s.add_appointment(new_appointment(Uuid::new_v4())).await.unwrap();
  let id = appointment.appointment_id;

  s.resolve_appointment(id, Resolution::Accepted).await.unwrap();
  let err = s.resolve_appointment(id, Resolution::Declined).await.unwrap_err();
  assert!(matches!(
    err,
    Error::AlreadyResolved { status: AppointmentStatus::Accepted, .. }
  ));

  let stored = &s.list_appointments(None).await.unwrap()[0];
  assert_eq!(stored.status, AppointmentStatus::Accepted);
}

#[tokio::test]
async fn list_appointments_filters_by_status() {
  let s = store().await;
  let a = s.add_appointment(new_appointment(Uuid::new_v4())).await.unwrap();
  s.add_appointment(new_appointment(Uuid::new_v4())).await.unwrap();
  s.resolve_appointment(a.appointment_id, Resolution::Declined)
    .await
    .unwrap();

  let pending = s
    .list_appointments(Some(AppointmentStatus::Pending))
    .await
    .unwrap();
  assert_eq!(pending.len(), 1);

  let declined = s
    .list_appointments(Some(AppointmentStatus::Declined))
    .await
    .unwrap();
  assert_eq!(declined.len(), 1);
  assert_eq!(declined[0].appointment_id, a.appointment_id);

  assert_eq!(s.list_appointments(None).await.unwrap().len(), 2);
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

fn new_review(kind: TargetKind, rating: u8) -> NewReview {
  NewReview {
    student_id: Uuid::new_v4(),
    student_name: "Jane Doe".to_string(),
    target_kind: kind,
    target_id: Uuid::new_v4(),
    target_name: "Dr. N. Okafor".to_string(),
    rating,
    comment: "Clear lectures.".to_string(),
  }
}

#[tokio::test]
async fn reviews_list_newest_first_with_kind_filter_and_limit() {
  let s = store().await;
  s.add_review(new_review(TargetKind::Lecturer, 5)).await.unwrap();
  s.add_review(new_review(TargetKind::Vendor, 3)).await.unwrap();
  let newest = s.add_review(new_review(TargetKind::Lecturer, 4)).await.unwrap();

  let all = s.recent_reviews(None, None).await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all[0].review_id, newest.review_id);

  let lecturers = s
    .recent_reviews(Some(TargetKind::Lecturer), None)
    .await
    .unwrap();
  assert_eq!(lecturers.len(), 2);

  let capped = s.recent_reviews(None, Some(1)).await.unwrap();
  assert_eq!(capped.len(), 1);
  assert_eq!(capped[0].review_id, newest.review_id);
}

#[tokio::test]
async fn delete_review_reports_whether_it_existed() {
  let s = store().await;
  let review = s.add_review(new_review(TargetKind::Vendor, 2)).await.unwrap();

  assert!(s.delete_review(review.review_id).await.unwrap());
  assert!(!s.delete_review(review.review_id).await.unwrap());
  assert!(s.recent_reviews(None, None).await.unwrap().is_empty());
}

// ─── GPA history ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn gpa_history_is_append_only_and_newest_first() {
  let s = store().await;
  let student_id = Uuid::new_v4();
  let courses = vec![Course {
    code:  "CSC101".to_string(),
    units: 3,
    grade: Grade::A,
  }];

  let first = s
    .add_gpa_record(NewGpaRecord {
      student_id,
      semester: "1st Semester".to_string(),
      courses: courses.clone(),
      gpa: 5.0,
    })
    .await
    .unwrap();
  let second = s
    .add_gpa_record(NewGpaRecord {
      student_id,
      semester: "2nd Semester".to_string(),
      courses,
      gpa: 4.5,
    })
    .await
    .unwrap();

  let history = s.gpa_history(student_id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].record_id, second.record_id);
  assert_eq!(history[1].record_id, first.record_id);

  // A different student's record shows up only in the global listing.
  s.add_gpa_record(NewGpaRecord {
    student_id: Uuid::new_v4(),
    semester:   "1st Semester".to_string(),
    courses:    vec![],
    gpa:        0.0,
  })
  .await
  .unwrap();
  assert_eq!(s.gpa_history(student_id).await.unwrap().len(), 2);
  assert_eq!(s.list_gpa_records().await.unwrap().len(), 3);
}

#[tokio::test]
async fn zero_unit_course_rows_survive_the_round_trip() {
  let s = store().await;
  let courses = vec![
    Course { code: "CSC101".to_string(), units: 3, grade: Grade::A },
    Course { code: "GST000".to_string(), units: 0, grade: Grade::F },
  ];

  let record = s
    .add_gpa_record(NewGpaRecord {
      student_id: Uuid::new_v4(),
      semester:   "1st Semester".to_string(),
      courses:    courses.clone(),
      gpa:        5.0,
    })
    .await
    .unwrap();

  let stored = &s.gpa_history(record.student_id).await.unwrap()[0];
  assert_eq!(stored.courses, courses);
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn seeding_fills_empty_tables_exactly_once() {
  let s = store().await;
  s.seed_reference_data().await.unwrap();

  assert_eq!(s.list_lecturers().await.unwrap().len(), DEFAULT_LECTURERS.len());
  assert_eq!(s.list_vendors().await.unwrap().len(), DEFAULT_VENDORS.len());

  // A second call must not duplicate the defaults.
  s.seed_reference_data().await.unwrap();
  assert_eq!(s.list_lecturers().await.unwrap().len(), DEFAULT_LECTURERS.len());
}

#[tokio::test]
async fn seeding_skips_stores_with_existing_reference_data() {
  let s = store().await;
  s.add_lecturer(NewLecturer {
    name:       "Dr. T. Musa".to_string(),
    department: "Chemistry".to_string(),
  })
  .await
  .unwrap();

  s.seed_reference_data().await.unwrap();
  assert_eq!(s.list_lecturers().await.unwrap().len(), 1);
  assert!(s.list_vendors().await.unwrap().is_empty());
}

#[tokio::test]
async fn lecturers_and_vendors_allow_duplicates_and_report_removal() {
  let s = store().await;
  let input = NewVendor {
    name:     "Campus Bites".to_string(),
    location: "Student Union Building".to_string(),
  };
  s.add_vendor(input.clone()).await.unwrap();
  let duplicate = s.add_vendor(input).await.unwrap();
  assert_eq!(s.list_vendors().await.unwrap().len(), 2);

  assert!(s.remove_vendor(duplicate.vendor_id).await.unwrap());
  assert!(!s.remove_vendor(duplicate.vendor_id).await.unwrap());
  assert!(!s.remove_lecturer(Uuid::new_v4()).await.unwrap());
}

// ─── Audit log ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn audit_log_caps_at_one_hundred_entries_oldest_evicted() {
  let s = store().await;

  for i in 0..=AUDIT_LOG_CAP {
    s.append_audit(NewAuditEntry::new(
      Severity::Info,
      format!("entry {i}"),
      "system",
    ))
    .await
    .unwrap();
  }

  let log = s.audit_log().await.unwrap();
  assert_eq!(log.len(), AUDIT_LOG_CAP);
  // Entry 0 fell off; the newest entry leads the listing.
  assert_eq!(log[0].action, format!("entry {AUDIT_LOG_CAP}"));
  assert_eq!(log[log.len() - 1].action, "entry 1");
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_count_entities_and_round_the_completion_rate() {
  let s = store().await;
  let empty = s.stats().await.unwrap();
  assert_eq!(empty.completion_rate, 0);

  let account = s.add_account(new_account("Jane Doe", "COSC/001")).await.unwrap();
  let a = s.add_appointment(new_appointment(account.account_id)).await.unwrap();
  s.add_appointment(new_appointment(account.account_id)).await.unwrap();
  s.add_appointment(new_appointment(account.account_id)).await.unwrap();
  s.resolve_appointment(a.appointment_id, Resolution::Accepted)
    .await
    .unwrap();
  s.add_review(new_review(TargetKind::Lecturer, 5)).await.unwrap();

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.students, 1);
  assert_eq!(stats.appointments, 3);
  assert_eq!(stats.pending_appointments, 2);
  assert_eq!(stats.reviews, 1);
  // 1 of 3 resolved -> 33.33% -> 33.
  assert_eq!(stats.completion_rate, 33);
}
