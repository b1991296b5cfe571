// tests/repo_tests.rs

mod common;

use chrono::{Datelike, Duration, Utc};
use common::{exam, memory_store, report, student, temp_data_dir};
use edubase::error::AppError;
use edubase::models::account::RegisterRequest;
use edubase::models::student::CreateStudentRequest;
use edubase::repo::accounts::AdminAccounts;
use edubase::repo::active::ActiveContext;
use edubase::repo::catalog::ExamCatalog;
use edubase::repo::reports::ReportRepository;
use edubase::repo::roster::StudentRoster;
use edubase::storage::{JsonFileStore, KvStore};
use std::sync::Arc;

#[test]
fn append_if_absent_is_first_writer_wins() {
    let reports = ReportRepository::new(memory_store());

    let first = report("Ada Obi", "SS1", "EDU-2025-1234", "Biology", 80);
    let second = report("Ada Obi", "SS1", "EDU-2025-1234", "Biology", 20);

    assert!(reports.append_if_absent(first).unwrap());
    assert!(!reports.append_if_absent(second).unwrap());

    let all = reports.all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].score, 80);
}

#[test]
fn the_uniqueness_key_ignores_case() {
    let reports = ReportRepository::new(memory_store());
    reports
        .append_if_absent(report("Ada Obi", "SS1", "EDU-2025-1234", "Biology", 80))
        .unwrap();

    let duplicate = report("Ada Obi", "ss1", "edu-2025-1234", "BIOLOGY", 50);
    assert!(!reports.append_if_absent(duplicate).unwrap());

    assert!(reports
        .find_by_key("edu-2025-1234", "biology", "ss1")
        .unwrap()
        .is_some());

    // a different subject is a different key
    assert!(reports
        .append_if_absent(report("Ada Obi", "SS1", "EDU-2025-1234", "Physics", 60))
        .unwrap());
}

#[test]
fn grouping_collapses_duplicates_and_sorts_by_name() {
    let store = memory_store();
    let reports = ReportRepository::new(store.clone());

    // Two records for Ada's key, as two concurrent devices could produce.
    // The repository can't be used to create them, so write the collection
    // behind its back.
    let mut ada_old = report("Ada Obi", "SS1", "EDU-2025-1234", "Biology", 40);
    ada_old.date = Utc::now() - Duration::hours(2);
    let ada_new = report("Ada Obi", "SS1", "EDU-2025-1234", "Biology", 70);
    let zara = report("Zara Bello", "SS1", "EDU-2025-5678", "Biology", 90);
    let ben = report("Ben Musa", "SS1", "EDU-2025-9012", "Biology", 55);
    let physics = report("Ada Obi", "SS1", "EDU-2025-1234", "Physics", 65);
    let ss2 = report("Chi Eze", "SS2", "EDU-2025-3456", "Biology", 75);

    let raw = serde_json::to_string(&vec![
        ada_old,
        zara.clone(),
        ada_new.clone(),
        ben.clone(),
        physics,
        ss2,
    ])
    .unwrap();
    store.write("reports", &raw).unwrap();

    let grouped = reports.grouped().unwrap();
    assert_eq!(grouped.len(), 2);

    let ss1_biology = &grouped["SS1"]["Biology"];
    let names: Vec<&str> = ss1_biology.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ada Obi", "Ben Musa", "Zara Bello"]);

    // the newer of Ada's duplicate records won
    assert_eq!(ss1_biology[0].score, 70);

    assert_eq!(grouped["SS1"]["Physics"].len(), 1);
    assert_eq!(grouped["SS2"]["Biology"].len(), 1);
}

#[test]
fn report_deletion_by_key_subject_and_class() {
    let reports = ReportRepository::new(memory_store());
    reports
        .append_if_absent(report("Ada Obi", "SS1", "EDU-2025-1234", "Biology", 80))
        .unwrap();
    reports
        .append_if_absent(report("Ben Musa", "SS1", "EDU-2025-9012", "Biology", 55))
        .unwrap();
    reports
        .append_if_absent(report("Ada Obi", "SS1", "EDU-2025-1234", "Physics", 65))
        .unwrap();
    reports
        .append_if_absent(report("Chi Eze", "SS2", "EDU-2025-3456", "Biology", 75))
        .unwrap();

    reports.delete_by_key("edu-2025-1234", "BIOLOGY", "ss1").unwrap();
    assert_eq!(reports.all().unwrap().len(), 3);

    reports.delete_subject("SS1", "Biology").unwrap();
    assert_eq!(reports.all().unwrap().len(), 2);

    reports.delete_class("SS1").unwrap();
    let remaining = reports.all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].class_name, "SS2");
}

#[test]
fn roster_add_generates_registration_numbers() {
    let roster = StudentRoster::new(memory_store());

    let student = roster
        .add(CreateStudentRequest {
            name: "  Ada Obi  ".to_string(),
            class_name: " SS1 ".to_string(),
        })
        .unwrap();

    assert_eq!(student.name, "Ada Obi");
    assert_eq!(student.class_name, "SS1");

    let prefix = format!("EDU-{}-", Utc::now().year());
    assert!(student.reg_no.starts_with(&prefix));
    let digits: u32 = student.reg_no[prefix.len()..].parse().unwrap();
    assert!((1000..=9999).contains(&digits));

    let other = roster
        .add(CreateStudentRequest {
            name: "Ben Musa".to_string(),
            class_name: "SS1".to_string(),
        })
        .unwrap();
    assert_ne!(student.reg_no, other.reg_no);
}

#[test]
fn roster_rejects_blank_entries() {
    let roster = StudentRoster::new(memory_store());
    let result = roster.add(CreateStudentRequest {
        name: "".to_string(),
        class_name: "SS1".to_string(),
    });
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(roster.all().unwrap().is_empty());
}

#[test]
fn roster_login_ignores_case_and_whitespace() {
    let roster = StudentRoster::new(memory_store());
    let student = roster
        .add(CreateStudentRequest {
            name: "Ada Obi".to_string(),
            class_name: "SS1".to_string(),
        })
        .unwrap();

    let found = roster
        .login("  ada obi ", "ss1", &student.reg_no.to_lowercase())
        .unwrap();
    assert!(found.is_some());

    assert!(roster.login("Ada Obi", "SS2", &student.reg_no).unwrap().is_none());
    assert!(roster.login("Ada Obi", "SS1", "EDU-1999-0000").unwrap().is_none());
}

#[test]
fn roster_update_and_delete_by_reg_no() {
    let roster = StudentRoster::new(memory_store());
    let student = roster
        .add(CreateStudentRequest {
            name: "Ada Obi".to_string(),
            class_name: "SS1".to_string(),
        })
        .unwrap();

    let updated = roster
        .update(
            &student.reg_no,
            CreateStudentRequest {
                name: "Ada Obi-Eze".to_string(),
                class_name: "SS2".to_string(),
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Ada Obi-Eze");
    assert_eq!(updated.reg_no, student.reg_no);

    roster.delete(&student.reg_no).unwrap();
    assert!(roster.all().unwrap().is_empty());

    assert!(matches!(
        roster.delete(&student.reg_no),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn catalog_starts_with_the_default_subjects() {
    let catalog = ExamCatalog::new(memory_store());
    let subjects = catalog.subjects().unwrap();
    assert_eq!(subjects.len(), 9);
    assert!(subjects.iter().any(|s| s == "Mathematics"));

    catalog.add_subject("  Further Mathematics ").unwrap();
    let subjects = catalog.subjects().unwrap();
    assert_eq!(subjects.len(), 10);
    assert!(subjects.iter().any(|s| s == "Further Mathematics"));

    assert!(matches!(
        catalog.add_subject("   "),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn catalog_save_replaces_the_same_paper() {
    let catalog = ExamCatalog::new(memory_store());

    catalog.save_exam(exam("Biology", "SS1", 600, &["A"])).unwrap();
    catalog.save_exam(exam("biology", "ss1", 900, &["A", "B"])).unwrap();
    catalog.save_exam(exam("Biology", "SS2", 600, &["A"])).unwrap();

    let exams = catalog.exams().unwrap();
    assert_eq!(exams.len(), 2);

    let found = catalog.find("SS1", "BIOLOGY").unwrap().unwrap();
    assert_eq!(found.timer, 900);
    assert_eq!(found.questions.len(), 2);
}

#[test]
fn catalog_lists_subjects_per_class() {
    let catalog = ExamCatalog::new(memory_store());
    catalog.save_exam(exam("Biology", "SS1", 600, &["A"])).unwrap();
    catalog.save_exam(exam("Physics", "SS1", 600, &["A"])).unwrap();
    catalog.save_exam(exam("Chemistry", "SS2", 600, &["A"])).unwrap();

    let subjects = catalog.subjects_for_class("ss1").unwrap();
    assert_eq!(subjects.len(), 2);
    assert!(subjects.contains(&"Biology".to_string()));
    assert!(subjects.contains(&"Physics".to_string()));

    assert!(catalog.subjects_for_class("SS3").unwrap().is_empty());
}

#[test]
fn admin_accounts_register_and_verify() {
    let accounts = AdminAccounts::new(memory_store());

    let account = accounts
        .register(RegisterRequest {
            full_name: "Grace Ade".to_string(),
            email: "grace@school.edu".to_string(),
            password: "s3cretpw".to_string(),
        })
        .unwrap();
    assert_ne!(account.password_hash, "s3cretpw");

    assert!(accounts
        .verify_login("GRACE@school.edu", "s3cretpw")
        .unwrap()
        .is_some());
    assert!(accounts
        .verify_login("grace@school.edu", "wrong")
        .unwrap()
        .is_none());
    assert!(accounts
        .verify_login("nobody@school.edu", "s3cretpw")
        .unwrap()
        .is_none());
}

#[test]
fn admin_accounts_reject_duplicates_and_bad_input() {
    let accounts = AdminAccounts::new(memory_store());
    accounts
        .register(RegisterRequest {
            full_name: "Grace Ade".to_string(),
            email: "grace@school.edu".to_string(),
            password: "s3cretpw".to_string(),
        })
        .unwrap();

    let duplicate = accounts.register(RegisterRequest {
        full_name: "Grace Ade".to_string(),
        email: "Grace@School.edu".to_string(),
        password: "another".to_string(),
    });
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let bad_email = accounts.register(RegisterRequest {
        full_name: "No Email".to_string(),
        email: "not-an-email".to_string(),
        password: "s3cretpw".to_string(),
    });
    assert!(matches!(bad_email, Err(AppError::BadRequest(_))));
}

#[test]
fn active_context_round_trips_and_clears() {
    let active = ActiveContext::new(memory_store());
    assert!(active.student().unwrap().is_none());
    assert!(active.exam().unwrap().is_none());

    let candidate = student("Ada Obi", "SS1", "EDU-2025-1234");
    active.set_student(&candidate).unwrap();
    active.set_exam(&exam("Biology", "SS1", 600, &["A"])).unwrap();

    assert_eq!(active.student().unwrap().unwrap().reg_no, "EDU-2025-1234");
    assert_eq!(active.exam().unwrap().unwrap().subject, "Biology");

    active.clear_exam().unwrap();
    assert!(active.exam().unwrap().is_none());
    active.clear_student().unwrap();
    assert!(active.student().unwrap().is_none());
}

#[test]
fn file_store_reads_writes_and_survives_reopen() {
    let dir = temp_data_dir();

    {
        let store = JsonFileStore::open(&dir).unwrap();
        assert!(store.read("reports").unwrap().is_none());
        store.write("reports", "[]").unwrap();
        assert_eq!(store.read("reports").unwrap().unwrap(), "[]");
    }

    let store = JsonFileStore::open(&dir).unwrap();
    assert_eq!(store.read("reports").unwrap().unwrap(), "[]");

    store.remove("reports").unwrap();
    assert!(store.read("reports").unwrap().is_none());
    // removing a missing key is fine
    store.remove("reports").unwrap();

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn repositories_share_one_store() {
    let dir = temp_data_dir();
    let store: Arc<dyn KvStore> = Arc::new(JsonFileStore::open(&dir).unwrap());

    let roster = StudentRoster::new(store.clone());
    let catalog = ExamCatalog::new(store.clone());
    let reports = ReportRepository::new(store);

    let student = roster
        .add(CreateStudentRequest {
            name: "Ada Obi".to_string(),
            class_name: "SS1".to_string(),
        })
        .unwrap();
    catalog.save_exam(exam("Biology", "SS1", 600, &["A"])).unwrap();
    reports
        .append_if_absent(report("Ada Obi", "SS1", &student.reg_no, "Biology", 80))
        .unwrap();

    assert_eq!(roster.all().unwrap().len(), 1);
    assert_eq!(catalog.exams().unwrap().len(), 1);
    assert_eq!(reports.all().unwrap().len(), 1);

    std::fs::remove_dir_all(&dir).ok();
}
