use chrono::{Days, NaiveDate};
use tutr_reg::domain::AttendanceEntry;
use tutr_reg::error::RegError;
use tutr_reg::manager::{LandingView, RegistryManager};
use tutr_reg::models::{ClassForm, CourseForm, DegreeForm, EventForm, MajorForm, PersonForm, UserForm};

fn manager() -> RegistryManager {
    let mut manager = RegistryManager::open(":memory:").expect("in-memory sqlite should open");
    manager.run_migrations().expect("migrations should apply");
    manager
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Inserts a degree/major/course chain and returns the course id.
fn seed_course(manager: &mut RegistryManager, credits: i32) -> i32 {
    let degree = manager
        .insert_degree(&DegreeForm {
            degree_name: "Bachelor of Arts",
        })
        .unwrap();
    let major = manager
        .insert_major(&MajorForm {
            major_name: "Performing Arts",
            degree_id: degree.id,
        })
        .unwrap();
    let course = manager
        .insert_course(&CourseForm {
            course_name: "Period Dance",
            credits,
            major_id: major.id,
        })
        .unwrap();
    course.id
}

fn seed_event(manager: &mut RegistryManager) -> i32 {
    manager
        .create_event(&EventForm {
            event_name: "Spring Collegium",
            start_date: date(2026, 5, 1),
            end_date: date(2026, 5, 3),
        })
        .unwrap()
        .id
}

fn seed_person(manager: &mut RegistryManager, first: &str, last: &str) -> i32 {
    manager
        .create_person(&PersonForm {
            first_name: first,
            last_name: last,
            sca_name: None,
        })
        .unwrap()
        .id
}

#[test]
fn new_events_and_classes_start_pending() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);

    let event = manager
        .create_event(&EventForm {
            event_name: "Winter University",
            start_date: date(2026, 1, 10),
            end_date: date(2026, 1, 12),
        })
        .unwrap();
    assert!(!event.approved);
    assert!(!event.closed);

    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    assert!(!class.approved);
    assert!(!class.closed);
}

#[test]
fn editing_resets_approval() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let event_id = seed_event(&mut manager);

    manager.approve_event(event_id).unwrap();
    manager.close_event(event_id).unwrap();

    let edited = manager
        .update_event(
            event_id,
            &EventForm {
                event_name: "Spring Collegium (moved)",
                start_date: date(2026, 5, 8),
                end_date: date(2026, 5, 10),
            },
        )
        .unwrap();
    assert!(!edited.approved);
    assert!(!edited.closed);

    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    manager.approve_class(class.id).unwrap();

    let edited = manager
        .update_class(
            class.id,
            &ClassForm {
                class_name: "Advanced Heraldry",
                course_id,
            },
        )
        .unwrap();
    assert!(!edited.approved);
    assert!(!edited.closed);
}

#[test]
fn updating_a_missing_event_is_not_found() {
    let mut manager = manager();

    let err = manager
        .update_event(
            999,
            &EventForm {
                event_name: "Ghost Event",
                start_date: date(2026, 1, 1),
                end_date: date(2026, 1, 2),
            },
        )
        .unwrap_err();

    assert!(matches!(err, RegError::NotFound { entity: "event", .. }));
}

#[test]
fn governor_totals_count_only_attended_and_passed() {
    let mut manager = manager();

    let degree = manager
        .insert_degree(&DegreeForm {
            degree_name: "Bachelor of Arts",
        })
        .unwrap();
    let major = manager
        .insert_major(&MajorForm {
            major_name: "Performing Arts",
            degree_id: degree.id,
        })
        .unwrap();
    let dance = manager
        .insert_course(&CourseForm {
            course_name: "Period Dance",
            credits: 3,
            major_id: major.id,
        })
        .unwrap();
    let music = manager
        .insert_course(&CourseForm {
            course_name: "Period Music",
            credits: 4,
            major_id: major.id,
        })
        .unwrap();

    let dance_class = manager
        .create_class(&ClassForm {
            class_name: "Bransle Basics",
            course_id: dance.id,
        })
        .unwrap();
    let music_class = manager
        .create_class(&ClassForm {
            class_name: "Recorder Ensemble",
            course_id: music.id,
        })
        .unwrap();

    let event_id = seed_event(&mut manager);
    let dance_session = manager
        .add_session(event_id, dance_class.id, None, None)
        .unwrap();
    let music_session = manager
        .add_session(event_id, music_class.id, None, None)
        .unwrap();

    let person_id = seed_person(&mut manager, "Anna", "Smith");
    manager.register(dance_session.id, person_id).unwrap();
    manager.register(music_session.id, person_id).unwrap();

    // Passed the dance course, attended but failed the music course.
    manager
        .record_attendance(
            dance_session.id,
            &[AttendanceEntry {
                person_id: Some(person_id),
                attended: true,
                passed: true,
            }],
        )
        .unwrap();
    manager
        .record_attendance(
            music_session.id,
            &[AttendanceEntry {
                person_id: Some(person_id),
                attended: true,
                passed: false,
            }],
        )
        .unwrap();

    let totals = manager.credit_totals().unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].person_id, person_id);
    assert_eq!(totals[0].major_id, major.id);
    assert_eq!(totals[0].credits, 3);
}

#[test]
fn removing_a_session_removes_its_registrations() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    let event_id = seed_event(&mut manager);
    let session = manager.add_session(event_id, class.id, None, None).unwrap();

    let person_id = seed_person(&mut manager, "Anna", "Smith");
    manager.register(session.id, person_id).unwrap();
    assert_eq!(manager.session_roster(session.id).unwrap().len(), 1);

    manager.remove_session(session.id).unwrap();

    assert!(manager.session_roster(session.id).unwrap().is_empty());
    assert!(matches!(
        manager.session(session.id).unwrap_err(),
        RegError::NotFound { entity: "session", .. }
    ));
}

#[test]
fn duplicate_registration_is_a_conflict() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    let event_id = seed_event(&mut manager);
    let session = manager.add_session(event_id, class.id, None, None).unwrap();
    let person_id = seed_person(&mut manager, "Anna", "Smith");

    manager.register(session.id, person_id).unwrap();
    let err = manager.register(session.id, person_id).unwrap_err();

    assert!(matches!(err, RegError::AlreadyRegistered { .. }));
    assert_eq!(manager.session_roster(session.id).unwrap().len(), 1);
}

#[test]
fn duplicate_sessions_for_the_same_pair_are_permitted() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    let event_id = seed_event(&mut manager);

    let first = manager.add_session(event_id, class.id, None, None).unwrap();
    let second = manager.add_session(event_id, class.id, None, None).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(manager.sessions_of_event(event_id).unwrap().len(), 2);
}

#[test]
fn add_session_requires_existing_event_and_class() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    let event_id = seed_event(&mut manager);

    let err = manager.add_session(999, class.id, None, None).unwrap_err();
    assert!(matches!(err, RegError::NotFound { entity: "event", .. }));

    let err = manager.add_session(event_id, 999, None, None).unwrap_err();
    assert!(matches!(err, RegError::NotFound { entity: "class", .. }));
}

#[test]
fn removing_an_absent_registration_is_a_noop() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    let event_id = seed_event(&mut manager);
    let session = manager.add_session(event_id, class.id, None, None).unwrap();

    let removed = manager.remove_registration(session.id, 42).unwrap();
    assert_eq!(removed, 0);
}

#[test]
fn attendance_batch_commits_valid_rows_and_reports_rejects() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    let event_id = seed_event(&mut manager);
    let session = manager.add_session(event_id, class.id, None, None).unwrap();
    let person_id = seed_person(&mut manager, "Anna", "Smith");
    manager.register(session.id, person_id).unwrap();

    let outcome = manager
        .record_attendance(
            session.id,
            &[
                AttendanceEntry {
                    person_id: Some(person_id),
                    attended: true,
                    passed: true,
                },
                AttendanceEntry {
                    person_id: None,
                    attended: true,
                    passed: true,
                },
            ],
        )
        .unwrap();

    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].index, 1);

    let roster = manager.session_roster(session.id).unwrap();
    assert!(roster[0].attended);
    assert!(roster[0].passed);
}

#[test]
fn attendance_for_an_unregistered_person_is_rejected() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    let event_id = seed_event(&mut manager);
    let session = manager.add_session(event_id, class.id, None, None).unwrap();
    let stranger = seed_person(&mut manager, "Bob", "Jones");

    let outcome = manager
        .record_attendance(
            session.id,
            &[AttendanceEntry {
                person_id: Some(stranger),
                attended: true,
                passed: true,
            }],
        )
        .unwrap();

    assert_eq!(outcome.updated, 0);
    assert_eq!(outcome.rejected.len(), 1);
}

#[test]
fn event_stays_open_through_its_end_date() {
    let mut manager = manager();
    let event_id = seed_event(&mut manager);
    let end = date(2026, 5, 3);

    let page = manager.event_page_at(event_id, end).unwrap();
    assert!(page.open);

    let page = manager
        .event_page_at(event_id, end.checked_add_days(Days::new(1)).unwrap())
        .unwrap();
    assert!(!page.open);
}

#[test]
fn person_search_is_case_insensitive_substring() {
    let mut manager = manager();
    seed_person(&mut manager, "Anna", "Smith");
    seed_person(&mut manager, "Bob", "Jones");

    let found = manager.search_people(Some("an"), 1).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Anna");

    // SCA names are searched too.
    let person_id = seed_person(&mut manager, "Carol", "White");
    manager
        .update_person(
            person_id,
            &PersonForm {
                first_name: "Carol",
                last_name: "White",
                sca_name: Some("Branwen"),
            },
        )
        .unwrap();

    let found = manager.search_people(Some("bran"), 1).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Carol");
}

#[test]
fn landing_uses_role_precedence() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    seed_event(&mut manager);

    let user = manager
        .create_user(&UserForm {
            username: "mvaughn",
            person_id: None,
        })
        .unwrap();
    manager.assign_group(user.id, "Registrar").unwrap();
    manager.assign_group(user.id, "Dean").unwrap();

    // Dean wins over Registrar and sees the pending class queue.
    match manager.landing(user.id).unwrap() {
        LandingView::Dean { classes } => assert_eq!(classes.len(), 1),
        other => panic!("expected dean view, got {other:?}"),
    }
}

#[test]
fn registrar_lands_on_unapproved_events() {
    let mut manager = manager();
    let event_id = seed_event(&mut manager);

    let user = manager
        .create_user(&UserForm {
            username: "registrar",
            person_id: None,
        })
        .unwrap();
    manager.assign_group(user.id, "Registrar").unwrap();

    match manager.landing(user.id).unwrap() {
        LandingView::Registrar { events } => {
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].id, event_id);
        }
        other => panic!("expected registrar view, got {other:?}"),
    }

    // Approval clears the queue.
    manager.approve_event(event_id).unwrap();
    match manager.landing(user.id).unwrap() {
        LandingView::Registrar { events } => assert!(events.is_empty()),
        other => panic!("expected registrar view, got {other:?}"),
    }
}

#[test]
fn ungrouped_user_degrades_to_student_view() {
    let mut manager = manager();
    let course_id = seed_course(&mut manager, 3);
    let class = manager
        .create_class(&ClassForm {
            class_name: "Intro to Heraldry",
            course_id,
        })
        .unwrap();
    let event_id = seed_event(&mut manager);
    let session = manager.add_session(event_id, class.id, None, None).unwrap();
    let person_id = seed_person(&mut manager, "Anna", "Smith");
    manager.register(session.id, person_id).unwrap();
    manager
        .record_attendance(
            session.id,
            &[AttendanceEntry {
                person_id: Some(person_id),
                attended: true,
                passed: true,
            }],
        )
        .unwrap();

    let linked = manager
        .create_user(&UserForm {
            username: "asmith",
            person_id: Some(person_id),
        })
        .unwrap();
    match manager.landing(linked.id).unwrap() {
        LandingView::Student { attendance } => {
            assert_eq!(attendance.len(), 1);
            assert_eq!(attendance[0].person_id, person_id);
        }
        other => panic!("expected student view, got {other:?}"),
    }

    // A user with no linked person gets an empty view, not an error.
    let unlinked = manager
        .create_user(&UserForm {
            username: "ghost",
            person_id: None,
        })
        .unwrap();
    match manager.landing(unlinked.id).unwrap() {
        LandingView::Student { attendance } => assert!(attendance.is_empty()),
        other => panic!("expected student view, got {other:?}"),
    }
}

#[test]
fn sessions_page_splits_past_and_future() {
    let mut manager = manager();
    let today = date(2026, 8, 26);

    manager
        .create_event(&EventForm {
            event_name: "Last Year's Feast",
            start_date: date(2025, 8, 1),
            end_date: date(2025, 8, 2),
        })
        .unwrap();
    manager
        .create_event(&EventForm {
            event_name: "Next Month's Feast",
            start_date: date(2026, 9, 20),
            end_date: date(2026, 9, 21),
        })
        .unwrap();
    manager
        .create_event(&EventForm {
            event_name: "Ancient Feast",
            start_date: date(2010, 1, 1),
            end_date: date(2010, 1, 2),
        })
        .unwrap();

    let page = manager.sessions_page_at(today).unwrap();

    // The decade-old event falls outside the lookback window.
    assert_eq!(page.past_events.len(), 1);
    assert_eq!(page.past_events[0].event_name, "Last Year's Feast");
    assert_eq!(page.future_events.len(), 1);
    assert_eq!(page.future_events[0].event_name, "Next Month's Feast");
}

#[test]
fn deactivation_keeps_person_but_flags_inactive() {
    let mut manager = manager();
    let person_id = seed_person(&mut manager, "Anna", "Smith");

    let person = manager.person(person_id).unwrap();
    assert!(person.active);

    let person = manager.deactivate_person(person_id).unwrap();
    assert!(!person.active);

    // Name edits leave the flag alone.
    let person = manager
        .update_person(
            person_id,
            &PersonForm {
                first_name: "Anne",
                last_name: "Smith",
                sca_name: None,
            },
        )
        .unwrap();
    assert!(!person.active);
}
