use crate::manager::{CreditTotal, LandingView, RecordOutcome};
use crate::models::{Attendance, Class, Event, Person, Session};
use crate::views::{EventPage, SessionsPage};
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct EventRow {
    id: i32,
    name: String,
    start: String,
    end: String,
    approved: bool,
    closed: bool,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.event_name.clone(),
            start: event.start_date.to_string(),
            end: event.end_date.to_string(),
            approved: event.approved,
            closed: event.closed,
        }
    }
}

#[derive(Tabled)]
struct ClassRow {
    id: i32,
    name: String,
    course_id: i32,
    approved: bool,
    closed: bool,
}

impl From<&Class> for ClassRow {
    fn from(class: &Class) -> Self {
        Self {
            id: class.id,
            name: class.class_name.clone(),
            course_id: class.course_id,
            approved: class.approved,
            closed: class.closed,
        }
    }
}

#[derive(Tabled)]
struct PersonRow {
    id: i32,
    first_name: String,
    last_name: String,
    sca_name: String,
    active: bool,
}

impl From<&Person> for PersonRow {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id,
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            sca_name: person.sca_name.clone().unwrap_or_else(|| "-".to_string()),
            active: person.active,
        }
    }
}

#[derive(Tabled)]
struct SessionRow {
    id: i32,
    event_id: i32,
    class_id: i32,
    start: String,
    end: String,
}

impl From<&Session> for SessionRow {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            event_id: session.event_id,
            class_id: session.class_id,
            start: session
                .start_time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            end: session
                .end_time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct AttendanceRow {
    session_id: i32,
    person_id: i32,
    attended: bool,
    passed: bool,
}

impl From<&Attendance> for AttendanceRow {
    fn from(row: &Attendance) -> Self {
        Self {
            session_id: row.session_id,
            person_id: row.person_id,
            attended: row.attended,
            passed: row.passed,
        }
    }
}

#[derive(Tabled)]
struct CreditRow {
    person_id: i32,
    major_id: i32,
    credits: i64,
}

fn print_table<R: Tabled>(title: &str, rows: Vec<R>) {
    if rows.is_empty() {
        println!("{title}: none");
        return;
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{title}:\n{table}");
}

pub fn show_events(title: &str, events: &[Event]) {
    print_table(title, events.iter().map(EventRow::from).collect());
}

pub fn show_classes(title: &str, classes: &[Class]) {
    print_table(title, classes.iter().map(ClassRow::from).collect());
}

pub fn show_people(title: &str, people: &[Person]) {
    print_table(title, people.iter().map(PersonRow::from).collect());
}

pub fn show_sessions(title: &str, sessions: &[Session]) {
    print_table(title, sessions.iter().map(SessionRow::from).collect());
}

pub fn show_attendance(title: &str, rows: &[Attendance]) {
    print_table(title, rows.iter().map(AttendanceRow::from).collect());
}

pub fn show_credit_totals(totals: &[CreditTotal]) {
    let rows = totals
        .iter()
        .map(|t| CreditRow {
            person_id: t.person_id,
            major_id: t.major_id,
            credits: t.credits,
        })
        .collect();
    print_table("Credits earned", rows);
}

/// Pretty prints the sessions page: recent past events and upcoming events.
pub fn show_sessions_page(page: &SessionsPage) {
    show_events("Past events", &page.past_events);
    show_events("Future events", &page.future_events);
}

/// Pretty prints an event with its scheduled sessions.
pub fn show_event_page(page: &EventPage) {
    let status = if page.open { "open" } else { "closed" };
    println!(
        "Event {} \"{}\" ({} to {}, {status})",
        page.event.id, page.event.event_name, page.event.start_date, page.event.end_date
    );
    show_sessions("Sessions", &page.sessions);
}

/// Pretty prints the landing view for whichever role the user resolved to.
pub fn show_landing(view: &LandingView) {
    match view {
        LandingView::Dean { classes } => show_classes("Classes awaiting approval", classes),
        LandingView::Governor { totals } => show_credit_totals(totals),
        LandingView::Registrar { events } => show_events("Events awaiting approval", events),
        LandingView::Student { attendance } => show_attendance("Completed classes", attendance),
    }
}

/// Reports how an attendance batch went, including every rejected row.
pub fn show_outcome(outcome: &RecordOutcome) {
    println!("Updated {} attendance record(s).", outcome.updated);

    for rejection in &outcome.rejected {
        println!("Rejected row {}: {}", rejection.index, rejection.reason);
    }
}
