use crate::domain::{self, AttendanceEntry};
use crate::error::{RegError, RegResult};
use crate::models::{
    Attendance, Class, ClassForm, Course, CourseForm, Degree, DegreeForm, Event, EventForm, Major,
    MajorForm, Person, PersonForm, Session, SessionForm, User, UserForm, UserGroupForm,
};
use crate::roles::{self, Role};
use crate::roster::PersonRecord;
use crate::schema::{
    attendance, classes, courses, degrees, events, majors, people, sessions, user_groups, users,
};
use chrono::NaiveTime;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::result::{ConnectionError, ConnectionResult};
use diesel_migrations::MigrationHarness;
use dotenvy::dotenv;
use std::env;
use tracing::{debug, warn};

/// Fixed page size for catalog and person search results.
pub const PAGE_SIZE: i64 = 100;

/// Credits earned by one person within one major, summed over every
/// attendance row that was both attended and passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditTotal {
    pub person_id: i32,
    pub major_id: i32,
    pub credits: i64,
}

/// The single view a user lands on, picked by role precedence.
#[derive(Debug, Clone, PartialEq)]
pub enum LandingView {
    /// Classes awaiting review.
    Dean { classes: Vec<Class> },
    /// Credit totals per (person, major).
    Governor { totals: Vec<CreditTotal> },
    /// Events awaiting review.
    Registrar { events: Vec<Event> },
    /// The user's own attended-and-passed records.
    Student { attendance: Vec<Attendance> },
}

/// One rejected row from an attendance-taking batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub index: usize,
    pub person_id: Option<i32>,
    pub reason: String,
}

/// Result of recording a batch of attendance entries. The valid subset is
/// committed; rejected rows are reported here instead of failing the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub updated: usize,
    pub rejected: Vec<Rejection>,
}

/// The manager for the registration database: catalog, events, sessions,
/// people, and attendance records.
pub struct RegistryManager {
    db: SqliteConnection,
}

impl RegistryManager {
    /// Creates a new `RegistryManager` by connecting to the `sqlite3` instance
    /// located at the `DATABASE_URL` environment variable.
    pub fn connect() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        Self::open(&database_url)
            .unwrap_or_else(|_| panic!("Error connecting to {}", database_url))
    }

    /// Opens a connection to the database at the given url.
    pub fn open(database_url: &str) -> ConnectionResult<Self> {
        let mut db = SqliteConnection::establish(database_url)?;

        // sqlite leaves foreign keys off unless asked per connection.
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(&mut db)
            .map_err(ConnectionError::CouldntSetupConfiguration)?;

        Ok(Self { db })
    }

    pub(crate) fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.db
    }

    /// Brings the schema up to date with the embedded migrations.
    pub fn run_migrations(&mut self) -> anyhow::Result<()> {
        self.db
            .run_pending_migrations(crate::MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;
        Ok(())
    }

    // --- Catalog ---

    pub fn insert_degree(&mut self, form: &DegreeForm) -> RegResult<Degree> {
        diesel::insert_into(degrees::table)
            .values(form)
            .returning(Degree::as_returning())
            .get_result(&mut self.db)
            .map_err(Into::into)
    }

    pub fn insert_major(&mut self, form: &MajorForm) -> RegResult<Major> {
        self.db.transaction(|conn| {
            fetch_degree(conn, form.degree_id)?;

            diesel::insert_into(majors::table)
                .values(form)
                .returning(Major::as_returning())
                .get_result(conn)
                .map_err(Into::into)
        })
    }

    pub fn insert_course(&mut self, form: &CourseForm) -> RegResult<Course> {
        self.db.transaction(|conn| {
            fetch_major(conn, form.major_id)?;

            diesel::insert_into(courses::table)
                .values(form)
                .returning(Course::as_returning())
                .get_result(conn)
                .map_err(Into::into)
        })
    }

    pub fn degrees(&mut self) -> RegResult<Vec<Degree>> {
        degrees::table
            .select(Degree::as_select())
            .order(degrees::degree_name.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    pub fn degree(&mut self, degree_id: i32) -> RegResult<Degree> {
        fetch_degree(&mut self.db, degree_id)
    }

    pub fn majors_of(&mut self, degree_id: i32) -> RegResult<Vec<Major>> {
        majors::table
            .filter(majors::degree_id.eq(degree_id))
            .select(Major::as_select())
            .order(majors::major_name.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    pub fn major(&mut self, major_id: i32) -> RegResult<Major> {
        fetch_major(&mut self.db, major_id)
    }

    pub fn courses_of(&mut self, major_id: i32) -> RegResult<Vec<Course>> {
        courses::table
            .filter(courses::major_id.eq(major_id))
            .select(Course::as_select())
            .order(courses::course_name.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    pub fn course(&mut self, course_id: i32) -> RegResult<Course> {
        fetch_course(&mut self.db, course_id)
    }

    pub fn classes_of(&mut self, course_id: i32) -> RegResult<Vec<Class>> {
        classes::table
            .filter(classes::course_id.eq(course_id))
            .select(Class::as_select())
            .order(classes::class_name.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    /// Case-insensitive substring search over class names, one fixed-size
    /// page at a time. `page` is 1-based.
    pub fn search_classes(&mut self, query: Option<&str>, page: i64) -> RegResult<Vec<Class>> {
        let mut search = classes::table
            .select(Class::as_select())
            .order(classes::class_name.asc())
            .into_boxed();

        if let Some(term) = query {
            search = search.filter(classes::class_name.like(format!("%{term}%")));
        }

        search
            .limit(PAGE_SIZE)
            .offset(page_offset(page))
            .load(&mut self.db)
            .map_err(Into::into)
    }

    /// Substring search across first, last, and SCA names.
    pub fn search_people(&mut self, query: Option<&str>, page: i64) -> RegResult<Vec<Person>> {
        let mut search = people::table
            .select(Person::as_select())
            .order((people::last_name.asc(), people::first_name.asc()))
            .into_boxed();

        if let Some(term) = query {
            let pattern = format!("%{term}%");
            search = search.filter(
                people::first_name
                    .like(pattern.clone())
                    .or(people::last_name.like(pattern.clone()))
                    .or(people::sca_name.like(pattern)),
            );
        }

        search
            .limit(PAGE_SIZE)
            .offset(page_offset(page))
            .load(&mut self.db)
            .map_err(Into::into)
    }

    // --- Classes ---

    /// Creates a class. New classes always start out unapproved.
    pub fn create_class(&mut self, form: &ClassForm) -> RegResult<Class> {
        self.db.transaction(|conn| {
            fetch_course(conn, form.course_id)?;

            diesel::insert_into(classes::table)
                .values(form)
                .returning(Class::as_returning())
                .get_result(conn)
                .map_err(Into::into)
        })
    }

    /// Applies an edit to a class. Every edit resets `approved` and `closed`;
    /// a modified class must be reviewed again.
    pub fn update_class(&mut self, class_id: i32, form: &ClassForm) -> RegResult<Class> {
        self.db.transaction(|conn| {
            fetch_course(conn, form.course_id)?;

            diesel::update(classes::table.find(class_id))
                .set((form, classes::approved.eq(false), classes::closed.eq(false)))
                .returning(Class::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or_else(|| RegError::not_found("class", class_id))
        })
    }

    pub fn approve_class(&mut self, class_id: i32) -> RegResult<Class> {
        diesel::update(classes::table.find(class_id))
            .set(classes::approved.eq(true))
            .returning(Class::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::not_found("class", class_id))
    }

    pub fn close_class(&mut self, class_id: i32) -> RegResult<Class> {
        diesel::update(classes::table.find(class_id))
            .set(classes::closed.eq(true))
            .returning(Class::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::not_found("class", class_id))
    }

    /// Classes waiting on dean review.
    pub fn unapproved_classes(&mut self) -> RegResult<Vec<Class>> {
        classes::table
            .filter(classes::approved.eq(false))
            .select(Class::as_select())
            .order(classes::id.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    pub fn class(&mut self, class_id: i32) -> RegResult<Class> {
        fetch_class(&mut self.db, class_id)
    }

    // --- Events ---

    /// Creates an event. New events always start out unapproved and open.
    pub fn create_event(&mut self, form: &EventForm) -> RegResult<Event> {
        diesel::insert_into(events::table)
            .values(form)
            .returning(Event::as_returning())
            .get_result(&mut self.db)
            .map_err(Into::into)
    }

    /// Applies an edit to an event, resetting `approved` and `closed`.
    pub fn update_event(&mut self, event_id: i32, form: &EventForm) -> RegResult<Event> {
        diesel::update(events::table.find(event_id))
            .set((form, events::approved.eq(false), events::closed.eq(false)))
            .returning(Event::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::not_found("event", event_id))
    }

    pub fn approve_event(&mut self, event_id: i32) -> RegResult<Event> {
        diesel::update(events::table.find(event_id))
            .set(events::approved.eq(true))
            .returning(Event::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::not_found("event", event_id))
    }

    pub fn close_event(&mut self, event_id: i32) -> RegResult<Event> {
        diesel::update(events::table.find(event_id))
            .set(events::closed.eq(true))
            .returning(Event::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::not_found("event", event_id))
    }

    /// Events waiting on registrar review.
    pub fn unapproved_events(&mut self) -> RegResult<Vec<Event>> {
        events::table
            .filter(events::approved.eq(false))
            .select(Event::as_select())
            .order(events::id.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    pub fn event(&mut self, event_id: i32) -> RegResult<Event> {
        fetch_event(&mut self.db, event_id)
    }

    // --- People ---

    /// Creates a person. New people are always active.
    pub fn create_person(&mut self, form: &PersonForm) -> RegResult<Person> {
        diesel::insert_into(people::table)
            .values(form)
            .returning(Person::as_returning())
            .get_result(&mut self.db)
            .map_err(Into::into)
    }

    /// Edits a person's names. Unlike event and class edits this resets
    /// nothing; `active` is untouched.
    pub fn update_person(&mut self, person_id: i32, form: &PersonForm) -> RegResult<Person> {
        diesel::update(people::table.find(person_id))
            .set(form)
            .returning(Person::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::not_found("person", person_id))
    }

    pub fn deactivate_person(&mut self, person_id: i32) -> RegResult<Person> {
        diesel::update(people::table.find(person_id))
            .set(people::active.eq(false))
            .returning(Person::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::not_found("person", person_id))
    }

    pub fn person(&mut self, person_id: i32) -> RegResult<Person> {
        fetch_person(&mut self.db, person_id)
    }

    /// Bulk-inserts people from an imported roster sheet.
    pub fn import_people(&mut self, records: &[PersonRecord]) -> RegResult<usize> {
        self.db.transaction(|conn| {
            let mut inserted = 0;

            for record in records {
                let form = PersonForm {
                    first_name: &record.first_name,
                    last_name: &record.last_name,
                    sca_name: record.sca_name.as_deref(),
                };

                inserted += diesel::insert_into(people::table)
                    .values(&form)
                    .execute(conn)?;
            }

            debug!(inserted, "imported people from roster");
            Ok(inserted)
        })
    }

    // --- Sessions ---

    /// Schedules a class within an event. Nothing deduplicates here: calling
    /// twice for the same pair yields two distinct sessions.
    pub fn add_session(
        &mut self,
        event_id: i32,
        class_id: i32,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> RegResult<Session> {
        self.db.transaction(|conn| {
            fetch_event(conn, event_id)?;
            fetch_class(conn, class_id)?;

            let form = SessionForm {
                event_id,
                class_id,
                start_time,
                end_time,
            };

            diesel::insert_into(sessions::table)
                .values(&form)
                .returning(Session::as_returning())
                .get_result(conn)
                .map_err(Into::into)
        })
    }

    pub fn update_session_times(
        &mut self,
        session_id: i32,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> RegResult<Session> {
        diesel::update(sessions::table.find(session_id))
            .set((
                sessions::start_time.eq(start_time),
                sessions::end_time.eq(end_time),
            ))
            .returning(Session::as_returning())
            .get_result(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::not_found("session", session_id))
    }

    /// Deletes a session along with its attendance rows, so no registration
    /// can be left pointing at a missing session.
    pub fn remove_session(&mut self, session_id: i32) -> RegResult<()> {
        self.db.transaction(|conn| {
            diesel::delete(attendance::table.filter(attendance::session_id.eq(session_id)))
                .execute(conn)?;

            let deleted = diesel::delete(sessions::table.find(session_id)).execute(conn)?;

            if deleted == 0 {
                return Err(RegError::not_found("session", session_id));
            }

            Ok(())
        })
    }

    pub fn session(&mut self, session_id: i32) -> RegResult<Session> {
        fetch_session(&mut self.db, session_id)
    }

    pub fn sessions_of_event(&mut self, event_id: i32) -> RegResult<Vec<Session>> {
        sessions::table
            .filter(sessions::event_id.eq(event_id))
            .select(Session::as_select())
            .order(sessions::id.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    // --- Registration & attendance ---

    /// Registers a person for a session with both outcome flags false.
    /// Registering the same pair twice is a deterministic conflict, never a
    /// second row.
    pub fn register(&mut self, session_id: i32, person_id: i32) -> RegResult<Attendance> {
        self.db.transaction(|conn| {
            fetch_session(conn, session_id)?;
            fetch_person(conn, person_id)?;

            let existing: Option<Attendance> = attendance::table
                .find((session_id, person_id))
                .select(Attendance::as_select())
                .first(conn)
                .optional()?;

            if existing.is_some() {
                return Err(RegError::AlreadyRegistered {
                    session_id,
                    person_id,
                });
            }

            let row = Attendance {
                session_id,
                person_id,
                attended: false,
                passed: false,
            };

            diesel::insert_into(attendance::table)
                .values(&row)
                .returning(Attendance::as_returning())
                .get_result(conn)
                .map_err(Into::into)
        })
    }

    /// Removes a person's registration from a session. Removing a pair that
    /// was never registered is a no-op, not an error.
    pub fn remove_registration(&mut self, session_id: i32, person_id: i32) -> RegResult<usize> {
        diesel::delete(
            attendance::table
                .filter(attendance::session_id.eq(session_id))
                .filter(attendance::person_id.eq(person_id)),
        )
        .execute(&mut self.db)
        .map_err(Into::into)
    }

    /// Records an attendance-taking batch for one session. Each entry is
    /// validated on its own: the valid subset commits in one transaction and
    /// the rejects come back with reasons.
    pub fn record_attendance(
        &mut self,
        session_id: i32,
        entries: &[AttendanceEntry],
    ) -> RegResult<RecordOutcome> {
        self.db.transaction(|conn| {
            fetch_session(conn, session_id)?;

            let mut updated = 0;
            let mut rejected = Vec::new();

            for (index, entry) in entries.iter().enumerate() {
                let valid = match domain::validate_entry(entry) {
                    Ok(valid) => valid,
                    Err(reason) => {
                        warn!(index, %reason, "skipping attendance entry");
                        rejected.push(Rejection {
                            index,
                            person_id: entry.person_id,
                            reason,
                        });
                        continue;
                    }
                };

                let applied = diesel::update(attendance::table.find((session_id, valid.person_id)))
                    .set((
                        attendance::attended.eq(valid.attended),
                        attendance::passed.eq(valid.passed),
                    ))
                    .execute(conn)?;

                if applied == 0 {
                    let reason = format!(
                        "person {} is not registered for session {session_id}",
                        valid.person_id
                    );
                    warn!(index, %reason, "skipping attendance entry");
                    rejected.push(Rejection {
                        index,
                        person_id: entry.person_id,
                        reason,
                    });
                } else {
                    updated += applied;
                }
            }

            Ok(RecordOutcome { updated, rejected })
        })
    }

    /// Every registration row for a session, in roster order.
    pub fn session_roster(&mut self, session_id: i32) -> RegResult<Vec<Attendance>> {
        attendance::table
            .filter(attendance::session_id.eq(session_id))
            .select(Attendance::as_select())
            .order(attendance::person_id.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    // --- Users & landing ---

    pub fn create_user(&mut self, form: &UserForm) -> RegResult<User> {
        self.db.transaction(|conn| {
            if let Some(person_id) = form.person_id {
                fetch_person(conn, person_id)?;
            }

            diesel::insert_into(users::table)
                .values(form)
                .returning(User::as_returning())
                .get_result(conn)
                .map_err(Into::into)
        })
    }

    pub fn assign_group(&mut self, user_id: i32, group_name: &str) -> RegResult<()> {
        self.db.transaction(|conn| {
            fetch_user(conn, user_id)?;

            let form = UserGroupForm {
                user_id,
                group_name,
            };

            // Re-assigning an existing group is harmless.
            diesel::insert_or_ignore_into(user_groups::table)
                .values(&form)
                .execute(conn)?;

            Ok(())
        })
    }

    pub fn user_by_name(&mut self, username: &str) -> RegResult<User> {
        users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(&mut self.db)
            .optional()?
            .ok_or_else(|| RegError::UnknownUser(username.to_string()))
    }

    pub fn groups_of(&mut self, user_id: i32) -> RegResult<Vec<String>> {
        user_groups::table
            .filter(user_groups::user_id.eq(user_id))
            .select(user_groups::group_name)
            .order(user_groups::group_name.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }

    /// Resolves the user's role and returns the one landing view for it.
    pub fn landing(&mut self, user_id: i32) -> RegResult<LandingView> {
        let user = fetch_user(&mut self.db, user_id)?;
        let groups = self.groups_of(user.id)?;

        match roles::resolve(&groups) {
            Role::Dean => Ok(LandingView::Dean {
                classes: self.unapproved_classes()?,
            }),
            Role::Governor => Ok(LandingView::Governor {
                totals: self.credit_totals()?,
            }),
            Role::Registrar => Ok(LandingView::Registrar {
                events: self.unapproved_events()?,
            }),
            Role::Student => {
                // A user with no linked person simply has no rows to show.
                let attendance = match user.person_id {
                    Some(person_id) => self.passed_attendance_for(person_id)?,
                    None => Vec::new(),
                };
                Ok(LandingView::Student { attendance })
            }
        }
    }

    /// Sums course credits per (person, major) over rows that were both
    /// attended and passed.
    pub fn credit_totals(&mut self) -> RegResult<Vec<CreditTotal>> {
        let rows: Vec<(i32, i32, Option<i64>)> = attendance::table
            .inner_join(sessions::table.inner_join(classes::table.inner_join(courses::table)))
            .filter(attendance::attended.eq(true))
            .filter(attendance::passed.eq(true))
            .group_by((attendance::person_id, courses::major_id))
            .select((attendance::person_id, courses::major_id, sum(courses::credits)))
            .order((attendance::person_id.asc(), courses::major_id.asc()))
            .load(&mut self.db)?;

        Ok(rows
            .into_iter()
            .map(|(person_id, major_id, credits)| CreditTotal {
                person_id,
                major_id,
                credits: credits.unwrap_or(0),
            })
            .collect())
    }

    /// A person's attended-and-passed records, for the student landing view.
    pub fn passed_attendance_for(&mut self, person_id: i32) -> RegResult<Vec<Attendance>> {
        attendance::table
            .filter(attendance::person_id.eq(person_id))
            .filter(attendance::attended.eq(true))
            .filter(attendance::passed.eq(true))
            .select(Attendance::as_select())
            .order(attendance::session_id.asc())
            .load(&mut self.db)
            .map_err(Into::into)
    }
}

impl Default for RegistryManager {
    fn default() -> Self {
        Self::connect()
    }
}

fn page_offset(page: i64) -> i64 {
    (page.max(1) - 1) * PAGE_SIZE
}

fn fetch_degree(conn: &mut SqliteConnection, id: i32) -> RegResult<Degree> {
    degrees::table
        .find(id)
        .select(Degree::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| RegError::not_found("degree", id))
}

fn fetch_major(conn: &mut SqliteConnection, id: i32) -> RegResult<Major> {
    majors::table
        .find(id)
        .select(Major::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| RegError::not_found("major", id))
}

fn fetch_course(conn: &mut SqliteConnection, id: i32) -> RegResult<Course> {
    courses::table
        .find(id)
        .select(Course::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| RegError::not_found("course", id))
}

fn fetch_class(conn: &mut SqliteConnection, id: i32) -> RegResult<Class> {
    classes::table
        .find(id)
        .select(Class::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| RegError::not_found("class", id))
}

fn fetch_event(conn: &mut SqliteConnection, id: i32) -> RegResult<Event> {
    events::table
        .find(id)
        .select(Event::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| RegError::not_found("event", id))
}

fn fetch_session(conn: &mut SqliteConnection, id: i32) -> RegResult<Session> {
    sessions::table
        .find(id)
        .select(Session::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| RegError::not_found("session", id))
}

fn fetch_person(conn: &mut SqliteConnection, id: i32) -> RegResult<Person> {
    people::table
        .find(id)
        .select(Person::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| RegError::not_found("person", id))
}

fn fetch_user(conn: &mut SqliteConnection, id: i32) -> RegResult<User> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| RegError::not_found("user", id))
}
