//! Page contexts for the rendering layer. Each function gathers exactly the
//! values its template needs; the templates themselves live elsewhere.

use crate::domain;
use crate::error::RegResult;
use crate::manager::RegistryManager;
use crate::models::{Attendance, Class, Course, Degree, Event, Major, Person, Session};
use crate::schema::events;
use chrono::{Days, Local, NaiveDate};
use diesel::prelude::*;

/// How far back the sessions page reaches for past events.
const LOOKBACK_DAYS: u64 = 365 * 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionsPage {
    pub past_events: Vec<Event>,
    pub future_events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPage {
    pub event: Event,
    pub sessions: Vec<Session>,
    /// Whether the event is still open: its end date is today or later.
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreePage {
    pub degree: Degree,
    pub majors: Vec<Major>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MajorPage {
    pub major: Major,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePage {
    pub course: Course,
    pub class_list: Vec<Class>,
}

/// Search results for attaching a class to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddClassPage {
    pub event: Event,
    pub classes: Vec<Class>,
}

/// Search results for adding a person to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPersonPage {
    pub session: Session,
    pub people: Vec<Person>,
}

/// The attendance-taking sheet for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendancePage {
    pub session: Session,
    pub students: Vec<Attendance>,
}

impl RegistryManager {
    pub fn sessions_page(&mut self) -> RegResult<SessionsPage> {
        self.sessions_page_at(Local::now().date_naive())
    }

    /// Past events from the last four years and all upcoming events, both in
    /// start-date order. An event starting today shows up in both lists.
    pub fn sessions_page_at(&mut self, today: NaiveDate) -> RegResult<SessionsPage> {
        let cutoff = today
            .checked_sub_days(Days::new(LOOKBACK_DAYS))
            .expect("Somehow reached the beginning of time");

        let past_events = events::table
            .filter(events::start_date.ge(cutoff))
            .filter(events::start_date.le(today))
            .select(Event::as_select())
            .order(events::start_date.asc())
            .load(self.connection())?;

        let future_events = events::table
            .filter(events::start_date.ge(today))
            .select(Event::as_select())
            .order(events::start_date.asc())
            .load(self.connection())?;

        Ok(SessionsPage {
            past_events,
            future_events,
        })
    }

    pub fn event_page(&mut self, event_id: i32) -> RegResult<EventPage> {
        self.event_page_at(event_id, Local::now().date_naive())
    }

    pub fn event_page_at(&mut self, event_id: i32, today: NaiveDate) -> RegResult<EventPage> {
        let event = self.event(event_id)?;
        let sessions = self.sessions_of_event(event_id)?;
        let open = domain::event_open(event.end_date, today);

        Ok(EventPage {
            event,
            sessions,
            open,
        })
    }

    pub fn degree_page(&mut self, degree_id: i32) -> RegResult<DegreePage> {
        let degree = self.degree(degree_id)?;
        let majors = self.majors_of(degree_id)?;

        Ok(DegreePage { degree, majors })
    }

    pub fn major_page(&mut self, major_id: i32) -> RegResult<MajorPage> {
        let major = self.major(major_id)?;
        let courses = self.courses_of(major_id)?;

        Ok(MajorPage { major, courses })
    }

    pub fn course_page(&mut self, course_id: i32) -> RegResult<CoursePage> {
        let course = self.course(course_id)?;
        let class_list = self.classes_of(course_id)?;

        Ok(CoursePage { course, class_list })
    }

    pub fn add_class_page(
        &mut self,
        event_id: i32,
        query: Option<&str>,
        page: i64,
    ) -> RegResult<AddClassPage> {
        let event = self.event(event_id)?;
        let classes = self.search_classes(query, page)?;

        Ok(AddClassPage { event, classes })
    }

    pub fn add_person_page(
        &mut self,
        session_id: i32,
        query: Option<&str>,
        page: i64,
    ) -> RegResult<AddPersonPage> {
        let session = self.session(session_id)?;
        let people = self.search_people(query, page)?;

        Ok(AddPersonPage { session, people })
    }

    pub fn attendance_page(&mut self, session_id: i32) -> RegResult<AttendancePage> {
        let session = self.session(session_id)?;
        let students = self.session_roster(session_id)?;

        Ok(AttendancePage { session, students })
    }
}
