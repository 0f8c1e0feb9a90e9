use crate::schema::{attendance, classes, courses, degrees, events, majors, people, sessions, user_groups, users};
use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = degrees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Degree {
    pub id: i32,
    pub degree_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = majors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Major {
    pub id: i32,
    pub major_name: String,
    pub degree_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Course {
    pub id: i32,
    pub course_name: String,
    pub credits: i32,
    pub major_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Class {
    pub id: i32,
    pub class_name: String,
    pub course_id: i32,
    pub approved: bool,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Event {
    pub id: i32,
    pub event_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub approved: bool,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    pub id: i32,
    pub event_id: i32,
    pub class_id: i32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = people)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Person {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub sca_name: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub person_id: Option<i32>,
}

/// A registration and outcome record for one person in one session.
///
/// Rows are created on registration with both flags false, mutated by
/// attendance-taking, and deleted outright when the person is removed.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Attendance {
    pub session_id: i32,
    pub person_id: i32,
    pub attended: bool,
    pub passed: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = degrees)]
pub struct DegreeForm<'a> {
    pub degree_name: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = majors)]
pub struct MajorForm<'a> {
    pub major_name: &'a str,
    pub degree_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = courses)]
pub struct CourseForm<'a> {
    pub course_name: &'a str,
    pub credits: i32,
    pub major_id: i32,
}

/// Editable fields of a class. The `approved`/`closed` flags are never part
/// of the form; creation leaves them at their pending defaults and every
/// update resets them.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = classes)]
pub struct ClassForm<'a> {
    pub class_name: &'a str,
    pub course_id: i32,
}

/// Editable fields of an event, same flag policy as [`ClassForm`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = events)]
pub struct EventForm<'a> {
    pub event_name: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = people)]
#[diesel(treat_none_as_null = true)]
pub struct PersonForm<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub sca_name: Option<&'a str>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sessions)]
pub struct SessionForm {
    pub event_id: i32,
    pub class_id: i32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct UserForm<'a> {
    pub username: &'a str,
    pub person_id: Option<i32>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_groups)]
pub struct UserGroupForm<'a> {
    pub user_id: i32,
    pub group_name: &'a str,
}
