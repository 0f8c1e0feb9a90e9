//! This module contains the command-line interface [`Cli`] parser for managing
//! the registration database.

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The command line configuration struct, where the command-line interface
/// parser is automatically derived by [`clap::Parser`].
#[derive(Parser, Debug)]
pub struct Cli {
    /// The different commands available for managing the registry.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a degree to the catalog.
    AddDegree { name: String },

    /// Add a major under a degree.
    AddMajor { name: String, degree_id: i32 },

    /// Add a course under a major.
    AddCourse {
        name: String,
        credits: i32,
        major_id: i32,
    },

    /// List all degrees.
    Degrees,

    /// Show a degree and its majors.
    Degree { degree_id: i32 },

    /// Show a major and its courses.
    Major { major_id: i32 },

    /// Show a course and its class offerings.
    Course { course_id: i32 },

    /// Create a class offering (starts unapproved).
    AddClass { name: String, course_id: i32 },

    /// Edit a class, resetting its approval.
    EditClass {
        class_id: i32,
        name: String,
        course_id: i32,
    },

    /// Approve a class.
    ApproveClass { class_id: i32 },

    /// Close a class.
    CloseClass { class_id: i32 },

    /// Create an event (starts unapproved).
    AddEvent {
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    /// Edit an event, resetting its approval.
    EditEvent {
        event_id: i32,
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    /// Approve an event.
    ApproveEvent { event_id: i32 },

    /// Close an event.
    CloseEvent { event_id: i32 },

    /// Show recent and upcoming events.
    Sessions,

    /// Show an event with its scheduled sessions.
    Event { event_id: i32 },

    /// Add a person.
    AddPerson {
        first_name: String,
        last_name: String,
        #[arg(long)]
        sca_name: Option<String>,
    },

    /// Deactivate a person.
    DeactivatePerson { person_id: i32 },

    /// Import people from a CSV roster.
    ImportPeople { file_path: PathBuf },

    /// Schedule a class within an event.
    AddSession {
        event_id: i32,
        class_id: i32,
        #[arg(long)]
        start_time: Option<NaiveTime>,
        #[arg(long)]
        end_time: Option<NaiveTime>,
    },

    /// Remove a session and its registrations.
    RemoveSession { session_id: i32 },

    /// Register a person for a session.
    Register { session_id: i32, person_id: i32 },

    /// Remove a person's registration from a session.
    Unregister { session_id: i32, person_id: i32 },

    /// Record attendance for a session from a CSV sheet.
    RecordAttendance {
        session_id: i32,
        file_path: PathBuf,
    },

    /// Show the registration roster for a session.
    Roster { session_id: i32 },

    /// Search classes by name.
    SearchClasses {
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },

    /// Search people by first, last, or SCA name.
    SearchPeople {
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },

    /// Create a user account.
    AddUser {
        username: String,
        #[arg(long)]
        person_id: Option<i32>,
    },

    /// Put a user in a group.
    AssignGroup { username: String, group: String },

    /// Show the landing view for a user's role.
    Landing { username: String },
}
