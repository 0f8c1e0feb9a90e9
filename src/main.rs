use anyhow::Result;
use clap::Parser;
use tutr_reg::cli::{Cli, Command};
use tutr_reg::models::{ClassForm, CourseForm, DegreeForm, EventForm, MajorForm, PersonForm, UserForm};
use tutr_reg::{create_default_manager, display, roster};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut manager = create_default_manager()?;

    match cli.command {
        Command::AddDegree { name } => {
            let degree = manager.insert_degree(&DegreeForm { degree_name: &name })?;
            println!("Added degree {} ({})", degree.degree_name, degree.id);
        }
        Command::AddMajor { name, degree_id } => {
            let major = manager.insert_major(&MajorForm {
                major_name: &name,
                degree_id,
            })?;
            println!("Added major {} ({})", major.major_name, major.id);
        }
        Command::AddCourse {
            name,
            credits,
            major_id,
        } => {
            let course = manager.insert_course(&CourseForm {
                course_name: &name,
                credits,
                major_id,
            })?;
            println!("Added course {} ({})", course.course_name, course.id);
        }
        Command::Degrees => {
            for degree in manager.degrees()? {
                println!("{}: {}", degree.id, degree.degree_name);
            }
        }
        Command::Degree { degree_id } => {
            let page = manager.degree_page(degree_id)?;
            println!("Degree {}: {}", page.degree.id, page.degree.degree_name);
            for major in &page.majors {
                println!("  {}: {}", major.id, major.major_name);
            }
        }
        Command::Major { major_id } => {
            let page = manager.major_page(major_id)?;
            println!("Major {}: {}", page.major.id, page.major.major_name);
            for course in &page.courses {
                println!("  {}: {} ({} credits)", course.id, course.course_name, course.credits);
            }
        }
        Command::Course { course_id } => {
            let page = manager.course_page(course_id)?;
            println!(
                "Course {}: {} ({} credits)",
                page.course.id, page.course.course_name, page.course.credits
            );
            display::show_classes("Offerings", &page.class_list);
        }
        Command::AddClass { name, course_id } => {
            let class = manager.create_class(&ClassForm {
                class_name: &name,
                course_id,
            })?;
            println!("Added class {} ({}), pending approval", class.class_name, class.id);
        }
        Command::EditClass {
            class_id,
            name,
            course_id,
        } => {
            let class = manager.update_class(
                class_id,
                &ClassForm {
                    class_name: &name,
                    course_id,
                },
            )?;
            println!("Updated class {}; approval reset", class.id);
        }
        Command::ApproveClass { class_id } => {
            let class = manager.approve_class(class_id)?;
            println!("Approved class {}", class.id);
        }
        Command::CloseClass { class_id } => {
            let class = manager.close_class(class_id)?;
            println!("Closed class {}", class.id);
        }
        Command::AddEvent {
            name,
            start_date,
            end_date,
        } => {
            let event = manager.create_event(&EventForm {
                event_name: &name,
                start_date,
                end_date,
            })?;
            println!("Added event {} ({}), pending approval", event.event_name, event.id);
        }
        Command::EditEvent {
            event_id,
            name,
            start_date,
            end_date,
        } => {
            let event = manager.update_event(
                event_id,
                &EventForm {
                    event_name: &name,
                    start_date,
                    end_date,
                },
            )?;
            println!("Updated event {}; approval reset", event.id);
        }
        Command::ApproveEvent { event_id } => {
            let event = manager.approve_event(event_id)?;
            println!("Approved event {}", event.id);
        }
        Command::CloseEvent { event_id } => {
            let event = manager.close_event(event_id)?;
            println!("Closed event {}", event.id);
        }
        Command::Sessions => {
            let page = manager.sessions_page()?;
            display::show_sessions_page(&page);
        }
        Command::Event { event_id } => {
            let page = manager.event_page(event_id)?;
            display::show_event_page(&page);
        }
        Command::AddPerson {
            first_name,
            last_name,
            sca_name,
        } => {
            let person = manager.create_person(&PersonForm {
                first_name: &first_name,
                last_name: &last_name,
                sca_name: sca_name.as_deref(),
            })?;
            println!("Added person {} {} ({})", person.first_name, person.last_name, person.id);
        }
        Command::DeactivatePerson { person_id } => {
            let person = manager.deactivate_person(person_id)?;
            println!("Deactivated person {}", person.id);
        }
        Command::ImportPeople { file_path } => {
            let records = roster::load_people(&file_path)?;
            let inserted = manager.import_people(&records)?;
            println!("Imported {inserted} people");
        }
        Command::AddSession {
            event_id,
            class_id,
            start_time,
            end_time,
        } => {
            let session = manager.add_session(event_id, class_id, start_time, end_time)?;
            println!("Scheduled session {}", session.id);
        }
        Command::RemoveSession { session_id } => {
            manager.remove_session(session_id)?;
            println!("Removed session {session_id}");
        }
        Command::Register {
            session_id,
            person_id,
        } => {
            manager.register(session_id, person_id)?;
            println!("Registered person {person_id} for session {session_id}");
        }
        Command::Unregister {
            session_id,
            person_id,
        } => {
            let removed = manager.remove_registration(session_id, person_id)?;
            if removed == 0 {
                println!("Person {person_id} was not registered for session {session_id}");
            } else {
                println!("Removed person {person_id} from session {session_id}");
            }
        }
        Command::RecordAttendance {
            session_id,
            file_path,
        } => {
            let entries = roster::load_attendance_sheet(&file_path)?;
            let outcome = manager.record_attendance(session_id, &entries)?;
            display::show_outcome(&outcome);
        }
        Command::Roster { session_id } => {
            let page = manager.attendance_page(session_id)?;
            display::show_attendance("Registrations", &page.students);
        }
        Command::SearchClasses { query, page } => {
            let classes = manager.search_classes(query.as_deref(), page)?;
            display::show_classes("Classes", &classes);
        }
        Command::SearchPeople { query, page } => {
            let people = manager.search_people(query.as_deref(), page)?;
            display::show_people("People", &people);
        }
        Command::AddUser {
            username,
            person_id,
        } => {
            let user = manager.create_user(&UserForm {
                username: &username,
                person_id,
            })?;
            println!("Added user {} ({})", user.username, user.id);
        }
        Command::AssignGroup { username, group } => {
            let user = manager.user_by_name(&username)?;
            manager.assign_group(user.id, &group)?;
            println!("Added {} to group {}", user.username, group);
        }
        Command::Landing { username } => {
            let user = manager.user_by_name(&username)?;
            let view = manager.landing(user.id)?;
            display::show_landing(&view);
        }
    }

    Ok(())
}
