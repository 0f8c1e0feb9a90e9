//! Role resolution for landing-page dispatch.
//!
//! Group membership is resolved once per request into a closed [`Role`]
//! variant. Precedence is fixed: Dean > Governor > Registrar, and anyone
//! else (including a user in no groups at all) lands as a Student.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Dean,
    Governor,
    Registrar,
    Student,
}

impl Role {
    pub fn group_name(self) -> &'static str {
        match self {
            Role::Dean => "Dean",
            Role::Governor => "Governor",
            Role::Registrar => "Registrar",
            Role::Student => "Student",
        }
    }
}

/// Resolves a user's groups to a single role. A user in several groups gets
/// the highest-precedence match; an empty or unrecognized set degrades to
/// [`Role::Student`] rather than erroring.
pub fn resolve(groups: &[String]) -> Role {
    for candidate in [Role::Dean, Role::Governor, Role::Registrar] {
        if groups.iter().any(|g| g == candidate.group_name()) {
            return candidate;
        }
    }
    Role::Student
}
