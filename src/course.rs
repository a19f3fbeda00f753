use std::sync::LazyLock;

use compact_str::CompactString;
use hashbrown::HashMap;
use regex::Regex;
use serde::Serialize;
use unicase::UniCase;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Instructor,
    Student,
}

/// Role of a person on a course roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Student,
    Instructor,
    Ta,
    Reader,
}

impl MemberRole {
    pub fn parse(s: &str) -> Option<Self> {
        let s = UniCase::new(s.trim());
        if s == UniCase::new("Student") {
            Some(Self::Student)
        } else if s == UniCase::new("Instructor") {
            Some(Self::Instructor)
        } else if s == UniCase::new("TA") || s == UniCase::new("Teaching Assistant") {
            Some(Self::Ta)
        } else if s == UniCase::new("Reader") || s == UniCase::new("Grader") {
            Some(Self::Reader)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub id: CompactString,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: Option<CompactString>,
    pub name: String,
    pub email: String,
    pub role: MemberRole,
    pub submissions: Option<u32>,
}

/// One row of an assignment's score export.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grade {
    pub name: String,
    pub sid: CompactString,
    pub email: String,
    pub score: Option<f64>,
    pub max_points: Option<f64>,
    pub status: CompactString,
}

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

#[derive(Clone, Debug, Serialize)]
pub struct Course {
    pub cid: CompactString,
    pub name: String,
    pub shortname: String,
    pub term: String,
    pub role: Role,
    /// `None` until [`crate::Connection::load_course`] has run.
    pub assignments: Option<Vec<Assignment>>,
    pub roster: Option<Vec<Member>>,
    /// email -> assignment id -> grade; only filled for instructor courses.
    pub grades: Option<HashMap<String, HashMap<CompactString, Grade>>>,
}

impl Course {
    pub fn new(cid: CompactString, name: String, shortname: String, term: String, role: Role) -> Self {
        Self {
            cid,
            name,
            shortname,
            term,
            role,
            assignments: None,
            roster: None,
            grades: None,
        }
    }

    /// Year part of the term label, e.g. 2018 for "Fall 2018".
    pub fn year(&self) -> Option<u16> {
        YEAR.captures(&self.term)?.get(1)?.as_str().parse().ok()
    }

    /// Students only get the assignment list; roster and grades are
    /// instructor pages.
    pub const fn is_loaded(&self) -> bool {
        match self.role {
            Role::Instructor => {
                self.assignments.is_some() && self.roster.is_some() && self.grades.is_some()
            }
            Role::Student => self.assignments.is_some(),
        }
    }

    pub fn assignment(&self, aid: &str) -> Option<&Assignment> {
        self.assignments.as_ref()?.iter().find(|a| a.id == aid)
    }
}

impl core::fmt::Display for Course {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} ({}) [{}] {} #{}",
            self.name,
            self.shortname,
            self.term,
            match self.role {
                Role::Instructor => "instructor",
                Role::Student => "student",
            },
            self.cid,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_from_term() {
        let c = Course::new("1".into(), "n".into(), "s".into(), "Fall 2018".into(), Role::Student);
        assert_eq!(c.year(), Some(2018));
        let c = Course::new("1".into(), "n".into(), "s".into(), "Summer".into(), Role::Student);
        assert_eq!(c.year(), None);
    }

    #[test]
    fn member_roles_ignore_case() {
        assert_eq!(MemberRole::parse(" student "), Some(MemberRole::Student));
        assert_eq!(MemberRole::parse("ta"), Some(MemberRole::Ta));
        assert_eq!(MemberRole::parse("INSTRUCTOR"), Some(MemberRole::Instructor));
        assert_eq!(MemberRole::parse("dean"), None);
    }
}
