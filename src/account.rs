use std::time::SystemTime;

use compact_str::CompactString;
use hashbrown::HashMap;
use serde::Serialize;

use crate::course::{Course, Role};

#[derive(Debug, Serialize)]
pub struct Account {
    pub email: String,
    pub instructor_courses: HashMap<CompactString, Course>,
    pub student_courses: HashMap<CompactString, Course>,
    /// `Date` header of the account page the courses came from.
    #[serde(skip)]
    pub fetched: Option<SystemTime>,
}

impl Account {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            instructor_courses: HashMap::new(),
            student_courses: HashMap::new(),
            fetched: None,
        }
    }

    pub fn add_class(
        &mut self,
        cid: CompactString,
        name: String,
        shortname: String,
        term: String,
        role: Role,
    ) {
        let courses = match role {
            Role::Instructor => &mut self.instructor_courses,
            Role::Student => &mut self.student_courses,
        };
        courses.insert(cid.clone(), Course::new(cid, name, shortname, term, role));
    }

    pub fn clear(&mut self) {
        self.instructor_courses.clear();
        self.student_courses.clear();
    }

    pub fn course(&self, cid: &str) -> Option<&Course> {
        self.instructor_courses
            .get(cid)
            .or_else(|| self.student_courses.get(cid))
    }

    pub fn course_mut(&mut self, cid: &str) -> Option<&mut Course> {
        match self.instructor_courses.get_mut(cid) {
            Some(c) => Some(c),
            None => self.student_courses.get_mut(cid),
        }
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.instructor_courses
            .values()
            .chain(self.student_courses.values())
    }

    pub fn len(&self) -> usize {
        self.instructor_courses.len() + self.student_courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
