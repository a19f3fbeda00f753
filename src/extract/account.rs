use std::sync::LazyLock;

use compact_str::CompactString;
use scraper::{ElementRef, Html, Selector};
use unicase::UniCase;

use super::selector;
use crate::{
    course::Role,
    error::MarkupError,
    util::{has_class, last_segment, text},
};

static SEL_HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h1.pageHeading"));
static SEL_COURSE_BOX: LazyLock<Selector> = LazyLock::new(|| selector("a.courseBox"));
static SEL_SHORTNAME: LazyLock<Selector> = LazyLock::new(|| selector("h3.courseBox--shortname"));
static SEL_NAME: LazyLock<Selector> = LazyLock::new(|| selector("h4.courseBox--name"));

const STUDENT_HEADING: &str = "Student Courses";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseEntry {
    pub cid: CompactString,
    pub name: String,
    pub shortname: String,
    pub term: String,
    pub role: Role,
}

fn is_heading(elem: ElementRef) -> bool {
    elem.value().name() == "h1" && has_class(elem, "pageHeading")
}

/// Courses listed on the account page, instructor section first.
///
/// A missing student section is an empty result. Any course box that cannot
/// be read completely fails the whole page.
pub fn courses(page: &str) -> Result<Vec<CourseEntry>, MarkupError> {
    let html = Html::parse_document(page);

    let mut headings = html.select(&SEL_HEADING).peekable();
    if headings.peek().is_none() {
        return Err(MarkupError::MissingHeading);
    }

    let mut res = Vec::new();
    for heading in headings {
        let role = if UniCase::new(text(heading).as_str()) == UniCase::new(STUDENT_HEADING) {
            Role::Student
        } else {
            Role::Instructor
        };

        let section = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|elem| !is_heading(*elem));

        let mut found = 0usize;
        for elem in section {
            let boxes = core::iter::once(elem)
                .filter(|e| e.value().name() == "a" && has_class(*e, "courseBox"))
                .chain(elem.select(&SEL_COURSE_BOX));
            for course in boxes {
                res.push(course_entry(course, role)?);
                found += 1;
            }
        }
        tracing::debug!(target: "extract", "{role:?} section: {found} courses");
    }

    Ok(res)
}

fn course_entry(course: ElementRef, role: Role) -> Result<CourseEntry, MarkupError> {
    let cid: CompactString = course
        .attr("href")
        .and_then(last_segment)
        .ok_or(MarkupError::CourseLink)?
        .into();

    let field = |sel: &Selector, field| {
        course
            .select(sel)
            .next()
            .map(text)
            .ok_or_else(|| MarkupError::CourseField {
                course: cid.clone(),
                field,
            })
    };
    let shortname = field(&*SEL_SHORTNAME, "short name")?;
    let name = field(&*SEL_NAME, "name")?;

    let term = course
        .parent()
        .into_iter()
        .flat_map(|parent| parent.prev_siblings())
        .filter_map(ElementRef::wrap)
        .find(|tag| has_class(*tag, "courseList--term"))
        .map(text)
        .ok_or_else(|| MarkupError::MissingTerm { course: cid.clone() })?;

    Ok(CourseEntry {
        cid,
        name,
        shortname,
        term,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! fixture {
        ($name:literal) => {
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/", $name))
        };
    }

    fn entry(cid: &str, name: &str, shortname: &str, term: &str, role: Role) -> CourseEntry {
        CourseEntry {
            cid: cid.into(),
            name: name.into(),
            shortname: shortname.into(),
            term: term.into(),
            role,
        }
    }

    #[test]
    fn instructor_and_student_sections() {
        let courses = courses(fixture!("account.html")).unwrap();
        assert_eq!(
            courses,
            vec![
                entry("24242", "Introduction to Programming", "CS 101", "Fall 2018", Role::Instructor),
                entry("13131", "Data Structures", "CS 201", "Spring 2018", Role::Instructor),
                entry("55555", "Linear Algebra", "MATH 54", "Fall 2018", Role::Student),
            ]
        );
    }

    #[test]
    fn no_student_section_is_not_an_error() {
        let courses = courses(fixture!("account_no_students.html")).unwrap();
        assert_eq!(courses.len(), 2);
        assert!(courses.iter().all(|c| c.role == Role::Instructor));
        assert_eq!(courses[1].term, "Winter 2019");
    }

    #[test]
    fn missing_term_names_the_course() {
        assert_eq!(
            courses(fixture!("account_no_term.html")),
            Err(MarkupError::MissingTerm { course: "777".into() })
        );
    }

    #[test]
    fn student_only_account() {
        let page = r#"
            <h1 class="pageHeading">Student Courses</h1>
            <div class="courseList">
              <div class="courseList--term">Spring 2020</div>
              <div><a class="courseBox" href="/courses/3"><h3 class="courseBox--shortname">A</h3><h4 class="courseBox--name">B</h4></a></div>
            </div>"#;
        assert_eq!(courses(page).unwrap(), vec![entry("3", "B", "A", "Spring 2020", Role::Student)]);
    }

    #[test]
    fn login_page_has_no_heading() {
        assert_eq!(courses(fixture!("landing.html")), Err(MarkupError::MissingHeading));
    }

    #[test]
    fn course_box_without_name() {
        let page = r#"
            <h1 class="pageHeading">Instructor Courses</h1>
            <div><div class="courseList--term">Fall 2018</div>
            <div><a class="courseBox" href="/courses/8"><h3 class="courseBox--shortname">X</h3></a></div></div>"#;
        assert_eq!(
            courses(page),
            Err(MarkupError::CourseField { course: "8".into(), field: "name" })
        );
    }
}
