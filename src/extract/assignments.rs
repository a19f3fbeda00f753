use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::selector;
use crate::{course::Assignment, util::text};

static SEL_TR: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static SEL_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static REG_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/courses/(\d+)/assignments/(\d+)(?:/|$|\?)").unwrap());

/// Assignments of course `cid`, in table order. Rows without an assignment
/// link (headers, section separators) are skipped.
pub fn assignments(page: &str, cid: &str) -> Vec<Assignment> {
    let html = Html::parse_document(page);

    let mut res: Vec<Assignment> = Vec::new();
    for row in html.select(&SEL_TR) {
        let found = row.select(&SEL_LINK).find_map(|a| {
            let cap = REG_LINK.captures(a.attr("href")?)?;
            if cap.get(1)?.as_str() != cid {
                return None;
            }
            Some(Assignment {
                id: cap.get(2)?.as_str().into(),
                name: text(a),
            })
        });
        let Some(assignment) = found else {
            continue;
        };
        if res.iter().any(|a| a.id == assignment.id) {
            continue;
        }
        res.push(assignment);
    }

    tracing::debug!(target: "extract", "course {cid}: {} assignments", res.len());
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/assignments.html"));

    #[test]
    fn rows_with_assignment_links() {
        let res = assignments(PAGE, "24242");
        let got: Vec<_> = res.iter().map(|a| (a.id.as_str(), a.name.as_str())).collect();
        assert_eq!(
            got,
            [("1001", "Homework 1"), ("1002", "Midterm Exam"), ("1003", "Project: Part 2")]
        );
    }

    #[test]
    fn links_to_other_courses_are_ignored() {
        assert!(assignments(PAGE, "1").is_empty());
    }
}
