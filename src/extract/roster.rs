use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use super::selector;
use crate::{
    course::{Member, MemberRole},
    error::MarkupError,
    util::text,
};

static SEL_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr.rosterRow"));
static SEL_EDIT: LazyLock<Selector> = LazyLock::new(|| selector("button.rosterCell--editIcon"));
static SEL_ROLE: LazyLock<Selector> = LazyLock::new(|| selector("select option[selected]"));
static SEL_SUBMISSIONS: LazyLock<Selector> = LazyLock::new(|| selector("td.rosterCell--submissions"));

/// Own text of `elem`, ignoring nested elements such as the edit button.
fn own_text(elem: ElementRef) -> String {
    let mut s = String::new();
    for node in elem.children() {
        if let Node::Text(t) = node.value() {
            let t = t.trim();
            if !t.is_empty() {
                if !s.is_empty() {
                    s.push(' ');
                }
                s.push_str(t);
            }
        }
    }
    s
}

pub fn members(page: &str) -> Result<Vec<Member>, MarkupError> {
    let html = Html::parse_document(page);

    html.select(&SEL_ROW)
        .enumerate()
        .map(|(idx, row)| member(idx, row))
        .collect()
}

fn member(idx: usize, row: ElementRef) -> Result<Member, MarkupError> {
    let cells = row
        .child_elements()
        .filter(|c| c.value().name() == "td")
        .collect::<Vec<_>>();
    let Some(&first) = cells.first() else {
        return Err(MarkupError::RosterField { row: idx, field: "name" });
    };

    let name = own_text(first);
    if name.is_empty() {
        return Err(MarkupError::RosterField { row: idx, field: "name" });
    }

    let edit = row.select(&SEL_EDIT).next();
    let id = edit.and_then(|b| b.attr("data-id")).map(Into::into);

    let email = edit
        .and_then(|b| b.attr("data-email"))
        .map(ToOwned::to_owned)
        .or_else(|| {
            cells[1..]
                .iter()
                .map(|c| text(*c))
                .find(|t| t.contains('@'))
        })
        .ok_or(MarkupError::RosterField { row: idx, field: "email" })?;

    let role = row
        .select(&SEL_ROLE)
        .next()
        .and_then(|o| MemberRole::parse(&text(o)))
        .or_else(|| cells[1..].iter().find_map(|c| MemberRole::parse(&text(*c))))
        .ok_or(MarkupError::RosterField { row: idx, field: "role" })?;

    let submissions = row
        .select(&SEL_SUBMISSIONS)
        .next()
        .and_then(|c| text(c).parse().ok());

    Ok(Member {
        id,
        name,
        email,
        role,
        submissions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/roster.html"));

    #[test]
    fn roster_rows() {
        let roster = members(PAGE).unwrap();
        assert_eq!(roster.len(), 3);

        assert_eq!(roster[0].name, "Ada Lovelace");
        assert_eq!(roster[0].id.as_deref(), Some("501"));
        assert_eq!(roster[0].role, MemberRole::Instructor);
        assert_eq!(roster[0].submissions, Some(0));

        assert_eq!(roster[1].email, "alan@example.edu");
        assert_eq!(roster[1].role, MemberRole::Student);
        assert_eq!(roster[1].submissions, Some(3));

        assert_eq!(roster[2].id, None);
        assert_eq!(roster[2].email, "grace@example.edu");
        assert_eq!(roster[2].role, MemberRole::Ta);
        assert_eq!(roster[2].submissions, None);
    }

    #[test]
    fn unknown_role_is_an_error() {
        let page = r#"<table><tr class="rosterRow"><td>Someone</td><td>s@x.y</td><td>Dean</td></tr></table>"#;
        assert_eq!(members(page), Err(MarkupError::RosterField { row: 0, field: "role" }));
    }
}
