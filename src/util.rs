use core::mem::take;

use scraper::ElementRef;

/// All descendant text of `elem`, whitespace-trimmed per node.
pub fn text(elem: ElementRef) -> String {
    elem.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"/courses/12345/"` -> `Some("12345")`
pub fn last_segment(href: &str) -> Option<&str> {
    let path = href.split(['?', '#']).next()?;
    path.rsplit('/').find(|s| !s.is_empty())
}

pub fn has_class(elem: ElementRef, class: &str) -> bool {
    elem.value().classes().any(|c| c == class)
}

/// Quote-aware CSV splitter; blank lines are dropped.
pub fn csv_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if row.len() > 1 || !row[0].is_empty() {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_segment_of_links() {
        assert_eq!(last_segment("/courses/12345"), Some("12345"));
        assert_eq!(last_segment("/courses/12345/"), Some("12345"));
        assert_eq!(last_segment("https://x.test/courses/7?tab=1"), Some("7"));
        assert_eq!(last_segment("/"), None);
        assert_eq!(last_segment(""), None);
    }

    #[test]
    fn csv_quotes_and_crlf() {
        let rows = csv_rows("a,b,c\r\n\"x, y\",\"say \"\"hi\"\"\",\r\n\r\nlast,row,1");
        assert_eq!(
            rows,
            vec![
                vec!["a", "b", "c"],
                vec!["x, y", "say \"hi\"", ""],
                vec!["last", "row", "1"],
            ]
        );
    }
}
