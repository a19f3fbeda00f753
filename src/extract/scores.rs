use crate::{course::Grade, error::MarkupError, util::csv_rows};

fn column(header: &[String], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Rows of an assignment's `scores.csv` export.
pub fn grades(csv: &str) -> Result<Vec<Grade>, MarkupError> {
    let mut rows = csv_rows(csv.trim_start_matches('\u{feff}')).into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let email = column(&header, &["Email"]).ok_or(MarkupError::ScoreHeader("Email"))?;
    let name = column(&header, &["Full Name", "Name"]);
    let sid = column(&header, &["SID"]);
    let score = column(&header, &["Total Score", "Score"]);
    let max_points = column(&header, &["Max Points"]);
    let status = column(&header, &["Status"]);

    let res = rows
        .filter_map(|row| {
            let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(|s| s.trim()).unwrap_or_default();
            let email = cell(Some(email));
            if email.is_empty() {
                tracing::warn!(target: "extract", "score row without email: {row:?}");
                return None;
            }
            Some(Grade {
                name: cell(name).to_owned(),
                sid: cell(sid).into(),
                email: email.to_owned(),
                score: cell(score).parse().ok(),
                max_points: cell(max_points).parse().ok(),
                status: cell(status).into(),
            })
        })
        .collect();

    Ok(res)
}
