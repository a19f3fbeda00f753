use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::selector;
use crate::error::MarkupError;

static SEL_FORM: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static SEL_INPUT: LazyLock<Selector> = LazyLock::new(|| selector("input"));

/// Anti-forgery token of the `/login` form on the landing page.
pub fn authenticity_token(page: &str) -> Result<String, MarkupError> {
    let html = Html::parse_document(page);

    let form = html
        .select(&SEL_FORM)
        .find(|form| form.attr("action") == Some("/login"))
        .ok_or(MarkupError::LoginForm)?;

    form.select(&SEL_INPUT)
        .filter(|input| input.attr("name") == Some("authenticity_token"))
        .find_map(|input| input.attr("value"))
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .ok_or(MarkupError::LoginToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANDING: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/landing.html"));

    #[test]
    fn token_from_login_form() {
        assert_eq!(authenticity_token(LANDING).as_deref(), Ok("tok3n+/abc=="));
    }

    #[test]
    fn other_forms_are_ignored() {
        let page = r#"<form action="/signup"><input name="authenticity_token" value="nope"></form>"#;
        assert_eq!(authenticity_token(page), Err(MarkupError::LoginForm));
    }

    #[test]
    fn form_without_token() {
        let page = r#"<form action="/login"><input name="session[email]"></form>"#;
        assert_eq!(authenticity_token(page), Err(MarkupError::LoginToken));
    }
}
