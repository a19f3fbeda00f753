//! Page extractors: raw markup in, records out. Nothing here touches the
//! network, so every function can be driven from a fixture.

use scraper::Selector;

pub mod account;
pub mod assignments;
pub mod login;
pub mod roster;
pub mod scores;

#[allow(clippy::unwrap_used)]
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}
