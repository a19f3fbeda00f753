use compact_str::CompactString;
use reqwest::StatusCode;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The HTTP client could not be set up (bad user agent, TLS backend).
    #[error("cannot build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("login rejected (status {status})")]
    AuthRejected { status: StatusCode },
    #[error("not logged in")]
    NotLoggedIn,
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: StatusCode },
    #[error("unknown course {0}")]
    UnknownCourse(CompactString),
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

/// The page did not have the shape the extractors expect.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("no form with action \"/login\"")]
    LoginForm,
    #[error("login form has no authenticity_token")]
    LoginToken,
    #[error("account page has no course heading")]
    MissingHeading,
    #[error("course box has no usable link")]
    CourseLink,
    #[error("course {course}: missing {field}")]
    CourseField {
        course: CompactString,
        field: &'static str,
    },
    #[error("course {course}: term not found")]
    MissingTerm { course: CompactString },
    #[error("roster row {row}: bad {field}")]
    RosterField { row: usize, field: &'static str },
    #[error("score export has no {0} column")]
    ScoreHeader(&'static str),
}

impl Error {
    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
