use compact_str::CompactString;
use hashbrown::HashMap;
use reqwest::StatusCode;

use crate::{
    account::Account,
    config::Config,
    course::{Assignment, Grade, Member, Role},
    error::{Error, Result},
    extract,
    scrape::Session,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnState {
    Init,
    LoggedIn,
}

/// One portal session: the cookie jar, the login flag and, once logged in,
/// the account the courses are parsed into.
pub struct Connection {
    session: Session,
    state: ConnState,
    account: Option<Account>,
}

impl Connection {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            session: Session::new(config)?,
            state: ConnState::Init,
            account: None,
        })
    }

    pub const fn state(&self) -> ConnState {
        self.state
    }

    pub const fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub const fn account_mut(&mut self) -> Option<&mut Account> {
        self.account.as_mut()
    }

    fn ensure_logged_in(&self) -> Result<()> {
        match self.state {
            ConnState::LoggedIn => Ok(()),
            ConnState::Init => Err(Error::NotLoggedIn),
        }
    }

    /// Submits the login form. Only a `302 Found` answer counts as success;
    /// the redirect target is not inspected.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let landing = self.session.get("/").await?;
        let token = extract::login::authenticity_token(&landing.body)?;

        let form = [
            ("utf8", "✓"),
            ("session[email]", email),
            ("session[password]", password),
            ("session[remember_me]", "0"),
            ("commit", "Log In"),
            ("session[remember_me_sso]", "0"),
            ("authenticity_token", token.as_str()),
        ];
        let status = self.session.post_form("/login", &form).await?;

        if status != StatusCode::FOUND {
            tracing::warn!(target: "login", "\x1b[31mlogin as {email} rejected: {status}\x1b[0m");
            return Err(Error::AuthRejected { status });
        }

        tracing::info!(target: "login", "\x1b[32mlogged in as \x1b[36m{email}\x1b[0m");
        self.state = ConnState::LoggedIn;
        self.account = Some(Account::new(email));
        Ok(())
    }

    /// Forgets the account and every cookie.
    pub fn logout(&mut self) -> Result<()> {
        self.session.reset()?;
        self.state = ConnState::Init;
        self.account = None;
        Ok(())
    }

    /// Re-reads the account page, replacing all known courses. On error the
    /// previous courses are left as they were.
    pub async fn get_account(&mut self) -> Result<&Account> {
        self.ensure_logged_in()?;
        let Some(account) = self.account.as_mut() else {
            return Err(Error::NotLoggedIn);
        };

        let page = self.session.get("/account").await?;
        let courses = extract::account::courses(&page.body)?;

        account.clear();
        account.fetched = page.date;
        for c in courses {
            tracing::info!(target: "account", "{:?} \x1b[36m{}\x1b[0m {} ({}) [{}]", c.role, c.cid, c.name, c.shortname, c.term);
            account.add_class(c.cid, c.name, c.shortname, c.term, c.role);
        }
        tracing::info!(
            target: "account",
            "\x1b[36m{} instructor, {} student courses\x1b[0m",
            account.instructor_courses.len(),
            account.student_courses.len(),
        );

        Ok(&*account)
    }

    pub async fn get_assignments(&self, cid: &str) -> Result<Vec<Assignment>> {
        self.ensure_logged_in()?;
        let page = self.session.get(&format!("/courses/{cid}/assignments")).await?;
        Ok(extract::assignments::assignments(&page.body, cid))
    }

    pub async fn get_roster(&self, cid: &str) -> Result<Vec<Member>> {
        self.ensure_logged_in()?;
        let page = self.session.get(&format!("/courses/{cid}/memberships")).await?;
        Ok(extract::roster::members(&page.body)?)
    }

    pub async fn get_scores(&self, cid: &str, aid: &str) -> Result<Vec<Grade>> {
        self.ensure_logged_in()?;
        let page = self
            .session
            .get(&format!("/courses/{cid}/assignments/{aid}/scores.csv"))
            .await?;
        Ok(extract::scores::grades(&page.body)?)
    }

    /// Fetches the assignments of a known course and stores them on it. For
    /// instructor courses the roster and every assignment's scores are
    /// fetched too; those pages are closed to students.
    pub async fn load_course(&mut self, cid: &str) -> Result<()> {
        self.ensure_logged_in()?;
        let Some(role) = self.account.as_ref().and_then(|a| a.course(cid)).map(|c| c.role) else {
            return Err(Error::UnknownCourse(cid.into()));
        };

        let assignments = self.get_assignments(cid).await?;

        let (roster, grades) = if role == Role::Instructor {
            let roster = self.get_roster(cid).await?;

            let mut grades: HashMap<String, HashMap<CompactString, Grade>> = HashMap::new();
            for assignment in &assignments {
                for grade in self.get_scores(cid, &assignment.id).await? {
                    grades
                        .entry(grade.email.clone())
                        .or_default()
                        .insert(assignment.id.clone(), grade);
                }
            }

            tracing::info!(
                target: "course",
                "\x1b[36m[#{cid}] {} assignments, {} members, {} graded people\x1b[0m",
                assignments.len(),
                roster.len(),
                grades.len(),
            );
            (Some(roster), Some(grades))
        } else {
            tracing::info!(target: "course", "\x1b[36m[#{cid}] {} assignments (student)\x1b[0m", assignments.len());
            (None, None)
        };

        let course = self
            .account
            .as_mut()
            .and_then(|a| a.course_mut(cid))
            .ok_or_else(|| Error::UnknownCourse(cid.into()))?;
        course.assignments = Some(assignments);
        course.roster = roster;
        course.grades = grades;
        Ok(())
    }
}
