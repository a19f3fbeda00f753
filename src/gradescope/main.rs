use core::time::Duration;

use anyhow::Context as _;
use gscr::{Config, Connection, Course};

#[derive(clap::Parser)]
struct Args {
    #[arg(long, env = "GRADESCOPE_EMAIL")]
    email: String,
    /// Prompted for when not given.
    #[arg(long, env = "GRADESCOPE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long, env = "GRADESCOPE_URL")]
    base_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
    /// Print JSON instead of a summary.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List instructor and student courses.
    Account,
    /// Load assignments, roster and grades of one course.
    Course {
        #[arg(value_name = "course id")]
        cid: String,
    },
}

fn summary(course: &Course) {
    println!("\n### {course}");

    if let Some(assignments) = &course.assignments {
        println!("--Assignments--");
        for a in assignments {
            println!("  #{} {}", a.id, a.name);
        }
    }

    if let Some(roster) = &course.roster {
        println!("--Roster--");
        for m in roster {
            println!("  {} <{}> {:?}", m.name, m.email, m.role);
        }
    }

    if let Some(grades) = &course.grades {
        println!("--Grades--");
        for (email, by_assignment) in grades {
            for (aid, g) in by_assignment {
                let assignment = course.assignment(aid).map_or(aid.as_str(), |a| a.name.as_str());
                let score = g.score.map_or_else(|| "-".to_owned(), |s| s.to_string());
                let max = g.max_points.map_or_else(|| "-".to_owned(), |s| s.to_string());
                println!("  {email} {assignment}: {score}/{max} ({})", g.status);
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    pretty_env_logger::init_timed();

    let args = Args::parse();

    let mut config = Config::default().with_timeout(Duration::from_secs(args.timeout));
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url);
    }

    let password = match args.password {
        Some(p) => p,
        None => rpassword::prompt_password(format!("Password for {}: ", args.email))?,
    };

    let mut conn = Connection::new(config)?;
    if let Err(e) = conn.login(&args.email, &password).await {
        if e.is_transient() {
            tracing::warn!(target: "main", "portal unreachable, try again later");
        }
        return Err(e).with_context(|| format!("login as {}", args.email));
    }
    tracing::info!(target: "main", "state: {:?}", conn.state());

    let account = conn.get_account().await?;

    match args.command {
        Commands::Account => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(account)?);
            } else {
                for course in account.courses() {
                    println!("{course}");
                }
            }
        }
        Commands::Course { cid } => {
            conn.load_course(&cid).await?;
            let course = conn
                .account()
                .and_then(|a| a.course(&cid))
                .ok_or_else(|| anyhow::anyhow!("course {cid} vanished"))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(course)?);
            } else {
                summary(course);
            }
        }
    }

    Ok(())
}
