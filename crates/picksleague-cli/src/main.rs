//! picksleague - command-line access to the picks league API.
//!
//! This binary is the composition root: it reads configuration, picks a
//! session store, builds the one `ApiClient` and runs a single command.

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::try_join;
use picksleague_core::models::Page;
use picksleague_core::{
    ApiClient, ApiResponse, FileStore, KeyValueStore, KeyringStore, SessionStorage, Settings,
    StorageBackend,
};
use serde_json::json;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default page size for the activity command.
const DEFAULT_ACTIVITY_LIMIT: u32 = 20;

const USAGE: &str = "\
Usage: picksleague <command>

Commands:
  login <email>              Sign in (prompts for password)
  logout                     Forget the stored session
  whoami                     Show the signed-in user and their leagues
  leagues                    List your leagues
  join <code>                Join a league with an invite code
  picks <league_id> <week>   Show your picks for a week
  activity <league_id> [n]   Show recent league activity
  endpoint                   Show the resolved API location";

enum Command {
    Login { email: String },
    Logout,
    WhoAmI,
    Leagues,
    Join { code: String },
    Picks { league_id: i64, week: u32 },
    Activity { league_id: i64, limit: u32 },
    Endpoint,
}

/// Positional argument `i`, or a usage error naming it.
fn arg<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| format!("missing <{}>\n\n{}", name, USAGE))
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let command = match args.first().map(String::as_str) {
            Some("login") => Command::Login {
                email: arg(args, 1, "email")?.to_string(),
            },
            Some("logout") => Command::Logout,
            Some("whoami") => Command::WhoAmI,
            Some("leagues") => Command::Leagues,
            Some("join") => Command::Join {
                code: arg(args, 1, "code")?.to_string(),
            },
            Some("picks") => Command::Picks {
                league_id: arg(args, 1, "league_id")?.parse().context("league_id must be a number")?,
                week: arg(args, 2, "week")?.parse().context("week must be a number")?,
            },
            Some("activity") => Command::Activity {
                league_id: arg(args, 1, "league_id")?.parse().context("league_id must be a number")?,
                limit: match args.get(2) {
                    Some(n) => n.parse().context("limit must be a number")?,
                    None => DEFAULT_ACTIVITY_LIMIT,
                },
            },
            Some("endpoint") => Command::Endpoint,
            Some(other) => bail!("unknown command '{}'\n\n{}", other, USAGE),
            None => bail!("{}", USAGE),
        };
        Ok(command)
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr (filtered by RUST_LOG, default `warn`) and, when the log
/// directory is usable, to a daily-rotated file.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "picksleague.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn open_store(settings: &Settings) -> Result<Arc<dyn KeyValueStore>> {
    Ok(match settings.storage {
        StorageBackend::Keyring => Arc::new(KeyringStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(
            settings.data_dir().context("Failed to locate data directory")?,
        )),
    })
}

/// Print an envelope: its data as JSON on success, its message otherwise.
fn print_response<T: serde::Serialize>(response: &ApiResponse<T>, failure: &str) -> Result<()> {
    if !response.success {
        bail!("{}", response.message_or(failure));
    }
    match response.data() {
        Some(data) => println!("{}", serde_json::to_string_pretty(data)?),
        None => println!("{}", response.message_or("OK")),
    }
    Ok(())
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Login { email } => {
            let password = rpassword::prompt_password("Password: ")
                .context("Failed to read password")?;
            let response = client.auth().login(&email, &password).await?;
            if !response.success {
                bail!("{}", response.message_or("Login failed"));
            }
            if let Some(payload) = response.data() {
                println!("Signed in as {}", payload.user.name());
            }
        }
        Command::Logout => {
            client
                .auth()
                .logout()
                .await
                .context("Failed to clear stored session")?;
            println!("Signed out");
        }
        Command::WhoAmI => {
            if !client.session().is_authenticated().await {
                bail!("Not signed in. Run `picksleague login <email>` first.");
            }
            let auth = client.auth();
            let leagues = client.leagues();
            let (me, leagues) = try_join!(auth.me(), leagues.list())?;
            let output = json!({
                "user": me.data(),
                "avatar": me
                    .data()
                    .and_then(|u| u.avatar_url.as_deref())
                    .map(|path| client.endpoint().asset_url(path)),
                "leagues": leagues.data(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Leagues => {
            print_response(&client.leagues().list().await?, "Could not load leagues")?;
        }
        Command::Join { code } => {
            let response = client.leagues().join_by_code(&code).await?;
            if !response.success {
                bail!("{}", response.message_or("Could not join league"));
            }
            match response.data() {
                Some(league) => println!("Joined {}", league.name),
                None => println!("{}", response.message_or("Joined league")),
            }
        }
        Command::Picks { league_id, week } => {
            print_response(
                &client.picks().for_week(league_id, week).await?,
                "Could not load picks",
            )?;
        }
        Command::Activity { league_id, limit } => {
            print_response(
                &client.activity().feed(league_id, &Page::first(limit)).await?,
                "Could not load activity",
            )?;
        }
        Command::Endpoint => {
            println!("api:  {}", client.endpoint().api_url());
            println!("base: {}", client.endpoint().base_origin());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let settings = Settings::from_env().context("Invalid configuration")?;
    let log_guard = init_tracing(settings.log_dir().ok().as_deref());
    info!(mode = %settings.mode, endpoint = %settings.endpoint, "picksleague starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let session = SessionStorage::new(open_store(&settings)?);
    let client = ApiClient::new(settings.endpoint.clone(), session)
        .context("Failed to create API client")?;

    if let Err(e) = run(&client, command).await {
        // Show API failures the way a user should see them
        if let Some(api_error) = e.downcast_ref::<picksleague_core::ApiError>() {
            eprintln!("Error: {}", api_error.user_message());
            if api_error.is_unauthorized() {
                eprintln!("Run `picksleague login <email>` to sign in again.");
            }
            drop(log_guard);
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
}
