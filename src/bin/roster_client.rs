use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use roster::client::{MessageKind, MutationOutcome, RosterClient, RosterView, SyncSession};
use roster::models::RosterSnapshot;

#[derive(Debug, Parser)]
#[command(name = "roster-client", version, about = "Browse and change the activity roster")]
struct Cli {
    /// Base url of the roster server.
    #[arg(long, env = "ROSTER_URL", default_value = "http://127.0.0.1:3000")]
    url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every activity with its participants.
    List,
    /// Sign an email up for an activity.
    Signup { activity: String, email: String },
    /// Remove an email from an activity. Asks for confirmation first.
    Unregister {
        activity: String,
        email: String,
        /// Confirm without prompting.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = match RosterClient::new(&cli.url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut session = SyncSession::new(client);

    let ok = match cli.command {
        Command::List => session.load().await,
        Command::Signup { activity, email } => {
            session.submit_signup(&activity, &email).await == MutationOutcome::Applied
        }
        Command::Unregister {
            activity,
            email,
            yes,
        } => {
            let pending = session.request_unregister(&activity, &email);
            if !(yes || ask(&pending.prompt())) {
                pending.decline();
                println!("Cancelled.");
                return ExitCode::SUCCESS;
            }
            pending.confirm().await == MutationOutcome::Applied
        }
    };

    if let Some(message) = session.visible_message() {
        match message.kind {
            MessageKind::Error => eprintln!("{}", message.text),
            _ => println!("{}", message.text),
        }
    }
    match session.view() {
        RosterView::Loaded { roster, .. } if ok => print_roster(roster),
        RosterView::LoadFailed(text) => eprintln!("{}", text),
        _ => {}
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn ask(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_roster(roster: &RosterSnapshot) {
    for (name, activity) in roster {
        println!("{}", name);
        println!("  {}", activity.description);
        println!("  Schedule: {}", activity.schedule);
        println!(
            "  Availability: {} spots left ({}/{})",
            activity.spots_left(),
            activity.participants.len(),
            activity.max_participants
        );
        if activity.participants.is_empty() {
            println!("  No participants yet");
        }
        for email in &activity.participants {
            println!("  - {}", email);
        }
    }
}
