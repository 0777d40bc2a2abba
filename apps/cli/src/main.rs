//! Med Assist CLI - sign in and keep track of treatments, symptoms and food logs.

mod commands;
mod output;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use health_records::date::parse_date_input;
use health_records::RecordsError;
use session_client::SessionError;
use tracing::debug;

/// Med Assist CLI - manage your health records from the terminal.
#[derive(Parser)]
#[command(name = "medassist")]
#[command(about = "Med Assist CLI for authentication and health records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error), overriding the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// API base URL, overriding the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Act as this user id instead of asking the server who is signed in
    #[arg(long, env = "MEDASSIST_USER_ID", global = true)]
    user_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email (or username) and password
    Login {
        /// Sign in with a username instead of an email
        #[arg(short, long)]
        username: bool,
    },

    /// Create an account
    Register,

    /// Logout and clear the local session
    Logout,

    /// Check authentication status
    Status,

    /// Show the signed-in user
    Whoami,

    /// Show the account and health profile
    Profile,

    /// Show or initialize the client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage treatments
    Treatments {
        #[command(subcommand)]
        command: TreatmentCommands,
    },

    /// Manage daily symptom entries
    Symptoms {
        #[command(subcommand)]
        command: SymptomCommands,
    },

    /// Manage food logs
    #[command(name = "food-logs")]
    FoodLogs {
        #[command(subcommand)]
        command: FoodLogCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    page: u32,
    /// Records per page (defaults to the configured page size)
    #[arg(long)]
    per_page: Option<u32>,
}

#[derive(Subcommand)]
enum TreatmentCommands {
    /// List treatments
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one treatment
    Show {
        /// Treatment ID
        id: i64,
    },
    /// Add a treatment
    Add {
        /// Treatment name
        name: String,
        /// Scheduled date (YYYY-MM-DD)
        #[arg(short, long, value_parser = date_arg)]
        date: Option<DateTime<Utc>>,
        /// Notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Mark as already completed
        #[arg(long)]
        completed: bool,
    },
    /// Change fields of a treatment
    Edit {
        /// Treatment ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New scheduled date (YYYY-MM-DD, or "none" to clear)
        #[arg(short, long, value_parser = clearable_date_arg)]
        date: Option<Clearable<DateTime<Utc>>>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Completion state
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a treatment
    Delete {
        /// Treatment ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum SymptomCommands {
    /// List symptom entries
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one symptom entry
    Show {
        /// Symptom entry ID
        id: i64,
    },
    /// Record a symptom
    Add {
        /// Kind of symptom, e.g. "headache"
        #[arg(short = 't', long = "type")]
        kind: String,
        /// Severity from 1 to 10
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=10))]
        severity: i32,
        /// Date (YYYY-MM-DD)
        #[arg(short, long, value_parser = date_arg)]
        date: Option<DateTime<Utc>>,
        /// Body weight in pounds
        #[arg(short, long)]
        weight: Option<f64>,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Change fields of a symptom entry
    Edit {
        /// Symptom entry ID
        id: i64,
        /// New kind of symptom
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New severity from 1 to 10
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=10))]
        severity: Option<i32>,
        /// New date (YYYY-MM-DD, or "none" to clear)
        #[arg(short, long, value_parser = clearable_date_arg)]
        date: Option<Clearable<DateTime<Utc>>>,
        /// New weight in pounds (or "none" to clear)
        #[arg(short, long, value_parser = clearable_weight_arg)]
        weight: Option<Clearable<f64>>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a symptom entry
    Delete {
        /// Symptom entry ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum FoodLogCommands {
    /// List food logs
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one food log
    Show {
        /// Food log ID
        id: i64,
    },
    /// Record a day's meals
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(short, long, value_parser = date_arg)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        breakfast: Option<String>,
        #[arg(long)]
        lunch: Option<String>,
        #[arg(long)]
        dinner: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Total calories for the day
        #[arg(short, long)]
        calories: Option<f64>,
    },
    /// Change fields of a food log; an empty value clears a meal or the notes
    Edit {
        /// Food log ID
        id: i64,
        /// New date (YYYY-MM-DD, or "none" to clear)
        #[arg(short, long, value_parser = clearable_date_arg)]
        date: Option<Clearable<DateTime<Utc>>>,
        #[arg(long)]
        breakfast: Option<String>,
        #[arg(long)]
        lunch: Option<String>,
        #[arg(long)]
        dinner: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(short, long)]
        calories: Option<f64>,
    },
    /// Delete a food log
    Delete {
        /// Food log ID
        id: i64,
    },
}

/// A value the user may set or explicitly clear with `none`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Clearable<T>(Option<T>);

fn date_arg(value: &str) -> Result<DateTime<Utc>, String> {
    parse_date_input(value).ok_or_else(|| format!("expected a date as YYYY-MM-DD, got `{value}`"))
}

fn is_clear(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "none" | "clear")
}

fn clearable_date_arg(value: &str) -> Result<Clearable<DateTime<Utc>>, String> {
    if is_clear(value) {
        return Ok(Clearable(None));
    }
    date_arg(value).map(|date| Clearable(Some(date)))
}

fn clearable_weight_arg(value: &str) -> Result<Clearable<f64>, String> {
    if is_clear(value) {
        return Ok(Clearable(None));
    }
    match value.trim().parse::<f64>() {
        Ok(weight) if weight.is_finite() && weight > 0.0 => Ok(Clearable(Some(weight))),
        _ => Err(format!("expected a positive weight or `none`, got `{value}`")),
    }
}

/// Error text for the terminal, with a hint when signing in again or
/// simply retrying would help.
fn describe_error(error: &anyhow::Error) -> String {
    let (message, requires_login, transient) =
        if let Some(records) = error.downcast_ref::<RecordsError>() {
            (
                records.user_message(),
                records.requires_login(),
                records.is_transient(),
            )
        } else if let Some(session) = error.downcast_ref::<SessionError>() {
            (
                session.to_string(),
                session.requires_login(),
                session.is_transient(),
            )
        } else {
            (error.to_string(), false, false)
        };

    if requires_login {
        format!("{} Run 'medassist login' to sign in.", message)
    } else if transient {
        format!("{} The server may be unavailable; try again shortly.", message)
    } else {
        message
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    let result = run(cli).await;

    if let Err(e) = result {
        output::print_error(&describe_error(&e), &format);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let context = commands::Context::load(
        cli.log_level.as_deref(),
        cli.api_url.as_deref(),
        cli.user_id.as_deref(),
    )?;
    debug!(api = %context.config.api_base_url, "CLI context ready");

    let format = &cli.format;
    match cli.command {
        Commands::Login { username } => commands::login(&context, username, format).await,
        Commands::Register => commands::register(&context, format).await,
        Commands::Logout => commands::logout(&context, format).await,
        Commands::Status => commands::status(&context, format).await,
        Commands::Whoami => commands::whoami(&context, format).await,
        Commands::Profile => commands::profile(&context, format).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config_show(&context, format),
            ConfigCommands::Init { force } => commands::config_init(&context, force, format),
        },
        Commands::Treatments { command } => match command {
            TreatmentCommands::List { page } => {
                commands::list::<health_records::Treatments>(&context, page, format).await
            }
            TreatmentCommands::Show { id } => {
                commands::show::<health_records::Treatments>(&context, id, format).await
            }
            TreatmentCommands::Add {
                name,
                date,
                notes,
                completed,
            } => {
                let input = health_records::TreatmentInput {
                    treatment_name: name,
                    scheduled_on: date,
                    notes,
                    is_completed: completed,
                };
                commands::add::<health_records::Treatments>(&context, &input, format).await
            }
            TreatmentCommands::Edit {
                id,
                name,
                date,
                notes,
                completed,
            } => {
                let update = health_records::TreatmentUpdate {
                    treatment_name: name,
                    scheduled_on: date.map(|d| d.0),
                    notes,
                    is_completed: completed,
                };
                commands::edit::<health_records::Treatments>(&context, id, &update, format).await
            }
            TreatmentCommands::Delete { id } => {
                commands::delete::<health_records::Treatments>(&context, id, format).await
            }
        },
        Commands::Symptoms { command } => match command {
            SymptomCommands::List { page } => {
                commands::list::<health_records::Symptoms>(&context, page, format).await
            }
            SymptomCommands::Show { id } => {
                commands::show::<health_records::Symptoms>(&context, id, format).await
            }
            SymptomCommands::Add {
                kind,
                severity,
                date,
                weight,
                notes,
            } => {
                let input = health_records::SymptomInput {
                    recorded_on: date,
                    severity,
                    type_of_symptom: kind,
                    weight_lbs: weight,
                    notes,
                };
                commands::add::<health_records::Symptoms>(&context, &input, format).await
            }
            SymptomCommands::Edit {
                id,
                kind,
                severity,
                date,
                weight,
                notes,
            } => {
                let update = health_records::SymptomUpdate {
                    recorded_on: date.map(|d| d.0),
                    severity,
                    type_of_symptom: kind,
                    weight_lbs: weight.map(|w| w.0),
                    notes,
                };
                commands::edit::<health_records::Symptoms>(&context, id, &update, format).await
            }
            SymptomCommands::Delete { id } => {
                commands::delete::<health_records::Symptoms>(&context, id, format).await
            }
        },
        Commands::FoodLogs { command } => match command {
            FoodLogCommands::List { page } => {
                commands::list::<health_records::FoodLogs>(&context, page, format).await
            }
            FoodLogCommands::Show { id } => {
                commands::show::<health_records::FoodLogs>(&context, id, format).await
            }
            FoodLogCommands::Add {
                date,
                breakfast,
                lunch,
                dinner,
                notes,
                calories,
            } => {
                let input = health_records::FoodLogInput {
                    recorded_on: date,
                    breakfast,
                    lunch,
                    dinner,
                    notes,
                    total_calories: calories,
                };
                commands::add::<health_records::FoodLogs>(&context, &input, format).await
            }
            FoodLogCommands::Edit {
                id,
                date,
                breakfast,
                lunch,
                dinner,
                notes,
                calories,
            } => {
                let update = health_records::FoodLogUpdate {
                    recorded_on: date.map(|d| d.0),
                    breakfast: breakfast.map(blank_clears),
                    lunch: lunch.map(blank_clears),
                    dinner: dinner.map(blank_clears),
                    notes: notes.map(blank_clears),
                    total_calories: calories,
                };
                commands::edit::<health_records::FoodLogs>(&context, id, &update, format).await
            }
            FoodLogCommands::Delete { id } => {
                commands::delete::<health_records::FoodLogs>(&context, id, format).await
            }
        },
    }
}

fn blank_clears(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
