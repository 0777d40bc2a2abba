//! Profile command.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;

/// Show the account fields and, when filled in, the health details.
pub async fn profile(context: &Context, format: &OutputFormat) -> Result<()> {
    let records = context.records().await?;
    let profile = records.profile().await?;

    if *format == OutputFormat::Json {
        return output::print_json(&profile);
    }

    let user = &profile.user;
    output::print_heading("Account");
    output::print_row("Name", &user.display_name());
    output::print_row("Username", user.username().unwrap_or("-"));
    output::print_row("Email", user.email().unwrap_or("-"));

    output::print_heading("Health details");
    match &profile.info {
        None => println!("  No health details on file."),
        Some(info) => {
            output::print_row("Age", &info.age.to_string());
            output::print_row("Gender", or_dash(&info.gender));
            output::print_row("Weight (lbs)", &info.weight_lbs.to_string());
            output::print_row(
                "Height",
                &format!("{}' {}\"", info.height_ft, info.height_in),
            );
            output::print_row("Diagnoses", or_dash(&info.current_diagnoses));
            output::print_row("History", or_dash(&info.medical_history));
            output::print_row("Insurance", or_dash(&info.insurance));
        }
    }
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
