//! Record commands shared by treatments, symptoms and food logs.

use super::Context;
use crate::output::{self, OutputFormat};
use crate::PageArgs;
use anyhow::Result;
use chrono::{DateTime, Utc};
use health_records::date::format_date_input;
use health_records::{FoodLog, RecordCollection, RecordKind, Symptom, Treatment};
use std::sync::Arc;

/// How a record reads in the terminal.
pub trait Describe {
    /// One line for list output.
    fn summary(&self) -> String;
    /// Labelled fields for `show`.
    fn rows(&self) -> Vec<(&'static str, String)>;
}

/// List one page of records.
pub async fn list<K>(context: &Context, page: PageArgs, format: &OutputFormat) -> Result<()>
where
    K: RecordKind,
    K::Record: Describe,
{
    let client = Arc::new(context.records().await?);
    let per_page = page.per_page.unwrap_or(context.config.page_size);
    let mut collection = RecordCollection::<K>::with_page_size(client, per_page);
    collection.set_page(page.page);
    collection.refresh().await?;

    if *format == OutputFormat::Json {
        return output::print_json(&serde_json::json!({
            "items": collection.items(),
            "page": collection.page(),
            "per_page": collection.per_page(),
            "total_count": collection.total_count(),
            "total_pages": collection.total_pages(),
        }));
    }

    if collection.items().is_empty() {
        println!("No {} found.", K::PLURAL);
        return Ok(());
    }

    output::print_heading(&format!(
        "{} (page {} of {}, {} total)",
        capitalize(K::PLURAL),
        collection.page(),
        collection.total_pages().max(1),
        collection.total_count()
    ));
    for record in collection.items() {
        println!("  #{:<6} {}", K::record_id(record), record.summary());
    }
    Ok(())
}

/// Show one record.
pub async fn show<K>(context: &Context, id: i64, format: &OutputFormat) -> Result<()>
where
    K: RecordKind,
    K::Record: Describe,
{
    let record = context.records().await?.get::<K>(id).await?;

    match format {
        OutputFormat::Json => output::print_json(&record),
        OutputFormat::Text => {
            output::print_heading(&format!("{} #{}", capitalize(K::NOUN), id));
            for (label, value) in record.rows() {
                output::print_row(label, &value);
            }
            Ok(())
        }
    }
}

pub async fn add<K: RecordKind>(
    context: &Context,
    input: &K::Create,
    format: &OutputFormat,
) -> Result<()> {
    context.records().await?.create::<K>(input).await?;
    output::print_success(&format!("Added {}", K::NOUN), format);
    Ok(())
}

/// Send only the fields that were given; refuse an empty change.
pub async fn edit<K: RecordKind>(
    context: &Context,
    id: i64,
    update: &K::Update,
    format: &OutputFormat,
) -> Result<()> {
    if is_empty_update(update)? {
        anyhow::bail!("Nothing to change for {} #{}", K::NOUN, id);
    }
    context.records().await?.update::<K>(id, update).await?;
    output::print_success(&format!("Updated {} #{}", K::NOUN, id), format);
    Ok(())
}

pub async fn delete<K: RecordKind>(context: &Context, id: i64, format: &OutputFormat) -> Result<()> {
    context.records().await?.delete::<K>(id).await?;
    output::print_success(&format!("Deleted {} #{}", K::NOUN, id), format);
    Ok(())
}

fn is_empty_update<T: serde::Serialize>(update: &T) -> Result<bool> {
    let value = serde_json::to_value(update)?;
    Ok(value.as_object().is_some_and(|fields| fields.is_empty()))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn date_or_dash(date: Option<&DateTime<Utc>>) -> String {
    match format_date_input(date) {
        empty if empty.is_empty() => "-".to_string(),
        formatted => formatted,
    }
}

fn text_or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "-".to_string(),
    }
}

impl Describe for Treatment {
    fn summary(&self) -> String {
        format!(
            "{:<12} {} {}",
            date_or_dash(self.scheduled_on.as_ref()),
            if self.is_completed { "[x]" } else { "[ ]" },
            output::truncate(&self.treatment_name, 40)
        )
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.treatment_name.clone()),
            ("Scheduled", date_or_dash(self.scheduled_on.as_ref())),
            (
                "Completed",
                (if self.is_completed { "yes" } else { "no" }).to_string(),
            ),
            ("Notes", text_or_dash(Some(&self.notes))),
        ]
    }
}

impl Describe for Symptom {
    fn summary(&self) -> String {
        format!(
            "{:<12} {:>2}/10 {}",
            date_or_dash(self.recorded_on.as_ref()),
            self.severity,
            output::truncate(&self.type_of_symptom, 40)
        )
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Symptom", text_or_dash(Some(&self.type_of_symptom))),
            ("Recorded", date_or_dash(self.recorded_on.as_ref())),
            ("Severity", format!("{}/10", self.severity)),
            (
                "Weight (lbs)",
                self.weight_lbs.map_or_else(|| "-".to_string(), |w| w.to_string()),
            ),
            ("Notes", text_or_dash(Some(&self.notes))),
        ]
    }
}

impl Describe for FoodLog {
    fn summary(&self) -> String {
        let meals = [&self.breakfast, &self.lunch, &self.dinner]
            .into_iter()
            .filter_map(|meal| meal.as_deref())
            .filter(|meal| !meal.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{:<12} {:>6} kcal  {}",
            date_or_dash(self.recorded_on.as_ref()),
            self.total_calories,
            output::truncate(&meals, 40)
        )
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Date", date_or_dash(self.recorded_on.as_ref())),
            ("Breakfast", text_or_dash(self.breakfast.as_deref())),
            ("Lunch", text_or_dash(self.lunch.as_deref())),
            ("Dinner", text_or_dash(self.dinner.as_deref())),
            ("Calories", self.total_calories.to_string()),
            ("Notes", text_or_dash(self.notes.as_deref())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use health_records::{SymptomUpdate, TreatmentUpdate};

    #[test]
    fn test_empty_update_detected() {
        assert!(is_empty_update(&TreatmentUpdate::default()).unwrap());

        let update = SymptomUpdate {
            weight_lbs: Some(None),
            ..Default::default()
        };
        assert!(!is_empty_update(&update).unwrap());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("food logs"), "Food logs");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_treatment_summary() {
        let treatment = Treatment {
            treatment_id: 4,
            treatment_name: "Physio".to_string(),
            scheduled_on: Some(Utc.with_ymd_and_hms(2025, 10, 24, 0, 0, 0).unwrap()),
            notes: String::new(),
            is_completed: true,
        };
        assert_eq!(treatment.summary(), "2025-10-24   [x] Physio");
        assert_eq!(treatment.rows()[3], ("Notes", "-".to_string()));
    }

    #[test]
    fn test_food_log_summary_skips_blank_meals() {
        let log = FoodLog {
            foodlog_id: 1,
            recorded_on: None,
            breakfast: Some("oats".to_string()),
            lunch: Some("  ".to_string()),
            dinner: Some("soup".to_string()),
            notes: None,
            total_calories: 1200.0,
        };
        assert_eq!(log.summary(), "-              1200 kcal  oats, soup");
    }
}
