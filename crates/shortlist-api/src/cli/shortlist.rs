//! Shortlist CLI commands: build, show, history.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde_json::{Map, Value, json};

use shortlist_core::export::markdown::render_markdown;
use shortlist_core::validate::validate_request;
use shortlist_types::error::ShortlistError;
use shortlist_types::shortlist::{Shortlist, ShortlistId, ShortlistRequest, VendorResult};

use crate::state::AppState;

/// Assemble the same loosely-typed body the REST endpoint accepts, so CLI
/// input goes through identical validation.
fn build_request(
    need: String,
    requirements: Vec<String>,
    weights: Vec<(String, f64)>,
    excluded: Vec<String>,
) -> ShortlistRequest {
    let weights: Map<String, Value> = weights
        .into_iter()
        .map(|(requirement, weight)| (requirement, json!(weight)))
        .collect();

    ShortlistRequest {
        need: Some(Value::String(need)),
        requirements: Some(json!(requirements)),
        weights: Some(Value::Object(weights)),
        excluded_vendors: Some(json!(excluded)),
    }
}

/// Build a shortlist and save it under `session`.
///
/// # Examples
///
/// ```bash
/// shortlist build "CRM for a 20-person sales team" -r "Email sync" -w "Email sync=9" -x Pipedrive
/// ```
pub async fn build(
    state: &AppState,
    need: String,
    requirements: Vec<String>,
    weights: Vec<(String, f64)>,
    excluded: Vec<String>,
    session: &str,
    json: bool,
) -> Result<()> {
    let request = build_request(need, requirements, weights, excluded);
    let input = validate_request(&request)?;

    if !json && state.shortlist_service.is_static_mode() {
        eprintln!(
            "  {} GROQ_API_KEY not set, using the built-in sample vendors.",
            style("!").yellow().bold()
        );
    }

    let shortlist = state.shortlist_service.build(input, session).await?;

    if json {
        let created = json!({ "id": shortlist.id, "result": shortlist.results });
        println!("{}", serde_json::to_string_pretty(&created)?);
        return Ok(());
    }

    println!();
    println!("  {} Shortlist saved", style("✓").green().bold());
    print_shortlist(&shortlist);
    println!(
        "  Export with {}",
        style(format!("shortlist show {} --markdown", shortlist.id)).cyan()
    );
    println!();

    Ok(())
}

/// Show one saved shortlist as a table, JSON or the markdown report.
pub async fn show(
    state: &AppState,
    id: &str,
    markdown: bool,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let id: ShortlistId = id.parse().map_err(|_| ShortlistError::NotFound)?;
    let shortlist = state.shortlist_service.get(&id).await?;

    if let Some(path) = output {
        tokio::fs::write(path, render_markdown(&shortlist)).await?;
        if !json {
            println!(
                "  {} Report written to {}",
                style("✓").green().bold(),
                style(path.display()).cyan()
            );
        }
        return Ok(());
    }

    if markdown {
        print!("{}", render_markdown(&shortlist));
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&shortlist)?);
        return Ok(());
    }

    print_shortlist(&shortlist);
    Ok(())
}

/// List the most recent shortlists of `session`, newest first.
pub async fn history(state: &AppState, session: &str, json: bool) -> Result<()> {
    let entries = state.shortlist_service.history(session).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  No shortlists yet for session '{}'. Build one with {}",
            session,
            style("shortlist build \"<need>\"").cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Need", "Top vendor", "Vendors", "Created"]);

    for entry in &entries {
        let top = entry
            .results
            .vendors
            .first()
            .map(|v| format!("{} ({})", v.name, v.score))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(entry.id.short()).fg(Color::Cyan),
            Cell::new(&entry.need),
            Cell::new(top),
            Cell::new(entry.results.vendors.len()),
            Cell::new(entry.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} shortlist(s) in session '{}'",
        style(entries.len()).bold(),
        session
    );
    println!();

    Ok(())
}

fn print_shortlist(shortlist: &Shortlist) {
    let results = &shortlist.results;

    println!();
    println!("  {}  {}", style("Need:").bold(), style(&shortlist.need).cyan());
    println!("  {}    {}", style("ID:").bold(), style(&shortlist.id).dim());
    if results.quota_exhausted == Some(true) {
        println!(
            "  {} LLM quota exhausted, showing sample vendors.",
            style("!").yellow().bold()
        );
    }
    println!();

    if !results.summary.is_empty() {
        println!("  {}", results.summary);
        println!();
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Vendor", "Score", "Price", "Matched", "Website"]);

    for (rank, vendor) in results.vendors.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&vendor.name),
            Cell::new(vendor.score).fg(score_color(vendor.score)),
            Cell::new(&vendor.price_range),
            Cell::new(matched_summary(vendor)),
            Cell::new(&vendor.website).fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");
    println!();

    if !results.recommendation.is_empty() {
        println!("  {} {}", style("Recommendation:").bold(), results.recommendation);
        println!();
    }
}

fn score_color(score: u8) -> Color {
    match score {
        80.. => Color::Green,
        60..=79 => Color::Yellow,
        _ => Color::Red,
    }
}

fn matched_summary(vendor: &VendorResult) -> String {
    let matched = vendor.matched_features.iter().filter(|f| f.matched).count();
    format!("{matched}/{}", vendor.matched_features.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_passes_validation() {
        let request = build_request(
            "CRM for a small team".to_string(),
            vec!["Email sync".to_string(), "Reports".to_string()],
            vec![("Reports".to_string(), 9.0)],
            vec!["Pipedrive".to_string()],
        );

        let input = validate_request(&request).unwrap();
        assert_eq!(input.requirements, vec!["Email sync", "Reports"]);
        assert_eq!(input.weight("Reports"), 9);
        assert_eq!(input.weight("Email sync"), 5);
        assert_eq!(input.excluded_vendors, vec!["Pipedrive"]);
    }

    #[test]
    fn test_build_request_short_need_fails_validation() {
        let request = build_request("CRM".to_string(), vec![], vec![], vec![]);
        assert!(matches!(
            validate_request(&request),
            Err(ShortlistError::Validation(_))
        ));
    }

    #[test]
    fn test_score_color() {
        assert_eq!(score_color(91), Color::Green);
        assert_eq!(score_color(67), Color::Yellow);
        assert_eq!(score_color(12), Color::Red);
    }
}
