//! Health status command.

use anyhow::Result;
use console::style;

use shortlist_core::repository::shortlist::ShortlistRepository;
use shortlist_types::health::{HealthCheck, HealthReport, HealthStatus};

use crate::state::AppState;

/// Display the same health report the `/health` endpoint serves.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let report = state.health_report().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    render(state, &report);
    Ok(())
}

fn render(state: &AppState, report: &HealthReport) {
    let headline = match report.status {
        HealthStatus::Healthy => style("healthy").green().bold(),
        HealthStatus::Degraded => style("degraded").yellow().bold(),
    };

    println!();
    println!(
        "  {} Shortlist v{} is {}",
        style("⚡").bold(),
        report.system.version,
        headline
    );
    println!();

    println!("  {}", style("── Checks ──").dim());
    println!("  {} Backend   {}", mark(&report.checks.backend), report.checks.backend.message);
    println!("  {} Database  {}", mark(&report.checks.db), report.checks.db.message);
    println!("  {} LLM       {}", mark(&report.checks.llm), report.checks.llm.message);
    println!();

    println!("  {}", style("── Storage ──").dim());
    println!(
        "  Backend:    {}",
        style(state.shortlist_service.repo().backend_name()).dim()
    );
    match &report.metadata {
        Some(meta) => {
            println!("  Shortlists: {}", style(meta.shortlist_count).bold());
            println!("  Size:       {:.2} MB", meta.db_size_mb);
        }
        None => println!("  Shortlists: {}", style("unavailable").yellow()),
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir:   {}", style(state.data_dir.display()).dim());
    println!("  Platform:   {}", report.system.platform);
    println!("  Checked in: {} ms", report.response_time_ms);
    println!();
}

fn mark(check: &HealthCheck) -> String {
    if check.healthy {
        format!("{}", style("✓").green())
    } else {
        format!("{}", style("✗").red())
    }
}
