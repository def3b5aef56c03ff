//! Markdown report for a stored shortlist.

use std::fmt::Write;

use shortlist_types::shortlist::{Shortlist, VendorResult};

/// Escape text for use inside a markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn tick(matched: bool) -> &'static str {
    if matched { "✅" } else { "❌" }
}

/// Render a shortlist as a downloadable markdown document.
///
/// Apply [`Shortlist::with_generated_at_fallback`] first so the timestamp
/// line is always present.
pub fn render_markdown(shortlist: &Shortlist) -> String {
    let results = &shortlist.results;
    let mut md = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(md, "# Vendor Shortlist Report\n");
    let _ = writeln!(md, "**Need:** {}\n", shortlist.need);
    if let Some(generated_at) = results.generated_at {
        let _ = writeln!(
            md,
            "**Generated:** {}\n",
            generated_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    if results.quota_exhausted == Some(true) {
        let _ = writeln!(
            md,
            "> LLM quota was exhausted; these are static demo results.\n"
        );
    }

    let _ = writeln!(md, "## Requirements\n");
    let _ = writeln!(md, "| Requirement | Weight |");
    let _ = writeln!(md, "|---|---|");
    for requirement in &shortlist.requirements {
        let weight = shortlist
            .weights
            .get(requirement)
            .copied()
            .unwrap_or(shortlist_types::shortlist::DEFAULT_WEIGHT);
        let _ = writeln!(md, "| {} | {}/10 |", cell(requirement), weight);
    }
    md.push('\n');

    if !shortlist.excluded_vendors.is_empty() {
        let _ = writeln!(
            md,
            "**Excluded vendors:** {}\n",
            shortlist.excluded_vendors.join(", ")
        );
    }

    if !results.summary.is_empty() {
        let _ = writeln!(md, "## Summary\n\n{}\n", results.summary);
    }

    if !results.vendors.is_empty() {
        write_comparison(&mut md, &shortlist.requirements, &results.vendors);
    }

    for (rank, vendor) in results.vendors.iter().enumerate() {
        write_vendor(&mut md, rank + 1, vendor);
    }

    if !results.recommendation.is_empty() {
        let _ = writeln!(md, "## Recommendation\n\n{}\n", results.recommendation);
    }

    md
}

/// Vendor-by-requirement matrix.
fn write_comparison(md: &mut String, requirements: &[String], vendors: &[VendorResult]) {
    let _ = writeln!(md, "## Comparison\n");
    let mut header = String::from("| Vendor | Score | Price |");
    let mut rule = String::from("|---|---|---|");
    for requirement in requirements {
        let _ = write!(header, " {} |", cell(requirement));
        rule.push_str("---|");
    }
    let _ = writeln!(md, "{header}\n{rule}");

    for vendor in vendors {
        let mut row = format!(
            "| {} | {}/100 | {} |",
            cell(&vendor.name),
            vendor.score,
            cell(&vendor.price_range)
        );
        for requirement in requirements {
            let mark = vendor
                .matched_features
                .iter()
                .find(|f| &f.requirement == requirement)
                .map(|f| tick(f.matched))
                .unwrap_or("–");
            let _ = write!(row, " {mark} |");
        }
        let _ = writeln!(md, "{row}");
    }
    md.push('\n');
}

fn write_vendor(md: &mut String, rank: usize, vendor: &VendorResult) {
    let _ = writeln!(md, "## {rank}. {} ({}/100)\n", vendor.name, vendor.score);
    if !vendor.website.is_empty() {
        let _ = writeln!(md, "**Website:** {}  ", vendor.website);
    }
    if !vendor.price_range.is_empty() {
        let _ = writeln!(md, "**Price:** {}  ", vendor.price_range);
    }
    if !vendor.summary.is_empty() {
        let _ = writeln!(md, "\n{}", vendor.summary);
    }
    md.push('\n');

    if !vendor.matched_features.is_empty() {
        let _ = writeln!(md, "### Features\n");
        for feature in &vendor.matched_features {
            let _ = write!(md, "- {} **{}**", tick(feature.matched), feature.requirement);
            if !feature.detail.is_empty() {
                let _ = write!(md, ": {}", feature.detail);
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if !vendor.risks.is_empty() {
        let _ = writeln!(md, "### Risks\n");
        for risk in &vendor.risks {
            let _ = writeln!(md, "- {risk}");
        }
        md.push('\n');
    }

    if !vendor.evidence_links.is_empty() {
        let _ = writeln!(md, "### Evidence\n");
        for link in &vendor.evidence_links {
            let _ = write!(md, "- [{}]({})", link.title, link.url);
            if !link.snippet.is_empty() {
                let _ = write!(md, ": {}", link.snippet);
            }
            md.push('\n');
        }
        md.push('\n');
    }
}
