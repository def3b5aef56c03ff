//! Static vendor catalogue used when no LLM is available.
//!
//! Five well-known vendors with fixed scores. A requirement counts as
//! matched when its weight is at most 7 or its position is even, which
//! gives every demo result a mix of hits and misses.

use chrono::Utc;

use shortlist_types::shortlist::{
    EvidenceLink, FeatureMatch, ShortlistInput, ShortlistResult, VendorResult,
};

struct StaticVendor {
    name: &'static str,
    website: &'static str,
    summary: &'static str,
    price_range: &'static str,
    score: u8,
    risks: [&'static str; 2],
    evidence: [(&'static str, &'static str, &'static str); 2],
}

const STATIC_VENDORS: [StaticVendor; 5] = [
    StaticVendor {
        name: "Salesforce",
        website: "https://www.salesforce.com",
        summary: "Industry-leading CRM and enterprise platform with an extensive ecosystem of apps, integrations, and support options.",
        price_range: "$25–$300 /user/mo",
        score: 91,
        risks: [
            "Steeper learning curve for non-technical teams.",
            "Cost can escalate quickly for larger organisations.",
        ],
        evidence: [
            (
                "Salesforce Pricing",
                "https://www.salesforce.com/editions-pricing/",
                "Transparent tier-based pricing across all Salesforce clouds.",
            ),
            (
                "Salesforce AppExchange",
                "https://appexchange.salesforce.com",
                "Thousands of pre-built integrations covering most business needs.",
            ),
        ],
    },
    StaticVendor {
        name: "HubSpot",
        website: "https://www.hubspot.com",
        summary: "All-in-one growth platform covering CRM, marketing, sales, and service with an intuitive UI and generous free tier.",
        price_range: "Free – $1,200/mo",
        score: 83,
        risks: [
            "Advanced features are gated behind higher-priced tiers.",
            "Reporting depth is limited compared to enterprise tools.",
        ],
        evidence: [
            (
                "HubSpot Pricing",
                "https://www.hubspot.com/pricing",
                "Modular pricing lets teams start free and scale as needed.",
            ),
            (
                "HubSpot Integrations",
                "https://ecosystem.hubspot.com/marketplace/apps",
                "Over 1,000 integrations available in the HubSpot marketplace.",
            ),
        ],
    },
    StaticVendor {
        name: "Notion",
        website: "https://www.notion.so",
        summary: "Flexible all-in-one workspace for notes, docs, wikis, and lightweight project management used by teams of all sizes.",
        price_range: "Free – $16 /user/mo",
        score: 74,
        risks: [
            "Not a dedicated project management tool; complex workflows may feel limited.",
            "Offline support is minimal.",
        ],
        evidence: [
            (
                "Notion Pricing",
                "https://www.notion.so/pricing",
                "Affordable plans with a solid free tier for individuals and small teams.",
            ),
            (
                "Notion Integrations",
                "https://www.notion.so/integrations",
                "Native and Zapier-powered integrations with popular productivity tools.",
            ),
        ],
    },
    StaticVendor {
        name: "Monday.com",
        website: "https://monday.com",
        summary: "Visual work-management platform with strong collaboration features, automations, and boards suited to diverse workflows.",
        price_range: "$9–$19 /seat/mo",
        score: 67,
        risks: [
            "Free plan is very limited (2 seats only).",
            "Per-seat pricing becomes expensive for larger teams.",
        ],
        evidence: [
            (
                "Monday.com Pricing",
                "https://monday.com/pricing",
                "Tiered seat-based pricing with annual discount options.",
            ),
            (
                "Monday.com Integrations",
                "https://monday.com/integrations",
                "200+ integrations including Slack, Google Drive, and GitHub.",
            ),
        ],
    },
    StaticVendor {
        name: "Airtable",
        website: "https://www.airtable.com",
        summary: "Hybrid spreadsheet-database platform with powerful views, automations, and an API-first design for custom workflows.",
        price_range: "Free – $20 /user/mo",
        score: 58,
        risks: [
            "Record limits on free and lower-tier plans can be restrictive.",
            "Advanced automations require higher plans.",
        ],
        evidence: [
            (
                "Airtable Pricing",
                "https://airtable.com/pricing",
                "Plan comparison with record limits and automation quotas.",
            ),
            (
                "Airtable API Docs",
                "https://airtable.com/developers/web/api/introduction",
                "REST API and webhooks for building custom integrations.",
            ),
        ],
    },
];

/// Build the demo shortlist for a request.
pub fn static_result(input: &ShortlistInput) -> ShortlistResult {
    let vendors: Vec<VendorResult> = STATIC_VENDORS
        .iter()
        .map(|v| VendorResult {
            name: v.name.to_string(),
            website: v.website.to_string(),
            summary: v.summary.to_string(),
            score: v.score,
            price_range: v.price_range.to_string(),
            matched_features: input
                .requirements
                .iter()
                .enumerate()
                .map(|(i, requirement)| {
                    let matched = input.weight(requirement) <= 7 || i % 2 == 0;
                    FeatureMatch {
                        requirement: requirement.clone(),
                        matched,
                        detail: if matched {
                            format!("{} supports this requirement out of the box.", v.name)
                        } else {
                            format!(
                                "{} requires a third-party add-on or custom configuration for this requirement.",
                                v.name
                            )
                        },
                    }
                })
                .collect(),
            risks: v.risks.iter().map(|r| r.to_string()).collect(),
            evidence_links: v
                .evidence
                .iter()
                .map(|(title, url, snippet)| EvidenceLink {
                    title: title.to_string(),
                    url: url.to_string(),
                    snippet: snippet.to_string(),
                })
                .collect(),
        })
        .collect();

    ShortlistResult {
        summary: format!(
            "Static demo results for: \"{}\". These are illustrative vendors — add your GROQ_API_KEY to get live AI-researched results tailored to your exact requirements.",
            input.need
        ),
        recommendation: format!(
            "Based on the requirements provided, {} scores highest in this demo. Connect your GROQ_API_KEY to receive real, AI-researched recommendations.",
            STATIC_VENDORS[0].name
        ),
        vendors,
        generated_at: Some(Utc::now()),
        quota_exhausted: None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn input() -> ShortlistInput {
        ShortlistInput {
            need: "Sales CRM".to_string(),
            requirements: vec![
                "Pipeline view".to_string(),
                "Email sync".to_string(),
                "Forecasting".to_string(),
                "Mobile app".to_string(),
            ],
            weights: BTreeMap::from([
                ("Pipeline view".to_string(), 9),
                ("Email sync".to_string(), 9),
                ("Forecasting".to_string(), 4),
                ("Mobile app".to_string(), 7),
            ]),
            excluded_vendors: vec![],
        }
    }

    #[test]
    fn test_five_vendors_with_fixed_scores() {
        let result = static_result(&input());
        let scores: Vec<u8> = result.vendors.iter().map(|v| v.score).collect();
        assert_eq!(scores, vec![91, 83, 74, 67, 58]);
        assert_eq!(result.vendors[0].name, "Salesforce");
        assert!(result.summary.contains("Sales CRM"));
        assert!(result.recommendation.contains("Salesforce"));
        assert!(result.quota_exhausted.is_none());
    }

    #[test]
    fn test_match_rule() {
        let result = static_result(&input());
        let matched: Vec<bool> = result.vendors[0]
            .matched_features
            .iter()
            .map(|f| f.matched)
            .collect();
        // index 0 even, index 1 heavy and odd, index 2 light, index 3 weight 7
        assert_eq!(matched, vec![true, false, true, true]);
        assert!(
            result.vendors[0].matched_features[1]
                .detail
                .contains("third-party add-on")
        );
    }

    #[test]
    fn test_demo_copy_is_verbatim() {
        let result = static_result(&input());
        let prices: Vec<&str> = result.vendors.iter().map(|v| v.price_range.as_str()).collect();
        assert_eq!(
            prices,
            vec![
                "$25–$300 /user/mo",
                "Free – $1,200/mo",
                "Free – $16 /user/mo",
                "$9–$19 /seat/mo",
                "Free – $20 /user/mo",
            ]
        );
        assert_eq!(
            result.summary,
            "Static demo results for: \"Sales CRM\". These are illustrative vendors — add your \
             GROQ_API_KEY to get live AI-researched results tailored to your exact requirements."
        );
    }

    #[test]
    fn test_every_vendor_has_evidence_and_risks() {
        for vendor in static_result(&input()).vendors {
            assert_eq!(vendor.evidence_links.len(), 2);
            assert_eq!(vendor.risks.len(), 2);
            assert!(vendor.website.starts_with("https://"));
        }
    }
}
