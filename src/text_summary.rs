//! Text summary builder for CLI output.
//!
//! Formats human-readable lines for search results and campaign listings.

use creator_scout::classify::TierPartition;
use creator_scout::model::{Campaign, Creator};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn push_creator_line(lines: &mut Vec<String>, creator: &Creator) {
    let id = creator
        .id
        .map_or_else(|| "-".to_owned(), |id| id.to_string());
    let age = creator.estimated_age_range.as_deref().unwrap_or("-");
    let gender = creator.gender.as_deref().unwrap_or("-");
    lines.push(format!(
        "  [{id}] @{} ({}) {} followers, {:.2}% eng | score {:.1} (e {:.1} / q {:.1} / r {:.1}) | {gender}, {age}",
        creator.handle,
        creator.platform,
        creator.follower_count,
        creator.engagement_rate,
        creator.overall_score,
        creator.engagement_score,
        creator.quality_score,
        creator.relevance_score,
    ));
}

/// Build a text summary of one partitioned search result. A tier section
/// with zero members is not rendered.
pub(crate) fn build_search_summary(
    partition: &TierPartition,
    total: u64,
    db_total: Option<u64>,
) -> TextSummary {
    let mut lines = Vec::new();

    if !partition.established.is_empty() {
        lines.push(format!("Established ({}):", partition.established.len()));
        for creator in &partition.established {
            push_creator_line(&mut lines, creator);
        }
    }
    if !partition.emerging.is_empty() {
        lines.push(format!("Emerging ({}):", partition.emerging.len()));
        for creator in &partition.emerging {
            push_creator_line(&mut lines, creator);
        }
    }
    if lines.is_empty() {
        lines.push("No creators matched the current filters.".to_owned());
    }

    match db_total {
        Some(db_total) => lines.push(format!("{total} matched, {db_total} creators in database")),
        None => lines.push(format!("{total} matched")),
    }

    TextSummary { lines }
}

/// Build a text summary of the campaign list.
pub(crate) fn build_campaign_summary(campaigns: &[Campaign]) -> TextSummary {
    let mut lines = Vec::new();
    if campaigns.is_empty() {
        lines.push("No campaigns yet.".to_owned());
    }
    for campaign in campaigns {
        let count = campaign
            .creator_count
            .map_or_else(String::new, |n| format!(" — {n} creators"));
        lines.push(format!(
            "[{}] {}{count} (created {})",
            campaign.id, campaign.name, campaign.created_at
        ));
    }
    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creator_scout::classify::partition_by_tier;

    #[test]
    fn empty_tier_sections_are_not_rendered() {
        let partition = partition_by_tier(Vec::new());
        let summary = build_search_summary(&partition, 0, Some(10));
        assert!(summary.lines.iter().all(|l| !l.starts_with("Established")));
        assert!(summary.lines.iter().all(|l| !l.starts_with("Emerging")));
        assert!(summary.lines.iter().any(|l| l.contains("10 creators")));
    }
}
