// Summarizer Agent: renders scored deals as markdown-style chat replies

use std::collections::HashMap;

use crate::models::{Deal, Metric, RenewalLikelihood, ScoredDeal};

pub const NO_MATCH: &str = "I couldn't find any deals matching your criteria.";
pub const NO_LIST_MATCH: &str = "I couldn't find any deals matching your criteria. Try adjusting your filters or asking about a specific industry, region, or client name.";
pub const COMPARE_NEEDS_TWO: &str = "I need at least 2 deals to compare. Please specify which deals you'd like to compare.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Objections,
    Competitors,
    Channels,
}

impl AggregateKind {
    fn heading(&self) -> &'static str {
        match self {
            AggregateKind::Objections => "**Common Objections** (frequency across deals):",
            AggregateKind::Competitors => "**Competitors Encountered** (frequency):",
            AggregateKind::Channels => "**Channels Used** (frequency):",
        }
    }

    fn items<'a>(&self, deal: &'a Deal) -> &'a [String] {
        match self {
            AggregateKind::Objections => &deal.objections,
            AggregateKind::Competitors => &deal.competitors,
            AggregateKind::Channels => &deal.channels,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingKind {
    Largest,
    Smallest,
    Recent,
}

impl RankingKind {
    fn label(&self) -> &'static str {
        match self {
            RankingKind::Largest => "largest",
            RankingKind::Smallest => "smallest",
            RankingKind::Recent => "most recent",
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// `$1.0M` style above a million, `$500K` style below.
pub fn format_money(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else {
        format!("${:.0}K", value / 1_000.0)
    }
}

pub fn format_list(scored: &[ScoredDeal<'_>]) -> String {
    if scored.is_empty() {
        return NO_LIST_MATCH.to_string();
    }

    let mut out = format!("I found {} deal{}:\n\n", scored.len(), plural(scored.len()));
    for ScoredDeal { deal, .. } in scored {
        out.push_str(&format!("**{}** ({})\n", deal.client_name, deal.industry));
        out.push_str(&format!("- Stage: {}\n", deal.current_stage()));
        out.push_str(&format!("- Contract Value: {}\n", deal.contract_value_range));
        out.push_str(&format!("- Region: {}\n", deal.region));
        out.push_str(&format!("- Renewal Risk: {}\n", deal.renewal_likelihood));
        if let Some(top) = deal.results.first() {
            let key_result = match &top.lift {
                Some(lift) => format!("- Key Result: {} ({})\n", top.name, lift),
                None => format!("- Key Result: {}\n", top.name),
            };
            out.push_str(&key_result);
        }
        out.push('\n');
    }
    out
}

fn bullets(heading: &str, items: &[String]) -> String {
    let mut block = format!("**{}**\n", heading);
    for item in items {
        block.push_str(&format!("- {}\n", item));
    }
    block.push('\n');
    block
}

fn format_metric(metric: &Metric) -> String {
    let mut line = format!("- **{}**: ", metric.name);
    match (&metric.before, &metric.after) {
        (Some(before), Some(after)) => line.push_str(&format!("{} → {}", before, after)),
        (None, Some(after)) => line.push_str(&after.to_string()),
        _ => {}
    }
    if let Some(lift) = &metric.lift {
        line.push_str(&format!(" ({})", lift));
    }
    if let Some(description) = &metric.description {
        line.push_str(&format!(" - {}", description));
    }
    line.push('\n');
    line
}

pub fn format_detail(deal: &Deal) -> String {
    let mut out = match &deal.client_alias {
        Some(alias) => format!("## {} ({})\n\n", deal.client_name, alias),
        None => format!("## {}\n\n", deal.client_name),
    };

    out.push_str(&format!(
        "**Overview**\n\
         - Industry: {} ({})\n\
         - Region: {}\n\
         - Company Size: {}\n\
         - Annual Revenue: {}\n\
         - Current Stage: {}\n\
         - Contract Value: {} ({} months)\n\
         - Renewal Likelihood: {}\n\n",
        deal.industry,
        deal.sub_industry,
        deal.region,
        deal.company_size,
        deal.annual_revenue_range,
        deal.current_stage(),
        deal.contract_value_range,
        deal.contract_term_months,
        deal.renewal_likelihood
    ));

    out.push_str(&format!(
        "**Services & Tech**\n- Services: {}\n- Channels: {}\n- Tech Stack: {}\n\n",
        deal.services.join(", "),
        deal.channels.join(", "),
        deal.tech_stack.join(", ")
    ));

    out.push_str(&bullets("Objectives", &deal.objectives));
    out.push_str(&bullets("Challenges", &deal.challenges));

    if !deal.objections.is_empty() {
        out.push_str(&bullets("Objections Overcome", &deal.objections));
    }

    if !deal.competitors.is_empty() {
        out.push_str(&format!(
            "**Competitors**\n- Faced: {}\n- Differentiators: {}\n\n",
            deal.competitors.join(", "),
            deal.differentiators.join(", ")
        ));
    }

    out.push_str("**Key Stakeholders**\n");
    for sh in &deal.key_stakeholders {
        out.push_str(&format!("- {} ({}) - {}\n", sh.name, sh.title, sh.role));
    }
    out.push('\n');

    if !deal.results.is_empty() {
        out.push_str("**Results & Metrics**\n");
        for metric in &deal.results {
            out.push_str(&format_metric(metric));
        }
        out.push('\n');
    }

    out.push_str(&format!("**Renewal Outlook**\n{}\n\n", deal.renewal_rationale));

    if !deal.timeline_notes.is_empty() {
        out.push_str(&format!("**Timeline Notes**\n{}\n\n", deal.timeline_notes));
    }

    out
}

/// Side-by-side table of the first two deals.
pub fn format_compare(deals: &[&Deal]) -> String {
    let [first, second, ..] = deals else {
        return COMPARE_NEEDS_TWO.to_string();
    };

    let mut out = format!(
        "## Comparison: {} vs {}\n\n| Aspect | {} | {} |\n|--------|{}|{}|\n",
        first.client_name,
        second.client_name,
        first.client_name,
        second.client_name,
        "-".repeat(first.client_name.len() + 2),
        "-".repeat(second.client_name.len() + 2)
    );

    let rows: [(&str, String, String); 9] = [
        ("Industry", first.industry.clone(), second.industry.clone()),
        ("Region", first.region.clone(), second.region.clone()),
        ("Company Size", first.company_size.clone(), second.company_size.clone()),
        (
            "Contract Value",
            first.contract_value_range.clone(),
            second.contract_value_range.clone(),
        ),
        (
            "Contract Term",
            format!("{} months", first.contract_term_months),
            format!("{} months", second.contract_term_months),
        ),
        (
            "Current Stage",
            first.current_stage().to_string(),
            second.current_stage().to_string(),
        ),
        (
            "Renewal Likelihood",
            first.renewal_likelihood.to_string(),
            second.renewal_likelihood.to_string(),
        ),
        ("Channels", first.channels.join(", "), second.channels.join(", ")),
        (
            "Services",
            format!("{} services", first.services.len()),
            format!("{} services", second.services.len()),
        ),
    ];
    for (aspect, left, right) in rows {
        out.push_str(&format!("| {} | {} | {} |\n", aspect, left, right));
    }

    if !first.results.is_empty() && !second.results.is_empty() {
        out.push_str("\n**Key Results Comparison**\n\n");
        let lift = |m: Option<&Metric>| {
            m.and_then(|m| m.lift.clone())
                .unwrap_or_else(|| "N/A".to_string())
        };
        let rows = first.results.len().max(second.results.len());
        for i in 0..rows {
            let left = first.results.get(i);
            let right = second.results.get(i);
            let Some(name) = left.or(right).map(|m| m.name.as_str()) else {
                continue;
            };
            out.push_str(&format!("- **{}**: {} vs {}\n", name, lift(left), lift(right)));
        }
    }

    out
}

/// Frequency list of objections, competitors or channels across the scored set.
pub fn format_aggregate(scored: &[ScoredDeal<'_>], kind: AggregateKind) -> String {
    if scored.is_empty() {
        return NO_MATCH.to_string();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for ScoredDeal { deal, .. } in scored {
        for item in kind.items(deal) {
            match index.get(item.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(item.as_str(), counts.len());
                    counts.push((item.as_str(), 1));
                }
            }
        }
    }
    // Stable: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut out = format!(
        "Based on {} deal{}, here's what I found:\n\n{}\n\n",
        scored.len(),
        plural(scored.len()),
        kind.heading()
    );
    for (item, count) in counts {
        out.push_str(&format!("- {}: {} deal{}\n", item, count, plural(count)));
    }
    out
}

/// Orders the scored set for a ranking question and returns the winner.
/// Unparseable contract ranges (midpoint 0) always sort after real values.
pub fn rank_top<'a>(scored: &[ScoredDeal<'a>], kind: RankingKind) -> Option<&'a Deal> {
    let mut deals: Vec<&'a Deal> = scored.iter().map(|s| s.deal).collect();
    match kind {
        RankingKind::Largest => deals.sort_by(|a, b| {
            b.contract_value_midpoint()
                .total_cmp(&a.contract_value_midpoint())
        }),
        RankingKind::Smallest => deals.sort_by(|a, b| {
            let (a, b) = (a.contract_value_midpoint(), b.contract_value_midpoint());
            (a <= 0.0).cmp(&(b <= 0.0)).then(a.total_cmp(&b))
        }),
        RankingKind::Recent => deals.sort_by(|a, b| b.most_recent_date().cmp(&a.most_recent_date())),
    }
    deals.first().copied()
}

/// Headline for the ranked winner followed by its full detail.
pub fn format_ranking(top: &Deal, kind: RankingKind) -> String {
    let mut out = format!("The {} deal is **{}**.\n\n", kind.label(), top.client_name);

    match kind {
        RankingKind::Largest | RankingKind::Smallest => {
            out.push_str(&format!(
                "- Contract Value: {} (midpoint: ~{})\n",
                top.contract_value_range,
                format_money(top.contract_value_midpoint())
            ));
            out.push_str("- Note: I'm using the midpoint of the range for comparison.\n\n");
        }
        RankingKind::Recent => {
            let activity = top
                .most_recent_date()
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            out.push_str(&format!(
                "- Most Recent Activity: {}\n- Current Stage: {}\n\n",
                activity,
                top.current_stage()
            ));
        }
    }

    out.push_str(&format_detail(top));
    out
}

/// Deals grouped by renewal likelihood, High then Med then Low, skipping empty groups.
pub fn format_renewal(scored: &[ScoredDeal<'_>]) -> String {
    if scored.is_empty() {
        return NO_MATCH.to_string();
    }

    let mut out = format!(
        "## Renewal Risk Analysis\n\nBased on {} deal{}:\n\n",
        scored.len(),
        plural(scored.len())
    );

    for risk in RenewalLikelihood::DISPLAY_ORDER {
        let bucket: Vec<&Deal> = scored
            .iter()
            .map(|s| s.deal)
            .filter(|d| d.renewal_likelihood == risk)
            .collect();
        if bucket.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "**{} Renewal Risk** ({} deal{}):\n\n",
            risk,
            bucket.len(),
            plural(bucket.len())
        ));
        for deal in bucket {
            out.push_str(&format!("- **{}**: {}\n", deal.client_name, deal.renewal_rationale));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DealStore;

    fn scored_all(store: &DealStore) -> Vec<ScoredDeal<'_>> {
        store
            .deals()
            .iter()
            .map(|deal| ScoredDeal {
                deal,
                score: 1,
                match_reasons: vec![],
            })
            .collect()
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(3_000_000.0), "$3.0M");
        assert_eq!(format_money(2_500_000.0), "$2.5M");
        assert_eq!(format_money(500_000.0), "$500K");
        assert_eq!(format_money(0.0), "$0K");
    }

    #[test]
    fn list_renders_each_deal_block() {
        let store = DealStore::seed().unwrap();
        let scored = scored_all(&store);
        let text = format_list(&scored[..2]);
        assert!(text.starts_with("I found 2 deals:"));
        assert!(text.contains("**ApexCommerce** (eCommerce DTC)"));
        assert!(text.contains("- Key Result: Traffic Capacity (10x)"));
        assert!(text.contains("- Renewal Risk: Med"));
    }

    #[test]
    fn list_without_results_skips_key_result() {
        let store = DealStore::seed().unwrap();
        let lost = ScoredDeal {
            deal: store.get("deal-009").unwrap(),
            score: 1,
            match_reasons: vec![],
        };
        let text = format_list(&[lost]);
        assert!(text.starts_with("I found 1 deal:"));
        assert!(!text.contains("Key Result"));
    }

    #[test]
    fn empty_list_has_fallback_text() {
        assert_eq!(format_list(&[]), NO_LIST_MATCH);
    }

    #[test]
    fn detail_renders_all_sections() {
        let store = DealStore::seed().unwrap();
        let text = format_detail(store.get("deal-004").unwrap());
        assert!(text.starts_with("## PayFlow Financial (PayFlow)\n"));
        assert!(text.contains("- Contract Value: $1.5M - $2M (24 months)"));
        assert!(text.contains("**Objections Overcome**"));
        assert!(text.contains("- Faced: Stripe Radar, Kount, Sift"));
        assert!(text.contains("- Amanda Foster (VP of Risk Management) - Decision Maker"));
        // A metric without a lift renders before -> after only.
        assert!(text.contains("- **Fraud Detection Accuracy**: 97.2% → 99.6% - ML model performance"));
        assert!(text.contains("**Timeline Notes**"));
    }

    #[test]
    fn detail_of_lost_deal_omits_results() {
        let store = DealStore::seed().unwrap();
        let text = format_detail(store.get("deal-009").unwrap());
        assert!(!text.contains("**Results & Metrics**"));
        assert!(text.contains("- Current Stage: Closed Lost"));
    }

    #[test]
    fn compare_needs_two_deals() {
        let store = DealStore::seed().unwrap();
        assert_eq!(format_compare(&[store.get("deal-001").unwrap()]), COMPARE_NEEDS_TWO);
    }

    #[test]
    fn compare_pads_missing_lifts() {
        let store = DealStore::seed().unwrap();
        let text = format_compare(&[store.get("deal-007").unwrap(), store.get("deal-002").unwrap()]);
        assert!(text.contains("| Aspect | FitTrack App | CloudSync Solutions |"));
        assert!(text.contains("|--------|--------------|---------------------|"));
        assert!(text.contains("| Contract Term | 12 months | 12 months |"));
        // FitTrack's second metric has no lift.
        assert!(text.contains("- **Premium Conversion**: N/A vs 6x increase"));
    }

    #[test]
    fn compare_skips_results_when_one_side_has_none() {
        let store = DealStore::seed().unwrap();
        let text = format_compare(&[store.get("deal-009").unwrap(), store.get("deal-002").unwrap()]);
        assert!(!text.contains("Key Results Comparison"));
    }

    #[test]
    fn aggregate_counts_and_sorts() {
        let store = DealStore::seed().unwrap();
        let scored = scored_all(&store);
        let text = format_aggregate(&scored, AggregateKind::Channels);
        assert!(text.starts_with("Based on 10 deals, here's what I found:"));
        assert!(text.contains("**Channels Used** (frequency):"));
        // Direct Sales is the most common channel in the seed portfolio.
        let first_item = text.lines().find(|l| l.starts_with("- ")).unwrap();
        assert_eq!(first_item, "- Direct Sales: 6 deals");
        assert!(text.contains("- Partner Referral: 1 deal\n"));
    }

    #[test]
    fn aggregate_objections_counts_shared_items() {
        let store = DealStore::seed().unwrap();
        let scored = scored_all(&store);
        let text = format_aggregate(&scored, AggregateKind::Objections);
        assert!(text.contains("- Security and compliance concerns: 2 deals"));
    }

    #[test]
    fn ranking_picks_extremes() {
        let store = DealStore::seed().unwrap();
        let scored = scored_all(&store);
        assert_eq!(rank_top(&scored, RankingKind::Largest).unwrap().id, "deal-003");
        // The lost deal's range does not parse; it must not win the smallest ranking.
        assert_eq!(rank_top(&scored, RankingKind::Smallest).unwrap().id, "deal-007");
        assert_eq!(rank_top(&scored, RankingKind::Recent).unwrap().id, "deal-003");
        assert!(rank_top(&[], RankingKind::Largest).is_none());
    }

    #[test]
    fn smallest_ranking_puts_zero_midpoints_last() {
        let store = DealStore::seed().unwrap();
        let lost = store.get("deal-009").unwrap();
        let scored: Vec<ScoredDeal<'_>> = ["deal-009", "deal-002"]
            .iter()
            .map(|id| ScoredDeal {
                deal: store.get(id).unwrap(),
                score: 25,
                match_reasons: vec![],
            })
            .collect();
        assert_eq!(lost.contract_value_midpoint(), 0.0);
        assert_eq!(rank_top(&scored, RankingKind::Smallest).unwrap().id, "deal-002");
        // With nothing else to rank, the unparseable deal still wins.
        assert_eq!(rank_top(&scored[..1], RankingKind::Smallest).unwrap().id, "deal-009");
    }

    #[test]
    fn ranking_text_includes_headline_and_detail() {
        let store = DealStore::seed().unwrap();
        let text = format_ranking(store.get("deal-003").unwrap(), RankingKind::Largest);
        assert!(text.starts_with("The largest deal is **MediCare Network**."));
        assert!(text.contains("(midpoint: ~$3.0M)"));
        assert!(text.contains("## MediCare Network (MediCare)"));

        let text = format_ranking(store.get("deal-003").unwrap(), RankingKind::Recent);
        assert!(text.contains("- Most Recent Activity: August 15, 2024"));
    }

    #[test]
    fn renewal_groups_in_fixed_order() {
        let store = DealStore::seed().unwrap();
        let scored = scored_all(&store);
        let text = format_renewal(&scored);
        let high = text.find("**High Renewal Risk** (5 deals)").unwrap();
        let med = text.find("**Med Renewal Risk** (3 deals)").unwrap();
        let low = text.find("**Low Renewal Risk** (2 deals)").unwrap();
        assert!(high < med && med < low);
    }

    #[test]
    fn renewal_omits_empty_buckets() {
        let store = DealStore::seed().unwrap();
        let only_low: Vec<ScoredDeal<'_>> = scored_all(&store)
            .into_iter()
            .filter(|s| s.deal.renewal_likelihood == RenewalLikelihood::Low)
            .collect();
        let text = format_renewal(&only_low);
        assert!(text.contains("**Low Renewal Risk**"));
        assert!(!text.contains("**High Renewal Risk**"));
        assert!(!text.contains("**Med Renewal Risk**"));
    }
}
