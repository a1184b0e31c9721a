// Deal Scorer: hard filters, then additive rule accumulation

use chrono::{Months, NaiveDate};

use super::extractor::{Entities, Sentinel};
use crate::models::{Deal, FilterOptions, ScoredDeal};

pub const EXACT_NAME_WEIGHT: u32 = 100;
pub const PARTIAL_NAME_WEIGHT: u32 = 50;
pub const INDUSTRY_WEIGHT: u32 = 30;
pub const TAG_WEIGHT: u32 = 20;
pub const REGION_WEIGHT: u32 = 15;
pub const CHANNEL_WEIGHT: u32 = 10;
pub const SERVICE_WEIGHT: u32 = 10;

pub const LARGE_DEAL_THRESHOLD: f64 = 1_500_000.0;
pub const SMALL_DEAL_THRESHOLD: f64 = 200_000.0;
pub const RECENT_WINDOW_MONTHS: u32 = 6;

/// Everything a rule may look at besides the deal itself.
pub struct ScoreContext<'a> {
    pub entities: &'a Entities,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub weight: u32,
    pub reason: String,
}

/// Match rules may fire several times (once per tag, once per service).
type MatchRule = fn(&Deal, &ScoreContext<'_>) -> Vec<Contribution>;

const MATCH_RULES: &[MatchRule] = &[
    client_name_rule,
    industry_rule,
    tag_rule,
    region_rule,
    channel_rule,
    service_rule,
];

/// Bonus applied when a sentinel keyword was extracted and the deal qualifies.
pub struct SentinelRule {
    pub sentinel: Sentinel,
    pub weight: u32,
    pub applies: fn(&Deal, NaiveDate) -> bool,
    pub reason: fn(&Deal) -> String,
}

pub const SENTINEL_RULES: &[SentinelRule] = &[
    SentinelRule {
        sentinel: Sentinel::Largest,
        weight: 25,
        applies: |deal, _| deal.contract_value_midpoint() > LARGE_DEAL_THRESHOLD,
        reason: |_| "High contract value".to_string(),
    },
    SentinelRule {
        sentinel: Sentinel::Smallest,
        weight: 25,
        applies: |deal, _| deal.contract_value_midpoint() < SMALL_DEAL_THRESHOLD,
        reason: |_| "Low contract value".to_string(),
    },
    SentinelRule {
        sentinel: Sentinel::MostRecent,
        weight: 20,
        applies: is_recent,
        reason: |_| "Recent deal".to_string(),
    },
    // Fires for every deal whenever renewal is mentioned.
    SentinelRule {
        sentinel: Sentinel::Renewal,
        weight: 15,
        applies: |_, _| true,
        reason: |deal| format!("Renewal likelihood: {}", deal.renewal_likelihood),
    },
    SentinelRule {
        sentinel: Sentinel::Lost,
        weight: 30,
        applies: |deal, _| deal.current_stage().to_lowercase().contains("lost"),
        reason: |_| "Lost deal".to_string(),
    },
    SentinelRule {
        sentinel: Sentinel::Stalled,
        weight: 25,
        applies: |deal, _| has_stage(deal, &["stalled"]),
        reason: |_| "Stalled deal".to_string(),
    },
    SentinelRule {
        sentinel: Sentinel::Pilot,
        weight: 20,
        applies: |deal, _| has_stage(deal, &["pilot", "poc"]),
        reason: |_| "Pilot/POC deal".to_string(),
    },
    SentinelRule {
        sentinel: Sentinel::Enterprise,
        weight: 20,
        applies: |deal, _| deal.company_size.to_lowercase().contains("enterprise"),
        reason: |_| "Enterprise deal".to_string(),
    },
    SentinelRule {
        sentinel: Sentinel::Compliance,
        weight: 20,
        applies: |deal, _| {
            deal.services
                .iter()
                .chain(deal.tags.iter())
                .any(|s| s.to_lowercase().contains("compliance"))
        },
        reason: |_| "Compliance-focused deal".to_string(),
    },
];

/// Scores one deal. A deal failing any supplied filter scores 0 with no reasons.
pub fn score<'a>(
    deal: &'a Deal,
    ctx: &ScoreContext<'_>,
    filters: Option<&FilterOptions>,
) -> ScoredDeal<'a> {
    if let Some(filters) = filters {
        if !passes_filters(deal, filters) {
            return ScoredDeal::excluded(deal);
        }
    }

    let contributions = MATCH_RULES
        .iter()
        .flat_map(|rule| rule(deal, ctx))
        .chain(
            SENTINEL_RULES
                .iter()
                .filter(|rule| ctx.entities.has_sentinel(rule.sentinel))
                .filter(|rule| (rule.applies)(deal, ctx.today))
                .map(|rule| Contribution {
                    weight: rule.weight,
                    reason: (rule.reason)(deal),
                }),
        );

    contributions.fold(ScoredDeal::excluded(deal), |mut scored, c| {
        scored.score += c.weight;
        scored.match_reasons.push(c.reason);
        scored
    })
}

/// Empty filter values are treated as unset.
pub fn passes_filters(deal: &Deal, filters: &FilterOptions) -> bool {
    fn set(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    if let Some(industry) = set(&filters.industry) {
        let wanted = industry.to_lowercase();
        let direct = deal.industry.to_lowercase() == wanted
            || deal.sub_industry.to_lowercase() == wanted;
        if !direct && !deal.tags.iter().any(|t| t.to_lowercase().contains(&wanted)) {
            return false;
        }
    }
    if let Some(region) = set(&filters.region) {
        if deal.region != region {
            return false;
        }
    }
    if let Some(channel) = set(&filters.channel) {
        if !deal.channels.iter().any(|c| c == channel) {
            return false;
        }
    }
    if let Some(renewal) = set(&filters.renewal_likelihood) {
        if deal.renewal_likelihood.as_str() != renewal {
            return false;
        }
    }
    if let Some(stage) = set(&filters.stage) {
        let current = deal.deal_stage_history.last().map(|s| s.stage.to_lowercase());
        if current.as_deref() != Some(stage.to_lowercase().as_str()) {
            return false;
        }
    }
    true
}

fn client_name_rule(deal: &Deal, ctx: &ScoreContext<'_>) -> Vec<Contribution> {
    let name = deal.client_name.to_lowercase();
    let alias = deal.client_alias.as_deref().unwrap_or_default().to_lowercase();
    let keywords = &ctx.entities.keywords;

    if keywords.iter().any(|kw| *kw == name || *kw == alias) {
        vec![Contribution {
            weight: EXACT_NAME_WEIGHT,
            reason: format!("Exact client name match: {}", deal.client_name),
        }]
    } else if keywords
        .iter()
        .any(|kw| name.contains(kw.as_str()) || alias.contains(kw.as_str()))
    {
        vec![Contribution {
            weight: PARTIAL_NAME_WEIGHT,
            reason: format!("Partial client name match: {}", deal.client_name),
        }]
    } else {
        vec![]
    }
}

fn industry_rule(deal: &Deal, ctx: &ScoreContext<'_>) -> Vec<Contribution> {
    let industry = deal.industry.to_lowercase();
    let sub_industry = deal.sub_industry.to_lowercase();
    let hit = ctx
        .entities
        .industries
        .iter()
        .any(|ind| industry.contains(ind) || sub_industry.contains(ind));

    if hit {
        vec![Contribution {
            weight: INDUSTRY_WEIGHT,
            reason: format!("Industry match: {}", deal.industry),
        }]
    } else {
        vec![]
    }
}

fn tag_rule(deal: &Deal, ctx: &ScoreContext<'_>) -> Vec<Contribution> {
    deal.tags
        .iter()
        .filter(|tag| {
            let tag = tag.to_lowercase();
            ctx.entities.keywords.iter().any(|kw| tag.contains(kw.as_str()))
        })
        .map(|tag| Contribution {
            weight: TAG_WEIGHT,
            reason: format!("Tag match: {}", tag),
        })
        .collect()
}

fn region_rule(deal: &Deal, ctx: &ScoreContext<'_>) -> Vec<Contribution> {
    if ctx.entities.regions.iter().any(|r| *r == deal.region) {
        vec![Contribution {
            weight: REGION_WEIGHT,
            reason: format!("Region match: {}", deal.region),
        }]
    } else {
        vec![]
    }
}

fn channel_rule(deal: &Deal, ctx: &ScoreContext<'_>) -> Vec<Contribution> {
    let hit = ctx
        .entities
        .channels
        .iter()
        .any(|ch| deal.channels.iter().any(|c| c == ch));

    if hit {
        vec![Contribution {
            weight: CHANNEL_WEIGHT,
            reason: format!("Channel match: {}", deal.channels.join(", ")),
        }]
    } else {
        vec![]
    }
}

fn service_rule(deal: &Deal, ctx: &ScoreContext<'_>) -> Vec<Contribution> {
    deal.services
        .iter()
        .filter(|service| {
            let service = service.to_lowercase();
            ctx.entities.services.iter().any(|sv| service.contains(sv))
        })
        .map(|service| Contribution {
            weight: SERVICE_WEIGHT,
            reason: format!("Service match: {}", service),
        })
        .collect()
}

fn is_recent(deal: &Deal, today: NaiveDate) -> bool {
    let Some(cutoff) = today.checked_sub_months(Months::new(RECENT_WINDOW_MONTHS)) else {
        return false;
    };
    deal.latest_stage_date().is_some_and(|date| date > cutoff)
}

fn has_stage(deal: &Deal, names: &[&str]) -> bool {
    deal.deal_stage_history
        .iter()
        .any(|s| names.contains(&s.stage.to_lowercase().as_str()))
}
