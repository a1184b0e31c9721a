use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `$800K - $1.2M`, `$2.5M - $3.5M`, `$120K - $180K`. Each bound may carry its own suffix.
static CONTRACT_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$?\s*([\d.]+)\s*([kmb])?\s*-\s*\$?\s*([\d.]+)\s*([kmb])?")
        .expect("contract range pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealStage {
    pub stage: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stakeholder {
    pub name: String,
    pub title: String,
    pub role: String,
}

/// Seed data records metric values either as display text (`"68%"`) or bare numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(text) => f.write_str(text),
            MetricValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            MetricValue::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lift: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenewalLikelihood {
    Low,
    Med,
    High,
}

impl RenewalLikelihood {
    /// Display order for renewal grouping.
    pub const DISPLAY_ORDER: [RenewalLikelihood; 3] = [Self::High, Self::Med, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Med => "Med",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RenewalLikelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_alias: Option<String>,
    pub industry: String,
    pub sub_industry: String,
    pub region: String,
    pub company_size: String,
    pub annual_revenue_range: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub deal_stage_history: Vec<DealStage>,
    pub contract_value_range: String,
    pub contract_term_months: u32,
    #[serde(default)]
    pub margin_notes: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub objections: Vec<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default)]
    pub differentiators: Vec<String>,
    #[serde(default)]
    pub key_stakeholders: Vec<Stakeholder>,
    #[serde(default)]
    pub timeline_notes: String,
    #[serde(default)]
    pub implementation_plan: Vec<String>,
    #[serde(default)]
    pub results: Vec<Metric>,
    pub renewal_likelihood: RenewalLikelihood,
    pub renewal_rationale: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Deal {
    /// Stage history is trusted to be chronological; the last entry is current.
    pub fn current_stage(&self) -> &str {
        self.deal_stage_history
            .last()
            .map(|s| s.stage.as_str())
            .unwrap_or("Unknown")
    }

    pub fn latest_stage_date(&self) -> Option<NaiveDate> {
        self.deal_stage_history.last().map(|s| s.date)
    }

    pub fn most_recent_date(&self) -> Option<NaiveDate> {
        self.deal_stage_history.iter().map(|s| s.date).max()
    }

    pub fn contract_value_midpoint(&self) -> f64 {
        contract_value_midpoint(&self.contract_value_range)
    }

    pub fn source(&self) -> DealSource {
        DealSource {
            id: self.id.clone(),
            client_name: self.client_name.clone(),
        }
    }
}

/// Midpoint of a contract range string. Anything unparseable yields 0.
pub fn contract_value_midpoint(range: &str) -> f64 {
    let Some(caps) = CONTRACT_RANGE_RE.captures(range) else {
        return 0.0;
    };

    let (Ok(low), Ok(high)) = (caps[1].parse::<f64>(), caps[3].parse::<f64>()) else {
        return 0.0;
    };

    let low_suffix = caps.get(2).map(|m| m.as_str());
    let high_suffix = caps.get(4).map(|m| m.as_str());

    // A bare bound borrows the suffix of the other one ("$1 - 2M").
    let low = low * multiplier(low_suffix.or(high_suffix));
    let high = high * multiplier(high_suffix.or(low_suffix));

    (low + high) / 2.0
}

fn multiplier(suffix: Option<&str>) -> f64 {
    match suffix.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("k") => 1_000.0,
        Some("m") => 1_000_000.0,
        Some("b") => 1_000_000_000.0,
        _ => 1.0,
    }
}

/// A deal annotated with its relevance for one query. Score 0 means excluded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDeal<'a> {
    pub deal: &'a Deal,
    pub score: u32,
    pub match_reasons: Vec<String>,
}

impl<'a> ScoredDeal<'a> {
    pub fn excluded(deal: &'a Deal) -> Self {
        Self {
            deal,
            score: 0,
            match_reasons: vec![],
        }
    }
}

/// Optional exact-match constraints supplied with a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_likelihood: Option<String>,
}

// API Request/Response models
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub filters: Option<FilterOptions>,
    #[serde(default)]
    pub selected_deal_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSource {
    pub id: String,
    pub client_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub sources: Vec<DealSource>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    pub message: String,
    #[serde(default)]
    pub filters: Option<FilterOptions>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FilterFacets {
    pub industries: Vec<String>,
    pub regions: Vec<String>,
    pub channels: Vec<String>,
    pub stages: Vec<String>,
    #[serde(rename = "renewalLikelihoods")]
    pub renewal_likelihoods: Vec<RenewalLikelihood>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct QaRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QaResponse {
    pub chunks: Vec<String>,
    pub citations: Vec<DriveNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveNodeKind {
    Folder,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DriveNodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DriveNode>>,
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub status: &'static str,
    pub account: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_handles_mixed_suffixes() {
        assert_eq!(contract_value_midpoint("$800K - $1.2M"), 1_000_000.0);
        assert_eq!(contract_value_midpoint("$2.5M - $3.5M"), 3_000_000.0);
        assert_eq!(contract_value_midpoint("$120K - $180K"), 150_000.0);
        assert_eq!(contract_value_midpoint("$1.5M - $2M"), 1_750_000.0);
    }

    #[test]
    fn midpoint_is_zero_for_unparseable_ranges() {
        assert_eq!(contract_value_midpoint("N/A - Lost"), 0.0);
        assert_eq!(contract_value_midpoint(""), 0.0);
        assert_eq!(contract_value_midpoint("TBD"), 0.0);
    }

    #[test]
    fn bare_bound_borrows_other_suffix() {
        assert_eq!(contract_value_midpoint("$1 - $2M"), 1_500_000.0);
    }

    #[test]
    fn metric_value_display() {
        assert_eq!(MetricValue::Number(42.0).to_string(), "42");
        assert_eq!(MetricValue::Number(2.5).to_string(), "2.5");
        assert_eq!(MetricValue::Text("68%".into()).to_string(), "68%");
    }

    #[test]
    fn current_stage_is_last_entry_by_position() {
        let deal: Deal = serde_json::from_value(serde_json::json!({
            "id": "d",
            "clientName": "Acme",
            "industry": "SaaS",
            "subIndustry": "Tools",
            "region": "Europe",
            "companySize": "SMB",
            "annualRevenueRange": "$1M - $2M",
            "dealStageHistory": [
                { "stage": "Live", "date": "2024-06-01" },
                { "stage": "Discovery", "date": "2024-01-01" }
            ],
            "contractValueRange": "$10K - $20K",
            "contractTermMonths": 12,
            "renewalLikelihood": "Med",
            "renewalRationale": "ok"
        }))
        .unwrap();

        assert_eq!(deal.current_stage(), "Discovery");
        assert_eq!(deal.latest_stage_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(deal.most_recent_date(), NaiveDate::from_ymd_opt(2024, 6, 1));
    }
}
