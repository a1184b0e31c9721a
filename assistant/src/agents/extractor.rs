// Entity Extractor: turns free text into the signals the scorer matches on

use crate::models::Deal;

/// Canonical industry tag -> substrings that indicate it.
pub const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    ("ecommerce", &["ecommerce", "e-commerce", "retail", "dtc", "direct-to-consumer", "fashion", "apparel"]),
    ("saas", &["saas", "software", "productivity", "b2b saas", "cloud"]),
    ("healthcare", &["healthcare", "health", "medical", "hospital", "hipaa", "patient", "clinical"]),
    ("fintech", &["fintech", "financial", "payment", "banking", "fraud", "pci", "transaction"]),
    ("field-service", &["field service", "home service", "plumbing", "hvac", "electrical", "technician"]),
    ("marketplace", &["marketplace", "b2b marketplace", "seller", "buyer", "gmv"]),
    ("consumer-app", &["consumer app", "mobile app", "fitness", "health app", "consumer"]),
    ("manufacturing", &["manufacturing", "industrial", "iot", "factory", "equipment", "predictive maintenance"]),
    ("education", &["education", "lms", "learning", "student", "academy", "school"]),
    ("hospitality", &["hospitality", "hotel", "property management", "pms", "guest", "revpar"]),
];

pub const REGION_KEYWORDS: &[(&str, &[&str])] = &[
    ("North America", &["north america", "usa", "us", "united states", "canada", "na"]),
    ("Europe", &["europe", "eu", "european", "uk", "germany", "france"]),
    ("Global", &["global", "worldwide", "international"]),
];

pub const CHANNEL_KEYWORDS: &[(&str, &[&str])] = &[
    ("Direct Sales", &["direct sales", "direct"]),
    ("Partner Referral", &["partner", "referral"]),
    ("Self-Service", &["self-service", "self service"]),
    ("Inside Sales", &["inside sales", "inside"]),
    ("Enterprise Sales", &["enterprise sales", "enterprise"]),
    ("RFP Process", &["rfp", "request for proposal"]),
];

pub const SERVICE_KEYWORDS: &[&str] = &[
    "platform", "analytics", "integration", "mobile", "api", "payment", "fraud",
    "compliance", "iot", "lms", "pms", "marketplace", "ecommerce", "scheduling",
];

/// Normalized tokens pushed into `Entities::keywords` when a special phrase is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    Largest,
    Smallest,
    MostRecent,
    Renewal,
    Lost,
    Stalled,
    Pilot,
    Enterprise,
    Compliance,
}

impl Sentinel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentinel::Largest => "largest",
            Sentinel::Smallest => "smallest",
            Sentinel::MostRecent => "most_recent",
            Sentinel::Renewal => "renewal",
            Sentinel::Lost => "lost",
            Sentinel::Stalled => "stalled",
            Sentinel::Pilot => "pilot",
            Sentinel::Enterprise => "enterprise",
            Sentinel::Compliance => "compliance",
        }
    }
}

pub const SENTINEL_KEYWORDS: &[(Sentinel, &[&str])] = &[
    (Sentinel::Largest, &["largest", "biggest", "highest value", "high value"]),
    (Sentinel::Smallest, &["smallest", "lowest value", "small"]),
    (Sentinel::MostRecent, &["most recent", "latest", "newest"]),
    (Sentinel::Renewal, &["renewal", "renew"]),
    (Sentinel::Lost, &["lost", "lose"]),
    (Sentinel::Stalled, &["stalled", "stall"]),
    (Sentinel::Pilot, &["pilot", "poc"]),
    (Sentinel::Enterprise, &["enterprise"]),
    (Sentinel::Compliance, &["compliance", "hipaa", "pci"]),
];

/// Structured signals pulled out of one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities {
    /// Client names/aliases found in the message, then sentinel tokens.
    pub keywords: Vec<String>,
    pub industries: Vec<&'static str>,
    pub regions: Vec<&'static str>,
    pub channels: Vec<&'static str>,
    pub services: Vec<&'static str>,
}

impl Entities {
    pub fn has_sentinel(&self, sentinel: Sentinel) -> bool {
        self.keywords.iter().any(|k| k == sentinel.as_str())
    }
}

/// Case-insensitive substring extraction. Client names come from `deals`.
pub fn extract(message: &str, deals: &[Deal]) -> Entities {
    let lower = message.to_lowercase();
    let mut entities = Entities::default();

    for deal in deals {
        let name = deal.client_name.to_lowercase();
        if !name.is_empty() && lower.contains(&name) {
            entities.keywords.push(name);
        }
        if let Some(alias) = deal.client_alias.as_deref().map(str::to_lowercase) {
            if !alias.is_empty() && lower.contains(&alias) {
                entities.keywords.push(alias);
            }
        }
    }

    entities.industries = matching_tags(&lower, INDUSTRY_KEYWORDS);
    entities.regions = matching_tags(&lower, REGION_KEYWORDS);
    entities.channels = matching_tags(&lower, CHANNEL_KEYWORDS);
    entities.services = SERVICE_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| lower.contains(kw))
        .collect();

    for (sentinel, phrases) in SENTINEL_KEYWORDS {
        if phrases.iter().any(|p| lower.contains(p)) {
            entities.keywords.push(sentinel.as_str().to_string());
        }
    }

    entities
}

fn matching_tags(lower: &str, table: &[(&'static str, &[&str])]) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(tag, _)| *tag)
        .collect()
}
