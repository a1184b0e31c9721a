// Planner Agent: decides what kind of answer a message is asking for

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Compare,
    Largest,
    Smallest,
    Recent,
    Renewal,
    Objections,
    Competitors,
    Channels,
    List,
    Detail,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Compare => "compare",
            Intent::Largest => "largest",
            Intent::Smallest => "smallest",
            Intent::Recent => "recent",
            Intent::Renewal => "renewal",
            Intent::Objections => "objections",
            Intent::Competitors => "competitors",
            Intent::Channels => "channels",
            Intent::List => "list",
            Intent::Detail => "detail",
            Intent::General => "general",
        }
    }
}

/// Evaluated top to bottom; the first row with a matching phrase wins.
pub const INTENT_RULES: &[(&[&str], Intent)] = &[
    (&["compare", "vs", "versus", "difference"], Intent::Compare),
    (&["largest", "biggest", "highest value", "high value"], Intent::Largest),
    (&["smallest", "lowest value", "small"], Intent::Smallest),
    (&["most recent", "latest", "newest"], Intent::Recent),
    (&["renewal", "renew"], Intent::Renewal),
    (&["objection"], Intent::Objections),
    (&["competitor"], Intent::Competitors),
    (&["channel"], Intent::Channels),
    (&["list", "show all", "all deals", "deals in"], Intent::List),
    (&["tell me about", "details about", "rundown on", "summary of"], Intent::Detail),
];

pub fn classify(message: &str) -> Intent {
    let lower = message.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|(phrases, _)| phrases.iter().any(|p| lower.contains(p)))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_wins_over_largest() {
        assert_eq!(
            classify("compare the largest deal with the smallest"),
            Intent::Compare
        );
    }

    #[test]
    fn each_rule_is_reachable() {
        assert_eq!(classify("ApexCommerce versus PayFlow"), Intent::Compare);
        assert_eq!(classify("What is the biggest deal?"), Intent::Largest);
        assert_eq!(classify("lowest value contract"), Intent::Smallest);
        assert_eq!(classify("newest deal"), Intent::Recent);
        assert_eq!(classify("Who will renew?"), Intent::Renewal);
        assert_eq!(classify("common objections"), Intent::Objections);
        assert_eq!(classify("Which competitors came up?"), Intent::Competitors);
        assert_eq!(classify("sales channels used"), Intent::Channels);
        assert_eq!(classify("deals in healthcare"), Intent::List);
        assert_eq!(classify("Give me a rundown on GrandStay"), Intent::Detail);
        assert_eq!(classify("hello there"), Intent::General);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("TELL ME ABOUT FitTrack"), Intent::Detail);
    }

    #[test]
    fn earlier_rules_shadow_later_ones() {
        // "renewal" is checked before "list".
        assert_eq!(classify("list renewal risks"), Intent::Renewal);
        // "small" hides inside "smaller", ahead of detail phrases.
        assert_eq!(classify("tell me about smaller deals"), Intent::Smallest);
    }
}
