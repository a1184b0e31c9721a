// Follow-up question templates offered after each reply

use super::planner::Intent;
use crate::models::ScoredDeal;

pub const MAX_SUGGESTIONS: usize = 3;

pub fn suggest(intent: Intent, scored: &[ScoredDeal<'_>]) -> Vec<String> {
    let mut suggestions = Vec::new();

    match intent {
        Intent::List | Intent::General => {
            if let Some(first) = scored.first() {
                let name = &first.deal.client_name;
                suggestions.push(format!("Tell me about {}", name));
                suggestions.push(format!("Compare {} with another deal", name));
            }
            suggestions.push("Show me deals with high renewal risk".to_string());
            suggestions.push("What are the most common objections?".to_string());
        }
        Intent::Detail => {
            if let [first, second, ..] = scored {
                suggestions.push(format!(
                    "Compare {} with {}",
                    first.deal.client_name, second.deal.client_name
                ));
            }
            suggestions.push("Show me all deals in this industry".to_string());
            suggestions.push("What competitors did we face?".to_string());
        }
        Intent::Compare => {
            suggestions.push("Show me the largest deal".to_string());
            suggestions.push("What are common objections?".to_string());
            suggestions.push("Show renewal risk analysis".to_string());
        }
        _ => {
            suggestions.push("Show me all deals".to_string());
            suggestions.push("What is the largest deal?".to_string());
            suggestions.push("Show me recent deals".to_string());
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
