// Responder Agent: top-level chat entry point tying the other agents together

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::planner::{classify, Intent};
use super::retriever::{RetrieverAgent, DEFAULT_LIMIT};
use super::scorer::passes_filters;
use super::suggestions::suggest;
use super::summarizer::{
    format_aggregate, format_compare, format_detail, format_list, format_ranking, format_renewal,
    rank_top, AggregateKind, RankingKind, NO_MATCH,
};
use crate::dataset::SharedDealStore;
use crate::metrics;
use crate::models::{ChatResponse, Deal, DealSource, FilterOptions, ScoredDeal};

/// How many deals are considered when resolving an explicitly selected deal.
const SELECTED_CANDIDATES: usize = 100;
const ONBOARDING_LIMIT: usize = 5;
const ONBOARDING_QUERY: &str = "most recent";

const NO_DETAIL_MATCH: &str = "I couldn't find a specific deal matching your request. Try asking about a client name or use the deal list on the left.";
const COMPARE_NEEDS_TWO: &str = "I need at least 2 deals to compare. Please specify which deals (e.g., 'Compare ApexCommerce with CloudSync Solutions') or select deals from the list.";
const HELP: &str = "I couldn't find deals matching your query. Try:\n- Asking about a specific client name\n- Using industry filters (e.g., 'healthcare', 'SaaS')\n- Asking about 'largest deal', 'renewal risk', or 'objections'\n- Selecting a deal from the list on the left";
const ONBOARDING_NUDGE: &str = "\n\nWant to dive deeper? Try asking about a specific industry (like 'healthcare' or 'SaaS'), client name, or use filters on the left.";

#[derive(Clone)]
pub struct ResponderAgent {
    retriever: RetrieverAgent,
}

impl ResponderAgent {
    pub fn new(store: SharedDealStore) -> Self {
        Self {
            retriever: RetrieverAgent::new(store),
        }
    }

    pub fn retriever(&self) -> &RetrieverAgent {
        &self.retriever
    }

    pub fn respond(
        &self,
        message: &str,
        filters: Option<&FilterOptions>,
        selected_deal_id: Option<&str>,
    ) -> ChatResponse {
        self.respond_on(message, filters, selected_deal_id, Utc::now().date_naive())
    }

    pub fn respond_on(
        &self,
        message: &str,
        filters: Option<&FilterOptions>,
        selected_deal_id: Option<&str>,
        today: NaiveDate,
    ) -> ChatResponse {
        let intent = classify(message);
        info!(intent = intent.as_str(), "Responder: classified message");
        metrics::record_chat(intent.as_str());

        let scored = match selected_deal_id {
            Some(id) => match self.retriever.select(id, SELECTED_CANDIDATES) {
                Some(selected) => vec![selected],
                None => {
                    warn!("Responder: selected deal {} not found, using message", id);
                    self.retriever.retrieve_on(message, filters, DEFAULT_LIMIT, today)
                }
            },
            None => self.retriever.retrieve_on(message, filters, DEFAULT_LIMIT, today),
        };
        let deals: Vec<&Deal> = scored.iter().map(|s| s.deal).collect();

        let (reply, referenced) = if intent == Intent::General
            && scored.is_empty()
            && !message.to_lowercase().contains("deal")
        {
            let recent = self.onboarding(filters, today);
            let reply = format!(
                "I can help you explore our deal portfolio. Here are {} recent deals:\n\n{}{}",
                recent.len(),
                format_list(&recent),
                ONBOARDING_NUDGE
            );
            (reply, recent.iter().map(|s| s.deal).collect())
        } else {
            self.render(intent, &scored, &deals)
        };

        ChatResponse {
            reply,
            sources: referenced.iter().map(|d| d.source()).collect::<Vec<DealSource>>(),
            suggestions: suggest(intent, &scored),
        }
    }

    /// Reply text plus the deals it refers to.
    fn render<'a>(
        &self,
        intent: Intent,
        scored: &[ScoredDeal<'a>],
        deals: &[&'a Deal],
    ) -> (String, Vec<&'a Deal>) {
        match intent {
            Intent::List => (format_list(scored), deals.to_vec()),
            Intent::Detail => match deals {
                [] => (NO_DETAIL_MATCH.to_string(), vec![]),
                [only] => (format_detail(only), vec![*only]),
                [first, rest @ ..] => {
                    let reply = format!(
                        "I found multiple deals. Here's the most relevant one:\n\n{}\n\nI also found {} other matching deal{}. Ask about them specifically or use filters to narrow down.",
                        format_detail(first),
                        rest.len(),
                        if rest.len() == 1 { "" } else { "s" }
                    );
                    (reply, deals.to_vec())
                }
            },
            Intent::Compare => {
                if deals.len() < 2 {
                    (COMPARE_NEEDS_TWO.to_string(), deals.to_vec())
                } else {
                    (format_compare(deals), deals[..2].to_vec())
                }
            }
            Intent::Largest | Intent::Smallest | Intent::Recent => {
                let kind = match intent {
                    Intent::Largest => RankingKind::Largest,
                    Intent::Smallest => RankingKind::Smallest,
                    _ => RankingKind::Recent,
                };
                match rank_top(scored, kind) {
                    Some(top) => (format_ranking(top, kind), vec![top]),
                    None => (NO_MATCH.to_string(), vec![]),
                }
            }
            Intent::Renewal => (format_renewal(scored), deals.to_vec()),
            Intent::Objections => (format_aggregate(scored, AggregateKind::Objections), deals.to_vec()),
            Intent::Competitors => (format_aggregate(scored, AggregateKind::Competitors), deals.to_vec()),
            Intent::Channels => (format_aggregate(scored, AggregateKind::Channels), deals.to_vec()),
            Intent::General if !scored.is_empty() => (format_list(scored), deals.to_vec()),
            Intent::General => (HELP.to_string(), vec![]),
        }
    }

    /// Recent deals for a vague opening question. When nothing scores as recent
    /// the latest-active deals are listed instead.
    fn onboarding(&self, filters: Option<&FilterOptions>, today: NaiveDate) -> Vec<ScoredDeal<'_>> {
        let recent = self
            .retriever
            .retrieve_on(ONBOARDING_QUERY, filters, ONBOARDING_LIMIT, today);
        if !recent.is_empty() {
            return recent;
        }

        let mut deals: Vec<&Deal> = self
            .retriever
            .store()
            .deals()
            .iter()
            .filter(|d| filters.map_or(true, |f| passes_filters(d, f)))
            .collect();
        deals.sort_by(|a, b| b.most_recent_date().cmp(&a.most_recent_date()));
        deals
            .into_iter()
            .take(ONBOARDING_LIMIT)
            .map(|deal| ScoredDeal {
                deal,
                score: 1,
                match_reasons: vec!["Recent activity".to_string()],
            })
            .collect()
    }
}
