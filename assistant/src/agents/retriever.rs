// Retriever Agent: scores the whole deal collection and keeps the best matches

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use super::extractor::extract;
use super::scorer::{score, ScoreContext};
use crate::dataset::SharedDealStore;
use crate::models::{Deal, FilterOptions, ScoredDeal};

pub const DEFAULT_LIMIT: usize = 10;

const FALLBACK_REASON: &str = "All deals";
const FALLBACK_TRIGGERS: &[&str] = &["list", "all", "show"];

#[derive(Clone)]
pub struct RetrieverAgent {
    store: SharedDealStore,
}

impl RetrieverAgent {
    pub fn new(store: SharedDealStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SharedDealStore {
        &self.store
    }

    pub fn retrieve(
        &self,
        message: &str,
        filters: Option<&FilterOptions>,
        limit: usize,
    ) -> Vec<ScoredDeal<'_>> {
        self.retrieve_on(message, filters, limit, Utc::now().date_naive())
    }

    /// Same as [`retrieve`](Self::retrieve) with an explicit "today" for the recency rule.
    pub fn retrieve_on(
        &self,
        message: &str,
        filters: Option<&FilterOptions>,
        limit: usize,
        today: NaiveDate,
    ) -> Vec<ScoredDeal<'_>> {
        info!("Retriever: Searching for: {}", message);

        let deals = self.store.deals();
        let entities = extract(message, deals);
        debug!(?entities, "Retriever: extracted entities");

        let ctx = ScoreContext {
            entities: &entities,
            today,
        };

        let mut scored: Vec<ScoredDeal<'_>> = deals
            .iter()
            .map(|deal| score(deal, &ctx, filters))
            .filter(|s| s.score > 0)
            .collect();

        // Stable: equal scores keep collection order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        if scored.is_empty() && wants_everything(message) {
            // Filters are deliberately not re-applied here.
            info!("Retriever: no matches, falling back to all deals");
            return deals
                .iter()
                .take(limit)
                .map(|deal| ScoredDeal {
                    deal,
                    score: 1,
                    match_reasons: vec![FALLBACK_REASON.to_string()],
                })
                .collect();
        }

        scored.truncate(limit);
        info!("Retriever: {} deals matched", scored.len());
        scored
    }

    /// Candidate lookup for an explicitly selected deal, in collection order.
    pub fn select(&self, deal_id: &str, candidates: usize) -> Option<ScoredDeal<'_>> {
        self.store
            .deals()
            .iter()
            .take(candidates)
            .find(|d| d.id == deal_id)
            .map(|deal: &Deal| ScoredDeal {
                deal,
                score: 1,
                match_reasons: vec!["Selected deal".to_string()],
            })
    }
}

fn wants_everything(message: &str) -> bool {
    let lower = message.to_lowercase();
    FALLBACK_TRIGGERS.iter().any(|t| lower.contains(t))
}
