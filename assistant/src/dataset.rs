use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::DatasetError;
use crate::models::{Deal, FilterFacets, RenewalLikelihood};

const SEED_DEALS: &str = include_str!("../../data/deals.json");

/// Read-only deal collection, loaded once and shared for the life of the process.
#[derive(Debug)]
pub struct DealStore {
    deals: Vec<Deal>,
}

pub type SharedDealStore = Arc<DealStore>;

impl DealStore {
    pub fn new(deals: Vec<Deal>) -> Self {
        Self { deals }
    }

    /// The bundled demo portfolio.
    pub fn seed() -> Result<Self, DatasetError> {
        Self::from_json(SEED_DEALS)
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let deals: Vec<Deal> = serde_json::from_str(json)?;
        Ok(Self::new(deals))
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let json = read_dataset(path)?;
        let store = Self::from_json(&json)?;
        info!("Loaded {} deals from {}", store.len(), path.display());
        Ok(store)
    }

    /// Loads from `path` when given, otherwise falls back to the bundled seed.
    pub fn open(path: Option<&Path>) -> Result<SharedDealStore, DatasetError> {
        let store = match path {
            Some(path) => Self::load(path)?,
            None => Self::seed()?,
        };
        Ok(Arc::new(store))
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    pub fn get(&self, id: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    pub fn industries(&self) -> Vec<String> {
        sorted_distinct(self.deals.iter().map(|d| d.industry.as_str()))
    }

    pub fn regions(&self) -> Vec<String> {
        sorted_distinct(self.deals.iter().map(|d| d.region.as_str()))
    }

    pub fn channels(&self) -> Vec<String> {
        sorted_distinct(
            self.deals
                .iter()
                .flat_map(|d| d.channels.iter().map(String::as_str)),
        )
    }

    /// Current stages of deals that have any stage history.
    pub fn stages(&self) -> Vec<String> {
        sorted_distinct(
            self.deals
                .iter()
                .filter(|d| !d.deal_stage_history.is_empty())
                .map(|d| d.current_stage()),
        )
    }

    /// Distinct values for the filter picker, sorted.
    pub fn facets(&self) -> FilterFacets {
        FilterFacets {
            industries: self.industries(),
            regions: self.regions(),
            channels: self.channels(),
            stages: self.stages(),
            renewal_likelihoods: vec![
                RenewalLikelihood::Low,
                RenewalLikelihood::Med,
                RenewalLikelihood::High,
            ],
        }
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub(crate) fn read_dataset(path: &Path) -> Result<String, DatasetError> {
    std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seed_loads_the_demo_portfolio() {
        let store = DealStore::seed().unwrap();
        assert_eq!(store.len(), 10);
        assert_eq!(store.deals()[0].client_name, "ApexCommerce");
        assert!(store.deals().iter().all(|d| !d.deal_stage_history.is_empty()));
    }

    #[test]
    fn lost_deal_has_no_plan_or_results() {
        let store = DealStore::seed().unwrap();
        let lost = store.get("deal-009").unwrap();
        assert!(lost.implementation_plan.is_empty());
        assert!(lost.results.is_empty());
        assert_eq!(lost.current_stage(), "Closed Lost");
        assert_eq!(lost.contract_value_midpoint(), 0.0);
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let store = DealStore::seed().unwrap();
        assert!(store.get("deal-999").is_none());
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SEED_DEALS).unwrap();

        let store = DealStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn load_failure_propagates() {
        let missing = Path::new("/definitely/not/here/deals.json");
        assert!(matches!(
            DealStore::load(missing),
            Err(DatasetError::Io { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            DealStore::load(file.path()),
            Err(DatasetError::Parse(_))
        ));
    }

    #[test]
    fn facets_are_sorted_and_distinct() {
        let facets = DealStore::seed().unwrap().facets();
        assert_eq!(facets.regions, vec!["Europe", "Global", "North America"]);
        assert!(facets.stages.contains(&"Closed Lost".to_string()));
        assert!(facets.stages.contains(&"Live".to_string()));
        let mut sorted = facets.channels.clone();
        sorted.sort();
        assert_eq!(facets.channels, sorted);
    }

    #[test]
    fn facet_helpers_match_the_combined_view() {
        let store = DealStore::seed().unwrap();
        let facets = store.facets();
        assert_eq!(store.industries(), facets.industries);
        assert_eq!(store.industries().len(), 10);
        assert_eq!(store.regions(), facets.regions);
        assert_eq!(store.channels(), facets.channels);
        assert_eq!(store.stages(), facets.stages);
        assert!(store.channels().contains(&"Direct Sales".to_string()));
    }
}
