use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use log::{error, info};

use crate::error::{Error, Result};
use crate::models::types::{HeroId, HeroRecord};
use crate::services::api::DotaApi;

pub const ALL_HEROES: &str = "All Heroes";

#[derive(Debug, Clone, Default)]
pub struct HeroNames(Arc<HashMap<HeroId, String>>);

impl HeroNames {
    pub fn from_records(records: Vec<HeroRecord>) -> Self {
        Self(Arc::new(
            records
                .into_iter()
                .map(|hero| (hero.id, hero.localized_name))
                .collect(),
        ))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn name_of(&self, hero_id: HeroId) -> String {
        self.0
            .get(&hero_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown Hero ({hero_id})"))
    }

    pub fn names_of(&self, hero_ids: &[HeroId]) -> Vec<String> {
        hero_ids.iter().map(|id| self.name_of(*id)).collect()
    }

    pub fn selector(&self) -> Vec<HeroOption> {
        let mut heroes: Vec<HeroOption> = self
            .0
            .iter()
            .map(|(id, name)| HeroOption {
                id: Some(*id),
                name: name.clone(),
            })
            .collect();
        heroes.sort_by(|a, b| compare_names(&a.name, &b.name).then(a.id.cmp(&b.id)));

        let mut options = Vec::with_capacity(heroes.len() + 1);
        options.push(HeroOption {
            id: None,
            name: ALL_HEROES.to_string(),
        });
        options.extend(heroes);
        options
    }

    /// Resolves a selector input: blank or "all" clears the filter, digits
    /// are taken as an id as-is, anything else must match a display name.
    pub fn resolve_selection(&self, input: &str) -> Result<Option<HeroId>> {
        let input = input.trim();
        if input.is_empty()
            || input.eq_ignore_ascii_case("all")
            || input.eq_ignore_ascii_case(ALL_HEROES)
        {
            return Ok(None);
        }
        if let Ok(id) = input.parse::<HeroId>() {
            return Ok(Some(id));
        }

        let wanted = input.to_lowercase();
        self.0
            .iter()
            .find(|(_, name)| name.to_lowercase() == wanted)
            .map(|(id, _)| Some(*id))
            .ok_or_else(|| Error::UnknownHero(input.to_string()))
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroOption {
    /// `None` is the "no filter" entry.
    pub id: Option<HeroId>,
    pub name: String,
}

#[derive(Debug, Default)]
enum DirectoryState {
    #[default]
    Unloaded,
    Loaded(HeroNames),
    /// Last attempt failed; the next access tries again.
    FailedTransient,
}

/// Lazily loaded hero directory. Only a successful load is kept.
#[derive(Debug, Default)]
pub struct HeroDirectory {
    state: DirectoryState,
}

impl HeroDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, DirectoryState::Loaded(_))
    }

    pub async fn load<A: DotaApi>(&mut self, api: &A) -> HeroNames {
        if let DirectoryState::Loaded(names) = &self.state {
            return names.clone();
        }

        match api.fetch_heroes().await {
            Ok(records) => {
                let names = HeroNames::from_records(records);
                info!("Heroes loaded: {}", names.len());
                self.state = DirectoryState::Loaded(names.clone());
                names
            }
            Err(e) => {
                error!("Error fetching hero data: {}", e);
                self.state = DirectoryState::FailedTransient;
                HeroNames::default()
            }
        }
    }

    pub async fn name_of<A: DotaApi>(&mut self, api: &A, hero_id: HeroId) -> String {
        self.load(api).await.name_of(hero_id)
    }

    pub async fn populate_selector<A: DotaApi>(&mut self, api: &A) -> Vec<HeroOption> {
        self.load(api).await.selector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::fake::{FakeApi, Reply};

    const HEROES: &str = r#"[
        {"id": 14, "localized_name": "Pudge"},
        {"id": 1, "localized_name": "Anti-Mage"},
        {"id": 2, "localized_name": "axe"},
        {"id": 5, "localized_name": "Crystal Maiden"}
    ]"#;

    #[tokio::test]
    async fn selector_starts_with_all_heroes_then_sorted_by_name() {
        let api = FakeApi::new().with_heroes(Reply::ok(HEROES));
        let mut directory = HeroDirectory::new();

        let options = directory.populate_selector(&api).await;
        let names: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["All Heroes", "Anti-Mage", "axe", "Crystal Maiden", "Pudge"]);
        assert_eq!(options[0].id, None);
        assert_eq!(options[2].id, Some(2));
    }

    #[tokio::test]
    async fn loaded_directory_is_not_fetched_again() {
        let api = FakeApi::new().with_heroes(Reply::ok(HEROES));
        let mut directory = HeroDirectory::new();

        assert_eq!(directory.name_of(&api, 14).await, "Pudge");
        assert_eq!(directory.name_of(&api, 14).await, "Pudge");
        assert_eq!(directory.name_of(&api, 99).await, "Unknown Hero (99)");
        assert_eq!(api.requests(), ["heroes"]);
    }

    #[tokio::test]
    async fn failed_load_is_retried_on_next_access() {
        let api = FakeApi::new()
            .with_heroes(Reply::status(500))
            .with_heroes(Reply::ok(HEROES));
        let mut directory = HeroDirectory::new();

        assert_eq!(directory.name_of(&api, 1).await, "Unknown Hero (1)");
        assert!(!directory.is_loaded());

        assert_eq!(directory.name_of(&api, 1).await, "Anti-Mage");
        assert!(directory.is_loaded());
        assert_eq!(api.requests().len(), 2);
    }

    #[tokio::test]
    async fn malformed_hero_list_degrades_to_empty() {
        let api = FakeApi::new().with_heroes(Reply::ok("not json"));
        let mut directory = HeroDirectory::new();

        let options = directory.populate_selector(&api).await;
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, ALL_HEROES);
    }

    #[test]
    fn selection_accepts_ids_names_and_all() {
        let names = HeroNames::from_records(vec![HeroRecord {
            id: 5,
            localized_name: "Crystal Maiden".to_string(),
        }]);

        assert_eq!(names.resolve_selection("").unwrap(), None);
        assert_eq!(names.resolve_selection("All").unwrap(), None);
        assert_eq!(names.resolve_selection("99").unwrap(), Some(99));
        assert_eq!(names.resolve_selection("crystal maiden").unwrap(), Some(5));
        assert!(matches!(
            names.resolve_selection("Invoker"),
            Err(Error::UnknownHero(_))
        ));
    }
}
