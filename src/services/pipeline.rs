use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time::sleep;

use crate::config::Config;
use crate::error::Result;
use crate::models::types::{HeroId, MatchRecord, TeamSplit};
use crate::services::api::{DotaApi, MatchPage};
use crate::services::heroes::{HeroDirectory, HeroNames, HeroOption};
use crate::utils::format::{format_duration, format_start_time, MatchEntry, MatchListView, TeamView};
use crate::utils::storage::MatchCache;

const MATCHES_PATH: &str = "publicMatches";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilters {
    /// Opaque rating bracket token; empty means unrestricted.
    pub bracket: String,
    pub hero: Option<HeroId>,
}

#[derive(Debug)]
pub struct MatchBrowser<A> {
    api: A,
    heroes: HeroDirectory,
    cache: MatchCache,
    max_pages: usize,
    page_delay: Duration,
}

impl<A: DotaApi> MatchBrowser<A> {
    pub fn new(api: A, config: &Config) -> Self {
        Self {
            api,
            heroes: HeroDirectory::new(),
            cache: MatchCache::new(),
            max_pages: config.match_pages,
            page_delay: config.page_delay,
        }
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    pub fn heroes_loaded(&self) -> bool {
        self.heroes.is_loaded()
    }

    pub async fn hero_name(&mut self, hero_id: HeroId) -> String {
        self.heroes.name_of(&self.api, hero_id).await
    }

    pub async fn hero_names(&mut self) -> HeroNames {
        self.heroes.load(&self.api).await
    }

    pub async fn hero_selector(&mut self) -> Vec<HeroOption> {
        self.heroes.populate_selector(&self.api).await
    }

    /// Runs the fetch-filter-render pipeline. Failures become
    /// [`MatchListView::Error`] and leave the cache untouched.
    pub async fn run(&mut self, filters: &MatchFilters) -> MatchListView {
        match self.try_run(filters).await {
            Ok(view) => view,
            Err(e) => {
                error!("Error: {}", e);
                MatchListView::Error(e.to_string())
            }
        }
    }

    async fn try_run(&mut self, filters: &MatchFilters) -> Result<MatchListView> {
        let heroes = self.heroes.load(&self.api).await;

        if self.cache.valid_for(&filters.bracket) {
            debug!("Reusing cached matches for bracket {:?}", filters.bracket);
        } else {
            if self.cache.bracket() != filters.bracket {
                info!(
                    "Rating bracket changed from {:?} to {:?}, discarding cached matches",
                    self.cache.bracket(),
                    filters.bracket
                );
            }
            let records =
                fetch_pages(&self.api, &filters.bracket, self.max_pages, self.page_delay).await?;
            self.cache.replace(filters.bracket.clone(), records);
        }

        let records = self.cache.records();
        info!("Total matches in cache: {}", records.len());
        if records.is_empty() {
            return Ok(MatchListView::NoMatches);
        }

        let entries: Vec<MatchEntry> = records
            .iter()
            .filter_map(|record| {
                let split = record.team_split();
                debug!(
                    "Match {}: radiant {:?}, dire {:?}",
                    record.match_id, split.radiant, split.dire
                );
                is_visible(record, &split, filters.hero)
                    .then(|| build_entry(record, &split, &heroes))
            })
            .collect();

        if entries.is_empty() {
            Ok(MatchListView::NoMatchesForHero)
        } else {
            Ok(MatchListView::Entries(entries))
        }
    }
}

/// Fetches up to `max_pages` pages, each older than the lowest match id seen so
/// far. Stops early on a rejected status or an empty page.
pub async fn fetch_pages<A: DotaApi>(
    api: &A,
    bracket: &str,
    max_pages: usize,
    page_delay: Duration,
) -> Result<Vec<MatchRecord>> {
    let base = base_path(bracket);
    let mut fetched: Vec<MatchRecord> = Vec::new();
    let mut cursor: Option<u64> = None;

    for page in 1..=max_pages {
        if page > 1 && !page_delay.is_zero() {
            sleep(page_delay).await;
        }

        let path = page_path(&base, cursor);
        let records = match api.fetch_match_page(&path).await? {
            MatchPage::Rejected(status) => {
                warn!("Page {} answered with status {}, stopping", page, status);
                break;
            }
            MatchPage::Records(records) if records.is_empty() => {
                info!("Page {} is empty, no more matches", page);
                break;
            }
            MatchPage::Records(records) => records,
        };

        cursor = records.iter().map(|r| r.match_id).chain(cursor).min();
        info!(
            "Fetched page {} with {} matches (cursor {:?})",
            page,
            records.len(),
            cursor
        );
        fetched.extend(records);
    }

    Ok(fetched)
}

pub fn base_path(bracket: &str) -> String {
    if bracket.is_empty() {
        MATCHES_PATH.to_string()
    } else {
        format!("{MATCHES_PATH}?mmr_ascending={}", urlencoding::encode(bracket))
    }
}

pub fn page_path(base: &str, cursor: Option<u64>) -> String {
    match cursor {
        Some(id) => {
            let separator = if base.contains('?') { '&' } else { '?' };
            format!("{base}{separator}less_than_match_id={id}")
        }
        None => base.to_string(),
    }
}

/// A hero filter only matches matches that carry per-player data.
pub fn is_visible(record: &MatchRecord, split: &TeamSplit, hero: Option<HeroId>) -> bool {
    match hero {
        None => true,
        Some(hero_id) => record.has_player_data() && split.contains(hero_id),
    }
}

fn build_entry(record: &MatchRecord, split: &TeamSplit, heroes: &HeroNames) -> MatchEntry {
    let show_heroes =
        record.has_player_data() && !split.radiant.is_empty() && !split.dire.is_empty();
    let team = |ids: &[HeroId], score: Option<u32>| TeamView {
        heroes: show_heroes.then(|| heroes.names_of(ids)),
        score: score.filter(|s| *s != 0),
    };

    MatchEntry {
        match_id: record.match_id,
        winner: record.winner(),
        played_at: format_start_time(record.start_time),
        duration: record
            .duration
            .filter(|d| *d != 0)
            .map(format_duration),
        radiant: team(&split.radiant, record.radiant_score),
        dire: team(&split.dire, record.dire_score),
    }
}
