use std::fmt;

use chrono::{DateTime, Local};

use crate::models::types::Side;

pub const HERO_DATA_UNAVAILABLE: &str = "Hero data not available";

/// `m:ss`, seconds always two digits.
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn format_start_time(epoch_seconds: i64) -> String {
    match DateTime::from_timestamp(epoch_seconds, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => format!("@{epoch_seconds}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamView {
    /// `None` when the match carries no usable per-player data.
    pub heroes: Option<Vec<String>>,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntry {
    pub match_id: u64,
    pub winner: Side,
    pub played_at: String,
    pub duration: Option<String>,
    pub radiant: TeamView,
    pub dire: TeamView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchListView {
    Loading,
    Entries(Vec<MatchEntry>),
    NoMatches,
    NoMatchesForHero,
    Error(String),
}

impl fmt::Display for MatchListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchListView::Loading => writeln!(f, "Loading matches..."),
            MatchListView::NoMatches => writeln!(f, "No matches found"),
            MatchListView::NoMatchesForHero => {
                writeln!(f, "No matches found with the selected hero")
            }
            MatchListView::Error(message) => writeln!(f, "Error fetching matches: {message}"),
            MatchListView::Entries(entries) => {
                for entry in entries {
                    write!(f, "{entry}")?;
                }
                writeln!(f, "{} match(es) shown", entries.len())
            }
        }
    }
}

impl fmt::Display for MatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Match ID: {} | Winner: {} | Played: {}",
            self.match_id, self.winner, self.played_at
        )?;
        if let Some(duration) = &self.duration {
            write!(f, " | Duration: {duration}")?;
        }
        writeln!(f)?;
        write_team(f, "Radiant Team", &self.radiant)?;
        write_team(f, "Dire Team", &self.dire)?;
        writeln!(f)
    }
}

fn write_team(f: &mut fmt::Formatter<'_>, label: &str, team: &TeamView) -> fmt::Result {
    let heroes = match &team.heroes {
        Some(names) => names.join(", "),
        None => HERO_DATA_UNAVAILABLE.to_string(),
    };
    write!(f, "  {label}: {heroes}")?;
    if let Some(score) = team.score {
        write!(f, " (Score: {score})")?;
    }
    writeln!(f)
}
