use clap::{Parser, Subcommand};
use log::{debug, warn};
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::error::Result;
use crate::services::api::DotaApi;
use crate::services::heroes::{HeroOption, ALL_HEROES};
use crate::services::pipeline::{MatchBrowser, MatchFilters};
use crate::utils::format::MatchListView;

#[derive(Debug, Parser)]
#[command(name = "dota-match-browser")]
#[command(about = "Browse recent public Dota 2 matches by rating bracket and hero", long_about = None)]
pub struct Cli {
    /// API root, overrides OPENDOTA_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Pages of matches to fetch per refill, overrides MATCH_PAGES
    #[arg(long, global = true)]
    pub pages: Option<usize>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the hero selector entries
    Heroes,
    /// Fetch, filter and print matches once
    Matches {
        /// Rating bracket passed through as mmr_ascending
        #[arg(long, default_value = "")]
        mmr: String,
        /// Hero id or name
        #[arg(long)]
        hero: Option<String>,
    },
    /// Interactive session keeping the match cache between filters
    Browse,
}

pub async fn list_heroes<A: DotaApi>(browser: &mut MatchBrowser<A>) {
    print_selector(&browser.hero_selector().await);
}

pub async fn show_matches<A: DotaApi>(
    browser: &mut MatchBrowser<A>,
    bracket: String,
    hero: Option<&str>,
) -> Result<()> {
    let names = browser.hero_names().await;
    let hero = names.resolve_selection(hero.unwrap_or_default())?;

    print!("{}", MatchListView::Loading);
    let view = browser.run(&MatchFilters { bracket, hero }).await;
    print!("{view}");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetBracket(String),
    SetHero(String),
    Filter,
    Heroes,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_action(line: &str) -> Option<Action> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let action = match command.to_lowercase().as_str() {
        "mmr" => Action::SetBracket(argument.to_string()),
        "hero" => Action::SetHero(argument.to_string()),
        "filter" | "f" => Action::Filter,
        "heroes" => Action::Heroes,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        _ => Action::Unknown(line.to_string()),
    };
    Some(action)
}

const HELP: &str = "\
Commands:
  mmr <bracket>       set the rating bracket (empty clears it)
  hero <id|name|all>  set the hero filter
  filter              fetch and show matches
  heroes              list heroes
  quit                leave";

pub async fn browse<A: DotaApi>(browser: &mut MatchBrowser<A>) -> Result<()> {
    let options = browser.hero_selector().await;
    if !browser.heroes_loaded() {
        warn!("Hero list unavailable, hero names will show as unknown");
    }
    println!("{} heroes available. Type `help` for commands.", options.len().saturating_sub(1));

    let mut filters = MatchFilters::default();
    let mut lines = BufReader::new(io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let Some(action) = parse_action(&line) else {
            continue;
        };

        match action {
            Action::SetBracket(bracket) => {
                println!("Rating bracket: {}", display_or_any(&bracket));
                filters.bracket = bracket;
            }
            Action::SetHero(input) => {
                let names = browser.hero_names().await;
                match names.resolve_selection(&input) {
                    Ok(Some(hero_id)) => {
                        filters.hero = Some(hero_id);
                        println!("Hero: {}", browser.hero_name(hero_id).await);
                    }
                    Ok(None) => {
                        filters.hero = None;
                        println!("Hero: {ALL_HEROES}");
                    }
                    Err(e) => warn!("{}", e),
                }
            }
            Action::Filter => {
                print!("{}", MatchListView::Loading);
                let view = browser.run(&filters).await;
                print!("{view}");
                debug!(
                    "{} matches cached for bracket {:?}",
                    browser.cache().records().len(),
                    browser.cache().bracket()
                );
            }
            Action::Heroes => print_selector(&browser.hero_selector().await),
            Action::Help => println!("{HELP}"),
            Action::Quit => break,
            Action::Unknown(line) => println!("Unknown command: {line}"),
        }
    }

    Ok(())
}

fn print_selector(options: &[HeroOption]) {
    for option in options {
        match option.id {
            Some(id) => println!("{id:>4}  {}", option.name),
            None => println!("   -  {}", option.name),
        }
    }
}

fn display_or_any(bracket: &str) -> &str {
    if bracket.is_empty() {
        "any"
    } else {
        bracket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_action("mmr 3000"), Some(Action::SetBracket("3000".into())));
        assert_eq!(parse_action("mmr"), Some(Action::SetBracket(String::new())));
        assert_eq!(
            parse_action("hero  Crystal Maiden "),
            Some(Action::SetHero("Crystal Maiden".into()))
        );
        assert_eq!(parse_action("FILTER"), Some(Action::Filter));
        assert_eq!(parse_action("q"), Some(Action::Quit));
        assert_eq!(parse_action("   "), None);
        assert_eq!(parse_action("dance"), Some(Action::Unknown("dance".into())));
    }

    #[test]
    fn cli_accepts_matches_flags() {
        let cli = Cli::parse_from(["dota-match-browser", "matches", "--mmr", "4000", "--hero", "axe", "--pages", "2"]);
        assert_eq!(cli.pages, Some(2));
        match cli.command {
            Some(Command::Matches { mmr, hero }) => {
                assert_eq!(mmr, "4000");
                assert_eq!(hero.as_deref(), Some("axe"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
