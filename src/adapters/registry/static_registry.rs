//! Static Registry - Config-backed Team and Division Lookup
//!
//! Built once from `config.toml` and shared read-only behind an `Arc`.
//! Implements both registry ports so a single object can be handed to
//! the odds engine for team and division validation.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use tracing::info;

use super::leagues::{league_name, LEAGUES};
use crate::config::{DivisionConfig, TeamConfig};
use crate::ports::registry::{DivisionRegistry, TeamRegistry};

/// Query words shorter than this are ignored when ranking suggestions.
const MIN_SUGGESTION_WORD: usize = 3;

#[derive(Debug, Clone)]
struct TeamEntry {
    encoding: u32,
    divisions: Vec<String>,
}

#[derive(Debug, Clone)]
struct DivisionEntry {
    encoding: u32,
    name: String,
}

/// In-memory team and division registry.
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    teams: BTreeMap<String, TeamEntry>,
    divisions: BTreeMap<String, DivisionEntry>,
}

impl StaticRegistry {
    /// Build the registry from config entries.
    ///
    /// An empty `divisions` slice selects the built-in league table.
    /// Missing encodings default to the entry's position in sorted order.
    ///
    /// # Errors
    /// Fails if two teams or two divisions end up with the same encoding.
    pub fn from_config(teams: &[TeamConfig], divisions: &[DivisionConfig]) -> Result<Self> {
        let division_entries: Vec<(String, Option<String>, Option<u32>)> = if divisions.is_empty()
        {
            LEAGUES
                .iter()
                .map(|(code, name)| ((*code).to_string(), Some((*name).to_string()), None))
                .collect()
        } else {
            divisions
                .iter()
                .map(|d| (d.code.clone(), d.name.clone(), d.encoding))
                .collect()
        };

        let mut sorted_divisions = division_entries;
        sorted_divisions.sort_by(|a, b| a.0.cmp(&b.0));

        let mut division_map = BTreeMap::new();
        let mut used = HashSet::new();
        for (position, (code, name, encoding)) in sorted_divisions.into_iter().enumerate() {
            let encoding = encoding.unwrap_or(u32::try_from(position)?);
            anyhow::ensure!(
                used.insert(encoding),
                "Division '{code}' reuses encoding {encoding}"
            );
            let name = name
                .or_else(|| league_name(&code).map(str::to_string))
                .unwrap_or_else(|| code.clone());
            division_map.insert(code, DivisionEntry { encoding, name });
        }

        let mut sorted_teams: Vec<&TeamConfig> = teams.iter().collect();
        sorted_teams.sort_by(|a, b| a.name.cmp(&b.name));

        let mut team_map = BTreeMap::new();
        let mut used = HashSet::new();
        for (position, team) in sorted_teams.into_iter().enumerate() {
            let encoding = team.encoding.unwrap_or(u32::try_from(position)?);
            anyhow::ensure!(
                used.insert(encoding),
                "Team '{}' reuses encoding {encoding}",
                team.name
            );
            team_map.insert(
                team.name.clone(),
                TeamEntry {
                    encoding,
                    divisions: team.divisions.clone(),
                },
            );
        }

        info!(
            teams = team_map.len(),
            divisions = division_map.len(),
            "Registry built"
        );

        Ok(Self {
            teams: team_map,
            divisions: division_map,
        })
    }
}

impl TeamRegistry for StaticRegistry {
    fn team_code(&self, name: &str) -> Option<u32> {
        self.teams.get(name).map(|entry| entry.encoding)
    }

    fn teams(&self, division: Option<&str>) -> Vec<String> {
        self.teams
            .iter()
            .filter(|(_, entry)| match division {
                Some(code) => entry.divisions.is_empty() || entry.divisions.iter().any(|d| d == code),
                None => true,
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Case-insensitive substring ranking.
    ///
    /// Names containing the whole query come first; then names sharing
    /// query words of three or more characters, most shared words first.
    /// Ties break alphabetically.
    fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let words: Vec<&str> = query
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_SUGGESTION_WORD)
            .collect();

        let mut ranked: Vec<(u8, Reverse<usize>, &String)> = self
            .teams
            .keys()
            .filter_map(|name| {
                let lower = name.to_lowercase();
                if lower.contains(&query) {
                    return Some((0, Reverse(0), name));
                }
                let shared = words.iter().filter(|w| lower.contains(**w)).count();
                (shared > 0).then_some((1, Reverse(shared), name))
            })
            .collect();

        ranked.sort();
        ranked
            .into_iter()
            .take(limit)
            .map(|(_, _, name)| name.clone())
            .collect()
    }

    fn team_count(&self) -> usize {
        self.teams.len()
    }
}

impl DivisionRegistry for StaticRegistry {
    fn division_code(&self, code: &str) -> Option<u32> {
        self.divisions.get(code).map(|entry| entry.encoding)
    }

    fn display_name(&self, code: &str) -> Option<String> {
        self.divisions.get(code).map(|entry| entry.name.clone())
    }

    fn codes(&self) -> Vec<String> {
        self.divisions.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, divisions: &[&str]) -> TeamConfig {
        TeamConfig {
            name: name.to_string(),
            encoding: None,
            divisions: divisions.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    fn registry() -> StaticRegistry {
        StaticRegistry::from_config(
            &[
                team("Real Madrid", &["SP1"]),
                team("Atletico Madrid", &["SP1"]),
                team("Barcelona", &["SP1"]),
                team("Real Sociedad", &["SP1"]),
                team("Arsenal", &["E0"]),
                team("Wanderers", &[]),
            ],
            &[],
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_divisions_used_when_none_configured() {
        let reg = registry();
        assert_eq!(reg.codes().len(), 38);
        assert_eq!(reg.display_name("SP1").as_deref(), Some("La Liga (Spain)"));
        assert!(reg.division_code("SP1").is_some());
        assert!(reg.division_code("XX").is_none());
    }

    #[test]
    fn test_default_encodings_follow_sorted_order() {
        let reg = registry();
        assert_eq!(reg.team_code("Arsenal"), Some(0));
        assert_eq!(reg.team_code("Atletico Madrid"), Some(1));
        assert_eq!(reg.team_code("Wanderers"), Some(5));
        assert_eq!(reg.team_code("real madrid"), None);
    }

    #[test]
    fn test_teams_filtered_by_division() {
        let reg = registry();
        let spanish = reg.teams(Some("SP1"));
        assert!(spanish.contains(&"Barcelona".to_string()));
        assert!(spanish.contains(&"Wanderers".to_string()));
        assert!(!spanish.contains(&"Arsenal".to_string()));
        assert_eq!(reg.teams(None).len(), 6);
    }

    #[test]
    fn test_suggest_whole_query_substring_first() {
        let reg = registry();
        assert_eq!(
            reg.suggest("real", 3),
            vec!["Real Madrid".to_string(), "Real Sociedad".to_string()]
        );
    }

    #[test]
    fn test_suggest_misspelled_name_by_shared_word() {
        let reg = registry();
        let suggestions = reg.suggest("Raal Madrid", 3);
        assert!(suggestions.contains(&"Real Madrid".to_string()));
        assert!(suggestions.len() <= 3);
    }

    #[test]
    fn test_suggest_ranks_more_shared_words_higher() {
        let reg = registry();
        let suggestions = reg.suggest("Real Madryd Sociedad", 3);
        assert_eq!(suggestions[0], "Real Sociedad");
    }

    #[test]
    fn test_suggest_empty_query() {
        assert!(registry().suggest("  ", 3).is_empty());
    }

    #[test]
    fn test_configured_division_name_falls_back() {
        let reg = StaticRegistry::from_config(
            &[team("Celtic", &["SC0"])],
            &[
                DivisionConfig {
                    code: "SC0".to_string(),
                    name: None,
                    encoding: None,
                },
                DivisionConfig {
                    code: "XL".to_string(),
                    name: None,
                    encoding: None,
                },
            ],
        )
        .unwrap();
        assert_eq!(reg.display_name("SC0").as_deref(), Some("Scottish Premiership"));
        assert_eq!(reg.display_name("XL").as_deref(), Some("XL"));
    }

    #[test]
    fn test_duplicate_encoding_rejected() {
        let mut a = team("A", &[]);
        a.encoding = Some(7);
        let mut b = team("B", &[]);
        b.encoding = Some(7);
        assert!(StaticRegistry::from_config(&[a, b], &[]).is_err());
    }
}
