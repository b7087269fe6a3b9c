use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::http::{HttpCache, http_client};
use crate::provider::{LookupError, LookupResult, PlayerInfo, PlayerProvider, PlayerRef, SeasonStat};

const FOTMOB_SEARCH_URL: &str = "https://www.fotmob.com/api/search/suggest";
const FOTMOB_PLAYER_URL: &str = "https://www.fotmob.com/api/playerData?id=";
const FOTMOB_TEAM_URL: &str = "https://www.fotmob.com/api/teams?id=";
const FOTMOB_PLAYER_IMAGE_URL: &str = "https://images.fotmob.com/image_resources/playerimages/";

/// A player as read from `playerData`: profile, season totals and the team
/// used for recommendations.
#[derive(Debug, Clone)]
pub struct FotmobPlayer {
    pub info: PlayerInfo,
    pub team_id: Option<u32>,
    pub seasons: Vec<SeasonStat>,
}

/// Provider backed by FotMob's public JSON endpoints.
pub struct FotmobProvider {
    cache: RefCell<HttpCache>,
    players: RefCell<HashMap<u32, FotmobPlayer>>,
}

impl Default for FotmobProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FotmobProvider {
    pub fn new() -> Self {
        Self {
            cache: RefCell::new(HttpCache::open_default()),
            players: RefCell::new(HashMap::new()),
        }
    }

    fn fetch(&self, url: &str) -> Result<String> {
        let client = http_client()?;
        self.cache
            .borrow_mut()
            .fetch_json(client, url, &[("Accept-Language", "en-GB,en;q=0.9")])
    }

    fn player(&self, id: u32) -> LookupResult<FotmobPlayer> {
        if let Some(player) = self.players.borrow().get(&id) {
            return Ok(player.clone());
        }
        let url = format!("{FOTMOB_PLAYER_URL}{id}");
        let body = self.fetch(&url).context("player request failed")?;
        let player = parse_player_json(&body)?.ok_or(LookupError::NotFound(id))?;
        self.players.borrow_mut().insert(id, player.clone());
        Ok(player)
    }
}

impl PlayerProvider for FotmobProvider {
    fn label(&self) -> &'static str {
        "fotmob"
    }

    /// FotMob's suggest endpoint matches fuzzily (accents, typos), so rows
    /// are kept in its ranking even when the name does not contain `query`.
    fn search(&self, query: &str) -> LookupResult<Vec<PlayerRef>> {
        let url = Url::parse_with_params(FOTMOB_SEARCH_URL, &[("term", query), ("lang", "en")])
            .context("invalid search url")?;
        let body = self.fetch(url.as_str()).context("search request failed")?;
        Ok(parse_search_json(&body)?)
    }

    fn player_info(&self, id: u32) -> LookupResult<PlayerInfo> {
        Ok(self.player(id)?.info)
    }

    fn recommendations(&self, id: u32) -> LookupResult<Vec<PlayerRef>> {
        let Some(team_id) = self.player(id)?.team_id else {
            return Ok(Vec::new());
        };
        let url = format!("{FOTMOB_TEAM_URL}{team_id}");
        let body = self.fetch(&url).context("team request failed")?;
        let squad = parse_squad_json(&body)?;
        Ok(squad.into_iter().filter(|p| p.id != id).collect())
    }

    fn stats(&self, id: u32) -> LookupResult<Vec<SeasonStat>> {
        Ok(self.player(id)?.seasons)
    }
}

#[derive(Debug, Deserialize)]
struct SearchGroup {
    #[serde(default, deserialize_with = "vec_or_default")]
    suggestions: Vec<SearchSuggestion>,
}

#[derive(Debug, Deserialize)]
struct SearchSuggestion {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    name: String,
}

pub fn parse_search_json(raw: &str) -> Result<Vec<PlayerRef>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let groups: Vec<SearchGroup> = serde_json::from_str(trimmed).context("invalid search json")?;
    let mut out = Vec::new();
    for suggestion in groups.into_iter().flat_map(|g| g.suggestions) {
        if suggestion.kind != "player" || suggestion.name.trim().is_empty() {
            continue;
        }
        let Some(id) = value_to_u32(&suggestion.id) else {
            continue;
        };
        if out.iter().any(|p: &PlayerRef| p.id == id) {
            continue;
        }
        out.push(PlayerRef {
            id,
            name: suggestion.name.trim().to_string(),
        });
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct PlayerDataResponse {
    id: u32,
    name: String,
    #[serde(rename = "primaryTeam")]
    primary_team: Option<PlayerTeam>,
    #[serde(rename = "positionDescription")]
    position_description: Option<PlayerPositionDescription>,
    #[serde(rename = "playerInformation", default, deserialize_with = "vec_or_default")]
    player_information: Vec<PlayerInfoRow>,
    #[serde(rename = "careerHistory")]
    career_history: Option<PlayerCareerHistory>,
}

#[derive(Debug, Deserialize)]
struct PlayerTeam {
    #[serde(rename = "teamId")]
    team_id: Option<u32>,
    #[serde(rename = "teamName")]
    team_name: String,
}

#[derive(Debug, Deserialize)]
struct PlayerPositionDescription {
    #[serde(rename = "primaryPosition")]
    primary_position: Option<PlayerPosition>,
}

#[derive(Debug, Deserialize)]
struct PlayerPosition {
    label: String,
}

#[derive(Debug, Deserialize)]
struct PlayerInfoRow {
    title: String,
    #[serde(rename = "translationKey")]
    translation_key: Option<String>,
    value: Option<PlayerInfoValue>,
}

#[derive(Debug, Deserialize)]
struct PlayerInfoValue {
    fallback: Value,
}

#[derive(Debug, Deserialize)]
struct PlayerCareerHistory {
    #[serde(rename = "careerItems")]
    career_items: Option<HashMap<String, PlayerCareerCategory>>,
}

#[derive(Debug, Deserialize)]
struct PlayerCareerCategory {
    #[serde(rename = "seasonEntries", default, deserialize_with = "vec_or_default")]
    season_entries: Vec<PlayerCareerSeasonEntry>,
}

#[derive(Debug, Deserialize)]
struct PlayerCareerSeasonEntry {
    #[serde(rename = "seasonName")]
    season_name: String,
    #[serde(rename = "tournamentStats", default, deserialize_with = "vec_or_default")]
    tournament_stats: Vec<PlayerTournamentStat>,
}

#[derive(Debug, Deserialize)]
struct PlayerTournamentStat {
    #[serde(default)]
    goals: Value,
    #[serde(default)]
    assists: Value,
}

/// `Ok(None)` for FotMob's `null` body, which it returns for unknown ids.
pub fn parse_player_json(raw: &str) -> Result<Option<FotmobPlayer>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let parsed: PlayerDataResponse =
        serde_json::from_str(trimmed).context("invalid player json")?;

    let mut age = None;
    let mut market_value = None;
    let mut details = Vec::new();
    for row in &parsed.player_information {
        let Some(value) = row.value.as_ref() else {
            continue;
        };
        let rendered = info_value_to_string(&value.fallback);
        match row.translation_key.as_deref() {
            Some("age_sentencecase") => age = rendered.parse::<u32>().ok(),
            Some("transfer_value") => market_value = Some(rendered),
            Some("country_sentencecase") => details.push(format!("Country: {rendered}")),
            Some("height_sentencecase") => details.push(format!("Height: {rendered}")),
            Some("preferred_foot") => details.push(format!("Preferred foot: {rendered}")),
            Some("contract_end") => details.push(format!("Contract end: {rendered}")),
            _ => details.push(format!("{}: {rendered}", row.title)),
        }
    }

    let seasons = parsed
        .career_history
        .as_ref()
        .and_then(|history| history.career_items.as_ref())
        .and_then(|items| items.get("senior"))
        .map(|senior| season_totals(&senior.season_entries))
        .unwrap_or_default();

    let (team_id, club) = match parsed.primary_team {
        Some(team) => (team.team_id, Some(team.team_name)),
        None => (None, None),
    };

    Ok(Some(FotmobPlayer {
        info: PlayerInfo {
            id: parsed.id,
            name: parsed.name,
            age,
            position: parsed
                .position_description
                .and_then(|p| p.primary_position.map(|pos| pos.label)),
            club,
            market_value,
            photo: Some(format!("{FOTMOB_PLAYER_IMAGE_URL}{}.png", parsed.id)),
            description: details.join("\n"),
        },
        team_id,
        seasons,
    }))
}

/// Goals and assists summed over every tournament in a season, oldest first.
fn season_totals(entries: &[PlayerCareerSeasonEntry]) -> Vec<SeasonStat> {
    let mut by_season: BTreeMap<String, SeasonStat> = BTreeMap::new();
    for entry in entries {
        let season = entry.season_name.trim();
        if season.is_empty() {
            continue;
        }
        let row = by_season
            .entry(season.to_string())
            .or_insert_with(|| SeasonStat {
                season: season.to_string(),
                goals: 0,
                assists: 0,
            });
        for stat in &entry.tournament_stats {
            row.goals += value_to_u32(&stat.goals).unwrap_or(0);
            row.assists += value_to_u32(&stat.assists).unwrap_or(0);
        }
    }
    by_season.into_values().collect()
}

#[derive(Debug, Deserialize)]
struct TeamSquadResponse {
    squad: TeamSquadBlock,
}

#[derive(Debug, Deserialize)]
struct TeamSquadBlock {
    #[serde(default, deserialize_with = "vec_or_default")]
    squad: Vec<SquadGroup>,
}

#[derive(Debug, Deserialize)]
struct SquadGroup {
    title: String,
    #[serde(default, deserialize_with = "vec_or_default")]
    members: Vec<SquadMember>,
}

#[derive(Debug, Deserialize)]
struct SquadMember {
    id: u32,
    name: String,
}

pub fn parse_squad_json(raw: &str) -> Result<Vec<PlayerRef>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty team response"));
    }
    let parsed: TeamSquadResponse = serde_json::from_str(trimmed).context("invalid team json")?;
    Ok(parsed
        .squad
        .squad
        .into_iter()
        .filter(|group| group.title != "coach")
        .flat_map(|group| group.members)
        .map(|member| PlayerRef {
            id: member.id,
            name: member.name,
        })
        .collect())
}

fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn info_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => {
            if *b {
                "yes".to_string()
            } else {
                "no".to_string()
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(utc)) = map.get("utcTime") {
                return utc.trim().to_string();
            }
            value.to_string()
        }
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn vec_or_default<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
