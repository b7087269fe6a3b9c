use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::provider::{LookupError, LookupResult, PlayerInfo, PlayerProvider, PlayerRef, SeasonStat};
use crate::suggest::find_matches;

const FIRST_SEASON: u32 = 2010;
const SEASON_COUNT: u32 = 6;

/// Offline roster used when no external source is configured.
#[derive(Debug, Clone)]
pub struct MockProvider {
    players: Vec<PlayerInfo>,
    refs: Vec<PlayerRef>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_players(seed_players())
    }

    pub fn with_players(players: Vec<PlayerInfo>) -> Self {
        let refs = players.iter().map(PlayerInfo::to_ref).collect();
        Self { players, refs }
    }

    pub fn roster(&self) -> &[PlayerRef] {
        &self.refs
    }

    fn find(&self, id: u32) -> LookupResult<&PlayerInfo> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(LookupError::NotFound(id))
    }
}

impl PlayerProvider for MockProvider {
    fn label(&self) -> &'static str {
        "mock"
    }

    fn search(&self, query: &str) -> LookupResult<Vec<PlayerRef>> {
        Ok(find_matches(&self.refs, query))
    }

    fn player_info(&self, id: u32) -> LookupResult<PlayerInfo> {
        self.find(id).cloned()
    }

    fn recommendations(&self, id: u32) -> LookupResult<Vec<PlayerRef>> {
        self.find(id)?;
        Ok(self.refs.iter().filter(|p| p.id != id).cloned().collect())
    }

    fn stats(&self, id: u32) -> LookupResult<Vec<SeasonStat>> {
        self.find(id)?;
        Ok(seed_season_stats(id))
    }
}

/// Six seasons of goals/assists, stable per player id.
pub fn seed_season_stats(id: u32) -> Vec<SeasonStat> {
    let mut rng = StdRng::seed_from_u64(u64::from(id));
    (0..SEASON_COUNT)
        .map(|offset| {
            let start = FIRST_SEASON + offset;
            SeasonStat {
                season: format!("{}/{:02}", start, (start + 1) % 100),
                goals: rng.gen_range(0..20),
                assists: rng.gen_range(0..10),
            }
        })
        .collect()
}

fn seed_players() -> Vec<PlayerInfo> {
    vec![
        seed_player(
            1,
            "Kylian Mbappé",
            27,
            "FW",
            "Real Madrid",
            "€180M",
            "Explosive forward who attacks the channels and finishes with either foot.",
        ),
        seed_player(
            2,
            "Erling Haaland",
            26,
            "FW",
            "Manchester City",
            "€180M",
            "Penalty-box striker with elite movement and a ruthless first touch.",
        ),
        seed_player(
            3,
            "Lionel Messi",
            39,
            "FW",
            "Inter Miami",
            "€18M",
            "Playmaking forward; still the best final-third passer in any game he plays.",
        ),
        seed_player(
            4,
            "Jude Bellingham",
            23,
            "MF",
            "Real Madrid",
            "€180M",
            "Box-to-box midfielder who arrives late in the area and presses relentlessly.",
        ),
        seed_player(
            5,
            "Mohamed Salah",
            34,
            "FW",
            "Liverpool",
            "€45M",
            "Inside-right forward with consistent goal output over a decade.",
        ),
        seed_player(
            6,
            "Florian Wirtz",
            23,
            "MF",
            "Liverpool",
            "€130M",
            "Creative number ten who thrives between the lines.",
        ),
        seed_player(
            7,
            "Virgil van Dijk",
            35,
            "DF",
            "Liverpool",
            "€25M",
            "Commanding centre-back, dominant in the air and calm on the ball.",
        ),
        seed_player(
            8,
            "Gianluigi Donnarumma",
            27,
            "GK",
            "Manchester City",
            "€40M",
            "Tall shot-stopper with quick reflexes and a long reach.",
        ),
        seed_player(
            9,
            "Lamine Yamal",
            19,
            "FW",
            "Barcelona",
            "€200M",
            "Left-footed winger who beats defenders one-on-one and creates from the right.",
        ),
        seed_player(
            10,
            "Harry Kane",
            33,
            "FW",
            "Bayern Munich",
            "€65M",
            "Complete centre-forward: scores, links play and drops deep to create.",
        ),
    ]
}

fn seed_player(
    id: u32,
    name: &str,
    age: u32,
    position: &str,
    club: &str,
    market_value: &str,
    description: &str,
) -> PlayerInfo {
    PlayerInfo {
        id,
        name: name.to_string(),
        age: Some(age),
        position: Some(position.to_string()),
        club: Some(club.to_string()),
        market_value: Some(market_value.to_string()),
        photo: None,
        description: description.to_string(),
    }
}
