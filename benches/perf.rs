use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use scout_terminal::config::AppConfig;
use scout_terminal::fotmob_provider::{parse_player_json, parse_search_json};
use scout_terminal::mock_provider::MockProvider;
use scout_terminal::provider::PlayerRef;
use scout_terminal::state::{self, AppState, UiEvent};
use scout_terminal::suggest::find_matches;

fn large_roster(size: u32) -> Vec<PlayerRef> {
    (0..size)
        .map(|id| PlayerRef {
            id,
            name: format!("Player {id} Surname{}", id % 97),
        })
        .collect()
}

fn bench_find_matches(c: &mut Criterion) {
    let roster = large_roster(5_000);
    c.bench_function("find_matches_5k", |b| {
        b.iter(|| {
            let hits = find_matches(black_box(&roster), black_box("surname4"));
            black_box(hits.len());
        })
    });
}

fn bench_keystroke_burst(c: &mut Criterion) {
    let provider = MockProvider::new();
    c.bench_function("keystroke_burst_then_tick", |b| {
        b.iter(|| {
            let mut app = AppState::new(&AppConfig::default());
            let start = Instant::now();
            let mut text = String::new();
            for (step, ch) in "haaland".chars().enumerate() {
                text.push(ch);
                let at = start + Duration::from_millis(step as u64 * 40);
                state::dispatch(&mut app, &provider, UiEvent::TextChanged(text.clone()), at);
                state::tick(&mut app, &provider, at);
            }
            state::tick(&mut app, &provider, start + Duration::from_secs(2));
            black_box(app.suggestions().items().len());
        })
    });
}

fn bench_load_player(c: &mut Criterion) {
    let provider = MockProvider::new();
    c.bench_function("load_player_mock", |b| {
        let mut app = AppState::new(&AppConfig::default());
        let mut id = 0u32;
        b.iter(|| {
            id = id % 10 + 1;
            black_box(state::load_player(&mut app, &provider, id));
        })
    });
}

fn bench_fotmob_parse(c: &mut Criterion) {
    c.bench_function("fotmob_player_parse", |b| {
        b.iter(|| {
            let player = parse_player_json(black_box(PLAYER_JSON)).unwrap();
            black_box(player.map(|p| p.seasons.len()));
        })
    });
    c.bench_function("fotmob_search_parse", |b| {
        b.iter(|| {
            let hits = parse_search_json(black_box(SEARCH_JSON)).unwrap();
            black_box(hits.len());
        })
    });
}

criterion_group!(
    perf,
    bench_find_matches,
    bench_keystroke_burst,
    bench_load_player,
    bench_fotmob_parse
);
criterion_main!(perf);

static PLAYER_JSON: &str = include_str!("../tests/fixtures/fotmob_player.json");
static SEARCH_JSON: &str = include_str!("../tests/fixtures/fotmob_search.json");
