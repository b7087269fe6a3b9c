use std::cell::Cell;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use scout_terminal::config::AppConfig;
use scout_terminal::mock_provider::MockProvider;
use scout_terminal::provider::{
    LookupError, LookupResult, PlayerInfo, PlayerProvider, PlayerRef, SeasonStat,
};
use scout_terminal::state::{self, AppState, Focus, HitAreas, UiEvent};

/// Knows every mock player for search, but refuses everything else.
struct BrokenProvider {
    inner: MockProvider,
}

impl PlayerProvider for BrokenProvider {
    fn label(&self) -> &'static str {
        "broken"
    }

    fn search(&self, _query: &str) -> LookupResult<Vec<PlayerRef>> {
        Err(LookupError::Failure("connection refused".to_string()))
    }

    fn player_info(&self, id: u32) -> LookupResult<PlayerInfo> {
        if id == 2 {
            return Err(LookupError::NotFound(id));
        }
        self.inner.player_info(id)
    }

    fn recommendations(&self, _id: u32) -> LookupResult<Vec<PlayerRef>> {
        Err(LookupError::Failure("timeout".to_string()))
    }

    fn stats(&self, _id: u32) -> LookupResult<Vec<SeasonStat>> {
        Err(LookupError::Failure("malformed".to_string()))
    }
}

/// Mock data, except that one chosen id fails its profile lookup.
struct FlakyProvider {
    inner: MockProvider,
    failing: Cell<Option<u32>>,
}

impl FlakyProvider {
    fn new() -> Self {
        Self {
            inner: MockProvider::new(),
            failing: Cell::new(None),
        }
    }
}

impl PlayerProvider for FlakyProvider {
    fn label(&self) -> &'static str {
        "flaky"
    }

    fn search(&self, query: &str) -> LookupResult<Vec<PlayerRef>> {
        self.inner.search(query)
    }

    fn player_info(&self, id: u32) -> LookupResult<PlayerInfo> {
        if self.failing.get() == Some(id) {
            return Err(LookupError::Failure("timeout".to_string()));
        }
        self.inner.player_info(id)
    }

    fn recommendations(&self, id: u32) -> LookupResult<Vec<PlayerRef>> {
        self.inner.recommendations(id)
    }

    fn stats(&self, id: u32) -> LookupResult<Vec<SeasonStat>> {
        self.inner.stats(id)
    }
}

fn app() -> AppState {
    AppState::new(&AppConfig::default())
}

fn history_ids(app: &AppState) -> Vec<u32> {
    app.history().all_entries().iter().map(|e| e.id).collect()
}

fn type_and_wait(app: &mut AppState, provider: &dyn PlayerProvider, text: &str, at: Instant) {
    state::dispatch(app, provider, UiEvent::TextChanged(text.to_string()), at);
    state::tick(app, provider, at + Duration::from_millis(250));
}

#[test]
fn mba_matches_only_mbappe() {
    let provider = MockProvider::new();
    let hits = provider.search("mba").expect("mock search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Kylian Mbappé");
    assert!(provider.search("zzz").expect("mock search").is_empty());
}

#[test]
fn search_is_case_insensitive() {
    let provider = MockProvider::new();
    let hits = provider.search("HAALAND").expect("mock search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 2);
}

#[test]
fn committing_a_suggestion_loads_and_records_it() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();

    type_and_wait(&mut app, &provider, "mba", now);
    assert!(app.suggestions().is_visible());

    // Enter with nothing highlighted does nothing.
    state::dispatch(&mut app, &provider, UiEvent::SuggestionCommit, now);
    assert!(app.profile.is_none());

    state::dispatch(&mut app, &provider, UiEvent::SuggestionDown, now);
    state::dispatch(&mut app, &provider, UiEvent::SuggestionCommit, now);

    let profile = app.profile.as_ref().expect("profile loaded");
    assert_eq!(profile.name, "Kylian Mbappé");
    assert!(app.query.is_empty());
    assert!(!app.suggestions().is_visible());
    assert!(!app.debouncer().is_pending());
    assert_eq!(history_ids(&app), vec![1]);
    assert_eq!(app.stats.len(), 6);
    assert!(app.recommendations.iter().all(|p| p.id != 1));
}

#[test]
fn suggestion_click_by_row() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();

    type_and_wait(&mut app, &provider, "l", now);
    let second = app.suggestions().get(1).cloned().expect("two suggestions");
    state::dispatch(&mut app, &provider, UiEvent::SuggestionClicked(1), now);
    assert_eq!(app.profile.as_ref().map(|p| p.id), Some(second.id));
}

#[test]
fn back_forward_and_history_selection() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();

    for id in [1, 2, 3] {
        state::load_player(&mut app, &provider, id);
    }
    assert_eq!(history_ids(&app), vec![1, 2, 3]);

    state::dispatch(&mut app, &provider, UiEvent::NavigateBack, now);
    assert_eq!(app.profile.as_ref().map(|p| p.id), Some(2));
    state::dispatch(&mut app, &provider, UiEvent::NavigateForward, now);
    assert_eq!(app.profile.as_ref().map(|p| p.id), Some(3));
    assert_eq!(history_ids(&app), vec![1, 2, 3]);

    state::dispatch(&mut app, &provider, UiEvent::OpenHistory, now);
    assert_eq!(app.history_dialog.map(|d| d.selected), Some(2));
    state::dispatch(&mut app, &provider, UiEvent::HistoryUp, now);
    state::dispatch(&mut app, &provider, UiEvent::HistoryUp, now);
    state::dispatch(&mut app, &provider, UiEvent::HistoryUp, now);
    state::dispatch(&mut app, &provider, UiEvent::HistoryCommit, now);

    assert!(app.history_dialog.is_none());
    assert_eq!(app.profile.as_ref().map(|p| p.id), Some(1));
    assert_eq!(history_ids(&app), vec![1, 2, 3]);
    assert_eq!(app.history().cursor(), Some(0));

    state::dispatch(&mut app, &provider, UiEvent::RecommendationSelected(0), now);
    let rec = app.profile.as_ref().map(|p| p.id).expect("recommendation loaded");
    assert_eq!(history_ids(&app), vec![1, rec]);
}

#[test]
fn opening_empty_history_only_logs() {
    let provider = MockProvider::new();
    let mut app = app();
    state::dispatch(&mut app, &provider, UiEvent::OpenHistory, Instant::now());
    assert!(app.history_dialog.is_none());
    assert_eq!(app.logs.back().map(String::as_str), Some("[INFO] History is empty"));
}

#[test]
fn failures_degrade_to_empty_panes() {
    let provider = BrokenProvider {
        inner: MockProvider::new(),
    };
    let mut app = app();
    let now = Instant::now();

    type_and_wait(&mut app, &provider, "messi", now);
    assert!(!app.suggestions().is_visible());
    assert!(app.logs.iter().any(|l| l.contains("connection refused")));

    assert!(state::load_player(&mut app, &provider, 1));
    assert_eq!(app.profile.as_ref().map(|p| p.id), Some(1));
    assert!(app.recommendations.is_empty());
    assert!(app.stats.is_empty());
    assert_eq!(history_ids(&app), vec![1]);
}

#[test]
fn failed_load_keeps_profile_and_history() {
    let provider = BrokenProvider {
        inner: MockProvider::new(),
    };
    let mut app = app();

    state::load_player(&mut app, &provider, 1);
    assert!(!state::load_player(&mut app, &provider, 2));

    assert_eq!(app.profile.as_ref().map(|p| p.id), Some(1));
    assert_eq!(app.profile_error.as_deref(), Some("Player not found: 2"));
    assert_eq!(history_ids(&app), vec![1]);
}

#[test]
fn click_outside_dismisses_but_search_box_does_not() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();
    app.hit_areas = HitAreas {
        search: Rect::new(0, 0, 44, 3),
        suggestions: Rect::new(0, 3, 44, 6),
        suggestion_rows: Rect::new(1, 4, 42, 4),
        recommendation_rows: Rect::new(1, 20, 40, 5),
    };

    type_and_wait(&mut app, &provider, "e", now);
    assert!(app.suggestions().is_visible());

    state::dispatch(&mut app, &provider, UiEvent::Click { column: 5, row: 1 }, now);
    assert!(app.suggestions().is_visible());

    // Overlay border: inside the overlay but not on a row.
    state::dispatch(&mut app, &provider, UiEvent::Click { column: 0, row: 3 }, now);
    assert!(app.suggestions().is_visible());

    state::dispatch(&mut app, &provider, UiEvent::Click { column: 70, row: 10 }, now);
    assert!(!app.suggestions().is_visible());
}

#[test]
fn click_on_suggestion_row_loads_player() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();
    app.hit_areas = HitAreas {
        search: Rect::new(0, 0, 44, 3),
        suggestions: Rect::new(0, 3, 44, 4),
        suggestion_rows: Rect::new(1, 4, 42, 2),
        recommendation_rows: Rect::default(),
    };

    type_and_wait(&mut app, &provider, "mba", now);
    state::dispatch(&mut app, &provider, UiEvent::Click { column: 3, row: 4 }, now);
    assert_eq!(app.profile.as_ref().map(|p| p.id), Some(1));
}

#[test]
fn leaving_search_box_dismisses_overlay() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();

    type_and_wait(&mut app, &provider, "e", now);
    state::dispatch(&mut app, &provider, UiEvent::FocusNext, now);
    assert_eq!(app.focus, Focus::Recommendations);
    assert!(!app.suggestions().is_visible());
}

#[test]
fn debounce_firing_after_focus_left_stays_hidden() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();

    state::dispatch(&mut app, &provider, UiEvent::TextChanged("e".to_string()), now);
    state::dispatch(&mut app, &provider, UiEvent::FocusNext, now);
    state::tick(&mut app, &provider, now + Duration::from_millis(300));
    assert!(!app.suggestions().is_visible());
}

#[test]
fn filters_stay_within_bounds_and_log_on_apply() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();

    for _ in 0..40 {
        state::dispatch(&mut app, &provider, UiEvent::AgeMaxDown, now);
    }
    assert_eq!(app.filters.age_max, app.filters.age_min);
    for _ in 0..10 {
        state::dispatch(&mut app, &provider, UiEvent::AgeMinDown, now);
    }
    assert_eq!(app.filters.age_min, 15);
    for _ in 0..60 {
        state::dispatch(&mut app, &provider, UiEvent::AgeMaxUp, now);
    }
    assert_eq!(app.filters.age_max, 50);

    state::dispatch(&mut app, &provider, UiEvent::CyclePosition, now);
    state::dispatch(&mut app, &provider, UiEvent::CycleLeague, now);
    state::dispatch(&mut app, &provider, UiEvent::CycleLeague, now);
    state::dispatch(&mut app, &provider, UiEvent::ApplyFilters, now);

    assert_eq!(app.applied_filters.as_ref(), Some(&app.filters));
    assert_eq!(
        app.logs.back().map(String::as_str),
        Some("[INFO] Filters applied: Pos=GK, League=Premier League, Age=15-50")
    );
}

fn shown_and_current(app: &AppState) -> (Option<u32>, Option<u32>) {
    (
        app.profile.as_ref().map(|p| p.id),
        app.history().current().map(|e| e.id),
    )
}

#[test]
fn failed_back_keeps_cursor_on_shown_player() {
    let provider = FlakyProvider::new();
    let mut app = app();
    let now = Instant::now();
    for id in [1, 2, 3] {
        state::load_player(&mut app, &provider, id);
    }

    provider.failing.set(Some(2));
    state::dispatch(&mut app, &provider, UiEvent::NavigateBack, now);
    assert_eq!(shown_and_current(&app), (Some(3), Some(3)));
    assert_eq!(app.history().cursor(), Some(2));

    // A new visit from here must not drop the shown player.
    state::dispatch(&mut app, &provider, UiEvent::RecommendationSelected(0), now);
    assert_eq!(history_ids(&app), vec![1, 2, 3, 1]);
}

#[test]
fn failed_forward_keeps_cursor_on_shown_player() {
    let provider = FlakyProvider::new();
    let mut app = app();
    let now = Instant::now();
    for id in [1, 2, 3] {
        state::load_player(&mut app, &provider, id);
    }
    state::dispatch(&mut app, &provider, UiEvent::NavigateBack, now);
    state::dispatch(&mut app, &provider, UiEvent::NavigateBack, now);
    assert_eq!(shown_and_current(&app), (Some(1), Some(1)));

    provider.failing.set(Some(2));
    state::dispatch(&mut app, &provider, UiEvent::NavigateForward, now);
    assert_eq!(shown_and_current(&app), (Some(1), Some(1)));
    assert_eq!(history_ids(&app), vec![1, 2, 3]);
    assert!(app.profile_error.is_some());
}

#[test]
fn failed_history_selection_keeps_cursor_on_shown_player() {
    let provider = FlakyProvider::new();
    let mut app = app();
    let now = Instant::now();
    for id in [1, 2, 3] {
        state::load_player(&mut app, &provider, id);
    }

    provider.failing.set(Some(1));
    state::dispatch(&mut app, &provider, UiEvent::OpenHistory, now);
    state::dispatch(&mut app, &provider, UiEvent::HistoryUp, now);
    state::dispatch(&mut app, &provider, UiEvent::HistoryUp, now);
    state::dispatch(&mut app, &provider, UiEvent::HistoryCommit, now);

    assert!(app.history_dialog.is_none());
    assert_eq!(shown_and_current(&app), (Some(3), Some(3)));
    assert_eq!(history_ids(&app), vec![1, 2, 3]);
}

#[test]
fn clicks_behind_modals_are_ignored() {
    let provider = MockProvider::new();
    let mut app = app();
    let now = Instant::now();
    app.hit_areas = HitAreas {
        search: Rect::new(0, 0, 44, 3),
        suggestions: Rect::default(),
        suggestion_rows: Rect::default(),
        recommendation_rows: Rect::new(1, 20, 40, 5),
    };
    for id in [1, 2, 3] {
        state::load_player(&mut app, &provider, id);
    }
    state::dispatch(&mut app, &provider, UiEvent::NavigateBack, now);

    state::dispatch(&mut app, &provider, UiEvent::OpenHistory, now);
    state::dispatch(&mut app, &provider, UiEvent::Click { column: 2, row: 20 }, now);
    assert_eq!(shown_and_current(&app), (Some(2), Some(2)));
    assert_eq!(history_ids(&app), vec![1, 2, 3]);
    assert!(app.history_dialog.is_some());

    state::dispatch(&mut app, &provider, UiEvent::CloseHistory, now);
    state::dispatch(&mut app, &provider, UiEvent::ToggleHelp, now);
    state::dispatch(&mut app, &provider, UiEvent::Click { column: 2, row: 20 }, now);
    assert_eq!(shown_and_current(&app), (Some(2), Some(2)));
    assert_eq!(history_ids(&app), vec![1, 2, 3]);
}
