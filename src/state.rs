use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::history::History;
use crate::provider::{PlayerInfo, PlayerProvider, PlayerRef, SeasonStat, StatTotals};
use crate::suggest::{SuggestionList, normalize_query};

pub const POSITIONS: [&str; 5] = ["All", "GK", "DF", "MF", "FW"];
pub const LEAGUES: [&str; 6] = [
    "All",
    "Ligue 1",
    "Premier League",
    "LaLiga",
    "Bundesliga",
    "Serie A",
];
pub const AGE_FLOOR: u8 = 15;
pub const AGE_CEILING: u8 = 50;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Recommendations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    pub position: usize,
    pub league: usize,
    pub age_min: u8,
    pub age_max: u8,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            position: 0,
            league: 0,
            age_min: 16,
            age_max: 40,
        }
    }
}

impl SearchFilters {
    pub fn position_label(&self) -> &'static str {
        POSITIONS[self.position % POSITIONS.len()]
    }

    pub fn league_label(&self) -> &'static str {
        LEAGUES[self.league % LEAGUES.len()]
    }

    pub fn summary(&self) -> String {
        format!(
            "Pos={}, League={}, Age={}-{}",
            self.position_label(),
            self.league_label(),
            self.age_min,
            self.age_max
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryDialog {
    pub selected: usize,
}

/// Screen regions from the last draw, used to resolve mouse clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitAreas {
    pub search: Rect,
    pub suggestions: Rect,
    pub suggestion_rows: Rect,
    pub recommendation_rows: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    TextChanged(String),
    SuggestionDown,
    SuggestionUp,
    SuggestionCommit,
    SuggestionClicked(usize),
    DismissSuggestions,
    NavigateBack,
    NavigateForward,
    OpenHistory,
    CloseHistory,
    HistoryDown,
    HistoryUp,
    HistoryCommit,
    EntrySelected(usize),
    RecommendationDown,
    RecommendationUp,
    RecommendationSelected(usize),
    Click { column: u16, row: u16 },
    FocusNext,
    FocusSearch,
    CyclePosition,
    CycleLeague,
    AgeMinUp,
    AgeMinDown,
    AgeMaxUp,
    AgeMaxDown,
    ApplyFilters,
    ToggleHelp,
    Quit,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub query: String,
    pub focus: Focus,
    pub profile: Option<PlayerInfo>,
    pub profile_error: Option<String>,
    pub recommendations: Vec<PlayerRef>,
    pub rec_selected: usize,
    pub stats: Vec<SeasonStat>,
    pub filters: SearchFilters,
    pub applied_filters: Option<SearchFilters>,
    pub history_dialog: Option<HistoryDialog>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub hit_areas: HitAreas,
    pub quit_requested: bool,
    pub suggestion_lookups: usize,
    suggestion_limit: usize,
    recommendation_limit: usize,
    history: History,
    debouncer: Debouncer,
    suggestions: SuggestionList,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            query: String::new(),
            focus: Focus::Search,
            profile: None,
            profile_error: None,
            recommendations: Vec::new(),
            rec_selected: 0,
            stats: Vec::new(),
            filters: SearchFilters::default(),
            applied_filters: None,
            history_dialog: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            hit_areas: HitAreas::default(),
            quit_requested: false,
            suggestion_lookups: 0,
            suggestion_limit: config.suggestion_limit,
            recommendation_limit: config.recommendation_limit,
            history: History::new(),
            debouncer: Debouncer::new(config.debounce),
            suggestions: SuggestionList::new(),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn debounce_remaining(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    pub fn totals(&self) -> StatTotals {
        StatTotals::from_seasons(&self.stats)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if focus != Focus::Search {
            self.suggestions.dismiss();
        }
        self.focus = focus;
    }
}

/// Routes one UI event to its handler.
pub fn dispatch(state: &mut AppState, provider: &dyn PlayerProvider, event: UiEvent, now: Instant) {
    match event {
        UiEvent::TextChanged(text) => {
            state.query = text;
            state.focus = Focus::Search;
            state.debouncer.arm(now);
        }
        UiEvent::SuggestionDown => {
            if state.suggestions.is_visible() {
                state.suggestions.move_down();
            }
        }
        UiEvent::SuggestionUp => {
            if state.suggestions.is_visible() {
                state.suggestions.move_up();
            }
        }
        UiEvent::SuggestionCommit => {
            if !state.suggestions.is_visible() {
                return;
            }
            if let Some(player) = state.suggestions.highlighted_item().cloned() {
                load_player(state, provider, player.id);
            }
        }
        UiEvent::SuggestionClicked(index) => {
            if !state.suggestions.is_visible() {
                return;
            }
            if let Some(player) = state.suggestions.get(index).cloned() {
                load_player(state, provider, player.id);
            }
        }
        UiEvent::DismissSuggestions => state.suggestions.dismiss(),
        UiEvent::NavigateBack => {
            let prev = state.history.cursor();
            if let Some(entry) = state.history.back().cloned() {
                load_from_history(state, provider, entry.id, prev);
            }
        }
        UiEvent::NavigateForward => {
            let prev = state.history.cursor();
            if let Some(entry) = state.history.forward().cloned() {
                load_from_history(state, provider, entry.id, prev);
            }
        }
        UiEvent::OpenHistory => {
            if state.history.is_empty() {
                state.push_log("[INFO] History is empty");
                return;
            }
            state.suggestions.dismiss();
            state.history_dialog = Some(HistoryDialog {
                selected: state.history.cursor().unwrap_or(0),
            });
        }
        UiEvent::CloseHistory => state.history_dialog = None,
        UiEvent::HistoryDown => {
            let last = state.history.len().saturating_sub(1);
            if let Some(dialog) = state.history_dialog.as_mut() {
                dialog.selected = (dialog.selected + 1).min(last);
            }
        }
        UiEvent::HistoryUp => {
            if let Some(dialog) = state.history_dialog.as_mut() {
                dialog.selected = dialog.selected.saturating_sub(1);
            }
        }
        UiEvent::HistoryCommit => {
            if let Some(dialog) = state.history_dialog {
                dispatch(state, provider, UiEvent::EntrySelected(dialog.selected), now);
            }
        }
        UiEvent::EntrySelected(index) => {
            state.history_dialog = None;
            let prev = state.history.cursor();
            if let Some(entry) = state.history.jump_to(index).cloned() {
                load_from_history(state, provider, entry.id, prev);
            }
        }
        UiEvent::RecommendationDown => {
            state.set_focus(Focus::Recommendations);
            let last = state.recommendations.len().saturating_sub(1);
            state.rec_selected = (state.rec_selected + 1).min(last);
        }
        UiEvent::RecommendationUp => {
            state.set_focus(Focus::Recommendations);
            state.rec_selected = state.rec_selected.saturating_sub(1);
        }
        UiEvent::RecommendationSelected(index) => {
            if let Some(player) = state.recommendations.get(index).cloned() {
                load_player(state, provider, player.id);
            }
        }
        UiEvent::Click { column, row } => handle_click(state, provider, column, row, now),
        UiEvent::FocusNext => {
            let next = match state.focus {
                Focus::Search => Focus::Recommendations,
                Focus::Recommendations => Focus::Search,
            };
            state.set_focus(next);
        }
        UiEvent::FocusSearch => state.set_focus(Focus::Search),
        UiEvent::CyclePosition => {
            state.filters.position = (state.filters.position + 1) % POSITIONS.len();
        }
        UiEvent::CycleLeague => {
            state.filters.league = (state.filters.league + 1) % LEAGUES.len();
        }
        UiEvent::AgeMinUp => {
            state.filters.age_min = (state.filters.age_min + 1).min(state.filters.age_max);
        }
        UiEvent::AgeMinDown => {
            state.filters.age_min = state.filters.age_min.saturating_sub(1).max(AGE_FLOOR);
        }
        UiEvent::AgeMaxUp => {
            state.filters.age_max = (state.filters.age_max + 1).min(AGE_CEILING);
        }
        UiEvent::AgeMaxDown => {
            state.filters.age_max = state
                .filters
                .age_max
                .saturating_sub(1)
                .max(state.filters.age_min);
        }
        UiEvent::ApplyFilters => {
            let summary = state.filters.summary();
            state.applied_filters = Some(state.filters.clone());
            state.push_log(format!("[INFO] Filters applied: {summary}"));
        }
        UiEvent::ToggleHelp => state.help_overlay = !state.help_overlay,
        UiEvent::Quit => state.quit_requested = true,
    }
}

/// Runs the suggestion lookup once the debounce window has closed.
/// Returns whether a lookup cycle ran.
pub fn tick(state: &mut AppState, provider: &dyn PlayerProvider, now: Instant) -> bool {
    if !state.debouncer.fire(now) {
        return false;
    }
    refresh_suggestions(state, provider);
    true
}

fn refresh_suggestions(state: &mut AppState, provider: &dyn PlayerProvider) {
    // The box may have been cleared or left since the deadline was armed.
    if state.focus != Focus::Search {
        state.suggestions.dismiss();
        return;
    }
    let Some(query) = normalize_query(&state.query).map(str::to_string) else {
        state.suggestions.dismiss();
        return;
    };
    state.suggestion_lookups += 1;
    let mut results = match provider.search(&query) {
        Ok(results) => results,
        Err(err) => {
            state.push_log(format!("[WARN] Suggestions for \"{query}\" failed: {err}"));
            Vec::new()
        }
    };
    results.truncate(state.suggestion_limit);
    state.suggestions.show(results);
}

/// Loads a player into the profile panes and records the visit.
/// On failure the previous profile stays and nothing is recorded.
pub fn load_player(state: &mut AppState, provider: &dyn PlayerProvider, id: u32) -> bool {
    state.query.clear();
    state.debouncer.cancel();
    state.suggestions.dismiss();

    let info = match provider.player_info(id) {
        Ok(info) => info,
        Err(err) => {
            state.profile_error = Some(err.to_string());
            state.push_log(format!("[WARN] Could not load player {id}: {err}"));
            return false;
        }
    };

    let mut recommendations = provider.recommendations(id).unwrap_or_else(|err| {
        state.push_log(format!("[WARN] Recommendations for {} failed: {err}", info.name));
        Vec::new()
    });
    recommendations.truncate(state.recommendation_limit);
    let stats = provider.stats(id).unwrap_or_else(|err| {
        state.push_log(format!("[WARN] Stats for {} failed: {err}", info.name));
        Vec::new()
    });

    state.history.visit(id, info.name.clone());
    state.push_log(format!("[INFO] Loaded {}", info.name));
    state.recommendations = recommendations;
    state.rec_selected = 0;
    state.stats = stats;
    state.profile = Some(info);
    state.profile_error = None;
    true
}

/// Loads a player reached through the history cursor. The cursor only
/// stays moved when the load succeeds.
fn load_from_history(
    state: &mut AppState,
    provider: &dyn PlayerProvider,
    id: u32,
    prev: Option<usize>,
) {
    if load_player(state, provider, id) {
        return;
    }
    if let Some(index) = prev {
        state.history.jump_to(index);
    }
}

fn handle_click(
    state: &mut AppState,
    provider: &dyn PlayerProvider,
    column: u16,
    row: u16,
    now: Instant,
) {
    if state.history_dialog.is_some() || state.help_overlay {
        return;
    }
    let areas = state.hit_areas;
    if state.suggestions.is_visible() && contains(areas.suggestions, column, row) {
        if contains(areas.suggestion_rows, column, row) {
            let index = usize::from(row - areas.suggestion_rows.y);
            dispatch(state, provider, UiEvent::SuggestionClicked(index), now);
        }
        return;
    }
    if contains(areas.search, column, row) {
        state.set_focus(Focus::Search);
        return;
    }

    state.suggestions.dismiss();
    if contains(areas.recommendation_rows, column, row) {
        state.set_focus(Focus::Recommendations);
        let index = usize::from(row - areas.recommendation_rows.y);
        if index < state.recommendations.len() {
            state.rec_selected = index;
            dispatch(state, provider, UiEvent::RecommendationSelected(index), now);
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
