use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Wrap,
};

use scout_terminal::config::AppConfig;
use scout_terminal::input::{map_key, map_mouse};
use scout_terminal::provider::PlayerProvider;
use scout_terminal::state::{self, AppState, Focus, HitAreas};

struct App {
    state: AppState,
    provider: Box<dyn PlayerProvider>,
}

impl App {
    fn new(config: &AppConfig) -> Self {
        let provider = config.source.provider();
        let mut state = AppState::new(config);
        state.push_log(format!("[INFO] Data source: {}", provider.label()));
        Self { state, provider }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if let Some(ev) = map_key(&self.state, key) {
            state::dispatch(&mut self.state, self.provider.as_ref(), ev, Instant::now());
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if let Some(ev) = map_mouse(mouse) {
            state::dispatch(&mut self.state, self.provider.as_ref(), ev, Instant::now());
        }
    }

    fn on_tick(&mut self) {
        state::tick(&mut self.state, self.provider.as_ref(), Instant::now());
    }
}

fn main() -> io::Result<()> {
    let config = AppConfig::load();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(&config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.on_tick();
        terminal.draw(|f| ui(f, app))?;

        let mut timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if let Some(remaining) = app.state.debounce_remaining(Instant::now()) {
            timeout = timeout.min(remaining);
        }
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.state.quit_requested {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let state = &mut app.state;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(20)])
        .split(rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(42), Constraint::Min(30)])
        .split(rows[1]);

    let mut hits = HitAreas {
        search: header[0],
        ..HitAreas::default()
    };

    render_search_box(frame, header[0], state);
    render_filters(frame, header[1], state);
    hits.recommendation_rows = render_sidebar(frame, columns[0], state);
    render_main_content(frame, columns[1], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[2]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, rows[3]);

    if state.suggestions().is_visible() {
        let (outer, inner) = render_suggestions(frame, header[0], state);
        hits.suggestions = outer;
        hits.suggestion_rows = inner;
    }
    if state.history_dialog.is_some() {
        render_history_dialog(frame, frame.size(), state);
    }
    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }

    state.hit_areas = hits;
}

fn render_search_box(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::Search;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let (text, text_style) = if state.query.is_empty() {
        ("Search a player...".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (state.query.clone(), Style::default())
    };
    let input = Paragraph::new(text).style(text_style).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);

    if focused && state.history_dialog.is_none() && !state.help_overlay {
        frame.set_cursor(cursor_column(area, &state.query), area.y + 1);
    }
}

/// Column just past the typed text, held inside the box border.
fn cursor_column(area: Rect, query: &str) -> u16 {
    let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(typed).min(max_x)
}

fn render_filters(frame: &mut Frame, area: Rect, state: &AppState) {
    let f = &state.filters;
    let applied = match &state.applied_filters {
        Some(applied) if applied == f => "applied",
        Some(_) => "changed",
        None => "not applied",
    };
    let text = format!(
        "Position: {}  Age: {}-{}  League: {}  ({applied})",
        f.position_label(),
        f.age_min,
        f.age_max,
        f.league_label()
    );
    let filters = Paragraph::new(text).block(Block::default().title("Filters").borders(Borders::ALL));
    frame.render_widget(filters, area);
}

/// Draws the profile sidebar and returns the area of the recommendation rows.
fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Percentage(40),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(nav_text(state)), chunks[0]);

    let photo = state
        .profile
        .as_ref()
        .and_then(|p| p.photo.clone())
        .unwrap_or_else(|| "No photo".to_string());
    let photo = Paragraph::new(photo)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Photo").borders(Borders::ALL));
    frame.render_widget(photo, chunks[1]);

    let (name, info) = match (&state.profile, &state.profile_error) {
        (_, Some(err)) => (
            Line::styled("Lookup failed", Style::default().fg(Color::Red)),
            err.clone(),
        ),
        (Some(p), None) => (
            Line::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            info_line(p),
        ),
        (None, None) => (
            Line::styled(
                "No player selected",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            String::new(),
        ),
    };
    let profile = Paragraph::new(vec![name, Line::raw(info)]).wrap(Wrap { trim: true });
    frame.render_widget(profile, chunks[2]);

    let description = state
        .profile
        .as_ref()
        .map(|p| p.description.clone())
        .unwrap_or_default();
    let description = Paragraph::new(description)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Description").borders(Borders::ALL));
    frame.render_widget(description, chunks[3]);

    let focused = state.focus == Focus::Recommendations;
    let block = Block::default()
        .title("You may also like")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner = block.inner(chunks[4]);
    let lines = if state.recommendations.is_empty() {
        vec![Line::styled(
            "No recommendations",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        state
            .recommendations
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                if focused && idx == state.rec_selected {
                    Line::styled(
                        format!("> {}", p.name),
                        Style::default().fg(Color::White).bg(Color::DarkGray),
                    )
                } else {
                    Line::raw(format!("  {}", p.name))
                }
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(block), chunks[4]);
    inner
}

fn render_main_content(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(area);

    let totals = state.totals();
    let key_style = Style::default().add_modifier(Modifier::BOLD);
    let rows = [
        ("Seasons", totals.seasons.to_string()),
        ("Goals", totals.goals.to_string()),
        ("Assists", totals.assists.to_string()),
    ]
    .into_iter()
    .map(|(key, value)| Row::new(vec![Span::styled(key, key_style), Span::raw(value)]));
    let grid = Table::new(rows, [Constraint::Length(12), Constraint::Min(6)])
        .column_spacing(4)
        .block(Block::default().title("Stats").borders(Borders::ALL));
    frame.render_widget(grid, chunks[0]);

    render_goals_chart(frame, chunks[1], state);
}

fn render_goals_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Goals by Season").borders(Borders::ALL);
    if state.stats.is_empty() {
        let empty = Paragraph::new("No stats yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let points: Vec<(f64, f64)> = state
        .stats
        .iter()
        .enumerate()
        .map(|(idx, row)| (idx as f64, f64::from(row.goals)))
        .collect();
    let max_goals = state.stats.iter().map(|row| row.goals).max().unwrap_or(0);
    let y_max = f64::from(max_goals.max(1)) * 1.1;
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let first = state.stats.first().map(|r| r.season.clone()).unwrap_or_default();
    let last = state.stats.last().map(|r| r.season.clone()).unwrap_or_default();

    let dataset = Dataset::default()
        .name("Goals")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title("Season")
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .title("Goals")
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(max_goals.to_string())]),
        );
    frame.render_widget(chart, area);
}

/// Draws the suggestion overlay under the search box.
/// Returns the overlay area and the area holding its rows.
fn render_suggestions(frame: &mut Frame, anchor: Rect, state: &AppState) -> (Rect, Rect) {
    let screen = frame.size();
    let items = state.suggestions().items();
    let below = anchor.y + anchor.height;
    let height = (items.len() as u16 + 2).min(screen.height.saturating_sub(below));
    let area = Rect {
        x: anchor.x,
        y: below,
        width: anchor.width,
        height,
    };
    frame.render_widget(Clear, area);

    let highlighted = state.suggestions().highlighted();
    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            if Some(idx) == highlighted {
                Line::styled(
                    p.name.clone(),
                    Style::default().fg(Color::Black).bg(Color::LightBlue),
                )
            } else {
                Line::raw(p.name.clone())
            }
        })
        .collect();
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
    (area, inner)
}

fn render_history_dialog(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(40, 60, area);
    frame.render_widget(Clear, popup_area);

    let selected = state.history_dialog.map(|d| d.selected).unwrap_or(0);
    let cursor = state.history().cursor();
    let lines: Vec<Line> = state
        .history()
        .all_entries()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let marker = if Some(idx) == cursor { "*" } else { " " };
            let text = format!("{marker} {}", entry.name);
            if idx == selected {
                Line::styled(text, Style::default().fg(Color::White).bg(Color::DarkGray))
            } else {
                Line::raw(text)
            }
        })
        .collect();
    let dialog = Paragraph::new(lines).block(
        Block::default()
            .title("Player history (Enter open, Esc close)")
            .borders(Borders::ALL),
    );
    frame.render_widget(dialog, popup_area);
}

fn nav_text(state: &AppState) -> Line<'static> {
    let enabled = Style::default().fg(Color::Yellow);
    let disabled = Style::default().fg(Color::DarkGray);
    let history = state.history();
    Line::from(vec![
        Span::styled(
            "← Back",
            if history.can_go_back() { enabled } else { disabled },
        ),
        Span::raw("  "),
        Span::styled(
            "Forward →",
            if history.can_go_forward() {
                enabled
            } else {
                disabled
            },
        ),
        Span::raw("  "),
        Span::styled(
            format!("History ({})", history.len()),
            if history.is_empty() { disabled } else { enabled },
        ),
    ])
}

fn info_line(p: &scout_terminal::provider::PlayerInfo) -> String {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();
    format!(
        "Club: {} | Age: {} | Position: {} | Value: {}",
        or_dash(p.club.as_deref()),
        p.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
        or_dash(p.position.as_deref()),
        or_dash(p.market_value.as_deref())
    )
}

fn footer_text(state: &AppState) -> String {
    match state.focus {
        Focus::Search => {
            "Type to search | ↑/↓ Pick | Enter Open | Esc/Tab Leave | Alt+←/→ Back/Forward | Alt+h History | Ctrl+C Quit".to_string()
        }
        Focus::Recommendations => {
            "/ Search | j/k Move | Enter Open | b/f Back/Forward | h History | p/g/[ ]/{ } Filters | a Apply | ? Help | q Quit".to_string()
        }
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Scout Terminal - Help",
        "",
        "Search box:",
        "  type         Live suggestions",
        "  ↑/↓ Enter    Pick a suggestion",
        "  Esc / Tab    Leave the search box",
        "  Alt+←/→      Back / Forward",
        "  Alt+h        History",
        "",
        "Elsewhere:",
        "  / or s       Focus search",
        "  j/k Enter    Browse recommendations",
        "  b / f        Back / Forward",
        "  h            History",
        "  p / g        Cycle position / league",
        "  [ ]  { }     Min age -/+, max age -/+",
        "  a            Apply filters",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
