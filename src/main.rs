use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use futscout_terminal::api::{ApiClient, PlayerSide};
use futscout_terminal::heatmap::{Accent, cell_style, pct, scale_color, zone_style};
use futscout_terminal::state::{
    AppState, Comparison, Delta, HealthStatus, MIN90S_STEP, ProviderCommand, apply_delta,
    bootstrap_commands,
};
use futscout_terminal::{demo, export, provider, radar};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn send_commands(&mut self, commands: Vec<ProviderCommand>) {
        for cmd in commands {
            if self.cmd_tx.send(cmd).is_err() {
                self.state.push_log("[WARN] Provider unavailable");
                return;
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('l') | KeyCode::Char('L') => {
                let commands = self.state.cycle_league();
                self.send_commands(commands);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                let commands = self.state.cycle_position();
                self.send_commands(commands);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let commands = self.state.adjust_min90s(MIN90S_STEP);
                self.send_commands(commands);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                let commands = self.state.adjust_min90s(-MIN90S_STEP);
                self.send_commands(commands);
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('a') | KeyCode::Char('A') => {
                let commands = self.state.assign_slot_a();
                self.send_commands(commands);
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                let commands = self.state.assign_slot_b();
                self.send_commands(commands);
            }
            KeyCode::Char('r') | KeyCode::Enter => {
                let commands = self.state.rerun_compare();
                self.send_commands(commands);
            }
            KeyCode::Char('t') | KeyCode::Tab => self.state.cycle_radar_axis(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_comparison(),
            _ => {}
        }
    }

    fn export_comparison(&mut self) {
        let Some(comparison) = &self.state.comparison else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        match export::export_comparison(Path::new("."), comparison) {
            Ok(path) => {
                let line = format!("[INFO] Exported {}", path.display());
                self.state.push_log(line);
            }
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    if demo::demo_enabled() {
        demo::spawn_demo_provider(tx, cmd_rx);
    } else {
        provider::spawn_provider(ApiClient::from_env(), tx, cmd_rx);
    }

    let mut app = App::new(cmd_tx);
    app.send_commands(bootstrap_commands());
    let res = run_app(&mut terminal, &mut app, rx);

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

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            let follow_ups = apply_delta(&mut app.state, delta);
            app.send_commands(follow_ups);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], &app.state);
    render_console(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text()).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let health = match state.health {
        HealthStatus::Unknown => "checking...".to_string(),
        HealthStatus::Offline => "offline".to_string(),
        HealthStatus::Ok(health) => format!("ok ({} rows)", health.rows),
    };
    let league = if state.filters.league.is_empty() {
        "-"
    } else {
        state.filters.league.as_str()
    };
    let loading = if state.loading { " | Comparing..." } else { "" };
    let line1 = format!(
        "  __  FUTSCOUT | {} | Pos: {} | Min 90s: {:.1} | API: {health}{loading}",
        league, state.filters.position, state.filters.min90s
    );
    let line2 = " (__)  player comparison terminal".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text() -> String {
    "l League | p Position | +/- Min 90s | j/k Move | a/b Slot A/B | r Compare | t Axis | x Export | ? Help | q Quit"
        .to_string()
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(36),
            Constraint::Min(40),
            Constraint::Length(42),
        ])
        .split(area);

    render_players(frame, columns[0], state);
    render_radar_panel(frame, columns[1], state);
    render_heatmaps(frame, columns[2], state);
}

fn render_players(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!("Players ({})", state.players.len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.players.is_empty() {
        let empty = Paragraph::new("No players for these filters")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }
    if inner.height == 0 {
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.selected, state.players.len(), visible);

    let mut lines = Vec::with_capacity(end - start);
    for idx in start..end {
        let row = &state.players[idx];
        let cursor = if idx == state.selected { "> " } else { "  " };
        let slot = slot_marker(state, &row.name);
        let nineties = row
            .nineties
            .map(|n| format!("{n:.1}"))
            .unwrap_or_else(|| "-".to_string());
        let text = format!("{cursor}{slot} {} ({}) {nineties}", row.name, row.squad);

        let style = if idx == state.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::styled(text, style));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn slot_marker(state: &AppState, name: &str) -> &'static str {
    let is_a = state.player_a.as_deref() == Some(name);
    let is_b = state.player_b.as_deref() == Some(name);
    match (is_a, is_b) {
        (true, true) => "[AB]",
        (true, false) => "[A] ",
        (false, true) => "[B] ",
        (false, false) => "    ",
    }
}

fn render_radar_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(4)])
        .split(area);

    let Some(comparison) = &state.comparison else {
        let placeholder = if let Some(error) = &state.error {
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
        } else if state.loading {
            Paragraph::new("Comparing...").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new("No comparison yet").style(Style::default().fg(Color::DarkGray))
        };
        frame.render_widget(
            placeholder.block(Block::default().title("Radar").borders(Borders::ALL)),
            rows[0],
        );
        return;
    };

    let a = &comparison.player_a;
    let b = &comparison.player_b;
    let geometry = radar::RadarGeometry::build(
        &a.radar.labels,
        radar::RadarSeries::new(a.name.clone(), a.radar.percentiles.clone(), Accent::Blue),
        radar::RadarSeries::new(b.name.clone(), b.radar.percentiles.clone(), Accent::Red),
    );

    match &geometry {
        Some(geometry) => radar::render(geometry, frame, rows[0]),
        None => {
            let empty = Paragraph::new("No radar axes in response")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Radar").borders(Borders::ALL));
            frame.render_widget(empty, rows[0]);
        }
    }

    render_axis_detail(frame, rows[1], state, comparison);
}

fn render_axis_detail(frame: &mut Frame, area: Rect, state: &AppState, comparison: &Comparison) {
    let a = &comparison.player_a;
    let b = &comparison.player_b;
    let axis = state.radar_axis.min(a.radar.labels.len().saturating_sub(1));

    let mut lines = Vec::new();
    if let Some(label) = a.radar.labels.get(axis) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{label}  "),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                radar::tooltip_label(&a.name, a.radar.percentiles.get(axis).copied().unwrap_or(0.0)),
                Style::default().fg(Accent::Blue.color()),
            ),
            Span::raw("  |  "),
            Span::styled(
                radar::tooltip_label(&b.name, b.radar.percentiles.get(axis).copied().unwrap_or(0.0)),
                Style::default().fg(Accent::Red.color()),
            ),
        ]));
    }
    lines.push(Line::from(format!(
        "Overall: {} {} vs {} {}",
        a.name, a.radar.overall, b.name, b.radar.overall
    )));

    let detail =
        Paragraph::new(lines).block(Block::default().title("Axis (t)").borders(Borders::ALL));
    frame.render_widget(detail, area);
}

fn render_heatmaps(frame: &mut Frame, area: Rect, state: &AppState) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    match &state.comparison {
        Some(comparison) => {
            render_heatmap_side(frame, halves[0], &comparison.player_a, Accent::Blue, state.max_heat);
            render_heatmap_side(frame, halves[1], &comparison.player_b, Accent::Red, state.max_heat);
        }
        None => {
            for (half, title) in halves.iter().zip(["Heatmap A", "Heatmap B"]) {
                let empty = Paragraph::new("No data")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(Block::default().title(title).borders(Borders::ALL));
                frame.render_widget(empty, *half);
            }
        }
    }
}

fn render_heatmap_side(
    frame: &mut Frame,
    area: Rect,
    side: &PlayerSide,
    accent: Accent,
    max_heat: f64,
) {
    let block = Block::default()
        .title(format!("{} ({})", side.name, side.squad))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent.color()));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width < 20 {
        return;
    }

    let heatmap = &side.heatmap;
    let mut constraints = vec![Constraint::Length(1); heatmap.matrix.len() + 1];
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let label_width = Constraint::Length(9);
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([label_width, Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    for (i, x_label) in heatmap.x_labels.iter().take(2).enumerate() {
        let header = Paragraph::new(x_label.as_str())
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(header, header_cols[i + 1]);
    }

    for (row_idx, matrix_row) in heatmap.matrix.iter().enumerate() {
        let Some(row_area) = rows.get(row_idx + 1) else {
            break;
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([label_width, Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);

        let y_label = heatmap
            .y_labels
            .get(row_idx)
            .map(String::as_str)
            .unwrap_or("");
        frame.render_widget(Paragraph::new(y_label), cols[0]);

        for (col_idx, &value) in matrix_row.iter().take(2).enumerate() {
            render_heat_cell(frame, cols[col_idx + 1], value, max_heat, accent);
        }
    }
}

fn render_heat_cell(frame: &mut Frame, area: Rect, value: f64, max_heat: f64, accent: Accent) {
    let cell = cell_style(value, max_heat, accent);
    let zone = zone_style(cell.norm, accent);

    let usable = area.width.saturating_sub(5) as f64;
    let bar_len = (usable * zone.width_pct / 100.0).round() as usize;
    let bar: String = "█".repeat(bar_len.max(1));

    let line = Line::from(vec![
        Span::styled(bar, Style::default().fg(scale_color(accent, zone.core_opacity))),
        Span::raw(" "),
        Span::raw(pct(cell.norm)),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().bg(cell.background));
    frame.render_widget(paragraph, area);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(error) = &state.error {
        lines.push(Line::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    for log in state.logs.iter().rev().take(3).collect::<Vec<_>>().into_iter().rev() {
        lines.push(Line::from(log.clone()));
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let console =
        Paragraph::new(lines).block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FutScout Terminal - Help",
        "",
        "Filters:",
        "  l            Cycle league",
        "  p            Cycle position (ALL first)",
        "  + / -        Min 90s up/down by 0.5",
        "",
        "Comparison:",
        "  j/k or ↑/↓   Move player cursor",
        "  a / b        Put cursor player in slot A / B",
        "  r / Enter    Re-run comparison",
        "  t / Tab      Inspect next radar axis",
        "  x            Export comparison to .xlsx",
        "",
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
