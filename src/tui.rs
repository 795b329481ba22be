use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::{info, warn};

use crate::cli::{self, Commands};
use crate::core::error::DashError;
use crate::core::formatter::{
    format_clock, format_progress, format_short_duration, format_time_left,
};
use crate::core::job::{Job, JobStatus};
use crate::core::store::JobStore;
use crate::core::ticker::Ticker;

const TITLE: &str = "John the Ripper Dashboard";
const SUBTITLE: &str = "Monitor and manage password cracking jobs";
const FOOTER: &str = "John the Ripper Dashboard v1.0 • For authorized use only";
const DIVIDER_MARKER: &str = "<divider>";

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, DashError> {
        enable_raw_mode().map_err(DashError::terminal)?;
        let mut stdout = io::stdout();
        stdout
            .execute(EnterAlternateScreen)
            .map_err(DashError::terminal)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// View-local state: the input line and the session log.
#[derive(Debug)]
struct AppState {
    input: String,
    history: Vec<String>,
    should_quit: bool,
    scroll_offset: usize,
    view_lines: usize,
}

impl AppState {
    fn new(store: &JobStore) -> Self {
        let mut history = Vec::new();
        history.push("Welcome to crackboard. Type 'help' for commands.".to_string());
        let loaded = store.jobs().len();
        if loaded > 0 {
            history.push(format!("Loaded {loaded} jobs."));
        }
        Self {
            input: String::new(),
            history,
            should_quit: false,
            scroll_offset: 0,
            view_lines: 1,
        }
    }

    fn push_history(&mut self, line: impl Into<String>) {
        const MAX_LINES: usize = 500;
        if self.history.len() >= MAX_LINES {
            let drain_count = self.history.len().saturating_sub(MAX_LINES - 1);
            self.history.drain(0..drain_count);
        }
        self.history.push(line.into());
        self.clamp_scroll();
    }

    fn set_view_lines(&mut self, lines: usize) {
        self.view_lines = lines.max(1);
        self.clamp_scroll();
    }

    fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.max_scroll();
        self.scroll_offset = (self.scroll_offset + lines).min(max_scroll);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    fn scroll_top(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    fn scroll_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    fn max_scroll(&self) -> usize {
        self.history.len().saturating_sub(self.view_lines)
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = self.max_scroll();
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }
    }
}

/// Mounts the dashboard: takes over the terminal, starts the tick timer and
/// runs until the user quits. The timer is stopped before the store is
/// released.
pub fn run(mut store: JobStore, interval: Duration) -> Result<(), DashError> {
    let _guard = TerminalGuard::enter()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(DashError::terminal)?;

    let mut app = AppState::new(&store);
    let mut ticker = Ticker::start(interval);
    info!(interval_ms = interval.as_millis() as u64, "dashboard mounted");

    let result = event_loop(&mut terminal, &mut app, &mut store, &ticker);

    ticker.stop();
    info!("dashboard torn down");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    store: &mut JobStore,
    ticker: &Ticker,
) -> Result<(), DashError> {
    loop {
        for _ in 0..ticker.drain() {
            let report = store.tick();
            for (id, status) in report.resolved {
                if let Some(job) = store.get(id) {
                    let line = match status {
                        JobStatus::Completed => format!("Job #{id} {} cracked.", job.file_name),
                        _ => format!("Job #{id} {} failed.", job.file_name),
                    };
                    app.push_history(line);
                }
            }
        }

        let now = Local::now();
        terminal
            .draw(|frame| draw(frame, app, store, now))
            .map_err(DashError::terminal)?;

        if event::poll(Duration::from_millis(50)).map_err(DashError::terminal)? {
            if let Event::Key(key) = event::read().map_err(DashError::terminal)? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    KeyCode::Char(ch) => {
                        app.input.push(ch);
                    }
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Enter => {
                        let line = app.input.trim().to_string();
                        app.input.clear();
                        if !line.is_empty() {
                            handle_line(app, store, &line);
                        }
                    }
                    KeyCode::PageUp => {
                        let step = app.view_lines.saturating_sub(1).max(1);
                        app.scroll_up(step);
                    }
                    KeyCode::PageDown => {
                        let step = app.view_lines.saturating_sub(1).max(1);
                        app.scroll_down(step);
                    }
                    KeyCode::Up => {
                        app.scroll_up(1);
                    }
                    KeyCode::Down => {
                        app.scroll_down(1);
                    }
                    KeyCode::Home => {
                        app.scroll_top();
                    }
                    KeyCode::End => {
                        app.scroll_bottom();
                    }
                    KeyCode::Esc => {
                        app.should_quit = true;
                    }
                    _ => {}
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_line(app: &mut AppState, store: &mut JobStore, line: &str) {
    let trimmed = line.trim();
    if !app.history.is_empty() {
        app.push_history(DIVIDER_MARKER);
    }
    app.push_history(format!(">> {trimmed}"));

    match cli::parse_line(trimmed) {
        Ok(Commands::Submit(args)) => match cli::submit_args_to_request(args) {
            Ok(request) => {
                if let Some(id) = store.submit(request) {
                    if let Some(job) = store.get(id) {
                        app.push_history(format!("Submitted job #{id}: {}", job.file_name));
                    }
                }
            }
            Err(err) => {
                warn!(%err, "rejected submission");
                app.push_history(format!("error: {err}"));
            }
        },
        Ok(Commands::Help) => {
            for line in cli::HELP_LINES {
                app.push_history(line);
            }
        }
        Ok(Commands::Clear) => {
            app.history.clear();
            app.scroll_bottom();
        }
        Ok(Commands::Quit) => {
            app.should_quit = true;
        }
        Err(err) => {
            warn!(%err, "invalid command");
            for line in err.lines().filter(|line| !line.trim().is_empty()) {
                app.push_history(format!("error: {line}"));
            }
        }
    }
}

/// Renders the whole dashboard from the store and the view state.
fn draw(frame: &mut Frame, app: &mut AppState, store: &JobStore, now: DateTime<Local>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    frame.render_widget(render_header(), layout[0]);
    render_stats(frame, layout[1], store);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[2]);
    let active: Vec<&Job> = store.active().collect();
    let finished: Vec<&Job> = store.finished().collect();
    frame.render_widget(
        render_active_jobs(&active, columns[0].width as usize, now),
        columns[0],
    );
    frame.render_widget(render_recent_jobs(&finished), columns[1]);

    app.set_view_lines(layout[3].height.saturating_sub(2) as usize);
    frame.render_widget(
        render_history(app, layout[3].height as usize, layout[3].width as usize),
        layout[3],
    );

    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().title("Submit New Job").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(input, layout[4]);
    let column = input_cursor_column(&app.input, layout[4].width);
    frame.set_cursor(layout[4].x + 1 + column, layout[4].y + 1);

    let footer = Paragraph::new(FOOTER)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, layout[5]);
}

/// Display width of the typed text, kept inside the input box borders.
fn input_cursor_column(input: &str, box_width: u16) -> u16 {
    let inner = box_width.saturating_sub(2);
    let width = Span::raw(input).width();
    u16::try_from(width).unwrap_or(u16::MAX).min(inner)
}

fn render_header() -> Paragraph<'static> {
    let text = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(SUBTITLE),
    ];
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn render_stats(frame: &mut Frame, area: Rect, store: &JobStore) {
    let stats = store.stats();
    let cards = [
        ("Total Jobs", stats.total_jobs, Color::Blue),
        ("Running", stats.running_jobs, status_color(JobStatus::Running)),
        ("Completed", stats.completed_jobs, status_color(JobStatus::Completed)),
        ("Failed", stats.failed_jobs, status_color(JobStatus::Failed)),
    ];
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, count, color), area) in cards.into_iter().zip(areas.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                count.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(label),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(card, *area);
    }
}

fn status_color(status: JobStatus) -> Color {
    match status {
        JobStatus::Running => Color::Yellow,
        JobStatus::Completed => Color::Green,
        JobStatus::Failed => Color::Red,
        JobStatus::Pending => Color::Gray,
    }
}

fn job_title(job: &Job) -> Line<'static> {
    let color = status_color(job.status);
    Line::from(vec![
        Span::styled("▌", Style::default().fg(color)),
        Span::styled(
            job.file_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", job.status.label()),
            Style::default().fg(color),
        ),
    ])
}

fn render_active_jobs(jobs: &[&Job], width: usize, now: DateTime<Local>) -> List<'static> {
    let bar_width = width.saturating_sub(12).clamp(10, 40);
    let items: Vec<ListItem> = jobs
        .iter()
        .map(|job| {
            let mut lines = vec![
                job_title(job),
                Line::from(format!(
                    " Started: {}  Timeout: {}",
                    format_clock(&job.start_time),
                    format_short_duration(job.timeout)
                )),
            ];
            if let Some(url) = &job.wordlist_url {
                lines.push(Line::from(format!(" Wordlist: {url}")));
            }
            if job.status == JobStatus::Running {
                lines.push(Line::from(format!(
                    " Progress: {}  Est. time left: {}",
                    format_progress(job.progress),
                    format_time_left(job, now)
                )));
                lines.push(Line::from(Span::styled(
                    format!(" {}", render_progress_bar(job.progress, bar_width)),
                    Style::default().fg(Color::Blue),
                )));
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    List::new(items).block(Block::default().title("Active Jobs").borders(Borders::ALL))
}

fn render_recent_jobs(jobs: &[&Job]) -> List<'static> {
    let items: Vec<ListItem> = jobs
        .iter()
        .map(|job| {
            let ended = job
                .end_time
                .as_ref()
                .map(format_clock)
                .unwrap_or_else(|| "N/A".to_string());
            let mut lines = vec![
                job_title(job),
                Line::from(format!(
                    " Started: {}  Ended: {ended}",
                    format_clock(&job.start_time)
                )),
            ];
            if let Some(password) = job.password() {
                lines.push(Line::from(vec![
                    Span::styled(" Password: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(password.to_string()),
                ]));
            }
            if let Some(error) = job.error() {
                lines.push(Line::from(vec![
                    Span::styled(" Error: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(error.to_string()),
                ]));
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    List::new(items).block(Block::default().title("Recent Jobs").borders(Borders::ALL))
}

fn render_progress_bar(progress: f64, width: usize) -> String {
    let width = width.max(10);
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');

    let ratio = (progress / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    for idx in 0..width {
        if idx < filled {
            bar.push('=');
        } else if idx == filled && filled < width {
            bar.push('>');
        } else {
            bar.push(' ');
        }
    }
    bar.push(']');
    bar
}

fn render_history(app: &AppState, height: usize, width: usize) -> Paragraph<'static> {
    let max_lines = height.saturating_sub(2).max(1);
    let end = app.history.len().saturating_sub(app.scroll_offset);
    let start = end.saturating_sub(max_lines);
    let divider_width = width.saturating_sub(2).max(1);
    let divider = "─".repeat(divider_width);
    let lines: Vec<Line> = app.history[start..end]
        .iter()
        .map(|line| {
            if line == DIVIDER_MARKER {
                Line::from(Span::raw(divider.clone()))
            } else {
                Line::from(line.clone())
            }
        })
        .collect();

    Paragraph::new(lines)
        .block(Block::default().title("Session").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
}
