//! Ratatui-based terminal UI.
//!
//! The TUI provides a search bar (symbol + range), a price summary, and the
//! chart panel. Searches go through `SearchController`; this module only maps
//! keys to controller calls and draws controller state.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};

use crate::app::controller::{Phase, SearchController};
use crate::chart::Palette;
use crate::data::QuoteSource;
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::PriceChartWidget;

/// Start the TUI and run the initial search for the controller's symbol.
pub fn run<S: QuoteSource>(controller: SearchController<S>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App { controller };
    app.search(&mut terminal)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Search,
    Redraw,
    Ignore,
}

/// Characters accepted in the symbol box (covers `BRK-B`, `^GSPC`, `EURUSD=X`, `SAP.DE`).
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

struct App<S> {
    controller: SearchController<S>,
}

impl<S: QuoteSource> App<S> {
    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.handle_key(key.code, key.modifiers) {
                        KeyAction::Quit => break,
                        KeyAction::Search => self.search(terminal)?,
                        KeyAction::Redraw => {}
                        KeyAction::Ignore => continue,
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn redraw<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    /// Validate, show the loading frame, then block on the single fetch.
    fn search<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let Some(ticket) = self.controller.begin_search() else {
            return Ok(());
        };
        self.redraw(terminal)?;
        let outcome = self.controller.fetch(&ticket);
        self.controller.complete_search(&ticket, outcome);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        match code {
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Enter => KeyAction::Search,
            KeyCode::Backspace => {
                self.controller.pop_char();
                KeyAction::Redraw
            }
            KeyCode::Char(c) if is_symbol_char(c) => {
                self.controller.push_char(c);
                KeyAction::Redraw
            }
            KeyCode::Up => {
                let range = self.controller.range().prev();
                self.controller.set_range(range);
                KeyAction::Redraw
            }
            KeyCode::Down => {
                let range = self.controller.range().next();
                self.controller.set_range(range);
                KeyAction::Redraw
            }
            KeyCode::Left | KeyCode::Right => {
                let delta = if code == KeyCode::Left { -1 } else { 1 };
                if let Some(chart) = self.controller.chart_mut().current_mut() {
                    chart.move_cursor(delta);
                }
                KeyAction::Redraw
            }
            KeyCode::Home => {
                if let Some(chart) = self.controller.chart_mut().current_mut() {
                    chart.move_cursor(isize::MIN / 2);
                }
                KeyAction::Redraw
            }
            KeyCode::End => {
                if let Some(chart) = self.controller.chart_mut().current_mut() {
                    chart.move_cursor(isize::MAX / 2);
                }
                KeyAction::Redraw
            }
            _ => KeyAction::Ignore,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_search_bar(frame, chunks[0]);
        self.draw_summary(frame, chunks[1]);
        self.draw_chart(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_search_bar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let range = self.controller.range();
        let line = Line::from(vec![
            Span::styled("qc", Style::default().fg(Color::Cyan)),
            Span::raw("  symbol: "),
            Span::styled(
                format!("{}▏", self.controller.symbol_input()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   range: "),
            Span::styled(
                format!("◂ {} ▸", range.as_str()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(format!(" ({})", range.display_name()), Style::default().fg(Color::Gray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_summary(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL);

        let Some(summary) = self.controller.summary() else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let (r, g, b) = Palette::for_direction(summary.direction).line;
        let change_color = Color::Rgb(r, g, b);

        let lines = vec![
            Line::from(vec![
                Span::styled(summary.symbol.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(summary.exchange_name.clone(), Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![
                Span::styled(summary.price.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(summary.change.clone(), Style::default().fg(change_color)),
            ]),
        ];
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chart = self.controller.chart().current();
        let title = chart.map(|c| c.title.clone()).unwrap_or_else(|| "Chart".to_string());
        let mut block = Block::default().title(title).borders(Borders::ALL);
        if let Some(tooltip) = chart.and_then(|c| c.tooltip()) {
            block = block.title_bottom(Line::from(tooltip).alignment(Alignment::Right));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let waiting = match (chart, self.controller.phase()) {
            (_, Phase::Loading) => Some("Loading..."),
            (None, _) => Some("Waiting for data..."),
            (Some(c), _) if c.is_empty() => Some("No data points for this range."),
            _ => None,
        };
        if let Some(msg) = waiting {
            let p = Paragraph::new(msg)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(p, inner);
            return;
        }

        if let Some(chart) = chart {
            frame.render_widget(PriceChartWidget { chart }, inner);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "type symbol  Enter search  ↑/↓ range  ←/→ inspect  Esc quit";
        let status = match self.controller.error_message() {
            _ if self.controller.is_loading() => Span::styled("Loading...", Style::default().fg(Color::Yellow)),
            Some(err) => Span::styled(err.to_string(), Style::default().fg(Color::Red)),
            None => Span::raw(""),
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            status,
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
