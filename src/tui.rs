//! Full-screen terminal front end for the widget.
//!
//! The search bar is a text field: typed characters edit the pending input,
//! Enter submits it, Tab flips the temperature unit and Esc quits.

use anyhow::{Context, Result};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::DefaultTerminal;
use skycast_ui::{Notice, Severity, WeatherServiceMessage, WeatherWidget};
use tokio::sync::mpsc::{self, UnboundedSender};

const HELP: &str = " Enter search · Tab °C/°F · Esc quit ";

/// UI state around the widget: the last notice and in-flight searches
pub struct App {
    widget: WeatherWidget,
    status: Option<Notice>,
    pending: usize,
    should_quit: bool,
}

impl App {
    pub fn new(widget: WeatherWidget) -> Self {
        Self {
            widget,
            status: None,
            pending: 0,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Kick off the one-time default-city search
    pub fn mount(&mut self, tx: &UnboundedSender<WeatherServiceMessage>) {
        if self.widget.mount_in_background(tx) {
            self.pending += 1;
        }
    }

    pub fn handle_event(&mut self, event: &Event, tx: &UnboundedSender<WeatherServiceMessage>) {
        // Resize and focus events only need a redraw
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key, tx);
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, tx: &UnboundedSender<WeatherServiceMessage>) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Enter => {
                self.status = None;
                if self.widget.submit_in_background(tx) {
                    self.pending += 1;
                }
            }
            KeyCode::Tab => self.widget.toggle_unit(),
            KeyCode::Backspace => {
                if let Some(text) = self.widget.input() {
                    let mut text = text.to_string();
                    text.pop();
                    self.widget.set_input(text);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                let mut text = self.widget.input().unwrap_or_default().to_string();
                text.push(c);
                self.widget.set_input(text);
            }
            _ => {}
        }
        self.drain_notices();
    }

    pub fn handle_message(&mut self, message: WeatherServiceMessage) {
        self.pending = self.pending.saturating_sub(1);
        self.status = None;
        self.widget.handle_message(message);
        self.drain_notices();
    }

    /// Keep the newest notice on the status line
    fn drain_notices(&mut self) {
        if let Some(notice) = self.widget.take_notices().pop() {
            self.status = Some(notice);
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        self.draw_search_bar(frame, chunks[0]);
        self.draw_panel(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);
        frame.render_widget(
            Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
            chunks[3],
        );
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let cursor = Span::styled("\u{2588}", Style::default().fg(Color::Yellow));
        let line = match self.widget.input() {
            Some(text) if !text.is_empty() => Line::from(vec![Span::raw(text.to_string()), cursor]),
            _ => Line::from(vec![
                cursor,
                Span::styled("Search", Style::default().fg(Color::DarkGray)),
            ]),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" City ")
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_panel(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Weather ");

        let lines = match self.widget.view() {
            Some(view) => vec![
                Line::from(format!("{}  {}", view.icon.glyph(), view.icon.description())),
                Line::from(Span::styled(
                    view.temperature,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(view.location),
                Line::from(format!(
                    "Humidity {}   Wind Speed {}",
                    view.humidity, view.wind_speed
                )),
                Line::from(Span::styled(
                    format!("[Tab] {}", view.toggle_label),
                    Style::default().fg(Color::Cyan),
                )),
            ],
            None => Vec::new(),
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(notice) => {
                let color = match notice.severity {
                    Severity::Info => Color::Yellow,
                    Severity::Error => Color::Red,
                };
                Line::from(Span::styled(
                    notice.text.clone(),
                    Style::default().fg(color),
                ))
            }
            None if self.pending > 0 => Line::from("Searching..."),
            None => Line::default(),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Forward terminal events from a blocking reader thread
fn spawn_event_reader(tx: UnboundedSender<Event>) {
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!("Failed to read terminal event: {}", e);
                break;
            }
        }
    });
}

/// Run the UI until the user quits
pub async fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    let (weather_tx, mut weather_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    spawn_event_reader(event_tx);

    app.mount(&weather_tx);

    while !app.should_quit() {
        terminal
            .draw(|frame| app.draw(frame))
            .context("Failed to draw terminal")?;

        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => app.handle_event(&event, &weather_tx),
                None => break,
            },
            Some(message) = weather_rx.recv() => app.handle_message(message),
        }
    }

    tracing::info!("Skycast exiting");
    Ok(())
}
