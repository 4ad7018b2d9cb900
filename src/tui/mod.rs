//! Terminal editor: a text stave, the virtual piano and the play control.

pub mod help;
pub mod keybindings;
pub mod status;

pub use help::HelpScreen;
pub use keybindings::Action;
pub use status::StatusInfo;

use std::io;
use std::time::Duration as StdDuration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::keymap::KeyMap;
use crate::log::Level;
use crate::notation::{LayoutMetrics, Stave, TextStave};
use crate::playback::{AudioOutput, Clock, Player, SystemClock};
use crate::theory::{Duration, DurationCode};

/// Rows of the text stave plus its border.
const STAVE_HEIGHT: u16 = 19;
const VOLUME_STEP: f32 = 0.1;

/// The main TUI application state.
pub struct App<A: AudioOutput, C: Clock = SystemClock> {
    pub stave: Stave<TextStave>,
    pub player: Player<A, C>,
    pub keymap: KeyMap,
    /// Duration given to newly entered notes.
    pub duration: Duration,
    pub help_screen: HelpScreen,
    pub should_quit: bool,
    audio_label: String,
}

impl<A: AudioOutput, C: Clock> App<A, C> {
    pub fn new(
        player: Player<A, C>,
        keymap: KeyMap,
        metrics: LayoutMetrics,
        audio_label: impl Into<String>,
    ) -> Self {
        Self {
            stave: Stave::new(TextStave::new(metrics), metrics),
            player,
            keymap,
            duration: Duration::plain(DurationCode::Quarter),
            help_screen: HelpScreen::new(keymap.layout()),
            should_quit: false,
            audio_label: audio_label.into(),
        }
    }

    /// Process an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.player.request_stop();
                self.should_quit = true;
            }
            Action::TogglePlayback => {
                if self.stave.melody().is_empty() && !self.player.is_playing() {
                    self.player.log_mut().info("nothing to play");
                }
                self.player.toggle(self.stave.melody());
            }
            Action::Note(pitch) => {
                let code = self.duration.code();
                let dotted = self.duration.is_dotted();
                match self.stave.append_note(vec![pitch], code, dotted) {
                    Ok(()) => {
                        if let Some(note) = self.stave.melody().last() {
                            self.player.preview(note);
                        }
                    }
                    Err(e) => self.player.log_mut().error(e.to_string()),
                }
            }
            Action::RemoveLast => {
                self.stave.remove_last();
            }
            Action::ClearAll => self.stave.clear_all(),
            Action::SelectDuration(code) => {
                self.duration = Duration::new(code, self.duration.is_dotted())
                    .unwrap_or(Duration::plain(code));
            }
            Action::ToggleDot => self.duration = self.duration.toggle_dot(),
            Action::ApplyDurationToLast => {
                let result = self
                    .stave
                    .change_last_note_duration(self.duration.code(), self.duration.is_dotted());
                if let Err(e) = result {
                    self.player.log_mut().error(e.to_string());
                }
            }
            Action::OctaveUp => self.keymap.octave_up(),
            Action::OctaveDown => self.keymap.octave_down(),
            Action::VolumeUp => self.step_volume(1.0),
            Action::VolumeDown => self.step_volume(-1.0),
            Action::ToggleHelp => self.help_screen.toggle(),
            Action::HelpScrollUp => self.help_screen.scroll_up(),
            Action::HelpScrollDown => self.help_screen.scroll_down(10),
            Action::Escape => self.help_screen.hide(),
        }
    }

    fn step_volume(&mut self, direction: f32) {
        let steps = (self.player.volume() / VOLUME_STEP).round() + direction;
        if let Err(e) = self.player.set_volume(steps * VOLUME_STEP) {
            self.player.log_mut().warn(e.to_string());
        }
    }

    pub fn status(&self) -> StatusInfo {
        StatusInfo {
            is_playing: self.player.is_playing(),
            duration: self.duration,
            base_octave: self.keymap.base_octave(),
            volume: self.player.volume(),
            layout: self.keymap.layout(),
            note_count: self.stave.melody().len(),
            stave_width: self.stave.width(),
            audio_label: self.audio_label.clone(),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(STAVE_HEIGHT), // Stave
                Constraint::Min(4),               // Entry + log
                Constraint::Length(1),            // Status bar
            ])
            .split(size);

        self.draw_stave(frame, chunks[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[1]);
        self.draw_entry(frame, middle[0]);
        self.draw_log(frame, middle[1]);

        self.draw_status(frame, chunks[2]);

        if self.help_screen.visible {
            self.draw_help(frame, size);
        }
    }

    fn draw_stave(&self, frame: &mut Frame, area: Rect) {
        let melody = self.stave.melody();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(
                " Stave | {} notes | width {:.0} ",
                melody.len(),
                self.stave.width()
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // keep the newest notes in view
        let visible = inner.width as usize;
        let lines: Vec<Line> = self
            .stave
            .surface()
            .lines()
            .iter()
            .map(|row| {
                let len = row.chars().count();
                let shown: String = row.chars().skip(len.saturating_sub(visible)).collect();
                Line::from(shown)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_entry(&self, frame: &mut Frame, area: Rect) {
        let status = self.status();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Entry ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let row = |name: &'static str, text: String| {
            Line::from(vec![
                Span::styled(format!("{name:<10}"), label),
                Span::styled(text, value),
            ])
        };

        let mut lines = vec![
            row("Duration", status.duration_display()),
            row("Octave", status.base_octave.to_string()),
            row("Keyboard", status.layout_display().to_string()),
            row("Volume", status.volume_display()),
        ];
        if let Some(cursor) = self.player.cursor() {
            lines.push(row("Playing", format!("note {cursor}/{}", status.note_count)));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_log(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Log ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = self
            .player
            .log()
            .recent(inner.height as usize)
            .into_iter()
            .map(|entry| {
                let color = match entry.level {
                    Level::Info => Color::Gray,
                    Level::Warn => Color::Yellow,
                    Level::Error => Color::Red,
                };
                Line::from(Span::styled(entry.to_string(), Style::default().fg(color)))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let status = self.status();
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", status.playback_display()),
                Style::default()
                    .fg(if status.is_playing {
                        Color::Green
                    } else {
                        Color::Red
                    })
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                " {} | oct {} | {} notes | ",
                status.duration.symbol(),
                status.base_octave,
                status.note_count,
            )),
            Span::styled(
                format!("{} ", status.audio_label),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                " Space:play  Bksp:undo  1-6:duration  ?:help ",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));
        frame.render_widget(paragraph, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let width = (area.width * 70 / 100).max(50).min(area.width);
        let height = (area.height * 70 / 100).max(15).min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let overlay = Rect::new(x, y, width, height);

        let block = Block::default()
            .style(Style::default().bg(Color::Black))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help | ? or Esc to close ");
        let inner = block.inner(overlay);
        frame.render_widget(ratatui::widgets::Clear, overlay);
        frame.render_widget(block, overlay);

        let lines: Vec<Line> = self
            .help_screen
            .lines()
            .iter()
            .skip(self.help_screen.scroll_offset)
            .take(inner.height as usize)
            .map(|hl| {
                let color = if hl.is_header {
                    Color::Yellow
                } else {
                    Color::White
                };
                Line::from(Span::styled(hl.text.as_str(), Style::default().fg(color)))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// What the screen shows of the player; a change means a redraw.
    fn player_view(&self) -> (bool, Option<usize>, u64) {
        (
            self.player.is_playing(),
            self.player.cursor(),
            self.player.log().total(),
        )
    }

    /// Run the TUI event loop.
    ///
    /// The player is ticked every round; the screen is redrawn only after
    /// input or when the player's visible state changes.
    pub fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> io::Result<()> {
        let mut redraw = true;
        while !self.should_quit {
            if redraw {
                terminal
                    .draw(|frame| self.draw(frame))
                    .map_err(|e| io::Error::other(e.to_string()))?;
                redraw = false;
            }

            // Short poll so note boundaries are serviced promptly
            if event::poll(StdDuration::from_millis(5))? {
                match event::read()? {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) =
                            keybindings::map_key(key, &self.keymap, self.help_screen.visible)
                        {
                            self.handle_action(action);
                            redraw = true;
                        }
                    }
                    CrosstermEvent::Resize(..) => redraw = true,
                    _ => {}
                }
            }

            let before = self.player_view();
            self.player.tick();
            redraw |= self.player_view() != before;
        }

        Ok(())
    }
}
