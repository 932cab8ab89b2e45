//! Terminal status board on a ratatui inline viewport
//!
//! The viewport is `capacity + 1` rows tall: one row per slot plus the row
//! for the done marker. Output stays on screen after the process exits.
//! A board that does not fit the screen is refused up front, since ratatui
//! would otherwise shrink the viewport and hide the bottom rows.

use crate::error::ConfigError;
use crate::proxy::TimeClass;
use crate::tui::board::{StatusBoard, StatusLine};
use crate::Result;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal, TerminalOptions, Viewport,
};
use std::io::{self, Stdout};

/// Status board drawn with ratatui
pub struct TerminalBoard<B: Backend> {
    terminal: Terminal<B>,
    rows: Vec<Option<StatusLine>>,
    done: Option<String>,
    /// Last viewport row, where the cursor is parked when done
    last_row: u16,
}

impl TerminalBoard<CrosstermBackend<Stdout>> {
    /// Board on stdout holding `capacity` slot rows
    pub fn stdout(capacity: usize) -> Result<Self> {
        Self::inline(CrosstermBackend::new(io::stdout()), capacity)
    }
}

impl<B: Backend> TerminalBoard<B> {
    /// Board on an inline viewport of `capacity + 1` rows below the cursor
    pub fn inline(backend: B, capacity: usize) -> Result<Self> {
        let height = ensure_fits(&backend, capacity)?;
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )?;
        Ok(Self::from_terminal(terminal, capacity))
    }

    /// Board on an arbitrary backend, using the whole backend area
    pub fn with_backend(backend: B, capacity: usize) -> Result<Self> {
        ensure_fits(&backend, capacity)?;
        let terminal = Terminal::new(backend)?;
        Ok(Self::from_terminal(terminal, capacity))
    }

    fn from_terminal(terminal: Terminal<B>, capacity: usize) -> Self {
        Self {
            terminal,
            rows: vec![None; capacity],
            done: None,
            last_row: 0,
        }
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn redraw(&mut self) -> Result<()> {
        let rows = &self.rows;
        let done = &self.done;
        let mut last_row = 0;

        self.terminal.draw(|f| {
            let area = f.size();
            last_row = area.bottom().saturating_sub(1);
            let row_rect = |i: usize| Rect::new(area.x, area.y + i as u16, area.width, 1);

            for (i, row) in rows.iter().enumerate() {
                if i as u16 >= area.height {
                    break;
                }
                if let Some(line) = row {
                    f.render_widget(Paragraph::new(render_line(line)), row_rect(i));
                }
            }

            if let Some(marker) = done {
                if (rows.len() as u16) < area.height {
                    let text = Span::styled(
                        marker.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    );
                    f.render_widget(Paragraph::new(Line::from(text)), row_rect(rows.len()));
                }
            }
        })?;

        self.last_row = last_row;
        Ok(())
    }
}

impl<B: Backend> StatusBoard for TerminalBoard<B> {
    fn write_row(&mut self, line: &StatusLine) -> Result<()> {
        let row = line.row();
        if row >= self.rows.len() {
            // Batches never exceed capacity, so this is a caller bug
            anyhow::bail!("slot {} outside board of {} rows", line.slot, self.rows.len());
        }
        self.rows[row] = Some(line.clone());
        self.redraw()
    }

    fn reset(&mut self) -> Result<()> {
        self.rows.iter_mut().for_each(|row| *row = None);
        self.done = None;
        self.terminal.clear()?;
        self.redraw()
    }

    fn finish(&mut self, marker: &str) -> Result<()> {
        self.done = Some(marker.to_string());
        self.redraw()?;
        self.terminal.set_cursor(0, self.last_row)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Rows needed for `capacity` slots and the done marker, if the screen has them
fn ensure_fits<B: Backend>(backend: &B, capacity: usize) -> Result<u16> {
    let screen = backend.size()?.height;
    match u16::try_from(capacity + 1) {
        Ok(needed) if needed <= screen => Ok(needed),
        _ => Err(ConfigError::RowsExceedTerminal {
            rows: capacity,
            height: screen,
        }
        .into()),
    }
}

fn class_style(class: TimeClass) -> Style {
    match class {
        TimeClass::Good => Style::default().bg(Color::Green).fg(Color::White),
        TimeClass::Neutral => Style::default().bg(Color::DarkGray).fg(Color::White),
        TimeClass::Bad => Style::default()
            .bg(Color::Red)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    }
}

/// Styled spans for one board row
pub fn render_line(line: &StatusLine) -> Line<'static> {
    let index_style = Style::default()
        .bg(Color::Black)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(format!("{} ", line.index_text()), index_style),
        Span::raw(" "),
    ];

    if let Some(elapsed) = line.elapsed_text() {
        let style = line.time_class.map(class_style).unwrap_or_default();
        spans.push(Span::styled(format!(" {} ", elapsed), style));
        spans.push(Span::raw(" "));
    }

    let message_style = line.message_class.map(class_style).unwrap_or_default();
    spans.push(Span::styled(format!(" {} ", line.message), message_style));

    Line::from(spans)
}
