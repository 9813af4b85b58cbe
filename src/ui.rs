//! Layout and drawing: playfield, sidebar with score and controls, game over.

use crate::theme::Theme;
use arenatris::game::GameOverReason;
use arenatris::render::Renderer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::{DefaultTerminal, Frame};
use std::io;

/// Each grid cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;

const CONTROLS: [(&str, &str); 6] = [
    ("←/h →/l", "move"),
    ("↑/k", "rotate cw"),
    ("u/z", "rotate ccw"),
    ("↓/j", "down"),
    ("space", "drop"),
    ("q/esc", "quit"),
];

/// Score box, gap, and bordered controls list with its heading.
const SIDEBAR_HEIGHT: u16 = 3 + 1 + CONTROLS.len() as u16 + 3;

/// Playfield size in terminal cells (border + grid) for given grid dimensions.
fn playfield_size(width: usize, height: usize) -> (u16, u16) {
    (width as u16 * CELL_WIDTH + 2, height as u16 + 2)
}

/// Centre a `width` x `height` box inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(horiz[1])[1]
}

/// One text line per grid row.
fn playfield_lines<'a>(theme: &Theme, rows: &[Vec<bool>]) -> Vec<Line<'a>> {
    let filled = Style::default().fg(theme.block).bg(theme.bg);
    let empty = Style::default().bg(theme.bg);
    rows.iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&occupied| {
                        if occupied {
                            Span::styled("██", filled)
                        } else {
                            Span::styled("  ", empty)
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

pub fn draw_game(frame: &mut Frame, theme: &Theme, rows: &[Vec<bool>], score: u32, area: Rect) {
    let width = rows.first().map_or(0, Vec::len);
    let (pw, ph) = playfield_size(width, rows.len());
    let active_area = centered(area, pw + SIDEBAR_WIDTH, ph.max(SIDEBAR_HEIGHT));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(active_area);
    let playfield = Rect {
        height: ph.min(chunks[0].height),
        ..chunks[0]
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Arenatris ", theme.title));
    Paragraph::new(playfield_lines(theme, rows))
        .block(block)
        .render(playfield, frame.buffer_mut());

    draw_sidebar(frame, theme, score, chunks[1]);
}

fn draw_sidebar(frame: &mut Frame, theme: &Theme, score: u32, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score
            Constraint::Length(1), // gap
            Constraint::Length(CONTROLS.len() as u16 + 3), // Controls
        ])
        .split(area);

    let border_style = Style::default().fg(theme.div_line);
    Paragraph::new(Line::from(vec![
        Span::styled("Score: ", title_style),
        Span::styled(score.to_string(), fg_style),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(border_style))
    .render(chunks[0], frame.buffer_mut());

    let mut lines = vec![Line::from(Span::styled("Controls", title_style))];
    lines.extend(CONTROLS.iter().map(|(keys, what)| {
        Line::from(vec![
            Span::styled(format!("{keys:<8}"), fg_style.bold()),
            Span::styled(*what, fg_style),
        ])
    }));
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(border_style))
        .render(chunks[2], frame.buffer_mut());
}

pub fn draw_game_over(
    frame: &mut Frame,
    theme: &Theme,
    score: u32,
    lines_cleared: u32,
    reason: Option<GameOverReason>,
    area: Rect,
) {
    let popup = centered(area, 30, 9);
    let title = match reason {
        Some(GameOverReason::Quit) => " Quit ",
        _ => " Game Over ",
    };
    let fg = Style::default().fg(theme.main_fg);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(theme.bg).bg(theme.title))),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {score} "), fg)),
        Line::from(Span::styled(format!(" Lines: {lines_cleared} "), fg)),
        Line::from(""),
        Line::from(Span::styled(" any key to exit ", fg)),
    ];
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Arenatris ", theme.title)),
        )
        .render(popup, frame.buffer_mut());
}

/// Draws frames into the alternate screen.
pub struct TerminalRenderer<'t> {
    terminal: &'t mut DefaultTerminal,
    theme: Theme,
}

impl<'t> TerminalRenderer<'t> {
    pub fn new(terminal: &'t mut DefaultTerminal, theme: Theme) -> Self {
        Self { terminal, theme }
    }
}

impl Renderer for TerminalRenderer<'_> {
    fn draw(&mut self, rows: &[Vec<bool>], score: u32) -> io::Result<()> {
        let theme = &self.theme;
        self.terminal
            .draw(|f| draw_game(f, theme, rows, score, f.area()))?;
        Ok(())
    }
}
