//! Map grid rendering for the quiz screen.

use mapquiz_core::{GameSession, Highlight, MapCanvas, RegionId};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::GridLayout;

/// Renders every region of the session's map as a coloured tile.
pub fn render_map_grid(
    frame: &mut Frame,
    area: Rect,
    session: &GameSession<MapCanvas>,
    layout: &GridLayout,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(session.map().title().to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (rows, cols) = (layout.rows(), layout.cols());
    if rows == 0 || cols == 0 {
        return;
    }

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows as usize])
        .split(inner);

    for (r, row_area) in row_areas.iter().enumerate() {
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols as usize])
            .split(*row_area);

        for (c, cell_area) in cell_areas.iter().enumerate() {
            if let Some(id) = layout.region_at(r as u16, c as u16) {
                render_tile(frame, *cell_area, session.view(), id);
            }
        }
    }
}

fn render_tile(frame: &mut Frame, area: Rect, canvas: &MapCanvas, id: &RegionId) {
    let highlight = canvas.highlight_of(id);
    let (r, g, b) = highlight.rgb();

    let text = match (canvas.label_of(id), highlight) {
        (Some(label), _) => label.to_string(),
        (None, Highlight::Active) => "?".to_string(),
        (None, _) => String::new(),
    };

    let mut style = Style::default().bg(Color::Rgb(r, g, b)).fg(Color::Black);
    if highlight == Highlight::Active {
        style = style.add_modifier(Modifier::BOLD);
    }

    let tile = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(tile, area);
}

/// Returns a rectangle of `width_pct` percent width and `height` rows,
/// centred in `area`.
pub fn centered_rect(area: Rect, width_pct: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_pct.min(100)) / 2),
            Constraint::Percentage(width_pct.min(100)),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}
