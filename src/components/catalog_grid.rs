use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{
    Component, ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_HIGHLIGHT, BG_PANEL, BG_PANEL_ALT, TEXT_DIM,
    TEXT_MAIN,
};
use crate::action::Action;
use crate::sprite::{half_block_lines, SpriteArt};
use crate::state::{EntryDetail, GRID_COLUMNS};

const CARD_MIN_HEIGHT: u16 = 4;
const CARD_MAX_HEIGHT: u16 = 10;

pub struct CatalogGridProps<'a> {
    pub entries: &'a [EntryDetail],
    pub selected: usize,
    pub sprites: &'a HashMap<String, SpriteArt>,
    pub is_focused: bool,
}

/// Grid of entry cards. Replaces its whole content on every render.
#[derive(Default)]
pub struct CatalogGrid;

impl Component<Action> for CatalogGrid {
    type Props<'a> = CatalogGridProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        if props.entries.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No entries match the current filters.",
                Style::default().fg(TEXT_DIM),
            )))
            .centered();
            frame.render_widget(empty, area);
            return;
        }

        let rows = props.entries.len().div_ceil(GRID_COLUMNS);
        let card_height = (area.height / rows.max(1) as u16).clamp(CARD_MIN_HEIGHT, CARD_MAX_HEIGHT);
        let visible_rows = (area.height / card_height).max(1) as usize;
        let selected_row = props.selected / GRID_COLUMNS;
        let first_row = selected_row.saturating_sub(visible_rows - 1);

        let row_areas = Layout::vertical(
            (0..visible_rows).map(|_| Constraint::Length(card_height)),
        )
        .split(area);
        for (slot, row_area) in row_areas.iter().enumerate() {
            let row = first_row + slot;
            if row >= rows {
                break;
            }
            let cells = Layout::horizontal(
                (0..GRID_COLUMNS).map(|_| Constraint::Ratio(1, GRID_COLUMNS as u32)),
            )
            .split(*row_area);
            for (column, cell) in cells.iter().enumerate() {
                let index = row * GRID_COLUMNS + column;
                let Some(entry) = props.entries.get(index) else {
                    break;
                };
                let highlighted = props.is_focused && index == props.selected;
                render_card(
                    frame,
                    *cell,
                    entry,
                    props.sprites.get(&entry.name),
                    highlighted,
                    index % 2 == 1,
                );
            }
        }
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    entry: &EntryDetail,
    sprite: Option<&SpriteArt>,
    highlighted: bool,
    alt: bool,
) {
    let bg = match (highlighted, alt) {
        (true, _) => BG_HIGHLIGHT,
        (false, true) => BG_PANEL_ALT,
        (false, false) => BG_PANEL,
    };
    let border = if highlighted { ACCENT_TEAL } else { TEXT_DIM };
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(bg).fg(TEXT_MAIN))
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Name
        Constraint::Min(0),    // Sprite
        Constraint::Length(1), // Types
    ])
    .split(inner);

    let name = Line::from(Span::styled(
        entry.name.clone(),
        Style::default()
            .fg(if highlighted { ACCENT_GOLD } else { TEXT_MAIN })
            .add_modifier(Modifier::BOLD),
    ))
    .centered();
    frame.render_widget(Paragraph::new(name), chunks[0]);

    if let Some(art) = sprite {
        if chunks[1].height >= 2 {
            let lines = half_block_lines(art, chunks[1].width, chunks[1].height);
            frame.render_widget(Paragraph::new(lines).centered(), chunks[1]);
        }
    }

    let types = Line::from(Span::styled(entry.type_line(), Style::default().fg(ACCENT_TEAL))).centered();
    frame.render_widget(Paragraph::new(types), chunks[2]);
}
