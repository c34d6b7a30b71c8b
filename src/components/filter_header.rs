use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::FilterCriteria;

pub struct FilterHeaderProps<'a> {
    pub filters: &'a FilterCriteria,
    pub search_active: bool,
    pub refreshing: bool,
}

/// One-line summary of the active search, type and generation filters.
#[derive(Default)]
pub struct FilterHeader;

impl Component<Action> for FilterHeader {
    type Props<'a> = FilterHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let search = if props.search_active {
            format!("/{}_", props.filters.search_text)
        } else if props.filters.search_text.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", props.filters.search_text)
        };
        let type_label = option_label(props.filters.type_filter.as_deref());
        let generation_label = option_label(props.filters.generation_filter.as_deref());

        let mut spans = vec![
            Span::raw("Search: "),
            Span::styled(search, Style::default().fg(ACCENT_TEAL)),
            Span::raw("  |  Type: "),
            Span::styled(type_label, Style::default().fg(ACCENT_GOLD)),
            Span::raw("  |  Generation: "),
            Span::styled(generation_label, Style::default().fg(ACCENT_GOLD)),
        ];
        if props.refreshing {
            spans.push(Span::styled(
                "  Loading...",
                Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC),
            ));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(Style::default().fg(TEXT_DIM))
            .title(Span::styled(
                "POKEGRID",
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}

fn option_label(value: Option<&str>) -> String {
    value
        .map(|name| name.to_ascii_uppercase())
        .unwrap_or_else(|| "ALL".to_string())
}
