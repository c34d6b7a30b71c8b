use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::centered_rect;

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::sprite::{half_block_lines, SpriteArt};
use crate::state::EntryDetail;

pub const OVERLAY_WIDTH: u16 = 64;
pub const OVERLAY_HEIGHT: u16 = 22;

pub struct DetailOverlayProps<'a> {
    pub detail: &'a DataResource<EntryDetail>,
    pub sprite: Option<&'a SpriteArt>,
    pub is_focused: bool,
}

/// Modal with the selected entry's name, sprite, types, abilities and stats.
#[derive(Default)]
pub struct DetailOverlay;

impl DetailOverlay {
    pub fn area(area: Rect) -> Rect {
        centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, area)
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::DetailClose),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let modal = Self::area(area);
        frame.render_widget(Clear, modal);

        let title = props
            .detail
            .data()
            .map(|detail| detail.name.to_ascii_uppercase())
            .unwrap_or_else(|| "DETAIL".to_string());
        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(Style::default().fg(ACCENT_TEAL))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(ACCENT_GOLD)
                    .add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(Span::styled(" Esc close ", Style::default().fg(TEXT_DIM))).right_aligned());
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let detail = match props.detail {
            DataResource::Loaded(detail) => detail,
            DataResource::Loading | DataResource::Empty => {
                let loading = Paragraph::new("Loading...").style(Style::default().fg(TEXT_DIM));
                frame.render_widget(loading, inner);
                return;
            }
            DataResource::Failed(error) => {
                let failed = Paragraph::new(format!("Could not load entry: {error}"))
                    .style(Style::default().fg(ACCENT_GOLD))
                    .wrap(Wrap { trim: true });
                frame.render_widget(failed, inner);
                return;
            }
        };

        let columns = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(inner);

        match props.sprite {
            Some(art) => {
                let lines = half_block_lines(art, columns[0].width, columns[0].height);
                frame.render_widget(Paragraph::new(lines).centered(), columns[0]);
            }
            None if detail.sprite_url.is_some() => {
                frame.render_widget(
                    Paragraph::new("loading sprite...")
                        .centered()
                        .style(Style::default().fg(TEXT_DIM)),
                    columns[0],
                );
            }
            None => {}
        }

        frame.render_widget(
            Paragraph::new(detail_text(detail)).wrap(Wrap { trim: false }),
            columns[1],
        );
    }
}

fn detail_text(detail: &EntryDetail) -> Text<'static> {
    let label = Style::default().fg(TEXT_DIM);
    let value = Style::default().fg(TEXT_MAIN);
    let mut lines = vec![
        Line::from(Span::styled(
            detail.name.clone(),
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Type: ", label),
            Span::styled(detail.type_line(), Style::default().fg(ACCENT_TEAL)),
        ]),
        Line::from(vec![
            Span::styled("Abilities: ", label),
            Span::styled(detail.ability_line(), value),
        ]),
        Line::from(""),
    ];
    lines.extend(
        detail
            .stat_lines()
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), value))),
    );
    Text::from(lines)
}
