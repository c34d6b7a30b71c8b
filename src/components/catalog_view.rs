use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use super::{
    CatalogGrid, CatalogGridProps, Component, DetailOverlay, DetailOverlayProps, FilterHeader,
    FilterHeaderProps, PaginationBar, PaginationBarProps, ACCENT_GOLD, ACCENT_TEAL, BG_BASE,
    BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::{AppState, FocusArea, GRID_COLUMNS};

pub struct CatalogViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Root view: filter header, card grid, pager and status bar, with the
/// detail overlay drawn on top while open.
pub struct CatalogView {
    grid: CatalogGrid,
    pager: PaginationBar,
    header: FilterHeader,
    overlay: DetailOverlay,
    status_bar: StatusBar,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            grid: CatalogGrid,
            pager: PaginationBar,
            header: FilterHeader,
            overlay: DetailOverlay,
            status_bar: StatusBar::new(),
        }
    }

    /// Areas for header, grid, pager and status bar.
    pub fn layout(area: Rect) -> [Rect; 4] {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Filters
            Constraint::Min(4),    // Cards
            Constraint::Length(3), // Pager
            Constraint::Length(3), // Status
        ])
        .split(area);
        [chunks[0], chunks[1], chunks[2], chunks[3]]
    }

    pub fn overlay(&mut self) -> &mut DetailOverlay {
        &mut self.overlay
    }
}

impl Component<Action> for CatalogView {
    type Props<'a> = CatalogViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        let state = props.state;

        if state.search_active {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Action::SearchFinish),
                KeyCode::Backspace => Some(Action::SearchBackspace),
                KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Action::SearchInput(ch))
                }
                _ => None,
            };
        }

        let global = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') | KeyCode::F(5) => Some(Action::RefreshRequest),
            KeyCode::Char('/') => Some(Action::SearchStart),
            KeyCode::Char('t') => Some(Action::TypeFilterNext),
            KeyCode::Char('T') => Some(Action::TypeFilterPrev),
            KeyCode::Char('g') => Some(Action::GenerationFilterNext),
            KeyCode::Char('G') => Some(Action::GenerationFilterPrev),
            KeyCode::Char('c') => Some(Action::FiltersClear),
            KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PagePrev),
            KeyCode::Char(']') | KeyCode::PageDown => Some(Action::PageNext),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::UiFocusToggle),
            _ => None,
        };
        if global.is_some() {
            return global;
        }

        let columns = GRID_COLUMNS as i16;
        match state.focus {
            FocusArea::Grid => match key.code {
                KeyCode::Left => Some(Action::CardMove(-1)),
                KeyCode::Right => Some(Action::CardMove(1)),
                KeyCode::Up => Some(Action::CardMove(-columns)),
                KeyCode::Down => Some(Action::CardMove(columns)),
                KeyCode::Enter => Some(Action::CardOpen),
                _ => None,
            },
            FocusArea::Pager => match key.code {
                KeyCode::Left => Some(Action::PagerCursorMove(-1)),
                KeyCode::Right => Some(Action::PagerCursorMove(1)),
                KeyCode::Home => Some(Action::PagerCursorFirst),
                KeyCode::End => Some(Action::PagerCursorLast),
                KeyCode::Enter => Some(Action::PageJump(state.pager_cursor)),
                _ => None,
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let [header_area, grid_area, pager_area, status_area] = Self::layout(area);

        self.header.render(
            frame,
            header_area,
            FilterHeaderProps {
                filters: &state.filters,
                search_active: state.search_active,
                refreshing: state.refreshing,
            },
        );

        let grid_focused = state.focus == FocusArea::Grid;
        let grid_block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(BG_BASE).fg(TEXT_MAIN))
            .border_style(Style::default().fg(if grid_focused { ACCENT_TEAL } else { TEXT_DIM }))
            .title(format!("{} shown", state.entries.len()));
        let grid_inner = grid_block.inner(grid_area);
        frame.render_widget(grid_block, grid_area);
        self.grid.render(
            frame,
            grid_inner,
            CatalogGridProps {
                entries: &state.entries,
                selected: state.selected,
                sprites: &state.sprites,
                is_focused: grid_focused,
            },
        );

        self.pager.render(
            frame,
            pager_area,
            PaginationBarProps {
                page: &state.page,
                cursor: state.pager_cursor,
                is_focused: state.focus == FocusArea::Pager,
            },
        );

        render_status(&mut self.status_bar, frame, status_area, state);

        if state.detail_open() {
            let sprite = state
                .detail
                .data()
                .and_then(|detail| state.sprites.get(&detail.name));
            self.overlay.render(
                frame,
                area,
                DetailOverlayProps {
                    detail: &state.detail,
                    sprite,
                    is_focused: true,
                },
            );
        }
    }
}

fn render_status(status_bar: &mut StatusBar, frame: &mut Frame, area: Rect, state: &AppState) {
    let status = match (&state.message, state.refreshing) {
        (Some(message), _) => message.clone(),
        (None, true) => "Loading...".to_string(),
        (None, false) => String::new(),
    };
    let status_items = [StatusBarItem::span(Span::styled(
        status,
        Style::default().fg(ACCENT_GOLD),
    ))];
    let hints = status_hints(state);

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.detail_open() {
        return vec![StatusBarHint::new("Esc", "Close")];
    }
    if state.search_active {
        return vec![
            StatusBarHint::new("Enter", "Done"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    let mut hints = match state.focus {
        FocusArea::Grid => vec![
            StatusBarHint::new("Arrows", "Move"),
            StatusBarHint::new("Enter", "Open"),
        ],
        FocusArea::Pager => vec![
            StatusBarHint::new("Left/Right", "Page"),
            StatusBarHint::new("Enter", "Jump"),
        ],
    };
    hints.extend([
        StatusBarHint::new("[ ]", "Prev/Next"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("t", "Type"),
        StatusBarHint::new("g", "Gen"),
        StatusBarHint::new("r", "Refresh"),
        StatusBarHint::new("q", "Quit"),
    ]);
    hints
}
