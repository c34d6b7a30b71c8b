use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_HIGHLIGHT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::coordinator::page_window;
use crate::state::{PageState, PAGE_WINDOW};

pub struct PaginationBarProps<'a> {
    pub page: &'a PageState,
    /// Page highlighted for a jump while the pager has focus.
    pub cursor: u32,
    pub is_focused: bool,
}

/// Previous/Next controls, a bounded window of page numbers and the
/// `Page: N` indicator.
#[derive(Default)]
pub struct PaginationBar;

impl PaginationBar {
    /// The page numbers shown as controls.
    pub fn window(props: &PaginationBarProps<'_>) -> Vec<u32> {
        let anchor = if props.is_focused {
            props.cursor
        } else {
            props.page.current_page
        };
        page_window(anchor, props.page.total_pages, PAGE_WINDOW).collect()
    }
}

impl Component<Action> for PaginationBar {
    type Props<'a> = PaginationBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let enabled = Style::default().fg(TEXT_MAIN);
        let disabled = Style::default().fg(TEXT_DIM).add_modifier(Modifier::DIM);

        let mut spans = vec![
            Span::styled(
                "< Prev",
                if props.page.can_go_previous() {
                    enabled
                } else {
                    disabled
                },
            ),
            Span::raw("  "),
        ];
        for number in Self::window(&props) {
            let mut style = Style::default().fg(TEXT_DIM);
            if number == props.page.current_page {
                style = style.fg(ACCENT_GOLD).add_modifier(Modifier::BOLD);
            }
            if props.is_focused && number == props.cursor {
                style = style.bg(BG_HIGHLIGHT);
            }
            spans.push(Span::styled(format!(" {number} "), style));
        }
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Next >",
            if props.page.can_go_next() {
                enabled
            } else {
                disabled
            },
        ));
        spans.push(Span::raw("    "));
        spans.push(Span::styled(
            format!("Page: {}", props.page.current_page),
            Style::default().fg(ACCENT_TEAL),
        ));

        let border = if props.is_focused { ACCENT_TEAL } else { TEXT_DIM };
        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(Style::default().fg(border));
        frame.render_widget(
            Paragraph::new(Line::from(spans)).centered().block(block),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn page(total_count: u32, current: u32) -> PageState {
        let mut page = PageState::default();
        page.apply_total(total_count);
        page.jump(current);
        page
    }

    #[test]
    fn window_lists_all_pages_when_few() {
        let page = page(100, 1);
        let props = PaginationBarProps {
            page: &page,
            cursor: 1,
            is_focused: false,
        };
        assert_eq!(PaginationBar::window(&props), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn window_is_bounded_for_many_pages() {
        let page = page(1302, 62);
        let props = PaginationBarProps {
            page: &page,
            cursor: 62,
            is_focused: false,
        };
        let window = PaginationBar::window(&props);
        assert_eq!(window.len(), PAGE_WINDOW as usize);
        assert_eq!(window.last(), Some(&62));
    }

    #[test]
    fn window_follows_cursor_when_focused() {
        let page = page(1302, 1);
        let props = PaginationBarProps {
            page: &page,
            cursor: 30,
            is_focused: true,
        };
        assert!(PaginationBar::window(&props).contains(&30));
    }

    #[test]
    fn renders_indicator_and_controls() {
        let mut render = RenderHarness::new(100, 3);
        let page = page(1302, 1);

        let output = render.render_to_string_plain(|frame| {
            PaginationBar.render(
                frame,
                frame.area(),
                PaginationBarProps {
                    page: &page,
                    cursor: 1,
                    is_focused: false,
                },
            );
        });

        assert!(output.contains("< Prev"));
        assert!(output.contains("Next >"));
        assert!(output.contains("Page: 1"));
        assert!(output.contains(" 9 "));
        assert!(!output.contains(" 10 "));
    }

    #[test]
    fn no_page_numbers_before_first_load() {
        let page = PageState::default();
        let props = PaginationBarProps {
            page: &page,
            cursor: 1,
            is_focused: false,
        };
        assert!(PaginationBar::window(&props).is_empty());
    }
}
