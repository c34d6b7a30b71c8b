//! Render tests for the full catalog view

use tui_dispatch::{testing::*, DataResource};

use pokegrid::{
    components::{CatalogView, CatalogViewProps, Component},
    state::{AppState, EntryDetail, EntryStat, FocusArea},
};

fn render(state: &AppState, width: u16, height: u16) -> String {
    let mut render = RenderHarness::new(width, height);
    let mut view = CatalogView::new();
    render.render_to_string_plain(|frame| {
        view.render(
            frame,
            frame.area(),
            CatalogViewProps {
                state,
                is_focused: true,
            },
        );
    })
}

fn charizard() -> EntryDetail {
    EntryDetail {
        name: "charizard".into(),
        detail_url: "https://pokeapi.co/api/v2/pokemon/6/".into(),
        sprite_url: None,
        types: vec!["fire".into(), "flying".into()],
        abilities: vec!["blaze".into(), "solar-power".into()],
        stats: vec![
            EntryStat {
                name: "hp".into(),
                base_value: 78,
            },
            EntryStat {
                name: "attack".into(),
                base_value: 84,
            },
        ],
    }
}

fn loaded_state(total_count: u32, current_page: u32) -> AppState {
    let mut state = AppState::default();
    state.page.apply_total(total_count);
    state.page.jump(current_page);
    state.pager_cursor = state.page.current_page;
    state.entries = vec![charizard()];
    state
}

#[test]
fn test_render_empty_before_first_load() {
    let output = render(&AppState::default(), 120, 30);

    assert!(output.contains("No entries match"));
    assert!(output.contains("Page: 1"));
}

#[test]
fn test_render_card_types() {
    let output = render(&loaded_state(1302, 1), 120, 30);

    assert!(output.contains("charizard"));
    assert!(output.contains("fire, flying"));
}

#[test]
fn test_render_pager_window_in_middle() {
    let output = render(&loaded_state(1302, 30), 140, 30);

    assert!(output.contains("Page: 30"));
    assert!(output.contains(" 26 "));
    assert!(output.contains(" 34 "));
    assert!(!output.contains(" 25 "));
    assert!(!output.contains(" 35 "));
}

#[test]
fn test_render_pager_small_catalog() {
    let output = render(&loaded_state(100, 1), 120, 30);

    assert!(output.contains(" 5 "));
    assert!(!output.contains(" 6 "));
}

#[test]
fn test_render_detail_overlay() {
    let mut state = loaded_state(1302, 1);
    state.detail = DataResource::Loaded(charizard());
    state.detail_url = Some(charizard().detail_url);

    let output = render(&state, 120, 40);

    assert!(output.contains("CHARIZARD"));
    assert!(output.contains("Type: fire, flying"));
    assert!(output.contains("Abilities: blaze, solar-power"));
    assert!(output.contains("hp: 78"));
    assert!(output.contains("attack: 84"));
}

#[test]
fn test_render_detail_loading() {
    let mut state = loaded_state(1302, 1);
    state.detail = DataResource::Loading;

    let output = render(&state, 120, 40);

    assert!(output.contains("Loading..."));
}

#[test]
fn test_render_pager_focus_hints() {
    let mut state = loaded_state(1302, 1);
    state.focus = FocusArea::Pager;

    let output = render(&state, 160, 30);

    assert!(output.contains("Jump"));
}
