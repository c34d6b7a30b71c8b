//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::coordinator::RefreshRequest;
use crate::effect::Effect;
use crate::state::{AppState, EntryDetail, FilterCriteria, FocusArea};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = None;
            let refresh = begin_refresh(state);
            DispatchResult::changed_with_many(vec![
                Effect::LoadTypes,
                Effect::LoadGenerations,
                refresh,
            ])
        }

        // ===== Refresh =====
        Action::RefreshRequest => DispatchResult::changed_with(begin_refresh(state)),

        Action::RefreshDidLoad(outcome) => {
            if outcome.generation != state.refresh_generation {
                tracing::debug!(
                    stale = outcome.generation,
                    current = state.refresh_generation,
                    "discarding superseded refresh result"
                );
                return DispatchResult::unchanged();
            }
            state.refreshing = false;
            state.message = None;
            state.entries = outcome.entries;
            if state.shown_page == Some(outcome.page) {
                state.selected = state.selected.min(state.entries.len().saturating_sub(1));
            } else {
                state.selected = 0;
            }
            state.shown_page = Some(outcome.page);
            state.prune_sprites();
            let clamped = state.page.apply_total(outcome.total_count);
            state.pager_cursor = state.page.current_page;

            let mut effects = sprite_requests(state);
            if clamped {
                effects.push(begin_refresh(state));
            }
            changed_with_effects(effects)
        }

        Action::RefreshDidError { generation, error } => {
            if generation != state.refresh_generation {
                tracing::debug!(stale = generation, %error, "discarding superseded refresh failure");
                return DispatchResult::unchanged();
            }
            state.refreshing = false;
            state.message = Some(format!("Refresh failed: {error}"));
            DispatchResult::changed()
        }

        // ===== Navigation =====
        Action::PagePrev => {
            if !state.page.previous() {
                return DispatchResult::unchanged();
            }
            navigated(state)
        }

        Action::PageNext => {
            if !state.page.next() {
                return DispatchResult::unchanged();
            }
            navigated(state)
        }

        Action::PageJump(page) => {
            if !state.page.jump(page) {
                return DispatchResult::unchanged();
            }
            navigated(state)
        }

        Action::PagerCursorMove(delta) => {
            let total = state.page.total_pages;
            if total == 0 {
                return DispatchResult::unchanged();
            }
            let next = (state.pager_cursor as i64 + delta as i64).clamp(1, total as i64) as u32;
            set_pager_cursor(state, next)
        }

        Action::PagerCursorFirst => {
            if state.page.total_pages == 0 {
                return DispatchResult::unchanged();
            }
            set_pager_cursor(state, 1)
        }

        Action::PagerCursorLast => {
            let last = state.page.total_pages;
            if last == 0 {
                return DispatchResult::unchanged();
            }
            set_pager_cursor(state, last)
        }

        // ===== Filters =====
        Action::SearchStart => {
            if state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = true;
            DispatchResult::changed()
        }

        Action::SearchFinish => {
            if !state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.filters.search_text.push(ch);
            DispatchResult::changed_with(begin_refresh(state))
        }

        Action::SearchBackspace => {
            if state.filters.search_text.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(begin_refresh(state))
        }

        Action::TypeFilterNext => {
            if !cycle_option(&state.type_options, &mut state.filters.type_filter, 1) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(begin_refresh(state))
        }

        Action::TypeFilterPrev => {
            if !cycle_option(&state.type_options, &mut state.filters.type_filter, -1) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(begin_refresh(state))
        }

        Action::GenerationFilterNext => {
            if !cycle_option(
                &state.generation_options,
                &mut state.filters.generation_filter,
                1,
            ) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(begin_refresh(state))
        }

        Action::GenerationFilterPrev => {
            if !cycle_option(
                &state.generation_options,
                &mut state.filters.generation_filter,
                -1,
            ) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(begin_refresh(state))
        }

        Action::FiltersClear => {
            if !state.filters.is_active() {
                return DispatchResult::unchanged();
            }
            state.filters = FilterCriteria::default();
            DispatchResult::changed_with(begin_refresh(state))
        }

        Action::TypesDidLoad(types) => {
            state.type_options = types;
            DispatchResult::changed()
        }

        Action::TypesDidError(error) => {
            state.message = Some(format!("Type list error: {error}"));
            DispatchResult::changed()
        }

        Action::GenerationsDidLoad(generations) => {
            state.generation_options = generations;
            DispatchResult::changed()
        }

        Action::GenerationsDidError(error) => {
            state.message = Some(format!("Generation list error: {error}"));
            DispatchResult::changed()
        }

        // ===== Cards and detail =====
        Action::CardMove(delta) => {
            if state.entries.is_empty() {
                return DispatchResult::unchanged();
            }
            let target = state.selected as i64 + delta as i64;
            if target < 0 || target >= state.entries.len() as i64 {
                return DispatchResult::unchanged();
            }
            state.selected = target as usize;
            DispatchResult::changed()
        }

        Action::CardOpen => {
            let Some(url) = state.selected_entry().map(|entry| entry.detail_url.clone()) else {
                return DispatchResult::unchanged();
            };
            open_detail(state, url)
        }

        Action::DetailRequest(url) => open_detail(state, url),

        Action::DetailDidLoad(detail) => {
            if state.detail_url.as_deref() != Some(detail.detail_url.as_str()) {
                return DispatchResult::unchanged();
            }
            let effects: Vec<Effect> = sprite_request(state, &detail).into_iter().collect();
            state.detail = DataResource::Loaded(detail);
            changed_with_effects(effects)
        }

        Action::DetailDidError { url, error } => {
            if state.detail_url.as_deref() != Some(url.as_str()) {
                return DispatchResult::unchanged();
            }
            state.detail = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::DetailClose => {
            if !state.detail_open() {
                return DispatchResult::unchanged();
            }
            state.detail = DataResource::Empty;
            state.detail_url = None;
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { name, sprite } => {
            if !state.shows_sprite_for(&name) {
                return DispatchResult::unchanged();
            }
            state.sprites.insert(name, sprite);
            DispatchResult::changed()
        }

        Action::SpriteDidError { .. } => DispatchResult::unchanged(),

        // ===== UI =====
        Action::UiFocusToggle => {
            state.focus = state.focus.toggle();
            if state.focus == FocusArea::Pager {
                state.pager_cursor = state.page.current_page;
            }
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Start a new cycle: bump the generation so in-flight results go stale, and
/// capture the current page and filters.
fn begin_refresh(state: &mut AppState) -> Effect {
    state.refresh_generation = state.refresh_generation.wrapping_add(1);
    state.refreshing = true;
    Effect::Refresh(RefreshRequest {
        generation: state.refresh_generation,
        page: state.page.current_page,
        page_size: state.page.page_size,
        filters: state.filters.clone(),
    })
}

fn navigated(state: &mut AppState) -> DispatchResult<Effect> {
    state.pager_cursor = state.page.current_page;
    DispatchResult::changed_with(begin_refresh(state))
}

fn set_pager_cursor(state: &mut AppState, page: u32) -> DispatchResult<Effect> {
    if page == state.pager_cursor {
        return DispatchResult::unchanged();
    }
    state.pager_cursor = page;
    DispatchResult::changed()
}

/// Step through `None, options[0], .., options[n-1]` and wrap. Returns false
/// when there is nothing to cycle through.
fn cycle_option(options: &[String], current: &mut Option<String>, step: i64) -> bool {
    if options.is_empty() {
        return false;
    }
    let slots = options.len() as i64 + 1;
    let index = current
        .as_ref()
        .and_then(|value| options.iter().position(|option| option == value))
        .map(|position| position as i64 + 1)
        .unwrap_or(0);
    let next = (index + step).rem_euclid(slots);
    *current = if next == 0 {
        None
    } else {
        Some(options[(next - 1) as usize].clone())
    };
    true
}

fn open_detail(state: &mut AppState, url: String) -> DispatchResult<Effect> {
    if let Some(detail) = state.entry_by_url(&url).cloned() {
        let effects: Vec<Effect> = sprite_request(state, &detail).into_iter().collect();
        state.detail = DataResource::Loaded(detail);
        state.detail_url = Some(url);
        return changed_with_effects(effects);
    }
    state.detail = DataResource::Loading;
    state.detail_url = Some(url.clone());
    DispatchResult::changed_with(Effect::LoadDetail { url })
}

fn sprite_requests(state: &mut AppState) -> Vec<Effect> {
    let entries = std::mem::take(&mut state.entries);
    let effects = entries
        .iter()
        .filter_map(|entry| sprite_request(state, entry))
        .collect();
    state.entries = entries;
    effects
}

fn sprite_request(state: &mut AppState, entry: &EntryDetail) -> Option<Effect> {
    let url = entry.sprite_url.clone()?;
    if !state.sprites_requested.insert(entry.name.clone()) {
        return None;
    }
    Some(Effect::LoadSprite {
        name: entry.name.clone(),
        url,
    })
}

fn changed_with_effects(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}
