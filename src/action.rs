//! Actions - user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::coordinator::RefreshOutcome;
use crate::sprite::SpriteArt;
use crate::state::EntryDetail;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Initial load: option lists plus the first refresh cycle
    Init,

    // ===== Refresh category =====
    /// Re-run the refresh cycle for the current page and filters
    RefreshRequest,
    RefreshDidLoad(RefreshOutcome),
    RefreshDidError { generation: u64, error: String },

    // ===== Page category =====
    PagePrev,
    PageNext,
    PageJump(u32),

    // ===== Pager category =====
    PagerCursorMove(i32),
    PagerCursorFirst,
    PagerCursorLast,

    // ===== Search category =====
    SearchStart,
    SearchFinish,
    SearchInput(char),
    SearchBackspace,

    // ===== Filter categories =====
    TypeFilterNext,
    TypeFilterPrev,
    TypesDidLoad(Vec<String>),
    TypesDidError(String),
    GenerationFilterNext,
    GenerationFilterPrev,
    GenerationsDidLoad(Vec<String>),
    GenerationsDidError(String),
    FiltersClear,

    // ===== Card category =====
    CardMove(i16),
    CardOpen,

    // ===== Detail category =====
    /// Open the overlay for a lookup reference, reusing a held detail if any
    DetailRequest(String),
    DetailDidLoad(EntryDetail),
    DetailDidError { url: String, error: String },
    DetailClose,

    // ===== Sprite category =====
    SpriteDidLoad { name: String, sprite: SpriteArt },
    SpriteDidError { name: String, error: String },

    // ===== UI category =====
    UiFocusToggle,

    Quit,
}
