//! pokegrid - paginated PokeAPI catalog browser

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::OnceLock;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegrid::action::Action;
use pokegrid::api::{CatalogSource, PokeApiClient, DEFAULT_API_BASE};
use pokegrid::components::{
    CatalogView, CatalogViewProps, Component, DetailOverlay, DetailOverlayProps,
};
use pokegrid::config::{CatalogConfig, DEFAULT_TIMEOUT_SECS};
use pokegrid::coordinator::run_refresh;
use pokegrid::effect::Effect;
use pokegrid::logging;
use pokegrid::reducer::reducer;
use pokegrid::sprite::decode_sprite;
use pokegrid::state::{AppState, DEFAULT_PAGE_SIZE};

static CLIENT: OnceLock<PokeApiClient> = OnceLock::new();

/// Browse the PokeAPI catalog page by page
#[derive(Parser, Debug)]
#[command(name = "pokegrid")]
#[command(about = "Paginated PokeAPI catalog browser with search, type and generation filters")]
struct Args {
    /// Base URL of a PokeAPI-compatible service
    #[arg(long, env = "POKEGRID_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Entries per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=100))]
    page_size: u32,

    /// Per-request timeout in seconds (minimum 1)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Log file (defaults to pokegrid/pokegrid.log in the user cache dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum GridComponentId {
    Catalog,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum GridContext {
    Catalog,
    Detail,
}

impl EventRoutingState<GridComponentId, GridContext> for AppState {
    fn focused(&self) -> Option<GridComponentId> {
        if self.detail_open() {
            Some(GridComponentId::Detail)
        } else {
            Some(GridComponentId::Catalog)
        }
    }

    fn modal(&self) -> Option<GridComponentId> {
        if self.detail_open() {
            Some(GridComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: GridComponentId) -> GridContext {
        match id {
            GridComponentId::Catalog => GridContext::Catalog,
            GridComponentId::Detail => GridContext::Detail,
        }
    }

    fn default_context(&self) -> GridContext {
        GridContext::Catalog
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        page_size,
        timeout_secs,
        log_file,
        log_level,
        debug: debug_args,
    } = Args::parse();

    let log_path = log_file.unwrap_or_else(logging::default_log_path);
    logging::init(&log_path, &log_level)?;

    let config = CatalogConfig::new(api_base, page_size, timeout_secs).map_err(io::Error::other)?;
    let client = config.client().map_err(io::Error::other)?;
    tracing::info!(
        api_base = %config.api_base,
        page_size = config.page_size,
        timeout_secs,
        "pokegrid starting"
    );
    let _ = CLIENT.set(client);

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let mut state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(page_size))
        })
        .await
        .map_err(debug_error)?;
    // Restored snapshots still follow --page-size.
    state.page.set_page_size(page_size);
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("pokegrid stopped");
    Ok(())
}

struct GridUi {
    catalog: CatalogView,
}

impl GridUi {
    fn new() -> Self {
        Self {
            catalog: CatalogView::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<GridComponentId>,
    ) {
        event_ctx.set_component_area(GridComponentId::Catalog, area);
        if state.detail_open() {
            event_ctx.set_component_area(GridComponentId::Detail, DetailOverlay::area(area));
        } else {
            event_ctx.component_areas.remove(&GridComponentId::Detail);
        }

        let props = CatalogViewProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.catalog.render(frame, area, props);
    }

    fn handle_catalog_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = CatalogViewProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.catalog.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }

    fn handle_detail_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = DetailOverlayProps {
            detail: &state.detail,
            sprite: None,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .catalog
            .overlay()
            .handle_event(event, props)
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(GridUi::new()));
    let mut bus: EventBus<AppState, Action, GridComponentId, GridContext> = EventBus::new();
    let keybindings: Keybindings<GridContext> = Keybindings::new();

    let ui_catalog = Rc::clone(&ui);
    bus.register(GridComponentId::Catalog, move |event, state| {
        ui_catalog
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(GridComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    let Some(client) = CLIENT.get().cloned() else {
        tracing::error!(?effect, "effect dropped: API client not initialised");
        return;
    };
    match effect {
        Effect::Refresh(request) => {
            let generation = request.generation;
            // A fixed key cancels the superseded cycle.
            ctx.tasks().spawn(TaskKey::new("refresh"), async move {
                match run_refresh(client, request).await {
                    Ok(outcome) => Action::RefreshDidLoad(outcome),
                    Err(err) => Action::RefreshDidError {
                        generation,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::LoadTypes => {
            ctx.tasks().spawn(TaskKey::new("types"), async move {
                match client.fetch_type_names().await {
                    Ok(types) => Action::TypesDidLoad(types),
                    Err(err) => {
                        tracing::warn!(error = %err, "type list unavailable");
                        Action::TypesDidError(err.to_string())
                    }
                }
            });
        }
        Effect::LoadGenerations => {
            ctx.tasks().spawn(TaskKey::new("generations"), async move {
                match client.fetch_generation_names().await {
                    Ok(generations) => Action::GenerationsDidLoad(generations),
                    Err(err) => {
                        tracing::warn!(error = %err, "generation list unavailable");
                        Action::GenerationsDidError(err.to_string())
                    }
                }
            });
        }
        Effect::LoadDetail { url } => {
            ctx.tasks().spawn(TaskKey::new("detail"), async move {
                match client.fetch_detail(&url).await {
                    Ok(detail) => Action::DetailDidLoad(detail),
                    Err(err) => {
                        tracing::warn!(%url, error = %err, "detail fetch failed");
                        Action::DetailDidError {
                            url,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadSprite { name, url } => {
            let key = format!("sprite_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let decoded = match client.fetch_bytes(&url).await {
                    Ok(bytes) => decode_sprite(&bytes),
                    Err(err) => Err(err.to_string()),
                };
                match decoded {
                    Ok(sprite) => Action::SpriteDidLoad { name, sprite },
                    Err(error) => {
                        tracing::debug!(%name, %url, %error, "sprite unavailable");
                        Action::SpriteDidError { name, error }
                    }
                }
            });
        }
    }
}
