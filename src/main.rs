//! Pokedex TUI - browse and search PokeAPI creatures as cards

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use ratatui::layout::Rect;
use tokio_util::sync::CancellationToken;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::{CatalogSource, PokeApiClient};
use pokedex::components::{Component, PokedexView, PokedexViewProps};
use pokedex::config::CatalogConfig;
use pokedex::effect::Effect;
use pokedex::hydrate;
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::state::AppState;

const TICK_MS: u64 = 120;

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse PokeAPI creatures as cards with computed weaknesses")]
struct Args {
    #[command(flatten)]
    catalog: CatalogConfig,

    /// Where log lines are written
    #[arg(long, default_value = "pokedex.log")]
    log_file: PathBuf,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokedexComponentId {
    Cards,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokedexContext {
    Cards,
    Search,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        if self.search.active {
            Some(PokedexComponentId::Search)
        } else {
            Some(PokedexComponentId::Cards)
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        if self.search.active {
            Some(PokedexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::Cards => PokedexContext::Cards,
            PokedexComponentId::Search => PokedexContext::Search,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::Cards
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        catalog,
        log_file,
        debug: debug_args,
    } = Args::parse();

    let _log_guard = logging::init(&log_file).map_err(io::Error::other)?;
    tracing::info!(
        api_base = %catalog.api_base,
        limit = catalog.limit,
        window = catalog.effective_window(),
        "starting pokedex"
    );

    let debug = DebugSession::new(debug_args);
    let mut initial = AppState::from_config(&catalog);
    if let Ok(size) = crossterm::terminal::size() {
        initial.terminal_size = size;
    }
    let state = debug
        .load_state_or_else_async(move || async move { Ok::<AppState, io::Error>(initial) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let source: Arc<dyn CatalogSource> = Arc::new(PokeApiClient::new(catalog.api_base.clone()));
    let runner = EffectRunner::new(source);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, &runner, replay_actions).await;

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
    tracing::info!("pokedex exited");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct PokedexUi {
    view: PokedexView,
}

impl PokedexUi {
    fn new() -> Self {
        Self {
            view: PokedexView::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        event_ctx.set_component_area(PokedexComponentId::Cards, area);
        if state.search.active {
            event_ctx.set_component_area(PokedexComponentId::Search, area);
        } else {
            event_ctx
                .component_areas
                .remove(&PokedexComponentId::Search);
        }

        let props = PokedexViewProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.view.render(frame, area, props);
    }

    fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = PokedexViewProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.view.handle_event(event, props).into_iter().collect();
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
}

/// Runs effects as tasks; owns the cancellation token of the live hydration batch.
struct EffectRunner {
    source: Arc<dyn CatalogSource>,
    hydration: RefCell<Option<CancellationToken>>,
}

impl EffectRunner {
    fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            hydration: RefCell::new(None),
        }
    }

    fn handle(&self, effect: Effect, ctx: &mut EffectContext<Action>) {
        match effect {
            Effect::LoadIndex { limit } => {
                let source = Arc::clone(&self.source);
                ctx.tasks().spawn(TaskKey::new("index"), async move {
                    match source.fetch_index(limit).await {
                        Ok(entries) => {
                            tracing::info!(count = entries.len(), "index loaded");
                            Action::IndexDidLoad(entries)
                        }
                        Err(error) => {
                            tracing::error!(%error, "index load failed");
                            Action::IndexDidError(error.to_string())
                        }
                    }
                });
            }
            Effect::Hydrate { batch, entries } => {
                let cancel = CancellationToken::new();
                if let Some(previous) = self.hydration.replace(Some(cancel.clone())) {
                    previous.cancel();
                }
                tracing::debug!(batch, count = entries.len(), "hydrating batch");
                let source = Arc::clone(&self.source);
                ctx.tasks().spawn(TaskKey::new("hydrate"), async move {
                    match hydrate::hydrate_batch(source, entries, cancel).await {
                        Some(records) => Action::HydrateDidLoad { batch, records },
                        None => Action::HydrateDidCancel { batch },
                    }
                });
            }
            Effect::CancelHydrate => {
                if let Some(previous) = self.hydration.take() {
                    tracing::debug!("cancelling superseded hydration");
                    previous.cancel();
                }
            }
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    runner: &EffectRunner,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> =
        EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_cards = Rc::clone(&ui);
    bus.register(PokedexComponentId::Cards, move |event, state| {
        ui_cards.borrow_mut().handle_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokedexComponentId::Search, move |event, state| {
        ui_search.borrow_mut().handle_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
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
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            |effect: Effect, ctx: &mut EffectContext<Action>| runner.handle(effect, ctx),
        )
        .await
}
