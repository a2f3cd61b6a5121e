use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    spinner, CardGrid, CardGridProps, Component, SearchBar, SearchBarProps, ACCENT_GOLD, BG_BASE,
};
use crate::action::Action;
use crate::state::AppState;

/// Props for PokedexView - read-only view of state
pub struct PokedexViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Whole screen: search bar, card grid, status bar.
pub struct PokedexView {
    search: SearchBar,
    grid: CardGrid,
    status_bar: StatusBar,
}

impl Default for PokedexView {
    fn default() -> Self {
        Self {
            search: SearchBar,
            grid: CardGrid,
            status_bar: StatusBar::new(),
        }
    }
}

impl PokedexView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for PokedexView {
    type Props<'a> = PokedexViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let state = props.state;
        if state.search.active {
            let search_props = SearchBarProps {
                query: &state.search.query,
                applied: &state.search.applied,
                active: true,
                is_focused: props.is_focused,
            };
            return self
                .search
                .handle_event(event, search_props)
                .into_iter()
                .collect::<Vec<_>>();
        }

        let grid_props = CardGridProps {
            state,
            is_focused: props.is_focused,
        };
        self.grid
            .handle_event(event, grid_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: PokedexViewProps<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Search bar
            Constraint::Min(1),    // Cards
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.search.render(
            frame,
            chunks[0],
            SearchBarProps {
                query: &state.search.query,
                applied: &state.search.applied,
                active: state.search.active,
                is_focused: props.is_focused,
            },
        );

        self.grid.render(
            frame,
            chunks[1],
            CardGridProps {
                state,
                is_focused: props.is_focused && !state.search.active,
            },
        );

        let hints = status_hints(state);
        let status = status_text(state);
        let status_items = [StatusBarItem::span(Span::styled(
            status.as_str(),
            Style::default().fg(ACCENT_GOLD),
        ))];
        <StatusBar as Component<Action>>::render(
            &mut self.status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::hints(&hints).with_separator("  "),
                center: StatusBarSection::empty(),
                right: StatusBarSection::items(&status_items).with_separator("  "),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.search.active {
        return vec![
            StatusBarHint::new("Enter", "search"),
            StatusBarHint::new("Esc", "clear"),
            StatusBarHint::new("Bksp", "delete"),
        ];
    }
    vec![
        StatusBarHint::new("arrows", "move"),
        StatusBarHint::new("/", "search"),
        StatusBarHint::new("Esc", "reset"),
        StatusBarHint::new("q", "quit"),
    ]
}

fn status_text(state: &AppState) -> String {
    if let Some(message) = &state.message {
        return message.clone();
    }
    if state.index.is_loading() {
        return format!("{} loading index", spinner(state.tick));
    }
    if state.hydrating {
        return format!("{} hydrating", spinner(state.tick));
    }
    format!(
        "{} shown | {} loaded | {} indexed",
        state.visible_count(),
        state.hydrated.len(),
        state.index_entries().len()
    )
}
