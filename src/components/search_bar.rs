use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub applied: &'a str,
    pub active: bool,
    pub is_focused: bool,
}

/// Header line holding the search input.
#[derive(Default)]
pub struct SearchBar;

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.active {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) => Some(Action::SearchInput(ch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let input = if props.active {
            Span::styled(
                format!("/{}_", props.query),
                Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
            )
        } else if props.query.is_empty() {
            Span::styled("press / to search", Style::default().fg(TEXT_DIM))
        } else {
            Span::styled(format!("/{}", props.query), Style::default().fg(ACCENT_TEAL))
        };

        let mut spans = vec![Span::raw("Search: "), input];
        if !props.applied.is_empty() {
            spans.push(Span::raw("  |  Results for "));
            spans.push(Span::styled(
                format!("\"{}\"", props.applied),
                Style::default().fg(ACCENT_GOLD),
            ));
        }

        let border = if props.active {
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title("POKEDEX")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(border);
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn props(active: bool) -> SearchBarProps<'static> {
        SearchBarProps {
            query: "pika",
            applied: "",
            active,
            is_focused: true,
        }
    }

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_typing_emits_input() {
        let mut bar = SearchBar;
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("q")), props(true))
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::SearchInput('q'));
    }

    #[test]
    fn test_enter_and_escape() {
        let mut bar = SearchBar;
        let submit: Vec<_> = bar
            .handle_event(&press(KeyCode::Enter), props(true))
            .into_iter()
            .collect();
        submit.assert_first(Action::SearchSubmit);

        let cancel: Vec<_> = bar
            .handle_event(&press(KeyCode::Esc), props(true))
            .into_iter()
            .collect();
        cancel.assert_first(Action::SearchCancel);
    }

    #[test]
    fn test_inactive_ignores_keys() {
        let mut bar = SearchBar;
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("a")), props(false))
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_shows_cursor_while_active() {
        let mut render = RenderHarness::new(60, 3);
        let mut bar = SearchBar;

        let output = render.render_to_string_plain(|frame| {
            bar.render(frame, frame.area(), props(true));
        });

        assert!(output.contains("/pika_"));
        assert!(output.contains("POKEDEX"));
    }
}
