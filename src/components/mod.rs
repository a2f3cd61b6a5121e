pub mod card_grid;
pub mod pokedex_view;
pub mod search_bar;

use ratatui::style::Color;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use card_grid::{grid_columns, CardGrid, CardGridProps, CARD_HEIGHT, CARD_WIDTH};
pub use pokedex_view::{PokedexView, PokedexViewProps};
pub use search_bar::{SearchBar, SearchBarProps};

pub(crate) const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub(crate) const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub(crate) const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub(crate) const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub(crate) const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub(crate) const ACCENT_RED: Color = Color::Rgb(232, 98, 92);

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub(crate) fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

/// `mr-mime` -> `Mr Mime`
pub(crate) fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
