pub mod catalog_grid;
pub mod catalog_view;
pub mod detail_overlay;
pub mod filter_header;
pub mod pagination_bar;

use ratatui::style::Color;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_grid::{CatalogGrid, CatalogGridProps};
pub use catalog_view::{CatalogView, CatalogViewProps};
pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use filter_header::{FilterHeader, FilterHeaderProps};
pub use pagination_bar::{PaginationBar, PaginationBarProps};

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
