//! Widgets for the character browser.

mod characters;
mod detail;
mod help;
mod popup;

pub use characters::render_characters;
pub use detail::render_detail;
pub use help::render_help;
pub use popup::{centered_rect, render_quit_confirm};
