//! Text compositing for the terminal: escape-aware cutting, overlay
//! placement, table column sizing and the bridge to ratatui buffers.

pub mod ansi;
pub mod layout;
pub mod overlay;
pub mod style;
pub mod wrap;

pub use ansi::{cut_to_width, display_width};
pub use layout::{ColumnSpec, EMAIL_COLUMNS, column_widths};
pub use overlay::place_overlay;
pub use style::{ansi_to_lines, buffer_to_ansi};
pub use wrap::wrap;
