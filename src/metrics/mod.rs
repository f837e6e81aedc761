//! Result rendering and export

pub mod reporter;

pub use reporter::{print_table, render_table, write_json};
