pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::resolve_current_directory;
pub use paths::{expand_tilde, format_path_with_tilde, shorten_path};
pub use terminal::strip_ansi_codes;
