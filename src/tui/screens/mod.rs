//! TUI screen implementations.

pub mod help;
pub mod home;
pub mod post_detail;
pub mod post_form;

pub use help::{HelpState, draw_help};
pub use home::{HomeState, draw_home};
pub use post_detail::{PostDetailState, draw_post_detail};
pub use post_form::{PostFormState, draw_post_form};
