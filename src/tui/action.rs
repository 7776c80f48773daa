//! Actions returned by screen event handlers.

use crate::form::Submission;
use crate::service::Route;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these to run mutations and move between routes.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given route.
    Navigate(Route),
    /// Hand a validated form to the submit coordinator.
    Submit(Submission),
    /// Delete the post with the given id.
    DeletePost(String),
    /// Leave the help screen.
    CloseHelp,
    /// Quit the application.
    Quit,
}
