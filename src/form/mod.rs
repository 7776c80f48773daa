//! The post form: field state and validation ([`PostForm`]) and the
//! create/update submit flow ([`SubmitCoordinator`]).

mod controller;
mod coordinator;

pub use controller::{FormAction, PostForm, SubmitMode, Submission};
pub use coordinator::{SubmitContext, SubmitCoordinator, SubmitError, SubmitState};
