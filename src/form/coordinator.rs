use tracing::{info, warn};

use super::controller::{SubmitMode, Submission};
use crate::service::{
    CurrentUser, MutationResult, Navigator, NewPost, Notifier, PostService, PostUpdate,
    RETRY_MESSAGE, Route,
};

/// Where a submission is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    /// A mutation is in flight.
    Submitting,
    /// The mutation succeeded and the user was sent to `Route`.
    NavigatedSuccess(Route),
    /// The mutation failed; the user was notified and sent back to `Route`.
    NavigatedFailureRetryPrompt(Route),
}

/// Errors from starting a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    Busy,
}

/// The collaborators a submission talks to.
pub struct SubmitContext<'a> {
    pub service: &'a dyn PostService,
    pub user: &'a dyn CurrentUser,
    pub navigator: &'a mut dyn Navigator,
    pub notifier: &'a mut dyn Notifier,
}

/// Runs create or update mutations for validated submissions and turns the
/// outcome into navigation and feedback.
///
/// There is no automatic retry: after a failure the user has to submit again.
#[derive(Debug, Clone, Default)]
pub struct SubmitCoordinator {
    state: SubmitState,
}

impl SubmitCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Returns `true` while a mutation is in flight.
    pub fn is_busy(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    /// Marks a submission as started. Fails if one is already running.
    pub fn begin(&mut self) -> Result<(), SubmitError> {
        if self.is_busy() {
            return Err(SubmitError::Busy);
        }
        self.state = SubmitState::Submitting;
        Ok(())
    }

    /// Returns to [`SubmitState::Idle`].
    pub fn reset(&mut self) {
        self.state = SubmitState::Idle;
    }

    /// Starts and runs a submission.
    pub async fn submit(
        &mut self,
        submission: Submission,
        ctx: SubmitContext<'_>,
    ) -> Result<&SubmitState, SubmitError> {
        self.begin()?;
        Ok(self.run(submission, ctx).await)
    }

    /// Runs a submission already started with [`begin`](Self::begin).
    ///
    /// Calls the mutation matching the submission's mode, then navigates to
    /// the success route, or notifies and navigates back to the form's route.
    pub async fn run(&mut self, submission: Submission, ctx: SubmitContext<'_>) -> &SubmitState {
        self.state = SubmitState::Submitting;
        let Submission { values, mode } = submission;

        let (result, success, retry) = match mode {
            SubmitMode::Update {
                post_id,
                image_id,
                image_url,
            } => {
                info!(post_id = %post_id, "updating post");
                let update = PostUpdate {
                    caption: values.caption,
                    file: values.file,
                    location: values.location,
                    tags: values.tags,
                    post_id: post_id.clone(),
                    image_id,
                    image_url,
                };
                let result = ctx.service.update_post(update).await;
                (
                    result,
                    Route::PostDetail(post_id.clone()),
                    Route::UpdatePost(post_id),
                )
            }
            SubmitMode::Create => {
                let user_id = ctx.user.user_id().to_string();
                info!(user_id = %user_id, "creating post");
                let post = NewPost {
                    caption: values.caption,
                    file: values.file,
                    location: values.location,
                    tags: values.tags,
                    user_id,
                };
                let result = ctx.service.create_post(post).await;
                (result, Route::Home, Route::CreatePost)
            }
        };

        self.finish(result, success, retry, ctx.navigator, ctx.notifier)
    }

    fn finish(
        &mut self,
        result: MutationResult,
        success: Route,
        retry: Route,
        navigator: &mut dyn Navigator,
        notifier: &mut dyn Notifier,
    ) -> &SubmitState {
        self.state = match result {
            Ok(post) => {
                info!(post_id = %post.id, route = %success, "post saved");
                navigator.navigate(success.clone());
                SubmitState::NavigatedSuccess(success)
            }
            Err(e) => {
                warn!(error = %e, route = %retry, "post mutation failed");
                notifier.notify(RETRY_MESSAGE);
                navigator.navigate(retry.clone());
                SubmitState::NavigatedFailureRetryPrompt(retry)
            }
        };
        &self.state
    }
}
