use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::{Frame, Terminal};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error, info};

use crate::form::{FormAction, SubmitContext, SubmitCoordinator, SubmitState, Submission};
use crate::model::{Post, User};
use crate::service::{Navigator, Route};
use crate::storage::{PostStore, StorageError};

use super::action::Action;
use super::error::AppError;
use super::screens::{
    HelpState, HomeState, PostDetailState, PostFormState, draw_help, draw_home, draw_post_detail,
    draw_post_form,
};
use super::widgets::{StatusLine, draw_status_bar};

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// The post feed.
    Home,
    /// A single post.
    PostDetail,
    /// The editor for a new post.
    CreatePost,
    /// The editor for an existing post.
    UpdatePost,
    /// Keybinding help.
    Help,
}

impl Screen {
    /// Human-readable label, shown in the help title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Feed",
            Self::PostDetail => "Post",
            Self::CreatePost => "Create Post",
            Self::UpdatePost => "Edit Post",
            Self::Help => "Help",
        }
    }
}

/// Collects the route chosen by a submission.
#[derive(Debug, Default)]
struct PendingRoute(Option<Route>);

impl Navigator for PendingRoute {
    fn navigate(&mut self, route: Route) {
        self.0 = Some(route);
    }
}

/// Top-level application state.
///
/// The app is the router: screens return [`Action`]s and the app resolves
/// routes into screens, loading posts from the [`PostStore`] as needed.
pub struct App {
    screen: Screen,
    route: Route,
    store: PostStore,
    runtime: Runtime,
    user: User,
    home: HomeState,
    detail: PostDetailState,
    editor: Option<PostFormState>,
    help: HelpState,
    coordinator: SubmitCoordinator,
    status: StatusLine,
    /// A submission accepted by the coordinator, run after the next draw.
    pending: Option<Submission>,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` showing the feed.
    pub fn new(store: PostStore, user: User) -> Result<Self, AppError> {
        let runtime = Builder::new_current_thread().build()?;
        let posts = runtime.block_on(store.list_posts())?;
        let mut home = HomeState::new();
        home.set_posts(posts);

        Ok(Self {
            screen: Screen::Home,
            route: Route::Home,
            store,
            runtime,
            status: StatusLine::new(user.name.clone()),
            user,
            home,
            detail: PostDetailState::new(),
            editor: None,
            help: HelpState::new(),
            coordinator: SubmitCoordinator::new(),
            pending: None,
            should_quit: false,
        })
    }

    /// Main event loop: draw → run pending submission or read event → check quit.
    ///
    /// A pending submission runs after a draw so the busy label is on screen
    /// while the mutation is in flight.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if self.pending.is_some() {
                self.process_pending();
                continue;
            }
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Renders the current screen and the status bar.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        match self.screen {
            Screen::Home => draw_home(&self.home, frame, main_area),
            Screen::PostDetail => draw_post_detail(&self.detail, frame, main_area),
            Screen::CreatePost | Screen::UpdatePost => {
                if let Some(editor) = &self.editor {
                    draw_post_form(editor, self.coordinator.is_busy(), frame, main_area);
                }
            }
            Screen::Help => draw_help(&self.help, frame, main_area),
        }
        draw_status_bar(&self.status, frame, status_area);
    }

    /// Handles a key event: global keys first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.status.dismiss();

        if key.code == KeyCode::F(1) && self.screen != Screen::Help {
            self.help.open_from(self.screen);
            self.screen = Screen::Help;
            return;
        }

        let busy = self.coordinator.is_busy();
        let action = match self.screen {
            Screen::Home => self.home.handle_key(key),
            Screen::PostDetail => self.detail.handle_key(key),
            Screen::CreatePost | Screen::UpdatePost => match &mut self.editor {
                Some(editor) => editor.handle_key(key, busy),
                None => Action::Navigate(Route::Home),
            },
            Screen::Help => self.help.handle_key(key),
        };
        self.apply(action);
    }

    /// Applies an [`Action`] returned by a screen.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(route) => self.navigate(route),
            Action::Submit(submission) => match self.coordinator.begin() {
                Ok(()) => self.pending = Some(submission),
                Err(e) => debug!(error = %e, "submission ignored"),
            },
            Action::DeletePost(id) => match self.runtime.block_on(self.store.delete_post(&id)) {
                Ok(()) => self.navigate(Route::Home),
                Err(e) => self.report(&AppError::from(e)),
            },
            Action::CloseHelp => self.screen = self.help.origin(),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Runs the pending submission, if any, then follows the route it chose.
    pub fn process_pending(&mut self) {
        let Some(submission) = self.pending.take() else {
            return;
        };
        let mut next = PendingRoute::default();
        let ctx = SubmitContext {
            service: &self.store,
            user: &self.user,
            navigator: &mut next,
            notifier: &mut self.status,
        };
        self.runtime.block_on(self.coordinator.run(submission, ctx));

        // A saved form is done even if its destination fails to load.
        let saved = matches!(self.coordinator.state(), SubmitState::NavigatedSuccess(_));
        if saved {
            self.editor = None;
        }
        if let Some(route) = next.0 {
            self.navigate(route);
        }
        if saved && matches!(self.screen, Screen::CreatePost | Screen::UpdatePost) {
            self.screen = Screen::Home;
            self.route = Route::Home;
        }
    }

    /// Opens `route`, reporting failures on the status bar.
    fn navigate(&mut self, route: Route) {
        if let Err(e) = self.open(route) {
            self.report(&e);
        }
    }

    fn open(&mut self, route: Route) -> Result<(), AppError> {
        debug!(route = %route, "navigating");
        match &route {
            Route::Home => {
                let posts = self.runtime.block_on(self.store.list_posts())?;
                self.home.set_posts(posts);
                self.screen = Screen::Home;
            }
            Route::PostDetail(id) => {
                let Some(post) = self.load_or_home(id)? else {
                    return Ok(());
                };
                self.detail.set_post(post);
                self.screen = Screen::PostDetail;
            }
            Route::CreatePost => {
                if !self.keeps_editor(&route) {
                    self.coordinator.reset();
                    self.editor = Some(PostFormState::new(None, FormAction::Create));
                }
                self.screen = Screen::CreatePost;
            }
            Route::UpdatePost(id) => {
                if !self.keeps_editor(&route) {
                    let Some(post) = self.load_or_home(id)? else {
                        return Ok(());
                    };
                    self.coordinator.reset();
                    self.editor = Some(PostFormState::new(Some(&post), FormAction::Update));
                }
                self.screen = Screen::UpdatePost;
            }
        }
        self.route = route;
        Ok(())
    }

    /// Returning to the editor already on screen keeps what was typed.
    fn keeps_editor(&self, route: &Route) -> bool {
        self.editor.is_some() && self.route == *route
    }

    /// Loads a post, falling back to the feed if it no longer exists.
    fn load_or_home(&mut self, id: &str) -> Result<Option<Post>, AppError> {
        match self.runtime.block_on(self.store.load_post(id)) {
            Ok(post) => Ok(Some(post)),
            Err(StorageError::PostNotFound(_)) => {
                info!(post_id = id, "post not found");
                self.open(Route::Home)?;
                self.status.show(format!("Post {id} not found"));
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn report(&mut self, e: &AppError) {
        error!(error = %e, "operation failed");
        self.status.show(e.to_string());
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns the current route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn coordinator(&self) -> &SubmitCoordinator {
        &self.coordinator
    }

    /// Returns the feed state.
    pub fn home(&self) -> &HomeState {
        &self.home
    }

    /// Returns the post detail state.
    pub fn detail(&self) -> &PostDetailState {
        &self.detail
    }

    /// Returns the open editor, if any.
    pub fn editor(&self) -> Option<&PostFormState> {
        self.editor.as_ref()
    }
}
