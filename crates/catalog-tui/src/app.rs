//! Application state management for the catalog admin console.
//!
//! This module contains the `App` struct, the root that owns the session
//! store, the router and both route guards. Input handlers and background
//! results mutate state; `settle` then applies navigation and runs the
//! guards before the next frame is drawn.

use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use catalog_core::api::error::{find_api_error, is_unauthorized};
use catalog_core::auth::{GuardView, Persistence, PrivateGuard, PublicGuard, Session, SessionScope, SessionStore};
use catalog_core::models::{Article, Author, Award, CatalogSummary, Institution, SignUpRequest};
use catalog_core::navigation::{Navigation, Navigator, Router};
use catalog_core::routes::Route;
use catalog_core::storage::{MemoryStorage, TokenStorage};
use catalog_core::{ApiClient, ApiError, Config, NavShell};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for the full name field on sign-up.
const MAX_FULL_NAME_LENGTH: usize = 100;

/// Maximum length for an email address.
const MAX_EMAIL_LENGTH: usize = 254;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Upper bound on navigate/guard passes per settle.
const MAX_SETTLE_PASSES: usize = 8;

/// Status shown while a refresh is in flight.
const REFRESHING_MESSAGE: &str = "Refreshing catalog...";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Sign-in form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInFocus {
    #[default]
    Username,
    Password,
    Button,
}

impl SignInFocus {
    pub fn next(&self) -> Self {
        match self {
            SignInFocus::Username => SignInFocus::Password,
            SignInFocus::Password => SignInFocus::Button,
            SignInFocus::Button => SignInFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SignInFocus::Username => SignInFocus::Button,
            SignInFocus::Password => SignInFocus::Username,
            SignInFocus::Button => SignInFocus::Password,
        }
    }
}

/// Sign-up form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignUpFocus {
    #[default]
    FullName,
    Email,
    Username,
    Password,
    Button,
}

impl SignUpFocus {
    pub fn next(&self) -> Self {
        match self {
            SignUpFocus::FullName => SignUpFocus::Email,
            SignUpFocus::Email => SignUpFocus::Username,
            SignUpFocus::Username => SignUpFocus::Password,
            SignUpFocus::Password => SignUpFocus::Button,
            SignUpFocus::Button => SignUpFocus::FullName,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SignUpFocus::FullName => SignUpFocus::Button,
            SignUpFocus::Email => SignUpFocus::FullName,
            SignUpFocus::Username => SignUpFocus::Email,
            SignUpFocus::Password => SignUpFocus::Username,
            SignUpFocus::Button => SignUpFocus::Password,
        }
    }
}

#[derive(Debug, Default)]
pub struct SignInForm {
    pub username: String,
    pub password: String,
    pub focus: SignInFocus,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Default)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub focus: SignUpFocus,
    pub error: Option<String>,
    pub submitting: bool,
}

impl SignUpForm {
    /// Check the form before it is sent to the backend.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.full_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.is_empty()
        {
            return Err("All fields are required");
        }
        if !is_plausible_email(self.email.trim()) {
            return Err("Enter a valid email address");
        }
        Ok(())
    }

    fn to_request(&self) -> SignUpRequest {
        SignUpRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background tasks.
///
/// These variants are sent through an MPSC channel from spawned tasks back to
/// the main loop, wrapped in an [`Envelope`] carrying the session generation
/// they were started under.
enum RefreshResult {
    Authors(Vec<Author>),
    Articles(Vec<Article>),
    Institutions(Vec<Institution>),
    Awards(Vec<Award>),
    /// Signal that all fetches of a refresh have completed
    RefreshComplete,
    /// The backend rejected the token
    Unauthorized,
    /// A fetch failed for another reason
    Error(String),
    /// Credentials were accepted (username, token)
    SignedIn(String, String),
    SignInFailed(String),
    /// Registration was accepted for this username
    SignedUp(String),
    SignUpFailed(String),
}

struct Envelope {
    generation: u64,
    result: RefreshResult,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,

    // Navigation
    pub router: Router,
    nav_tx: mpsc::UnboundedSender<Navigation>,
    nav_rx: mpsc::UnboundedReceiver<Navigation>,
    session_rx: watch::Receiver<Session>,
    public_guard: PublicGuard,
    private_guard: PrivateGuard,
    pub shell: NavShell,

    // UI State
    pub state: AppState,
    pub sign_in: SignInForm,
    pub sign_up: SignUpForm,
    selections: HashMap<Route, usize>,

    // Catalog data
    pub authors: Vec<Author>,
    pub articles: Vec<Article>,
    pub institutions: Vec<Institution>,
    pub awards: Vec<Award>,
    pub summary: CatalogSummary,
    pub loading: bool,

    // Background task channel
    refresh_rx: mpsc::Receiver<Envelope>,
    refresh_tx: mpsc::Sender<Envelope>,
    /// Bumped on every session transition; older results are dropped.
    generation: u64,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance with the configured token storage.
    pub fn new(config: Config) -> Result<Self> {
        match config.token_storage() {
            Ok(storage) => Self::with_storage(config, storage),
            Err(e) => {
                warn!(error = %e, "No token storage available, session will not be saved");
                let mut app = Self::with_storage(config, MemoryStorage::new())?;
                app.status_message = Some("Token storage unavailable; session will not be saved".to_string());
                Ok(app)
            }
        }
    }

    pub fn with_storage<S>(config: Config, storage: S) -> Result<Self>
    where
        S: TokenStorage + Send + 'static,
    {
        let destinations = config.destinations();
        debug!(?destinations, api = %config.api_base_url, "Config loaded");

        let (nav_tx, nav_rx) = mpsc::unbounded_channel();
        let session = SessionStore::new(storage, nav_tx.clone(), destinations);
        let session_rx = session.subscribe();
        let api = ApiClient::new(&config.api_base_url)?;
        let (refresh_tx, refresh_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let sign_in = SignInForm {
            username: config.last_username.clone().unwrap_or_default(),
            ..SignInForm::default()
        };

        Ok(Self {
            config,
            session,
            api,

            router: Router::new(destinations.landing),
            nav_tx,
            nav_rx,
            session_rx,
            public_guard: PublicGuard::new(destinations),
            private_guard: PrivateGuard::new(destinations),
            shell: NavShell::new(),

            state: AppState::Normal,
            sign_in,
            sign_up: SignUpForm::default(),
            selections: HashMap::new(),

            authors: Vec::new(),
            articles: Vec::new(),
            institutions: Vec::new(),
            awards: Vec::new(),
            summary: CatalogSummary::default(),
            loading: false,

            refresh_rx,
            refresh_tx,
            generation: 0,

            status_message: None,
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Load the persisted token. Call once before the first frame.
    pub fn initialize_session(&mut self) {
        let session = self.session.initialize();
        info!(state = ?session.state(), "Session ready");
    }

    /// Scope lending the session store to components.
    pub fn scope(&self) -> SessionScope<'_> {
        SessionScope::provided(&self.session)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn is_memory_only(&self) -> bool {
        self.session.persistence() == Persistence::MemoryOnly
    }

    /// Activate the shell's logout action.
    pub fn request_logout(&mut self) {
        let scope = SessionScope::provided(&self.session);
        if self.shell.activate_logout(&scope) {
            self.status_message = Some("Signed out".to_string());
        }
    }

    /// Emit a navigation request; it is applied during the next `settle`.
    pub fn navigate(&self, navigation: Navigation) {
        self.nav_tx.navigate(navigation);
    }

    pub fn go_back(&mut self) {
        if !self.router.back() {
            debug!("Already at the oldest history entry");
        }
    }

    // =========================================================================
    // Effect phase
    // =========================================================================

    /// Apply session changes, pending navigation and guard redirects until
    /// nothing moves any more.
    pub fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_PASSES {
            let mut progressed = self.sync_session();
            progressed |= self.apply_navigations();
            if let Some(redirect) = self.evaluate_guard() {
                progressed |= self.router.apply(redirect);
            }
            if !progressed {
                return;
            }
        }
        warn!(route = ?self.router.current(), "Navigation did not settle");
    }

    /// What the guard wrapping the current route lets the renderer draw.
    pub fn guard_view(&self) -> GuardView {
        let scope = self.scope();
        if self.router.current().is_public() {
            self.public_guard.view(&scope)
        } else {
            self.private_guard.view(&scope)
        }
    }

    fn sync_session(&mut self) -> bool {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return false;
        }
        let session = self.session_rx.borrow_and_update().clone();
        self.generation += 1;
        debug!(generation = self.generation, state = ?session.state(), "Session changed");

        if session.is_authenticated() {
            self.sign_in.password.clear();
            self.sign_in.submitting = false;
            self.refresh_all_background();
        } else {
            self.clear_catalog();
            self.sign_in.password.clear();
            self.sign_in.submitting = false;
            self.loading = false;
        }
        true
    }

    fn apply_navigations(&mut self) -> bool {
        let mut changed = false;
        while let Ok(navigation) = self.nav_rx.try_recv() {
            changed |= self.router.apply(navigation);
        }
        changed
    }

    fn evaluate_guard(&mut self) -> Option<Navigation> {
        let scope = SessionScope::provided(&self.session);
        if self.router.current().is_public() {
            self.private_guard.unmount();
            self.public_guard.react(&scope)
        } else {
            self.private_guard.react(&scope)
        }
    }

    fn clear_catalog(&mut self) {
        self.authors.clear();
        self.articles.clear();
        self.institutions.clear();
        self.awards.clear();
        self.summary = CatalogSummary::default();
        self.selections.clear();
    }

    // =========================================================================
    // Sign-in / sign-up
    // =========================================================================

    /// Send the sign-in form to the backend.
    pub fn submit_sign_in(&mut self) {
        if self.sign_in.submitting {
            return;
        }
        let username = self.sign_in.username.trim().to_string();
        let password = self.sign_in.password.clone();
        if username.is_empty() || password.is_empty() {
            self.sign_in.error = Some("Username and password required".to_string());
            return;
        }

        self.sign_in.error = None;
        self.sign_in.submitting = true;

        let api = self.api.with_token(None);
        let tx = self.refresh_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = match api.sign_in(&username, &password).await {
                Ok(token) => RefreshResult::SignedIn(username, token),
                Err(e) => {
                    error!(error = %e, "Sign-in failed");
                    RefreshResult::SignInFailed(sign_in_error_message(&e))
                }
            };
            Self::send_result(&tx, generation, result).await;
        });
    }

    /// Send the sign-up form to the backend.
    pub fn submit_sign_up(&mut self) {
        if self.sign_up.submitting {
            return;
        }
        if let Err(msg) = self.sign_up.validate() {
            self.sign_up.error = Some(msg.to_string());
            return;
        }

        self.sign_up.error = None;
        self.sign_up.submitting = true;

        let request = self.sign_up.to_request();
        let api = self.api.with_token(None);
        let tx = self.refresh_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = match api.sign_up(&request).await {
                Ok(()) => RefreshResult::SignedUp(request.username),
                Err(e) => {
                    error!(error = %e, "Sign-up failed");
                    let message = find_api_error(&e)
                        .map(ApiError::user_message)
                        .unwrap_or_else(|| format!("Sign-up failed: {}", e));
                    RefreshResult::SignUpFailed(message)
                }
            };
            Self::send_result(&tx, generation, result).await;
        });
    }

    fn complete_sign_in(&mut self, username: String, token: String) {
        self.sign_in.submitting = false;
        if self.config.last_username.as_deref() != Some(username.as_str()) {
            self.config.last_username = Some(username);
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
        }
        if let Err(e) = self.session.login(&token) {
            self.sign_in.error = Some(e.to_string());
        }
    }

    fn complete_sign_up(&mut self, username: String) {
        self.sign_up = SignUpForm::default();
        self.sign_in.username = username;
        self.sign_in.password.clear();
        self.sign_in.focus = SignInFocus::Password;
        self.sign_in.error = None;
        self.status_message = Some("Account created. Please sign in.".to_string());
        self.navigate(Navigation::replace(self.session.destinations().sign_in));
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task that fetches all four catalog lists.
    pub fn refresh_all_background(&mut self) {
        let token = match self.session.read().token() {
            Some(t) => t.to_string(),
            None => {
                warn!("No token available for refresh");
                return;
            }
        };

        info!("Starting background refresh of catalog data");
        let api = self.api.with_token(Some(token));
        let tx = self.refresh_tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            Self::execute_background_refresh(api, tx, generation).await;
        });

        self.loading = true;
        self.status_message = Some(REFRESHING_MESSAGE.to_string());
    }

    async fn execute_background_refresh(api: ApiClient, tx: mpsc::Sender<Envelope>, generation: u64) {
        let (authors_res, articles_res, institutions_res, awards_res) = tokio::join!(
            api.fetch_authors(),
            api.fetch_articles(),
            api.fetch_institutions(),
            api.fetch_awards(),
        );

        Self::send_fetch_result(&tx, generation, "Authors", authors_res, RefreshResult::Authors).await;
        Self::send_fetch_result(&tx, generation, "Articles", articles_res, RefreshResult::Articles).await;
        Self::send_fetch_result(&tx, generation, "Institutions", institutions_res, RefreshResult::Institutions).await;
        Self::send_fetch_result(&tx, generation, "Awards", awards_res, RefreshResult::Awards).await;
        Self::send_result(&tx, generation, RefreshResult::RefreshComplete).await;
    }

    /// Helper to send results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<Envelope>, generation: u64, result: RefreshResult) {
        if tx.send(Envelope { generation, result }).await.is_err() {
            error!("Failed to send background result - channel closed");
        }
    }

    /// Helper to send a successful fetch result or an error
    async fn send_fetch_result<T, F>(
        tx: &mpsc::Sender<Envelope>,
        generation: u64,
        name: &str,
        result: Result<T>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> RefreshResult,
    {
        match result {
            Ok(data) => {
                debug!("{} fetched successfully", name);
                Self::send_result(tx, generation, wrapper(data)).await;
            }
            Err(e) if is_unauthorized(&e) => {
                warn!("{} fetch was rejected as unauthorized", name);
                Self::send_result(tx, generation, RefreshResult::Unauthorized).await;
            }
            Err(e) => {
                error!(error = %e, "{} fetch failed", name);
                let message = find_api_error(&e)
                    .map(ApiError::user_message)
                    .unwrap_or_else(|| format!("Error: {}", e));
                Self::send_result(tx, generation, RefreshResult::Error(format!("{}: {}", name, message))).await;
            }
        }
    }

    /// Drain completed background results.
    pub fn check_background_tasks(&mut self) {
        while let Ok(envelope) = self.refresh_rx.try_recv() {
            if envelope.generation != self.generation {
                debug!(
                    result_generation = envelope.generation,
                    current = self.generation,
                    "Dropping result from a previous session"
                );
                continue;
            }
            self.process_refresh_result(envelope.result);
        }
    }

    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Authors(data) => {
                self.authors = data;
                self.rebuild_summary();
            }
            RefreshResult::Articles(data) => {
                self.articles = data;
                self.rebuild_summary();
            }
            RefreshResult::Institutions(data) => {
                self.institutions = data;
                self.rebuild_summary();
            }
            RefreshResult::Awards(data) => {
                self.awards = data;
                self.rebuild_summary();
            }
            RefreshResult::RefreshComplete => {
                self.loading = false;
                // Only clear the progress message, preserve errors
                if self.status_message.as_deref() == Some(REFRESHING_MESSAGE) {
                    self.status_message = None;
                }
            }
            RefreshResult::Unauthorized => {
                if self.is_authenticated() {
                    warn!("Backend rejected the session token, signing out");
                    self.session.logout();
                    self.status_message = Some(ApiError::Unauthorized.user_message());
                }
            }
            RefreshResult::Error(msg) => {
                self.status_message = Some(msg);
            }
            RefreshResult::SignedIn(username, token) => self.complete_sign_in(username, token),
            RefreshResult::SignInFailed(msg) => {
                self.sign_in.submitting = false;
                self.sign_in.password.clear();
                self.sign_in.focus = SignInFocus::Password;
                self.sign_in.error = Some(msg);
            }
            RefreshResult::SignedUp(username) => self.complete_sign_up(username),
            RefreshResult::SignUpFailed(msg) => {
                self.sign_up.submitting = false;
                self.sign_up.error = Some(msg);
            }
        }
    }

    fn rebuild_summary(&mut self) {
        self.summary = CatalogSummary::build(
            &self.authors,
            &self.articles,
            self.awards.len(),
            self.institutions.len(),
        );
        self.clamp_selections();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Number of rows listed on a route.
    pub fn list_len(&self, route: Route) -> usize {
        match route {
            Route::Authors => self.authors.len(),
            Route::Articles => self.articles.len(),
            Route::Institutions => self.institutions.len(),
            Route::Awards => self.awards.len(),
            Route::Home | Route::SignIn | Route::SignUp => 0,
        }
    }

    pub fn selection(&self, route: Route) -> usize {
        self.selections.get(&route).copied().unwrap_or(0)
    }

    /// Move the current route's selection by `delta`, clamped to the list.
    pub fn move_selection(&mut self, delta: isize) {
        let route = self.router.current();
        let len = self.list_len(route);
        if len == 0 {
            return;
        }
        let current = self.selection(route);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.selections.insert(route, next);
    }

    pub fn select_first(&mut self) {
        self.selections.insert(self.router.current(), 0);
    }

    pub fn select_last(&mut self) {
        let route = self.router.current();
        let last = self.list_len(route).saturating_sub(1);
        self.selections.insert(route, last);
    }

    fn clamp_selections(&mut self) {
        let lens: Vec<(Route, usize)> = self
            .selections
            .keys()
            .map(|route| (*route, self.list_len(*route)))
            .collect();
        for (route, len) in lens {
            if let Some(sel) = self.selections.get_mut(&route) {
                *sel = (*sel).min(len.saturating_sub(1));
            }
        }
    }
}

fn sign_in_error_message(err: &anyhow::Error) -> String {
    match find_api_error(err) {
        Some(ApiError::Unauthorized) => "Invalid username or password".to_string(),
        Some(ApiError::NetworkError(_)) => {
            "Unable to connect to server. Check that the backend is running.".to_string()
        }
        Some(other) => other.user_message(),
        None => format!("Sign-in failed: {}", err),
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_full_name_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FULL_NAME_LENGTH && is_valid_input_char(c)
}

pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use catalog_core::storage::TOKEN_KEY;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn app_with(storage: MemoryStorage) -> App {
        App::with_storage(Config::default(), storage).unwrap()
    }

    fn signed_in_storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "stored-token").unwrap();
        storage
    }

    // -------------------------------------------------------------------------
    // Startup and guards
    // -------------------------------------------------------------------------

    #[test]
    fn test_private_route_loading_before_initialize() {
        let mut app = app_with(MemoryStorage::new());
        app.settle();
        assert_eq!(app.router.current(), Route::Home);
        assert_eq!(app.guard_view(), GuardView::Loading);
    }

    #[test]
    fn test_startup_without_token_lands_on_sign_in() {
        let mut app = app_with(MemoryStorage::new());
        app.initialize_session();
        app.settle();
        assert_eq!(app.router.current(), Route::SignIn);
        assert_eq!(app.guard_view(), GuardView::Children);
        assert_eq!(app.router.depth(), 1);
    }

    #[tokio::test]
    async fn test_startup_with_token_stays_on_landing() {
        let mut app = app_with(signed_in_storage());
        app.initialize_session();
        app.settle();
        assert_eq!(app.router.current(), Route::Home);
        assert_eq!(app.guard_view(), GuardView::Children);
        assert!(app.loading);
    }

    #[tokio::test]
    async fn test_signed_in_user_is_sent_away_from_sign_in() {
        let mut app = app_with(signed_in_storage());
        app.initialize_session();
        app.settle();

        app.navigate(Navigation::push(Route::SignIn));
        app.settle();
        assert_eq!(app.router.current(), Route::Home);
    }

    #[tokio::test]
    async fn test_logout_returns_to_sign_in_and_clears_record() {
        let storage = signed_in_storage();
        let mut app = app_with(storage.clone());
        app.initialize_session();
        app.settle();

        app.request_logout();
        app.settle();
        assert_eq!(app.router.current(), Route::SignIn);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert!(!app.is_authenticated());
    }

    // -------------------------------------------------------------------------
    // Background results
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_unauthorized_result_signs_out() {
        let mut app = app_with(signed_in_storage());
        app.initialize_session();
        app.settle();

        app.refresh_tx
            .try_send(Envelope {
                generation: app.generation,
                result: RefreshResult::Unauthorized,
            })
            .unwrap();
        app.check_background_tasks();
        app.settle();

        assert!(!app.is_authenticated());
        assert_eq!(app.router.current(), Route::SignIn);
        assert_eq!(app.status_message.as_deref(), Some("Session expired. Please sign in again."));
    }

    #[tokio::test]
    async fn test_backend_rejecting_token_signs_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Author"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        for list in ["/Article", "/Institution", "/Award"] {
            Mock::given(method("GET"))
                .and(path(list))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
                .mount(&server)
                .await;
        }

        let config = Config {
            api_base_url: server.uri(),
            ..Config::default()
        };
        let storage = signed_in_storage();
        let mut app = App::with_storage(config, storage.clone()).unwrap();
        app.initialize_session();
        app.settle();
        assert!(app.loading);

        for _ in 0..200 {
            app.check_background_tasks();
            app.settle();
            if !app.is_authenticated() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(!app.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(app.router.current(), Route::SignIn);
        assert_eq!(app.status_message.as_deref(), Some("Session expired. Please sign in again."));
    }

    #[tokio::test]
    async fn test_stale_results_are_dropped() {
        let mut app = app_with(signed_in_storage());
        app.initialize_session();
        app.settle();

        let author: Author = serde_json::from_value(serde_json::json!({
            "author_id": 1, "first_name": "Ada", "last_name": "Lovelace"
        }))
        .unwrap();
        app.refresh_tx
            .try_send(Envelope {
                generation: app.generation - 1,
                result: RefreshResult::Authors(vec![author.clone()]),
            })
            .unwrap();
        app.check_background_tasks();
        assert!(app.authors.is_empty());

        app.refresh_tx
            .try_send(Envelope {
                generation: app.generation,
                result: RefreshResult::Authors(vec![author]),
            })
            .unwrap();
        app.check_background_tasks();
        assert_eq!(app.authors.len(), 1);
        assert_eq!(app.summary.author_count, 1);
    }

    #[tokio::test]
    async fn test_sign_in_result_logs_in() {
        let storage = MemoryStorage::new();
        let config = Config {
            last_username: Some("ada".to_string()),
            ..Config::default()
        };
        let mut app = App::with_storage(config, storage.clone()).unwrap();
        app.initialize_session();
        app.settle();

        app.process_refresh_result(RefreshResult::SignedIn("ada".to_string(), "fresh".to_string()));
        app.settle();
        assert_eq!(app.router.current(), Route::Home);
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_sign_up_result_returns_to_sign_in() {
        let mut app = app_with(MemoryStorage::new());
        app.initialize_session();
        app.settle();
        app.navigate(Navigation::push(Route::SignUp));
        app.settle();
        assert_eq!(app.router.current(), Route::SignUp);

        app.process_refresh_result(RefreshResult::SignedUp("grace".to_string()));
        app.settle();
        assert_eq!(app.router.current(), Route::SignIn);
        assert_eq!(app.sign_in.username, "grace");
        assert_eq!(app.router.depth(), 1);
    }

    #[test]
    fn test_empty_sign_in_form_rejected_locally() {
        let mut app = app_with(MemoryStorage::new());
        app.sign_in.username.clear();
        app.submit_sign_in();
        assert!(!app.sign_in.submitting);
        assert_eq!(app.sign_in.error.as_deref(), Some("Username and password required"));
    }

    #[test]
    fn test_sign_in_error_message_for_rejected_credentials() {
        let err = anyhow::Error::from(ApiError::Unauthorized);
        assert_eq!(sign_in_error_message(&err), "Invalid username or password");
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    #[test]
    fn test_selection_clamped_to_list() {
        let mut app = app_with(MemoryStorage::new());
        app.router = Router::new(Route::Institutions);
        app.institutions = (0..3)
            .map(|i| Institution {
                id: i,
                name: format!("Inst {}", i),
                country: None,
            })
            .collect();

        app.move_selection(1);
        assert_eq!(app.selection(Route::Institutions), 1);
        app.move_selection(PAGE_SCROLL_SIZE as isize);
        assert_eq!(app.selection(Route::Institutions), 2);
        app.move_selection(-(PAGE_SCROLL_SIZE as isize));
        assert_eq!(app.selection(Route::Institutions), 0);

        app.select_last();
        app.institutions.truncate(1);
        app.rebuild_summary();
        assert_eq!(app.selection(Route::Institutions), 0);
    }

    // -------------------------------------------------------------------------
    // Forms
    // -------------------------------------------------------------------------

    #[test]
    fn test_focus_cycles() {
        assert_eq!(SignInFocus::Button.next(), SignInFocus::Username);
        assert_eq!(SignInFocus::Username.prev(), SignInFocus::Button);
        assert_eq!(SignUpFocus::Password.next(), SignUpFocus::Button);
        assert_eq!(SignUpFocus::FullName.prev(), SignUpFocus::Button);
    }

    #[test]
    fn test_sign_up_validation() {
        let mut form = SignUpForm {
            full_name: "Grace Hopper".to_string(),
            email: "grace@navy.mil".to_string(),
            username: "grace".to_string(),
            password: "cobol".to_string(),
            ..SignUpForm::default()
        };
        assert_eq!(form.validate(), Ok(()));

        form.email = "grace".to_string();
        assert_eq!(form.validate(), Err("Enter a valid email address"));

        form.full_name = "  ".to_string();
        assert_eq!(form.validate(), Err("All fields are required"));
    }

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, ' '));
        assert!(!can_add_username_char(0, '\x00'));
        assert!(!can_add_username_char(0, '\t'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(can_add_password_char(0, ' '));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_email_and_name_chars() {
        assert!(can_add_email_char(0, '@'));
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(MAX_EMAIL_LENGTH, 'a'));
        assert!(can_add_full_name_char(0, ' '));
        assert!(!can_add_full_name_char(MAX_FULL_NAME_LENGTH, 'a'));
    }
}
