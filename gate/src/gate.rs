//! The session gate every protected page runs before rendering.
//!
//! One evaluation per page load:
//!
//! 1. read the stored [`SessionRecord`]; nothing usable means "not logged in"
//! 2. decode the token payload locally; an unreadable token is never trusted
//! 3. if `exp` has passed, ask the [`TokenRefresher`] for a new token exactly
//!    once and write it back with every other record field preserved
//! 4. resolve the role from the (possibly refreshed) token and let the page
//!    initialize, or wipe the record, alert, and send the visitor to login
//!
//! Every failure collapses to the same visible outcome. Causes are only
//! distinguished in the message ("not logged in" vs "session expired") and in
//! the debug log.

use crate::claims::TokenClaims;
use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::refresh::TokenRefresher;
use crate::session::{SessionRecord, SessionStore};

/// Title of the blocking dialog shown before redirecting to login.
pub const ACCESS_DENIED_TITLE: &str = "Access Denied!";

/// Shown when there was no session to begin with.
pub const NOT_LOGGED_IN_MESSAGE: &str = "You need to log in to access this page.";

/// Shown when a session existed but could not be kept alive.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Where a token stands during one evaluation.
///
/// [`TokenState::inspect`] yields `Valid`, `NeedsRefresh`, or `RefreshFailed`
/// for a payload it cannot read. A `NeedsRefresh` state is then settled by the
/// gate into `Valid` (new token) or `RefreshFailed`.
#[derive(Debug)]
pub enum TokenState {
    /// Decoded and not yet expired.
    Valid(TokenClaims),
    /// Decoded but expired; a refresh may still save the session.
    NeedsRefresh(TokenClaims),
    /// The session cannot be kept alive: the payload is unreadable, or the
    /// single refresh attempt failed.
    RefreshFailed(GateError),
}

impl TokenState {
    /// Inspect `token` at `now_millis` (epoch milliseconds).
    ///
    /// An unreadable payload is never worth a refresh and lands directly in
    /// `RefreshFailed` with a [`GateError::TokenUndecodable`] cause.
    pub fn inspect(token: &str, now_millis: i64, config: &GateConfig) -> Self {
        match TokenClaims::decode_with(token, &config.role_claims) {
            Ok(claims) if claims.is_expired_at(now_millis) => TokenState::NeedsRefresh(claims),
            Ok(claims) => TokenState::Valid(claims),
            Err(e) => TokenState::RefreshFailed(e),
        }
    }
}

/// Why the visitor was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotLoggedIn,
    SessionExpired,
}

impl DenialReason {
    /// User-facing dialog body.
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::NotLoggedIn => NOT_LOGGED_IN_MESSAGE,
            DenialReason::SessionExpired => SESSION_EXPIRED_MESSAGE,
        }
    }
}

/// A denied evaluation: the reason shown to the user and the underlying cause.
#[derive(Debug)]
pub struct Denial {
    pub reason: DenialReason,
    pub cause: GateError,
}

impl Denial {
    /// Classify a failure. Only a missing session reads as "not logged in";
    /// everything else means a session existed and was lost.
    pub fn from_cause(cause: GateError) -> Self {
        let reason = if cause.is_missing_session() {
            DenialReason::NotLoggedIn
        } else {
            DenialReason::SessionExpired
        };
        Self { reason, cause }
    }

    /// Dialog title.
    pub fn title(&self) -> &'static str {
        ACCESS_DENIED_TITLE
    }

    /// Dialog body.
    pub fn message(&self) -> &'static str {
        self.reason.message()
    }
}

/// A session the page may proceed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub email: String,
    pub token: String,
    /// Role resolved from the token, if it carries one.
    pub role: Option<String>,
    /// Token expiry, epoch seconds.
    pub expires_at: i64,
    /// `true` when this evaluation had to refresh the token.
    pub refreshed: bool,
    privileged: bool,
}

impl AuthenticatedSession {
    /// `true` when the role matches the configured privileged role; pages use
    /// this to show or hide admin-only controls.
    pub fn is_privileged(&self) -> bool {
        self.privileged
    }
}

/// Result of one gate evaluation.
#[derive(Debug)]
pub enum GateOutcome {
    Authenticated(AuthenticatedSession),
    Unauthenticated(Denial),
}

impl GateOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, GateOutcome::Authenticated(_))
    }

    pub fn session(&self) -> Option<&AuthenticatedSession> {
        match self {
            GateOutcome::Authenticated(session) => Some(session),
            GateOutcome::Unauthenticated(_) => None,
        }
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            GateOutcome::Authenticated(_) => None,
            GateOutcome::Unauthenticated(denial) => Some(denial),
        }
    }
}

/// The page a gate protects.
///
/// `initialize` receives the session and is where role-gated controls are
/// shown or hidden. `show_access_denied` must block until the user has seen
/// the message; `redirect` follows it unconditionally.
pub trait ProtectedPage {
    fn initialize(&mut self, session: &AuthenticatedSession);

    fn show_access_denied(&mut self, title: &str, message: &str);

    fn redirect(&mut self, url: &str);
}

/// Session gate bound to a store and a refresher.
///
/// # Examples
///
/// ```rust,no_run
/// use session_gate::{GateConfig, HttpTokenRefresher, MemorySessionStore, SessionGate};
///
/// # async fn example() -> session_gate::Result<()> {
/// let config = GateConfig::builder().base_url("http://localhost:8080").build()?;
/// let refresher = HttpTokenRefresher::from_config(&config)?;
/// let mut gate = SessionGate::new(config, MemorySessionStore::new(), refresher);
///
/// let outcome = gate.evaluate().await;
/// if let Some(session) = outcome.session() {
///     println!("welcome back {}", session.email);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SessionGate<S, R> {
    config: GateConfig,
    store: S,
    refresher: R,
}

impl<S, R> SessionGate<S, R>
where
    S: SessionStore,
    R: TokenRefresher,
{
    pub fn new(config: GateConfig, store: S, refresher: R) -> Self {
        Self {
            config,
            store,
            refresher,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn refresher(&self) -> &R {
        &self.refresher
    }

    /// Release the store, e.g. to inspect it after a test run.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Evaluate against the current wall clock.
    pub async fn evaluate(&mut self) -> GateOutcome {
        self.evaluate_at(chrono::Utc::now().timestamp_millis()).await
    }

    /// Evaluate as if the current time were `now_millis` (epoch milliseconds).
    ///
    /// On denial the stored record has already been cleared when this returns.
    pub async fn evaluate_at(&mut self, now_millis: i64) -> GateOutcome {
        match self.resolve(now_millis).await {
            Ok(session) => {
                log::debug!(
                    "[GATE] Access granted (role={}, refreshed={})",
                    session.role.as_deref().unwrap_or("-"),
                    session.refreshed
                );
                GateOutcome::Authenticated(session)
            },
            Err(cause) => {
                let denial = Denial::from_cause(cause);
                log::debug!("[GATE] Access denied ({:?}): {}", denial.reason, denial.cause);
                self.wipe();
                GateOutcome::Unauthenticated(denial)
            },
        }
    }

    /// Evaluate, then drive `page`: initialize it, or alert and redirect.
    pub async fn guard<P: ProtectedPage + ?Sized>(&mut self, page: &mut P) -> GateOutcome {
        let outcome = self.evaluate().await;
        self.dispatch(&outcome, page);
        outcome
    }

    /// Hand an outcome to the page.
    pub fn dispatch<P: ProtectedPage + ?Sized>(&self, outcome: &GateOutcome, page: &mut P) {
        match outcome {
            GateOutcome::Authenticated(session) => page.initialize(session),
            GateOutcome::Unauthenticated(denial) => {
                page.show_access_denied(denial.title(), denial.message());
                page.redirect(&self.config.login_url);
            },
        }
    }

    /// Logout action wired by the page: clear the record and go to login.
    ///
    /// The redirect happens even if clearing fails; the error is still returned.
    pub fn logout<P: ProtectedPage + ?Sized>(&mut self, page: &mut P) -> Result<()> {
        log::debug!("[GATE] Logout requested");
        let cleared = self.store.clear();
        page.redirect(&self.config.login_url);
        cleared
    }

    async fn resolve(&mut self, now_millis: i64) -> Result<AuthenticatedSession> {
        let mut record = self.load_record()?;

        let (state, refreshed) = match TokenState::inspect(&record.token, now_millis, &self.config) {
            TokenState::NeedsRefresh(claims) => {
                log::debug!(
                    "[GATE] {}; refreshing",
                    GateError::TokenExpired {
                        expires_at: claims.expires_at
                    }
                );
                (self.refresh(&mut record).await, true)
            },
            state => (state, false),
        };

        let claims = match state {
            TokenState::Valid(claims) => claims,
            TokenState::RefreshFailed(cause) => return Err(cause),
            TokenState::NeedsRefresh(claims) => {
                return Err(GateError::TokenExpired {
                    expires_at: claims.expires_at,
                });
            },
        };

        let privileged = claims.role.as_deref() == Some(self.config.privileged_role.as_str());

        Ok(AuthenticatedSession {
            email: record.email,
            token: record.token,
            role: claims.role,
            expires_at: claims.expires_at,
            refreshed,
            privileged,
        })
    }

    fn load_record(&self) -> Result<SessionRecord> {
        match self.store.get() {
            Ok(Some(record)) if record.has_token() => Ok(record),
            Ok(_) => Err(GateError::NoSession),
            Err(e) => {
                log::warn!("[GATE] Stored session is unreadable: {}", e);
                Err(GateError::NoSession)
            },
        }
    }

    /// Settle a `NeedsRefresh` token with exactly one refresher call. On
    /// success `record` holds the new token and has been written back.
    async fn refresh(&mut self, record: &mut SessionRecord) -> TokenState {
        match self.exchange(record).await {
            Ok((updated, claims)) => {
                *record = updated;
                TokenState::Valid(claims)
            },
            Err(cause) => TokenState::RefreshFailed(cause),
        }
    }

    async fn exchange(&mut self, record: &SessionRecord) -> Result<(SessionRecord, TokenClaims)> {
        let token = self.refresher.refresh(&record.token).await?;

        let claims = TokenClaims::decode_with(&token, &self.config.role_claims).map_err(|e| {
            GateError::malformed_refresh(format!("Refreshed token is unusable: {}", e))
        })?;

        let updated = record.with_token(token);
        self.store.set(&updated)?;
        log::debug!("[STORE] Session token replaced after refresh");

        Ok((updated, claims))
    }

    fn wipe(&mut self) {
        if let Err(e) = self.store.clear() {
            log::warn!("[STORE] Failed to clear session after denial: {}", e);
        }
    }
}
