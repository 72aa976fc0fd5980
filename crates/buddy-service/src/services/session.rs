//! Session service
//!
//! Initializes the remote service and manages the logged-in user.

use buddy_core::{RemoteSettings, User};
use tracing::{debug, error, info, instrument, warn};

use super::context::{ChatContext, InitState};
use super::error::{ServiceError, ServiceResult};

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ChatContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ChatContext) -> Self {
        Self { ctx }
    }

    /// Initialize the remote service with the configured credentials
    ///
    /// Succeeds immediately once initialized. A failure is remembered and
    /// returned again without contacting the remote.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> ServiceResult<()> {
        let mut state = self.ctx.init_state().lock().await;

        match &*state {
            InitState::Ready => return Ok(()),
            InitState::Failed(err) => {
                debug!(error = %err, "Initialization failed earlier, not retrying");
                return Err(ServiceError::Initialization(err.clone()));
            }
            InitState::Uninitialized => {}
        }

        let config = self.ctx.remote_config();
        let settings = RemoteSettings::new(&config.app_id, &config.region);

        match self.ctx.remote().init(&settings).await {
            Ok(()) => {
                *state = InitState::Ready;
                self.ctx.start_pump();
                info!(app_id = %settings.app_id, region = %settings.region, "Remote chat service initialized");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, code = err.code(), "Remote chat service initialization failed");
                *state = InitState::Failed(err.clone());
                Err(ServiceError::Initialization(err))
            }
        }
    }

    /// Log in as `uid`, creating the user first if needed
    #[instrument(skip(self, name))]
    pub async fn login(&self, uid: &str, name: &str) -> ServiceResult<User> {
        let remote = self.ctx.remote();
        let auth_key = &self.ctx.remote_config().auth_key;

        match remote.create_user(uid, name, auth_key).await {
            Ok(user) => info!(uid = %user.uid, "User created"),
            Err(err) if err.is_already_exists() => debug!(uid, "User already exists"),
            Err(err) => {
                warn!(uid, error = %err, "User creation failed");
                return Err(ServiceError::Login(err));
            }
        }

        let user = remote.login(uid, auth_key).await.map_err(|err| {
            warn!(uid, error = %err, "Login failed");
            ServiceError::Login(err)
        })?;

        self.ctx.set_current_user(Some(user.clone()));
        info!(uid = %user.uid, "User logged in");

        Ok(user)
    }

    /// End the remote session. Failures are logged, never returned.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(err) = self.ctx.remote().logout().await {
            warn!(error = %err, "Logout failed");
        }
        if let Some(user) = self.ctx.current_user() {
            info!(uid = %user.uid, "User logged out");
        }
        self.ctx.set_current_user(None);
    }

    /// Ask the remote for the active session
    ///
    /// Refreshes the cached user. Remote errors are logged and reported as
    /// no user.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Option<User> {
        match self.ctx.remote().logged_in_user().await {
            Ok(user) => {
                self.ctx.set_current_user(user.clone());
                user
            }
            Err(err) => {
                warn!(error = %err, "Failed to get logged-in user");
                None
            }
        }
    }

    /// Last known user without a remote round trip
    pub fn cached_user(&self) -> Option<User> {
        self.ctx.current_user()
    }
}
