//! Rate-limited VK API client
//!
//! A [`VkClient`] owns one session and one [`CallScheduler`]. Every method
//! call, including every page of every collection, goes through
//! [`VkClient::call`] and therefore shares the scheduler's timeline.
//! Cloning a client is cheap and shares both.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use vkclient_common::CallScheduler;
use vkclient_domain::constants::{PARAM_ACCESS_TOKEN, PARAM_VERSION};
use vkclient_domain::{
    AppCredentials, Collected, Config, Endpoints, PageQuery, Params, Session, VkError,
};

use super::collect::PageCollector;
use super::invoker::{unwrap_envelope, HttpInvoker, RemoteInvoker};
use super::methods;
use crate::http::HttpClient;

/// API client with call pacing and session tracking
#[derive(Clone)]
pub struct VkClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) app: AppCredentials,
    pub(crate) endpoints: Endpoints,
    pub(crate) http: HttpClient,
    session: RwLock<Option<Session>>,
    scheduler: CallScheduler,
    invoker: Arc<dyn RemoteInvoker>,
}

impl fmt::Debug for VkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VkClient")
            .field("client_id", &self.inner.app.client_id)
            .field("scope", &self.inner.app.scope)
            .field("interval", &self.inner.scheduler.interval())
            .field("has_valid_token", &self.has_valid_token())
            .finish_non_exhaustive()
    }
}

impl VkClient {
    /// Build a client talking to the endpoints named in `config`.
    ///
    /// # Errors
    ///
    /// Returns `VkError::Config` if the HTTP client cannot be created.
    pub fn new(config: Config) -> Result<Self, VkError> {
        Self::builder().config(config).build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> VkClientBuilder {
        VkClientBuilder::default()
    }

    pub fn app(&self) -> &AppCredentials {
        &self.inner.app
    }

    pub fn scheduler(&self) -> &CallScheduler {
        &self.inner.scheduler
    }

    /// Replace the current session.
    pub fn set_session(&self, session: Session) {
        debug!(user_id = ?session.user_id, expires = ?session.expires, "session replaced");
        *self.inner.session.write() = Some(session);
    }

    pub fn clear_session(&self) {
        *self.inner.session.write() = None;
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.session.read().clone()
    }

    /// Access token of the current session, only while it is valid.
    pub fn token(&self) -> Option<String> {
        self.inner
            .session
            .read()
            .as_ref()
            .filter(|session| session.is_valid())
            .map(|session| session.token.clone())
    }

    pub fn has_valid_token(&self) -> bool {
        self.inner.session.read().as_ref().is_some_and(Session::is_valid)
    }

    /// Whether the application's scope covers `method`.
    pub fn has_in_scope(&self, method: &str) -> bool {
        methods::is_in_scope(method, self.inner.app.scope)
    }

    /// Call one API method.
    ///
    /// Misuse (unknown method, method outside the scope, missing or expired
    /// token) is reported before the call takes a slot on the timeline. The
    /// API version and, for non-open methods, the access token are attached
    /// unless the caller already supplied them.
    ///
    /// # Errors
    ///
    /// Misuse errors, `VkError::Transport` and `VkError::Decode` from the
    /// invoker, and `VkError::Application` for an error envelope. Nothing is
    /// retried.
    #[instrument(skip_all, fields(method = %method))]
    pub async fn call(&self, method: &str, params: Params) -> Result<Value, VkError> {
        let params = self.prepare_call(method, params)?;

        let invoker = Arc::clone(&self.inner.invoker);
        let name = method.to_string();
        let envelope = self
            .inner
            .scheduler
            .schedule(move || async move { invoker.invoke(&name, &params).await })
            .await;

        match envelope.and_then(unwrap_envelope) {
            Ok(response) => Ok(response),
            Err(err) => {
                warn!(error = %err, "method call failed");
                Err(err)
            }
        }
    }

    /// Start a lazy, page-by-page collection of `method`.
    ///
    /// `offset` and `count` in `params` become the starting offset and the
    /// explicit item limit of the run.
    ///
    /// # Errors
    ///
    /// Fails before any call is made if the method is unknown, out of scope,
    /// or `offset`/`count` are not non-negative integers.
    pub fn collect_stream(&self, method: &str, params: Params) -> Result<PageCollector, VkError> {
        self.check_method(method)?;
        let query = PageQuery::new(params)?;
        Ok(PageCollector::new(self.clone(), method, query))
    }

    /// Collect every page of `method` into one result.
    pub async fn collect(&self, method: &str, params: Params) -> Result<Collected, VkError> {
        self.collect_stream(method, params)?.aggregate().await
    }

    fn check_method(&self, method: &str) -> Result<(), VkError> {
        if !methods::is_method(method) {
            return Err(VkError::UnknownMethod(method.to_string()));
        }
        if !self.has_in_scope(method) {
            return Err(VkError::OutOfScope(method.to_string()));
        }
        Ok(())
    }

    fn prepare_call(&self, method: &str, mut params: Params) -> Result<Params, VkError> {
        self.check_method(method)?;

        if !methods::is_open_method(method) {
            let token = self.token().ok_or(VkError::TokenExpired)?;
            params.entry(PARAM_ACCESS_TOKEN).or_insert_with(|| Value::from(token));
        }
        params
            .entry(PARAM_VERSION)
            .or_insert_with(|| Value::from(self.inner.app.api_version.clone()));

        Ok(params)
    }
}

/// Builder for [`VkClient`]
#[derive(Default)]
pub struct VkClientBuilder {
    config: Option<Config>,
    http: Option<HttpClient>,
    invoker: Option<Arc<dyn RemoteInvoker>>,
    session: Option<Session>,
}

impl VkClientBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a preconfigured HTTP client for credential exchange and, unless an
    /// invoker is set, for method calls.
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace the HTTP method invoker.
    pub fn invoker(mut self, invoker: Arc<dyn RemoteInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Start with an existing session.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `VkError::Config` if the HTTP client cannot be created.
    pub fn build(self) -> Result<VkClient, VkError> {
        let config = self.config.unwrap_or_default();

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = HttpClient::builder().timeout(config.options.timeout());
                if let Some(agent) = &config.options.user_agent {
                    builder = builder.user_agent(agent.clone());
                }
                builder.build()?
            }
        };

        let invoker = self.invoker.unwrap_or_else(|| {
            Arc::new(HttpInvoker::new(http.clone(), config.endpoints.methods.clone()))
        });

        Ok(VkClient {
            inner: Arc::new(ClientInner {
                scheduler: CallScheduler::new(config.options.interval()),
                app: config.app,
                endpoints: config.endpoints,
                http,
                session: RwLock::new(self.session),
                invoker,
            }),
        })
    }
}
