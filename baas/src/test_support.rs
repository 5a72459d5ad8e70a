//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and behind the `test-support` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    Accounts, AccountsEvents, AuthTokens, CloudCode, Database, IdentityProvider,
    IdentityProviderError, PasswordAuthRequest, RegistrationOutcome, RegistrationRequest,
    StatusSink,
};
use crate::domain::{Response, User};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("test double mutex poisoned"),
    }
}

/// Shared, ordered log of labelled calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: impl Into<String>) {
        lock(&self.0).push(label.into());
    }

    pub fn entries(&self) -> Vec<String> {
        lock(&self.0).clone()
    }
}

/// Identity token the recording provider returns when nothing is scripted.
pub const RECORDED_ID_TOKEN: &str = "eyJraWQiOiJyZWNvcmRlZCJ9.recorded-id-token";

/// Identity provider that counts calls, keeps the requests it saw and
/// replays scripted results in order.
///
/// Unscripted calls succeed: registration returns status 200 and
/// authentication returns [`RECORDED_ID_TOKEN`].
#[derive(Default)]
pub struct RecordingIdentityProvider {
    registrations: Mutex<Vec<RegistrationRequest>>,
    authentications: Mutex<Vec<PasswordAuthRequest>>,
    deletions: AtomicUsize,
    register_script: Mutex<VecDeque<Result<RegistrationOutcome, IdentityProviderError>>>,
    authenticate_script: Mutex<VecDeque<Result<AuthTokens, IdentityProviderError>>>,
    delete_script: Mutex<VecDeque<Result<(), IdentityProviderError>>>,
}

impl RecordingIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_register(&self, result: Result<RegistrationOutcome, IdentityProviderError>) {
        lock(&self.register_script).push_back(result);
    }

    pub fn script_authenticate(&self, result: Result<AuthTokens, IdentityProviderError>) {
        lock(&self.authenticate_script).push_back(result);
    }

    pub fn script_delete(&self, result: Result<(), IdentityProviderError>) {
        lock(&self.delete_script).push_back(result);
    }

    pub fn registrations(&self) -> Vec<RegistrationRequest> {
        lock(&self.registrations).clone()
    }

    pub fn authentications(&self) -> Vec<PasswordAuthRequest> {
        lock(&self.authentications).clone()
    }

    pub fn deletion_count(&self) -> usize {
        self.deletions.load(Ordering::SeqCst)
    }

    /// Total number of calls that would have reached the network.
    pub fn call_count(&self) -> usize {
        lock(&self.registrations).len() + lock(&self.authentications).len() + self.deletion_count()
    }
}

/// Tokens carrying `id_token` and a derived access token.
pub fn tokens(id_token: &str) -> AuthTokens {
    AuthTokens {
        id_token: id_token.to_owned(),
        access_token: format!("access-for-{id_token}"),
        refresh_token: None,
        expires_in: Some(3600),
    }
}

/// Registration outcome with the given HTTP-style status.
pub fn registration_status(status: u16) -> RegistrationOutcome {
    RegistrationOutcome {
        status,
        user_confirmed: status == 200,
        user_sub: None,
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentityProvider {
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationOutcome, IdentityProviderError> {
        lock(&self.registrations).push(request.clone());
        lock(&self.register_script)
            .pop_front()
            .unwrap_or_else(|| Ok(registration_status(200)))
    }

    async fn authenticate(
        &self,
        request: &PasswordAuthRequest,
    ) -> Result<AuthTokens, IdentityProviderError> {
        lock(&self.authentications).push(request.clone());
        lock(&self.authenticate_script)
            .pop_front()
            .unwrap_or_else(|| Ok(tokens(RECORDED_ID_TOKEN)))
    }

    async fn delete_account(&self, _tokens: &AuthTokens) -> Result<(), IdentityProviderError> {
        self.deletions.fetch_add(1, Ordering::SeqCst);
        lock(&self.delete_script).pop_front().unwrap_or(Ok(()))
    }
}

/// Status sink keeping every line it was given.
#[derive(Debug, Default)]
pub struct RecordingStatusSink(Mutex<Vec<String>>);

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        lock(&self.0).clone()
    }
}

impl StatusSink for RecordingStatusSink {
    fn set_status(&self, text: &str) {
        lock(&self.0).push(text.to_owned());
    }
}

/// CloudCode and Database capability recording its initialisation into a
/// [`CallLog`].
#[derive(Debug, Clone)]
pub struct RecordingCapability {
    label: &'static str,
    log: CallLog,
}

impl RecordingCapability {
    pub fn new(label: &'static str, log: &CallLog) -> Self {
        Self {
            label,
            log: log.clone(),
        }
    }
}

#[async_trait]
impl CloudCode for RecordingCapability {
    async fn initialize(&self) {
        self.log.record(format!("{}.initialize", self.label));
    }
}

#[async_trait]
impl Database for RecordingCapability {
    async fn initialize(&self) {
        self.log.record(format!("{}.initialize", self.label));
    }
}

/// Accounts capability replaying scripted responses and logging each call.
///
/// A successful scripted sign-in stores a user carrying the response data as
/// its token; unscripted operations succeed.
pub struct ScriptedAccounts {
    log: CallLog,
    events: AccountsEvents,
    user: Mutex<Option<User>>,
    create: Mutex<VecDeque<Response>>,
    sign_in: Mutex<VecDeque<Response>>,
}

impl ScriptedAccounts {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            events: AccountsEvents::new(),
            user: Mutex::new(None),
            create: Mutex::new(VecDeque::new()),
            sign_in: Mutex::new(VecDeque::new()),
        }
    }

    /// Start with `user` already known.
    pub fn with_user(self, user: User) -> Self {
        *lock(&self.user) = Some(user);
        self
    }

    pub fn script_create(&self, response: Response) {
        lock(&self.create).push_back(response);
    }

    pub fn script_sign_in(&self, response: Response) {
        lock(&self.sign_in).push_back(response);
    }
}

#[async_trait]
impl Accounts for ScriptedAccounts {
    async fn initialize(&self) {
        self.log.record("accounts.initialize");
    }

    fn has_user(&self) -> bool {
        lock(&self.user).is_some()
    }

    fn user(&self) -> Option<User> {
        lock(&self.user).clone()
    }

    async fn user_create(&self, email: &str, _password: &str, _nickname: &str) -> Response {
        self.log.record("accounts.user_create");
        let response = lock(&self.create)
            .pop_front()
            .unwrap_or_else(|| Response::success(None));
        if response.is_success() {
            let user = User::new(email);
            *lock(&self.user) = Some(user.clone());
            self.events.user_created.invoke(&user);
        }
        response
    }

    async fn user_sign_in(&self, email: &str, _password: &str) -> Response {
        self.log.record("accounts.user_sign_in");
        let response = lock(&self.sign_in)
            .pop_front()
            .unwrap_or_else(|| Response::success(Some(RECORDED_ID_TOKEN.to_owned())));
        if response.is_success() {
            let mut user = User::new(email);
            if let Some(token) = response.data() {
                user = user.with_token_id(token);
            }
            *lock(&self.user) = Some(user.clone());
            self.events.user_signed_in.invoke(&user);
        }
        response
    }

    async fn user_sign_out(&self) -> Response {
        self.log.record("accounts.user_sign_out");
        let taken = lock(&self.user).take();
        match taken {
            Some(user) => {
                self.events.user_signed_out.invoke(&user);
                Response::success(None)
            }
            None => Response::failure("sign out failed: no user"),
        }
    }

    async fn user_delete(&self) -> Response {
        self.log.record("accounts.user_delete");
        let taken = lock(&self.user).take();
        match taken {
            Some(user) => {
                self.events.user_deleted.invoke(&user);
                Response::success(None)
            }
            None => Response::failure("delete failed: no user"),
        }
    }

    fn events(&self) -> &AccountsEvents {
        &self.events
    }
}
