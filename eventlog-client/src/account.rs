//! Registration, login and password reset.
//!
//! Credentials are checked by an external identity provider; the backend
//! only learns about the user through the ID token it is handed afterwards.

use eventlog_core::account::{IdentityErrorCode, LoginForm, PasswordResetForm, RegisterForm};
use eventlog_core::protocol::PostUserRequest;
use eventlog_core::validation::Violations;
use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::EventsBackend;
use crate::error::ClientError;
use crate::notify::{Notification, Notifier};
use crate::session::SessionToken;

pub const EMAIL_IN_USE: &str = "すでに登録されているメールアドレスです。";
pub const REGISTER_FAILED: &str = "アカウントの作成に失敗しました。";
pub const AUTH_FAILED: &str = "認証に失敗しました。";
pub const VERIFICATION_FAILED: &str = "確認メールの送信に失敗しました。";
pub const VERIFICATION_SENT: &str = "確認メールを送信しました";
pub const RESET_SENT: &str = "メールを送信しました。";
pub const RESET_FAILED: &str = "メールの送信に失敗しました。";

/// A user as returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub uid: String,
    pub id_token: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("identity provider error: {code}")]
pub struct IdentityError {
    pub code: String,
}

impl IdentityError {
    pub fn new(code: impl Into<String>) -> Self {
        IdentityError { code: code.into() }
    }

    pub fn kind(&self) -> IdentityErrorCode {
        IdentityErrorCode::parse(&self.code)
    }
}

/// Email/password identity service.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityUser, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityUser, IdentityError>;

    async fn send_email_verification(&self, user: &IdentityUser) -> Result<(), IdentityError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum AccountOutcome {
    Done,
    Rejected(Violations),
    /// Carries the message shown to the user.
    Failed(String),
}

pub struct AccountController<P, B, N> {
    provider: P,
    backend: B,
    notifier: N,
    session: SessionToken,
}

impl<P: IdentityProvider, B: EventsBackend, N: Notifier> AccountController<P, B, N> {
    /// `session` should be shared with the backend so requests made after
    /// sign-in carry the new token.
    pub fn new(provider: P, backend: B, notifier: N, session: SessionToken) -> Self {
        AccountController {
            provider,
            backend,
            notifier,
            session,
        }
    }

    pub async fn register(&self, form: &RegisterForm) -> AccountOutcome {
        if let Err(violations) = form.validate() {
            return AccountOutcome::Rejected(violations);
        }

        let user = match self.provider.sign_up(&form.email, &form.password).await {
            Ok(user) => user,
            Err(e) => {
                let message = match e.kind() {
                    IdentityErrorCode::EmailAlreadyInUse => EMAIL_IN_USE,
                    _ => REGISTER_FAILED,
                };
                warn!(code = %e.code, "sign-up rejected");
                return self.fail(message);
            }
        };
        self.session.set(user.id_token.clone());

        let body = PostUserRequest {
            email: form.email.clone(),
            password: form.password.clone(),
            password_confirmation: form.password_confirmation.clone(),
        };
        if let Err(e) = self.backend.register_user(&body).await {
            self.session.clear();
            return self.backend_failure("user registration", &e, REGISTER_FAILED);
        }

        if let Err(e) = self.provider.send_email_verification(&user).await {
            warn!(code = %e.code, uid = %user.uid, "verification mail not sent");
            return self.fail(VERIFICATION_FAILED);
        }

        debug!(uid = %user.uid, "account registered");
        self.notifier.notify(Notification::success(VERIFICATION_SENT));
        AccountOutcome::Done
    }

    pub async fn login(&self, form: &LoginForm) -> AccountOutcome {
        if let Err(violations) = form.validate() {
            return AccountOutcome::Rejected(violations);
        }

        let user = match self.provider.sign_in(&form.email, &form.password).await {
            Ok(user) => user,
            Err(e) => {
                warn!(code = %e.code, "sign-in rejected");
                return self.fail(AUTH_FAILED);
            }
        };
        self.session.set(user.id_token);

        if let Err(e) = self.backend.login().await {
            self.session.clear();
            return self.backend_failure("login", &e, AUTH_FAILED);
        }

        AccountOutcome::Done
    }

    pub async fn reset_password(&self, form: &PasswordResetForm) -> AccountOutcome {
        if let Err(violations) = form.validate() {
            return AccountOutcome::Rejected(violations);
        }

        match self.provider.send_password_reset(&form.email).await {
            Ok(()) => {
                self.notifier.notify(Notification::success(RESET_SENT));
                AccountOutcome::Done
            }
            Err(e) => {
                warn!(code = %e.code, "password reset mail not sent");
                self.fail(RESET_FAILED)
            }
        }
    }

    pub fn session(&self) -> &SessionToken {
        &self.session
    }

    /// Surface the backend's own `{error}` text when it sent one.
    fn backend_failure(&self, action: &str, e: &ClientError, fallback: &str) -> AccountOutcome {
        warn!(action, error = %e, "backend rejected account request");
        let message = e.backend_message().unwrap_or(fallback).to_string();
        self.fail(&message)
    }

    fn fail(&self, message: &str) -> AccountOutcome {
        self.notifier.notify(Notification::error(message));
        AccountOutcome::Failed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::session::CurrentUser;
    use crate::testing::{Call, FakeBackend, RecordingNotifier};
    use eventlog_core::account::EMAIL_REQUIRED;

    #[derive(Default)]
    struct FakeIdentity {
        sign_up_error: Option<&'static str>,
        sign_in_error: Option<&'static str>,
        verification_fails: bool,
        reset_fails: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeIdentity {
        fn user() -> IdentityUser {
            IdentityUser {
                uid: "u1".to_string(),
                id_token: "jwt-u1".to_string(),
            }
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl IdentityProvider for FakeIdentity {
        async fn sign_up(&self, _: &str, _: &str) -> Result<IdentityUser, IdentityError> {
            self.record("sign_up");
            match self.sign_up_error {
                Some(code) => Err(IdentityError::new(code)),
                None => Ok(Self::user()),
            }
        }

        async fn sign_in(&self, _: &str, _: &str) -> Result<IdentityUser, IdentityError> {
            self.record("sign_in");
            match self.sign_in_error {
                Some(code) => Err(IdentityError::new(code)),
                None => Ok(Self::user()),
            }
        }

        async fn send_email_verification(&self, _: &IdentityUser) -> Result<(), IdentityError> {
            self.record("verify");
            if self.verification_fails {
                return Err(IdentityError::new("auth/too-many-requests"));
            }
            Ok(())
        }

        async fn send_password_reset(&self, _: &str) -> Result<(), IdentityError> {
            self.record("reset");
            if self.reset_fails {
                return Err(IdentityError::new("auth/user-not-found"));
            }
            Ok(())
        }
    }

    type Controller = AccountController<FakeIdentity, FakeBackend, RecordingNotifier>;

    fn controller(provider: FakeIdentity, backend: FakeBackend) -> Controller {
        AccountController::new(
            provider,
            backend,
            RecordingNotifier::default(),
            SessionToken::default(),
        )
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            email: "a@example.com".to_string(),
            password: "abcd1234".to_string(),
            password_confirmation: "abcd1234".to_string(),
        }
    }

    fn login_form() -> LoginForm {
        LoginForm {
            email: "a@example.com".to_string(),
            password: "abcd1234".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_happy_path() {
        let c = controller(FakeIdentity::default(), FakeBackend::default());

        assert_eq!(c.register(&register_form()).await, AccountOutcome::Done);
        assert_eq!(*c.provider.calls.lock().unwrap(), vec!["sign_up", "verify"]);
        assert_eq!(c.backend.calls(), vec![Call::RegisterUser]);
        assert_eq!(c.backend.registered.lock().unwrap()[0].email, "a@example.com");
        assert_eq!(c.session().id_token().as_deref(), Some("jwt-u1"));
        assert_eq!(
            c.notifier.all(),
            vec![Notification::success(VERIFICATION_SENT)]
        );
    }

    #[tokio::test]
    async fn test_register_email_in_use() {
        let c = controller(
            FakeIdentity {
                sign_up_error: Some("auth/email-already-in-use"),
                ..Default::default()
            },
            FakeBackend::default(),
        );

        assert_eq!(
            c.register(&register_form()).await,
            AccountOutcome::Failed(EMAIL_IN_USE.to_string())
        );
        assert!(c.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_register_unknown_provider_error_is_generic() {
        let c = controller(
            FakeIdentity {
                sign_up_error: Some("auth/network-request-failed"),
                ..Default::default()
            },
            FakeBackend::default(),
        );

        assert_eq!(
            c.register(&register_form()).await,
            AccountOutcome::Failed(REGISTER_FAILED.to_string())
        );
    }

    #[tokio::test]
    async fn test_register_surfaces_backend_message() {
        let c = controller(
            FakeIdentity::default(),
            FakeBackend::failing_on(Call::RegisterUser),
        );

        assert_eq!(
            c.register(&register_form()).await,
            AccountOutcome::Failed("RegisterUser failed".to_string())
        );
        assert_eq!(*c.provider.calls.lock().unwrap(), vec!["sign_up"]);
        assert_eq!(c.session().id_token(), None);
    }

    #[tokio::test]
    async fn test_register_verification_mail_failure() {
        let c = controller(
            FakeIdentity {
                verification_fails: true,
                ..Default::default()
            },
            FakeBackend::default(),
        );

        assert_eq!(
            c.register(&register_form()).await,
            AccountOutcome::Failed(VERIFICATION_FAILED.to_string())
        );
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_provider() {
        let c = controller(FakeIdentity::default(), FakeBackend::default());
        let mut form = login_form();
        form.email = String::new();

        match c.login(&form).await {
            AccountOutcome::Rejected(v) => {
                assert_eq!(v.for_field("email").next(), Some(EMAIL_REQUIRED))
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(c.provider.calls.lock().unwrap().is_empty());
        assert!(c.notifier.all().is_empty());
    }

    #[tokio::test]
    async fn test_login_sets_token_then_confirms_with_backend() {
        let c = controller(FakeIdentity::default(), FakeBackend::default());

        assert_eq!(c.login(&login_form()).await, AccountOutcome::Done);
        assert_eq!(c.backend.calls(), vec![Call::Login]);
        assert_eq!(c.session().id_token().as_deref(), Some("jwt-u1"));
    }

    #[tokio::test]
    async fn test_login_user_not_found() {
        let c = controller(
            FakeIdentity {
                sign_in_error: Some("auth/user-not-found"),
                ..Default::default()
            },
            FakeBackend::default(),
        );

        assert_eq!(
            c.login(&login_form()).await,
            AccountOutcome::Failed(AUTH_FAILED.to_string())
        );
        assert_eq!(c.notifier.all(), vec![Notification::error(AUTH_FAILED)]);
        assert_eq!(c.session().id_token(), None);
    }

    #[tokio::test]
    async fn test_password_reset() {
        let c = controller(FakeIdentity::default(), FakeBackend::default());
        let form = PasswordResetForm {
            email: "a@example.com".to_string(),
        };
        assert_eq!(c.reset_password(&form).await, AccountOutcome::Done);
        assert_eq!(c.notifier.all(), vec![Notification::success(RESET_SENT)]);

        let c = controller(
            FakeIdentity {
                reset_fails: true,
                ..Default::default()
            },
            FakeBackend::default(),
        );
        assert_eq!(
            c.reset_password(&form).await,
            AccountOutcome::Failed(RESET_FAILED.to_string())
        );
    }
}
