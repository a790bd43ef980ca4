//! Account form schemas (login, registration, password reset) and the
//! identity-provider error codes the client tells apart.

use validator::ValidateEmail;

use crate::validation::{Checker, FieldPath, Violations};

pub const EMAIL_REQUIRED: &str = "メールアドレスを入力してください";
pub const EMAIL_INVALID: &str = "正しいメールアドレスの形式で入力してください。";
pub const PASSWORD_TOO_SHORT: &str = "8桁以上のパスワードを入力してください";
pub const PASSWORD_CHARSET: &str = "英大文字、英小文字、数字で入力してください";
pub const PASSWORD_MISMATCH: &str = "パスワードと確認用パスワードが一致しません";

pub const PASSWORD_MIN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordResetForm {
    pub email: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), Violations> {
        let mut checker = Checker::new();
        check_email(&mut checker, &self.email);
        check_password(&mut checker, "password", &self.password);
        checker.finish(())
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), Violations> {
        let mut checker = Checker::new();
        check_email(&mut checker, &self.email);
        check_password(&mut checker, "password", &self.password);
        check_password(&mut checker, "passwordConfirmation", &self.password_confirmation);
        checker.ensure(
            self.password == self.password_confirmation,
            &FieldPath::new("passwordConfirmation"),
            PASSWORD_MISMATCH,
        );
        checker.finish(())
    }
}

impl PasswordResetForm {
    pub fn validate(&self) -> Result<(), Violations> {
        let mut checker = Checker::new();
        check_email(&mut checker, &self.email);
        checker.finish(())
    }
}

fn check_email(checker: &mut Checker, email: &str) {
    let path = FieldPath::new("email");
    checker.min_len(&path, email, 1, EMAIL_REQUIRED);
    checker.ensure(is_email(email), &path, EMAIL_INVALID);
}

fn check_password(checker: &mut Checker, field: &str, password: &str) {
    let path = FieldPath::new(field);
    checker.min_len(&path, password, PASSWORD_MIN, PASSWORD_TOO_SHORT);
    checker.ensure(
        !password.is_empty() && password.chars().all(|c| c.is_ascii_alphanumeric()),
        &path,
        PASSWORD_CHARSET,
    );
}

/// HTML5 address syntax, plus the rules the sign-up screen has always
/// enforced on top: no leading dot or `..` in the local part and an
/// alphabetic top-level domain of two or more letters.
fn is_email(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    if local.starts_with('.') || local.contains("..") {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((_, tld)) => tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

/// Error codes reported by the identity provider that get a tailored message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityErrorCode {
    EmailAlreadyInUse,
    UserNotFound,
    Other(String),
}

impl IdentityErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "auth/email-already-in-use" => IdentityErrorCode::EmailAlreadyInUse,
            "auth/user-not-found" => IdentityErrorCode::UserNotFound,
            other => IdentityErrorCode::Other(other.to_string()),
        }
    }
}
