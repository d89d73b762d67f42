//! Account validation utilities

use thiserror::Error;
use validator::ValidateEmail;

/// Errors that can occur during account validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccountValidationError {
    #[error("Username is required")]
    EmptyUsername,

    #[error("Username must be at least {0} characters")]
    UsernameTooShort(usize),

    #[error("Username must be at most {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains invalid character: '{0}'. Only letters, numbers, underscores and hyphens are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Username cannot start or end with an underscore or hyphen")]
    InvalidUsernameBoundary,

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    PasswordMissingLowercase,

    #[error("Password must contain at least one number")]
    PasswordMissingDigit,

    #[error("Password must contain at least one special character")]
    PasswordMissingSpecial,
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 20;
const MIN_PASSWORD_LENGTH: usize = 8;

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Validate a username
///
/// Rules:
/// - 3 to 20 characters
/// - Only alphanumeric characters, underscores, and hyphens
/// - Must start and end with an alphanumeric character
pub fn validate_username(username: &str) -> Result<(), AccountValidationError> {
    if username.is_empty() {
        return Err(AccountValidationError::EmptyUsername);
    }

    let chars: Vec<char> = username.chars().collect();

    if chars.len() < MIN_USERNAME_LENGTH {
        return Err(AccountValidationError::UsernameTooShort(
            MIN_USERNAME_LENGTH,
        ));
    }

    if chars.len() > MAX_USERNAME_LENGTH {
        return Err(AccountValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    for c in &chars {
        if !c.is_ascii_alphanumeric() && *c != '_' && *c != '-' {
            return Err(AccountValidationError::InvalidUsernameCharacter(*c));
        }
    }

    if !chars[0].is_ascii_alphanumeric() || !chars[chars.len() - 1].is_ascii_alphanumeric() {
        return Err(AccountValidationError::InvalidUsernameBoundary);
    }

    Ok(())
}

/// Validate an email address and return its normalized form
/// (trimmed, lowercased).
pub fn validate_email(email: &str) -> Result<String, AccountValidationError> {
    let normalized = email.trim().to_lowercase();

    if !normalized.validate_email() {
        return Err(AccountValidationError::InvalidEmail);
    }

    Ok(normalized)
}

/// Validate password strength
///
/// Rules:
/// - Minimum 8 characters
/// - At least one uppercase letter, one lowercase letter, one number,
///   and one special character
pub fn validate_password(password: &str) -> Result<(), AccountValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountValidationError::PasswordTooShort(
            MIN_PASSWORD_LENGTH,
        ));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AccountValidationError::PasswordMissingUppercase);
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AccountValidationError::PasswordMissingLowercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AccountValidationError::PasswordMissingDigit);
    }

    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(AccountValidationError::PasswordMissingSpecial);
    }

    Ok(())
}
