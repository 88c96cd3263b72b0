//! Account write payloads: registration and password changes.

use serde::Deserialize;
use validator::Validate;

use crate::validation::{FieldErrors, MIN_PASSWORD_LENGTH, USERNAME_RE};

/// Usernames that would collide with fixed routes such as `/users/me`.
const RESERVED_USERNAMES: &[&str] = &["me", "subscriptions", "set_password"];

/// Body of `POST /api/users`.
///
/// Missing fields deserialize as empty strings and are reported together
/// with every other violation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Registration {
    #[serde(default)]
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Username must be at most 150 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

impl Registration {
    /// Trim surrounding whitespace from the text fields (not the password).
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.username = self.username.trim().to_string();
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self
    }
}

/// Run every payload-only registration rule and collect the violations.
pub fn check_registration(input: &Registration) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Err(report) = input.validate() {
        errors.extend_from(&report);
    }

    for (field, value) in [
        ("email", &input.email),
        ("username", &input.username),
        ("first_name", &input.first_name),
        ("last_name", &input.last_name),
    ] {
        if value.trim().is_empty() {
            errors.add(field, "This field may not be blank");
        }
    }

    if !input.username.is_empty() {
        if !USERNAME_RE.is_match(&input.username) {
            errors.add(
                "username",
                "Username may contain only letters, digits and @/./+/-/_",
            );
        }
        if RESERVED_USERNAMES.contains(&input.username.to_lowercase().as_str()) {
            errors.add("username", format!("Username {:?} is reserved", input.username));
        }
    }

    if let Some(message) = check_password(&input.password) {
        errors.add("password", message);
    }

    errors
}

/// Password strength rule. Returns the violation message, if any.
pub fn check_password(password: &str) -> Option<String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Some("Password must not be entirely numeric".to_string());
    }
    None
}
