//! Registration input, validation results, and the outbound payload.
//!
//! Purpose: hold the raw values typed into the registration form, evaluate
//! them against [`REGISTRATION_SCHEMA`], and produce either a
//! [`ValidRegistration`] or a field-scoped [`ValidationErrors`] map.
//!
//! Validation is pure: the same input always yields the same outcome, and no
//! partial validity is cached between calls.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroizing;

mod schema;

pub use self::schema::{
    CrossFieldRule, FieldRule, PASSWORD_MIN_CHARS, REGISTRATION_SCHEMA, RegistrationSchema,
};

/// Fields of the registration form, ordered as they are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrationField {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Contact and login email address.
    Email,
    /// Chosen password.
    Password,
    /// Repeated password; never transmitted.
    ConfirmPassword,
}

impl RegistrationField {
    /// Every field in display order.
    pub const ALL: [Self; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
    ];

    /// Name used by the form layer.
    #[must_use]
    pub const fn form_name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }

    /// Key used by the authentication service, when the field is transmitted.
    #[must_use]
    pub const fn wire_name(self) -> Option<&'static str> {
        match self {
            Self::FirstName => Some("first_name"),
            Self::LastName => Some("last_name"),
            Self::Email => Some("email"),
            Self::Password => Some("password"),
            Self::ConfirmPassword => None,
        }
    }

    /// Resolve a field from a key reported by the authentication service.
    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_name() == Some(name))
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

/// Reason a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// First name was empty.
    FirstNameRequired,
    /// Last name was empty.
    LastNameRequired,
    /// Email did not match the address grammar.
    InvalidEmail,
    /// Password was shorter than `min` characters.
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Confirmation was empty.
    ConfirmationRequired,
    /// Confirmation differed from the password.
    PasswordMismatch,
}

impl ValidationIssue {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FirstNameRequired | Self::LastNameRequired | Self::ConfirmationRequired => {
                "required"
            }
            Self::InvalidEmail => "invalid_email",
            Self::PasswordTooShort { .. } => "too_short",
            Self::PasswordMismatch => "mismatch",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstNameRequired => write!(f, "First name is required."),
            Self::LastNameRequired => write!(f, "Last name is required."),
            Self::InvalidEmail => write!(f, "Invalid email address."),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters.")
            }
            Self::ConfirmationRequired => write!(f, "Please confirm your password."),
            Self::PasswordMismatch => write!(f, "Passwords do not match."),
        }
    }
}

/// Field-scoped validation failures, one issue per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<RegistrationField, ValidationIssue>);

impl ValidationErrors {
    /// Issue recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: RegistrationField) -> Option<ValidationIssue> {
        self.0.get(&field).copied()
    }

    /// Whether `field` carries an issue.
    #[must_use]
    pub fn contains(&self, field: RegistrationField) -> bool {
        self.0.contains_key(&field)
    }

    /// Number of fields with issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field carries an issue.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over failing fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (RegistrationField, ValidationIssue)> + '_ {
        self.0.iter().map(|(field, issue)| (*field, *issue))
    }

    /// Failing fields in display order.
    #[must_use]
    pub fn fields(&self) -> Vec<RegistrationField> {
        self.0.keys().copied().collect()
    }

    pub(crate) fn insert(&mut self, field: RegistrationField, issue: ValidationIssue) {
        self.0.insert(field, issue);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, issue) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {issue}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw registration values as typed by the user.
///
/// All values may be empty. No trimming or case folding is applied, so the
/// validated output is byte-for-byte what was entered.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
}

impl RegistrationInput {
    /// Build an input from its five raw values.
    ///
    /// # Examples
    /// ```
    /// use frontend::domain::{RegistrationField, RegistrationInput};
    ///
    /// let input = RegistrationInput::new("Ana", "Cruz", "ana@example.com", "secret1", "secret1");
    /// assert_eq!(input.value(RegistrationField::LastName), "Cruz");
    /// ```
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Current value of `field`.
    #[must_use]
    pub fn value(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::FirstName => &self.first_name,
            RegistrationField::LastName => &self.last_name,
            RegistrationField::Email => &self.email,
            RegistrationField::Password => &self.password,
            RegistrationField::ConfirmPassword => &self.confirm_password,
        }
    }

    /// Replace the value of `field`.
    pub fn set(&mut self, field: RegistrationField, value: impl Into<String>) {
        let slot = match field {
            RegistrationField::FirstName => &mut self.first_name,
            RegistrationField::LastName => &mut self.last_name,
            RegistrationField::Email => &mut self.email,
            RegistrationField::Password => &mut self.password,
            RegistrationField::ConfirmPassword => &mut self.confirm_password,
        };
        *slot = value.into();
    }
}

impl fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}

/// Input that satisfied every rule of the schema.
///
/// Only [`RegistrationSchema::validate`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration(RegistrationInput);

impl ValidRegistration {
    pub(crate) fn new(input: RegistrationInput) -> Self {
        Self(input)
    }

    /// The accepted input, unchanged.
    #[must_use]
    pub fn input(&self) -> &RegistrationInput {
        &self.0
    }

    /// Rename fields to the wire shape and drop the confirmation.
    #[must_use]
    pub fn into_payload(self) -> RegistrationPayload {
        let RegistrationInput {
            first_name,
            last_name,
            email,
            password,
            confirm_password: _,
        } = self.0;
        RegistrationPayload {
            first_name,
            last_name,
            email,
            password: Zeroizing::new(password),
        }
    }
}

/// Registration request sent to the authentication service.
///
/// ## Invariants
/// - Built only from a [`ValidRegistration`].
/// - The password is wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationPayload {
    first_name: String,
    last_name: String,
    email: String,
    password: Zeroizing<String>,
}

impl RegistrationPayload {
    /// Value sent as `first_name`.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Value sent as `last_name`.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Value sent as `email`.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Value sent as `password`.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationPayload")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validate a complete input against [`REGISTRATION_SCHEMA`].
///
/// # Errors
///
/// Returns every failing field with its first failing rule.
///
/// # Examples
/// ```
/// use frontend::domain::{RegistrationField, RegistrationInput, ValidationIssue, validate};
///
/// let input = RegistrationInput::new("Ana", "Cruz", "ana@example.com", "secret1", "secret2");
/// let errors = validate(&input).unwrap_err();
/// assert_eq!(
///     errors.get(RegistrationField::ConfirmPassword),
///     Some(ValidationIssue::PasswordMismatch)
/// );
/// ```
pub fn validate(input: &RegistrationInput) -> Result<ValidRegistration, ValidationErrors> {
    REGISTRATION_SCHEMA.validate(input)
}

/// Evaluate a single field of `input` against [`REGISTRATION_SCHEMA`].
#[must_use]
pub fn validate_field(
    field: RegistrationField,
    input: &RegistrationInput,
) -> Option<ValidationIssue> {
    REGISTRATION_SCHEMA.validate_field(field, input)
}
