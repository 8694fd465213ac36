//! Declarative registration schema.
//!
//! Each constraint is a small predicate value. A field is valid when all of
//! its rules pass; the input is valid when every field and every cross-field
//! rule passes.

use email_address::{EmailAddress, Options};

use super::{
    RegistrationField, RegistrationInput, ValidRegistration, ValidationErrors, ValidationIssue,
};

/// Minimum number of characters accepted for a password.
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Constraint on the value of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// The value must contain at least `min` characters.
    ///
    /// Characters are Unicode scalar values, so a value counts differently
    /// than under UTF-16 code-unit counting: `"😀😀😀"` has three characters.
    MinChars {
        /// Minimum character count.
        min: usize,
        /// Issue reported on failure.
        issue: ValidationIssue,
    },
    /// The value must be a well-formed email address with a top-level domain.
    EmailAddress {
        /// Issue reported on failure.
        issue: ValidationIssue,
    },
}

impl FieldRule {
    /// Check `value` against this rule.
    ///
    /// # Errors
    ///
    /// Returns the rule's issue when `value` does not satisfy it.
    pub fn check(&self, value: &str) -> Result<(), ValidationIssue> {
        let satisfied = match *self {
            Self::MinChars { min, .. } => value.chars().count() >= min,
            Self::EmailAddress { .. } => is_email_address(value),
        };
        if satisfied { Ok(()) } else { Err(self.issue()) }
    }

    /// Issue reported when the rule fails.
    #[must_use]
    pub const fn issue(&self) -> ValidationIssue {
        match *self {
            Self::MinChars { issue, .. } | Self::EmailAddress { issue } => issue,
        }
    }
}

/// Constraint relating two fields of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// `field` must equal `other`. Failures are attached to `field`.
    MustMatch {
        /// Field that receives the issue.
        field: RegistrationField,
        /// Field it is compared against.
        other: RegistrationField,
        /// Issue reported on failure.
        issue: ValidationIssue,
    },
}

impl CrossFieldRule {
    /// Check `input` against this rule.
    ///
    /// # Errors
    ///
    /// Returns the rule's issue when the related values disagree.
    pub fn check(&self, input: &RegistrationInput) -> Result<(), ValidationIssue> {
        match *self {
            Self::MustMatch {
                field,
                other,
                issue,
            } => {
                if input.value(field) == input.value(other) {
                    Ok(())
                } else {
                    Err(issue)
                }
            }
        }
    }

    /// Field that receives the issue when this rule fails.
    #[must_use]
    pub const fn field(&self) -> RegistrationField {
        match *self {
            Self::MustMatch { field, .. } => field,
        }
    }
}

/// Ordered field rules plus cross-field refinements.
#[derive(Debug)]
pub struct RegistrationSchema {
    fields: &'static [(RegistrationField, &'static [FieldRule])],
    refinements: &'static [CrossFieldRule],
}

/// Schema enforced by the registration form.
pub static REGISTRATION_SCHEMA: RegistrationSchema = RegistrationSchema {
    fields: &[
        (
            RegistrationField::FirstName,
            &[FieldRule::MinChars {
                min: 1,
                issue: ValidationIssue::FirstNameRequired,
            }],
        ),
        (
            RegistrationField::LastName,
            &[FieldRule::MinChars {
                min: 1,
                issue: ValidationIssue::LastNameRequired,
            }],
        ),
        (
            RegistrationField::Email,
            &[FieldRule::EmailAddress {
                issue: ValidationIssue::InvalidEmail,
            }],
        ),
        (
            RegistrationField::Password,
            &[FieldRule::MinChars {
                min: PASSWORD_MIN_CHARS,
                issue: ValidationIssue::PasswordTooShort {
                    min: PASSWORD_MIN_CHARS,
                },
            }],
        ),
        (
            RegistrationField::ConfirmPassword,
            &[FieldRule::MinChars {
                min: 1,
                issue: ValidationIssue::ConfirmationRequired,
            }],
        ),
    ],
    refinements: &[CrossFieldRule::MustMatch {
        field: RegistrationField::ConfirmPassword,
        other: RegistrationField::Password,
        issue: ValidationIssue::PasswordMismatch,
    }],
};

impl RegistrationSchema {
    /// Validate every field, then the cross-field refinements.
    ///
    /// Field checks never short-circuit one another. A refinement only
    /// reports on a field that passed its own rules.
    ///
    /// # Errors
    ///
    /// Returns the collected issues when any rule fails.
    pub fn validate(
        &self,
        input: &RegistrationInput,
    ) -> Result<ValidRegistration, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (field, rules) in self.fields {
            if let Err(issue) = check_all(rules, input.value(*field)) {
                errors.insert(*field, issue);
            }
        }

        for refinement in self.refinements {
            let field = refinement.field();
            if errors.contains(field) {
                continue;
            }
            if let Err(issue) = refinement.check(input) {
                errors.insert(field, issue);
            }
        }

        if errors.is_empty() {
            Ok(ValidRegistration::new(input.clone()))
        } else {
            Err(errors)
        }
    }

    /// Validate one field, including refinements attached to it.
    #[must_use]
    pub fn validate_field(
        &self,
        field: RegistrationField,
        input: &RegistrationInput,
    ) -> Option<ValidationIssue> {
        let own = self
            .fields
            .iter()
            .filter(|(candidate, _)| *candidate == field)
            .find_map(|(_, rules)| check_all(rules, input.value(field)).err());

        own.or_else(|| {
            self.refinements
                .iter()
                .filter(|refinement| refinement.field() == field)
                .find_map(|refinement| refinement.check(input).err())
        })
    }
}

fn check_all(rules: &[FieldRule], value: &str) -> Result<(), ValidationIssue> {
    rules.iter().try_for_each(|rule| rule.check(value))
}

/// Grammar check followed by the stricter shape accepted by the web form:
/// an ASCII dot-atom local part and a hostname ending in an alphabetic TLD.
fn is_email_address(value: &str) -> bool {
    let options = Options::default()
        .with_required_tld()
        .without_display_text()
        .without_domain_literal();
    if EmailAddress::parse_with_options(value, options).is_err() {
        return false;
    }
    value
        .rsplit_once('@')
        .is_some_and(|(local, domain)| is_plain_local_part(local) && is_hostname(domain))
}

fn is_plain_local_part(local: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || "_'+-.".contains(c);
    !local.starts_with('.')
        && !local.contains("..")
        && local.chars().all(allowed)
        && local
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || "_+-".contains(c))
}

fn is_hostname(domain: &str) -> bool {
    let Some((labels, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let is_label = |label: &str| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    labels.split('.').all(is_label)
        && tld.chars().count() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}
