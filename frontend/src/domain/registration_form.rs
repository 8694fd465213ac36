//! Per-instance state of the registration form.
//!
//! Purpose: own the typed values, the messages shown next to each field, a
//! form-level banner, and the submission state. Nothing here is shared
//! between form instances.
//!
//! State machine:
//!
//! ```text
//! Editing -> Validating -> Editing            (invalid, errors shown)
//!                      \-> Submitting -> Navigated   (accepted)
//!                                     \-> Editing    (failed, banner shown)
//! ```

use std::collections::BTreeMap;

use crate::domain::ports::RegistrationGatewayError;
use crate::domain::{
    RegistrationField, RegistrationInput, RegistrationPayload, ValidationErrors, validate,
    validate_field,
};

/// Banner shown when the service did not answer in time.
pub const TIMEOUT_BANNER: &str = "The registration service did not respond. Please try again.";
/// Banner shown when the service could not be reached.
pub const TRANSPORT_BANNER: &str = "We could not reach the registration service. Please try again.";

/// Where a form instance is in its submission lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Accepting input. Initial state.
    #[default]
    Editing,
    /// Whole-object validation is running.
    Validating,
    /// A registration request is in flight.
    Submitting,
    /// Registration succeeded and the user was sent elsewhere. Terminal.
    Navigated,
}

/// Reasons a submit request did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    /// The current values failed validation.
    #[error("registration input is invalid: {0}")]
    Invalid(ValidationErrors),
    /// A previous submission has not completed yet.
    #[error("a registration request is already in flight")]
    InFlight,
    /// The form already completed registration.
    #[error("the registration form has already completed")]
    Closed,
}

/// Returned when editing a form that already completed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the registration form has already completed")]
pub struct FormClosed;

/// Returned when a completion arrives while no request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no registration request is in flight")]
pub struct NotSubmitting;

/// Explicit state object for one registration form.
///
/// # Examples
/// ```
/// use frontend::domain::{RegistrationField, RegistrationForm};
///
/// let mut form = RegistrationForm::new();
/// form.update_field(RegistrationField::Email, "bad").unwrap();
/// assert_eq!(form.error(RegistrationField::Email), Some("Invalid email address."));
/// assert_eq!(form.error(RegistrationField::FirstName), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    values: RegistrationInput,
    errors: BTreeMap<RegistrationField, String>,
    banner: Option<String>,
    state: SubmissionState,
}

impl RegistrationForm {
    /// Empty form in the `Editing` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current values.
    #[must_use]
    pub fn values(&self) -> &RegistrationInput {
        &self.values
    }

    /// Messages shown next to fields, in display order.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<RegistrationField, String> {
        &self.errors
    }

    /// Message shown next to `field`, if any.
    #[must_use]
    pub fn error(&self, field: RegistrationField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Form-level message from the last failed submission.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// Store a new value for `field` and re-evaluate the affected fields.
    ///
    /// A password change also re-checks a non-empty confirmation, so a stale
    /// mismatch message cannot linger.
    ///
    /// # Errors
    ///
    /// Returns [`FormClosed`] once the form has navigated away.
    pub fn update_field(
        &mut self,
        field: RegistrationField,
        value: impl Into<String>,
    ) -> Result<(), FormClosed> {
        if self.state == SubmissionState::Navigated {
            return Err(FormClosed);
        }

        self.values.set(field, value);
        self.revalidate(field);
        if field == RegistrationField::Password && !self.values.confirm_password.is_empty() {
            self.revalidate(RegistrationField::ConfirmPassword);
        }
        Ok(())
    }

    /// Validate the whole form and, if it passes, enter `Submitting`.
    ///
    /// # Errors
    ///
    /// - [`SubmitRejection::InFlight`] while a request is outstanding.
    /// - [`SubmitRejection::Closed`] once the form has navigated away.
    /// - [`SubmitRejection::Invalid`] when validation fails; every failing
    ///   field's message is shown and the form returns to `Editing`.
    pub fn begin_submission(&mut self) -> Result<RegistrationPayload, SubmitRejection> {
        match self.state {
            SubmissionState::Submitting => return Err(SubmitRejection::InFlight),
            SubmissionState::Navigated => return Err(SubmitRejection::Closed),
            SubmissionState::Editing | SubmissionState::Validating => {}
        }

        self.state = SubmissionState::Validating;
        match validate(&self.values) {
            Ok(valid) => {
                self.errors.clear();
                self.banner = None;
                self.state = SubmissionState::Submitting;
                Ok(valid.into_payload())
            }
            Err(errors) => {
                self.errors = errors
                    .iter()
                    .map(|(field, issue)| (field, issue.to_string()))
                    .collect();
                self.state = SubmissionState::Editing;
                Err(SubmitRejection::Invalid(errors))
            }
        }
    }

    /// Record the outcome of the in-flight request.
    ///
    /// Success moves to `Navigated`. Failure returns to `Editing` with a
    /// banner, and any field messages reported by the service are shown next
    /// to their fields.
    ///
    /// # Errors
    ///
    /// Returns [`NotSubmitting`] when no request is in flight; the form is
    /// left untouched.
    pub fn complete_submission(
        &mut self,
        result: Result<(), &RegistrationGatewayError>,
    ) -> Result<(), NotSubmitting> {
        if self.state != SubmissionState::Submitting {
            return Err(NotSubmitting);
        }

        match result {
            Ok(()) => {
                self.state = SubmissionState::Navigated;
            }
            Err(error) => {
                self.banner = Some(banner_for(error));
                if let RegistrationGatewayError::Rejected { fields, .. } = error {
                    self.errors
                        .extend(fields.iter().map(|(field, message)| (*field, message.clone())));
                }
                self.state = SubmissionState::Editing;
            }
        }
        Ok(())
    }

    fn revalidate(&mut self, field: RegistrationField) {
        match validate_field(field, &self.values) {
            Some(issue) => {
                self.errors.insert(field, issue.to_string());
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }
}

fn banner_for(error: &RegistrationGatewayError) -> String {
    match error {
        RegistrationGatewayError::Rejected { message, .. } => message.clone(),
        RegistrationGatewayError::Timeout { .. } => TIMEOUT_BANNER.to_owned(),
        RegistrationGatewayError::Transport { .. } => TRANSPORT_BANNER.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for form state transitions and error display.
    use super::*;
    use crate::domain::ports::RejectedFields;
    use rstest::{fixture, rstest};

    fn fill(form: &mut RegistrationForm, values: [&str; 5]) {
        for (field, value) in RegistrationField::ALL.into_iter().zip(values) {
            form.update_field(field, value).expect("form is editable");
        }
    }

    #[fixture]
    fn filled_form() -> RegistrationForm {
        let mut form = RegistrationForm::new();
        fill(
            &mut form,
            ["Ana", "Cruz", "ana@example.com", "secret1", "secret1"],
        );
        form
    }

    #[rstest]
    fn starts_empty_and_editing() {
        let form = RegistrationForm::new();
        assert_eq!(form.state(), SubmissionState::Editing);
        assert_eq!(form.values(), &RegistrationInput::default());
        assert!(form.errors().is_empty());
        assert_eq!(form.banner(), None);
    }

    #[rstest]
    fn editing_one_field_only_reports_that_field() {
        let mut form = RegistrationForm::new();
        form.update_field(RegistrationField::Password, "abc")
            .expect("form is editable");
        assert_eq!(
            form.errors().keys().copied().collect::<Vec<_>>(),
            vec![RegistrationField::Password]
        );
    }

    #[rstest]
    fn fixing_a_field_clears_its_message() {
        let mut form = RegistrationForm::new();
        form.update_field(RegistrationField::Email, "ana@")
            .expect("form is editable");
        assert!(form.error(RegistrationField::Email).is_some());
        form.update_field(RegistrationField::Email, "ana@example.com")
            .expect("form is editable");
        assert_eq!(form.error(RegistrationField::Email), None);
    }

    #[rstest]
    fn password_change_rechecks_confirmation(mut filled_form: RegistrationForm) {
        filled_form
            .update_field(RegistrationField::Password, "secret2")
            .expect("form is editable");
        assert_eq!(
            filled_form.error(RegistrationField::ConfirmPassword),
            Some("Passwords do not match.")
        );

        filled_form
            .update_field(RegistrationField::Password, "secret1")
            .expect("form is editable");
        assert_eq!(filled_form.error(RegistrationField::ConfirmPassword), None);
    }

    #[rstest]
    fn password_change_leaves_untouched_confirmation_alone() {
        let mut form = RegistrationForm::new();
        form.update_field(RegistrationField::Password, "secret1")
            .expect("form is editable");
        assert_eq!(form.error(RegistrationField::ConfirmPassword), None);
    }

    #[rstest]
    fn invalid_submit_shows_every_error_and_returns_to_editing() {
        let mut form = RegistrationForm::new();
        fill(&mut form, ["", "Cruz", "bad", "123", "456"]);

        let rejection = form.begin_submission().expect_err("input is invalid");
        let SubmitRejection::Invalid(errors) = rejection else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 4);
        assert_eq!(form.state(), SubmissionState::Editing);
        assert_eq!(
            form.error(RegistrationField::FirstName),
            Some("First name is required.")
        );
        assert_eq!(
            form.error(RegistrationField::Email),
            Some("Invalid email address.")
        );
        assert_eq!(
            form.error(RegistrationField::Password),
            Some("Password must be at least 6 characters.")
        );
        assert_eq!(
            form.error(RegistrationField::ConfirmPassword),
            Some("Passwords do not match.")
        );
    }

    #[rstest]
    fn untouched_form_reports_all_fields_on_submit() {
        let mut form = RegistrationForm::new();
        let rejection = form.begin_submission().expect_err("empty form is invalid");
        assert!(matches!(rejection, SubmitRejection::Invalid(ref errors) if errors.len() == 5));
        assert_eq!(form.errors().len(), 5);
    }

    #[rstest]
    fn valid_submit_yields_payload_and_blocks_a_second_submit(mut filled_form: RegistrationForm) {
        let payload = filled_form.begin_submission().expect("input is valid");
        assert_eq!(payload.email(), "ana@example.com");
        assert_eq!(filled_form.state(), SubmissionState::Submitting);

        assert_eq!(
            filled_form.begin_submission(),
            Err(SubmitRejection::InFlight)
        );
        assert_eq!(filled_form.state(), SubmissionState::Submitting);
    }

    #[rstest]
    fn success_navigates_and_closes_the_form(mut filled_form: RegistrationForm) {
        filled_form.begin_submission().expect("input is valid");
        filled_form
            .complete_submission(Ok(()))
            .expect("request was in flight");

        assert_eq!(filled_form.state(), SubmissionState::Navigated);
        assert_eq!(
            filled_form.update_field(RegistrationField::Email, "x"),
            Err(FormClosed)
        );
        assert_eq!(filled_form.begin_submission(), Err(SubmitRejection::Closed));
    }

    #[rstest]
    #[case(RegistrationGatewayError::timeout("deadline"), TIMEOUT_BANNER)]
    #[case(RegistrationGatewayError::transport("connection refused"), TRANSPORT_BANNER)]
    fn transport_failures_show_a_banner(
        mut filled_form: RegistrationForm,
        #[case] error: RegistrationGatewayError,
        #[case] banner: &str,
    ) {
        filled_form.begin_submission().expect("input is valid");
        filled_form
            .complete_submission(Err(&error))
            .expect("request was in flight");

        assert_eq!(filled_form.state(), SubmissionState::Editing);
        assert_eq!(filled_form.banner(), Some(banner));
        assert!(filled_form.errors().is_empty());
    }

    #[rstest]
    fn rejection_maps_server_fields_and_allows_resubmission(mut filled_form: RegistrationForm) {
        filled_form.begin_submission().expect("input is valid");
        let error = RegistrationGatewayError::rejected(
            "A user with this email already exists.",
            RejectedFields::from([(
                RegistrationField::Email,
                "A user with this email already exists.".to_owned(),
            )]),
        );
        filled_form
            .complete_submission(Err(&error))
            .expect("request was in flight");

        assert_eq!(
            filled_form.error(RegistrationField::Email),
            Some("A user with this email already exists.")
        );
        assert_eq!(
            filled_form.banner(),
            Some("A user with this email already exists.")
        );

        filled_form
            .update_field(RegistrationField::Email, "ana.cruz@example.com")
            .expect("form is editable");
        assert_eq!(filled_form.error(RegistrationField::Email), None);
        let payload = filled_form.begin_submission().expect("input is valid");
        assert_eq!(payload.email(), "ana.cruz@example.com");
        assert_eq!(filled_form.banner(), None);
    }

    #[rstest]
    fn completion_without_submission_is_refused(filled_form: RegistrationForm) {
        let mut form = filled_form;
        assert_eq!(form.complete_submission(Ok(())), Err(NotSubmitting));
        assert_eq!(form.state(), SubmissionState::Editing);
    }
}
