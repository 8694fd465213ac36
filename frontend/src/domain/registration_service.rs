//! Domain service sequencing one registration submit.
//!
//! The service validates through the form, dispatches at most one request to
//! the [`AuthenticationGateway`], and navigates on success. Failures are
//! recorded on the form and logged; none of them escape as panics.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{AuthenticationGateway, Navigator, RegistrationGatewayError};
use crate::domain::{RegistrationForm, Route, SubmitRejection, TraceId};

/// Result of one submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The form refused to submit; nothing was dispatched.
    NotDispatched(SubmitRejection),
    /// The service accepted the registration and the user was navigated.
    Navigated(Route),
    /// The request was dispatched and failed; the form is editable again.
    Failed(RegistrationGatewayError),
}

/// Registration use-case wired to its collaborators.
#[derive(Clone)]
pub struct RegistrationService {
    gateway: Arc<dyn AuthenticationGateway>,
    navigator: Arc<dyn Navigator>,
    success_route: Route,
}

impl RegistrationService {
    /// Build a service that navigates to `success_route` after registering.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn AuthenticationGateway>,
        navigator: Arc<dyn Navigator>,
        success_route: Route,
    ) -> Self {
        Self {
            gateway,
            navigator,
            success_route,
        }
    }

    /// Screen shown after a successful registration.
    #[must_use]
    pub const fn success_route(&self) -> Route {
        self.success_route
    }

    /// Validate `form` and, when it is valid, register the user.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use frontend::domain::ports::FixtureAuthenticationGateway;
    /// use frontend::domain::{
    ///     RegistrationField, RegistrationForm, RegistrationService, Route, SubmissionOutcome,
    /// };
    /// use frontend::outbound::TracingNavigator;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let service = RegistrationService::new(
    ///     Arc::new(FixtureAuthenticationGateway::default()),
    ///     Arc::new(TracingNavigator::default()),
    ///     Route::Login,
    /// );
    /// let mut form = RegistrationForm::new();
    /// for (field, value) in RegistrationField::ALL
    ///     .into_iter()
    ///     .zip(["Ana", "Cruz", "ana@example.com", "secret1", "secret1"])
    /// {
    ///     form.update_field(field, value).unwrap();
    /// }
    /// assert_eq!(
    ///     service.submit(&mut form).await,
    ///     SubmissionOutcome::Navigated(Route::Login)
    /// );
    /// # });
    /// ```
    pub async fn submit(&self, form: &mut RegistrationForm) -> SubmissionOutcome {
        let payload = match form.begin_submission() {
            Ok(payload) => payload,
            Err(rejection) => {
                debug!(reason = %rejection, "registration not dispatched");
                return SubmissionOutcome::NotDispatched(rejection);
            }
        };

        let trace_id = TraceId::generate();
        let result = TraceId::scope(trace_id, async {
            info!(%trace_id, "dispatching registration");
            self.gateway.register(&payload).await
        })
        .await;

        if let Err(error) = form.complete_submission(result.as_ref().map(|_| ())) {
            warn!(%trace_id, error = %error, "registration form changed state mid-flight");
        }

        match result {
            Ok(()) => {
                info!(%trace_id, route = %self.success_route, "registration accepted");
                self.navigator.navigate(self.success_route);
                SubmissionOutcome::Navigated(self.success_route)
            }
            Err(error) => {
                warn!(
                    %trace_id,
                    kind = error.kind(),
                    error = %error,
                    "registration failed"
                );
                SubmissionOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for submit sequencing against mocked ports.
    use super::*;
    use crate::domain::ports::{MockAuthenticationGateway, MockNavigator, RejectedFields};
    use crate::domain::{RegistrationField, SubmissionState};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn form_with(values: [&str; 5]) -> RegistrationForm {
        let mut form = RegistrationForm::new();
        for (field, value) in RegistrationField::ALL.into_iter().zip(values) {
            form.update_field(field, value).expect("form is editable");
        }
        form
    }

    fn service(gateway: MockAuthenticationGateway, navigator: MockNavigator) -> RegistrationService {
        RegistrationService::new(Arc::new(gateway), Arc::new(navigator), Route::Login)
    }

    #[rstest]
    #[tokio::test]
    async fn valid_form_dispatches_wire_payload_and_navigates() {
        let mut gateway = MockAuthenticationGateway::new();
        gateway
            .expect_register()
            .withf(|payload| {
                payload.first_name() == "Ana"
                    && payload.last_name() == "Cruz"
                    && payload.email() == "ana@example.com"
                    && payload.password() == "secret1"
            })
            .times(1)
            .returning(|_| Ok(()));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq(Route::Login))
            .times(1)
            .return_const(());

        let mut form = form_with(["Ana", "Cruz", "ana@example.com", "secret1", "secret1"]);
        let outcome = service(gateway, navigator).submit(&mut form).await;

        assert_eq!(outcome, SubmissionOutcome::Navigated(Route::Login));
        assert_eq!(form.state(), SubmissionState::Navigated);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_form_never_reaches_the_gateway() {
        let mut gateway = MockAuthenticationGateway::new();
        gateway.expect_register().never();
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        let mut form = form_with(["", "Cruz", "bad", "123", "456"]);
        let outcome = service(gateway, navigator).submit(&mut form).await;

        let SubmissionOutcome::NotDispatched(SubmitRejection::Invalid(errors)) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(
            errors.fields(),
            vec![
                RegistrationField::FirstName,
                RegistrationField::Email,
                RegistrationField::Password,
                RegistrationField::ConfirmPassword,
            ]
        );
        assert_eq!(form.state(), SubmissionState::Editing);
    }

    #[rstest]
    #[tokio::test]
    async fn in_flight_form_is_not_dispatched_again() {
        let mut gateway = MockAuthenticationGateway::new();
        gateway.expect_register().never();
        let navigator = MockNavigator::new();

        let mut form = form_with(["Ana", "Cruz", "ana@example.com", "secret1", "secret1"]);
        form.begin_submission().expect("input is valid");
        let outcome = service(gateway, navigator).submit(&mut form).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::NotDispatched(SubmitRejection::InFlight)
        );
        assert_eq!(form.state(), SubmissionState::Submitting);
    }

    #[rstest]
    #[case(RegistrationGatewayError::transport("connection refused"))]
    #[case(RegistrationGatewayError::rejected(
        "A user with this email already exists.",
        RejectedFields::from([(
            RegistrationField::Email,
            "A user with this email already exists.".to_owned(),
        )]),
    ))]
    #[tokio::test]
    async fn gateway_failure_keeps_form_on_screen(#[case] error: RegistrationGatewayError) {
        let mut gateway = MockAuthenticationGateway::new();
        let returned = error.clone();
        gateway
            .expect_register()
            .times(1)
            .return_once(move |_| Err(returned));
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        let mut form = form_with(["Ana", "Cruz", "ana@example.com", "secret1", "secret1"]);
        let outcome = service(gateway, navigator).submit(&mut form).await;

        assert_eq!(outcome, SubmissionOutcome::Failed(error));
        assert_eq!(form.state(), SubmissionState::Editing);
        assert!(form.banner().is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn dispatch_runs_inside_a_trace_scope() {
        let mut gateway = MockAuthenticationGateway::new();
        gateway.expect_register().times(1).returning(|_| {
            if TraceId::current().is_some() {
                Ok(())
            } else {
                Err(RegistrationGatewayError::transport("no trace id in scope"))
            }
        });
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().times(1).return_const(());

        let mut form = form_with(["Ana", "Cruz", "ana@example.com", "secret1", "secret1"]);
        let outcome = service(gateway, navigator).submit(&mut form).await;

        assert_eq!(outcome, SubmissionOutcome::Navigated(Route::Login));
    }
}
