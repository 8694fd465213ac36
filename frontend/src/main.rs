//! Command-line driver that submits one registration.
//!
//! Field values come from flags, endpoint settings from `AFFITNITY_*`
//! environment variables. `--dry-run` swaps the HTTP gateway for the
//! in-memory fixture.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Report, Result, eyre};
use frontend::domain::ports::{AuthenticationGateway, FixtureAuthenticationGateway};
use frontend::domain::{RegistrationField, RegistrationForm, RegistrationService, SubmissionOutcome};
use frontend::outbound::{AuthApiHttpGateway, TracingNavigator};
use frontend::settings::FrontendSettings;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `frontend` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "frontend",
    about = "Validate and submit one Affitnity registration",
    version
)]
struct CliArgs {
    /// Given name.
    #[arg(long, default_value = "")]
    first_name: String,
    /// Family name.
    #[arg(long, default_value = "")]
    last_name: String,
    /// Account email address.
    #[arg(long, default_value = "")]
    email: String,
    /// Account password.
    #[arg(long, default_value = "")]
    password: String,
    /// Password confirmation.
    #[arg(long, default_value = "")]
    confirm_password: String,
    /// Register against the in-memory fixture instead of the API.
    #[arg(long)]
    dry_run: bool,
}

impl CliArgs {
    fn values(&self) -> [(RegistrationField, &str); 5] {
        [
            (RegistrationField::FirstName, self.first_name.as_str()),
            (RegistrationField::LastName, self.last_name.as_str()),
            (RegistrationField::Email, self.email.as_str()),
            (RegistrationField::Password, self.password.as_str()),
            (RegistrationField::ConfirmPassword, self.confirm_password.as_str()),
        ]
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = FrontendSettings::load_from_iter([OsString::from("frontend")])
        .map_err(|error| eyre!("failed to load settings: {error}"))?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build registration runtime")?;
    runtime.block_on(submit(&args, &settings))
}

async fn submit(args: &CliArgs, settings: &FrontendSettings) -> Result<()> {
    let gateway = build_gateway(args.dry_run, settings)?;
    let navigator = Arc::new(TracingNavigator::default());
    let service = RegistrationService::new(
        gateway,
        navigator.clone(),
        settings.post_registration_route()?,
    );

    let mut form = RegistrationForm::new();
    for (field, value) in args.values() {
        form.update_field(field, value)?;
    }

    match service.submit(&mut form).await {
        SubmissionOutcome::Navigated(route) => {
            info!(route = %route, current = ?navigator.current(), "registration complete");
            Ok(())
        }
        SubmissionOutcome::NotDispatched(rejection) => {
            log_field_errors(&form);
            Err(eyre!("registration not submitted: {rejection}"))
        }
        SubmissionOutcome::Failed(error) => {
            log_field_errors(&form);
            let banner = form.banner().unwrap_or_default().to_owned();
            Err(Report::new(error).wrap_err(banner))
        }
    }
}

fn log_field_errors(form: &RegistrationForm) {
    for (field, message) in form.errors() {
        warn!(field = field.form_name(), message = %message, "field error");
    }
}

fn build_gateway(
    dry_run: bool,
    settings: &FrontendSettings,
) -> Result<Arc<dyn AuthenticationGateway>> {
    if dry_run {
        info!("using in-memory authentication gateway");
        return Ok(Arc::new(FixtureAuthenticationGateway::default()));
    }
    let base_url = settings.auth_base_url()?;
    let gateway = AuthApiHttpGateway::new(&base_url, settings.request_timeout()?)?;
    info!(endpoint = %gateway.register_url(), "using authentication API");
    Ok(Arc::new(gateway))
}
