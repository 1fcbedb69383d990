use clap::Args;
use lead_capture::config::TelemetryConfig;
use lead_capture::error::AppError;
use lead_capture::form::{FormError, FormField, HttpFormBackend, LeadFormController};
use lead_capture::telemetry;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Full name (at least 2 characters)
    #[arg(long)]
    pub(crate) name: String,
    /// Email address the confirmation is sent to
    #[arg(long)]
    pub(crate) email: String,
    /// Optional phone number
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// Farm type code (dairy or sheepBeef)
    #[arg(long)]
    pub(crate) farm_type: Option<String>,
    /// Region (Southland, Otago, Canterbury, West Coast)
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Installation timeline code (next-month, next-3-months, next-6-months, next-year, interested)
    #[arg(long)]
    pub(crate) timeline: Option<String>,
    /// Base URL of the lead capture service
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    pub(crate) api_url: String,
    /// Base URL of the site hosting the report PDF (defaults to --api-url)
    #[arg(long)]
    pub(crate) site_url: Option<String>,
    /// Path of the report PDF on the site
    #[arg(long, default_value = "/powering-forwards-report.pdf")]
    pub(crate) report_path: String,
    /// Directory the downloaded report is written to
    #[arg(long, default_value = ".")]
    pub(crate) output_dir: PathBuf,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub(crate) timeout_secs: u64,
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    telemetry::init(&TelemetryConfig {
        log_level: "warn".to_string(),
    })?;

    let SubmitArgs {
        name,
        email,
        phone,
        farm_type,
        region,
        timeline,
        api_url,
        site_url,
        report_path,
        output_dir,
        timeout_secs,
    } = args;

    let site_url = site_url.unwrap_or_else(|| api_url.clone());
    let backend = HttpFormBackend::new(
        &api_url,
        &site_url,
        &report_path,
        output_dir,
        Duration::from_secs(timeout_secs),
    )
    .map_err(FormError::from)?;

    let mut controller = LeadFormController::new(backend);
    controller.set(FormField::Name, name);
    controller.set(FormField::Email, email);
    let optional = [
        (FormField::Phone, phone),
        (FormField::FarmType, farm_type),
        (FormField::Region, region),
        (FormField::Timeline, timeline),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            controller.set(field, value);
        }
    }

    match controller.submit().await {
        Ok(report) => {
            println!("Report downloaded!");
            println!(
                "Saved {} ({} bytes). Check your inbox for details about next steps.",
                report.path.display(),
                report.bytes
            );
            Ok(())
        }
        Err(err) => {
            if let Some(message) = controller.error() {
                println!("{message}");
            } else if controller.submitted() {
                println!("Your details were received but the report could not be downloaded.");
            }
            Err(err.into())
        }
    }
}
