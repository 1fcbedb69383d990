use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::{DownloadedReport, FormBackend, FormError, REPORT_FILE_NAME};
use crate::leads::{LeadRequest, LEAD_ROUTE};

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Talks to the lead endpoint and the site hosting the report PDF.
#[derive(Debug, Clone)]
pub struct HttpFormBackend {
    http_client: reqwest::Client,
    api_base_url: String,
    report_url: String,
    output_dir: PathBuf,
}

impl HttpFormBackend {
    pub fn new(
        api_base_url: &str,
        site_base_url: &str,
        report_path: &str,
        output_dir: PathBuf,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        let report_url = format!(
            "{}/{}",
            site_base_url.trim_end_matches('/'),
            report_path.trim_start_matches('/')
        );

        Ok(Self {
            http_client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            report_url,
            output_dir,
        })
    }

    pub fn report_url(&self) -> &str {
        &self.report_url
    }
}

impl FormBackend for HttpFormBackend {
    #[tracing::instrument(name = "Submitting report lead", skip(self, request))]
    async fn submit_lead(&self, request: &LeadRequest) -> Result<(), FormError> {
        let response = self
            .http_client
            .post(format!("{}{}", self.api_base_url, LEAD_ROUTE))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error);
        Err(FormError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    #[tracing::instrument(name = "Downloading report", skip(self), fields(url = %self.report_url))]
    async fn download_report(&self) -> Result<DownloadedReport, FormError> {
        let response = self
            .http_client
            .get(&self.report_url)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let is_pdf = content_type
            .parse::<mime::Mime>()
            .map(|parsed| parsed.essence_str() == mime::APPLICATION_PDF.essence_str())
            .unwrap_or(false);
        if !is_pdf {
            return Err(FormError::NotPdf { content_type });
        }

        let bytes = response.bytes().await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(REPORT_FILE_NAME);
        tokio::fs::write(&path, &bytes).await?;

        Ok(DownloadedReport {
            path,
            bytes: bytes.len() as u64,
        })
    }
}
