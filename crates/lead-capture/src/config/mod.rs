use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub email: EmailConfig,
    pub leads: LeadConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_key = env::var("RESEND_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() && environment == AppEnvironment::Production {
            return Err(ConfigError::MissingApiKey);
        }

        let timeout_ms = env::var("EMAIL_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let email = EmailConfig {
            api_base_url: env::var("EMAIL_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            api_key,
            sender: env::var("EMAIL_SENDER").unwrap_or_else(|_| {
                "Powering Forwards <reports@electrifysouthland.nz>".to_string()
            }),
            notification_recipient: env::var("LEAD_NOTIFICATION_EMAIL")
                .unwrap_or_else(|_| "nathan@schema.nz".to_string()),
            timeout: Duration::from_millis(timeout_ms),
        };

        let leads = LeadConfig {
            calculator_url: env::var("CALCULATOR_URL")
                .unwrap_or_else(|_| "https://farmcalc.electrifysouthland.nz".to_string()),
            report_path: env::var("REPORT_PATH")
                .unwrap_or_else(|_| "/powering-forwards-report.pdf".to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            email,
            leads,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Outbound email delivery settings.
#[derive(Clone)]
pub struct EmailConfig {
    pub api_base_url: String,
    pub api_key: String,
    /// `From` header for both lead emails.
    pub sender: String,
    /// Internal sales inbox that receives new lead notifications.
    pub notification_recipient: String,
    pub timeout: Duration,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"[redacted]")
            .field("sender", &self.sender)
            .field("notification_recipient", &self.notification_recipient)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Links rendered into lead emails and used by the form controller.
#[derive(Debug, Clone)]
pub struct LeadConfig {
    pub calculator_url: String,
    pub report_path: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "EMAIL_TIMEOUT_MS must be a whole number of milliseconds")
            }
            ConfigError::MissingApiKey => {
                write!(f, "RESEND_API_KEY must be set in production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::MissingApiKey => None,
        }
    }
}
