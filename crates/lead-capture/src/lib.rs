pub mod config;
pub mod email_client;
pub mod error;
pub mod form;
pub mod leads;
pub mod telemetry;
