//! Application configuration.

use clap::{Args, Parser};
use rust_decimal::Decimal;

/// Coursepay application configuration.
#[derive(Debug, Parser)]
#[command(name = "coursepay", about = "Coursepay checkout services", long_about = None)]
pub struct AppConfig {
    /// External service endpoints.
    #[command(flatten)]
    pub services: ServiceEndpoints,

    /// Checkout pricing settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,

    /// Refund policy settings.
    #[command(flatten)]
    pub refunds: RefundConfig,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed.
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Base URLs of the marketplace's external services.
#[derive(Debug, Args)]
pub struct ServiceEndpoints {
    /// Pricing service base URL
    #[arg(long, env = "PRICING_API_URL", default_value = "http://localhost:8700")]
    pub pricing_api_url: String,

    /// Payments service base URL
    #[arg(long, env = "PAYMENTS_API_URL", default_value = "http://localhost:8701")]
    pub payments_api_url: String,
}

/// Checkout pricing settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Fractional VAT rate applied to the discounted subtotal
    #[arg(long, env = "VAT_RATE", default_value = "0.2")]
    pub vat_rate: Decimal,

    /// Quiet period before a typed discount code is validated, in milliseconds
    #[arg(long, env = "DISCOUNT_DEBOUNCE_MS", default_value = "300")]
    pub discount_debounce_ms: u64,
}

/// Refund policy settings.
#[derive(Debug, Args)]
pub struct RefundConfig {
    /// Days after payment completion during which a refund may be requested
    #[arg(long, env = "REFUND_WINDOW_DAYS", default_value = "3")]
    pub window_days: i64,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_without_arguments() -> TestResult {
        let config = AppConfig::try_parse_from(["coursepay"])?;

        assert_eq!(config.checkout.vat_rate, "0.2".parse()?);
        assert_eq!(config.checkout.discount_debounce_ms, 300);
        assert_eq!(config.refunds.window_days, 3);

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = AppConfig::try_parse_from([
            "coursepay",
            "--vat-rate",
            "0.1",
            "--window-days",
            "14",
        ])?;

        assert_eq!(config.checkout.vat_rate, "0.1".parse()?);
        assert_eq!(config.refunds.window_days, 14);

        Ok(())
    }
}
