use std::env;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bucket: String,
    /// Overrides the region from the AWS credential chain.
    pub region: Option<String>,
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. `CAREBILL_JWT_SECRET` is the only
    /// required variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("CAREBILL_JWT_SECRET")
            .ok_or_else(|| eyre::eyre!("CAREBILL_JWT_SECRET must be set"))?;

        Ok(Self {
            bucket: non_empty("CAREBILL_BUCKET").unwrap_or_else(|| "carebill".to_string()),
            region: non_empty("AWS_REGION"),
            jwt_secret,
            jwt_issuer: non_empty("CAREBILL_JWT_ISSUER").unwrap_or_else(|| "carebill".to_string()),
        })
    }
}
