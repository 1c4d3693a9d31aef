use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Third-party API endpoints and server-side keys.
    pub upstream: UpstreamConfig,
}

/// Endpoints and credentials for the proxied third-party services.
///
/// The AQI and weather keys stay server-side so they never reach the
/// browser. The Gemini key is NOT configured here: each suggestion request
/// carries the user's own key.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// MOENV air-quality dataset endpoint.
    pub aqi_api_url: String,
    /// MOENV API key. `None` leaves the AQI endpoints unconfigured (500).
    pub aqi_api_key: Option<String>,
    /// CWA 36-hour forecast dataset endpoint.
    pub weather_api_url: String,
    /// CWA API key. `None` leaves the weather endpoint unconfigured (500).
    pub weather_api_key: Option<String>,
    /// Gemini API base URL.
    pub gemini_api_url: String,
    /// Gemini model name.
    pub gemini_model: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                                   |
    /// |------------------------|-----------------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                                 |
    /// | `PORT`                 | `5000`                                                    |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                                   |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                                      |
    /// | `AQI_API_URL`          | `https://data.moenv.gov.tw/api/v2/aqx_p_432`              |
    /// | `AQI_API_KEY`          | unset                                                     |
    /// | `WEATHER_API_URL`      | `https://opendata.cwa.gov.tw/api/v1/rest/datastore/F-C0032-001` |
    /// | `WEATHER_API_KEY`      | unset                                                     |
    /// | `GEMINI_API_URL`       | `https://generativelanguage.googleapis.com`               |
    /// | `GEMINI_MODEL`         | `gemini-2.0-flash`                                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let upstream = UpstreamConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            upstream,
        }
    }
}

impl UpstreamConfig {
    /// Load upstream endpoints and keys from environment variables.
    pub fn from_env() -> Self {
        let aqi_api_url = std::env::var("AQI_API_URL")
            .unwrap_or_else(|_| "https://data.moenv.gov.tw/api/v2/aqx_p_432".into());
        let aqi_api_key = std::env::var("AQI_API_KEY").ok().filter(|k| !k.is_empty());

        let weather_api_url = std::env::var("WEATHER_API_URL").unwrap_or_else(|_| {
            "https://opendata.cwa.gov.tw/api/v1/rest/datastore/F-C0032-001".into()
        });
        let weather_api_key = std::env::var("WEATHER_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let gemini_api_url = std::env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| breezy_gemini::DEFAULT_GEMINI_API_URL.into());
        let gemini_model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| breezy_gemini::DEFAULT_GEMINI_MODEL.into());

        Self {
            aqi_api_url,
            aqi_api_key,
            weather_api_url,
            weather_api_key,
            gemini_api_url,
            gemini_model,
        }
    }
}
