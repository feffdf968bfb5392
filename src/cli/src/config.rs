//! Global flags and their normalization into a [`Settings`] snapshot.
//!
//! Flags are parsed by clap (with `GOBII_*` environment fallbacks) and then
//! normalized exactly once, before any command body runs.

use clap::Args;
use thiserror::Error;
use url::Url;

use crate::output::{LoggingOptions, OutputType};

pub const DEFAULT_API_URL: &str = "https://getgobii.com/api/v1/";
pub const MAX_WAIT_SECS: i64 = 900;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API Key must be set via --api-key or GOBII_API_KEY environment variable")]
    MissingApiKey,

    #[error("Invalid format: \"{0}\". Must be one of: text, json.")]
    InvalidFormat(String),

    #[error("Invalid wait: {0}. Must be between 0 and {max} seconds.", max = MAX_WAIT_SECS)]
    InvalidWait(i64),

    #[error("Invalid API URL \"{url}\": {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Flags that apply to every command.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// API key
    #[arg(short, long, global = true, env = "GOBII_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "GOBII_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Enable verbose logging. Not recommended with JSON output, as it will break JSON validation.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except the final result. Verbose output is still printed with --verbose.
    #[arg(short, long, global = true)]
    pub silent: bool,

    /// Output format: text or json. In JSON mode, --silent is implied.
    #[arg(short, long, global = true, default_value = "text")]
    pub format: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Immutable configuration derived from [`GlobalArgs`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_url: Url,
    pub logging: LoggingOptions,
    pub output_type: OutputType,
    pub color: bool,
}

impl Settings {
    /// Resolve the API key, validate the format and apply the JSON => silent cascade.
    pub fn from_args(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        let output_type: OutputType = args.format.parse()?;
        let json = output_type == OutputType::Json;

        Ok(Self {
            api_key,
            api_url: parse_api_url(&args.api_url)?,
            logging: LoggingOptions {
                verbose: args.verbose,
                silent: args.silent || json,
            },
            output_type,
            color: !args.no_color && !json,
        })
    }
}

/// Parse the base URL, appending a trailing `/` so endpoints join beneath it.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    Url::parse(&normalized).map_err(|source| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        source,
    })
}

/// Check a `--wait` value against the server's accepted range.
pub fn validate_wait(wait: i64) -> Result<u32, ConfigError> {
    if (0..=MAX_WAIT_SECS).contains(&wait) {
        Ok(wait as u32)
    } else {
        Err(ConfigError::InvalidWait(wait))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GlobalArgs {
        GlobalArgs {
            api_key: Some("test-key".into()),
            api_url: DEFAULT_API_URL.into(),
            verbose: false,
            silent: false,
            format: "text".into(),
            no_color: false,
        }
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let mut a = args();
        a.api_key = None;
        let err = Settings::from_args(&a).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("API Key must be set"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut a = args();
        a.api_key = Some(String::new());
        assert!(matches!(
            Settings::from_args(&a),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn api_key_is_checked_before_format() {
        let mut a = args();
        a.api_key = None;
        a.format = "banana".into();
        assert!(matches!(
            Settings::from_args(&a),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn invalid_format_is_rejected() {
        let mut a = args();
        a.format = "banana".into();
        let err = Settings::from_args(&a).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid format: \"banana\". Must be one of: text, json."
        );
    }

    #[test]
    fn json_format_forces_silent() {
        let mut a = args();
        a.format = "json".into();
        let settings = Settings::from_args(&a).unwrap();
        assert_eq!(settings.output_type, OutputType::Json);
        assert!(settings.logging.silent);
        assert!(!settings.color);
    }

    #[test]
    fn text_format_keeps_flags() {
        let mut a = args();
        a.verbose = true;
        let settings = Settings::from_args(&a).unwrap();
        assert!(settings.logging.verbose);
        assert!(!settings.logging.silent);
        assert!(settings.color);
    }

    #[test]
    fn api_url_gets_trailing_slash() {
        let url = parse_api_url("http://127.0.0.1:8080/api/v1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/v1/");
        assert_eq!(
            url.join("agents/browser-use").unwrap().as_str(),
            "http://127.0.0.1:8080/api/v1/agents/browser-use"
        );
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        assert!(matches!(
            parse_api_url("not a url"),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn wait_bounds() {
        assert_eq!(validate_wait(0).unwrap(), 0);
        assert_eq!(validate_wait(900).unwrap(), 900);
        assert!(matches!(validate_wait(-1), Err(ConfigError::InvalidWait(-1))));
        assert!(matches!(
            validate_wait(901),
            Err(ConfigError::InvalidWait(901))
        ));
    }
}
