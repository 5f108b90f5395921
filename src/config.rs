use std::env;

/// AppConfig
///
/// Holds the console's entire configuration state. Loaded once at startup and
/// immutable afterwards; handlers pull it out of the shared state via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local `x-user-id` bypass and log format.
    pub env: Env,
    // Build flavour of the console. Production builds hide unfinished pages (e.g. /audit).
    pub build: BuildMode,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Base URL of the platform API. `None` selects the in-memory backend (local only).
    pub backend_url: Option<String>,
    // Service token used for process-wide calls such as the entitlements refresh.
    pub service_token: Option<String>,
    // Secret key used to validate incoming session JWTs.
    pub jwt_secret: String,
    // Interval between two entitlement refreshes.
    pub entitlements_refresh_secs: u64,
}

/// Env
///
/// Defines the runtime context, used to switch between development utilities
/// (bypass header, in-memory backend) and the hardened production setup.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// BuildMode
///
/// The console's build flavour, the equivalent of a front-end bundle built for
/// development or for production. It shapes the route table itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        self == BuildMode::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }
}

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_REFRESH_SECS: u64 = 60;

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for tests: local env, development build,
    /// in-memory backend.
    fn default() -> Self {
        Self {
            env: Env::Local,
            build: BuildMode::Development,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            backend_url: None,
            service_token: None,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            entitlements_refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables and fails fast.
    ///
    /// # Panics
    /// Panics if a variable required for the current environment is missing
    /// (`CONSOLE_JWT_SECRET` and `CODER_URL` in production), or if
    /// `ENTITLEMENTS_REFRESH_SECS` is not a positive integer.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        // The build flavour follows the environment unless set explicitly.
        let build = match env::var("APP_BUILD").as_deref() {
            Ok("production") => BuildMode::Production,
            Ok("development") => BuildMode::Development,
            _ if env == Env::Production => BuildMode::Production,
            _ => BuildMode::Development,
        };

        let jwt_secret = match env {
            Env::Production => env::var("CONSOLE_JWT_SECRET")
                .expect("FATAL: CONSOLE_JWT_SECRET must be set in production."),
            Env::Local => {
                env::var("CONSOLE_JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string())
            }
        };

        let backend_url = match env {
            Env::Production => Some(
                env::var("CODER_URL").expect("FATAL: CODER_URL required in production"),
            ),
            Env::Local => env::var("CODER_URL").ok(),
        }
        .map(|url| url.trim_end_matches('/').to_string());

        let entitlements_refresh_secs = match env::var("ENTITLEMENTS_REFRESH_SECS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => panic!("FATAL: ENTITLEMENTS_REFRESH_SECS must be a positive integer"),
            },
            Err(_) => DEFAULT_REFRESH_SECS,
        };

        Self {
            env,
            build,
            bind_addr: env::var("CONSOLE_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            backend_url,
            service_token: env::var("CODER_SESSION_TOKEN").ok(),
            jwt_secret,
            entitlements_refresh_secs,
        }
    }
}
