use config::{Config, Environment, File, Map};
use harden_domain::constants::ENV_PREFIX;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Custom error type for config loading.
#[harden_derive::harden_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Defaults**: every field missing from all sources keeps its `serde(default)` value.
/// 2. **Config File**: when `path` is given, the file is loaded and must exist. The format
///    (TOML, JSON, YAML) is picked from the extension.
/// 3. **Environment Overrides**: values from variables prefixed with `HARDEN__` win.
///    Nested structures are accessed using double underscores (e.g., `HARDEN__LIST__BOUND`
///    maps to `list.bound`).
///
/// # Errors
/// This function will return an error if:
/// * The specified configuration file cannot be found or parsed.
/// * The merged sources do not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use harden_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     bound: u32,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

/// Same as [`load_config`], but reads overrides from `vars` instead of the process
/// environment. Keys use the same `HARDEN__SECTION__FIELD` form.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    vars: Map<String, String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, Some(vars))
}

fn load_layered<T>(
    path: Option<impl AsRef<Path>>,
    vars: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        let path = path.as_ref();
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    } else {
        debug!("No config file given, using defaults and environment");
    }

    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(vars),
    );

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
