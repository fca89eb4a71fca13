use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use color_eyre::eyre::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_PATH: &str = "database.db";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlDatabase {
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlUploads {
    path: Option<String>,
    max_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlConfig {
    pub address: Option<String>,
    pub port: Option<u16>,
    #[serde(rename = "Database")]
    pub database: Option<TomlDatabase>,
    #[serde(rename = "Uploads")]
    pub uploads: Option<TomlUploads>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    /// Request body limit in bytes, unlimited if None
    pub max_upload_size: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: DEFAULT_ADDRESS.to_owned(),
            port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE_PATH.into(),
            upload_dir: DEFAULT_UPLOAD_DIR.into(),
            max_upload_size: None,
        }
    }
}

impl Config {
    /// Applies the `PORT` environment variable on top of the configured port.
    pub fn with_port_from_env(self, port_var: Option<String>) -> Result<Config> {
        match port_var {
            None => Ok(self),
            Some(port) => {
                let port = port
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("invalid PORT '{}'", port))?;
                Ok(Config { port, ..self })
            }
        }
    }
}

/// Reads a config file. Relative paths in it are resolved against the
/// directory containing the file.
pub async fn read_config(path: &Path) -> Result<Config> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .context(format!("Error reading config file {}", path))?;
    let config_dir = path.parent().unwrap_or(Path::new("."));
    parse_config(&toml_str, config_dir)
}

fn parse_config(toml_str: &str, config_dir: &Path) -> Result<Config> {
    let toml_config: TomlConfig = toml::from_str(toml_str).context("Error parsing config file")?;
    let defaults = Config::default();
    let relative_to_config = |p: &str| -> PathBuf {
        let p = PathBuf::from(p);
        if p.is_absolute() {
            p
        } else {
            config_dir.join(p)
        }
    };
    let database_path = match toml_config.database {
        Some(db) => relative_to_config(&db.path),
        None => defaults.database_path,
    };
    let (upload_dir, max_upload_size) = match toml_config.uploads {
        Some(uploads) => {
            let dir = match uploads.path {
                Some(p) => relative_to_config(&p),
                None => defaults.upload_dir,
            };
            let max_size = uploads
                .max_size
                .map(|s| {
                    parse_size::parse_size(&s)
                        .wrap_err_with(|| format!("invalid Uploads.max_size '{}'", s))
                })
                .transpose()?;
            (dir, max_size)
        }
        None => (defaults.upload_dir, None),
    };
    Ok(Config {
        address: toml_config.address.unwrap_or(defaults.address),
        port: toml_config.port.unwrap_or(defaults.port),
        database_path,
        upload_dir,
        max_upload_size,
    })
}
