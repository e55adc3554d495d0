use std::{
    env,
    fs::{self, File},
    io::BufReader,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ClientError, result::ClientResultHelper};

/// Environment variable holding the path of the configuration file.
pub const PM_CLI_CONF_ENV: &str = "PM_CLI_CONF";

pub const DEFAULT_PARAMETER_MANAGER_URL: &str = "https://parametermanager.googleapis.com";

/// Returns the path to the current user's home folder.
///
/// `HOME` is checked first (Linux and macOS), then `USERPROFILE`, then
/// `HOMEDRIVE` + `HOMEPATH` (Windows).
fn get_home_folder() -> Option<PathBuf> {
    if let Some(home) = env::var_os("HOME") {
        return Some(PathBuf::from(home))
    } else if let Some(profile) = env::var_os("USERPROFILE") {
        return Some(PathBuf::from(profile))
    } else if let (Some(hdrive), Some(hpath)) = (env::var_os("HOMEDRIVE"), env::var_os("HOMEPATH"))
    {
        return Some(PathBuf::from(hdrive).join(hpath))
    }
    None
}

/// Returns the default configuration path
///  or an error if the path cannot be determined
fn get_default_conf_path() -> Result<PathBuf, ClientError> {
    get_home_folder()
        .ok_or_else(|| ClientError::NotSupported("unable to determine the home folder".to_owned()))
        .map(|home| home.join(".cosmian/pmctl.json"))
}

/// used for serialization
const fn not(b: &bool) -> bool {
    !*b
}

/// Client configuration.
///
/// Credentials are explicit: either a ready `access_token`, or the path of
/// a service account JSON key which is exchanged for an access token when
/// the client is instantiated.
///
/// ```json
/// {
///     "parameter_manager_url": "https://parametermanager.googleapis.com",
///     "service_account_key_path": "/path/to/service-account.json",
///     "timeout_secs": 30
/// }
/// ```
#[derive(Serialize, Deserialize, Eq, PartialEq, Debug, Clone)]
pub struct ClientConf {
    // accept_invalid_certs is only useful against a test endpoint
    // running an invalid or unsecure SSL certificate
    #[serde(default)]
    #[serde(skip_serializing_if = "not")]
    pub accept_invalid_certs: bool,
    pub parameter_manager_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_key_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConf {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            parameter_manager_url: DEFAULT_PARAMETER_MANAGER_URL.to_owned(),
            access_token: None,
            service_account_key_path: None,
            timeout_secs: None,
        }
    }
}

impl ClientConf {
    /// Obtain the configuration file path from:
    /// - the `--conf` arg
    /// - the environment variable corresponding to `PM_CLI_CONF_ENV`
    /// - default to `~/.cosmian/pmctl.json`
    pub fn location(conf: Option<PathBuf>) -> Result<PathBuf, ClientError> {
        if let Some(conf_path) = conf {
            if !conf_path.exists() {
                return Err(ClientError::Configuration(format!(
                    "Configuration file {conf_path:?} from CLI arg does not exist"
                )))
            }
            return Ok(conf_path)
        } else if let Ok(conf_path) = env::var(PM_CLI_CONF_ENV).map(PathBuf::from) {
            if !conf_path.exists() {
                return Err(ClientError::Configuration(format!(
                    "Configuration file {conf_path:?} specified in {PM_CLI_CONF_ENV} environment \
                     variable does not exist"
                )))
            }
            return Ok(conf_path)
        }

        let user_conf_path = get_default_conf_path()?;
        if !user_conf_path.exists() {
            info!(
                "Configuration path is at: {user_conf_path:?} and will be initialized with a \
                 default value"
            );
        }
        Ok(user_conf_path)
    }

    pub fn save(&self, conf_path: &PathBuf) -> Result<(), ClientError> {
        fs::write(
            conf_path,
            serde_json::to_string_pretty(&self)
                .with_context(|| format!("Unable to serialize configuration {self:?}"))?,
        )
        .with_context(|| format!("Unable to write configuration to file {conf_path:?}"))?;

        Ok(())
    }

    pub fn load(conf_path: &PathBuf) -> Result<Self, ClientError> {
        let conf = if conf_path.exists() {
            let file = File::open(conf_path)
                .with_context(|| format!("Unable to read configuration file {conf_path:?}"))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Error while parsing configuration file {conf_path:?}"))?
        } else {
            let parent = conf_path
                .parent()
                .with_context(|| format!("Unable to get parent directory of {conf_path:?}"))?;
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create directory for configuration file {parent:?}")
            })?;

            let default_conf = Self::default();
            default_conf.save(conf_path)?;
            default_conf
        };

        Ok(conf)
    }
}
