use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::Product;

const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_CHROME_PATH: &str = "/usr/bin/chromium-browser";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn default_check_interval() -> u64 {
    300
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub email: EmailSettings,

    #[serde(default)]
    pub products: Vec<Product>,

    /// Seconds between continuous-mode check cycles.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headless browser executable override.
    #[serde(default)]
    pub chrome_path: Option<String>,

    /// Always sourced from the environment, never from the config file.
    #[serde(skip)]
    pub telegram: TelegramSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub recipient_email: Option<String>,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            sender_email: None,
            sender_password: None,
            recipient_email: None,
        }
    }
}

impl EmailSettings {
    pub fn is_complete(&self) -> bool {
        self.sender_email.is_some() && self.sender_password.is_some() && self.recipient_email.is_some()
    }

    fn from_env() -> Result<Self, ConfigError> {
        let smtp_port = match env::var("SMTP_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Message(format!("invalid SMTP_PORT: {raw}")))?,
            Err(_) => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            smtp_server: env::var("SMTP_SERVER").unwrap_or_else(|_| DEFAULT_SMTP_SERVER.to_string()),
            smtp_port,
            sender_email: env::var("SENDER_EMAIL").ok(),
            sender_password: env::var("SENDER_PASSWORD").ok(),
            recipient_email: env::var("RECIPIENT_EMAIL").ok(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TelegramSettings {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl TelegramSettings {
    pub fn from_env() -> Self {
        Self {
            bot_token: env::var("TELEGRAM_BOT_TOKEN").ok().filter(|v| !v.is_empty()),
            chat_id: env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Both the bot token and the chat id are required; anything less
    /// disables the channel without being an error.
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, or entirely from environment
    /// variables when the file does not exist (with the product list
    /// serialized under PRODUCTS_JSON).
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config = if Path::new(path).exists() {
            Config::builder()
                .add_source(File::from(Path::new(path)))
                .build()?
                .try_deserialize::<AppConfig>()?
        } else {
            Self::from_env()?
        };

        config.telegram = TelegramSettings::from_env();
        if config.chrome_path.is_none() {
            config.chrome_path = env::var("CHROME_BIN").ok();
        }

        config.validate()?;
        Ok(config)
    }

    fn from_env() -> Result<Self, ConfigError> {
        let products = match env::var("PRODUCTS_JSON") {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| ConfigError::Message(format!("invalid PRODUCTS_JSON: {e}")))?,
            Err(_) => Vec::new(),
        };

        let check_interval = match env::var("CHECK_INTERVAL") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Message(format!("invalid CHECK_INTERVAL: {raw}")))?,
            Err(_) => default_check_interval(),
        };

        Ok(Self {
            email: EmailSettings::from_env()?,
            products,
            check_interval,
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| default_user_agent()),
            chrome_path: None,
            telegram: TelegramSettings::default(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval == 0 {
            return Err(ConfigError::Message(
                "check_interval must be greater than 0".into(),
            ));
        }

        for product in &self.products {
            if product.name.trim().is_empty() {
                return Err(ConfigError::Message("every product needs a non-empty name".into()));
            }
            if Url::parse(&product.url).is_err() {
                return Err(ConfigError::Message(format!(
                    "invalid URL for product '{}': {}",
                    product.name, product.url
                )));
            }
        }

        Ok(())
    }

    /// The browser executable to launch, when one can be resolved on this
    /// host. `None` lets the browser library locate an installation itself.
    pub fn chrome_binary(&self) -> Option<PathBuf> {
        let candidate = self
            .chrome_path
            .clone()
            .unwrap_or_else(|| DEFAULT_CHROME_PATH.to_string());
        let path = PathBuf::from(candidate);
        path.exists().then_some(path)
    }

    /// SINGLE_CHECK=true selects the one-pass mode.
    pub fn single_check_requested() -> bool {
        env::var("SINGLE_CHECK").is_ok_and(|v| v.eq_ignore_ascii_case("true"))
    }
}
