use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pricing::Tariff;

/// Configuration for the reservation desk.
///
/// This struct holds the static data the lodge publishes: its name, how to
/// reach it and its price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The name shown in the header of reservation messages.
    lodge_name: String,

    /// Where reservation messages and enquiries are sent.
    pub contact: Contact,

    /// Nightly rates, fees and the extras billing policy.
    pub tariff: Tariff,
}

/// How guests reach the lodge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// WhatsApp number in international format, digits only.
    pub whatsapp_phone: String,

    /// Message pre-filled when a guest opens a general enquiry.
    pub greeting: String,

    /// Instagram handle, without the `@`.
    pub instagram: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            whatsapp_phone: "5579998807035".to_string(),
            greeting: "Olá, gostaria de mais informações sobre o Eco Parque Lagoa Grande"
                .to_string(),
            instagram: "ecoparquelagoagrande".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lodge_name: default_lodge_name(),
            contact: Contact::default(),
            tariff: Tariff::default(),
        }
    }
}

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// The lodge's name.
    #[must_use]
    pub fn lodge_name(&self) -> &str {
        &self.lodge_name
    }

    /// Sets the lodge's name.
    ///
    /// Blank names are ignored so that messages always carry a header.
    pub fn set_lodge_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !name.trim().is_empty() {
            self.lodge_name = name;
        }
    }

    /// The header line of outbound reservation messages.
    #[must_use]
    pub fn message_header(&self) -> String {
        format!("*NOVA RESERVA - {}*", self.lodge_name)
    }
}

fn default_lodge_name() -> String {
    "Eco Parque Lagoa Grande".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_lodge_name")]
        lodge_name: String,

        #[serde(default)]
        contact: Contact,

        #[serde(default)]
        tariff: Tariff,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                lodge_name,
                contact,
                tariff,
            } => Self {
                lodge_name,
                contact,
                tariff,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            lodge_name: config.lodge_name,
            contact: config.contact,
            tariff: config.tariff,
        }
    }
}
