//! Row types and configuration keys.

use std::fmt;

/// Runtime settings stored in the `configurations` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationKey {
    /// Desktop app version the access gate accepts.
    DesktopAppVersion,
    /// How long the access gate waits for a login.
    LoginTimeoutSeconds,
    /// Value handed to an unlocked desktop app.
    OfflineLogins,
    /// Identity subject granted the admin role.
    AdminIdentifier,
}

impl ConfigurationKey {
    pub const ALL: [ConfigurationKey; 4] = [
        ConfigurationKey::DesktopAppVersion,
        ConfigurationKey::LoginTimeoutSeconds,
        ConfigurationKey::OfflineLogins,
        ConfigurationKey::AdminIdentifier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigurationKey::DesktopAppVersion => "DesktopAppVersion",
            ConfigurationKey::LoginTimeoutSeconds => "LoginTimeoutSeconds",
            ConfigurationKey::OfflineLogins => "OfflineLogins",
            ConfigurationKey::AdminIdentifier => "AdminIdentifier",
        }
    }

    /// Value seeded into a fresh database.
    pub fn default_value(self) -> &'static str {
        match self {
            ConfigurationKey::DesktopAppVersion => "1.0",
            ConfigurationKey::LoginTimeoutSeconds => "60",
            ConfigurationKey::OfflineLogins => "3",
            ConfigurationKey::AdminIdentifier => "",
        }
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub google_id: String,
    pub email: String,
    pub name: Option<String>,
    /// Unix millis of the most recent login.
    pub last_login: i64,
    pub app_version: Option<String>,
    pub ip: Option<String>,
    pub os: Option<String>,
    pub language: Option<String>,
    pub created_at: i64,
}

/// Fields written on every login.
#[derive(Debug, Clone, Default)]
pub struct UserLogin {
    pub google_id: String,
    pub email: String,
    pub name: Option<String>,
    pub ip: Option<String>,
    pub os: Option<String>,
    pub language: Option<String>,
}

/// An access code grant, optionally bound to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub id: i64,
    pub code: String,
    pub user_id: Option<i64>,
    /// Unix millis after which the grant is removed.
    pub expires_at: i64,
}
