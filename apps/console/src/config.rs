use std::{collections::HashMap, fs};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub service_url: Option<String>,
    pub owner_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: None,
            owner_id: "console-user".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("composer.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("service_url") {
                settings.service_url = Some(v.clone());
            }
            if let Some(v) = file_cfg.get("owner_id") {
                settings.owner_id = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("COMPOSER_SERVICE_URL") {
        settings.service_url = Some(v);
    }
    if let Ok(v) = std::env::var("APP__SERVICE_URL") {
        settings.service_url = Some(v);
    }

    if let Ok(v) = std::env::var("COMPOSER_OWNER_ID") {
        settings.owner_id = v;
    }
    if let Ok(v) = std::env::var("APP__OWNER_ID") {
        settings.owner_id = v;
    }

    settings
}

/// Accepts bare hosts and trailing slashes; the repository appends paths.
pub fn normalize_service_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');

    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.contains("://") {
        return trimmed.to_string();
    }

    format!("http://{trimmed}")
}
