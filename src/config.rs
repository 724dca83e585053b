use std::env;

use serde::Deserialize;
use tracing::warn;

use crate::settings::TabVisibility;

const DEFAULT_FORM_URL: &str = "https://forms.gle/22PyvAxk8hAxGDTVA";
const DEFAULT_MAX_PHOTO_BYTES: usize = 4 * 1024 * 1024;
const DEFAULT_EXPORT_ROW_LIMIT: usize = 50_000;
const DEFAULT_AVATAR_URL: &str = "https://placehold.co/40x40.png";
const DEFAULT_AVATAR_HINT: &str = "person portrait";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Public form whose responses get exported to CSV and uploaded here.
    pub form_url: String,
    pub max_photo_bytes: usize,
    pub export_row_limit: usize,
    pub default_avatar_url: String,
    pub default_avatar_hint: String,
    pub tabs: TabVisibility,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            form_url: DEFAULT_FORM_URL.to_string(),
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
            export_row_limit: DEFAULT_EXPORT_ROW_LIMIT,
            default_avatar_url: DEFAULT_AVATAR_URL.to_string(),
            default_avatar_hint: DEFAULT_AVATAR_HINT.to_string(),
            tabs: TabVisibility::default(),
        }
    }
}

fn parse_size(name: &str, raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(%name, value = raw, "ignoring invalid size setting");
            None
        }
    }
}

impl DashboardConfig {
    /// Defaults overlaid with `CRM_FORM_URL`, `CRM_MAX_PHOTO_BYTES` and
    /// `CRM_EXPORT_ROW_LIMIT` when set.
    pub fn from_env() -> Self {
        Self::default().overlay(|name| env::var(name).ok())
    }

    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("CRM_FORM_URL").filter(|v| !v.trim().is_empty()) {
            self.form_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("CRM_MAX_PHOTO_BYTES") {
            if let Some(value) = parse_size("CRM_MAX_PHOTO_BYTES", &raw) {
                self.max_photo_bytes = value;
            }
        }
        if let Some(raw) = lookup("CRM_EXPORT_ROW_LIMIT") {
            if let Some(value) = parse_size("CRM_EXPORT_ROW_LIMIT", &raw) {
                self.export_row_limit = value;
            }
        }
        self
    }
}
