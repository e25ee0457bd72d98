use crate::model::ColorToken;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub axis_color: String,
    pub chip_background: String,
    pub chip_border: String,
    pub cell_empty: String,
    pub cell_filled: String,
    pub today_color: String,
    pub highlight_ring: String,
    pub accent_sky: String,
    pub accent_emerald: String,
    pub accent_amber: String,
    pub accent_rose: String,
    pub accent_violet: String,
}

impl Theme {
    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#7A8AA6".to_string(),
            axis_color: "#C7D2E5".to_string(),
            chip_background: "#F8FAFF".to_string(),
            chip_border: "#C7D2E5".to_string(),
            cell_empty: "#EEF2F8".to_string(),
            cell_filled: "#93A9CC".to_string(),
            today_color: "#1C2430".to_string(),
            highlight_ring: "#2563EB".to_string(),
            accent_sky: "#0EA5E9".to_string(),
            accent_emerald: "#10B981".to_string(),
            accent_amber: "#F59E0B".to_string(),
            accent_rose: "#F43F5E".to_string(),
            accent_violet: "#8B5CF6".to_string(),
        }
    }

    pub fn midnight() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#0B1120".to_string(),
            text_color: "#E2E8F0".to_string(),
            muted_text_color: "#64748B".to_string(),
            axis_color: "#334155".to_string(),
            chip_background: "#1E293B".to_string(),
            chip_border: "#334155".to_string(),
            cell_empty: "#1E293B".to_string(),
            cell_filled: "#475F82".to_string(),
            today_color: "#E2E8F0".to_string(),
            highlight_ring: "#60A5FA".to_string(),
            accent_sky: "#38BDF8".to_string(),
            accent_emerald: "#34D399".to_string(),
            accent_amber: "#FBBF24".to_string(),
            accent_rose: "#FB7185".to_string(),
            accent_violet: "#A78BFA".to_string(),
        }
    }

    /// Accent fill for a milestone chip. `Subtle` uses the plain chip
    /// background so unaccented chips recede.
    pub fn accent(&self, token: ColorToken) -> &str {
        match token {
            ColorToken::Subtle => self.chip_background.as_str(),
            ColorToken::Sky => self.accent_sky.as_str(),
            ColorToken::Emerald => self.accent_emerald.as_str(),
            ColorToken::Amber => self.accent_amber.as_str(),
            ColorToken::Rose => self.accent_rose.as_str(),
            ColorToken::Violet => self.accent_violet.as_str(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::modern()
    }
}
