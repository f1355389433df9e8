// Settings persistence: widget configuration stored in the platform-native
// config dir, e.g. ~/Library/Application Support/dendro/settings.json on
// macOS, ~/.config/dendro/settings.json on Linux.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use dendro_core::{Color, TreeConfig};

/// On-disk settings document. Colors are stored as `#rrggbb` strings;
/// every field falls back to the built-in default when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DendroSettings {
    pub node_radius: f32,
    pub stroke_color: String,
    pub stroke_width: f32,
    pub font_size: f32,
    pub font_color: String,
    pub background_color: String,
    pub vertical_node_distance: f32,
    pub horizontal_spacing_factor: f32,
    pub transition_duration_ms: u32,
    pub drag_drop_enabled: bool,
    pub collapse_expand_all_enabled: bool,
    pub centralize_on_click: bool,
    pub on_click_action: Option<String>,
    pub save_action: Option<String>,
}

impl Default for DendroSettings {
    fn default() -> Self {
        Self::from_config(&TreeConfig::default())
    }
}

impl DendroSettings {
    /// Convert to the core configuration, falling back to the default for
    /// any color string that fails to parse.
    pub fn to_config(&self) -> TreeConfig {
        let defaults = TreeConfig::default();
        TreeConfig {
            node_radius: self.node_radius,
            stroke_color: parse_color_or(&self.stroke_color, defaults.stroke_color),
            stroke_width: self.stroke_width,
            font_size: self.font_size,
            font_color: parse_color_or(&self.font_color, defaults.font_color),
            background_color: parse_color_or(&self.background_color, defaults.background_color),
            vertical_node_distance: self.vertical_node_distance,
            horizontal_spacing_factor: self.horizontal_spacing_factor,
            transition_duration_ms: self.transition_duration_ms,
            drag_drop_enabled: self.drag_drop_enabled,
            collapse_expand_all_enabled: self.collapse_expand_all_enabled,
            centralize_on_click: self.centralize_on_click,
            on_click_action: self.on_click_action.clone(),
            save_action: self.save_action.clone(),
        }
    }

    /// Create from a core configuration.
    pub fn from_config(config: &TreeConfig) -> Self {
        Self {
            node_radius: config.node_radius,
            stroke_color: color_to_hex(config.stroke_color),
            stroke_width: config.stroke_width,
            font_size: config.font_size,
            font_color: color_to_hex(config.font_color),
            background_color: color_to_hex(config.background_color),
            vertical_node_distance: config.vertical_node_distance,
            horizontal_spacing_factor: config.horizontal_spacing_factor,
            transition_duration_ms: config.transition_duration_ms,
            drag_drop_enabled: config.drag_drop_enabled,
            collapse_expand_all_enabled: config.collapse_expand_all_enabled,
            centralize_on_click: config.centralize_on_click,
            on_click_action: config.on_click_action.clone(),
            save_action: config.save_action.clone(),
        }
    }
}

/// Parse a `#rrggbb` color string.
pub fn parse_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    // Byte-index slicing below requires ASCII; multi-byte input is rejected,
    // not a char-boundary panic.
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::rgb(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}

fn parse_color_or(s: &str, fallback: Color) -> Color {
    match parse_color(s) {
        Some(color) => color,
        None => {
            log::warn!("unrecognized color {:?}, using default", s);
            fallback
        }
    }
}

pub fn color_to_hex(color: Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        (color.r * 255.0).round() as u8,
        (color.g * 255.0).round() as u8,
        (color.b * 255.0).round() as u8
    )
}

fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("dendro").join("settings.json"))
}

pub fn load_settings() -> DendroSettings {
    let path = match settings_path() {
        Some(p) => p,
        None => return DendroSettings::default(),
    };

    match std::fs::read_to_string(&path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                DendroSettings::default()
            }
        },
        Err(_) => DendroSettings::default(),
    }
}

pub fn save_settings(settings: &DendroSettings) {
    let path = match settings_path() {
        Some(p) => p,
        None => {
            log::warn!("Cannot determine settings path");
            return;
        }
    };

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("Failed to create config dir {}: {}", parent.display(), e);
            return;
        }
    }

    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&path, json) {
                log::error!("Failed to write {}: {}", path.display(), e);
            }
        }
        Err(e) => {
            log::error!("Failed to serialize settings: {}", e);
        }
    }
}
