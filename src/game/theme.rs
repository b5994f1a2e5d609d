//! Layout and colour settings read from a stylesheet of custom properties
//!
//! A theme file is plain CSS; only `--name: value;` declarations are read:
//!
//! ```css
//! :root {
//!     --map-width: 20;
//!     --map-height: 15;
//!     --tile-size: 16px;
//!     --background-color-light: #aad751;
//!     --background-color-dark: #a2d149;
//!     --fruit-color: #e7471d;
//!     --snake-color: #4674e9;
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::config::{GameConfig, Palette};
use super::error::GameError;

pub const MAP_WIDTH: &str = "--map-width";
pub const MAP_HEIGHT: &str = "--map-height";
pub const TILE_SIZE: &str = "--tile-size";
pub const BACKGROUND_COLOR_LIGHT: &str = "--background-color-light";
pub const BACKGROUND_COLOR_DARK: &str = "--background-color-dark";
pub const FRUIT_COLOR: &str = "--fruit-color";
pub const SNAKE_COLOR: &str = "--snake-color";

fn declaration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(--[A-Za-z0-9_-]+)\s*:\s*([^;{}]*)").expect("declaration pattern is valid")
    })
}

fn leading_integer() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("integer pattern is valid"))
}

fn hex_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9A-Fa-f]+").expect("hex pattern is valid"))
}

/// Custom properties declared in a stylesheet. Later declarations win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeVariables {
    vars: HashMap<String, String>,
}

impl ThemeVariables {
    pub fn parse(text: &str) -> Self {
        let vars = declaration_pattern()
            .captures_iter(text)
            .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
            .collect();
        Self { vars }
    }

    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let text = fs::read_to_string(path).map_err(|e| {
            GameError::invalid_config(path.display().to_string(), e.to_string())
        })?;
        Ok(Self::parse(&text))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn require(&self, name: &str) -> Result<&str, GameError> {
        self.get(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GameError::invalid_config(name, "missing"))
    }

    /// Leading decimal integer of the value, so `16px` reads as 16
    pub fn as_number(&self, name: &str) -> Result<i64, GameError> {
        let value = self.require(name)?;
        leading_integer()
            .captures(value)
            .and_then(|caps| caps[1].parse().ok())
            .ok_or_else(|| GameError::invalid_config(name, format!("`{value}` is not a number")))
    }

    /// First run of hex digits in the value, so `#4674e9` reads as 0x4674E9
    pub fn as_hex_color(&self, name: &str) -> Result<u32, GameError> {
        let value = self.require(name)?;
        let digits = hex_run()
            .find(value)
            .map(|m| m.as_str())
            .ok_or_else(|| GameError::invalid_config(name, format!("`{value}` is not a colour")))?;
        u32::from_str_radix(digits, 16)
            .ok()
            .filter(|c| *c <= 0xFFFFFF)
            .ok_or_else(|| {
                GameError::invalid_config(name, format!("`{value}` is not a 24-bit colour"))
            })
    }

    fn as_count(&self, name: &str) -> Result<usize, GameError> {
        let n = self.as_number(name)?;
        if n < 1 {
            return Err(GameError::invalid_config(name, format!("{n} must be at least 1")));
        }
        usize::try_from(n).map_err(|e| GameError::invalid_config(name, e.to_string()))
    }

    /// Overlay the layout and palette onto `base`. Every layout and colour
    /// variable is required.
    pub fn apply(&self, base: GameConfig) -> Result<GameConfig, GameError> {
        let tile_size = u32::try_from(self.as_count(TILE_SIZE)?)
            .map_err(|e| GameError::invalid_config(TILE_SIZE, e.to_string()))?;

        let config = GameConfig {
            grid_width: self.as_count(MAP_WIDTH)?,
            grid_height: self.as_count(MAP_HEIGHT)?,
            tile_size,
            colors: Palette {
                background_light: self.as_hex_color(BACKGROUND_COLOR_LIGHT)?,
                background_dark: self.as_hex_color(BACKGROUND_COLOR_DARK)?,
                fruit: self.as_hex_color(FRUIT_COLOR)?,
                snake: self.as_hex_color(SNAKE_COLOR)?,
            },
            ..base
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = r#"
        body { margin: 0; }
        :root {
            --map-width: 10;
            --map-height:12;
            --tile-size: 16px;
            --background-color-light: #aad751;
            --background-color-dark:  #A2D149 ;
            --fruit-color: #e7471d;
            --snake-color: #4674e9;
        }
    "#;

    #[test]
    fn test_parse_declarations() {
        let theme = ThemeVariables::parse(THEME);
        assert_eq!(theme.len(), 7);
        assert_eq!(theme.get(MAP_HEIGHT), Some("12"));
        assert_eq!(theme.get(BACKGROUND_COLOR_DARK), Some("#A2D149"));
        assert_eq!(theme.get("margin"), None);
    }

    #[test]
    fn test_numbers_take_leading_integer() {
        let theme = ThemeVariables::parse("--a: 16px; --b: -3; --c: px16;");
        assert_eq!(theme.as_number("--a").unwrap(), 16);
        assert_eq!(theme.as_number("--b").unwrap(), -3);
        assert!(theme.as_number("--c").is_err());
        assert!(theme.as_number("--missing").is_err());
    }

    #[test]
    fn test_hex_colors() {
        let theme = ThemeVariables::parse("--a: #4674e9; --b: 0f0; --c: #1234567; --d: ##;");
        assert_eq!(theme.as_hex_color("--a").unwrap(), 0x4674E9);
        assert_eq!(theme.as_hex_color("--b").unwrap(), 0x0F0);
        assert!(theme.as_hex_color("--c").is_err());
        assert!(theme.as_hex_color("--d").is_err());
    }

    #[test]
    fn test_apply_overlays_layout() {
        let base = GameConfig {
            warm_up_ticks: 2,
            ..GameConfig::default()
        };
        let config = ThemeVariables::parse(THEME).apply(base).unwrap();

        assert_eq!(config.grid_width, 10);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.tile_size, 16);
        assert_eq!(config.colors.fruit, 0xE7471D);
        assert_eq!(config.colors.background_dark, 0xA2D149);
        assert_eq!(config.warm_up_ticks, 2);
        assert_eq!(config.canvas_width(), 160);
        assert_eq!(config.canvas_height(), 192);
    }

    #[test]
    fn test_missing_variable_names_the_variable() {
        let text = THEME.replace("--fruit-color: #e7471d;", "");
        let err = ThemeVariables::parse(&text)
            .apply(GameConfig::default())
            .unwrap_err();
        assert_eq!(err, GameError::invalid_config(FRUIT_COLOR, "missing"));
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let text = THEME.replace("--map-width: 10;", "--map-width: 0;");
        let err = ThemeVariables::parse(&text)
            .apply(GameConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidConfiguration { ref field, .. } if field == MAP_WIDTH
        ));
    }
}
