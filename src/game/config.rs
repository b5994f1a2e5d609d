use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::state::Point;

/// Milliseconds between simulation steps
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 60;

/// Largest board the engine will allocate
pub const MAX_CELLS: usize = 1 << 24;

/// Colours as 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background_light: u32,
    pub background_dark: u32,
    pub fruit: u32,
    pub snake: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background_light: 0xAAD751,
            background_dark: 0xA2D149,
            fruit: 0xE7471D,
            snake: 0x4674E9,
        }
    }
}

/// What happens to a snake whose next head cell is off the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsPolicy {
    /// Leave the snake where it is
    #[default]
    Freeze,
    /// Re-enter from the opposite edge
    Wrap,
    /// Halt the whole simulation
    Terminate,
}

/// Configuration for the game. Built once at startup and never mutated by
/// the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Edge length of one cell in pixels
    pub tile_size: u32,
    pub colors: Palette,
    pub step_interval_ms: u64,
    /// Number of due steps swallowed before snakes start moving
    pub warm_up_ticks: u32,
    pub out_of_bounds: OutOfBoundsPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            tile_size: 16,
            colors: Palette::default(),
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            warm_up_ticks: 0,
            out_of_bounds: OutOfBoundsPolicy::Freeze,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a JSON config file. Absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, GameError> {
        let text = fs::read_to_string(path).map_err(|e| {
            GameError::invalid_config(path.display().to_string(), e.to_string())
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| GameError::invalid_config("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value the engine relies on
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_width == 0 {
            return Err(GameError::invalid_config("grid_width", "must be at least 1"));
        }
        if self.grid_height == 0 {
            return Err(GameError::invalid_config("grid_height", "must be at least 1"));
        }
        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            return Err(GameError::invalid_config(
                "grid_width/grid_height",
                "does not fit a signed 32-bit coordinate",
            ));
        }
        let cells = self.grid_width.checked_mul(self.grid_height);
        if cells.map_or(true, |cells| cells > MAX_CELLS) {
            return Err(GameError::invalid_config(
                "grid_width/grid_height",
                format!("more than {MAX_CELLS} cells"),
            ));
        }
        if self.tile_size == 0 {
            return Err(GameError::invalid_config("tile_size", "must be at least 1"));
        }
        for (field, cells) in [("grid_width", self.grid_width), ("grid_height", self.grid_height)] {
            let pixels = u32::try_from(cells)
                .ok()
                .and_then(|cells| cells.checked_mul(self.tile_size));
            if pixels.is_none() {
                return Err(GameError::invalid_config(
                    field,
                    format!("{cells} tiles of {} px overflow the canvas", self.tile_size),
                ));
            }
        }
        if self.step_interval_ms == 0 {
            return Err(GameError::invalid_config(
                "step_interval_ms",
                "must be at least 1",
            ));
        }
        for (field, color) in [
            ("colors.background_light", self.colors.background_light),
            ("colors.background_dark", self.colors.background_dark),
            ("colors.fruit", self.colors.fruit),
            ("colors.snake", self.colors.snake),
        ] {
            if color > 0xFFFFFF {
                return Err(GameError::invalid_config(
                    field,
                    format!("{color:#x} is not a 24-bit colour"),
                ));
            }
        }
        Ok(())
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    /// Saturates on configs that did not pass [`GameConfig::validate`]
    pub fn canvas_width(&self) -> u32 {
        canvas_extent(self.tile_size, self.grid_width)
    }

    pub fn canvas_height(&self) -> u32 {
        canvas_extent(self.tile_size, self.grid_height)
    }

    pub fn half_tile(&self) -> u32 {
        self.tile_size / 2
    }

    /// Pixel column of a grid column's left edge
    pub fn screen_x(&self, x: i32) -> i64 {
        x as i64 * self.tile_size as i64
    }

    /// Pixel row of a grid row's top edge
    pub fn screen_y(&self, y: i32) -> i64 {
        y as i64 * self.tile_size as i64
    }

    pub fn point_to_screen(&self, point: Point) -> (i64, i64) {
        (self.screen_x(point.x), self.screen_y(point.y))
    }
}

fn canvas_extent(tile_size: u32, cells: usize) -> u32 {
    u32::try_from(cells)
        .unwrap_or(u32::MAX)
        .saturating_mul(tile_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.step_interval(), Duration::from_millis(60));
        assert_eq!(config.warm_up_ticks, 0);
        assert_eq!(config.out_of_bounds, OutOfBoundsPolicy::Freeze);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_screen_transform() {
        let config = GameConfig {
            tile_size: 16,
            ..GameConfig::small()
        };
        assert_eq!(config.screen_x(3), 48);
        assert_eq!(config.screen_y(5), 80);
        assert_eq!(config.point_to_screen(Point::new(3, 5)), (48, 80));
        assert_eq!(config.canvas_width(), 160);
        assert_eq!(config.canvas_height(), 160);
        assert_eq!(config.half_tile(), 8);
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let mut config = GameConfig::small();
        config.grid_width = 0;
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfiguration { ref field, .. }) if field == "grid_width"
        ));

        let mut config = GameConfig::small();
        config.tile_size = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.step_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_canvas_overflow() {
        let config = GameConfig {
            tile_size: 500_000_000,
            ..GameConfig::small()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfiguration { ref field, .. }) if field == "grid_width"
        ));
        assert_eq!(config.canvas_width(), u32::MAX);

        let config = GameConfig {
            tile_size: 1 << 20,
            ..GameConfig::new(4, 5000)
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfiguration { ref field, .. }) if field == "grid_height"
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_boards() {
        let config = GameConfig::new(i32::MAX as usize, i32::MAX as usize);
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfiguration { ref field, .. }) if field == "grid_width/grid_height"
        ));

        let config = GameConfig::new(usize::MAX, 2);
        assert!(config.validate().is_err());

        let config = GameConfig::new(MAX_CELLS, 1);
        assert!(config.validate().is_ok());
        let config = GameConfig::new(MAX_CELLS + 1, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wide_colours() {
        let mut config = GameConfig::small();
        config.colors.snake = 0x1000000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_partial_override() {
        let config = GameConfig::from_json_str(
            r#"{ "grid_width": 12, "tile_size": 8, "out_of_bounds": "wrap" }"#,
        )
        .unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.tile_size, 8);
        assert_eq!(config.out_of_bounds, OutOfBoundsPolicy::Wrap);
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        assert!(GameConfig::from_json_str(r#"{ "grid_height": 0 }"#).is_err());
        assert!(GameConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "warm_up_ticks": 3, "step_interval_ms": 100 }}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.warm_up_ticks, 3);
        assert_eq!(config.step_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_missing_json_file() {
        let err = GameConfig::from_json_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfiguration { .. }));
    }
}
