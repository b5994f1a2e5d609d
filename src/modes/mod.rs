pub mod headless;
pub mod play;

pub use headless::{HeadlessMode, RunSnapshot, SnakeSnapshot};
pub use play::PlayMode;
