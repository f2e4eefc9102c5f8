//! Screen rendering: turns a screen format plus current field values into
//! the structured payload terminals display.

mod payload;
mod screen_builder;

pub use payload::{Screen, ScreenContent, ScreenMask, ScreenOption, ScreenPrompt};
pub use screen_builder::build_screen;
