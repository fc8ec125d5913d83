pub mod aria;
pub mod render;
pub mod scroll;
pub mod span;
pub mod spinner;
pub mod style;
