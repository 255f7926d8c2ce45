pub mod build;
pub mod player;
pub mod plugin;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
