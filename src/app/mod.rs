pub mod input;
pub mod setup;

pub use input::build_input;
pub use setup::setup_scene;
