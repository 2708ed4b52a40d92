pub mod behaviors;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;
