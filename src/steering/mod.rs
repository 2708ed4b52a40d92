pub mod flock;
pub mod forces;
