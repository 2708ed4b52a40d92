pub mod lifecycle;
pub mod shape;
