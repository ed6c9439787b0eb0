pub mod bitcoin;
pub mod persistence;
