pub mod message;
pub mod robot;
pub mod sign;

pub use robot::Robot;
