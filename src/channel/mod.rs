pub mod bridge;
pub mod flight;
pub mod message;
