pub mod controller;
pub mod locale;
pub mod store;
