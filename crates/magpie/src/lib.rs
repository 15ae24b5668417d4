pub mod agents;
pub mod capabilities;
pub mod errors;
pub mod models;
pub mod providers;
