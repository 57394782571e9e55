pub mod importing;
pub mod processing;
pub mod server;
