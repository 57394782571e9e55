pub mod connection;
pub mod head_to_head;
pub mod matches;
pub mod models;
pub mod player_tournament;
pub mod players;
pub mod ratings;
pub mod setup;
pub mod sports;
pub mod tournaments;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
