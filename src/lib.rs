pub mod api;
pub mod board;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod filter;
pub mod geo;
pub mod map;
pub mod server;
