pub mod filter;
pub mod notifications;
pub mod offers;
pub mod requests;
pub mod vehicles;
