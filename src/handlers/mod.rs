pub mod auth;
pub mod common;
pub mod inwards;
pub mod items;
pub mod locations;
pub mod outwards;
pub mod parties;
pub mod payments;
pub mod reports;
pub mod vendors;
