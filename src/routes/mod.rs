pub mod auth;
pub mod health;
pub mod locations;
pub mod matches;
pub mod players;
pub mod ranks;
