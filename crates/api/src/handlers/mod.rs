pub mod auth;
pub mod ingredients;
pub mod recipes;
pub mod short_links;
pub mod subscriptions;
pub mod tags;
pub mod users;
