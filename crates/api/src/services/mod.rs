//! Application services: authentication, image uploads, reference numbers.

pub mod auth;
pub mod reference;
pub mod uploads;
