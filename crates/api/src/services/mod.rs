//! Business services for the API.
//!
//! - [`auth`] - password hashing and bearer-token issuance/verification
//! - [`uploads`] - product image intake (allow-list, naming, storage)

pub mod auth;
pub mod uploads;
