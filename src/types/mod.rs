//! Resource records returned by the API.
//!
//! Every field is optional: the API omits fields freely and decoding must not
//! fail because one is missing. Unknown fields are ignored.

pub mod privacy;
pub mod trip;
pub mod user;
pub mod vehicle;

pub use privacy::{Privacy, PrivacyQuery};
pub use trip::{Location, Signal, Trip};
pub use user::User;
pub use vehicle::{Accelerometer, Device, PairingRequest, Status, Vehicle};
