pub mod error;
pub mod join;
pub mod proximity;
pub mod qr;
pub mod session;
pub mod store;
pub mod types;

pub use error::AttendanceError;
pub use types::{AttendanceRecord, ClassSession};
