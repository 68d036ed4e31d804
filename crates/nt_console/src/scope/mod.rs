//! Scoped terminal states
//!
//! - Mode scopes change the line discipline of stdin and put it back
//! - Status scopes draw a `BUSY` indicator that turns into `DONE` or `FAIL`

mod mode;
mod status;

pub use mode::ModeGuard;
pub use status::Status;
