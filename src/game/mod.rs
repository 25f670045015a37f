//! Game session and the two roles that share it
//!
//! The master owns a [`Session`] and publishes; followers mirror snapshots.

pub mod board;
pub mod follower;
pub mod master;
pub mod session;

pub use board::{Board, Grid, ROWS, Slot};
pub use follower::{Follower, join};
pub use master::{Input, Master};
pub use session::{Phase, Session};
