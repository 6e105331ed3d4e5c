//! fusion-host: host plumbing for the launcher.
//!
//! Console code page setup, the child interpreter process, and the
//! keypress pause that keeps a double-clicked console window open.

pub mod child;
pub mod console;

pub use child::{ChildError, CommandSpec};
pub use console::{ConsolePause, NoPause, Pause};
