//! `Upgate` CLI
//!
//! Talks to an update server the way a mobile client does and checks the
//! signature on what comes back.

pub mod check_cmd;
pub mod verify_cmd;
