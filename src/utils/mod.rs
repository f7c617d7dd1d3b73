//! Internal utilities.

pub(crate) mod synchronization;
