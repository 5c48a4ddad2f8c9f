//! Dashboard panels: the session table and the usage chart.

pub mod sessions;
pub mod usage;
