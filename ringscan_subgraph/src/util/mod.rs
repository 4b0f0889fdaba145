//! Supporting utilities for the search drivers.

pub mod progress;
