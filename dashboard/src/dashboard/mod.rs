//! Dashboard list view

pub mod view;

pub use view::{DashboardCounts, DashboardState, DashboardView};
