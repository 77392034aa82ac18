// =============================================================================
// HTTP surface: JSON API and the dashboard page
// =============================================================================

pub mod dashboard;
pub mod rest;
