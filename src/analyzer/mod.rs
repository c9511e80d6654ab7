// Analyzer module: profile selection, donation extraction and reconciliation.

pub mod donations;
pub mod profile;
pub mod reconcile;

pub use donations::extract_donations;
pub use profile::select_profile;
pub use reconcile::reconcile;
