/// Router Module Index
///
/// The console's HTTP surface is split in two: the JSON API under
/// `/api/console`, and the page fallback (see `crate::create_router`) that runs
/// every other path through the console route table and its guards.

/// Routes needing no viewer at all (probes).
pub mod public;

/// JSON routes answering with the caller's routing decision and session.
pub mod console;
