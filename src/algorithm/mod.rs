/// Selection state and rejection reasons
pub mod composition;
/// Composition loop, restart handling and cascade application
pub mod executor;
/// Seeded gate, weighted draw and shuffling
pub mod selection;
