// Declarative commands
pub mod reconcile;

// Inspection commands
pub mod check;
pub mod show;
