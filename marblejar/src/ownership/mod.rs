pub mod changes;
pub mod shelf;
