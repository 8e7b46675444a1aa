mod pollution;

pub use pollution::*;
