// Tue Jan 15 2026 - Alex

pub mod config;
pub mod facts;
pub mod fixture;
pub mod structure;
pub mod ui;

pub use config::LayoutConfig;
pub use facts::FactSheet;
pub use structure::{
    ClassGraph, LayoutError, LayoutResolver, LayoutValidator, ResolvedGraph, TypeCatalog,
};
