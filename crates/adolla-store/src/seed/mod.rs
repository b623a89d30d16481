//! Startup seeding

pub mod bootstrap;

pub use bootstrap::BootstrapSeeder;
