pub mod codec;
pub mod console;
pub mod core;
pub mod engine;
pub mod nodes;
pub mod registry;
pub mod rules;
