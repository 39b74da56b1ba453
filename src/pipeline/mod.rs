pub mod builder;
pub mod defaults;
pub mod engines;
pub mod runtime;
pub mod traits;
