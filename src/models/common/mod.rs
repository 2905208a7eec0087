pub mod nullable;
pub mod validation;
