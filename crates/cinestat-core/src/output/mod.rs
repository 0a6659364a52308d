pub mod csv;
pub mod direct;
pub mod json;
pub mod manifest;
