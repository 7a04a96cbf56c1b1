pub mod issues;
pub mod teams;
