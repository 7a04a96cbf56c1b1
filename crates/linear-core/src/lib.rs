//! Core library for the Linear terminal browser: credentials, configuration and the GraphQL client.

pub mod auth;
pub mod config;
pub mod graphql;
pub mod services;
