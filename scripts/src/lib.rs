//! Scripts for deploying and verifying the Innova Token and Tracking contracts.

#![deny(clippy::missing_docs_in_private_items)]
#![cfg_attr(test, allow(clippy::missing_docs_in_private_items))]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod utils;

/// Our compiled artifacts utils
pub mod build;

/// Our deploy utils
pub mod deploy;

/// Our explorer verification utils
pub mod verify;

pub mod tx;
