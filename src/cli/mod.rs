//! CLI module for argcache
//!
//! Provides subcommands for exercising the cache from a shell:
//! - `key`: print the composite key for a list of arguments
//! - `probe`: run a put/get/evict round trip against the configured store

pub mod key;
pub mod probe;

use clap::{Parser, Subcommand};

/// argcache - argument-derived cache keys over a key-value store
#[derive(Parser)]
#[command(name = "argcache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the cache key generated for the given arguments
    Key(key::KeyArgs),

    /// Round-trip a value through the configured backing store
    Probe(probe::ProbeArgs),
}
