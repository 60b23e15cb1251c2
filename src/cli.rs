//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{LogoConfig, ServeConfig};
use crate::logo::LogoSpec;

/// Personal site toolkit: contact form relay and logo generator.
#[derive(Parser, Debug)]
#[command(name = "sitekit", version, about)]
pub struct Cli {
    /// What to run.
    #[command(subcommand)]
    pub command: Command,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Relay contact form submissions to email over HTTP.
    Serve(ServeArgs),
    /// Draw the logo and export the PNG variants.
    Logo(LogoArgs),
}

/// Options for `sitekit serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address, e.g. 127.0.0.1:5000.
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Path of the form endpoint.
    #[arg(short, long)]
    pub route: Option<String>,
}

impl ServeArgs {
    /// Bind address, falling back to the config file.
    #[must_use]
    pub fn bind(&self, config: &ServeConfig) -> String {
        self.bind.clone().unwrap_or_else(|| config.bind.clone())
    }

    /// Form route, falling back to the config file.
    #[must_use]
    pub fn route(&self, config: &ServeConfig) -> String {
        self.route.clone().unwrap_or_else(|| config.route.clone())
    }
}

/// Options for `sitekit logo`.
#[derive(Args, Debug)]
pub struct LogoArgs {
    /// Directory to write the PNG files to.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Initials drawn in the center of the mark.
    #[arg(short, long)]
    pub initials: Option<String>,

    /// Full name for the horizontal lockup.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Role line under the name.
    #[arg(short, long)]
    pub role: Option<String>,

    /// Edge length of the square mark in pixels.
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Draw text with the built-in bitmap font instead of system fonts.
    #[arg(long)]
    pub builtin_font: bool,
}

impl LogoArgs {
    /// Logo spec from the config file with flags applied on top.
    #[must_use]
    pub fn spec(&self, config: &LogoConfig) -> LogoSpec {
        let mut spec = LogoSpec::from_config(config);
        if let Some(ref initials) = self.initials {
            spec.initials.clone_from(initials);
        }
        if let Some(ref name) = self.name {
            spec.name.clone_from(name);
        }
        if let Some(ref role) = self.role {
            spec.role.clone_from(role);
        }
        if let Some(size) = self.size {
            spec.size = size;
        }
        spec
    }

    /// Output directory, falling back to the config file.
    #[must_use]
    pub fn out_dir(&self, config: &LogoConfig) -> PathBuf {
        self.out_dir.clone().unwrap_or_else(|| config.out_dir.clone())
    }
}
