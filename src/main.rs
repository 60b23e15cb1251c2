//! Sitekit - contact form mail relay and logo asset generator.

mod adapters;
mod cassette;
mod cli;
mod config;
mod contact;
mod context;
mod error;
mod logging;
mod logo;
mod output;
mod params;
mod ports;
mod server;

use std::path::Path;
use std::process;

use clap::Parser;

use crate::cli::{Cli, Command, LogoArgs, ServeArgs};
use crate::config::Config;
use crate::contact::MailRoute;
use crate::context::ServiceContext;
use crate::error::SiteError;
use crate::logo::font::{BuiltinFonts, FontLoader, FontSource};
use crate::params::{validate_bind, validate_logo, validate_route};
use crate::server::{ctrl_c, RelayServer, ServeOptions};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), SiteError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(SiteError::Config)?.with_env_overrides();
    tracing::debug!(path = %config_path.display(), "loaded config");

    match cli.command {
        Command::Serve(ref args) => serve(args, &config).await,
        Command::Logo(ref args) => logo(args, &config),
    }
}

async fn serve(args: &ServeArgs, config: &Config) -> Result<(), SiteError> {
    let addr = validate_bind(&args.bind(&config.serve)).map_err(SiteError::InvalidArgument)?;
    let route = args.route(&config.serve);
    validate_route(&route).map_err(SiteError::InvalidArgument)?;
    let mail_route = MailRoute::from_config(config)?;

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("SITEKIT_REPLAY").ok();
    let is_recording = std::env::var("SITEKIT_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::info!(cassette = %cassette_path, "replaying mail sender");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("recording mail sender interactions");
        let (ctx, session) = ServiceContext::recording(config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(config)?, None)
    };

    let options = ServeOptions { route: route.clone(), max_body_bytes: config.serve.max_body_bytes };
    let server = RelayServer::bind(addr, options)?;
    eprintln!("Listening: http://{}{route}", server.addr());

    let result = server.run(&mail_route, ctx.sender.as_ref(), ctrl_c()).await;
    drop(ctx);

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    result
}

fn logo(args: &LogoArgs, config: &Config) -> Result<(), SiteError> {
    let spec = args.spec(&config.logo);
    validate_logo(&spec).map_err(SiteError::InvalidArgument)?;
    let out_dir = args.out_dir(&config.logo);

    let fonts: Box<dyn FontSource> = if args.builtin_font {
        Box::new(BuiltinFonts)
    } else {
        Box::new(FontLoader::new(config.logo.fonts.clone()))
    };

    let written = output::export(&spec, fonts.as_ref(), &out_dir)?;
    let shown = std::fs::canonicalize(&out_dir).unwrap_or(out_dir);
    eprintln!("Output: {}", shown.display());
    for path in &written {
        eprintln!("Saved: {}", path.display());
    }
    Ok(())
}
