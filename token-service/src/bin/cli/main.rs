use std::process::ExitCode;

use clap::Parser;
use token_auth::TokenError;
use token_auth::TokenService;
use token_service::commands::exit_code;
use token_service::commands::run;
use token_service::commands::Cli;
use token_service::commands::ErrorOutput;
use token_service::config::Config;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<ExitCode, anyhow::Error> {
    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_service=info,token_auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    tracing::info!(
        service = "token-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        algorithm = %config.security.algorithm,
        audience = ?config.security.audience,
        issuer = ?config.security.issuer,
        lifetime_hours = config.security.lifetime_hours,
        "Configuration loaded"
    );

    let service = match TokenService::start(config.security) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "Refusing to start with invalid security configuration");
            return report(&e);
        }
    };

    match run(&service, &cli.command) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report(&e),
    }
}

fn report(err: &TokenError) -> Result<ExitCode, anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(&ErrorOutput::from(err))?);
    Ok(ExitCode::from(exit_code(err)))
}
