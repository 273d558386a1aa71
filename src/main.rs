use std::process::ExitCode;

use uptime_registrar::cli::{self, Command};
use uptime_registrar::{Config, Registrar};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = match cli::parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        // Help and version output included: only a registration exits 0.
        Err(e) => {
            e.print().ok();
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Add { domain, url, .. } => {
            let registrar = Registrar::new(Config::from_env());
            if registrar.register(&domain, &url).await {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
