use clap::Parser;

use treasury_ledger::cli::Cli;
use treasury_ledger::config::{get_config, init_config, update_config};
use treasury_ledger::runtime::modes::{Mode, detect_mode, run_cli, run_server};
use treasury_ledger::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_config();
    if let Some(url) = cli.database_url.clone() {
        update_config(|c| c.database.database_url = url);
    }

    match detect_mode(cli.command.as_ref()) {
        Mode::Server => {
            let config = get_config();
            let _guard = init_logging(&config).map_err(|e| {
                eprintln!("{}", e.format_colored());
                anyhow::anyhow!(e)
            })?;
            run_server().await
        }
        Mode::Cli => {
            let Some(cmd) = cli.command else {
                return Ok(());
            };
            if let Err(e) = run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
