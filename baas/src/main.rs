//! `baas` entry-point: load settings, build the selected backend system and
//! run the account bootstrap flow once.

use std::env;

use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use baas::app::{BaasSettings, build_backend_system};
use baas::domain::AccountBootstrap;
use baas::inbound::console::ConsoleStatusSink;

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = BaasSettings::load_from_iter(env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let system = build_backend_system(&settings).wrap_err("failed to wire backend system")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build runtime")?;

    runtime.block_on(async {
        let sink = ConsoleStatusSink::new();
        let mut flow = AccountBootstrap::new(&system, &sink);
        let report = flow.run(&settings.credentials()).await;
        sink.show_user(report.user.as_ref());

        if settings.sign_out {
            let response = flow.sign_out().await;
            if !response.is_success() {
                warn!(error = %response.error_message(), "sign out failed");
            }
        }
        info!(state = %flow.state(), status = %sink.current(), "bootstrap complete");
    });
    Ok(())
}
