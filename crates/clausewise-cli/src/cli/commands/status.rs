//! Service readiness check.

use anyhow::{Result, bail};
use clausewise_core::config::Config;
use clausewise_core::{ServiceProber, ServiceStatus};
use tokio_util::sync::CancellationToken;

pub async fn run(config: &Config) -> Result<()> {
    let prober = ServiceProber::from_config(config)?;
    let cancel = CancellationToken::new();

    let terminal = prober
        .ensure_ready(&cancel, |status| println!("{}", status.message()))
        .await;

    match terminal {
        Some(ServiceStatus::Ready) => {
            println!("Launch: {}", prober.launch_url());
            Ok(())
        }
        Some(status) => bail!("service not ready ({status:?})"),
        None => bail!("readiness check cancelled"),
    }
}
