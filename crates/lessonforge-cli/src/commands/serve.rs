//! The `lessonforge serve` command.

use std::sync::Arc;

use anyhow::Result;

use crate::ProviderArgs;

pub async fn execute(bind: Option<String>, provider: ProviderArgs) -> Result<()> {
    let (config, service) = super::build_service(&provider)?;
    let addr = bind.unwrap_or(config.server.bind);

    lessonforge_server::serve(&addr, Arc::new(service), async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
        }
    })
    .await
}
