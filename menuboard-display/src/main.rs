use menuboard_display::config::DisplayConfig;
use menuboard_display::{app, util};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    util::init_tracing();
    util::install_panic_hook();

    let config = DisplayConfig::load()?;
    if let Err(e) = app::run(config).await {
        tracing::error!("display failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
