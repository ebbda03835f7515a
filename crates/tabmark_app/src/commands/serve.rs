use tabmark_engine::{serve, LocalConverter};

use crate::cli::ServeArgs;
use crate::config::Settings;

pub fn execute(args: ServeArgs, settings: &Settings) -> anyhow::Result<()> {
    let addr = args.addr.unwrap_or_else(|| settings.listen_addr.clone());
    let converter = LocalConverter::new(settings.render_options());
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(&addr, converter))?;
    Ok(())
}
