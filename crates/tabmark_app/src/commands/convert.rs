use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use tabmark_engine::{
    write_output_file, Converter, LocalConverter, RemoteConverter, RemoteSettings,
};
use tabmark_logging::tabmark_info;

use crate::cli::ConvertArgs;
use crate::config::Settings;

pub fn execute(args: ConvertArgs, settings: &Settings) -> anyhow::Result<()> {
    let text = read_input(args.input.as_deref())?;

    let markdown = match settings.remote_settings() {
        Some(remote) => convert_remote(remote, &text)?,
        None => LocalConverter::new(settings.render_options()).convert_now(&text),
    };

    match &args.output {
        Some(path) => {
            let written = write_output_file(path, &markdown)
                .with_context(|| format!("writing {}", path.display()))?;
            tabmark_info!("Wrote {:?}", written);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(markdown.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

fn convert_remote(remote: RemoteSettings, text: &str) -> anyhow::Result<String> {
    let endpoint = remote.endpoint.clone();
    let converter = RemoteConverter::new(remote)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let markdown = runtime
        .block_on(converter.convert(text))
        .with_context(|| format!("converting through {endpoint}"))?;
    Ok(markdown)
}
