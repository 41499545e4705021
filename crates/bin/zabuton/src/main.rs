use anyhow::Result;
use clap::Parser;
use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::info;
use zabuton_core::{demo, MultiWallet};

mod app;
mod config;
mod load;
mod logbuf;
mod page;
mod theme;
mod values;
mod widgets;

use app::ZabutonApp;
use config::{AppConfig, Args};
use logbuf::LogBuffer;

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = AppConfig::from_args(&args)?;

    // everything logged also lands in the debug page's buffer
    let logs = LogBuffer::new(cfg.log_buffer_lines);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cfg.log_filter.as_str().into()),
        )
        .with_writer(logs.clone())
        .with_ansi(false)
        .init();

    info!("starting {} on {}", values::APP_NAME, cfg.network);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("zabuton-worker")
        .build()?;

    let mw = Arc::new(MultiWallet::open(&cfg.data_dir, cfg.network)?);
    if args.demo && demo::populate(&mw)? {
        info!("demo wallets created, passphrase {:?}", demo::DEMO_PASSPHRASE);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(cfg.window_size)
            .with_min_inner_size([480.0, 520.0])
            .with_title(format!("{} - {}", values::APP_NAME, mw.net_type().display_name())),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        values::APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(ZabutonApp::new(cc, mw, handle, logs, StdRng::from_entropy())))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
