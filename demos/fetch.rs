//! Download the URLs given on the command line, one progress bar each.
//!
//! ```text
//! cargo run --example fetch -- https://example.com/a.iso https://example.com/b.iso
//! ```
//!
//! Set `RUST_LOG=fetchpool=debug` to see the transfer protocol at work.

use color_eyre::{eyre::eyre, Result};
use fetchpool::{CallbackSet, EngineBuilder};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Duplicate URLs would share one task; ask for each once.
    let mut urls: Vec<String> = std::env::args().skip(1).collect();
    urls.sort();
    urls.dedup();
    if urls.is_empty() {
        return Err(eyre!("usage: fetch <url>..."));
    }

    let engine = EngineBuilder::new()
        .directory(PathBuf::from("downloads"))
        .concurrent_downloads(3)
        .build()?;

    let multi = MultiProgress::new();
    let style = ProgressStyle::with_template("{msg:30!} [{bar:40.cyan/blue}] {pos:>3}%")?
        .progress_chars("=> ");
    let (done_tx, done_rx) = mpsc::channel::<()>();

    for url in &urls {
        let pb = multi.add(ProgressBar::new(100).with_style(style.clone()));
        pb.set_message(url.rsplit('/').next().unwrap_or(url).to_string());

        let (progress, status, finish, error, pause, cancel) =
            (pb.clone(), pb.clone(), pb.clone(), pb.clone(), pb.clone(), pb);
        let (finish_tx, error_tx, pause_tx, cancel_tx) =
            (done_tx.clone(), done_tx.clone(), done_tx.clone(), done_tx.clone());

        let callbacks = CallbackSet::new()
            .on_progress(move |percent| progress.set_position(percent as u64))
            .on_status(move |text| status.println(text))
            .on_finish(move |name, path, size| {
                finish.finish_with_message(format!("{name} ({size} bytes) -> {}", path.display()));
                let _ = finish_tx.send(());
            })
            .on_error(move |message| {
                error.abandon_with_message(format!("failed: {message}"));
                let _ = error_tx.send(());
            })
            .on_pause(move || {
                pause.abandon_with_message("paused");
                let _ = pause_tx.send(());
            })
            .on_cancel(move || {
                cancel.abandon_with_message("cancelled");
                let _ = cancel_tx.send(());
            });

        engine.start(url, callbacks);
    }
    drop(done_tx);

    for _ in 0..urls.len() {
        done_rx.recv()?;
    }

    Ok(())
}
