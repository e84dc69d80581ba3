#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Mute the preferred microphone with Page Up.

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    mute_rs::app::init_logging();

    if let Err(e) = mute_rs::app::run(mute_rs::app::Profile::mute()) {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("mute only runs on Windows");
    std::process::exit(1);
}
