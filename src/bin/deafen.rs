#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Mute the preferred speaker with Page Down.

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    mute_rs::app::init_logging();

    if let Err(e) = mute_rs::app::run(mute_rs::app::Profile::deafen()) {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("deafen only runs on Windows");
    std::process::exit(1);
}
