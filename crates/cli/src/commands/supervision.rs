// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk install-workers` / `clerk uninstall-workers`: write or remove
//! systemd user-unit files, one per queue, sized from `Config::worker_counts`
//! (spec.md SS4.5 "writes/removes supervisor unit files", SS6).

use std::path::PathBuf;

use clerk_core::SystemClock;
use clerk_engine::Context;

use crate::config::Config;
use crate::exit_error::ExitError;

const QUEUES: &[(&str, fn(&Config) -> u32)] = &[
    ("fetch", |c| c.worker_counts.fetch),
    ("ocr", |c| c.worker_counts.ocr),
    ("compilation", |c| c.worker_counts.compilation),
    ("extraction", |c| c.worker_counts.extraction),
    ("deploy", |c| c.worker_counts.deploy),
];

fn unit_dir() -> Result<PathBuf, ExitError> {
    let home = dirs::home_dir().ok_or_else(|| ExitError::runtime("could not resolve home directory"))?;
    Ok(home.join(".config/systemd/user"))
}

fn unit_path(dir: &std::path::Path, queue: &str, instance: u32) -> PathBuf {
    dir.join(format!("clerk-worker-{queue}-{instance}.service"))
}

fn unit_contents(queue: &str, clerk_bin: &str) -> String {
    format!(
        "[Unit]\n\
         Description=clerk worker for the {queue} queue\n\
         After=network.target\n\
         \n\
         [Service]\n\
         Type=simple\n\
         ExecStart={clerk_bin} worker --queues={queue}\n\
         Restart=on-failure\n\
         RestartSec=5\n\
         \n\
         [Install]\n\
         WantedBy=default.target\n"
    )
}

/// `_` is unused today but keeps this command's signature consistent with
/// the rest of `commands::*`, which all take a live `Context`.
pub async fn install_workers(_ctx: &Context<SystemClock>, config: &Config) -> Result<(), ExitError> {
    let dir = unit_dir()?;
    std::fs::create_dir_all(&dir)?;
    let clerk_bin = std::env::current_exe().map(|p| p.display().to_string()).unwrap_or_else(|_| "clerk".to_string());

    let mut written = 0usize;
    for (queue, count_of) in QUEUES {
        for instance in 0..count_of(config) {
            let path = unit_path(&dir, queue, instance);
            std::fs::write(&path, unit_contents(queue, &clerk_bin))?;
            written += 1;
        }
    }
    println!("Wrote {written} unit file(s) under {}", dir.display());
    println!("Run `systemctl --user daemon-reload` and `systemctl --user enable --now clerk-worker-*` to start them.");
    Ok(())
}

pub async fn uninstall_workers(_ctx: &Context<SystemClock>, config: &Config) -> Result<(), ExitError> {
    let dir = unit_dir()?;
    let mut removed = 0usize;
    for (queue, count_of) in QUEUES {
        for instance in 0..count_of(config) {
            let path = unit_path(&dir, queue, instance);
            if path.exists() {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
    }
    println!("Removed {removed} unit file(s) from {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_support::fixture;

    fn test_config(home: &std::path::Path) -> Config {
        let fx = fixture("oakdale.civic.band");
        let mut config = fx.config;
        config.worker_counts = crate::config::WorkerCounts { fetch: 2, ocr: 1, compilation: 0, extraction: 0, deploy: 1 };
        let _ = home;
        config
    }

    #[tokio::test]
    #[serial]
    async fn install_then_uninstall_round_trips_unit_files() {
        let home = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", home.path());

        let fx = fixture("oakdale.civic.band");
        let config = test_config(home.path());

        install_workers(&fx.ctx, &config).await.unwrap();
        let unit_dir = home.path().join(".config/systemd/user");
        // fetch=2 + ocr=1 + deploy=1, compilation=0 and extraction=0 write nothing.
        assert!(unit_dir.join("clerk-worker-fetch-0.service").exists());
        assert!(unit_dir.join("clerk-worker-fetch-1.service").exists());
        assert!(unit_dir.join("clerk-worker-ocr-0.service").exists());
        assert!(unit_dir.join("clerk-worker-deploy-0.service").exists());
        assert!(!unit_dir.join("clerk-worker-compilation-0.service").exists());

        uninstall_workers(&fx.ctx, &config).await.unwrap();
        assert!(!unit_dir.join("clerk-worker-fetch-0.service").exists());
        assert!(!unit_dir.join("clerk-worker-deploy-0.service").exists());

        std::env::remove_var("HOME");
    }
}
