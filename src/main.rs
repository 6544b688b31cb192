use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use eframe::egui;

use lg_gram_manager::app::LgGramApp;
use lg_gram_manager::cli::{self, Cli, Command};
use lg_gram_manager::config::{self, Config};
use lg_gram_manager::elevate::Pkexec;
use lg_gram_manager::sysfs::Gateway;

fn main() -> ExitCode {
    config::load_dotenv(Path::new(".env"));

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let config = config::load();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.command.unwrap_or(Command::Gui) {
        Command::Gui => match run_gui(config, runtime) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("Window closed with error: {}", e);
                ExitCode::FAILURE
            }
        },
        Command::Status { json } => match cli::render_status(&cli::status(&config), json) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Command::Set { key, value } => {
            let gateway = Gateway::new(runtime.handle().clone(), Arc::new(Pkexec::new(config.elevator.clone())));
            match cli::set(&config, &gateway, &key, &value) {
                Ok(outcome) => {
                    tracing::debug!("{} set via {:?}", key, outcome.mechanism);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run_gui(config: Config, runtime: tokio::runtime::Runtime) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("LG Gram Manager")
            .with_app_id("org.lg-gram-manager")
            .with_inner_size([500.0, 750.0])
            .with_min_inner_size([420.0, 480.0])
            .with_icon(load_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "LG Gram Manager",
        options,
        Box::new(|cc| Ok(Box::new(LgGramApp::new(cc, config, runtime)))),
    )
}

fn load_icon() -> egui::IconData {
    // 32x32 disc in LG's magenta on a transparent background
    let icon_size = 32;
    let mut rgba = vec![0u8; icon_size * icon_size * 4];
    let center = (icon_size as f32 - 1.0) / 2.0;
    let radius = icon_size as f32 / 2.0 - 1.0;

    for y in 0..icon_size {
        for x in 0..icon_size {
            let idx = (y * icon_size + x) * 4;
            let (dx, dy) = (x as f32 - center, y as f32 - center);
            if dx * dx + dy * dy <= radius * radius {
                rgba[idx] = 165;
                rgba[idx + 1] = 0;
                rgba[idx + 2] = 52;
                rgba[idx + 3] = 255;
            }
        }
    }

    egui::IconData {
        rgba,
        width: icon_size as u32,
        height: icon_size as u32,
    }
}
