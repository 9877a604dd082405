#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), deny(warnings))] // Forbid warnings in release builds
#![warn(clippy::all, rust_2018_idioms)]

use std::path::Path;

use dotenv::dotenv;
use pose_editor::config::{cli, Settings};
use pose_editor::edge::Stretch;
use pose_editor::problem::read_pose_from_file;
use pose_editor::Session;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Prints how the pose fares against the problem. Returns whether it is
/// fully valid.
fn check(settings: &Settings, problem: &Path, pose: &Path) -> pose_editor::Result<bool> {
    let text = std::fs::read_to_string(problem)?;
    let mut session = Session::from_text(&text, settings.geometry_module())?;
    session.load_pose(&read_pose_from_file(pose)?)?;

    let model = session.model();
    let mut valid = true;
    for (id, edge) in model.edges().iter().enumerate() {
        let (a, b) = edge.ends();
        let verdict = match edge.stretch() {
            Stretch::Ok if edge.globally_valid() => "ok",
            Stretch::Ok => "outside hole",
            Stretch::TooShort => "too short",
            Stretch::TooLong => "too long",
        };
        if verdict != "ok" {
            valid = false;
        }
        println!("edge {:3} ({:3}, {:3}): {}", id, a, b, verdict);
    }
    for (id, vertex) in model.vertices().iter().enumerate() {
        if !vertex.globally_valid() {
            valid = false;
            println!("vertex {} is outside the hole", id);
        }
    }

    let report = model.report();
    if report.verdict.is_none() {
        println!("geometry: {} (lengths only)", session.geometry().name());
    }
    if let Some(dislikes) = report.dislikes {
        println!("dislikes: {}", dislikes);
    }
    if let Some(score) = report.score {
        println!("pair distance violations: {}", score);
    }
    println!("{}", model.output());
    Ok(valid)
}

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    dotenv().ok();
    let matches = cli().get_matches();
    let mut settings = Settings::from_env().with_matches(&matches);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(matches) = matches.subcommand_matches("check") {
        settings = settings.with_matches(matches);
        let (problem, pose) = match (&settings.problem, &settings.pose) {
            (Some(problem), Some(pose)) => (problem.clone(), pose.clone()),
            _ => {
                error!("check needs both --problem and --pose");
                std::process::exit(2);
            }
        };
        match check(&settings, &problem, &pose) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                error!("{}", e);
                std::process::exit(2);
            }
        }
    } else {
        let app = pose_editor::EditorApp::new(settings);
        let native_options = eframe::NativeOptions::default();
        eframe::run_native(Box::new(app), native_options);
    }
}
