use std::path::PathBuf;
use std::rc::Rc;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use tracing::warn;

use crate::checker::HoleChecker;
use crate::geometry::{Absent, GeometryModule};

pub const PROBLEM_VAR: &str = "POSE_EDITOR_PROBLEM";
pub const POSE_VAR: &str = "POSE_EDITOR_POSE";
pub const ZOOM_VAR: &str = "POSE_EDITOR_ZOOM";
pub const LOG_VAR: &str = "POSE_EDITOR_LOG";
pub const GEOMETRY_VAR: &str = "POSE_EDITOR_GEOMETRY";

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub problem: Option<PathBuf>,
    pub pose: Option<PathBuf>,
    pub zoom: f32,
    pub log_filter: String,
    pub geometry: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            problem: None,
            pose: None,
            zoom: 4.0,
            log_filter: "info".to_owned(),
            geometry: true,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut settings = Settings {
            problem: lookup(PROBLEM_VAR).map(PathBuf::from),
            pose: lookup(POSE_VAR).map(PathBuf::from),
            ..Settings::default()
        };
        if let Some(zoom) = lookup(ZOOM_VAR) {
            settings.set_zoom(&zoom);
        }
        if let Some(filter) = lookup(LOG_VAR) {
            settings.log_filter = filter;
        }
        if let Some(geometry) = lookup(GEOMETRY_VAR) {
            match geometry.to_lowercase().as_str() {
                "on" | "1" | "true" => settings.geometry = true,
                "off" | "0" | "false" => settings.geometry = false,
                other => warn!("ignoring {}={}", GEOMETRY_VAR, other),
            }
        }
        settings
    }

    /// Command line arguments win over the environment.
    pub fn with_matches(mut self, matches: &ArgMatches<'_>) -> Self {
        if let Some(problem) = matches.value_of("problem") {
            self.problem = Some(PathBuf::from(problem));
        }
        if let Some(pose) = matches.value_of("pose") {
            self.pose = Some(PathBuf::from(pose));
        }
        if let Some(zoom) = matches.value_of("zoom") {
            self.set_zoom(zoom);
        }
        if matches.is_present("no-geometry") {
            self.geometry = false;
        }
        self
    }

    fn set_zoom(&mut self, text: &str) {
        match text.parse::<f32>() {
            Ok(zoom) => self.zoom = zoom.max(MIN_ZOOM).min(MAX_ZOOM),
            Err(e) => warn!("ignoring zoom {:?}: {}", text, e),
        }
    }

    pub fn geometry_module(&self) -> Rc<dyn GeometryModule> {
        if self.geometry {
            Rc::new(HoleChecker)
        } else {
            Rc::new(Absent)
        }
    }
}

fn path_arg(name: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .value_name("FILE")
        .takes_value(true)
}

pub fn cli() -> App<'static, 'static> {
    App::new("ICFP2021 pose editor")
        .setting(AppSettings::VersionlessSubcommands)
        .arg(path_arg("problem").short("p").help("problem json to open"))
        .arg(path_arg("pose").short("s").help("pose json to load on top"))
        .arg(
            Arg::with_name("zoom")
                .long("zoom")
                .value_name("FACTOR")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("no-geometry")
                .long("no-geometry")
                .help("only check edge lengths"),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("validate a pose against a problem and print the result")
                .arg(path_arg("problem").short("p").required(true))
                .arg(path_arg("pose").short("s").required(true)),
        )
}
