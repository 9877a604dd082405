use eframe::{egui, epi};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::config::{Settings, MAX_ZOOM, MIN_ZOOM};
use crate::drag::Direction;
use crate::edge::Stretch;
use crate::point::Point;
use crate::scene::{self, Scene};
use crate::session::Session;

// Vertex dot radius and edge width, in screen pixels.
const VERTEX_RADIUS: f32 = 6.0;
const EDGE_WIDTH: f32 = 2.0;
const PAN_STEP: f32 = 100.0;

fn arrow_key(direction: Direction) -> egui::Key {
    match direction {
        Direction::Left => egui::Key::ArrowLeft,
        Direction::Up => egui::Key::ArrowUp,
        Direction::Right => egui::Key::ArrowRight,
        Direction::Down => egui::Key::ArrowDown,
    }
}

fn wasd_key(direction: Direction) -> egui::Key {
    match direction {
        Direction::Left => egui::Key::A,
        Direction::Up => egui::Key::W,
        Direction::Right => egui::Key::D,
        Direction::Down => egui::Key::S,
    }
}

/// The part of the UI state we keep between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct ViewState {
    problem_path: String,
    pose_path: String,
    zoom: f32,
    flip_wasd: bool,
    pan: [f32; 2],
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            problem_path: "problems/1.json".to_owned(),
            pose_path: "problems/1.json.solution.json".to_owned(),
            zoom: 4.0,
            flip_wasd: false,
            pan: [0.0, 0.0],
        }
    }
}

enum Action {
    LoadProblem,
    LoadPose,
    LoadPastedPose,
    SavePose,
}

pub struct EditorApp {
    settings: Settings,
    view: ViewState,
    session: Option<Session>,
    pasted_pose: String,
    status: String,
}

impl Default for EditorApp {
    fn default() -> Self {
        EditorApp::new(Settings::default())
    }
}

impl EditorApp {
    pub fn new(settings: Settings) -> Self {
        let mut view = ViewState {
            zoom: settings.zoom,
            ..ViewState::default()
        };
        if let Some(path) = &settings.problem {
            view.problem_path = path.display().to_string();
            view.pose_path = format!("{}.solution.json", view.problem_path);
        }
        if let Some(path) = &settings.pose {
            view.pose_path = path.display().to_string();
        }
        Self {
            settings,
            view,
            session: None,
            pasted_pose: String::new(),
            status: String::new(),
        }
    }

    fn ensure_session(&mut self) {
        if self.session.is_some() {
            return;
        }
        match Session::open(&self.settings) {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                error!("could not open problem: {}", e);
                self.status = e.to_string();
                self.session = Session::sample(self.settings.geometry_module()).ok();
            }
        }
    }

    fn apply(&mut self, action: Action) {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return,
        };
        let result = match action {
            Action::LoadProblem => session.load_problem_file(&self.view.problem_path),
            Action::LoadPose => session.load_pose_file(&self.view.pose_path),
            Action::LoadPastedPose => session.load_pose_text(&self.pasted_pose),
            Action::SavePose => {
                let path = format!("{}.solution.json", self.view.problem_path);
                let saved = session.save_pose_file(&path);
                if saved.is_ok() {
                    self.view.pose_path = path;
                }
                saved
            }
        };
        self.status = match result {
            Ok(()) => String::new(),
            Err(e) => {
                warn!("{}", e);
                e.to_string()
            }
        };
    }

    fn handle_keys(&mut self, ctx: &egui::CtxRef) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let input = ctx.input();
        let nudges: Vec<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|&d| input.key_pressed(arrow_key(d)))
            .collect();
        let pans: Vec<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|&d| input.key_pressed(wasd_key(d)))
            .collect();

        let sign = if self.view.flip_wasd { -1.0 } else { 1.0 };
        for d in pans {
            let [dx, dy] = d.delta();
            self.view.pan[0] += sign * PAN_STEP * dx as f32;
            self.view.pan[1] += sign * PAN_STEP * dy as f32;
        }
        if let Some(session) = self.session.as_mut() {
            for d in nudges {
                session.nudge(d);
            }
        }
    }

    fn side_panel(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.heading("Problem");
        ui.horizontal(|ui| {
            ui.label("File: ");
            ui.text_edit_singleline(&mut self.view.problem_path);
        });
        if ui.button("Load problem").clicked() {
            actions.push(Action::LoadProblem);
        }

        ui.separator();
        ui.heading("Pose");
        ui.horizontal(|ui| {
            ui.label("File: ");
            ui.text_edit_singleline(&mut self.view.pose_path);
        });
        ui.horizontal(|ui| {
            if ui.button("Load pose").clicked() {
                actions.push(Action::LoadPose);
            }
            if ui.button("Save").clicked() {
                actions.push(Action::SavePose);
            }
        });
        ui.label("Paste a pose:");
        ui.text_edit_multiline(&mut self.pasted_pose);
        if ui.button("Load pasted pose").clicked() {
            actions.push(Action::LoadPastedPose);
        }

        ui.separator();
        ui.add(egui::Slider::new(&mut self.view.zoom, MIN_ZOOM..=MAX_ZOOM).text("zoom"));
        ui.checkbox(&mut self.view.flip_wasd, "Flip WASD");

        if !self.status.is_empty() {
            ui.colored_label(egui::Color32::RED, self.status.as_str());
        }

        if let Some(session) = &self.session {
            let model = session.model();
            let report = model.report();
            ui.separator();
            ui.label(format!("Geometry: {}", session.geometry().name()));
            ui.label(format!("Epsilon: {}", model.epsilon()));
            let count = |stretch| model.edges().iter().filter(|e| e.stretch() == stretch).count();
            ui.label(format!(
                "Edges too short: {}, too long: {}",
                count(Stretch::TooShort),
                count(Stretch::TooLong)
            ));
            if let Some(verdict) = &report.verdict {
                ui.label(format!(
                    "Rejected: {} vertices, {} edges",
                    verdict.invalid_vertices().count(),
                    verdict.invalid_edges().count()
                ));
            }
            if let Some(dislikes) = report.dislikes {
                ui.label(format!("Dislikes: {}", dislikes));
            }
            if let Some(score) = report.score {
                ui.label(format!("Pair distance violations: {}", score));
            }
            if let Some(v) = session.drag().last_dragged() {
                ui.label(format!("Arrow keys move vertex {}", v));
            }
            ui.separator();
            ui.label("Output:");
            let mut output = model.output().to_owned();
            egui::ScrollArea::auto_sized().show(ui, |ui| {
                ui.text_edit_multiline(&mut output);
            });
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return,
        };
        let desired_size = ui.available_size();
        if desired_size.x == 0.0 || desired_size.y == 0.0 {
            return;
        }
        let (response, painter) = ui.allocate_painter(desired_size, egui::Sense::drag());
        let zoom = self.view.zoom;
        let origin = response.rect.min + egui::vec2(self.view.pan[0], self.view.pan[1]);
        let to_screen =
            |p: Point| egui::pos2(origin.x + p.x as f32 * zoom, origin.y + p.y as f32 * zoom);
        let from_screen = |p: egui::Pos2| {
            Point::new(
                ((p.x - origin.x) / zoom) as f64,
                ((p.y - origin.y) / zoom) as f64,
            )
        };

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                session.press(from_screen(pos), (VERTEX_RADIUS / zoom) as f64);
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                session.drag_to(from_screen(pos));
            }
        }
        if response.drag_released() {
            session.release();
        }

        let scene = Scene::build(session.model(), session.drag());
        let mut shapes = vec![egui::Shape::rect_filled(
            response.rect,
            0.0,
            scene::background(),
        )];
        let hole = scene.hole.iter().map(|&p| to_screen(p)).collect();
        shapes.push(egui::Shape::closed_line(
            hole,
            egui::Stroke::new(2.0, scene::hole_stroke()),
        ));
        for edge in &scene.edges {
            shapes.push(egui::Shape::line_segment(
                [to_screen(edge.from), to_screen(edge.to)],
                egui::Stroke::new(EDGE_WIDTH, edge.color),
            ));
        }
        painter.extend(shapes);

        for corner in &scene.corners {
            painter.text(
                to_screen(corner.at),
                egui::Align2::CENTER_CENTER,
                corner.index,
                egui::TextStyle::Small,
                egui::Color32::WHITE,
            );
        }

        let mut shapes = vec![];
        for vertex in &scene.vertices {
            shapes.push(egui::Shape::circle_filled(
                to_screen(vertex.center),
                VERTEX_RADIUS,
                vertex.color,
            ));
        }
        // An annulus is a circle stroke as wide as the ring.
        for hint in &scene.hints {
            let width = ((hint.outer - hint.inner) as f32 * zoom).max(1.0);
            let radius = (hint.outer + hint.inner) as f32 * 0.5 * zoom;
            shapes.push(egui::Shape::circle_stroke(
                to_screen(hint.center),
                radius,
                egui::Stroke::new(width, scene::hint_fill()),
            ));
        }
        painter.extend(shapes);

        if session.drag().active().is_some() {
            ui.ctx().request_repaint();
        }
    }
}

impl epi::App for EditorApp {
    fn name(&self) -> &str {
        "icfp 2021 pose editor"
    }

    /// Called by the framework to load old app state (if any).
    #[cfg(feature = "persistence")]
    fn setup(
        &mut self,
        _ctx: &egui::CtxRef,
        _frame: &mut epi::Frame<'_>,
        storage: Option<&dyn epi::Storage>,
    ) {
        if let Some(storage) = storage {
            if let Some(view) = epi::get_value::<ViewState>(storage, epi::APP_KEY) {
                tracing::debug!("restored view state");
                let keep_paths = self.settings.problem.is_some();
                let (problem_path, pose_path) =
                    (self.view.problem_path.clone(), self.view.pose_path.clone());
                self.view = view;
                if keep_paths {
                    self.view.problem_path = problem_path;
                    self.view.pose_path = pose_path;
                }
            }
        }
    }

    /// Called by the frame work to save state before shutdown.
    #[cfg(feature = "persistence")]
    fn save(&mut self, storage: &mut dyn epi::Storage) {
        epi::set_value(storage, epi::APP_KEY, &self.view);
    }

    fn update(&mut self, ctx: &egui::CtxRef, frame: &mut epi::Frame<'_>) {
        self.ensure_session();
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                egui::menu::menu(ui, "File", |ui| {
                    if ui.button("Quit").clicked() {
                        frame.quit();
                    }
                });
            });
        });

        let mut actions = vec![];
        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            self.side_panel(ui, &mut actions);
        });
        for action in actions {
            self.apply(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                self.canvas(ui);
            });
        });
    }
}
