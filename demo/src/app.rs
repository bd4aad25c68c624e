use crossbeam::channel::{Receiver, TryRecvError};
use eframe::CreationContext;
use egui::{CentralPanel, Color32, Context, RichText, ScrollArea, SidePanel, TextEdit, Ui};
use log::{error, info};

use egui_statespace::{import_tree_from_str, Diagram, RefreshRequest, StatespaceView};

use crate::fetch::{post_planning_request, FetchResult};
use crate::plugin::ShellPlugin;
use crate::status::{StatusKind, StatusQueue};

const DEFAULT_PLANNER_URL: &str = "http://solver.planning.domains/solve";
const EXPORT_FILE_NAME: &str = "statespace.json";

struct LoadedGraph {
    diagram: Diagram,
    raw_json: String,
}

pub struct DemoApp {
    loaded: Option<LoadedGraph>,
    pending_json: Option<String>,

    planner_url: String,
    domain: String,
    problem: String,
    fetch: Option<Receiver<FetchResult>>,

    status: StatusQueue,
}

impl Default for DemoApp {
    fn default() -> Self {
        Self {
            loaded: None,
            pending_json: None,
            planner_url: DEFAULT_PLANNER_URL.to_owned(),
            domain: String::new(),
            problem: String::new(),
            fetch: None,
            status: StatusQueue::default(),
        }
    }
}

impl DemoApp {
    pub fn new(_: &CreationContext<'_>) -> Self {
        Self::default()
    }

    fn load_graph(&mut self, ctx: &Context, text: &str) {
        match import_tree_from_str(text) {
            Ok(tree) => {
                info!("loaded graph with {} states", tree.node_count());
                StatespaceView::reset_metadata(ctx);
                self.loaded = Some(LoadedGraph {
                    diagram: Diagram::new(tree),
                    raw_json: text.to_owned(),
                });
                self.status.push_success("graph loaded");
            }
            Err(err) => {
                error!("import failed: {err}");
                self.status.push_error("failed to parse graph json");
            }
        }
    }

    fn handle_planner_response(&mut self, ctx: &Context, body: &str) {
        // The service reports failures as a JSON object with an "error"
        // field instead of an HTTP error status.
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => {
                if let Some(detail) = value.get("error") {
                    error!("planner rejected the request: {detail}");
                    self.status.push_error("planner rejected the request");
                } else {
                    self.load_graph(ctx, body);
                }
            }
            Err(err) => {
                error!("planner returned malformed json: {err}");
                self.status.push_error("planner returned malformed json");
            }
        }
    }

    fn poll_fetch(&mut self, ctx: &Context) {
        let Some(rx) = &self.fetch else { return };
        match rx.try_recv() {
            Ok(Ok(body)) => {
                self.fetch = None;
                self.handle_planner_response(ctx, &body);
            }
            Ok(Err(err)) => {
                self.fetch = None;
                error!("planner request failed: {err}");
                self.status.push_error("planner request failed");
            }
            Err(TryRecvError::Empty) => {
                ctx.request_repaint();
            }
            Err(TryRecvError::Disconnected) => {
                self.fetch = None;
                self.status.push_error("planner request failed");
            }
        }
    }

    fn import_from_file(&mut self, ctx: &Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("json", &["json"])
            .pick_file()
        else {
            return;
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => self.load_graph(ctx, &text),
            Err(err) => {
                error!("could not read {}: {err}", path.display());
                self.status.push_error("could not read the selected file");
            }
        }
    }

    fn export_to_file(&mut self) {
        let Some(loaded) = &self.loaded else { return };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(EXPORT_FILE_NAME)
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, &loaded.raw_json) {
            Ok(()) => self.status.push_success("graph saved"),
            Err(err) => {
                error!("could not write {}: {err}", path.display());
                self.status.push_error("could not save the graph");
            }
        }
    }

    fn controls(&mut self, ctx: &Context, ui: &mut Ui) {
        ui.heading("Planner");
        ui.label("URL");
        ui.add(TextEdit::singleline(&mut self.planner_url).desired_width(f32::INFINITY));
        ui.separator();

        ScrollArea::vertical().show(ui, |ui| {
            ui.label("Domain (PDDL)");
            ui.add(
                TextEdit::multiline(&mut self.domain)
                    .code_editor()
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
            ui.label("Problem (PDDL)");
            ui.add(
                TextEdit::multiline(&mut self.problem)
                    .code_editor()
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );

            ui.horizontal(|ui| {
                let idle = self.fetch.is_none();
                if ui
                    .add_enabled(idle, egui::Button::new("Generate"))
                    .clicked()
                {
                    self.status.push_info("requesting search tree");
                    self.fetch = Some(post_planning_request(
                        self.planner_url.clone(),
                        self.domain.clone(),
                        self.problem.clone(),
                    ));
                }
                if ui.button("Import...").clicked() {
                    self.import_from_file(ctx);
                }
            });
        });
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let has_graph = self.loaded.is_some();
            if ui
                .add_enabled(has_graph, egui::Button::new("Change Layout"))
                .clicked()
            {
                if let Some(loaded) = &mut self.loaded {
                    loaded.diagram.request(RefreshRequest::ToggleMode);
                }
            }
            if ui
                .add_enabled(has_graph, egui::Button::new("Download JSON"))
                .clicked()
            {
                self.export_to_file();
            }

            if let Some(loaded) = &self.loaded {
                ui.separator();
                ui.label(format!(
                    "Visited States: {}",
                    loaded.diagram.tree().node_count()
                ));
                ui.label(format!(
                    "Tree Height: {}",
                    loaded.diagram.tree().tree_height()
                ));
            }

            self.status.retain_active();
            if let Some(msg) = self.status.latest() {
                let color = match msg.kind {
                    StatusKind::Info => Color32::GRAY,
                    StatusKind::Success => Color32::from_rgb(0, 160, 0),
                    StatusKind::Error => Color32::from_rgb(200, 0, 0),
                };
                ui.separator();
                ui.label(RichText::new(&msg.text).color(color));
            }
        });
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        if let Some(text) = self.pending_json.take() {
            self.load_graph(ctx, &text);
        }
        self.poll_fetch(ctx);

        SidePanel::left("controls")
            .default_width(300.)
            .show(ctx, |ui| self.controls(ctx, ui));

        CentralPanel::default().show(ctx, |ui| {
            self.toolbar(ui);
            ui.separator();
            match &mut self.loaded {
                Some(loaded) => {
                    ui.add(&mut StatespaceView::new(&mut loaded.diagram));
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label("Generate or import a search tree to begin");
                    });
                }
            }
        });
    }
}

impl ShellPlugin for DemoApp {
    fn initialize(&mut self) {
        self.status.push_info("statespace viewer ready");
    }

    fn save(&mut self) -> Option<String> {
        self.loaded.as_ref().map(|l| l.raw_json.clone())
    }

    fn load(&mut self, saved: &str) {
        // Imported on the next frame, when an egui context is available.
        self.pending_json = Some(saved.to_owned());
    }
}
