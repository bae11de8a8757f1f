use std::{path::PathBuf, sync::Arc};

use analysis_client::AnalysisKind;
use crossbeam_channel::{Receiver, Sender};
use egui::{Align, Color32, RichText};
use map_provider::MapSurface;
use reef_core::{MapLifecycle, ReefMapController};
use shared::{
    catalog::ReefCatalog,
    domain::{ReefName, ReefRecord, ReefStatus},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    classify_map_bootstrap_failure, UiError, UiErrorCategory, UiErrorContext, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;
use crate::map::surface::EguiMapSurface;
use crate::ui::{content, theme};

const MAP_SECTION_HEIGHT: f32 = 440.0;

#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Capability => "Map capability",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Overview,
    CoralHealth,
    DetectDebris,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverviewSection {
    Home,
    Corals,
    Map,
    Analysis,
}

enum AnalysisPhase {
    Idle,
    Analyzing,
    Completed(String),
    Failed(String),
}

struct AnalysisPageState {
    picked: Option<PathBuf>,
    preview: Option<PreviewImage>,
    preview_error: Option<String>,
    texture: Option<egui::TextureHandle>,
    phase: AnalysisPhase,
}

impl AnalysisPageState {
    fn new() -> Self {
        Self {
            picked: None,
            preview: None,
            preview_error: None,
            texture: None,
            phase: AnalysisPhase::Idle,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn is_analyzing(&self) -> bool {
        matches!(self.phase, AnalysisPhase::Analyzing)
    }
}

enum PageAction {
    PickFile,
    RemoveImage,
    Analyze,
}

pub struct CoralWatchApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    view: AppView,
    scroll_to: Option<OverviewSection>,

    map: ReefMapController,
    map_surface: Option<Arc<EguiMapSurface>>,
    map_init_requested: bool,

    coral_health: AnalysisPageState,
    detect_debris: AnalysisPageState,

    status: String,
    status_banner: Option<StatusBanner>,

    theme_applied: bool,
    tick: u64,
}

impl CoralWatchApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view: AppView::Overview,
            scroll_to: None,
            map: ReefMapController::new(ReefCatalog::builtin()),
            map_surface: None,
            map_init_requested: false,
            coral_health: AnalysisPageState::new(),
            detect_debris: AnalysisPageState::new(),
            status: "Starting backend worker...".to_string(),
            status_banner: None,
            theme_applied: false,
            tick: 0,
        }
    }

    fn page_state_mut(&mut self, kind: AnalysisKind) -> &mut AnalysisPageState {
        match kind {
            AnalysisKind::CoralHealth => &mut self.coral_health,
            AnalysisKind::DebrisDetection => &mut self.detect_debris,
        }
    }

    /// Requests the map capability exactly once per process; the backend
    /// worker coalesces repeats anyway.
    fn ensure_map_initialized(&mut self) {
        if self.map_init_requested {
            return;
        }
        self.map_init_requested = true;
        dispatch_backend_command(&self.cmd_tx, BackendCommand::InitializeMap, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    if matches!(
                        err.context(),
                        UiErrorContext::BackendStartup | UiErrorContext::MapBootstrap
                    ) {
                        self.status_banner = Some(StatusBanner {
                            severity: StatusBannerSeverity::Error,
                            message: self.status.clone(),
                        });
                    }
                }
                UiEvent::MapSurfaceReady(surface) => {
                    self.map_surface = Some(surface.clone());
                    let dyn_surface: Arc<dyn MapSurface> = surface;
                    self.map.attach_surface(dyn_surface);
                    self.status = "Reef map ready".to_string();
                }
                UiEvent::MapCapabilityFailed(reason) => {
                    let friendly = classify_map_bootstrap_failure(&reason);
                    self.map.capability_failed(reason);
                    self.status = friendly.clone();
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: friendly,
                    });
                }
                UiEvent::AnalysisPreviewLoaded { kind, image } => {
                    let state = self.page_state_mut(kind);
                    state.preview = Some(image);
                    state.preview_error = None;
                    state.texture = None;
                }
                UiEvent::AnalysisPreviewFailed { kind, reason } => {
                    let state = self.page_state_mut(kind);
                    state.preview = None;
                    state.texture = None;
                    state.preview_error = Some(reason.clone());
                    self.status = format!("Preview failed: {reason}");
                }
                UiEvent::AnalysisCompleted { kind, result } => {
                    let pretty = serde_json::to_string_pretty(&result)
                        .unwrap_or_else(|_| result.to_string());
                    self.page_state_mut(kind).phase = AnalysisPhase::Completed(pretty);
                    self.status = format!("{} complete", kind.label());
                }
                UiEvent::AnalysisFailed { kind, reason } => {
                    self.page_state_mut(kind).phase = AnalysisPhase::Failed(reason.clone());
                    let err = UiError::from_message(UiErrorContext::Analysis, reason);
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                }
            }
        }
    }

    // ---------- chrome ----------

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("coralwatch_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Coral")
                        .size(22.0)
                        .strong()
                        .color(theme::CORAL),
                );
                ui.label(RichText::new("Watch").size(22.0).strong());
                ui.add_space(16.0);

                if ui.selectable_label(self.view == AppView::Overview, "Home").clicked() {
                    self.view = AppView::Overview;
                    self.scroll_to = Some(OverviewSection::Home);
                }
                if ui.button("About Corals").clicked() {
                    self.view = AppView::Overview;
                    self.scroll_to = Some(OverviewSection::Corals);
                }
                if ui.button("Reef Map").clicked() {
                    self.view = AppView::Overview;
                    self.scroll_to = Some(OverviewSection::Map);
                }
                if ui.button("AI Analysis").clicked() {
                    self.view = AppView::Overview;
                    self.scroll_to = Some(OverviewSection::Analysis);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let explore = egui::Button::new(RichText::new("Explore Reefs").strong())
                        .fill(theme::CORAL.gamma_multiply(0.85));
                    if ui.add(explore).clicked() {
                        self.view = AppView::Overview;
                        self.scroll_to = Some(OverviewSection::Map);
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("coralwatch_status").show(ctx, |ui| {
            if let Some(banner) = self.status_banner.clone() {
                let (fill, stroke) = match banner.severity {
                    StatusBannerSeverity::Error => (
                        Color32::from_rgb(111, 53, 53),
                        egui::Stroke::new(1.0, Color32::from_rgb(175, 96, 96)),
                    ),
                };
                egui::Frame::NONE
                    .fill(fill)
                    .stroke(stroke)
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(8, 6))
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(RichText::new(&banner.message).color(Color32::WHITE));
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("Dismiss").clicked() {
                                        self.status_banner = None;
                                    }
                                },
                            );
                        });
                    });
            }
            ui.horizontal(|ui| {
                ui.small("Status:");
                ui.small(RichText::new(&self.status).weak());
            });
        });
    }

    // ---------- overview sections ----------

    fn show_overview(&mut self, ctx: &egui::Context) {
        let scroll_to = self.scroll_to.take();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let sections = [
                        OverviewSection::Home,
                        OverviewSection::Corals,
                        OverviewSection::Analysis,
                        OverviewSection::Map,
                    ];
                    for section in sections {
                        let rect = ui
                            .scope(|ui| match section {
                                OverviewSection::Home => self.hero_section(ui),
                                OverviewSection::Corals => self.coral_info_section(ui),
                                OverviewSection::Analysis => self.analysis_cards_section(ui),
                                OverviewSection::Map => self.map_section(ui),
                            })
                            .response
                            .rect;
                        if scroll_to == Some(section) {
                            ui.scroll_to_rect(rect, Some(Align::Min));
                        }
                        ui.add_space(28.0);
                    }
                });
        });
    }

    fn hero_section(&mut self, ui: &mut egui::Ui) {
        egui::Frame::NONE
            .fill(theme::CARD_FILL)
            .corner_radius(16.0)
            .inner_margin(egui::Margin::symmetric(24, 28))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.add_space((ui.available_width() / 2.0 - 110.0).max(0.0));
                        ui.label(
                            RichText::new("Coral")
                                .size(44.0)
                                .strong()
                                .color(theme::CORAL),
                        );
                        ui.label(RichText::new("Watch").size(44.0).strong());
                    });
                    ui.add_space(6.0);
                    ui.label(RichText::new(content::HERO_TAGLINE).size(20.0).weak());
                    ui.label(
                        RichText::new(content::HERO_TAGLINE_EMPHASIS)
                            .size(24.0)
                            .strong()
                            .color(theme::ACCENT),
                    );
                    ui.add_space(10.0);
                    ui.label(RichText::new(content::HERO_BODY).size(14.0));
                    ui.add_space(14.0);

                    ui.horizontal_wrapped(|ui| {
                        ui.add_space((ui.available_width() / 2.0 - 240.0).max(0.0));
                        if ui
                            .button(RichText::new("\u{25b6} Explore Coral Reefs").strong())
                            .clicked()
                        {
                            self.scroll_to = Some(OverviewSection::Map);
                        }
                        if ui.button("\u{1f4cd} View Reef Map").clicked() {
                            self.scroll_to = Some(OverviewSection::Map);
                        }
                        if ui.button("\u{1f4d6} Learn Why Corals Matter").clicked() {
                            self.scroll_to = Some(OverviewSection::Corals);
                        }
                    });
                });
            });
    }

    fn coral_info_section(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading(RichText::new("What Are Coral Reefs?").size(30.0));
            ui.add_space(4.0);
            ui.label(RichText::new(content::CORALS_INTRO).weak());
        });
        ui.add_space(16.0);

        ui.vertical_centered(|ui| {
            ui.heading("Types of Corals");
        });
        ui.add_space(8.0);
        ui.columns(3, |columns| {
            for (column, card) in columns.iter_mut().zip(content::CORAL_TYPES.iter()) {
                egui::Frame::NONE
                    .fill(theme::CARD_FILL)
                    .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
                    .corner_radius(10.0)
                    .inner_margin(egui::Margin::symmetric(12, 12))
                    .show(column, |ui| {
                        ui.label(RichText::new(card.glyph).size(26.0));
                        ui.label(RichText::new(card.title).strong().size(16.0));
                        ui.label(RichText::new(card.description).weak());
                    });
            }
        });
        ui.add_space(20.0);

        ui.columns(2, |columns| {
            columns[0].heading("Why Coral Reefs Matter");
            columns[0].add_space(6.0);
            for point in &content::IMPORTANCE {
                columns[0].horizontal_wrapped(|ui| {
                    ui.label(RichText::new("\u{2022}").color(theme::ACCENT).strong());
                    ui.label(RichText::new(point.heading).strong());
                    ui.label(RichText::new(point.detail).weak());
                });
            }

            egui::Frame::NONE
                .fill(theme::CARD_FILL)
                .corner_radius(12.0)
                .inner_margin(egui::Margin::symmetric(16, 14))
                .show(&mut columns[1], |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("25%")
                                .size(40.0)
                                .strong()
                                .color(theme::ACCENT),
                        );
                        ui.label("of marine species depend on coral reefs");
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new("500M+")
                                .size(30.0)
                                .strong()
                                .color(theme::CORAL),
                        );
                        ui.label("people rely on reefs for food and income");
                    });
                });
        });
        ui.add_space(20.0);

        ui.vertical_centered(|ui| {
            ui.heading("Why We Must Save Coral Reefs");
            ui.add_space(4.0);
            ui.label(RichText::new(content::THREATS_INTRO).weak());
        });
        ui.add_space(8.0);
        ui.columns(3, |columns| {
            for (column, threat) in columns.iter_mut().zip(content::THREATS.iter()) {
                let (badge_bg, badge_fg) = theme::impact_badge_colors(threat.impact);
                egui::Frame::NONE
                    .fill(theme::CARD_FILL)
                    .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
                    .corner_radius(10.0)
                    .inner_margin(egui::Margin::symmetric(12, 12))
                    .show(column, |ui| {
                        egui::Frame::NONE
                            .fill(badge_bg)
                            .corner_radius(8.0)
                            .inner_margin(egui::Margin::symmetric(8, 3))
                            .show(ui, |ui| {
                                ui.label(
                                    RichText::new(threat.impact.label())
                                        .small()
                                        .color(badge_fg),
                                );
                            });
                        ui.label(RichText::new(threat.title).strong().size(16.0));
                        ui.label(RichText::new(threat.description).weak());
                    });
            }
        });
    }

    fn analysis_cards_section(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading(RichText::new("AI-Powered Analysis").size(26.0));
            ui.add_space(4.0);
            ui.label(RichText::new(content::ANALYSIS_INTRO).weak());
        });
        ui.add_space(10.0);

        let mut open_view = None;
        ui.columns(2, |columns| {
            for (column, (kind, view)) in columns.iter_mut().zip([
                (AnalysisKind::CoralHealth, AppView::CoralHealth),
                (AnalysisKind::DebrisDetection, AppView::DetectDebris),
            ]) {
                let copy = content::analysis_card(kind);
                egui::Frame::NONE
                    .fill(theme::CARD_FILL)
                    .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
                    .corner_radius(12.0)
                    .inner_margin(egui::Margin::symmetric(16, 14))
                    .show(column, |ui| {
                        ui.label(RichText::new(copy.glyph).size(30.0));
                        ui.label(RichText::new(copy.title).strong().size(18.0));
                        ui.label(RichText::new(copy.description).weak());
                        ui.add_space(8.0);
                        if ui
                            .button(RichText::new("Get Started \u{2192}").color(theme::ACCENT))
                            .clicked()
                        {
                            open_view = Some(view);
                        }
                    });
            }
        });
        if let Some(view) = open_view {
            self.view = view;
        }
    }

    // ---------- map section ----------

    fn map_section(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading(RichText::new("Global Coral Reef Map").size(26.0));
            ui.add_space(4.0);
            ui.label(RichText::new(content::MAP_INTRO).weak());
        });
        ui.add_space(10.0);

        let lifecycle = self.map.lifecycle().clone();
        let surface = self.map_surface.clone();
        let panel_width = (ui.available_width() * 0.28).clamp(220.0, 340.0);
        let map_width = ui.available_width() - panel_width - 16.0;

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(map_width);
                match (&lifecycle, &surface) {
                    (MapLifecycle::Ready, Some(surface)) => {
                        surface.show(ui, egui::vec2(map_width, MAP_SECTION_HEIGHT));
                    }
                    (MapLifecycle::Failed(reason), _) => {
                        self.map_placeholder(
                            ui,
                            map_width,
                            "Interactive map unavailable",
                            "The map capability failed to load. Restart the app to retry.",
                            Some(reason),
                        );
                    }
                    _ => {
                        self.map_placeholder(
                            ui,
                            map_width,
                            "Loading Interactive Map",
                            "Please wait while we load the coral reef locations...",
                            None,
                        );
                    }
                }
            });

            ui.vertical(|ui| {
                ui.set_width(panel_width);
                self.reef_info_panel(ui);
            });
        });
    }

    fn map_placeholder(
        &self,
        ui: &mut egui::Ui,
        width: f32,
        title: &str,
        body: &str,
        detail: Option<&str>,
    ) {
        egui::Frame::NONE
            .fill(theme::PANEL_FILL)
            .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
            .corner_radius(12.0)
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(width, MAP_SECTION_HEIGHT));
                ui.vertical_centered(|ui| {
                    ui.add_space(MAP_SECTION_HEIGHT * 0.35);
                    ui.label(RichText::new("\u{1f4cd}").size(36.0).color(theme::ACCENT));
                    ui.label(RichText::new(title).strong().size(18.0));
                    ui.label(RichText::new(body).weak());
                    if let Some(detail) = detail {
                        ui.small(RichText::new(detail).weak());
                    }
                });
            });
    }

    fn reef_info_panel(&mut self, ui: &mut egui::Ui) {
        let selected = self.map.selected().cloned();
        let mut clicked: Option<ReefName> = None;

        egui::Frame::NONE
            .fill(theme::CARD_FILL)
            .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(12, 12))
            .show(ui, |ui| {
                ui.set_min_height(MAP_SECTION_HEIGHT - 24.0);
                ui.label(RichText::new("Coral Reef Locations").strong().size(17.0));
                ui.add_space(6.0);

                match &selected {
                    Some(record) => clicked = Self::reef_detail(ui, record),
                    None => {
                        ui.label(
                            RichText::new(
                                "Click on any coral reef marker on the map to view detailed \
                                 information about that location.",
                            )
                            .weak(),
                        );
                        ui.add_space(6.0);
                        let records: Vec<ReefRecord> =
                            self.map.catalog().iter().cloned().collect();
                        egui::ScrollArea::vertical()
                            .auto_shrink([false, false])
                            .show(ui, |ui| {
                                for record in &records {
                                    if Self::reef_list_entry(ui, record) {
                                        clicked = Some(record.name.clone());
                                    }
                                    ui.add_space(4.0);
                                }
                            });
                    }
                }
            });

        if let Some(name) = clicked {
            self.map.select(&name);
        }
    }

    fn reef_detail(ui: &mut egui::Ui, record: &ReefRecord) -> Option<ReefName> {
        let mut recenter = None;

        ui.label(
            RichText::new(record.name.as_str())
                .strong()
                .size(16.0)
                .color(theme::ACCENT),
        );
        ui.label(RichText::new(&record.country).weak());
        ui.add_space(4.0);
        ui.label(&record.description);
        ui.add_space(6.0);

        Self::status_badge(ui, &record.status, true);
        ui.add_space(8.0);

        egui::Frame::NONE
            .fill(theme::PANEL_FILL)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.label(RichText::new("Coordinates").strong().color(theme::ACCENT));
                ui.small(format!(
                    "Latitude: {}",
                    record.coordinates.formatted_lat()
                ));
                ui.small(format!(
                    "Longitude: {}",
                    record.coordinates.formatted_lon()
                ));
            });
        ui.add_space(8.0);

        let full_width = ui.available_width();
        if ui
            .add_sized([full_width, 30.0], egui::Button::new("Center on Map"))
            .clicked()
        {
            recenter = Some(record.name.clone());
        }
        // No destination exists for this yet.
        ui.add_enabled(
            false,
            egui::Button::new("Learn More").min_size(egui::vec2(full_width, 30.0)),
        );

        recenter
    }

    fn reef_list_entry(ui: &mut egui::Ui, record: &ReefRecord) -> bool {
        let response = egui::Frame::NONE
            .fill(theme::PANEL_FILL)
            .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.label(RichText::new(record.name.as_str()).strong());
                ui.small(RichText::new(&record.country).weak());
                Self::status_badge(ui, &record.status, false);
            })
            .response;

        let response = response.interact(egui::Sense::click());
        response.clicked()
    }

    fn status_badge(ui: &mut egui::Ui, status: &ReefStatus, with_prefix: bool) {
        let (badge_bg, badge_fg) = theme::status_badge_colors(status);
        let text = if with_prefix {
            format!("Status: {status}")
        } else {
            status.to_string()
        };
        egui::Frame::NONE
            .fill(badge_bg)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(8, 3))
            .show(ui, |ui| {
                ui.label(RichText::new(text).small().color(badge_fg));
            });
    }

    // ---------- analysis pages ----------

    fn show_analysis_page(&mut self, ctx: &egui::Context, kind: AnalysisKind) {
        let copy = content::analysis_card(kind);
        let mut go_home = false;
        let mut action: Option<PageAction> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if ui.button("\u{2190} Back to Dashboard").clicked() {
                        go_home = true;
                    }
                    ui.add_space(10.0);

                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(copy.glyph).size(40.0));
                        ui.heading(RichText::new(copy.title).size(28.0));
                        ui.label(RichText::new(copy.description).weak());
                    });
                    ui.add_space(14.0);

                    let state = match kind {
                        AnalysisKind::CoralHealth => &mut self.coral_health,
                        AnalysisKind::DebrisDetection => &mut self.detect_debris,
                    };

                    egui::Frame::NONE
                        .fill(theme::CARD_FILL)
                        .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
                        .corner_radius(12.0)
                        .inner_margin(egui::Margin::symmetric(18, 16))
                        .show(ui, |ui| {
                            ui.label(RichText::new(copy.upload_title).strong().size(17.0));
                            ui.small("Supported formats: JPG, PNG, WEBP (Max 10MB)");
                            ui.add_space(10.0);

                            let picked = state.picked.clone();
                            match &picked {
                                None => {
                                    ui.vertical_centered(|ui| {
                                        ui.add_space(24.0);
                                        ui.label(RichText::new("\u{2b06}").size(34.0).weak());
                                        ui.label(
                                            RichText::new("Drag & Drop Your Image")
                                                .strong()
                                                .size(16.0),
                                        );
                                        ui.label(
                                            RichText::new("or click to browse from your device")
                                                .weak(),
                                        );
                                        ui.add_space(8.0);
                                        if ui.button("Choose File").clicked() {
                                            action = Some(PageAction::PickFile);
                                        }
                                        ui.add_space(24.0);
                                    });
                                    if let Some(reason) = &state.preview_error {
                                        ui.colored_label(
                                            Color32::from_rgb(252, 165, 165),
                                            reason,
                                        );
                                    }
                                }
                                Some(path) => {
                                    Self::show_preview(ui, state, kind);
                                    ui.small(RichText::new(path.display().to_string()).weak());
                                    ui.add_space(8.0);

                                    ui.horizontal(|ui| {
                                        let busy = state.is_analyzing();
                                        if ui
                                            .add_enabled(
                                                !busy,
                                                egui::Button::new("Remove Image"),
                                            )
                                            .clicked()
                                        {
                                            action = Some(PageAction::RemoveImage);
                                        }
                                        let analyze_label = if busy {
                                            "Analyzing..."
                                        } else {
                                            "Analyze"
                                        };
                                        if ui
                                            .add_enabled(
                                                !busy,
                                                egui::Button::new(
                                                    RichText::new(analyze_label).strong(),
                                                )
                                                .fill(theme::CORAL.gamma_multiply(0.85)),
                                            )
                                            .clicked()
                                        {
                                            action = Some(PageAction::Analyze);
                                        }
                                        if busy {
                                            ui.add(egui::Spinner::new());
                                        }
                                    });

                                    Self::show_analysis_result(ui, state);
                                }
                            }
                        });
                });
        });

        if go_home {
            self.view = AppView::Overview;
        }
        match action {
            Some(PageAction::PickFile) => self.pick_analysis_file(kind),
            Some(PageAction::RemoveImage) => self.page_state_mut(kind).reset(),
            Some(PageAction::Analyze) => self.start_analysis(kind),
            None => {}
        }
    }

    fn show_preview(ui: &mut egui::Ui, state: &mut AnalysisPageState, kind: AnalysisKind) {
        if let Some(preview) = &state.preview {
            if state.texture.is_none() {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [preview.width, preview.height],
                    &preview.rgba,
                );
                state.texture = Some(ui.ctx().load_texture(
                    format!("analysis-preview-{kind:?}"),
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
            if let Some(texture) = &state.texture {
                let size = egui::vec2(preview.width as f32, preview.height as f32);
                ui.vertical_centered(|ui| {
                    ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                });
            }
        } else if state.preview_error.is_none() {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.weak("Loading preview...");
            });
        }
    }

    fn show_analysis_result(ui: &mut egui::Ui, state: &AnalysisPageState) {
        match &state.phase {
            AnalysisPhase::Completed(json) => {
                ui.add_space(10.0);
                egui::Frame::NONE
                    .fill(theme::PANEL_FILL)
                    .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new("Analysis Results")
                                    .strong()
                                    .color(theme::ACCENT),
                            );
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("Copy JSON").clicked() {
                                        ui.ctx().copy_text(json.clone());
                                    }
                                },
                            );
                        });
                        ui.separator();
                        egui::ScrollArea::vertical().max_height(280.0).show(ui, |ui| {
                            ui.label(RichText::new(json).monospace().size(12.0));
                        });
                    });
            }
            AnalysisPhase::Failed(reason) => {
                ui.add_space(10.0);
                ui.colored_label(
                    Color32::from_rgb(252, 165, 165),
                    format!("Analysis failed: {reason}"),
                );
            }
            AnalysisPhase::Idle | AnalysisPhase::Analyzing => {}
        }
    }

    fn pick_analysis_file(&mut self, kind: AnalysisKind) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
            .pick_file();
        if let Some(path) = picked {
            let state = self.page_state_mut(kind);
            state.reset();
            state.picked = Some(path.clone());
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::LoadAnalysisPreview { kind, path },
                &mut self.status,
            );
        }
    }

    fn start_analysis(&mut self, kind: AnalysisKind) {
        let Some(path) = self.page_state_mut(kind).picked.clone() else {
            self.status = "Choose an image before analyzing".to_string();
            return;
        };
        self.page_state_mut(kind).phase = AnalysisPhase::Analyzing;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::AnalyzeImage { kind, path },
            &mut self.status,
        );
    }
}

impl eframe::App for CoralWatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick = self.tick.wrapping_add(1);
        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }

        self.ensure_map_initialized();
        self.process_ui_events();
        self.map.poll_surface_events();

        self.show_header(ctx);
        self.show_status_bar(ctx);
        match self.view {
            AppView::Overview => self.show_overview(ctx),
            AppView::CoralHealth => self.show_analysis_page(ctx, AnalysisKind::CoralHealth),
            AppView::DetectDebris => self.show_analysis_page(ctx, AnalysisKind::DebrisDetection),
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.map.detach();
        self.map_surface = None;
    }
}
