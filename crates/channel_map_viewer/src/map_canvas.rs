use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use channel_map::{
    MarkerVisual, Millis, ScreenPoint, TooltipContent, ViewTransform, Viewport, CIRCLE_FILL_RGB,
};

use crate::i18n::{
    count_line, fullscreen_button_label, fullscreen_hover_text, load_failed_label, loading_label,
    members_label, messages_label, no_username_label, open_channel_label, UiI18n, UiLocale,
};
use crate::logo_textures::LogoTextures;
use crate::map_state::ChannelMapState;
use crate::sidebar_panel::{
    render_sidebar, SIDEBAR_DEFAULT_WIDTH, SIDEBAR_MAX_WIDTH, SIDEBAR_MIN_WIDTH, SIDEBAR_PANEL_ID,
};
use crate::viewer_config::MapViewerConfig;
use crate::now_millis;

const MAP_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(246, 247, 249);
const BOUNDARY_STROKE: egui::Color32 = egui::Color32::from_rgb(96, 110, 128);
const BOUNDARY_STROKE_WIDTH: f32 = 1.5;
const FULLSCREEN_BUTTON_SIZE: f32 = 32.0;
const FULLSCREEN_BUTTON_MARGIN: f32 = 8.0;
const CIRCLE_MESH_SEGMENTS: usize = 32;
const TOOLTIP_MAX_WIDTH: f32 = 260.0;

pub(super) fn render_channel_map_egui(
    mut contexts: EguiContexts,
    config: Res<MapViewerConfig>,
    time: Res<Time>,
    mut i18n: ResMut<UiI18n>,
    mut logos: ResMut<LogoTextures>,
    state: Option<ResMut<ChannelMapState>>,
) {
    let Ok(context) = contexts.ctx_mut() else {
        return;
    };
    let now = now_millis(&time);
    let Some(state) = state else {
        let locale = i18n.locale;
        egui::CentralPanel::default().show(context, |ui| {
            ui.label(loading_label(locale));
        });
        return;
    };
    let state = state.into_inner();

    let fullscreen = state
        .controller
        .as_ref()
        .map(|controller| controller.is_fullscreen())
        .unwrap_or(false);
    if !fullscreen {
        let selected = egui::SidePanel::right(SIDEBAR_PANEL_ID)
            .resizable(true)
            .default_width(SIDEBAR_DEFAULT_WIDTH)
            .width_range(SIDEBAR_MIN_WIDTH..=SIDEBAR_MAX_WIDTH)
            .show(context, |ui| {
                render_sidebar(ui, &mut i18n, &state.entries, Some(&mut *logos))
            })
            .inner;
        if let (Some(title), Some(controller)) = (selected, state.controller.as_mut()) {
            if controller.select_sidebar(&title, now).is_none() {
                warn!("sidebar entry has no marker: {title}");
            }
        }
    }

    let locale = i18n.locale;
    let container = context.content_rect().size();
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(MAP_BACKGROUND))
        .show(context, |ui| {
            render_map_canvas(ui, state, &config, &mut logos, locale, now, container);
        });
}

fn render_map_canvas(
    ui: &mut egui::Ui,
    state: &mut ChannelMapState,
    config: &MapViewerConfig,
    logos: &mut LogoTextures,
    locale: UiLocale,
    now: Millis,
    container: egui::Vec2,
) {
    let (rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let surface = Viewport::new(rect.width() as f64, rect.height() as f64);
    if state.ensure_controller(config, surface, now).is_none() {
        let text = if state.load_error.is_some() {
            load_failed_label(locale)
        } else {
            loading_label(locale)
        };
        ui.put(rect, egui::Label::new(text));
        return;
    }
    let Some(controller) = state.controller.as_mut() else {
        return;
    };

    if response.dragged() {
        let delta = response.drag_delta();
        if delta != egui::Vec2::ZERO {
            controller.pan(ScreenPoint::new(delta.x as f64, delta.y as f64), now);
        }
    }
    if let Some(pointer) = response.hover_pos() {
        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll != 0.0 {
            controller.zoom_wheel(canvas_local(rect, pointer), wheel_delta(scroll), now);
        }
    }
    if response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            if let Some(index) = controller.marker_at(canvas_local(rect, pointer), now) {
                controller.focus_marker(index, now);
            }
        }
    }
    match response.hover_pos() {
        Some(pointer) => {
            let local = canvas_local(rect, pointer);
            match controller.marker_at(local, now) {
                Some(index) => {
                    controller.hover(index, local, now);
                }
                None => controller.unhover(now),
            }
        }
        None if controller.hovered().is_some() => controller.unhover(now),
        None => {}
    }

    let view = controller.view_at(now);
    let painter = ui.painter_at(rect);
    for ring in controller.boundary_rings() {
        let points = ring
            .into_iter()
            .map(|point| surface_to_canvas(view, rect.min, point))
            .collect();
        painter.add(egui::Shape::closed_line(
            points,
            egui::Stroke::new(BOUNDARY_STROKE_WIDTH, BOUNDARY_STROKE),
        ));
    }

    for (index, marker) in controller.markers().iter().enumerate() {
        let Some(visual) = controller.visual(index) else {
            continue;
        };
        let center = surface_to_canvas(view, rect.min, marker.position);
        let radius = (visual.radius() * view.k * controller.marker_scale_at(index, now)) as f32;
        let opacity = controller.marker_opacity_at(index, now) as f32;
        let logo = match visual {
            MarkerVisual::Image { href, .. } => logos.texture_id(ui.ctx(), href),
            MarkerVisual::Circle { .. } => None,
        };
        match logo {
            Some(texture) => {
                let tint = egui::Color32::WHITE.gamma_multiply(opacity);
                painter.add(egui::Shape::mesh(circle_image_mesh(
                    texture, center, radius, tint,
                )));
            }
            None => {
                painter.circle_filled(center, radius, circle_fill(opacity));
            }
        }
    }

    if let Some(tooltip) = controller.tooltip() {
        render_tooltip(ui.ctx(), rect, tooltip, locale);
    }

    let button_rect = fullscreen_button_rect(rect);
    let fullscreen = controller.is_fullscreen();
    let button = ui
        .put(
            button_rect,
            egui::Button::new(fullscreen_button_label(fullscreen)),
        )
        .on_hover_text(fullscreen_hover_text(fullscreen, locale));
    if button.clicked() {
        let next = controller.toggle_fullscreen(Viewport::new(
            container.x as f64,
            container.y as f64,
        ));
        info!(
            "channel map fullscreen={} surface={}x{}",
            controller.is_fullscreen(),
            next.width,
            next.height
        );
    }
}

fn render_tooltip(ctx: &egui::Context, rect: egui::Rect, tooltip: &TooltipContent, locale: UiLocale) {
    let anchor = rect.min + egui::vec2(tooltip.anchor.x as f32, tooltip.anchor.y as f32);
    egui::Area::new(egui::Id::new("channel-map-tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(anchor)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(TOOLTIP_MAX_WIDTH);
                ui.strong(tooltip.name.as_str());
                if let Some(description) = tooltip.description.as_deref() {
                    ui.label(description);
                }
                ui.label(count_line(members_label(locale), tooltip.members_count, locale));
                ui.label(count_line(messages_label(locale), tooltip.messages_count, locale));
                match tooltip.link.as_deref() {
                    Some(link) => {
                        ui.hyperlink_to(open_channel_label(locale), link);
                    }
                    None => {
                        ui.weak(no_username_label(locale));
                    }
                }
            });
        });
}

/// Pointer position relative to the canvas origin.
pub(super) fn canvas_local(rect: egui::Rect, pointer: egui::Pos2) -> ScreenPoint {
    let local = pointer - rect.min;
    ScreenPoint::new(local.x as f64, local.y as f64)
}

pub(super) fn surface_to_canvas(view: ViewTransform, origin: egui::Pos2, point: ScreenPoint) -> egui::Pos2 {
    let screen = view.apply(point);
    origin + egui::vec2(screen.x as f32, screen.y as f32)
}

/// egui reports scroll-up as positive; the zoom behavior expects wheel `deltaY`.
pub(super) fn wheel_delta(scroll_y: f32) -> f64 {
    -(scroll_y as f64)
}

pub(super) fn circle_fill(opacity: f32) -> egui::Color32 {
    let [r, g, b] = CIRCLE_FILL_RGB;
    egui::Color32::from_rgb(r, g, b).gamma_multiply(opacity.clamp(0.0, 1.0))
}

pub(super) fn fullscreen_button_rect(canvas: egui::Rect) -> egui::Rect {
    let min = egui::pos2(
        canvas.right() - FULLSCREEN_BUTTON_MARGIN - FULLSCREEN_BUTTON_SIZE,
        canvas.top() + FULLSCREEN_BUTTON_MARGIN,
    );
    egui::Rect::from_min_size(min, egui::vec2(FULLSCREEN_BUTTON_SIZE, FULLSCREEN_BUTTON_SIZE))
}

/// Triangle fan that maps the full texture onto a disc, clipping the logo to a circle.
pub(super) fn circle_image_mesh(
    texture: egui::TextureId,
    center: egui::Pos2,
    radius: f32,
    tint: egui::Color32,
) -> egui::Mesh {
    let mut mesh = egui::Mesh::with_texture(texture);
    mesh.vertices.push(egui::epaint::Vertex {
        pos: center,
        uv: egui::pos2(0.5, 0.5),
        color: tint,
    });
    for step in 0..CIRCLE_MESH_SEGMENTS {
        let angle = step as f32 / CIRCLE_MESH_SEGMENTS as f32 * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        mesh.vertices.push(egui::epaint::Vertex {
            pos: center + egui::vec2(cos, sin) * radius,
            uv: egui::pos2(0.5 + 0.5 * cos, 0.5 + 0.5 * sin),
            color: tint,
        });
    }
    for step in 0..CIRCLE_MESH_SEGMENTS as u32 {
        let next = (step + 1) % CIRCLE_MESH_SEGMENTS as u32;
        mesh.add_triangle(0, step + 1, next + 1);
    }
    mesh
}
