use bevy_egui::egui;
use channel_map::SidebarEntry;

use crate::i18n::{
    channel_list_title, count_line, language_toggle_label, members_label, messages_label,
    open_channel_label, UiI18n, UiLocale,
};
use crate::logo_textures::LogoTextures;
use crate::map_canvas::circle_fill;

pub(super) const SIDEBAR_PANEL_ID: &str = "channel-map-sidebar";
pub(super) const SIDEBAR_DEFAULT_WIDTH: f32 = 300.0;
pub(super) const SIDEBAR_MIN_WIDTH: f32 = 220.0;
pub(super) const SIDEBAR_MAX_WIDTH: f32 = 480.0;
const SIDEBAR_LOGO_SIZE: f32 = 20.0;

/// Header, language toggle and the channel list. Returns the title of the
/// entry the user clicked, if any.
pub(super) fn render_sidebar(
    ui: &mut egui::Ui,
    i18n: &mut UiI18n,
    entries: &[SidebarEntry],
    logos: Option<&mut LogoTextures>,
) -> Option<String> {
    ui.horizontal(|ui| {
        ui.heading(channel_list_title(i18n.locale));
        if ui.small_button(language_toggle_label(i18n.locale)).clicked() {
            i18n.locale = i18n.locale.toggled();
        }
    });
    ui.separator();

    let mut selected = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            selected = render_channel_list(ui, i18n.locale, entries, logos);
        });
    selected
}

pub(super) fn render_channel_list(
    ui: &mut egui::Ui,
    locale: UiLocale,
    entries: &[SidebarEntry],
    mut logos: Option<&mut LogoTextures>,
) -> Option<String> {
    let mut selected = None;
    for entry in entries {
        let logo = match (logos.as_deref_mut(), entry.logo_url.as_deref()) {
            (Some(logos), Some(url)) => logos.texture_id(ui.ctx(), url),
            _ => None,
        };
        ui.horizontal(|ui| {
            if let Some(texture) = logo {
                ui.add(
                    egui::Image::new((texture, egui::vec2(SIDEBAR_LOGO_SIZE, SIDEBAR_LOGO_SIZE)))
                        .corner_radius(SIDEBAR_LOGO_SIZE / 2.0),
                );
            } else {
                paint_logo_placeholder(ui);
            }
            if ui.link(entry.title.as_str()).clicked() {
                selected = Some(entry.title.clone());
            }
        });
        ui.label(
            egui::RichText::new(entry_counts_text(entry, locale))
                .small()
                .weak(),
        );
        if let Some(link) = entry.link.as_deref() {
            ui.hyperlink_to(open_channel_label(locale), link);
        }
        ui.add_space(6.0);
    }
    selected
}

/// Same green as the map markers, for channels without a usable logo.
fn paint_logo_placeholder(ui: &mut egui::Ui) -> egui::Rect {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(SIDEBAR_LOGO_SIZE, SIDEBAR_LOGO_SIZE),
        egui::Sense::hover(),
    );
    ui.painter()
        .circle_filled(rect.center(), SIDEBAR_LOGO_SIZE / 2.0, circle_fill(1.0));
    rect
}

pub(super) fn entry_counts_text(entry: &SidebarEntry, locale: UiLocale) -> String {
    format!(
        "{} · {}",
        count_line(members_label(locale), entry.members_count, locale),
        count_line(messages_label(locale), entry.messages_count, locale)
    )
}
