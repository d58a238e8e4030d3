use std::collections::HashMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bevy::prelude::*;
use bevy_egui::egui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum LogoDecodeError {
    NotDataUrl,
    NotBase64,
    Base64(String),
    Image(String),
}

impl fmt::Display for LogoDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoDecodeError::NotDataUrl => write!(f, "logo is not a data URL"),
            LogoDecodeError::NotBase64 => write!(f, "logo data URL is not base64 encoded"),
            LogoDecodeError::Base64(message) => write!(f, "logo base64 invalid: {message}"),
            LogoDecodeError::Image(message) => write!(f, "logo image invalid: {message}"),
        }
    }
}

impl std::error::Error for LogoDecodeError {}

/// Decodes `data:image/...;base64,<payload>` into RGBA pixels.
pub(super) fn decode_data_url(url: &str) -> Result<egui::ColorImage, LogoDecodeError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or(LogoDecodeError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(LogoDecodeError::NotDataUrl)?;
    if !header.ends_with(";base64") {
        return Err(LogoDecodeError::NotBase64);
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|err| LogoDecodeError::Base64(err.to_string()))?;
    let image =
        image::load_from_memory(&bytes).map_err(|err| LogoDecodeError::Image(err.to_string()))?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

enum LogoSlot {
    Loaded(egui::TextureHandle),
    Failed,
}

/// Uploaded logo textures keyed by their URL. A logo that fails to decode is
/// remembered so the warning is logged once and the circle is drawn instead.
#[derive(Resource, Default)]
pub(super) struct LogoTextures {
    slots: HashMap<String, LogoSlot>,
}

impl LogoTextures {
    pub(super) fn texture_id(&mut self, ctx: &egui::Context, url: &str) -> Option<egui::TextureId> {
        let next_index = self.slots.len();
        let slot = self.slots.entry(url.to_string()).or_insert_with(|| {
            match decode_data_url(url) {
                Ok(image) => LogoSlot::Loaded(ctx.load_texture(
                    format!("channel-logo-{next_index}"),
                    image,
                    egui::TextureOptions::LINEAR,
                )),
                Err(err) => {
                    warn!("channel logo skipped: {err}");
                    LogoSlot::Failed
                }
            }
        });
        match slot {
            LogoSlot::Loaded(handle) => Some(handle.id()),
            LogoSlot::Failed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

    #[test]
    fn decode_data_url_reads_png_pixels() {
        let image = decode_data_url(PIXEL_PNG).expect("png");
        assert_eq!(image.size, [1, 1]);
    }

    #[test]
    fn decode_data_url_rejects_remote_and_plain_urls() {
        assert!(matches!(
            decode_data_url("https://example.org/logo.png"),
            Err(LogoDecodeError::NotDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png,rawbytes"),
            Err(LogoDecodeError::NotBase64)
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(LogoDecodeError::Base64(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,AAAA"),
            Err(LogoDecodeError::Image(_))
        ));
    }

    #[test]
    fn failed_logo_is_cached() {
        let ctx = egui::Context::default();
        let mut textures = LogoTextures::default();
        assert!(textures.texture_id(&ctx, "data:image/png;base64,AAAA").is_none());
        assert!(textures.texture_id(&ctx, "data:image/png;base64,AAAA").is_none());
        assert_eq!(textures.slots.len(), 1);
        assert!(matches!(
            textures.slots.get("data:image/png;base64,AAAA"),
            Some(LogoSlot::Failed)
        ));
        assert!(textures.texture_id(&ctx, PIXEL_PNG).is_some());
    }
}
