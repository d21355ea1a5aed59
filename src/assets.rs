//! Extension points for the bitmap and lookup content of the sheet
//!
//! The layout draws a company logo, an electrician signature, a QR code for
//! the public link and social-media lines, but never fetches or generates any
//! of them itself. Hosts plug in collaborators here; the defaults resolve
//! nothing and the layout falls back to placeholders.

use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;

use crate::error::{RendererError, RendererResult};
use crate::surface::Bitmap;

/// Turns an already-resolved image reference (URL, data URI, path) into a bitmap
pub trait ImageResolver: Send + Sync {
    /// `Ok(None)` means "not available here"; the layout draws a placeholder
    fn resolve(&self, reference: &str) -> RendererResult<Option<Bitmap>>;
}

/// Renders a QR code for the public sheet link
pub trait QrRenderer: Send + Sync {
    fn render(&self, payload: &str) -> RendererResult<Option<Bitmap>>;
}

/// Social-media lines printed under the contact block for a company
pub trait SocialLinks: Send + Sync {
    fn lines(&self, company_name: &str) -> Vec<String>;
}

pub struct NoQrCode;

impl QrRenderer for NoQrCode {
    fn render(&self, _payload: &str) -> RendererResult<Option<Bitmap>> {
        Ok(None)
    }
}

pub struct NoSocialLinks;

impl SocialLinks for NoSocialLinks {
    fn lines(&self, _company_name: &str) -> Vec<String> {
        Vec::new()
    }
}

/// The same lines for every company
pub struct StaticSocialLinks(pub Vec<String>);

impl SocialLinks for StaticSocialLinks {
    fn lines(&self, _company_name: &str) -> Vec<String> {
        self.0.clone()
    }
}

/// Decodes `data:` URIs and, when given a base directory, relative paths
/// below it. Remote URLs are never fetched.
pub struct LocalImageResolver {
    base_dir: Option<PathBuf>,
}

impl LocalImageResolver {
    pub fn data_uris_only() -> Self {
        Self { base_dir: None }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: Some(base_dir.into()) }
    }

    fn decode(bytes: &[u8]) -> RendererResult<Bitmap> {
        Ok(image::load_from_memory(bytes)?.to_rgba8())
    }

    fn resolve_data_uri(uri: &str) -> RendererResult<Bitmap> {
        let (header, payload) = uri
            .split_once(',')
            .ok_or_else(|| RendererError::ImageError("data URI without payload".to_string()))?;
        if !header.ends_with(";base64") {
            return Err(RendererError::ImageError(format!("unsupported data URI encoding: {}", header)));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| RendererError::ImageError(format!("invalid base64 image: {}", e)))?;
        Self::decode(&bytes)
    }

    fn resolve_path(base_dir: &Path, reference: &str) -> RendererResult<Option<Bitmap>> {
        let relative = Path::new(reference.strip_prefix("file://").unwrap_or(reference));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(RendererError::ImageError(format!("image path leaves the asset directory: {}", reference)));
        }

        let path = base_dir.join(relative);
        if !path.is_file() {
            debug!("image not found: {}", path.display());
            return Ok(None);
        }
        let bytes = std::fs::read(&path)?;
        Self::decode(&bytes).map(Some)
    }
}

impl ImageResolver for LocalImageResolver {
    fn resolve(&self, reference: &str) -> RendererResult<Option<Bitmap>> {
        if reference.starts_with("data:") {
            return Self::resolve_data_uri(reference).map(Some);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            debug!("remote image left unresolved: {}", reference);
            return Ok(None);
        }
        match &self.base_dir {
            Some(base_dir) => Self::resolve_path(base_dir, reference),
            None => Ok(None),
        }
    }
}

/// The collaborators a render uses
pub struct SheetAssets {
    pub images: Box<dyn ImageResolver>,
    pub qr: Box<dyn QrRenderer>,
    pub social: Box<dyn SocialLinks>,
}

impl SheetAssets {
    pub fn with_images(mut self, images: impl ImageResolver + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    pub fn with_qr(mut self, qr: impl QrRenderer + 'static) -> Self {
        self.qr = Box::new(qr);
        self
    }

    pub fn with_social(mut self, social: impl SocialLinks + 'static) -> Self {
        self.social = Box::new(social);
        self
    }
}

impl Default for SheetAssets {
    fn default() -> Self {
        Self {
            images: Box::new(LocalImageResolver::data_uris_only()),
            qr: Box::new(NoQrCode),
            social: Box::new(NoSocialLinks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let bitmap = RgbaImage::from_pixel(3, 2, Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        bitmap.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes()));
        let bitmap = LocalImageResolver::data_uris_only().resolve(&uri).unwrap().unwrap();
        assert_eq!(bitmap.dimensions(), (3, 2));
    }

    #[test]
    fn test_bad_data_uri_is_an_error() {
        let resolver = LocalImageResolver::data_uris_only();
        assert!(resolver.resolve("data:image/png;base64,@@@").is_err());
        assert!(resolver.resolve("data:image/png,raw").is_err());
        assert!(resolver.resolve("data:image/png;base64,aGVsbG8=").is_err());
    }

    #[test]
    fn test_remote_and_unknown_resolve_to_none() {
        let resolver = LocalImageResolver::data_uris_only();
        assert!(resolver.resolve("https://storage.example.com/logo.png").unwrap().is_none());
        assert!(resolver.resolve("logo.png").unwrap().is_none());
    }

    #[test]
    fn test_paths_under_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("assinatura.png"), png_bytes()).unwrap();
        let resolver = LocalImageResolver::with_base_dir(dir.path());

        assert!(resolver.resolve("assinatura.png").unwrap().is_some());
        assert!(resolver.resolve("file://assinatura.png").unwrap().is_some());
        assert!(resolver.resolve("outra.png").unwrap().is_none());
        assert!(resolver.resolve("../etc/passwd").is_err());
        assert!(resolver.resolve("/etc/passwd").is_err());
    }

    #[test]
    fn test_static_social_links() {
        let social = StaticSocialLinks(vec!["Instagram: @volt".to_string()]);
        assert_eq!(social.lines("Volt"), vec!["Instagram: @volt".to_string()]);
        assert!(NoSocialLinks.lines("Volt").is_empty());
    }
}
