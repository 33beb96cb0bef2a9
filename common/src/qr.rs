use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

/// Pixel size of a single QR module.
pub const MODULE_SIZE: u32 = 10;
/// Width of the light border, in modules.
pub const BORDER_MODULES: u32 = 5;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Writes payment QR codes as `{transaction_id}.png` into one directory.
#[derive(Debug, Clone)]
pub struct QrEncoder {
    output_dir: PathBuf,
}

impl QrEncoder {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        QrEncoder {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Creates the output directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create QR code directory `{}`",
                    self.output_dir.display()
                )
            })
    }

    pub fn file_path(&self, transaction_id: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", transaction_id))
    }

    pub async fn encode(&self, uri: &str, transaction_id: &str) -> anyhow::Result<PathBuf> {
        let png = render_png(uri)?;
        let path = self.file_path(transaction_id);

        tokio::fs::write(&path, png)
            .await
            .with_context(|| format!("Failed to write QR code to `{}`", path.display()))?;

        log::debug!("QR code for {} written to {}", transaction_id, path.display());
        Ok(path)
    }
}

/// Renders `data` as a black-on-white PNG QR code.
pub fn render_png(data: &str) -> anyhow::Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| anyhow!("Failed to encode data as QR code: {}", e))?;

    let modules = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(MODULE_SIZE, MODULE_SIZE)
        .dark_color(DARK)
        .light_color(LIGHT)
        .build();

    let border = BORDER_MODULES * MODULE_SIZE;
    let mut canvas = ImageBuffer::from_pixel(
        modules.width() + 2 * border,
        modules.height() + 2 * border,
        LIGHT,
    );
    image::imageops::overlay(&mut canvas, &modules, i64::from(border), i64::from(border));

    let mut png = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("Failed to write QR code as PNG")?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "upi://pay?pa=shop@oksbi&pn=Shop&am=999&cu=INR&tid=abc&tn=note";

    #[test]
    fn png_has_border_and_square_modules() {
        let png = render_png(URI).unwrap();
        let img = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .unwrap()
            .to_luma8();

        let modules = QrCode::with_error_correction_level(URI.as_bytes(), EcLevel::M)
            .unwrap()
            .width() as u32;
        let side = (modules + 2 * BORDER_MODULES) * MODULE_SIZE;
        assert_eq!(img.dimensions(), (side, side));

        let border = BORDER_MODULES * MODULE_SIZE;
        assert_eq!(*img.get_pixel(0, 0), LIGHT);
        assert_eq!(*img.get_pixel(border - 1, border - 1), LIGHT);
        // Top-left finder pattern starts right after the border.
        assert_eq!(*img.get_pixel(border, border), DARK);
    }

    #[tokio::test]
    async fn encode_writes_file_named_by_transaction_id() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = QrEncoder::new(dir.path().join("qrcodes"));
        encoder.ensure_dir().await.unwrap();
        // Idempotent.
        encoder.ensure_dir().await.unwrap();

        let path = encoder.encode(URI, "tx-1").await.unwrap();

        assert_eq!(path, dir.path().join("qrcodes").join("tx-1.png"));
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn encode_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = QrEncoder::new(dir.path().join("never-created"));

        let err = encoder.encode(URI, "tx-2").await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to write QR code"));
    }
}
