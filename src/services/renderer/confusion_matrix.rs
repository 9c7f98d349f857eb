use crate::error::AppError;
use crate::models::view_types::{ConfusionMatrixImage, ConfusionMatrixView};
use base64::Engine;
use image::ImageReader;
use std::io::Cursor;
use tracing::warn;

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Image view of the backend-rendered confusion matrix, or a placeholder
/// when there is none or it is not valid base64.
pub fn confusion_matrix_view(encoded: Option<&str>) -> ConfusionMatrixView {
    let Some(encoded) = encoded.map(str::trim).filter(|s| !s.is_empty()) else {
        return ConfusionMatrixView::Placeholder;
    };

    match decode_image(encoded) {
        Ok(image) => ConfusionMatrixView::Image(image),
        Err(e) => {
            warn!(error = %e, "discarding confusion matrix image");
            ConfusionMatrixView::Placeholder
        }
    }
}

fn decode_image(encoded: &str) -> Result<ConfusionMatrixImage, AppError> {
    let png = base64::engine::general_purpose::STANDARD.decode(encoded)?;

    // Dimensions are informational; undecodable pixels still keep the image view
    let dimensions = match probe_dimensions(&png) {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            warn!(error = %e, "could not read confusion matrix dimensions");
            None
        }
    };

    Ok(ConfusionMatrixImage {
        data_uri: format!("{}{}", DATA_URI_PREFIX, encoded),
        png,
        width: dimensions.map(|(w, _)| w),
        height: dimensions.map(|(_, h)| h),
    })
}

fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), AppError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn png_base64(width: u32, height: u32) -> String {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    }

    #[test]
    fn absent_image_is_placeholder() {
        assert_eq!(confusion_matrix_view(None), ConfusionMatrixView::Placeholder);
        assert_eq!(confusion_matrix_view(Some("")), ConfusionMatrixView::Placeholder);
    }

    #[test]
    fn png_gets_data_uri_and_size() {
        let encoded = png_base64(6, 5);
        let ConfusionMatrixView::Image(image) = confusion_matrix_view(Some(&encoded)) else {
            panic!("expected an image");
        };
        assert!(image.data_uri.starts_with("data:image/png;base64,iVBOR"));
        assert_eq!(image.width, Some(6));
        assert_eq!(image.height, Some(5));
        assert_eq!(&image.png[..4], b"\x89PNG");
    }

    #[test]
    fn invalid_base64_is_placeholder() {
        assert_eq!(
            confusion_matrix_view(Some("not*base64!")),
            ConfusionMatrixView::Placeholder
        );
    }

    #[test]
    fn opaque_bytes_keep_image_without_size() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"plain bytes");
        let ConfusionMatrixView::Image(image) = confusion_matrix_view(Some(&encoded)) else {
            panic!("expected an image");
        };
        assert_eq!(image.width, None);
        assert_eq!(image.png, b"plain bytes");
    }
}
