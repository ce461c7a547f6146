//! Inbound image decoding

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use haulquote_types::{ImageInput, RequestError};

/// Most images accepted in one estimate request
pub const MAX_IMAGES: usize = 10;

const FALLBACK_MIME: &str = "image/jpeg";

/// A decoded image ready to be inlined into a backend request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Decode and validate the request's image list.
///
/// Rejects an empty list or more than [`MAX_IMAGES`] before decoding
/// anything.
pub fn decode_images(inputs: &[ImageInput]) -> Result<Vec<ImagePayload>, RequestError> {
    if inputs.is_empty() {
        return Err(RequestError::EmptyImageList);
    }
    if inputs.len() > MAX_IMAGES {
        return Err(RequestError::TooManyImages {
            count: inputs.len(),
            max: MAX_IMAGES,
        });
    }

    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| decode_image(index, input))
        .collect()
}

fn decode_image(index: usize, input: &ImageInput) -> Result<ImagePayload, RequestError> {
    let invalid = |reason: String| RequestError::InvalidImage { index, reason };

    let (declared_mime, bytes) = match input {
        ImageInput::Raw { bytes, mime_type } => (Some(mime_type.clone()), bytes.clone()),
        ImageInput::Encoded(encoded) => {
            let (prefix_mime, data) = split_data_url(encoded);
            (prefix_mime, decode_base64(data).map_err(invalid)?)
        }
        ImageInput::Inline { data, mime_type } => {
            let (prefix_mime, data) = split_data_url(data);
            (prefix_mime.or_else(|| mime_type.clone()), decode_base64(data).map_err(invalid)?)
        }
    };

    if bytes.is_empty() {
        return Err(invalid("image data is empty".to_string()));
    }

    let mime_type = match declared_mime {
        Some(mime) if mime.starts_with("image/") => mime,
        Some(mime) => return Err(invalid(format!("unsupported MIME type '{}'", mime))),
        None => sniff_mime(&bytes),
    };

    Ok(ImagePayload { mime_type, bytes })
}

/// Strip a `data:<mime>;base64,` prefix, returning the MIME type it names.
fn split_data_url(value: &str) -> (Option<String>, &str) {
    let value = value.trim();
    let Some(rest) = value.strip_prefix("data:") else {
        return (None, value);
    };
    let Some((header, data)) = rest.split_once(',') else {
        return (None, value);
    };

    let mime = header
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    (mime, data)
}

fn decode_base64(data: &str) -> Result<Vec<u8>, String> {
    let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| format!("invalid base64: {}", e))
}

fn sniff_mime(bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn encoded(s: &str) -> ImageInput {
        ImageInput::Encoded(s.to_string())
    }

    #[test]
    fn test_empty_list_rejected() {
        assert_eq!(decode_images(&[]), Err(RequestError::EmptyImageList));
    }

    #[test]
    fn test_eleven_images_rejected() {
        let inputs = vec![encoded("/9j/"); 11];
        assert_eq!(
            decode_images(&inputs),
            Err(RequestError::TooManyImages { count: 11, max: 10 })
        );
    }

    #[test]
    fn test_ten_images_accepted() {
        let inputs = vec![encoded("/9j/"); 10];
        assert_eq!(decode_images(&inputs).unwrap().len(), 10);
    }

    #[test]
    fn test_data_url_prefix_stripped() {
        let images = decode_images(&[encoded("data:image/webp;base64,/9j/")]).unwrap();
        assert_eq!(images[0].mime_type, "image/webp");
        assert_eq!(images[0].bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_bare_base64_sniffs_png() {
        let data = STANDARD.encode(PNG_HEADER);
        let images = decode_images(&[encoded(&data)]).unwrap();
        assert_eq!(images[0].mime_type, "image/png");
    }

    #[test]
    fn test_unknown_bytes_fall_back_to_jpeg() {
        let data = STANDARD.encode([1u8, 2, 3, 4]);
        let images = decode_images(&[encoded(&data)]).unwrap();
        assert_eq!(images[0].mime_type, "image/jpeg");
    }

    #[test]
    fn test_inline_object_uses_declared_mime() {
        let input = ImageInput::Inline {
            data: "/9j/".to_string(),
            mime_type: Some("image/heic".to_string()),
        };
        let images = decode_images(&[input]).unwrap();
        assert_eq!(images[0].mime_type, "image/heic");
    }

    #[test]
    fn test_raw_bytes_passed_through() {
        let input = ImageInput::Raw {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".to_string(),
        };
        let images = decode_images(&[input]).unwrap();
        assert_eq!(images[0], ImagePayload::new("image/png", vec![1, 2, 3]));
    }

    #[test]
    fn test_invalid_base64_reports_index() {
        let inputs = vec![encoded("/9j/"), encoded("not base64!!")];
        match decode_images(&inputs) {
            Err(RequestError::InvalidImage { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected invalid image, got {:?}", other),
        }
    }

    #[test]
    fn test_non_image_mime_rejected() {
        let input = ImageInput::Raw {
            bytes: vec![1, 2, 3],
            mime_type: "application/pdf".to_string(),
        };
        assert!(matches!(
            decode_images(&[input]),
            Err(RequestError::InvalidImage { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_image_rejected() {
        assert!(matches!(
            decode_images(&[encoded("data:image/png;base64,")]),
            Err(RequestError::InvalidImage { .. })
        ));
    }

    #[test]
    fn test_base64_roundtrip_for_backend() {
        let payload = ImagePayload::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(payload.to_base64(), "/9j/");
    }
}
