use crate::models::catalog::StyleDirective;
use crate::models::error::RestyleError;
use crate::models::image_models::{EncodedImage, SourceImage, StyledResult};
use crate::processing::codec::ImageCodec;
use crate::traits::transform_provider::TransformProvider;

/// Media type assumed for transform output that cannot be sniffed.
pub const RESULT_MEDIA_TYPE: &str = "image/png";

/// One call to the external transform capability.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    image: EncodedImage,
    instruction: String,
}

impl TransformRequest {
    pub fn new(source: &SourceImage, directive: &StyleDirective) -> Self {
        Self {
            image: source.encoded().clone(),
            instruction: directive.instruction.clone(),
        }
    }

    pub fn image_payload(&self) -> &[u8] {
        self.image.payload()
    }

    pub fn media_type(&self) -> &str {
        self.image.media_type()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Base64 form of the payload, for JSON transports.
    pub fn image_base64(&self) -> String {
        self.image.to_base64()
    }

    /// Run the request against `provider`, blocking until it answers.
    pub fn execute(&self, provider: &dyn TransformProvider) -> Result<StyledResult, RestyleError> {
        let bytes = provider.transform(self).map_err(RestyleError::from)?;
        if bytes.is_empty() {
            return Err(RestyleError::GenerationUnavailable("transform returned no image".into()));
        }
        let media_type = ImageCodec::detect_media_type(&bytes).unwrap_or(RESULT_MEDIA_TYPE);
        Ok(StyledResult::new(EncodedImage::new(bytes, media_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{png_bytes, MockTransform};
    use crate::traits::transform_provider::TransformFailure;

    fn source() -> SourceImage {
        SourceImage::new("blob:x".into(), EncodedImage::new(b"jpeg-bytes".to_vec(), "image/jpeg"))
    }

    fn buzz() -> StyleDirective {
        StyleDirective::new("buzz", "Buzz / Crew Cut", "give them a buzz cut")
    }

    #[test]
    fn request_carries_payload_type_and_instruction() {
        let provider = MockTransform::returning(&png_bytes(2, 2));
        TransformRequest::new(&source(), &buzz()).execute(&provider).unwrap();

        let sent = provider.last_request.lock().clone().unwrap();
        assert_eq!(sent.image_payload(), b"jpeg-bytes");
        assert_eq!(sent.media_type(), "image/jpeg");
        assert_eq!(sent.instruction(), "give them a buzz cut");
        assert_eq!(sent.image_base64(), "anBlZy1ieXRlcw==");
    }

    #[test]
    fn success_returns_png_result() {
        let provider = MockTransform::returning(&png_bytes(2, 2));
        let result = TransformRequest::new(&source(), &buzz()).execute(&provider).unwrap();
        assert_eq!(result.media_type(), "image/png");
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn opaque_output_defaults_to_png() {
        let provider = MockTransform::returning(b"X");
        let result = TransformRequest::new(&source(), &buzz()).execute(&provider).unwrap();
        assert_eq!(result.payload(), b"X");
        assert_eq!(result.media_type(), RESULT_MEDIA_TYPE);
    }

    #[test]
    fn blocked_preserves_reason() {
        let provider = MockTransform::failing(TransformFailure::Blocked("safety filter".into()));
        let err = TransformRequest::new(&source(), &buzz()).execute(&provider).unwrap_err();
        assert_eq!(err, RestyleError::GenerationBlocked("safety filter".into()));
    }

    #[test]
    fn unavailable_and_empty_output() {
        let provider = MockTransform::failing(TransformFailure::Unavailable("connection reset".into()));
        let err = TransformRequest::new(&source(), &buzz()).execute(&provider).unwrap_err();
        assert!(matches!(err, RestyleError::GenerationUnavailable(_)));

        let provider = MockTransform::returning(b"");
        let err = TransformRequest::new(&source(), &buzz()).execute(&provider).unwrap_err();
        assert!(matches!(err, RestyleError::GenerationUnavailable(_)));
    }
}
