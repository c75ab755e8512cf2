//! Photo analysis via an external vision API.
//!
//! The analyzer is the only asynchronous collaborator in an estimate run.
//! Its failures never abort estimation: callers degrade to
//! [`BuildingFeatures::unavailable`] and the engine keeps going with
//! dimension-driven trades.

mod openai;

pub use openai::OpenAiVision;

use std::path::Path;

use async_trait::async_trait;

use crate::building::BuildingFeatures;
use crate::error::VisionError;

/// One photo ready for submission.
#[derive(Debug, Clone)]
pub struct PhotoPayload {
    pub data: Vec<u8>,
    pub media_type: String,
    /// Where the photo came from, for logging.
    pub source: String,
}

impl PhotoPayload {
    /// Load a photo from disk, guessing the media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, VisionError> {
        let data = std::fs::read(path).map_err(|e| VisionError::Photo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self {
            data,
            media_type,
            source: path.display().to_string(),
        })
    }
}

/// External vision collaborator: photos in, building features out.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Analyze a single photo.
    async fn analyze(&self, photo: &PhotoPayload) -> Result<BuildingFeatures, VisionError>;
}

/// Analyze a batch of photos and merge the per-photo results.
///
/// Individual photo failures are tolerated as long as at least one photo
/// analyzes; if every photo fails, the first error is returned.
pub async fn analyze_batch(
    analyzer: &dyn VisionAnalyzer,
    photos: &[PhotoPayload],
) -> Result<BuildingFeatures, VisionError> {
    if photos.is_empty() {
        return Err(VisionError::Unavailable {
            reason: "no photos provided".to_string(),
        });
    }

    let results =
        futures::future::join_all(photos.iter().map(|photo| analyzer.analyze(photo))).await;

    let mut features = Vec::new();
    let mut first_error = None;
    for (photo, result) in photos.iter().zip(results) {
        match result {
            Ok(f) => features.push(f),
            Err(e) => {
                tracing::warn!(source = %photo.source, "photo analysis failed: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if features.is_empty() {
        Err(first_error.unwrap_or(VisionError::Unavailable {
            reason: "no analyzable photos".to_string(),
        }))
    } else {
        Ok(BuildingFeatures::merge(features))
    }
}

/// Analyze a batch, degrading to a zero-confidence result on failure
/// instead of propagating the error.
pub async fn analyze_or_degrade(
    analyzer: &dyn VisionAnalyzer,
    photos: &[PhotoPayload],
) -> BuildingFeatures {
    match analyze_batch(analyzer, photos).await {
        Ok(features) => features,
        Err(e) => {
            tracing::warn!("photo analysis unavailable, estimating without features: {e}");
            BuildingFeatures::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::RoofStyle;

    struct FixedAnalyzer {
        result: Result<BuildingFeatures, ()>,
    }

    #[async_trait]
    impl VisionAnalyzer for FixedAnalyzer {
        async fn analyze(&self, _photo: &PhotoPayload) -> Result<BuildingFeatures, VisionError> {
            match &self.result {
                Ok(f) => Ok(f.clone()),
                Err(()) => Err(VisionError::Unavailable {
                    reason: "down".to_string(),
                }),
            }
        }
    }

    fn photo() -> PhotoPayload {
        PhotoPayload {
            data: vec![0u8; 4],
            media_type: "image/jpeg".to_string(),
            source: "test.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_batch_merges_successes() {
        let analyzer = FixedAnalyzer {
            result: Ok(BuildingFeatures {
                roof_style: Some(RoofStyle::Hip),
                window_count: Some(3),
                confidence: 0.8,
                ..BuildingFeatures::default()
            }),
        };

        let merged = analyze_batch(&analyzer, &[photo(), photo()]).await.unwrap();
        assert_eq!(merged.roof_style, Some(RoofStyle::Hip));
        // Counts sum across the two photos
        assert_eq!(merged.window_count, Some(6));
    }

    #[tokio::test]
    async fn test_all_failures_propagate_first_error() {
        let analyzer = FixedAnalyzer { result: Err(()) };
        let err = analyze_batch(&analyzer, &[photo()]).await.unwrap_err();
        assert!(matches!(err, VisionError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_degrade_produces_zero_confidence() {
        let analyzer = FixedAnalyzer { result: Err(()) };
        let features = analyze_or_degrade(&analyzer, &[photo()]).await;
        assert_eq!(features.confidence, 0.0);
        assert!(features.roof_style.is_none());
    }

    #[tokio::test]
    async fn test_empty_batch_is_unavailable() {
        let analyzer = FixedAnalyzer { result: Err(()) };
        assert!(analyze_batch(&analyzer, &[]).await.is_err());
    }
}
