use crate::config::ClassifierConfig;
use crate::device_camera::interface::Frame;
use crate::error::Error;
use crate::image_classifier::interface::FrameClassifier;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;

pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn load(
        config: &ClassifierConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Error> {
        let label = config
            .labels
            .first()
            .cloned()
            .ok_or_else(|| Error::ModelLoad("model metadata has no class labels".to_string()))?;

        let logger = logger.with_namespace("classifier").with_namespace("fake");
        let _ = logger.info(&format!(
            "Loaded fake model with {} classes, reporting \"{}\"",
            config.labels.len(),
            label
        ));

        Ok(Self { logger })
    }
}

impl FrameClassifier for ImageClassifierFake {
    fn classify(&self, frame: &Frame) -> Result<f32, Error> {
        if frame.rgb.is_empty() {
            let _ = self.logger.error(&format!("Empty frame from {}", frame.camera));
            return Err(Error::Classification(format!(
                "empty frame from {}",
                frame.camera
            )));
        }

        let confidence_dist =
            Uniform::new(0.0f32, 1.0).map_err(|e| Error::Classification(e.to_string()))?;

        Ok(confidence_dist.sample(&mut rand::rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_camera::interface::CameraId;
    use crate::library::logger::impl_fake::LoggerFake;

    #[test]
    fn load_fails_without_labels() {
        let config = ClassifierConfig { labels: vec![] };
        let result = ImageClassifierFake::load(&config, Arc::new(LoggerFake::new()));
        assert!(matches!(result, Err(Error::ModelLoad(_))));
    }

    #[test]
    fn classify_returns_probability() {
        let classifier =
            ImageClassifierFake::load(&ClassifierConfig::default(), Arc::new(LoggerFake::new()))
                .unwrap();

        let frame = Frame {
            camera: CameraId::from("a"),
            width: 2,
            height: 2,
            rgb: vec![0; 12],
        };
        for _ in 0..50 {
            let p = classifier.classify(&frame).unwrap();
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
