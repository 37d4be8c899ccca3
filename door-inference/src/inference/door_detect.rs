use crate::inference::door_classify::{DoorClassify, DoorProbability};
use crate::utils::tensor::{strip_to_tensor, TensorLayout};
use anyhow::Result;
use door_media::{Frame, SegmentFrame, Strip, StripBounds, STRIP_COUNT};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A strip counts as a door only when the classifier is strictly more confident than this.
pub const DOOR_CONFIDENCE_THRESHOLD: f32 = 0.70;
pub const CLASSIFIER_INPUT_WIDTH: usize = 28;
pub const CLASSIFIER_INPUT_HEIGHT: usize = 28;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub threshold: f32,
    pub input_width: usize,
    pub input_height: usize,
    pub layout: TensorLayout,
    /// ONNX Runtime intra-op threads.
    pub intra_threads: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: DOOR_CONFIDENCE_THRESHOLD,
            input_width: CLASSIFIER_INPUT_WIDTH,
            input_height: CLASSIFIER_INPUT_HEIGHT,
            layout: TensorLayout::Nhwc,
            intra_threads: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StripScore {
    pub bounds: StripBounds,
    pub is_door: bool,
    pub confidence: f32,
}

impl StripScore {
    pub fn from_probability(bounds: StripBounds, probability: DoorProbability) -> Self {
        Self {
            bounds,
            is_door: probability.is_door(),
            confidence: probability.confidence(),
        }
    }

    pub fn is_positive(&self, threshold: f32) -> bool {
        self.is_door && self.confidence > threshold
    }
}

/// Per-strip door presence for one frame, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DetectionVector([bool; STRIP_COUNT]);

impl DetectionVector {
    pub fn new(present: [bool; STRIP_COUNT]) -> Self {
        Self(present)
    }

    /// Bit `i` (least significant first) marks strip `i`; bits above the fourth are ignored.
    pub fn from_bits(bits: u8) -> Self {
        Self(std::array::from_fn(|i| bits & (1 << i) != 0))
    }

    /// All 16 possible vectors.
    pub fn all() -> impl Iterator<Item = DetectionVector> {
        (0u8..1 << STRIP_COUNT).map(Self::from_bits)
    }

    pub fn as_array(&self) -> [bool; STRIP_COUNT] {
        self.0
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&present| present).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl Display for DetectionVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let cells = self.0.map(|present| if present { "1" } else { "0" });
        write!(f, "[{}]", cells.join(","))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameDetection {
    pub scores: [StripScore; STRIP_COUNT],
    pub vector: DetectionVector,
}

pub struct DoorDetector<C: DoorClassify> {
    classifier: C,
    config: DetectorConfig,
}

impl<C: DoorClassify> DoorDetector<C> {
    pub fn new(classifier: C, config: DetectorConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn score_strip(&self, strip: &Strip<'_>) -> Result<StripScore> {
        let input = strip_to_tensor(
            strip,
            (self.config.input_width, self.config.input_height),
            self.config.layout,
        );
        let probability = self.classifier.classify(input.view())?;

        Ok(StripScore::from_probability(strip.bounds(), probability))
    }

    pub fn detect(&self, frame: &Frame) -> Result<FrameDetection> {
        let mut scores = [StripScore::default(); STRIP_COUNT];
        let mut present = [false; STRIP_COUNT];

        for strip in frame.segment() {
            let score = self.score_strip(&strip)?;
            let index = strip.index();
            present[index] = score.is_positive(self.config.threshold);
            scores[index] = score;

            debug!(
                "Strip {index} [{}, {}): door={} confidence={:.3} positive={}",
                score.bounds.left, score.bounds.right, score.is_door, score.confidence, present[index]
            );
        }

        Ok(FrameDetection {
            scores,
            vector: DetectionVector::new(present),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use door_media::{FrameSize, BGR};
    use ndarray::ArrayView4;
    use std::cell::Cell;

    /// Calls a door wherever the strip is mostly bright.
    struct BrightnessClassifier {
        door_score: f32,
        calls: Cell<usize>,
    }

    impl DoorClassify for BrightnessClassifier {
        fn classify(&self, input: ArrayView4<'_, f32>) -> Result<DoorProbability> {
            self.calls.set(self.calls.get() + 1);
            let mean = input.mean().unwrap_or(0.0);
            if mean > 0.5 {
                Ok(DoorProbability::new(1.0 - self.door_score, self.door_score))
            } else {
                Ok(DoorProbability::new(0.9, 0.1))
            }
        }
    }

    fn detector(door_score: f32) -> DoorDetector<BrightnessClassifier> {
        DoorDetector::new(
            BrightnessClassifier {
                door_score,
                calls: Cell::new(0),
            },
            DetectorConfig::default(),
        )
    }

    #[test]
    fn threshold_is_strict() {
        let bounds = StripBounds::default();
        let at = StripScore::from_probability(bounds, DoorProbability::new(0.30, 0.70));
        let above = StripScore::from_probability(bounds, DoorProbability::new(0.29, 0.71));

        assert!(at.is_door);
        assert!(!at.is_positive(DOOR_CONFIDENCE_THRESHOLD));
        assert!(above.is_positive(DOOR_CONFIDENCE_THRESHOLD));
    }

    #[test]
    fn confident_not_door_is_never_positive() {
        let score = StripScore::from_probability(StripBounds::default(), DoorProbability::new(0.95, 0.05));
        assert!(!score.is_door);
        assert!(!score.is_positive(DOOR_CONFIDENCE_THRESHOLD));
    }

    #[test]
    fn detects_bright_strips() -> Result<()> {
        let mut frame = Frame::filled(FrameSize::new(640, 480), BGR(0, 0, 0))?;
        frame.fill_columns(160, 480, BGR(255, 255, 255));

        let detector = detector(0.9);
        let detection = detector.detect(&frame)?;

        assert_eq!(detection.vector, DetectionVector::new([false, true, true, false]));
        assert_eq!(detector.classifier.calls.get(), 4);
        assert_eq!(detection.scores[1].bounds.left, 160);
        assert!((detection.scores[0].confidence - 0.9).abs() < 1e-6);
        assert!(!detection.scores[0].is_door);
        Ok(())
    }

    #[test]
    fn unconfident_doors_are_dropped() -> Result<()> {
        let frame = Frame::filled(FrameSize::new(64, 48), BGR(255, 255, 255))?;
        let detection = detector(0.70).detect(&frame)?;

        assert!(detection.scores.iter().all(|s| s.is_door));
        assert!(detection.vector.is_empty());
        Ok(())
    }

    #[test]
    fn vector_bits_and_count() {
        let vector = DetectionVector::from_bits(0b1010);
        assert_eq!(vector.as_array(), [false, true, false, true]);
        assert_eq!(vector.count(), 2);
        assert_eq!(vector.to_string(), "[0,1,0,1]");
        assert_eq!(DetectionVector::all().count(), 16);
        assert!(DetectionVector::from_bits(0).is_empty());
    }
}
