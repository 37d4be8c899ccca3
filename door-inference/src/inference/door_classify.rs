use crate::engine::inference_engine::OnnxSession;
use anyhow::{bail, Result};
use log::debug;
use ndarray::ArrayView4;
use ort::value::Tensor;
use parking_lot::Mutex;
use std::path::Path;

/// Class probabilities of one classified image region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoorProbability {
    pub not_door: f32,
    pub door: f32,
}

impl DoorProbability {
    pub fn new(not_door: f32, door: f32) -> Self {
        Self { not_door, door }
    }

    pub fn is_door(&self) -> bool {
        self.door > self.not_door
    }

    /// Probability of the winning class.
    pub fn confidence(&self) -> f32 {
        if self.is_door() {
            self.door
        } else {
            self.not_door
        }
    }
}

/// Binary door/not-door image classifier.
pub trait DoorClassify {
    fn classify(&self, input: ArrayView4<'_, f32>) -> Result<DoorProbability>;
}

impl<T: DoorClassify + ?Sized> DoorClassify for Box<T> {
    fn classify(&self, input: ArrayView4<'_, f32>) -> Result<DoorProbability> {
        (**self).classify(input)
    }
}

/// ONNX export of the door classifier. Its first output must hold `[not_door, door]`.
pub struct DoorClassifySession(Mutex<OnnxSession>);

impl DoorClassifySession {
    pub fn new(model_path: impl AsRef<Path>, intra_threads: usize) -> Result<Self> {
        Ok(Self(Mutex::new(OnnxSession::new(model_path, intra_threads)?)))
    }
}

impl DoorClassify for DoorClassifySession {
    fn classify(&self, input: ArrayView4<'_, f32>) -> Result<DoorProbability> {
        let tensor = Tensor::from_array(input.to_owned())?;

        let mut session = self.0.lock();
        let outputs = session.run(ort::inputs![tensor])?;
        let output = outputs[0].try_extract_array::<f32>()?;

        let scores = output.iter().copied().collect::<Vec<_>>();
        let &[not_door, door] = scores.as_slice() else {
            bail!("Expected 2 class scores from door classifier, got shape {:?}", output.shape());
        };
        debug!("Classifier scores: not door {not_door:.4}, door {door:.4}");

        Ok(DoorProbability { not_door, door })
    }
}
