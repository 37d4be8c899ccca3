use anyhow::{Context, Result};
use log::info;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::ops::{Deref, DerefMut};
use std::path::Path;

pub struct OnnxSession {
    pub(crate) session: Session,
}

impl Deref for OnnxSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl DerefMut for OnnxSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

impl OnnxSession {
    pub fn new(url: impl AsRef<Path>, intra_threads: usize) -> Result<Self> {
        let url = url.as_ref();
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .with_execution_providers([CPUExecutionProvider::default().build()])?
            .commit_from_file(url)
            .with_context(|| format!("Failed to load model {}", url.display()))?;

        info!(
            "Loaded model {} ({} inputs, {} outputs)",
            url.display(),
            session.inputs.len(),
            session.outputs.len()
        );

        Ok(OnnxSession { session })
    }
}
