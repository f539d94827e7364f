use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();

        // Extract
        tracing::debug!("Extracting notes...");
        let units = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} notes", units.len());

        // Transform
        let outcome = self.pipeline.transform(units).await?;
        tracing::info!(
            "🧹 Cleaned {} notes, {} replacements",
            outcome.units.len(),
            outcome.counter.total()
        );

        // Load
        let output_path = self.pipeline.load(outcome).await?;
        tracing::debug!("Run finished in {:?}", started.elapsed());

        Ok(output_path)
    }
}
