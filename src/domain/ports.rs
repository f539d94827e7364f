use crate::domain::model::{CleaningOutcome, EmptyDictionaryPolicy, TextUnit};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dictionary_path(&self) -> &str;
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn log_path(&self) -> &str;
    fn text_column(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn bundle_zip(&self) -> bool;
    fn workers(&self) -> usize;
    fn empty_dictionary_policy(&self) -> EmptyDictionaryPolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<TextUnit>>;
    async fn transform(&self, units: Vec<TextUnit>) -> Result<CleaningOutcome>;
    async fn load(&self, outcome: CleaningOutcome) -> Result<String>;
}
