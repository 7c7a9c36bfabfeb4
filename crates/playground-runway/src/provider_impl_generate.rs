use std::{future::Future, pin::Pin, sync::Arc};

use playground_core::{
    error::Result,
    model::EndpointKind,
    provider::{DownloadedMedia, GenerationParams, GenerationProvider, GenerationResult},
};

use crate::RunwayAdapter;

impl GenerationProvider for RunwayAdapter {
    fn generate<'p>(
        &'p self,
        endpoint: EndpointKind,
        params: GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<GenerationResult>> + Send + 'p>> {
        let client = Arc::clone(&self.client);
        let strategies = Arc::clone(&self.strategies);

        Box::pin(async move {
            let strategy = strategies.dispatch(endpoint)?;
            tracing::debug!(%endpoint, model = %params.model, assets = params.assets.len(), "executing strategy");
            strategy.execute(&client, params).await
        })
    }

    fn download<'p>(
        &'p self,
        url: &'p str,
    ) -> Pin<Box<dyn Future<Output = Result<DownloadedMedia>> + Send + 'p>> {
        Box::pin(async move { Ok(self.client.download(url).await?) })
    }
}
