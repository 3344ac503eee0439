use super::{helpers, Engine, REQUESTS_TABLE};

use async_trait::async_trait;

use crate::{
    api::RequestAPI,
    entities::RideRequest,
    error::Error,
    external::records::Select,
};

#[async_trait]
impl RequestAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_open_requests(&self) -> Result<Vec<RideRequest>, Error> {
        let records = self
            .store
            .list(REQUESTS_TABLE, Select::field_eq("status", "published"))
            .await?;

        Ok(records.into_iter().map(helpers::record_to_request).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_request(&self, id: &str) -> Result<RideRequest, Error> {
        let record = self.store.find(REQUESTS_TABLE, id).await?;

        Ok(helpers::record_to_request(record))
    }
}
