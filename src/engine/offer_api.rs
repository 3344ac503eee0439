use super::{helpers, Engine, NOTIFICATIONS_TABLE, OFFERS_TABLE};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::{
    api::{OfferAPI, RequestAPI},
    entities::{Offer, OfferWithRequest},
    error::{duplicate_offer_error, Error},
    external::records::{Fields, Select},
};

#[async_trait]
impl OfferAPI for Engine {
    #[tracing::instrument(skip(self, message))]
    async fn submit_offer(
        &self,
        driver_id: &str,
        driver_name: &str,
        request_id: &str,
        price: f64,
        message: String,
        vehicle_id: Option<String>,
    ) -> Result<Offer, Error> {
        // one offer per driver per request
        let existing = self.list_driver_offers_raw(driver_id).await?;
        if existing.iter().any(|o| o.request_id == request_id) {
            return Err(duplicate_offer_error());
        }

        let mut fields = Fields::new();
        fields.insert("Request".into(), json!([request_id]));
        fields.insert("Driver".into(), json!([driver_id]));
        fields.insert("price".into(), json!(price));
        fields.insert("message".into(), json!(message));
        fields.insert("status".into(), json!("new"));
        if let Some(vehicle_id) = &vehicle_id {
            fields.insert("vehicleId".into(), json!(vehicle_id));
        }

        let record = self.store.create(OFFERS_TABLE, fields).await?;
        let offer = helpers::record_to_offer(record);

        // persist a notification for the passenger; losing it must not fail
        // the submission
        match self.find_request(request_id).await {
            Ok(request) if !request.user_id.is_empty() => {
                let mut fields = Fields::new();
                fields.insert("userId".into(), json!(request.user_id));
                fields.insert("type".into(), json!("new_offer"));
                fields.insert("title".into(), json!("Nowa oferta!"));
                fields.insert(
                    "message".into(),
                    json!(format!("{} złożył ofertę: {} PLN", driver_name, price)),
                );
                fields.insert(
                    "link".into(),
                    json!(format!("/request/{}/offers", request_id)),
                );
                fields.insert("read".into(), json!(false));
                fields.insert("createdAt".into(), json!(Utc::now().to_rfc3339()));

                if let Err(err) = self.store.create(NOTIFICATIONS_TABLE, fields).await {
                    tracing::warn!("failed to persist passenger notification: {:?}", err);
                }
            }
            Ok(_) => {
                tracing::warn!("request {} has no passenger id, skipping notification", request_id);
            }
            Err(err) => {
                tracing::warn!("failed to load request for notification: {:?}", err);
            }
        }

        Ok(offer)
    }

    #[tracing::instrument(skip(self))]
    async fn list_driver_offers(&self, driver_id: &str) -> Result<Vec<OfferWithRequest>, Error> {
        let offers = self.list_driver_offers_raw(driver_id).await?;

        let mut result = Vec::with_capacity(offers.len());
        for offer in offers {
            let request = self.find_request(&offer.request_id).await.ok();
            result.push(OfferWithRequest { offer, request });
        }

        Ok(result)
    }
}

impl Engine {
    /// The driver column may be a linked record or legacy text, so the match
    /// happens client-side over the full table rather than in a formula.
    async fn list_driver_offers_raw(&self, driver_id: &str) -> Result<Vec<Offer>, Error> {
        let records = self.store.list(OFFERS_TABLE, Select::all()).await?;

        Ok(records
            .into_iter()
            .map(helpers::record_to_offer)
            .filter(|offer| offer.driver_id == driver_id)
            .collect())
    }
}
