use super::{helpers, Engine, NOTIFICATIONS_TABLE};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::{
    api::NotificationAPI,
    entities::Notification,
    error::Error,
    external::records::{Fields, RecordPatch, Select},
};

#[async_trait]
impl NotificationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>, Error> {
        // sort on the store side; the cap truncates after sorting there,
        // so the newest rows survive it
        let records = self
            .store
            .list(
                NOTIFICATIONS_TABLE,
                Select::field_eq("userId", user_id)
                    .sort_desc("createdAt")
                    .limit(50),
            )
            .await?;

        Ok(records
            .into_iter()
            .map(helpers::record_to_notification)
            .collect())
    }

    #[tracing::instrument(skip(self, message))]
    async fn create_notification(
        &self,
        user_id: &str,
        kind: &str,
        title: &str,
        message: &str,
        link: &str,
    ) -> Result<Notification, Error> {
        let mut fields = Fields::new();
        fields.insert("userId".into(), json!(user_id));
        fields.insert("type".into(), json!(kind));
        fields.insert("title".into(), json!(title));
        fields.insert("message".into(), json!(message));
        fields.insert("link".into(), json!(link));
        fields.insert("read".into(), json!(false));
        fields.insert("createdAt".into(), json!(Utc::now().to_rfc3339()));

        let record = self.store.create(NOTIFICATIONS_TABLE, fields).await?;

        Ok(helpers::record_to_notification(record))
    }

    #[tracing::instrument(skip(self))]
    async fn mark_all_read(&self, user_id: &str) -> Result<(), Error> {
        let formula = format!("AND({{userId}} = '{}', {{read}} = FALSE())", user_id);
        let unread = self
            .store
            .list(
                NOTIFICATIONS_TABLE,
                Select {
                    formula: Some(formula),
                    max_records: None,
                    sort: None,
                },
            )
            .await?;

        if unread.is_empty() {
            return Ok(());
        }

        let patches = unread
            .into_iter()
            .map(|record| {
                let mut fields = Fields::new();
                fields.insert("read".into(), json!(true));
                RecordPatch {
                    id: record.id,
                    fields,
                }
            })
            .collect();

        self.store.update_batch(NOTIFICATIONS_TABLE, patches).await
    }
}
