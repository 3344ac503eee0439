use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::env;

use crate::error::{invalid_input_error, not_found_error, upstream_error, Error};

// the table service rejects batch writes larger than this
const MAX_BATCH_SIZE: usize = 10;

pub type Fields = Map<String, Value>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordPage {
    records: Vec<Record>,
    offset: Option<String>,
}

#[derive(Debug, Serialize)]
struct WriteBatch<'a> {
    records: &'a [RecordPatch],
}

#[derive(Clone, Debug, Serialize)]
pub struct RecordPatch {
    pub id: String,
    pub fields: Fields,
}

/// Query options for [`RecordStore::list`].
#[derive(Clone, Debug, Default)]
pub struct Select {
    pub formula: Option<String>,
    pub max_records: Option<u32>,
    pub sort: Option<Sort>,
}

#[derive(Clone, Debug)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Select {
    pub fn all() -> Self {
        Self::default()
    }

    /// Equality filter on a single field, `{field} = 'value'`.
    pub fn field_eq(field: &str, value: &str) -> Self {
        Self {
            formula: Some(format!("{{{}}} = '{}'", field, value.replace('\'', "\\'"))),
            ..Self::default()
        }
    }

    pub fn limit(mut self, max_records: u32) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Store-side descending sort. The store applies sorting before
    /// `maxRecords`, so a limited listing must sort here rather than
    /// client-side or the cap truncates in arbitrary table order.
    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            descending: true,
        });
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];

        if let Some(formula) = &self.formula {
            params.push(("filterByFormula", formula.clone()));
        }
        if let Some(max) = self.max_records {
            params.push(("maxRecords", max.to_string()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort[0][field]", sort.field.clone()));
            let direction = if sort.descending { "desc" } else { "asc" };
            params.push(("sort[0][direction]", direction.to_string()));
        }

        params
    }
}

/// Thin client for the spreadsheet-style record store. The store is an
/// opaque CRUD backend; nothing here knows about table schemas beyond
/// `{ id, fields }`.
#[derive(Debug, Clone)]
pub struct RecordStore {
    http: reqwest::Client,
    api_base: String,
    base_id: String,
    api_key: String,
}

impl RecordStore {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            http: reqwest::Client::new(),
            api_base: env::var("RECORDS_API_BASE")?,
            base_id: env::var("RECORDS_BASE_ID")?,
            api_key: env::var("RECORDS_API_KEY")?,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("https://{}/v0/{}/{}", self.api_base, self.base_id, table)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, table: &str, select: Select) -> Result<Vec<Record>, Error> {
        let mut records = vec![];
        let mut offset: Option<String> = None;

        loop {
            let mut req = self
                .http
                .get(self.table_url(table))
                .bearer_auth(&self.api_key)
                .query(&select.params());

            if let Some(cursor) = &offset {
                req = req.query(&[("offset", cursor)]);
            }

            let res = req.send().await?;
            check_status(res.status().as_u16())?;

            let page: RecordPage = res.json().await?;
            records.extend(page.records);

            match page.offset {
                Some(cursor) => offset = Some(cursor),
                None => break,
            }
        }

        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    pub async fn find(&self, table: &str, id: &str) -> Result<Record, Error> {
        let res = self
            .http
            .get(format!("{}/{}", self.table_url(table), id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        Ok(res.json().await?)
    }

    #[tracing::instrument(skip(self, fields))]
    pub async fn create(&self, table: &str, fields: Fields) -> Result<Record, Error> {
        let res = self
            .http
            .post(self.table_url(table))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        Ok(res.json().await?)
    }

    #[tracing::instrument(skip(self, fields))]
    pub async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record, Error> {
        let res = self
            .http
            .patch(format!("{}/{}", self.table_url(table), id))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        Ok(res.json().await?)
    }

    #[tracing::instrument(skip(self, patches))]
    pub async fn update_batch(&self, table: &str, patches: Vec<RecordPatch>) -> Result<(), Error> {
        for chunk in patches.chunks(MAX_BATCH_SIZE) {
            let res = self
                .http
                .patch(self.table_url(table))
                .bearer_auth(&self.api_key)
                .json(&WriteBatch { records: chunk })
                .send()
                .await?;

            check_status(res.status().as_u16())?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn destroy(&self, table: &str, id: &str) -> Result<(), Error> {
        let res = self
            .http
            .delete(format!("{}/{}", self.table_url(table), id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        Ok(())
    }
}

fn check_status(status_code: u16) -> Result<(), Error> {
    if status_code == 404 {
        return Err(not_found_error());
    } else if status_code >= 400 && status_code < 500 {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    Ok(())
}
