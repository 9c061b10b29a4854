use chrono::DateTime;
use common::models::Headline;
use serde::Deserialize;

use crate::remote::RemoteError;
use crate::traits::RemoteResponse;

#[derive(Deserialize, Debug)]
pub struct NewsResponse {
    #[serde(rename(deserialize = "Data"), default)]
    pub data: Vec<NewsItem>,
}

#[derive(Deserialize, Debug)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub published_on: i64,
    #[serde(default)]
    pub source: String,
}

impl RemoteResponse<Headline> for NewsItem {
    fn to_model(&self) -> Result<Headline, RemoteError> {
        let published_at =
            DateTime::from_timestamp(self.published_on, 0).ok_or(RemoteError::Malformed {
                field: "published_on",
                value: self.published_on.to_string(),
            })?;
        let source = if self.source.is_empty() {
            "Unknown"
        } else {
            self.source.as_str()
        };
        Ok(Headline::new(self.title.clone(), published_at, source))
    }
}
