use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{
    game::Winner,
    messages::{
        ChoiceEntry, Classification, ClassifyRequest, CreateOutcomeRequest, NewRoundRecord,
        OutcomeEntry, RoundRecord,
    },
};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid api url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("backend returned unknown outcome id {0}")]
    UnknownOutcome(u32),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Remote source of the choice catalog and sink for per-round records.
#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn fetch_choices(&self) -> Result<Vec<ChoiceEntry>>;

    async fn fetch_outcomes(&self) -> Result<Vec<OutcomeEntry>>;

    /// Any 2xx answer counts as created; the entry is `None` when the body
    /// does not decode.
    async fn create_outcome(&self, name: &str) -> Result<Option<OutcomeEntry>>;

    async fn list_rounds(&self) -> Result<Vec<RoundRecord>>;

    async fn get_round(&self, id: u64) -> Result<RoundRecord>;

    /// Any 2xx answer counts as stored; the echoed row is `None` when its
    /// shape is not a `RoundRecord`.
    async fn submit_round(&self, record: NewRoundRecord) -> Result<Option<RoundRecord>>;

    async fn update_round(&self, id: u64, record: NewRoundRecord) -> Result<Option<RoundRecord>>;

    async fn delete_round(&self, id: u64) -> Result<()>;

    async fn classify(&self, user_choice_id: u32, cpu_choice_id: u32) -> Result<Classification>;

    /// Classification mapped onto a `Winner`.
    async fn classify_winner(&self, user_choice_id: u32, cpu_choice_id: u32) -> Result<Winner> {
        let classification = self.classify(user_choice_id, cpu_choice_id).await?;
        Winner::from_id(classification.id).ok_or(GatewayError::UnknownOutcome(classification.id))
    }
}

#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| GatewayError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(HttpGateway {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn get<RS: DeserializeOwned>(&self, endpoint: &str) -> Result<RS> {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<RS>()
            .await?)
    }

    async fn post<RQ: Serialize + Sync>(&self, endpoint: &str, request: &RQ) -> Result<Response> {
        let url = self.url(endpoint);
        debug!("POST {}", url);
        Ok(self
            .client
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?)
    }

    async fn put<RQ: Serialize + Sync>(&self, endpoint: &str, request: &RQ) -> Result<Response> {
        let url = self.url(endpoint);
        debug!("PUT {}", url);
        Ok(self
            .client
            .put(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?)
    }

    /// Body of a write the backend already accepted. Decoding is best effort.
    async fn accepted<RS: DeserializeOwned>(response: Response) -> Result<Option<RS>> {
        let body = response.bytes().await?;
        match serde_json::from_slice(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Write accepted but response body was not understood: {}", e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl DataGateway for HttpGateway {
    async fn fetch_choices(&self) -> Result<Vec<ChoiceEntry>> {
        self.get("opciones/all").await
    }

    async fn fetch_outcomes(&self) -> Result<Vec<OutcomeEntry>> {
        self.get("resultados/all").await
    }

    async fn create_outcome(&self, name: &str) -> Result<Option<OutcomeEntry>> {
        let request = CreateOutcomeRequest {
            name: name.to_owned(),
        };
        Self::accepted(self.post("resultados/", &request).await?).await
    }

    async fn list_rounds(&self) -> Result<Vec<RoundRecord>> {
        self.get("partidas/all").await
    }

    async fn get_round(&self, id: u64) -> Result<RoundRecord> {
        self.get(&format!("partidas/part/{}", id)).await
    }

    async fn submit_round(&self, record: NewRoundRecord) -> Result<Option<RoundRecord>> {
        Self::accepted(self.post("partidas/", &record).await?).await
    }

    async fn update_round(&self, id: u64, record: NewRoundRecord) -> Result<Option<RoundRecord>> {
        Self::accepted(self.put(&format!("partidas/up/{}", id), &record).await?).await
    }

    async fn delete_round(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("partidas/del/{}", id));
        debug!("DELETE {}", url);
        self.client.delete(url).send().await?.error_for_status()?;
        Ok(())
    }

    async fn classify(&self, user_choice_id: u32, cpu_choice_id: u32) -> Result<Classification> {
        let request = ClassifyRequest {
            user_choice_id,
            cpu_choice_id,
        };
        Ok(self
            .post("partidas/calcular", &request)
            .await?
            .json::<Classification>()
            .await?)
    }
}
