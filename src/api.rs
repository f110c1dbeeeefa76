use crate::error::{LinewatchError, LinewatchResult};
use crate::model::{
    CalculateRequest, CalculateResponse, ControlResponse, LineControlRequest, LineMap,
    ProductionStatus, SetTargetRequest,
};

/// HTTP client for the factory backend. Every action returns a
/// `LinewatchResult` so the caller decides how a failure is surfaced.
///
/// No request timeout is configured: a hung request delays its own cycle
/// and nothing else.
#[derive(Debug, Clone)]
pub struct FactoryApi {
    client: reqwest::Client,
    base_url: String,
}

impl FactoryApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/production_status`: the full dashboard payload.
    pub async fn production_status(&self) -> LinewatchResult<ProductionStatus> {
        let response = self
            .client
            .get(self.url("/api/production_status"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// `GET /api/manufact`: line statuses only.
    pub async fn manufact_status(&self) -> LinewatchResult<LineMap> {
        let response = self
            .client
            .get(self.url("/api/manufact"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// `POST /api/line_control`: start or stop one line.
    pub async fn set_line_status(
        &self,
        material: &str,
        coordinate: &str,
        enabled: bool,
    ) -> LinewatchResult<()> {
        let body = LineControlRequest {
            material: material.to_string(),
            coordinate: coordinate.to_string(),
            enabled,
        };
        let response: ControlResponse = self
            .client
            .post(self.url("/api/line_control"))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        check_control(response)
    }

    /// `POST /api/set_target`: set one material's daily production target.
    pub async fn set_target(&self, material: &str, target_amount: u64) -> LinewatchResult<()> {
        let body = SetTargetRequest {
            material: material.to_string(),
            target_amount,
        };
        let response: ControlResponse = self
            .client
            .post(self.url("/api/set_target"))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        check_control(response)
    }

    /// `POST /api/calculate`: evaluate an expression on the backend.
    pub async fn calculate(&self, expression: &str) -> LinewatchResult<String> {
        let body = CalculateRequest {
            expression: expression.to_string(),
        };
        let response: CalculateResponse = self
            .client
            .post(self.url("/api/calculate"))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(LinewatchError::api(error));
        }
        match response.result {
            Some(serde_json::Value::String(s)) => Ok(s),
            Some(value) => Ok(value.to_string()),
            None => Err(LinewatchError::parse("calculate response had no result")),
        }
    }
}

fn check_control(response: ControlResponse) -> LinewatchResult<()> {
    if response.status == "success" {
        Ok(())
    } else {
        Err(LinewatchError::api(
            response
                .message
                .unwrap_or_else(|| "backend rejected the request".to_string()),
        ))
    }
}
