//! Vertex AI connection configuration.

/// Configuration for one Vertex AI publisher-model prediction endpoint.
#[derive(Debug, Clone)]
pub struct VertexConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Region hosting the publisher model (default: `us-central1`).
    pub location: String,
    /// Publisher model id (default: `virtual-try-on-exp-05-31`).
    pub model_id: String,
    /// OAuth2 bearer token for the prediction API.
    ///
    /// Token acquisition (and refresh) is the deployment environment's
    /// concern; the client sends whatever it is given.
    pub access_token: String,
    /// Per-request timeout in seconds (default: `120`). Bounds every
    /// individual try-on call so a hung prediction cannot pin a batch
    /// worker forever.
    pub request_timeout_secs: u64,
}

impl VertexConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                       | Default                     |
    /// |-------------------------------|-----------------------------|
    /// | `PROJECT_ID`                  | (required)                  |
    /// | `LOCATION`                    | `us-central1`               |
    /// | `VERTEX_MODEL_ID`             | `virtual-try-on-exp-05-31`  |
    /// | `VERTEX_ACCESS_TOKEN`         | (required)                  |
    /// | `VERTEX_REQUEST_TIMEOUT_SECS` | `120`                       |
    pub fn from_env() -> Self {
        let project_id = std::env::var("PROJECT_ID").expect("PROJECT_ID must be set");

        let location = std::env::var("LOCATION").unwrap_or_else(|_| "us-central1".into());

        let model_id =
            std::env::var("VERTEX_MODEL_ID").unwrap_or_else(|_| "virtual-try-on-exp-05-31".into());

        let access_token =
            std::env::var("VERTEX_ACCESS_TOKEN").expect("VERTEX_ACCESS_TOKEN must be set");

        let request_timeout_secs: u64 = std::env::var("VERTEX_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("VERTEX_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            project_id,
            location,
            model_id,
            access_token,
            request_timeout_secs,
        }
    }

    /// Full `:predict` URL for the configured model.
    pub fn endpoint_url(&self) -> String {
        format!(
            "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:predict",
            location = self.location,
            project = self.project_id,
            model = self.model_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_shape() {
        let config = VertexConfig {
            project_id: "demo-project".into(),
            location: "us-central1".into(),
            model_id: "virtual-try-on-exp-05-31".into(),
            access_token: "token".into(),
            request_timeout_secs: 120,
        };
        assert_eq!(
            config.endpoint_url(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/demo-project/locations/us-central1/publishers/google/models/virtual-try-on-exp-05-31:predict"
        );
    }
}
