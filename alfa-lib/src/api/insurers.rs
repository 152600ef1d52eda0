//! Insurer administration endpoints

use serde::Deserialize;

use crate::AlfaClient;
use crate::error::Error;
use crate::model::Insurer;
use crate::model::InsurerInput;
use crate::model::NewCoverage;
use crate::model::NewDeductible;
use crate::model::NewFinancing;
use crate::model::PolicyType;
use crate::model::Templates;

const INSURERS_PATH: &str = "aseguradoras";
const INCLUDE_TEMPLATES: (&str, &str) = ("include_plantillas", "true");

#[derive(Deserialize)]
struct InsurerList {
    aseguradoras: Vec<Insurer>,
}

#[derive(Deserialize)]
struct InsurerEnvelope {
    aseguradora: Insurer,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: String,
}

/// CRUD over insurers and their templates.
///
/// # Example
///
/// ```ignore
/// use alfa_lib::api::InsurerService;
///
/// let insurers = InsurerService::new(client);
/// for insurer in insurers.list(false).await? {
///     println!("{}", insurer.name);
/// }
/// ```
#[derive(Clone)]
pub struct InsurerService {
    client: AlfaClient,
}

impl InsurerService {
    pub fn new(client: AlfaClient) -> Self {
        Self { client }
    }

    /// All insurers, optionally with their deductibles, coverages and
    /// financings.
    pub async fn list(&self, include_templates: bool) -> Result<Vec<Insurer>, Error> {
        let query: &[(&str, &str)] = if include_templates { &[INCLUDE_TEMPLATES] } else { &[] };
        let list: InsurerList = self.client.get(INSURERS_PATH, query).await?;
        log::info!("Fetched {} insurers", list.aseguradoras.len());
        Ok(list.aseguradoras)
    }

    pub async fn get(&self, id: i64, include_templates: bool) -> Result<Insurer, Error> {
        let query: &[(&str, &str)] = if include_templates { &[INCLUDE_TEMPLATES] } else { &[] };
        let envelope: InsurerEnvelope = self.client.get(&insurer_path(id), query).await?;
        Ok(envelope.aseguradora)
    }

    pub async fn create(&self, input: &InsurerInput) -> Result<Insurer, Error> {
        let envelope: InsurerEnvelope = self.client.post(INSURERS_PATH, input).await?;
        log::info!("Created insurer {}", envelope.aseguradora.id);
        Ok(envelope.aseguradora)
    }

    /// Update the fields set in `input`.
    pub async fn update(&self, id: i64, input: &InsurerInput) -> Result<Insurer, Error> {
        let envelope: InsurerEnvelope = self.client.put(&insurer_path(id), input).await?;
        log::info!("Updated insurer {}", id);
        Ok(envelope.aseguradora)
    }

    /// Delete an insurer. Returns the server's confirmation message.
    pub async fn delete(&self, id: i64) -> Result<String, Error> {
        let envelope: MessageEnvelope = self.client.delete(&insurer_path(id)).await?;
        log::info!("Deleted insurer {}", id);
        Ok(envelope.message)
    }

    /// Templates of one insurer for a single policy type.
    pub async fn templates(&self, id: i64, policy_type: PolicyType) -> Result<Templates, Error> {
        let path = format!("{}/plantillas/{}", insurer_path(id), policy_type);
        self.client.get(&path, &[]).await
    }

    pub async fn create_deductible(&self, id: i64, deductible: &NewDeductible) -> Result<serde_json::Value, Error> {
        let path = format!("{}/deducibles", insurer_path(id));
        self.client.post(&path, deductible).await
    }

    pub async fn create_coverage(&self, id: i64, coverage: &NewCoverage) -> Result<serde_json::Value, Error> {
        let path = format!("{}/coberturas", insurer_path(id));
        self.client.post(&path, coverage).await
    }

    pub async fn create_financing(&self, id: i64, financing: &NewFinancing) -> Result<serde_json::Value, Error> {
        let path = format!("{}/financiaciones", insurer_path(id));
        self.client.post(&path, financing).await
    }
}

fn insurer_path(id: i64) -> String {
    format!("{}/{}", INSURERS_PATH, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(insurer_path(7), "aseguradoras/7");

        let client = AlfaClient::builder().url("http://localhost:5000/api/").build().unwrap();
        let url = client
            .endpoint(&format!("{}/plantillas/{}", insurer_path(7), PolicyType::Copropiedad))
            .unwrap();
        assert_eq!(url.path(), "/api/aseguradoras/7/plantillas/COPROPIEDAD");
    }
}
