use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::MetricsSettings;
use crate::errors::{DispatchError, DispatchResult};
use crate::monitoring::{HostLoad, MetricsProvider};

/// Selects the least-loaded host from a Prometheus instant query. Each
/// sample's `instance` label carries the host address (port suffix is
/// stripped), the sample value is the load.
pub struct PrometheusMetricsProvider {
    http: reqwest::Client,
    url: String,
    query: String,
}

impl PrometheusMetricsProvider {
    pub fn new(settings: &MetricsSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: settings.url.clone(),
            query: settings.query.clone(),
        })
    }
}

#[async_trait]
impl MetricsProvider for PrometheusMetricsProvider {
    async fn least_loaded_host(&self) -> DispatchResult<Option<HostLoad>> {
        let response = self
            .http
            .get(format!("{}/api/v1/query", self.url))
            .query(&[("query", self.query.as_str())])
            .send()
            .await
            .map_err(|e| DispatchError::MetricsUnavailable(e.to_string()))?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::MetricsUnavailable(e.to_string()))?;

        if body.status != "success" {
            return Err(DispatchError::MetricsUnavailable(format!(
                "query returned status {}",
                body.status
            )));
        }

        let samples: Vec<HostLoad> = body
            .data
            .result
            .into_iter()
            .filter_map(sample_to_load)
            .collect();

        let pick = pick_least_loaded(samples);
        debug!(?pick, "least-loaded selection");
        Ok(pick)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: QueryData,
}

#[derive(Debug, Default, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<QuerySample>,
}

#[derive(Debug, Deserialize)]
struct QuerySample {
    metric: HashMap<String, String>,
    // Prometheus encodes instant vectors as [unix_ts, "value"].
    value: (f64, String),
}

fn sample_to_load(sample: QuerySample) -> Option<HostLoad> {
    let instance = sample.metric.get("instance")?;
    let address = instance
        .split(':')
        .next()
        .unwrap_or(instance.as_str())
        .to_string();
    let load = sample.value.1.parse().ok()?;
    Some(HostLoad { address, load })
}

/// Lowest load wins; ties break on the lowest address so repeated calls
/// under identical load states are reproducible.
fn pick_least_loaded(mut samples: Vec<HostLoad>) -> Option<HostLoad> {
    samples.sort_by(|a, b| {
        a.load
            .partial_cmp(&b.load)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.address.cmp(&b.address))
    });
    samples.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(address: &str, load: f64) -> HostLoad {
        HostLoad {
            address: address.to_string(),
            load,
        }
    }

    #[test]
    fn picks_lowest_load() {
        let pick = pick_least_loaded(vec![
            load("10.0.0.1", 10.0),
            load("10.0.0.2", 3.0),
            load("10.0.0.3", 7.5),
        ]);
        assert_eq!(pick, Some(load("10.0.0.2", 3.0)));
    }

    #[test]
    fn ties_break_on_lowest_address() {
        let pick = pick_least_loaded(vec![
            load("10.0.0.9", 2.0),
            load("10.0.0.2", 2.0),
            load("10.0.0.5", 2.0),
        ]);
        assert_eq!(pick, Some(load("10.0.0.2", 2.0)));
    }

    #[test]
    fn empty_samples_pick_nothing() {
        assert_eq!(pick_least_loaded(Vec::new()), None);
    }

    #[test]
    fn decodes_samples_and_strips_instance_port() {
        let body = json!({
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    {"metric": {"instance": "10.0.0.1:9100"}, "value": [1721130000.0, "0.42"]},
                    {"metric": {"instance": "10.0.0.2"}, "value": [1721130000.0, "1.5"]},
                    {"metric": {"job": "node"}, "value": [1721130000.0, "9.9"]}
                ]
            }
        });
        let response: QueryResponse = serde_json::from_value(body).unwrap();
        let samples: Vec<HostLoad> = response
            .data
            .result
            .into_iter()
            .filter_map(sample_to_load)
            .collect();
        assert_eq!(
            samples,
            vec![load("10.0.0.1", 0.42), load("10.0.0.2", 1.5)]
        );
    }
}
