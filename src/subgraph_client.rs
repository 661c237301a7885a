// Copyright (c) Viable Systems
// SPDX-License-Identifier: Apache-2.0

use crate::graphql;
use crate::graphql::pay_events::{self, PayEventsPayEvents};

use anyhow::{anyhow, Result};
use graphql_client::GraphQLQuery;
use std::env;
use tracing::{error, info, instrument};

/// How many pay events a single cursor advance will pull at most.
const PAY_EVENT_PAGE_SIZE: i64 = 1000;

pub struct JuiceboxClientConfig {
    pub address: String,
    pub graphql_port: u16,
    pub use_https: bool,
    pub subgraph_path: String,
}

impl JuiceboxClientConfig {
    pub fn subgraph_uri(&self) -> String {
        let schema = if self.use_https { "https" } else { "http" };
        format!(
            "{}://{}:{}{}",
            schema, self.address, self.graphql_port, self.subgraph_path
        )
    }
}

pub struct JuiceboxGraphQLClient {
    pub(crate) config: JuiceboxClientConfig,
    pub(crate) http: reqwest::Client,
    pub(crate) last_pay_event_timestamp: i64,
}

impl From<JuiceboxClientConfig> for JuiceboxGraphQLClient {
    fn from(config: JuiceboxClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            last_pay_event_timestamp: 0,
        }
    }
}

impl JuiceboxGraphQLClient {
    pub async fn projects(
        &self,
        variables: graphql::projects::Variables,
    ) -> Result<Vec<graphql::projects::ProjectsProjects>> {
        let response = self.post_graphql::<graphql::Projects>(variables).await?;
        Ok(Self::take_data(response)?.projects)
    }

    pub async fn participants(
        &self,
        variables: graphql::participants::Variables,
    ) -> Result<Vec<graphql::participants::ParticipantsParticipants>> {
        let response = self.post_graphql::<graphql::Participants>(variables).await?;
        Ok(Self::take_data(response)?.participants)
    }

    pub async fn pay_events(
        &self,
        variables: pay_events::Variables,
    ) -> Result<Vec<PayEventsPayEvents>> {
        let response = self.post_graphql::<graphql::PayEvents>(variables).await?;
        Ok(Self::take_data(response)?.pay_events)
    }

    /// A project has exactly one creation event, so the first match wins.
    pub async fn project_create_event(
        &self,
        variables: graphql::project_create_event::Variables,
    ) -> Result<
        Option<graphql::project_create_event::ProjectCreateEventProjectEventsProjectCreateEvent>,
    > {
        let response = self
            .post_graphql::<graphql::ProjectCreateEvent>(variables)
            .await?;
        let events = Self::take_data(response)?.project_events;
        Ok(events
            .into_iter()
            .filter_map(|event| event.project_create_event)
            .next())
    }

    pub async fn fetch_new_pay_events(&mut self) -> Result<(bool, Vec<PayEventsPayEvents>)> {
        let prev_last_timestamp = self.last_pay_event_timestamp;
        let variables = pay_events::Variables {
            where_: Some(pay_events::PayEvent_filter {
                timestamp_gt: Some(prev_last_timestamp),
                ..Default::default()
            }),
            order_by: Some(pay_events::PayEvent_orderBy::timestamp),
            order_direction: Some(pay_events::OrderDirection::asc),
            first: Some(PAY_EVENT_PAGE_SIZE),
            skip: None,
        };
        let events = self.pay_events(variables).await?;
        if let Some(last) = events.last() {
            self.last_pay_event_timestamp = last.timestamp;
        }

        Ok((prev_last_timestamp < self.last_pay_event_timestamp, events))
    }

    pub async fn run_raw_query(&self, query: &str) -> Result<String> {
        let body = serde_json::json!({ "query": query });
        let response = self
            .http
            .post(self.config.subgraph_uri())
            .json(&body)
            .header(
                reqwest::header::CONTENT_TYPE,
                reqwest::header::HeaderValue::from_static("application/json"),
            )
            .send()
            .await?;

        Ok(response.text().await?)
    }

    async fn post_graphql<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<graphql_client::Response<Q::ResponseData>> {
        let body = Q::build_query(variables);
        let response = self
            .http
            .post(self.config.subgraph_uri())
            .json(&body)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    fn take_data<T>(response: graphql_client::Response<T>) -> Result<T> {
        if let Some(errors) = &response.errors {
            if !errors.is_empty() {
                let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                return Err(anyhow!("GraphQL errors: {}", messages.join("; ")));
            }
        }
        response
            .data
            .ok_or_else(|| anyhow!("Response data is missing"))
    }

    #[instrument(
        skip(self),
        fields(
            subgraph = %self.config.subgraph_uri()
        ),
    )]
    pub async fn run_watch_loop(&mut self) -> Result<()> {
        info!("Watching for new pay events");

        let mut remaining_retries = 5;

        loop {
            match self.fetch_new_pay_events().await {
                Ok((true, events)) => {
                    for event in &events {
                        info!(
                            project = %event.project.id,
                            beneficiary = %event.beneficiary,
                            amount = %event.amount,
                            "new pay event"
                        );
                    }
                    remaining_retries = 5
                }
                Ok((false, _)) => remaining_retries = 5,
                Err(error) => {
                    error!("Error when fetching pay events {error}");
                    remaining_retries -= 1;

                    if remaining_retries <= 0 {
                        error!("Finishing watch loop");
                        return Err(error);
                    }
                }
            }
            let fetch_interval_ms = env::var("FETCH_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(10000);

            tokio::time::sleep(std::time::Duration::from_millis(fetch_interval_ms)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subgraph_uri_reflects_scheme_port_and_path() {
        let config = JuiceboxClientConfig {
            address: "gateway.example.com".to_string(),
            graphql_port: 443,
            use_https: true,
            subgraph_path: "/subgraphs/name/juicebox/mainnet".to_string(),
        };
        assert_eq!(
            config.subgraph_uri(),
            "https://gateway.example.com:443/subgraphs/name/juicebox/mainnet"
        );

        let config = JuiceboxClientConfig {
            address: "127.0.0.1".to_string(),
            graphql_port: 8000,
            use_https: false,
            subgraph_path: "/subgraphs/name/juicebox/local".to_string(),
        };
        assert_eq!(
            config.subgraph_uri(),
            "http://127.0.0.1:8000/subgraphs/name/juicebox/local"
        );
    }
}
