// Copyright (c) Viable Systems
// SPDX-License-Identifier: Apache-2.0

use graphql_client::GraphQLQuery;

pub(crate) type BigInt = String;
pub(crate) type Bytes = String;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/participants_query.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone, Default",
    skip_serializing_none
)]
pub struct Participants;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/pay_events_query.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone, Default",
    skip_serializing_none
)]
pub struct PayEvents;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/projects_query.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone, Default",
    skip_serializing_none
)]
pub struct Projects;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/schema.graphql",
    query_path = "graphql/project_create_event_query.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone, Default",
    skip_serializing_none
)]
pub struct ProjectCreateEvent;
