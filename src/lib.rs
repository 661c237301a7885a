pub mod graphql;
mod subgraph_client;

pub use graphql::participants::ParticipantsParticipants;
pub use graphql::pay_events::PayEventsPayEvents;
pub use graphql::project_create_event::ProjectCreateEventProjectEventsProjectCreateEvent;
pub use graphql::projects::ProjectsProjects;
pub use subgraph_client::{JuiceboxClientConfig, JuiceboxGraphQLClient};
