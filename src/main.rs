use anyhow::Result;
use chrono::{DateTime, Utc};
use juicebox_graphql_client::graphql::{participants, pay_events, project_create_event, projects};
use juicebox_graphql_client::{JuiceboxClientConfig, JuiceboxGraphQLClient};
use structopt::StructOpt;
use url::Url;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "juicebox-graphql-client",
    about = "Debug utility for the Juicebox protocol subgraph."
)]
struct Cli {
    #[structopt(name = "endpoint", env = "SUBGRAPH_URL")]
    /// Subgraph endpoint in format `http(s)://host:port/subgraphs/name/...`.
    endpoint: String,

    #[structopt(subcommand, about = "The command to run.")]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// List projects.
    Projects {
        /// Only projects owned by this address.
        #[structopt(long)]
        owner: Option<String>,
        #[structopt(long, default_value = "100")]
        first: i64,
        #[structopt(long, default_value = "0")]
        skip: i64,
    },
    /// List the participants of a project.
    Participants {
        /// Project number.
        #[structopt(long)]
        project: i64,
        /// Field to sort by (schema spelling, e.g. `totalPaid`).
        #[structopt(long, parse(try_from_str = parse_participant_order_by))]
        order_by: Option<participants::Participant_orderBy>,
        /// Sort descending instead of ascending.
        #[structopt(long)]
        desc: bool,
        #[structopt(long, default_value = "100")]
        first: i64,
        #[structopt(long, default_value = "0")]
        skip: i64,
    },
    /// List pay events, oldest first.
    PayEvents {
        /// Only payments to this project number.
        #[structopt(long)]
        project: Option<i64>,
        /// Only payments benefiting this address.
        #[structopt(long)]
        beneficiary: Option<String>,
        /// Newest first instead of oldest first.
        #[structopt(long)]
        desc: bool,
        #[structopt(long, default_value = "100")]
        first: i64,
        #[structopt(long, default_value = "0")]
        skip: i64,
    },
    /// Show the creation event of a project.
    ProjectCreateEvent {
        /// Project number.
        #[structopt(long)]
        project: i64,
    },
    /// Poll the subgraph for new pay events.
    Watch,
}

fn parse_participant_order_by(s: &str) -> Result<participants::Participant_orderBy> {
    use participants::Participant_orderBy;

    let order_by = match s {
        "id" => Participant_orderBy::id,
        "wallet" => Participant_orderBy::wallet,
        "totalPaid" => Participant_orderBy::totalPaid,
        "lastPaidTimestamp" => Participant_orderBy::lastPaidTimestamp,
        "balance" => Participant_orderBy::balance,
        "stakedBalance" => Participant_orderBy::stakedBalance,
        "unstakedBalance" => Participant_orderBy::unstakedBalance,
        other => anyhow::bail!(
            "unsupported orderBy field {other}, expected one of: id, wallet, totalPaid, \
             lastPaidTimestamp, balance, stakedBalance, unstakedBalance"
        ),
    };
    Ok(order_by)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let opt = Cli::from_args();

    let error_msg = "Invalid endpoint format, expected http(s)://host:port/path";
    let url = Url::parse(&opt.endpoint).expect(error_msg);

    let config = JuiceboxClientConfig {
        address: url.host_str().expect(error_msg).to_string(),
        graphql_port: url.port_or_known_default().expect("port"),
        use_https: url.scheme() == "https",
        subgraph_path: url.path().to_string(),
    };

    let mut client = JuiceboxGraphQLClient::from(config);

    match opt.cmd {
        Command::Projects { owner, first, skip } => {
            let where_ = owner.map(|owner| projects::Project_filter {
                owner: Some(owner),
                ..Default::default()
            });
            let variables = projects::Variables {
                where_,
                first: Some(first),
                skip: Some(skip),
            };
            let rows = client.projects(variables).await?;
            println!("{rows:#?}");
        }
        Command::Participants {
            project,
            order_by,
            desc,
            first,
            skip,
        } => {
            let direction = if desc {
                participants::OrderDirection::desc
            } else {
                participants::OrderDirection::asc
            };
            let variables = participants::Variables {
                where_: Some(participants::Participant_filter {
                    project: Some(project.to_string()),
                    ..Default::default()
                }),
                first: Some(first),
                skip: Some(skip),
                order_by,
                order_direction: Some(direction),
            };
            let rows = client.participants(variables).await?;
            println!("{rows:#?}");
        }
        Command::PayEvents {
            project,
            beneficiary,
            desc,
            first,
            skip,
        } => {
            let direction = if desc {
                pay_events::OrderDirection::desc
            } else {
                pay_events::OrderDirection::asc
            };
            let variables = pay_events::Variables {
                where_: Some(pay_events::PayEvent_filter {
                    project: project.map(|id| id.to_string()),
                    beneficiary,
                    ..Default::default()
                }),
                order_by: Some(pay_events::PayEvent_orderBy::timestamp),
                order_direction: Some(direction),
                first: Some(first),
                skip: Some(skip),
            };
            let events = client.pay_events(variables).await?;
            for event in &events {
                let when = DateTime::<Utc>::from_timestamp(event.timestamp, 0)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| event.timestamp.to_string());
                println!(
                    "{} project {} received {} from {} ({})",
                    when,
                    event.project.id,
                    event.amount,
                    event.beneficiary,
                    event.note.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::ProjectCreateEvent { project } => {
            let variables = project_create_event::Variables {
                where_: Some(project_create_event::ProjectEvent_filter {
                    project: Some(project.to_string()),
                    ..Default::default()
                }),
            };
            match client.project_create_event(variables).await? {
                Some(event) => println!("{event:#?}"),
                None => println!("no create event found for project {project}"),
            }
        }
        Command::Watch => {
            client.run_watch_loop().await?;
        }
    };

    Ok(())
}
