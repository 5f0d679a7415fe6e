//! Exports every page of a dashboard list as CSV on stdout.
//!
//! Usage: `export_list <resource> [search=<text>] [per_page=<n>]
//! [sort=<field>[:desc]] [<filter>=<value> ...]`

use std::env;
use std::io;
use std::process;
use std::sync::Arc;

use dotenvy::dotenv;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast::error::TryRecvError;

use pushkind_desk::domain::billing::{Invoice, Payment, Product};
use pushkind_desk::domain::customer::Customer;
use pushkind_desk::domain::ticket::{Task, Ticket};
use pushkind_desk::export::CsvExporter;
use pushkind_desk::models::config::DeskConfig;
use pushkind_desk::repository::http::HttpRepository;
use pushkind_desk::{
    ListController, ListQuery, ListSettings, ListStatus, ResourceKind, SessionEvent, Sort,
};

fn fail(message: impl std::fmt::Display) -> ! {
    log::error!("{message}");
    process::exit(1);
}

/// Builds the starting query from `key=value` arguments.
fn build_query(settings: &ListSettings, args: &[String]) -> ListQuery {
    let mut query = ListQuery::new(settings.default_per_page);
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            fail(format!("Expected key=value, got {arg:?}"));
        };

        let accepted = match key {
            "search" => {
                query.set_search(value);
                true
            }
            "per_page" => match value.parse::<u32>().ok().and_then(|n| settings.page_size(n)) {
                Some(per_page) => {
                    query.set_per_page(per_page);
                    true
                }
                None => false,
            },
            "sort" if settings.sortable => {
                let sort = match value.split_once(':') {
                    Some((field, "desc")) => Sort::desc(field),
                    Some((field, _)) => Sort::asc(field),
                    None => Sort::asc(value),
                };
                query.set_sort(Some(sort));
                true
            }
            filter => match settings.filter_key(filter) {
                Some(filter) => {
                    query.set_filter(filter.clone(), value.into());
                    true
                }
                None => false,
            },
        };

        if !accepted {
            fail(format!("Argument {arg:?} is not supported here"));
        }
    }
    query
}

/// Walks every page of `resource` and writes its rows to stdout.
async fn export<T>(resource: ResourceKind, desk_config: &DeskConfig, args: &[String])
where
    T: DeserializeOwned + Serialize + Clone + Send + Sync + 'static,
{
    let settings = resource
        .settings_for(desk_config)
        .unwrap_or_else(|err| fail(format!("Error loading list settings: {err}")));
    let repo = HttpRepository::new(desk_config)
        .unwrap_or_else(|err| fail(format!("Error building HTTP client: {err}")));

    let query = build_query(&settings, args);
    let mut controller: ListController<T> =
        ListController::with_query(Arc::new(repo), settings, query);
    let mut sessions = controller.session_events();

    controller.load();

    let mut exporter = CsvExporter::new(io::stdout().lock());
    let mut page = 1;
    loop {
        let state = controller.settled().await;

        match sessions.try_recv() {
            Ok(SessionEvent::Unauthorized { endpoint }) => {
                fail(format!("Session rejected by {endpoint}; check api_token"))
            }
            Err(TryRecvError::Empty) => {}
            Err(err) => fail(format!("Session channel failed: {err}")),
        }

        if state.status == ListStatus::Error {
            fail(format!(
                "Failed to export {resource}: {}",
                state.error_message.unwrap_or_default()
            ));
        }
        let Some(result) = state.result else {
            break;
        };

        exporter
            .write_rows(&result.items)
            .unwrap_or_else(|err| fail(err));
        log::info!(
            "Exported page {} of {} from {resource}",
            result.current_page,
            result.max_page()
        );

        page += 1;
        if page > result.max_page() || !controller.set_page(page) {
            break;
        }
    }

    let rows = exporter.rows();
    if let Err(err) = exporter.finish() {
        fail(err);
    }
    log::info!("Exported {rows} rows from {resource}");
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((resource, rest)) = args.split_first() else {
        fail("Usage: export_list <resource> [key=value ...]");
    };
    let resource = resource
        .parse::<ResourceKind>()
        .unwrap_or_else(|err| fail(format!("Unknown resource: {err}")));

    let desk_config = DeskConfig::load().unwrap_or_else(|err| fail(err));

    match resource {
        ResourceKind::Customers => export::<Customer>(resource, &desk_config, rest).await,
        ResourceKind::Tickets | ResourceKind::TrashedTickets => {
            export::<Ticket>(resource, &desk_config, rest).await
        }
        ResourceKind::Tasks => export::<Task>(resource, &desk_config, rest).await,
        ResourceKind::Invoices => export::<Invoice>(resource, &desk_config, rest).await,
        ResourceKind::Payments => export::<Payment>(resource, &desk_config, rest).await,
        ResourceKind::Products => export::<Product>(resource, &desk_config, rest).await,
    }
}
