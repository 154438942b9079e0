use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::state::AppState;
use crate::store::{Action, Load, Loaded, Payload, Request};
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Performs the API call behind one load.
pub async fn fetch(client: &ApiClient, request: &Request) -> Result<Payload, ApiError> {
    match request {
        Request::Health => client.health().await.map(|_| Payload::Health),
        Request::Summary => client.summary().await.map(Payload::Summary),
        Request::RecentRecords { per_page } => client
            .records(1, *per_page, None)
            .await
            .map(|page| Payload::RecentRecords(page.items)),
        Request::RecentCheckins { per_page } => client
            .checkins(1, *per_page)
            .await
            .map(|page| Payload::RecentCheckins(page.items)),
        Request::Records {
            page,
            per_page,
            search,
        } => client
            .records(*page, *per_page, search.as_deref())
            .await
            .map(Payload::Records),
        Request::Checkins { page, per_page } => client
            .checkins(*page, *per_page)
            .await
            .map(Payload::Checkins),
        Request::Monthly { year, month } => client
            .monthly_stats(*year, *month)
            .await
            .map(Payload::Monthly),
        Request::Tags => client.tag_analysis().await.map(Payload::Tags),
    }
}

/// Runs `loads` concurrently and feeds each outcome back into the store as it
/// completes. Returns once every load has been applied or dropped.
pub async fn run(state: &AppState, loads: Vec<Load>) {
    let mut tasks = JoinSet::new();
    for load in loads {
        let client = state.client.clone();
        tasks.spawn(async move {
            debug!(section = %load.ticket.section, epoch = load.ticket.epoch, "load started");
            let result = fetch(&client, &load.request).await;
            Loaded {
                ticket: load.ticket,
                request: load.request,
                result,
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(loaded) => {
                state.store.lock().await.dispatch(Action::Loaded(loaded));
            }
            Err(err) => error!(error = %err, "load task failed"),
        }
    }
}

/// Dispatches `action` and waits for the loads it triggers.
pub async fn dispatch(state: &AppState, action: Action) {
    let loads = state.store.lock().await.dispatch(action);
    run(state, loads).await;
}
