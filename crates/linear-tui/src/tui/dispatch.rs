use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::source::DataSource;
use crate::tui::event::{AppEvent, LoadRequest};

/// Runs load requests off the event loop and reports each outcome as one `AppEvent`.
pub struct Dispatcher<S> {
    source: Arc<S>,
    events: UnboundedSender<AppEvent>,
}

impl<S: DataSource> Dispatcher<S> {
    pub fn new(source: Arc<S>, events: UnboundedSender<AppEvent>) -> Self {
        Self { source, events }
    }

    /// Spawn the fetch and return immediately.
    pub fn dispatch(&self, request: LoadRequest) -> JoinHandle<()> {
        debug!(?request, "dispatching load");
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = execute(source.as_ref(), request).await;
            if events.send(event).is_err() {
                debug!("event loop gone; dropping load result");
            }
        })
    }
}

async fn execute<S: DataSource>(source: &S, request: LoadRequest) -> AppEvent {
    let panel = request.panel();
    let generation = request.generation();
    let outcome = match request {
        LoadRequest::Teams { .. } => source
            .fetch_teams()
            .await
            .map(|teams| AppEvent::TeamsLoaded { generation, teams }),
        LoadRequest::TeamIssues { team_id, .. } => source
            .fetch_team_issues(&team_id)
            .await
            .map(|issues| AppEvent::IssuesLoaded { generation, issues }),
        LoadRequest::IssueDetail { issue_id, .. } => source
            .fetch_issue_detail(&issue_id)
            .await
            .map(|issue| AppEvent::IssueDetailLoaded {
                generation,
                issue: Box::new(issue),
            }),
    };

    outcome.unwrap_or_else(|err| {
        let message = format!("{err:#}");
        warn!(?panel, generation, error = %message, "load failed");
        AppEvent::LoadFailed {
            panel,
            generation,
            message,
        }
    })
}
