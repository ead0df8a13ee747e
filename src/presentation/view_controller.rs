// Dashboard view controller - reloads the view whenever the filters change
use crate::application::dashboard_service::DashboardService;
use crate::domain::dashboard::DashboardView;
use crate::domain::filters::FilterSet;
use crate::presentation::chart_widgets::ChartPanel;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading {
        request: u64,
        filters: FilterSet,
    },
    Ready {
        request: u64,
        filters: FilterSet,
        view: DashboardView,
        panels: Vec<ChartPanel>,
    },
    Failed {
        request: u64,
        filters: FilterSet,
        message: String,
    },
}

/// Owns the published state of one dashboard page.
///
/// Every filter change gets the next request number. A finished load is
/// published only while its number is still the latest issued, so results
/// that arrive out of order never overwrite a newer request.
pub struct DashboardController {
    service: DashboardService,
    dashboard: String,
    sequence: AtomicU64,
    state: watch::Sender<ViewState>,
}

impl DashboardController {
    pub fn new(service: DashboardService, dashboard: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            service,
            dashboard: dashboard.into(),
            sequence: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Returns whether this request's outcome was published
    pub async fn apply_filters(&self, filters: FilterSet) -> bool {
        let request = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(request, ViewState::Loading { request, filters });

        let next = match self.service.build_view(&self.dashboard, filters).await {
            Ok(view) => {
                let panels = view.charts.iter().map(ChartPanel::from_datum).collect();
                ViewState::Ready {
                    request,
                    filters,
                    view,
                    panels,
                }
            }
            Err(e) => ViewState::Failed {
                request,
                filters,
                message: e.to_string(),
            },
        };

        let published = self.publish(request, next);
        if !published {
            tracing::debug!(
                dashboard = %self.dashboard,
                request,
                latest = self.sequence.load(Ordering::SeqCst),
                "Discarded stale dashboard view"
            );
        }
        published
    }

    fn publish(&self, request: u64, next: ViewState) -> bool {
        self.state.send_if_modified(|current| {
            if self.sequence.load(Ordering::SeqCst) != request {
                return false;
            }
            *current = next;
            true
        })
    }
}
