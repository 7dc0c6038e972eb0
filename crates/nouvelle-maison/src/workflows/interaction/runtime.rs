use super::domain::{
    Completion, FlowDelays, FlowError, FlowEvent, FlowSubject, FlowView, Scheduled, Ticket,
};
use super::machine::InteractionFlow;
use crate::catalog::Catalog;
use crate::config::DelayConfig;
use crate::i18n::Language;
use crate::workflows::navigation::{Navigator, View};
use crate::workflows::notaries::NotaryDirectory;
use crate::workflows::search::{SearchQuery, SearchResults, SearchService, SortOrder};
use crate::workflows::session::{AuthError, AuthForm, AuthService, Session, User};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorId(pub u64);

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visitor-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowId(pub u64);

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flow-{}", self.0)
    }
}

/// Which card a new flow is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum FlowTarget {
    /// Position in the visitor's current search results.
    SearchResult { index: usize },
    NotaryProperty { notary_id: u32, index: usize },
    /// Appointment straight from the notary directory.
    Notary { notary_id: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeskError {
    #[error("unknown visitor {0}")]
    UnknownVisitor(VisitorId),
    #[error("unknown flow {0}")]
    UnknownFlow(FlowId),
    #[error("unknown notary {0}")]
    UnknownNotary(u32),
    #[error("no property at position {0}")]
    UnknownProperty(usize),
    #[error("no search has been run yet")]
    NoSearchResults,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

#[derive(Debug, Default)]
struct Visitor {
    session: Session,
    navigator: Navigator,
    language: Language,
    directory: NotaryDirectory,
    results: Option<SearchResults>,
    flows: BTreeMap<FlowId, InteractionFlow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitorView {
    pub id: VisitorId,
    pub view: View,
    pub language: Language,
    pub user: Option<User>,
    pub selected_notary: Option<u32>,
    pub flows: Vec<FlowId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginOutcome {
    pub user: User,
    /// The flow that asked for sign-in, after resuming it.
    pub flow: Option<FlowView>,
}

/// Every visitor's session, page, and card flows, plus the timers driving them.
///
/// Visitors never share state. Delays run as spawned tokio tasks that present
/// their ticket back to the owning flow; completions for flows that were closed
/// or removed in the meantime are dropped.
pub struct FrontDesk {
    catalog: Arc<Catalog>,
    auth: AuthService,
    search: SearchService,
    flow_delays: FlowDelays,
    visitors: Mutex<HashMap<VisitorId, Visitor>>,
    next_visitor: AtomicU64,
    next_flow: AtomicU64,
}

impl FrontDesk {
    pub fn new(catalog: Arc<Catalog>, delays: &DelayConfig) -> Self {
        Self {
            auth: AuthService::new(delays.login),
            search: SearchService::new(Arc::clone(&catalog), delays.search),
            flow_delays: FlowDelays::from(delays),
            catalog,
            visitors: Mutex::new(HashMap::new()),
            next_visitor: AtomicU64::new(1),
            next_flow: AtomicU64::new(1),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn visitor_count(&self) -> usize {
        self.visitors().len()
    }

    pub fn open_visitor(&self) -> VisitorId {
        let id = VisitorId(self.next_visitor.fetch_add(1, Ordering::Relaxed));
        self.visitors().insert(id, Visitor::default());
        info!(visitor = %id, "visitor arrived");
        id
    }

    /// Forget a visitor together with their flows. Pending timers for those flows are dropped.
    pub fn close_visitor(&self, id: VisitorId) -> Result<(), DeskError> {
        let visitor = self
            .visitors()
            .remove(&id)
            .ok_or(DeskError::UnknownVisitor(id))?;
        info!(visitor = %id, flows = visitor.flows.len(), "visitor left");
        Ok(())
    }

    pub fn visitor_view(&self, id: VisitorId) -> Result<VisitorView, DeskError> {
        let visitors = self.visitors();
        let visitor = visitors.get(&id).ok_or(DeskError::UnknownVisitor(id))?;
        Ok(visitor.view(id))
    }

    pub fn set_language(&self, id: VisitorId, language: Language) -> Result<VisitorView, DeskError> {
        self.with_visitor(id, |visitor| {
            visitor.language = language;
            Ok(visitor.view(id))
        })
    }

    /// Switch pages. Showing results needs a search to have run.
    pub fn navigate(&self, id: VisitorId, view: View) -> Result<VisitorView, DeskError> {
        self.with_visitor(id, |visitor| {
            if let View::Results { .. } = view {
                let location = visitor
                    .results
                    .as_ref()
                    .map(|results| results.location.clone())
                    .ok_or(DeskError::NoSearchResults)?;
                visitor.navigator.show_results(location);
            } else {
                visitor.navigator.show(view);
            }
            Ok(visitor.view(id))
        })
    }

    /// Run a search for the visitor and show its results. Blank input changes nothing.
    pub async fn search(
        &self,
        id: VisitorId,
        query: SearchQuery,
    ) -> Result<Option<SearchResults>, DeskError> {
        self.ensure_visitor(id)?;

        let Some(results) = self.search.search(&query).await else {
            return Ok(None);
        };

        self.with_visitor(id, |visitor| {
            visitor.navigator.show_results(results.location.clone());
            visitor.results = Some(results.clone());
            Ok(Some(results))
        })
    }

    pub fn results(&self, id: VisitorId) -> Result<SearchResults, DeskError> {
        self.with_visitor(id, |visitor| {
            visitor.results.clone().ok_or(DeskError::NoSearchResults)
        })
    }

    pub fn sort_results(&self, id: VisitorId, sort: SortOrder) -> Result<SearchResults, DeskError> {
        let catalog = Arc::clone(&self.catalog);
        self.with_visitor(id, |visitor| {
            let results = visitor.results.as_mut().ok_or(DeskError::NoSearchResults)?;
            results.resort(&catalog, sort);
            Ok(results.clone())
        })
    }

    /// Mock sign-in. When `resume` names a flow waiting on sign-in, it picks up where it stopped.
    pub async fn login(
        &self,
        id: VisitorId,
        form: AuthForm,
        resume: Option<FlowId>,
    ) -> Result<LoginOutcome, DeskError> {
        self.with_visitor(id, |visitor| match resume {
            Some(flow_id) if !visitor.flows.contains_key(&flow_id) => {
                Err(DeskError::UnknownFlow(flow_id))
            }
            _ => Ok(()),
        })?;

        let user = self.auth.login(form).await?;

        self.with_visitor(id, |visitor| {
            visitor.session.sign_in(user.clone());
            info!(visitor = %id, name = %user.name, "visitor signed in");
            let flow = resume.and_then(|flow_id| resume_after_sign_in(id, visitor, flow_id));
            Ok(LoginOutcome { user, flow })
        })
    }

    pub fn logout(&self, id: VisitorId) -> Result<VisitorView, DeskError> {
        self.with_visitor(id, |visitor| {
            if let Some(user) = visitor.session.sign_out() {
                info!(visitor = %id, name = %user.name, "visitor signed out");
            }
            Ok(visitor.view(id))
        })
    }

    pub fn toggle_notary(&self, id: VisitorId, notary_id: u32) -> Result<VisitorView, DeskError> {
        let notary = self
            .catalog
            .notary(notary_id)
            .ok_or(DeskError::UnknownNotary(notary_id))?;
        self.with_visitor(id, |visitor| {
            visitor.directory.toggle(notary);
            Ok(visitor.view(id))
        })
    }

    pub fn open_flow(
        &self,
        id: VisitorId,
        target: FlowTarget,
    ) -> Result<(FlowId, FlowView), DeskError> {
        let catalog = Arc::clone(&self.catalog);
        let delays = self.flow_delays;
        self.with_visitor(id, |visitor| {
            let subject = match target {
                FlowTarget::SearchResult { index } => {
                    let results = visitor.results.as_ref().ok_or(DeskError::NoSearchResults)?;
                    let property = results
                        .properties
                        .get(index)
                        .ok_or(DeskError::UnknownProperty(index))?;
                    FlowSubject::Property(property.clone())
                }
                FlowTarget::NotaryProperty { notary_id, index } => {
                    let notary = catalog
                        .notary(notary_id)
                        .ok_or(DeskError::UnknownNotary(notary_id))?;
                    let property = notary
                        .properties
                        .get(index)
                        .ok_or(DeskError::UnknownProperty(index))?;
                    FlowSubject::Property(property.clone())
                }
                FlowTarget::Notary { notary_id } => {
                    let notary = catalog
                        .notary(notary_id)
                        .ok_or(DeskError::UnknownNotary(notary_id))?;
                    FlowSubject::Notary(notary.reference())
                }
            };

            let flow_id = FlowId(self.next_flow.fetch_add(1, Ordering::Relaxed));
            let flow = InteractionFlow::new(subject, delays);
            debug!(visitor = %id, flow = %flow_id, subject = %flow.subject().title(), "flow opened");
            let view = flow.view();
            visitor.flows.insert(flow_id, flow);
            Ok((flow_id, view))
        })
    }

    pub fn flow_view(&self, id: VisitorId, flow_id: FlowId) -> Result<FlowView, DeskError> {
        self.with_flow(id, flow_id, |flow, _| Ok(flow.view()))
    }

    /// Apply a UI event, starting the timer it asks for.
    pub fn apply(
        self: &Arc<Self>,
        id: VisitorId,
        flow_id: FlowId,
        event: FlowEvent,
    ) -> Result<FlowView, DeskError> {
        let (view, scheduled) = self.with_flow(id, flow_id, |flow, session| {
            let scheduled = flow.apply(event, session)?;
            Ok((flow.view(), scheduled))
        })?;

        if let Some(scheduled) = scheduled {
            self.schedule(id, flow_id, scheduled);
        }
        Ok(view)
    }

    pub fn remove_flow(&self, id: VisitorId, flow_id: FlowId) -> Result<(), DeskError> {
        self.with_visitor(id, |visitor| {
            if visitor.flows.remove(&flow_id).is_none() {
                return Err(DeskError::UnknownFlow(flow_id));
            }
            debug!(visitor = %id, flow = %flow_id, "flow removed");
            Ok(())
        })
    }

    fn schedule(self: &Arc<Self>, id: VisitorId, flow_id: FlowId, scheduled: Scheduled) {
        debug!(
            visitor = %id,
            flow = %flow_id,
            ticket = %scheduled.ticket,
            timer = ?scheduled.timer,
            delay = ?scheduled.delay,
            "timer scheduled"
        );
        let desk = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(scheduled.delay).await;
            desk.fire(id, flow_id, scheduled.ticket);
        });
    }

    /// Deliver an elapsed timer to its flow.
    pub(crate) fn fire(self: &Arc<Self>, id: VisitorId, flow_id: FlowId, ticket: Ticket) {
        let completion = {
            let mut visitors = self.visitors();
            let Some(flow) = visitors
                .get_mut(&id)
                .and_then(|visitor| visitor.flows.get_mut(&flow_id))
            else {
                debug!(visitor = %id, flow = %flow_id, %ticket, "timer fired for a removed flow");
                return;
            };
            flow.complete(ticket, Utc::now())
        };

        match completion {
            Completion::Advanced(Some(next)) => self.schedule(id, flow_id, next),
            Completion::Advanced(None) => {
                debug!(visitor = %id, flow = %flow_id, %ticket, "flow closed itself")
            }
            Completion::Stale => {}
        }
    }

    fn visitors(&self) -> MutexGuard<'_, HashMap<VisitorId, Visitor>> {
        self.visitors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_visitor(&self, id: VisitorId) -> Result<(), DeskError> {
        self.with_visitor(id, |_| Ok(()))
    }

    fn with_visitor<T>(
        &self,
        id: VisitorId,
        f: impl FnOnce(&mut Visitor) -> Result<T, DeskError>,
    ) -> Result<T, DeskError> {
        let mut visitors = self.visitors();
        let visitor = visitors.get_mut(&id).ok_or(DeskError::UnknownVisitor(id))?;
        f(visitor)
    }

    fn with_flow<T>(
        &self,
        id: VisitorId,
        flow_id: FlowId,
        f: impl FnOnce(&mut InteractionFlow, &Session) -> Result<T, DeskError>,
    ) -> Result<T, DeskError> {
        self.with_visitor(id, |visitor| {
            let flow = visitor
                .flows
                .get_mut(&flow_id)
                .ok_or(DeskError::UnknownFlow(flow_id))?;
            f(flow, &visitor.session)
        })
    }
}

/// Sign-in already happened; a flow that stopped waiting for it in the meantime stays as it is.
fn resume_after_sign_in(
    id: VisitorId,
    visitor: &mut Visitor,
    flow_id: FlowId,
) -> Option<FlowView> {
    let Some(flow) = visitor.flows.get_mut(&flow_id) else {
        warn!(visitor = %id, flow = %flow_id, "flow removed before sign-in finished");
        return None;
    };
    match flow.auth_succeeded() {
        Ok(()) => Some(flow.view()),
        Err(error) => {
            warn!(visitor = %id, flow = %flow_id, %error, "flow not resumed after sign-in");
            None
        }
    }
}

impl Visitor {
    fn view(&self, id: VisitorId) -> VisitorView {
        VisitorView {
            id,
            view: self.navigator.current().clone(),
            language: self.language,
            user: self.session.user().cloned(),
            selected_notary: self.directory.selected(),
            flows: self.flows.keys().copied().collect(),
        }
    }
}
