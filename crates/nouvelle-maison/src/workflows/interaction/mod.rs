//! Property-card interactions: the visit, rental, and notary appointment
//! flows, the front desk that owns them per visitor, and its HTTP routes.

pub mod domain;
mod machine;
pub mod router;
mod runtime;

#[cfg(test)]
mod tests;

pub use domain::{
    Completion, DetailsForm, FlowDelays, FlowError, FlowEvent, FlowKind, FlowOutcome, FlowState,
    FlowStep, FlowSubject, FlowView, PaymentMethod, ScheduleForm, Scheduled, TermsForm, Ticket,
    Timer,
};
pub use machine::InteractionFlow;
pub use router::front_desk_router;
pub use runtime::{
    DeskError, FlowId, FlowTarget, FrontDesk, LoginOutcome, VisitorId, VisitorView,
};
