use super::domain::{
    Completion, DetailsForm, FlowDelays, FlowError, FlowEvent, FlowKind, FlowOutcome, FlowState,
    FlowSubject, FlowView, PaymentMethod, ScheduleForm, Scheduled, Ticket, Timer,
};
use crate::workflows::attachment::Attachment;
use crate::workflows::session::Session;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Interaction state for one property card or notary appointment.
///
/// The flow never sleeps. Operations that start a delay return a [`Scheduled`]
/// and the caller hands its ticket back through [`InteractionFlow::complete`]
/// when the delay elapses. Closing the flow retires the ticket, so a late
/// completion cannot touch a reopened flow.
#[derive(Debug, Clone)]
pub struct InteractionFlow {
    subject: FlowSubject,
    state: FlowState,
    delays: FlowDelays,
    last_ticket: u64,
    outcomes: Vec<FlowOutcome>,
}

impl InteractionFlow {
    pub fn new(subject: FlowSubject, delays: FlowDelays) -> Self {
        Self {
            subject,
            state: FlowState::Idle,
            delays,
            last_ticket: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn subject(&self) -> &FlowSubject {
        &self.subject
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn outcomes(&self) -> &[FlowOutcome] {
        &self.outcomes
    }

    /// "Je suis intéressé" on a property, or "Prendre rendez-vous" on a notary.
    pub fn express_interest(&mut self, session: &Session) -> Result<(), FlowError> {
        if !self.subject.is_available() {
            return Err(FlowError::PropertyUnavailable);
        }

        let managed = self.subject.notary().is_some();
        let next = match (&self.state, managed, session.is_authenticated()) {
            (FlowState::Idle, true, true) => Self::details(FlowKind::NotaryAppointment),
            (FlowState::Idle, true, false) => FlowState::AuthRequired {
                resume: Some(FlowKind::NotaryAppointment),
            },
            (FlowState::Idle, false, true) => FlowState::ActionMenuOpen,
            (FlowState::Idle, false, false) => FlowState::AuthRequired { resume: None },
            (FlowState::ActionMenuOpen, _, _) => FlowState::Idle,
            (other, _, _) => return Err(invalid("express interest", other)),
        };

        self.transition(next);
        Ok(())
    }

    /// Pick visit or rental from the action menu.
    pub fn choose(&mut self, kind: FlowKind, session: &Session) -> Result<(), FlowError> {
        if !matches!(self.state, FlowState::ActionMenuOpen) {
            return Err(invalid("choose an action", &self.state));
        }
        if kind == FlowKind::NotaryAppointment {
            return Err(invalid("book a notary from the action menu", &self.state));
        }

        let next = if session.is_authenticated() {
            Self::details(kind)
        } else {
            FlowState::AuthRequired { resume: Some(kind) }
        };
        self.transition(next);
        Ok(())
    }

    /// Resume whatever was pending when sign-in was requested.
    pub fn auth_succeeded(&mut self) -> Result<(), FlowError> {
        let next = match &self.state {
            FlowState::AuthRequired { resume: Some(kind) } => Self::details(*kind),
            FlowState::AuthRequired { resume: None } => FlowState::ActionMenuOpen,
            other => return Err(invalid("resume after sign-in", other)),
        };
        self.transition(next);
        Ok(())
    }

    pub fn dismiss_auth(&mut self) -> Result<(), FlowError> {
        if !matches!(self.state, FlowState::AuthRequired { .. }) {
            return Err(invalid("dismiss sign-in", &self.state));
        }
        self.transition(FlowState::Idle);
        Ok(())
    }

    pub fn accept_terms(&mut self, accepted: bool) -> Result<(), FlowError> {
        match &mut self.state {
            FlowState::Details {
                form: DetailsForm::Terms(terms),
                ..
            } => {
                terms.accepted = accepted;
                Ok(())
            }
            other => Err(invalid("accept terms", other)),
        }
    }

    /// Keep the identity document if its type is accepted; otherwise leave the form as is.
    pub fn attach_identity_document(&mut self, attachment: Attachment) -> Result<(), FlowError> {
        match &mut self.state {
            FlowState::Details {
                form: DetailsForm::Terms(terms),
                ..
            } => {
                if !attachment.is_identity_document() {
                    return Err(FlowError::UnsupportedDocument {
                        file_name: attachment.file_name,
                    });
                }
                terms.identity_document = Some(attachment);
                Ok(())
            }
            other => Err(invalid("attach a document", other)),
        }
    }

    pub fn update_schedule(&mut self, update: ScheduleForm) -> Result<(), FlowError> {
        match &mut self.state {
            FlowState::Details {
                form: DetailsForm::Schedule(schedule),
                ..
            } => {
                *schedule = update;
                Ok(())
            }
            other => Err(invalid("edit the schedule", other)),
        }
    }

    /// Validate the first step. Paid kinds move to payment; free ones start processing.
    pub fn submit_details(&mut self) -> Result<Option<Scheduled>, FlowError> {
        let (kind, form) = match &self.state {
            FlowState::Details { kind, form } => (*kind, form.clone()),
            other => return Err(invalid("continue", other)),
        };
        form.validate()?;

        if kind.fee().is_some() {
            self.transition(FlowState::Payment {
                kind,
                form,
                method: None,
            });
            Ok(None)
        } else {
            Ok(Some(self.start_processing(kind, form, None)))
        }
    }

    pub fn select_payment_method(&mut self, selected: PaymentMethod) -> Result<(), FlowError> {
        match &mut self.state {
            FlowState::Payment { method, .. } => {
                *method = Some(selected);
                Ok(())
            }
            other => Err(invalid("select a payment method", other)),
        }
    }

    pub fn confirm_payment(&mut self) -> Result<Scheduled, FlowError> {
        let (kind, form, method) = match &self.state {
            FlowState::Payment { kind, form, method } => (*kind, form.clone(), *method),
            other => return Err(invalid("confirm payment", other)),
        };
        let method = method.ok_or(FlowError::MissingPaymentMethod)?;
        Ok(self.start_processing(kind, form, Some(method)))
    }

    /// Hand back a ticket whose delay has elapsed.
    pub fn complete(&mut self, ticket: Ticket, now: DateTime<Utc>) -> Completion {
        if self.state.pending_ticket() != Some(ticket) {
            warn!(
                subject = %self.subject.title(),
                %ticket,
                step = %self.state.step(),
                "discarding stale completion"
            );
            return Completion::Stale;
        }

        match &self.state {
            FlowState::Processing { kind, method, .. } => {
                let kind = *kind;
                let outcome = FlowOutcome {
                    kind,
                    method: *method,
                    fee: kind.fee(),
                    completed_at: now,
                };
                info!(
                    subject = %self.subject.title(),
                    kind = ?outcome.kind,
                    method = ?outcome.method,
                    "flow confirmed"
                );
                self.outcomes.push(outcome);

                let ticket = self.issue_ticket();
                self.transition(FlowState::Confirmed { kind, ticket });
                Completion::Advanced(Some(Scheduled {
                    ticket,
                    timer: Timer::AutoClose,
                    delay: self.delays.auto_close,
                }))
            }
            _ => {
                self.transition(FlowState::Idle);
                Completion::Advanced(None)
            }
        }
    }

    /// Close whatever is open. Any outstanding ticket becomes stale.
    pub fn close(&mut self) {
        if !matches!(self.state, FlowState::Idle) {
            self.transition(FlowState::Idle);
        }
    }

    pub fn apply(
        &mut self,
        event: FlowEvent,
        session: &Session,
    ) -> Result<Option<Scheduled>, FlowError> {
        match event {
            FlowEvent::ExpressInterest => self.express_interest(session).map(|()| None),
            FlowEvent::Choose { kind } => self.choose(kind, session).map(|()| None),
            FlowEvent::DismissAuth => self.dismiss_auth().map(|()| None),
            FlowEvent::AcceptTerms { accepted } => self.accept_terms(accepted).map(|()| None),
            FlowEvent::AttachDocument { file_name } => self
                .attach_identity_document(Attachment::new(file_name))
                .map(|()| None),
            FlowEvent::UpdateSchedule { form } => self.update_schedule(form).map(|()| None),
            FlowEvent::Continue => self.submit_details(),
            FlowEvent::SelectPayment { method } => {
                self.select_payment_method(method).map(|()| None)
            }
            FlowEvent::ConfirmPayment => self.confirm_payment().map(Some),
            FlowEvent::Close => {
                self.close();
                Ok(None)
            }
        }
    }

    pub fn view(&self) -> FlowView {
        let step = self.state.step();
        let kind = self.state.kind();
        let (title, form, method) = match &self.state {
            FlowState::Details { kind, form } => (Some(kind.details_title()), Some(form), None),
            FlowState::Payment { kind, form, method }
            | FlowState::Processing {
                kind, form, method, ..
            } => (Some(kind.payment_title()), Some(form), *method),
            FlowState::Confirmed { .. } => (Some("Confirmation"), None, None),
            _ => (None, None, None),
        };
        let processing = matches!(self.state, FlowState::Processing { .. });
        let message = match &self.state {
            FlowState::Confirmed { kind, .. } => Some(kind.success_message()),
            _ => None,
        };
        let action_label = if processing {
            "Traitement en cours..."
        } else if self.subject.notary().is_some() {
            "Prendre rendez-vous avec le notaire"
        } else {
            "Je suis intéressé"
        };

        FlowView {
            subject: self.subject.title().to_string(),
            available: self.subject.is_available(),
            step,
            kind,
            title,
            fee: kind.and_then(FlowKind::fee),
            form: form.cloned(),
            method,
            processing,
            message,
            action_label,
            outcomes: self.outcomes.clone(),
        }
    }

    fn details(kind: FlowKind) -> FlowState {
        FlowState::Details {
            kind,
            form: kind.blank_form(),
        }
    }

    fn start_processing(
        &mut self,
        kind: FlowKind,
        form: DetailsForm,
        method: Option<PaymentMethod>,
    ) -> Scheduled {
        let ticket = self.issue_ticket();
        self.transition(FlowState::Processing {
            kind,
            form,
            method,
            ticket,
        });
        Scheduled {
            ticket,
            timer: Timer::Processing,
            delay: self.delays.processing,
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    fn transition(&mut self, next: FlowState) {
        debug!(
            subject = %self.subject.title(),
            from = %self.state.step(),
            to = %next.step(),
            "flow transition"
        );
        self.state = next;
    }
}

fn invalid(action: &'static str, state: &FlowState) -> FlowError {
    FlowError::InvalidTransition {
        action,
        step: state.step(),
    }
}
