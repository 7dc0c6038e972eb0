use crate::catalog::{Fcfa, NotaryRef, Property};
use crate::workflows::attachment::Attachment;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Visit,
    Rental,
    NotaryAppointment,
}

impl FlowKind {
    /// Fee charged before processing. Appointments are free and skip payment.
    pub const fn fee(self) -> Option<Fcfa> {
        match self {
            FlowKind::Visit => Some(Fcfa(5_000)),
            FlowKind::Rental => Some(Fcfa(12_000)),
            FlowKind::NotaryAppointment => None,
        }
    }

    pub const fn details_title(self) -> &'static str {
        match self {
            FlowKind::Visit => "Planifier une visite",
            FlowKind::Rental => "Conditions de location",
            FlowKind::NotaryAppointment => "Prendre rendez-vous",
        }
    }

    pub const fn payment_title(self) -> &'static str {
        match self {
            FlowKind::Visit => "Paiement des frais de visite",
            FlowKind::Rental => "Documents et paiement",
            FlowKind::NotaryAppointment => "Prendre rendez-vous",
        }
    }

    pub const fn success_message(self) -> &'static str {
        match self {
            FlowKind::Visit => "Visite planifiée avec succès!",
            FlowKind::Rental => "Paiement effectué avec succès!",
            FlowKind::NotaryAppointment => "Rendez-vous confirmé avec succès!",
        }
    }

    pub const fn follow_up(self) -> &'static str {
        match self {
            FlowKind::Visit => {
                "Votre demande de visite a été confirmée. Vous recevrez un email avec tous les détails du rendez-vous."
            }
            FlowKind::Rental => {
                "Votre dossier de location a été initié. Vous recevrez un email de confirmation avec les prochaines étapes."
            }
            FlowKind::NotaryAppointment => {
                "Votre demande de rendez-vous a été transmise au notaire. Vous recevrez un email de confirmation."
            }
        }
    }

    /// Blank form for the first step of this kind.
    pub(crate) fn blank_form(self) -> DetailsForm {
        match self {
            FlowKind::Rental => DetailsForm::Terms(TermsForm::default()),
            FlowKind::Visit | FlowKind::NotaryAppointment => {
                DetailsForm::Schedule(ScheduleForm::default())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    OrangeMoney,
    MoovMoney,
    MtnMoney,
    Wave,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::OrangeMoney,
        PaymentMethod::MoovMoney,
        PaymentMethod::MtnMoney,
        PaymentMethod::Wave,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::OrangeMoney => "Orange Money",
            PaymentMethod::MoovMoney => "Moov Money",
            PaymentMethod::MtnMoney => "MTN Money",
            PaymentMethod::Wave => "Wave",
        }
    }
}

/// Rental conditions step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsForm {
    pub accepted: bool,
    pub identity_document: Option<Attachment>,
}

impl TermsForm {
    pub fn validate(&self) -> Result<(), FlowError> {
        if !self.accepted {
            return Err(FlowError::TermsNotAccepted);
        }
        if self.identity_document.is_none() {
            return Err(FlowError::MissingIdentityDocument);
        }
        Ok(())
    }
}

/// Visit or appointment request. Notes are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleForm {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
}

impl ScheduleForm {
    pub fn validate(&self) -> Result<(), FlowError> {
        let missing = if self.date.is_none() {
            Some("date")
        } else if self.time.is_none() {
            Some("time")
        } else if self.name.trim().is_empty() {
            Some("name")
        } else if self.phone.trim().is_empty() {
            Some("phone")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else {
            None
        };

        match missing {
            Some(field) => Err(FlowError::MissingScheduleField { field }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum DetailsForm {
    Terms(TermsForm),
    Schedule(ScheduleForm),
}

impl DetailsForm {
    pub fn validate(&self) -> Result<(), FlowError> {
        match self {
            DetailsForm::Terms(form) => form.validate(),
            DetailsForm::Schedule(form) => form.validate(),
        }
    }
}

/// Identifies one scheduled delay within a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the card is about: a listed property, or a notary picked from the directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "subject", rename_all = "snake_case")]
pub enum FlowSubject {
    Property(Property),
    Notary(NotaryRef),
}

impl FlowSubject {
    pub fn title(&self) -> &str {
        match self {
            FlowSubject::Property(property) => &property.title,
            FlowSubject::Notary(notary) => &notary.name,
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            FlowSubject::Property(property) => property.available,
            FlowSubject::Notary(_) => true,
        }
    }

    pub fn notary(&self) -> Option<&NotaryRef> {
        match self {
            FlowSubject::Property(property) => property.notary.as_ref(),
            FlowSubject::Notary(notary) => Some(notary),
        }
    }
}

/// One modal at a time: each variant is the only thing open on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    ActionMenuOpen,
    AuthRequired {
        resume: Option<FlowKind>,
    },
    Details {
        kind: FlowKind,
        form: DetailsForm,
    },
    Payment {
        kind: FlowKind,
        form: DetailsForm,
        method: Option<PaymentMethod>,
    },
    Processing {
        kind: FlowKind,
        form: DetailsForm,
        method: Option<PaymentMethod>,
        ticket: Ticket,
    },
    Confirmed {
        kind: FlowKind,
        ticket: Ticket,
    },
}

impl FlowState {
    pub fn step(&self) -> FlowStep {
        match self {
            FlowState::Idle => FlowStep::Idle,
            FlowState::ActionMenuOpen => FlowStep::ActionMenu,
            FlowState::AuthRequired { .. } => FlowStep::AuthRequired,
            FlowState::Details { .. } => FlowStep::Details,
            FlowState::Payment { .. } => FlowStep::Payment,
            FlowState::Processing { .. } => FlowStep::Processing,
            FlowState::Confirmed { .. } => FlowStep::Confirmed,
        }
    }

    pub fn kind(&self) -> Option<FlowKind> {
        match self {
            FlowState::Idle | FlowState::ActionMenuOpen => None,
            FlowState::AuthRequired { resume } => *resume,
            FlowState::Details { kind, .. }
            | FlowState::Payment { kind, .. }
            | FlowState::Processing { kind, .. }
            | FlowState::Confirmed { kind, .. } => Some(*kind),
        }
    }

    /// Ticket a pending delay must present to advance this state.
    pub fn pending_ticket(&self) -> Option<Ticket> {
        match self {
            FlowState::Processing { ticket, .. } | FlowState::Confirmed { ticket, .. } => {
                Some(*ticket)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Idle,
    ActionMenu,
    AuthRequired,
    Details,
    Payment,
    Processing,
    Confirmed,
}

impl FlowStep {
    pub const fn as_str(self) -> &'static str {
        match self {
            FlowStep::Idle => "idle",
            FlowStep::ActionMenu => "action_menu",
            FlowStep::AuthRequired => "auth_required",
            FlowStep::Details => "details",
            FlowStep::Payment => "payment",
            FlowStep::Processing => "processing",
            FlowStep::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Timer {
    /// Payment or request being processed.
    Processing,
    /// Confirmation shown before the modal closes itself.
    AutoClose,
}

/// A delay the caller must run, then hand `ticket` back to the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub ticket: Ticket,
    pub timer: Timer,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowDelays {
    pub processing: Duration,
    pub auto_close: Duration,
}

impl From<&crate::config::DelayConfig> for FlowDelays {
    fn from(config: &crate::config::DelayConfig) -> Self {
        Self {
            processing: config.payment,
            auto_close: config.confirmation,
        }
    }
}

/// Result of presenting a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Advanced(Option<Scheduled>),
    /// The ticket was retired by a close or superseded; nothing changed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowOutcome {
    pub kind: FlowKind,
    pub method: Option<PaymentMethod>,
    pub fee: Option<Fcfa>,
    pub completed_at: DateTime<Utc>,
}

/// User actions on a card, as they arrive over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    ExpressInterest,
    Choose { kind: FlowKind },
    DismissAuth,
    AcceptTerms { accepted: bool },
    AttachDocument { file_name: String },
    UpdateSchedule { form: ScheduleForm },
    Continue,
    SelectPayment { method: PaymentMethod },
    ConfirmPayment,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("ce bien n'est pas disponible")]
    PropertyUnavailable,
    #[error("cannot {action} while the flow is at step '{step}'")]
    InvalidTransition {
        action: &'static str,
        step: FlowStep,
    },
    #[error("Veuillez accepter les conditions de location")]
    TermsNotAccepted,
    #[error("Veuillez fournir votre pièce d'identité")]
    MissingIdentityDocument,
    #[error("format non accepté pour '{file_name}' (PDF, JPG ou PNG)")]
    UnsupportedDocument { file_name: String },
    #[error("le champ '{field}' est requis")]
    MissingScheduleField { field: &'static str },
    #[error("Veuillez sélectionner un mode de paiement.")]
    MissingPaymentMethod,
}

impl FlowError {
    /// Validation problems the visitor can fix by editing the form.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            FlowError::PropertyUnavailable | FlowError::InvalidTransition { .. }
        )
    }
}

/// Snapshot of a card for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowView {
    pub subject: String,
    pub available: bool,
    pub step: FlowStep,
    pub kind: Option<FlowKind>,
    pub title: Option<&'static str>,
    pub fee: Option<Fcfa>,
    pub form: Option<DetailsForm>,
    pub method: Option<PaymentMethod>,
    pub processing: bool,
    pub message: Option<&'static str>,
    pub action_label: &'static str,
    pub outcomes: Vec<FlowOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_schedule() -> ScheduleForm {
        ScheduleForm {
            date: NaiveDate::from_ymd_opt(2025, 6, 12),
            time: NaiveTime::from_hms_opt(10, 30, 0),
            name: "Awa Koné".to_string(),
            phone: "+225 07 00 00 00".to_string(),
            email: "awa@example.ci".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn fees_follow_the_flow_kind() {
        assert_eq!(FlowKind::Visit.fee(), Some(Fcfa(5_000)));
        assert_eq!(FlowKind::Rental.fee(), Some(Fcfa(12_000)));
        assert_eq!(FlowKind::NotaryAppointment.fee(), None);
    }

    #[test]
    fn schedule_reports_the_first_missing_field() {
        assert_eq!(complete_schedule().validate(), Ok(()));

        let mut form = complete_schedule();
        form.phone = "  ".to_string();
        form.email.clear();
        assert_eq!(
            form.validate(),
            Err(FlowError::MissingScheduleField { field: "phone" })
        );

        assert_eq!(
            ScheduleForm::default().validate(),
            Err(FlowError::MissingScheduleField { field: "date" })
        );
    }

    #[test]
    fn terms_need_acceptance_then_document() {
        let mut form = TermsForm::default();
        assert_eq!(form.validate(), Err(FlowError::TermsNotAccepted));
        form.accepted = true;
        assert_eq!(form.validate(), Err(FlowError::MissingIdentityDocument));
        form.identity_document = Some(Attachment::new("cni.pdf"));
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: FlowEvent =
            serde_json::from_str(r#"{"type":"select_payment","method":"orange_money"}"#)
                .expect("event parses");
        assert_eq!(
            event,
            FlowEvent::SelectPayment {
                method: PaymentMethod::OrangeMoney
            }
        );

        let event: FlowEvent = serde_json::from_str(
            r#"{"type":"update_schedule","form":{"date":"2025-06-12","time":"10:30:00","name":"Awa"}}"#,
        )
        .expect("schedule parses");
        match event {
            FlowEvent::UpdateSchedule { form } => {
                assert_eq!(form.date, NaiveDate::from_ymd_opt(2025, 6, 12));
                assert!(form.phone.is_empty());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn only_active_delays_hold_a_ticket() {
        assert_eq!(FlowState::Idle.pending_ticket(), None);
        let state = FlowState::Confirmed {
            kind: FlowKind::Visit,
            ticket: Ticket(4),
        };
        assert_eq!(state.pending_ticket(), Some(Ticket(4)));
        assert_eq!(state.step().to_string(), "confirmed");
    }
}
