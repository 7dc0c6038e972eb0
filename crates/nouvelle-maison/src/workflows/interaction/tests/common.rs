use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::catalog::{Catalog, NotaryRef, Property};
use crate::config::DelayConfig;
use crate::workflows::interaction::{
    FlowDelays, FlowSubject, FrontDesk, InteractionFlow, ScheduleForm,
};
use crate::workflows::session::{Session, User};

pub(super) const PROCESSING: Duration = Duration::from_millis(2000);
pub(super) const AUTO_CLOSE: Duration = Duration::from_millis(1500);

pub(super) fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::embedded().expect("fixtures parse"))
}

pub(super) fn desk() -> Arc<FrontDesk> {
    Arc::new(FrontDesk::new(catalog(), &DelayConfig::default()))
}

pub(super) fn delays() -> FlowDelays {
    FlowDelays {
        processing: PROCESSING,
        auto_close: AUTO_CLOSE,
    }
}

pub(super) fn property(available: bool) -> Property {
    Property {
        title: "Villa Moderne".to_string(),
        price: "450,000".to_string(),
        location: "Cocody".to_string(),
        beds: 4,
        baths: 3,
        size: "280 m²".to_string(),
        image_url: String::new(),
        video_url: String::new(),
        available,
        notary: None,
    }
}

pub(super) fn notary_ref() -> NotaryRef {
    NotaryRef {
        id: 1,
        name: "Me. Sophie Dubois".to_string(),
        title: "Notaire Principal".to_string(),
        image_url: String::new(),
        email: "sophie.dubois@notaires.ci".to_string(),
    }
}

pub(super) fn flow() -> InteractionFlow {
    InteractionFlow::new(FlowSubject::Property(property(true)), delays())
}

pub(super) fn managed_flow() -> InteractionFlow {
    let mut managed = property(true);
    managed.notary = Some(notary_ref());
    InteractionFlow::new(FlowSubject::Property(managed), delays())
}

pub(super) fn guest() -> Session {
    Session::default()
}

pub(super) fn member() -> Session {
    let mut session = Session::default();
    session.sign_in(User {
        name: "Awa Koné".to_string(),
        email: "awa@example.ci".to_string(),
    });
    session
}

pub(super) fn schedule_form() -> ScheduleForm {
    ScheduleForm {
        date: NaiveDate::from_ymd_opt(2025, 6, 12),
        time: NaiveTime::from_hms_opt(10, 30, 0),
        name: "Awa Koné".to_string(),
        phone: "+225 07 00 00 00".to_string(),
        email: "awa@example.ci".to_string(),
        notes: "Plutôt le matin".to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Let paused time run forward so spawned timers can fire.
pub(super) async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
    tokio::task::yield_now().await;
}
