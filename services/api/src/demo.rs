use crate::infra::{build_front_desk, parse_language, parse_sort};
use chrono::{Days, NaiveTime, Utc};
use clap::Args;
use nouvelle_maison::catalog::{rental_categories, subscription_tiers, Catalog};
use nouvelle_maison::config::{AppConfig, DelayConfig};
use nouvelle_maison::error::AppError;
use nouvelle_maison::i18n::{Language, Translator};
use nouvelle_maison::workflows::attachment::Attachment;
use nouvelle_maison::workflows::interaction::{
    DeskError, FlowEvent, FlowId, FlowKind, FlowStep, FlowTarget, FlowView, FrontDesk,
    PaymentMethod, ScheduleForm, VisitorId,
};
use nouvelle_maison::workflows::listing::{ListingType, SellSubmission};
use nouvelle_maison::workflows::notaries::NotaryDirectory;
use nouvelle_maison::workflows::search::{run_search, suggest_zones, SearchQuery, SortOrder};
use nouvelle_maison::workflows::session::AuthForm;
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const MAX_POLLS: u32 = 400;

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Location typed into the search box, e.g. "Cocody"
    pub(crate) term: String,
    /// newest, price-low-to-high or price-high-to-low
    #[arg(long, default_value = "newest", value_parser = parse_sort)]
    pub(crate) sort: SortOrder,
    /// Display language (fr or en)
    #[arg(long, default_value = "fr", value_parser = parse_language)]
    pub(crate) lang: Language,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Location searched at the start of the walkthrough
    #[arg(long, default_value = "Cocody")]
    pub(crate) location: String,
    /// Display language (fr or en)
    #[arg(long, default_value = "fr", value_parser = parse_language)]
    pub(crate) lang: Language,
    /// Skip the simulated delays
    #[arg(long)]
    pub(crate) fast: bool,
}

pub(crate) fn print_search(args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs { term, sort, lang } = args;
    let catalog = Catalog::embedded()?;
    let translator = Translator::new(lang);

    match run_search(&catalog, &SearchQuery::new(term).sorted(sort)) {
        Some(results) => {
            println!("{}", results.headline(translator));
            println!(
                "{}: {}",
                translator.t("searchResults"),
                translator.t(sort.label_key())
            );
            for property in &results.properties {
                println!(
                    "- {} | {} | {} ch. / {} sdb | {} | {}",
                    property.title,
                    property.formatted_price(translator),
                    property.beds,
                    property.baths,
                    property.size,
                    property.availability_label()
                );
            }
        }
        None => println!("Nothing to search for: the location is blank."),
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let delays = if args.fast {
        DelayConfig::instant()
    } else {
        AppConfig::load()?.delays
    };
    let desk = build_front_desk(&delays)?;

    println!("MaNouvelleMaison front desk walkthrough");
    if let Err(err) = walkthrough(&desk, &args).await {
        println!("  Walkthrough stopped: {err}");
    }
    Ok(())
}

async fn walkthrough(desk: &Arc<FrontDesk>, args: &DemoArgs) -> Result<(), DeskError> {
    let translator = Translator::new(args.lang);
    let visitor = desk.open_visitor();
    desk.set_language(visitor, args.lang)?;

    println!("\nZone suggestions for '{}'", args.location);
    for zone in suggest_zones(&args.location, None).iter().take(5) {
        println!("- {}", zone.label());
    }

    let Some(results) = desk.search(visitor, SearchQuery::new(&args.location)).await? else {
        println!("Nothing to search for: the location is blank.");
        return Ok(());
    };
    println!("\n{}", results.headline(translator));
    for property in &results.properties {
        println!(
            "- {} | {} | {}",
            property.title,
            property.formatted_price(translator),
            property.availability_label()
        );
    }

    let sorted = desk.sort_results(visitor, SortOrder::PriceHighToLow)?;
    println!("\n{}", translator.t(SortOrder::PriceHighToLow.label_key()));
    for property in sorted.properties.iter().take(3) {
        println!("- {} ({})", property.title, property.formatted_price(translator));
    }

    let Some(top) = sorted.properties.first() else {
        return Ok(());
    };
    let runner_up = sorted
        .properties
        .get(1)
        .map(|property| property.title.as_str())
        .unwrap_or_default();

    println!("\nVisit request on '{}'", top.title);
    let (visit, _) = desk.open_flow(visitor, FlowTarget::SearchResult { index: 0 })?;
    let view = desk.apply(visitor, visit, FlowEvent::ExpressInterest)?;
    print_step("guest expressed interest", &view);

    let sign_up = AuthForm::sign_up("Awa Koné", "awa@example.ci", "motdepasse", "motdepasse");
    let outcome = desk.login(visitor, sign_up, Some(visit)).await?;
    println!("  Signed in as {} <{}>", outcome.user.name, outcome.user.email);
    if let Some(view) = &outcome.flow {
        print_step("flow resumed", view);
    }

    desk.apply(visitor, visit, FlowEvent::Choose { kind: FlowKind::Visit })?;
    desk.apply(
        visitor,
        visit,
        FlowEvent::UpdateSchedule {
            form: schedule_form(),
        },
    )?;
    let view = desk.apply(visitor, visit, FlowEvent::Continue)?;
    print_step("schedule accepted", &view);
    pay(desk, visitor, visit, PaymentMethod::OrangeMoney, translator).await?;

    println!("\nRental request on '{runner_up}'");
    let (rental, _) = desk.open_flow(visitor, FlowTarget::SearchResult { index: 1 })?;
    desk.apply(visitor, rental, FlowEvent::ExpressInterest)?;
    desk.apply(visitor, rental, FlowEvent::Choose { kind: FlowKind::Rental })?;
    desk.apply(visitor, rental, FlowEvent::AcceptTerms { accepted: true })?;
    desk.apply(
        visitor,
        rental,
        FlowEvent::AttachDocument {
            file_name: "cni-awa-kone.pdf".to_string(),
        },
    )?;
    let view = desk.apply(visitor, rental, FlowEvent::Continue)?;
    print_step("terms accepted", &view);
    pay(desk, visitor, rental, PaymentMethod::Wave, translator).await?;

    println!("\nNotary directory");
    for notary in desk.catalog().notaries() {
        println!(
            "- {} ({}, {}) {}",
            notary.name,
            notary.title,
            notary.experience,
            notary.availability_label().unwrap_or_default()
        );
    }
    let view = desk.toggle_notary(visitor, 1)?;
    let directory = NotaryDirectory::showing(view.selected_notary);
    for notary in desk.catalog().notaries() {
        if let Some(label) = directory.toggle_label(notary) {
            println!("  {}: {label}", notary.name);
        }
    }

    let (appointment, _) = desk.open_flow(visitor, FlowTarget::Notary { notary_id: 1 })?;
    let view = desk.apply(visitor, appointment, FlowEvent::ExpressInterest)?;
    print_step("appointment requested", &view);
    desk.apply(
        visitor,
        appointment,
        FlowEvent::UpdateSchedule {
            form: schedule_form(),
        },
    )?;
    let view = desk.apply(visitor, appointment, FlowEvent::Continue)?;
    print_step("appointment submitted", &view);
    finish(desk, visitor, appointment).await?;

    println!("\nRental categories");
    for category in rental_categories() {
        println!(
            "- {}: {} ({} disponibles)",
            category.name, category.description, category.available
        );
    }

    let base = top.price_amount();
    println!("\nSubscriptions for a {} listing", base.display(translator));
    for tier in subscription_tiers(base) {
        println!("- {}: {}", tier.name, tier.price.display(translator));
    }

    println!("\nSeller submission");
    let mut listing = SellSubmission {
        title: "Villa à Bingerville".to_string(),
        listing_type: Some(ListingType::Villa),
        price: "75 000 000".to_string(),
        ownership_proof: Some(Attachment::new("titre-foncier.pdf")),
        identity_proof: Some(Attachment::new("cni.png")),
        ..SellSubmission::default()
    };
    listing.add_photos([Attachment::new("facade.jpg"), Attachment::new("salon.jpg")]);
    if let Err(err) = listing.validate() {
        println!("  Rejected: {err}");
    }
    listing.add_photos([Attachment::new("jardin.jpg")]);
    match listing.submit(Utc::now()) {
        Ok(receipt) => println!(
            "  {} ({} photos, {})",
            receipt.message,
            receipt.photo_count,
            receipt.asking_price.display(translator)
        ),
        Err(err) => println!("  Rejected: {err}"),
    }

    desk.logout(visitor)?;
    Ok(())
}

async fn pay(
    desk: &Arc<FrontDesk>,
    visitor: VisitorId,
    flow: FlowId,
    method: PaymentMethod,
    translator: Translator,
) -> Result<(), DeskError> {
    let offered: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.label()).collect();
    println!("  Payment options: {}", offered.join(", "));
    let view = desk.apply(visitor, flow, FlowEvent::SelectPayment { method })?;
    if let Some(fee) = view.fee {
        println!("  Paying {} with {}", fee.display(translator), method.label());
    }
    let view = desk.apply(visitor, flow, FlowEvent::ConfirmPayment)?;
    print_step("payment submitted", &view);
    finish(desk, visitor, flow).await
}

async fn finish(desk: &Arc<FrontDesk>, visitor: VisitorId, flow: FlowId) -> Result<(), DeskError> {
    let view = wait_for(desk, visitor, flow, FlowStep::Confirmed).await?;
    print_step("confirmed", &view);
    if let Some(kind) = view.kind {
        println!("  {}", kind.follow_up());
    }
    let view = wait_for(desk, visitor, flow, FlowStep::Idle).await?;
    print_step("closed itself", &view);
    Ok(())
}

/// Poll a flow until its timers move it to `step`, giving up after a bounded wait.
async fn wait_for(
    desk: &Arc<FrontDesk>,
    visitor: VisitorId,
    flow: FlowId,
    step: FlowStep,
) -> Result<FlowView, DeskError> {
    let mut view = desk.flow_view(visitor, flow)?;
    for _ in 0..MAX_POLLS {
        if view.step == step {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
        view = desk.flow_view(visitor, flow)?;
    }
    Ok(view)
}

fn print_step(label: &str, view: &FlowView) {
    let title = view.title.unwrap_or(view.action_label);
    match view.message {
        Some(message) => println!("  [{}] {label}: {message}", view.step),
        None => println!("  [{}] {label}: {title}", view.step),
    }
}

fn schedule_form() -> ScheduleForm {
    let today = Utc::now().date_naive();
    ScheduleForm {
        date: today.checked_add_days(Days::new(3)).or(Some(today)),
        time: NaiveTime::from_hms_opt(10, 0, 0),
        name: "Awa Koné".to_string(),
        phone: "+225 07 00 00 00 00".to_string(),
        email: "awa@example.ci".to_string(),
        notes: "Disponible en matinée".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fast_walkthrough_records_every_outcome() {
        let desk = build_front_desk(&DelayConfig::instant()).expect("fixtures load");
        let args = DemoArgs {
            location: "Cocody".to_string(),
            lang: Language::Fr,
            fast: true,
        };

        walkthrough(&desk, &args).await.expect("walkthrough completes");

        let visitor = VisitorId(1);
        let view = desk.visitor_view(visitor).expect("visitor kept");
        assert!(view.user.is_none());
        assert_eq!(view.flows.len(), 3);
        for flow in view.flows {
            let flow = desk.flow_view(visitor, flow).expect("flow kept");
            assert_eq!(flow.step, FlowStep::Idle);
            assert_eq!(flow.outcomes.len(), 1);
        }
    }

    #[test]
    fn search_command_accepts_blank_input() {
        let args = SearchArgs {
            term: "   ".to_string(),
            sort: SortOrder::Newest,
            lang: Language::En,
        };
        assert!(print_search(args).is_ok());
    }
}
