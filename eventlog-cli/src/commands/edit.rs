use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use eventlog_client::controller::EditEventController;
use eventlog_client::{EventsBackend, Notifier};
use eventlog_core::event::{RecordId, parse_timestamp};
use eventlog_core::form::EditEventForm;
use eventlog_core::photo::{PhotoCandidate, PhotoRules};
use owo_colors::OwoColorize;

use crate::commands::finish;
use crate::utils::tui::create_spinner;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SuccessArg {
    True,
    False,
    /// Clear the recorded outcome
    Unset,
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Event ID
    pub id: String,

    #[arg(short, long)]
    pub title: Option<String>,

    /// Start, as RFC 3339 or YYYY-MM-DD
    #[arg(short, long)]
    pub start: Option<String>,

    /// End, as RFC 3339 or YYYY-MM-DD; an empty value clears it
    #[arg(short, long)]
    pub end: Option<String>,

    #[arg(long)]
    pub place: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub member: Option<String>,

    #[arg(long)]
    pub memo: Option<String>,

    #[arg(long)]
    pub diary: Option<String>,

    /// Outcome of the event
    #[arg(long, value_enum)]
    pub success: Option<SuccessArg>,

    /// Photo to attach
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

pub async fn run<B: EventsBackend, N: Notifier>(
    backend: B,
    notifier: N,
    rules: PhotoRules,
    args: EditArgs,
) -> Result<()> {
    let id = RecordId::new(args.id.clone());

    let spinner = create_spinner(format!("Loading event {id}..."));
    let detail = backend.fetch_event(&id).await;
    spinner.finish_and_clear();
    let detail = detail.with_context(|| format!("Could not load event {id}"))?;

    let mut form = EditEventForm::from_detail(&detail);
    apply_args(&mut form, &args, &rules)?;

    let controller =
        EditEventController::new(backend, notifier, id, || {}).with_photo_rules(rules);

    let message = if form.event_photos.iter().any(Option::is_some) {
        "Uploading photo and saving..."
    } else {
        "Saving..."
    };
    let spinner = create_spinner(message);
    let outcome = controller.submit(&form).await;
    spinner.finish_and_clear();

    finish(outcome)?;
    println!("  {}", format!("Updated: {}", form.event.title).dimmed());

    Ok(())
}

/// Overlay the given flags on the form's defaults.
fn apply_args(form: &mut EditEventForm, args: &EditArgs, rules: &PhotoRules) -> Result<()> {
    if let Some(title) = &args.title {
        form.event.title = title.clone();
    }
    if let Some(start) = args.start.as_deref() {
        form.event.start_date_time = parse_timestamp(start)?;
    }
    match args.end.as_deref() {
        Some("") => form.event.end_date_time = None,
        Some(end) => form.event.end_date_time = Some(parse_timestamp(end)?),
        None => {}
    }

    let fields = [
        (&mut form.event.place, &args.place),
        (&mut form.event.url, &args.url),
        (&mut form.event.member, &args.member),
        (&mut form.event.memo, &args.memo),
        (&mut form.diary, &args.diary),
    ];
    for (slot, value) in fields {
        if let Some(value) = value {
            *slot = Some(value.clone());
        }
    }

    if let Some(success) = args.success {
        form.success = match success {
            SuccessArg::True => Some("true".to_string()),
            SuccessArg::False => Some("false".to_string()),
            SuccessArg::Unset => None,
        };
    }

    if let Some(path) = &args.photo {
        let photo = PhotoCandidate::from_path(path, rules.max_upload_bytes)
            .with_context(|| format!("Could not read {}", path.display()))?;
        form.event_photos = vec![Some(photo)];
    }

    Ok(())
}
