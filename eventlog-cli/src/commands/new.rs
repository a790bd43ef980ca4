use anyhow::Result;
use clap::Args;
use dialoguer::Input;
use eventlog_client::controller::NewEventController;
use eventlog_client::{EventsBackend, Notifier};
use eventlog_core::event::parse_timestamp;
use eventlog_core::form::EventForm;

use crate::commands::{finish, prompt_optional, prompt_with_retry};
use crate::render::Render;
use crate::utils::tui::create_spinner;

#[derive(Args, Debug, Default)]
pub struct NewArgs {
    /// Event title (prompted for when missing)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Start, as RFC 3339 or YYYY-MM-DD (prompted for when missing)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End, as RFC 3339 or YYYY-MM-DD
    #[arg(short, long)]
    pub end: Option<String>,

    #[arg(long)]
    pub place: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    /// Who took part
    #[arg(long)]
    pub member: Option<String>,

    #[arg(long)]
    pub memo: Option<String>,
}

pub async fn run<B: EventsBackend, N: Notifier>(
    backend: B,
    notifier: N,
    mut args: NewArgs,
) -> Result<()> {
    let interactive = args.title.is_none() || args.start.is_none();

    let title = match args.title.take() {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let start = match args.start.as_deref() {
        Some(s) => parse_timestamp(s)?,
        None => prompt_with_retry("  When? (YYYY-MM-DD or RFC 3339)", parse_timestamp)?,
    };

    if interactive && args.place.is_none() {
        args.place = prompt_optional("  Where? (skip)")?;
    }

    let mut form = EventForm::new(start);
    form.title = title;
    fill_form(&mut form, &args)?;

    let controller = NewEventController::new(backend, notifier, || {});

    let spinner = create_spinner("Saving event...");
    let outcome = controller.submit(&form).await;
    spinner.finish_and_clear();

    let event = finish(outcome)?;
    println!("{}", event.render());

    Ok(())
}

/// Copy the optional flags onto a blank form.
fn fill_form(form: &mut EventForm, args: &NewArgs) -> Result<()> {
    if let Some(end) = args.end.as_deref() {
        form.end_date_time = Some(parse_timestamp(end)?);
    }

    let fields = [
        (&mut form.place, &args.place),
        (&mut form.url, &args.url),
        (&mut form.member, &args.member),
        (&mut form.memo, &args.memo),
    ];
    for (slot, value) in fields {
        if let Some(value) = value {
            *slot = Some(value.clone());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn blank() -> EventForm {
        let mut form = EventForm::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        form.title = "Trip".to_string();
        form
    }

    #[test]
    fn test_flags_fill_form() {
        let mut form = blank();
        let args = NewArgs {
            end: Some("2024-01-02".to_string()),
            place: Some("Kyoto".to_string()),
            memo: Some("bring tickets".to_string()),
            ..Default::default()
        };

        fill_form(&mut form, &args).unwrap();

        let values = form.validate().unwrap();
        assert_eq!(
            values.end_date_time,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(values.place.as_deref(), Some("Kyoto"));
        assert_eq!(values.memo.as_deref(), Some("bring tickets"));
        assert_eq!(values.url, None);
    }

    #[test]
    fn test_bad_end_is_an_error() {
        let mut form = blank();
        let args = NewArgs {
            end: Some("next tuesday".to_string()),
            ..Default::default()
        };
        assert!(fill_form(&mut form, &args).is_err());
    }
}
