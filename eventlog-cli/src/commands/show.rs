use anyhow::{Context, Result};
use eventlog_client::EventsBackend;
use eventlog_core::event::RecordId;

use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run<B: EventsBackend>(backend: &B, id: &str, json: bool) -> Result<()> {
    let id = RecordId::new(id);

    let spinner = create_spinner(format!("Loading event {id}..."));
    let detail = backend.fetch_event(&id).await;
    spinner.finish_and_clear();
    let detail = detail.with_context(|| format!("Could not load event {id}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        println!("{}", detail.render());
    }

    Ok(())
}
