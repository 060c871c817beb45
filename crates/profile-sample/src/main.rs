//! Demo host for the media relay profile.
//!
//! Walks one service instance through its whole life: activation, a start
//! signal, a bound client holding a stream, a stop signal that is refused
//! while the stream is live, the retried stop, and teardown.

use profile_framework::tracing::setup_tracing;
use profile_framework::{
    AdapterRegistry, AdapterState, AllowAll, Caller, CommandPayload, ProfileDirectory,
};
use profile_sample::media::{self, MediaConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    info!("Starting media profile demo");

    let directory = Arc::new(ProfileDirectory::new());
    let directory_dyn: Arc<dyn AdapterRegistry> = directory.clone();
    let registry: std::sync::Weak<dyn AdapterRegistry> = Arc::downgrade(&directory_dyn);
    let (service, client, mut host_rx) = media::new(
        MediaConfig { max_streams: 4 },
        registry,
        Arc::new(AllowAll),
    );
    let service_task = tokio::spawn(service.run());
    let caller = Caller::new("demo-host");

    client.activate().await?;
    client
        .command(
            Some(CommandPayload::state_changed(AdapterState::On)),
            caller.clone(),
        )
        .await?;
    info!(
        state = ?directory.profile_state("MediaStreamProfile"),
        "Profile reported state"
    );

    let handle = client
        .bind()
        .await?
        .ok_or("media profile is not bindable")?;
    handle.open_stream()?;
    info!(active = handle.active_streams(), "Stream opened");

    let mut dump = String::new();
    client.dump(&mut dump).await?;
    print!("{dump}");

    // Refused while the stream is live; the relay stays attached.
    client
        .command(
            Some(CommandPayload::state_changed(AdapterState::Off)),
            caller.clone(),
        )
        .await?;

    handle.close_stream();
    client
        .command(
            Some(CommandPayload::state_changed(AdapterState::Off)),
            caller,
        )
        .await?;

    if let Some(request) = host_rx.recv().await {
        info!(?request, "Host asked to stop the service");
    }

    client.teardown().await?;
    drop(client);
    service_task.await?;

    info!("Demo finished");
    Ok(())
}
