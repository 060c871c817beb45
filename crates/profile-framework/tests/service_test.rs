use async_trait::async_trait;
use profile_framework::mock::{MockRegistry, RegistryCall};
use profile_framework::{
    dump_line, AdapterRegistry, AdapterState, AllowAll, Caller, CommandPayload, HostRequest,
    Permission, PermissionGate, Profile, ProfileHandle, ProfileService, ServiceClient,
    ServiceError, StartMode,
};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

// --- Test Profile ---

#[derive(Clone, Debug)]
struct ProbeHandle {
    released: Arc<AtomicU32>,
}

impl ProfileHandle for ProbeHandle {
    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("probe failure")]
struct ProbeError;

/// Shared knobs and counters for observing hook calls from outside the
/// service loop.
#[derive(Clone)]
struct ProbeCounters {
    start_ok: Arc<AtomicBool>,
    stop_ok: Arc<AtomicBool>,
    creates: Arc<AtomicU32>,
    starts: Arc<AtomicU32>,
    stops: Arc<AtomicU32>,
    cleanups: Arc<AtomicU32>,
    releases: Arc<AtomicU32>,
}

impl ProbeCounters {
    fn new() -> Self {
        Self {
            start_ok: Arc::new(AtomicBool::new(true)),
            stop_ok: Arc::new(AtomicBool::new(true)),
            creates: Arc::new(AtomicU32::new(0)),
            starts: Arc::new(AtomicU32::new(0)),
            stops: Arc::new(AtomicU32::new(0)),
            cleanups: Arc::new(AtomicU32::new(0)),
            releases: Arc::new(AtomicU32::new(0)),
        }
    }

    fn set_start_ok(&self, ok: bool) {
        self.start_ok.store(ok, Ordering::SeqCst);
    }

    fn set_stop_ok(&self, ok: bool) {
        self.stop_ok.store(ok, Ordering::SeqCst);
    }

    fn creates(&self) -> u32 {
        self.creates.load(Ordering::SeqCst)
    }

    fn starts(&self) -> u32 {
        self.starts.load(Ordering::SeqCst)
    }

    fn stops(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }

    fn cleanups(&self) -> u32 {
        self.cleanups.load(Ordering::SeqCst)
    }

    fn releases(&self) -> u32 {
        self.releases.load(Ordering::SeqCst)
    }
}

struct ProbeProfile {
    bindable: bool,
    counters: ProbeCounters,
}

impl ProbeProfile {
    fn new(bindable: bool) -> (Self, ProbeCounters) {
        let counters = ProbeCounters::new();
        (
            Self {
                bindable,
                counters: counters.clone(),
            },
            counters,
        )
    }
}

#[async_trait]
impl Profile for ProbeProfile {
    type Handle = ProbeHandle;
    type Error = ProbeError;

    fn init_handle(&mut self) -> Option<ProbeHandle> {
        self.bindable.then(|| ProbeHandle {
            released: self.counters.releases.clone(),
        })
    }

    async fn on_create(&mut self) {
        self.counters.creates.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_start(&mut self) -> Result<(), ProbeError> {
        self.counters.starts.fetch_add(1, Ordering::SeqCst);
        if self.counters.start_ok.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProbeError)
        }
    }

    async fn on_stop(&mut self) -> Result<(), ProbeError> {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
        if self.counters.stop_ok.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProbeError)
        }
    }

    async fn on_cleanup(&mut self) {
        self.counters.cleanups.fetch_add(1, Ordering::SeqCst);
    }

    fn dump(&self, out: &mut String) {
        dump_line(out, &format!("starts: {}", self.counters.starts()));
    }
}

// --- Harness ---

struct Harness {
    client: ServiceClient<ProbeProfile>,
    host_rx: mpsc::UnboundedReceiver<HostRequest>,
    registry: Arc<MockRegistry>,
    counters: ProbeCounters,
}

fn spawn_probe_with_gate(bindable: bool, gate: Arc<dyn PermissionGate>) -> Harness {
    let registry = Arc::new(MockRegistry::new());
    let registry_ref: Weak<dyn AdapterRegistry> =
        Arc::downgrade(&(registry.clone() as Arc<dyn AdapterRegistry>));
    let (profile, counters) = ProbeProfile::new(bindable);
    let (service, client, host_rx) = ProfileService::new(profile, registry_ref, gate, 8);
    tokio::spawn(service.run());
    Harness {
        client,
        host_rx,
        registry,
        counters,
    }
}

fn spawn_probe(bindable: bool) -> Harness {
    spawn_probe_with_gate(bindable, Arc::new(AllowAll))
}

fn caller() -> Caller {
    Caller::new("test-host")
}

fn state_changed(state: AdapterState) -> Option<CommandPayload> {
    Some(CommandPayload::state_changed(state))
}

// --- Tests ---

#[tokio::test]
async fn activation_runs_create_and_start_reports_on() {
    let mut harness = spawn_probe(true);

    harness.client.activate().await.unwrap();
    assert_eq!(harness.counters.creates(), 1);

    let mode = harness
        .client
        .command(state_changed(AdapterState::On), caller())
        .await
        .unwrap();

    assert_eq!(mode, StartMode::NotSticky);
    assert_eq!(harness.counters.starts(), 1);
    assert_eq!(harness.registry.state_reports(), vec![AdapterState::On]);
    assert_eq!(
        harness.registry.registrations(),
        vec!["ProbeProfile".to_string()]
    );
    assert!(harness.client.is_available().await.unwrap());
    assert!(matches!(harness.host_rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn stop_reports_off_then_requests_host_stop() {
    let mut harness = spawn_probe(true);
    harness.client.activate().await.unwrap();

    harness
        .client
        .command(state_changed(AdapterState::On), caller())
        .await
        .unwrap();
    harness
        .client
        .command(state_changed(AdapterState::Off), caller())
        .await
        .unwrap();

    assert_eq!(
        harness.registry.state_reports(),
        vec![AdapterState::On, AdapterState::Off]
    );
    assert_eq!(harness.host_rx.try_recv(), Ok(HostRequest::StopService));
    assert_eq!(harness.counters.stops(), 1);

    // Unbind takes the default path and changes nothing.
    harness.client.unbind().await.unwrap();
    assert!(harness.client.is_available().await.unwrap());
}

#[tokio::test]
async fn start_stop_start_round_trip_reports_in_order() {
    let harness = spawn_probe(true);
    harness.client.activate().await.unwrap();

    for state in [AdapterState::On, AdapterState::Off, AdapterState::On] {
        harness
            .client
            .command(state_changed(state), caller())
            .await
            .unwrap();
    }

    assert_eq!(
        harness.registry.state_reports(),
        vec![AdapterState::On, AdapterState::Off, AdapterState::On]
    );
    assert!(harness.client.is_available().await.unwrap());
}

#[tokio::test]
async fn failed_start_is_terminal_for_the_instance() {
    let mut harness = spawn_probe(true);
    harness.counters.set_start_ok(false);
    harness.client.activate().await.unwrap();

    harness
        .client
        .command(state_changed(AdapterState::On), caller())
        .await
        .unwrap();

    assert_eq!(harness.counters.starts(), 1);
    assert!(harness.registry.state_reports().is_empty());
    assert!(!harness.client.is_available().await.unwrap());

    // Even with a now-working start hook, the latched error routes every
    // further command into the self-stop path.
    harness.counters.set_start_ok(true);
    harness
        .client
        .command(state_changed(AdapterState::On), caller())
        .await
        .unwrap();

    assert_eq!(harness.counters.starts(), 1);
    assert_eq!(harness.counters.stops(), 1);
    assert_eq!(harness.registry.state_reports(), vec![AdapterState::Off]);
    assert_eq!(harness.host_rx.try_recv(), Ok(HostRequest::StopService));
}

#[tokio::test]
async fn failed_stop_leaves_service_attached_until_retried() {
    let mut harness = spawn_probe(true);
    harness.counters.set_stop_ok(false);
    harness.client.activate().await.unwrap();

    harness
        .client
        .command(state_changed(AdapterState::On), caller())
        .await
        .unwrap();
    harness
        .client
        .command(state_changed(AdapterState::Off), caller())
        .await
        .unwrap();

    assert_eq!(harness.counters.stops(), 1);
    assert_eq!(harness.registry.state_reports(), vec![AdapterState::On]);
    assert!(matches!(harness.host_rx.try_recv(), Err(TryRecvError::Empty)));
    assert!(harness.client.is_available().await.unwrap());

    // A later signal retries the stop.
    harness.counters.set_stop_ok(true);
    harness
        .client
        .command(state_changed(AdapterState::Off), caller())
        .await
        .unwrap();

    assert_eq!(
        harness.registry.state_reports(),
        vec![AdapterState::On, AdapterState::Off]
    );
    assert_eq!(harness.host_rx.try_recv(), Ok(HostRequest::StopService));
}

#[tokio::test]
async fn teardown_twice_runs_cleanup_once() {
    let harness = spawn_probe(true);
    harness.client.activate().await.unwrap();

    harness.client.teardown().await.unwrap();
    harness.client.teardown().await.unwrap();

    assert_eq!(harness.counters.cleanups(), 1);
    assert_eq!(harness.counters.releases(), 1);

    // Both teardown events unregister; only the first runs the cleanup body.
    let unregisters = harness
        .registry
        .calls()
        .into_iter()
        .filter(|call| matches!(call, RegistryCall::Unregister(_)))
        .count();
    assert_eq!(unregisters, 2);
    assert!(!harness.client.is_available().await.unwrap());
}

#[tokio::test]
async fn bind_before_activation_returns_none() {
    let harness = spawn_probe(true);
    let handle = harness.client.bind().await.unwrap();
    assert!(handle.is_none());
}

#[tokio::test]
async fn bind_returns_the_same_handle_until_teardown() {
    let harness = spawn_probe(true);
    harness.client.activate().await.unwrap();

    let first = harness.client.bind().await.unwrap().unwrap();
    let second = harness.client.bind().await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&first.released, &second.released));

    harness.client.teardown().await.unwrap();
    assert!(harness.client.bind().await.unwrap().is_none());
    assert_eq!(harness.counters.releases(), 1);
}

#[tokio::test]
async fn bind_without_handle_is_a_contract_violation() {
    let harness = spawn_probe(false);
    harness.client.activate().await.unwrap();

    let result = harness.client.bind().await;
    match result {
        Err(ServiceError::NotBindable(name)) => assert_eq!(name, "ProbeProfile"),
        other => panic!("Expected NotBindable, got {other:?}"),
    }
}

#[tokio::test]
async fn permission_denied_drops_the_event() {
    let gate = Arc::new(|_: &Caller, _: Permission| false);
    let harness = spawn_probe_with_gate(true, gate);
    harness.client.activate().await.unwrap();

    let mode = harness
        .client
        .command(state_changed(AdapterState::On), caller())
        .await
        .unwrap();

    assert_eq!(mode, StartMode::NotSticky);
    assert_eq!(harness.counters.starts(), 0);
    assert!(harness.registry.state_reports().is_empty());
    // Registration is a side-effect of delivery and precedes the check.
    assert_eq!(
        harness.registry.registrations(),
        vec!["ProbeProfile".to_string()]
    );
    assert!(harness.client.is_available().await.unwrap());
}

#[tokio::test]
async fn command_without_payload_is_a_restart_notification() {
    let harness = spawn_probe(true);
    harness.client.activate().await.unwrap();

    let mode = harness.client.command(None, caller()).await.unwrap();

    assert_eq!(mode, StartMode::NotSticky);
    assert_eq!(harness.counters.starts(), 0);
    assert_eq!(harness.counters.stops(), 0);
}

#[tokio::test]
async fn transitional_states_and_foreign_actions_are_ignored() {
    let harness = spawn_probe(true);
    harness.client.activate().await.unwrap();

    for state in [AdapterState::TurningOn, AdapterState::TurningOff] {
        harness
            .client
            .command(state_changed(state), caller())
            .await
            .unwrap();
    }
    harness
        .client
        .command(
            Some(CommandPayload {
                action: Some("profile.action.UNRELATED".to_string()),
                state: Some(AdapterState::On),
            }),
            caller(),
        )
        .await
        .unwrap();

    assert_eq!(harness.counters.starts(), 0);
    assert_eq!(harness.counters.stops(), 0);
    assert!(harness.registry.state_reports().is_empty());
}

#[tokio::test]
async fn dead_registry_triggers_self_stop() {
    let registry = Arc::new(MockRegistry::new());
    let registry_ref: Weak<dyn AdapterRegistry> =
        Arc::downgrade(&(registry.clone() as Arc<dyn AdapterRegistry>));
    drop(registry);

    let (profile, counters) = ProbeProfile::new(true);
    let (service, client, mut host_rx) =
        ProfileService::new(profile, registry_ref, Arc::new(AllowAll), 8);
    tokio::spawn(service.run());

    client.activate().await.unwrap();
    let mode = client
        .command(state_changed(AdapterState::On), caller())
        .await
        .unwrap();

    // Registration is impossible and the adapter reference is dead, so the
    // service never starts and instead asks to be torn down.
    assert_eq!(mode, StartMode::NotSticky);
    assert_eq!(counters.starts(), 0);
    assert_eq!(counters.stops(), 1);
    assert_eq!(host_rx.try_recv(), Ok(HostRequest::StopService));
}

#[tokio::test]
async fn dump_appends_header_and_profile_lines() {
    let harness = spawn_probe(true);
    harness.client.activate().await.unwrap();
    harness
        .client
        .command(state_changed(AdapterState::On), caller())
        .await
        .unwrap();

    let mut out = String::from("HOST STATE\n");
    harness.client.dump(&mut out).await.unwrap();

    assert!(out.starts_with("HOST STATE\nProfile: ProbeProfile\n\n"));
    assert!(out.contains("  starts: 1\n"));
}
