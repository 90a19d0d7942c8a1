//! Interactive session and one-shot commands.
//!
//! Everything here runs on the foreground `LocalSet`. Only the background
//! worker and notification auto-close timers are spawned onto the runtime
//! proper.

use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::desktop::{DesktopNotifier, TerminalPermissionPrompt};
use crate::notification::{
    BackgroundChannelRegistrar, DispatcherConfig, NotificationDispatcher, PermissionBroker,
    PermissionPrompt, WorkerHost,
};
use crate::sound::try_create_player;
use crate::timer::{Intent, TimerSession};
use crate::types::{Mode, PermissionState};
use crate::worker::{LocalWorkerHost, SessionClients, CACHE_NAME, WORKER_SCRIPT};

use super::commands::{DeploymentArgs, RunArgs};
use super::display::Display;

// ============================================================================
// Line commands
// ============================================================================

/// A line typed into the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCommand {
    Intent(Intent),
    /// Answer to the permission prompt
    Answer(bool),
    Help,
    Quit,
}

impl FromStr for LineCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let word = line.trim().to_ascii_lowercase();
        match word.as_str() {
            "" | "s" | "p" | "start" | "pause" | "toggle" => Ok(Self::Intent(Intent::Toggle)),
            "r" | "reset" => Ok(Self::Intent(Intent::Reset)),
            "y" | "yes" => Ok(Self::Answer(true)),
            "n" | "no" => Ok(Self::Answer(false)),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Mode::from_str(other)
                .map(|mode| Self::Intent(Intent::SetMode(mode)))
                .map_err(|_| format!("unknown command '{other}' (type 'help')")),
        }
    }
}

// ============================================================================
// run
// ============================================================================

/// Asks for notification permission as soon as the session starts, so the
/// first alert does not wait on the answer.
fn spawn_startup_request<P>(broker: &Rc<PermissionBroker<P>>) -> JoinHandle<PermissionState>
where
    P: PermissionPrompt + 'static,
{
    let broker = Rc::clone(broker);
    tokio::task::spawn_local(async move { broker.request_on_mount().await })
}

/// Runs the interactive timer until `quit` or end of input.
pub async fn run_interactive(args: RunArgs) -> Result<()> {
    let config = args.config()?;
    let deployment = &args.deployment;
    let root = deployment.root();
    let assets = deployment.asset_directory();
    let detected = !args.no_notifications && DesktopNotifier::detect();
    let capabilities = args.capabilities(detected);
    info!(
        root = %root,
        notifications = capabilities.notifications,
        workers = capabilities.background_workers,
        "starting session"
    );

    let surface = Arc::new(DesktopNotifier::new(root.clone(), Some(assets.clone())));
    let (client_tx, mut client_rx) = mpsc::unbounded_channel();
    let clients = Arc::new(SessionClients::new(client_tx));
    let client_id = clients.attach(deployment.location.clone());

    let prompt = Rc::new(TerminalPermissionPrompt::new(args.allow_notifications));
    let broker = Rc::new(PermissionBroker::new(Rc::clone(&prompt), capabilities));
    broker.mount();
    spawn_startup_request(&broker);

    let host = LocalWorkerHost::new(
        assets.clone(),
        deployment.cache_storage()?,
        Arc::clone(&surface),
        Arc::clone(&clients),
    );
    let registrar = Rc::new(BackgroundChannelRegistrar::new(
        host,
        capabilities,
        deployment.location.clone(),
    ));
    {
        let registrar = Rc::clone(&registrar);
        tokio::task::spawn_local(async move {
            registrar.register(WORKER_SCRIPT).await;
        });
    }

    let sound = if args.no_sound {
        None
    } else {
        try_create_player(false)
    };
    let dispatcher = Rc::new(NotificationDispatcher::new(
        broker,
        registrar,
        surface,
        sound,
        DispatcherConfig {
            capabilities,
            assets: Some(assets),
        },
    ));

    let mut session = TimerSession::mount(config, dispatcher);
    let mut snapshots = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    Display::show_help();
    Display::show_state(&session.snapshot());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                match line.parse::<LineCommand>() {
                    Ok(LineCommand::Intent(intent)) => {
                        debug!(?intent, "intent");
                        session.apply(intent);
                    }
                    Ok(LineCommand::Answer(allow)) => {
                        if !prompt.answer(allow) {
                            Display::show_notice("no permission request is pending");
                        }
                    }
                    Ok(LineCommand::Help) => Display::show_help(),
                    Ok(LineCommand::Quit) => break,
                    Err(e) => Display::show_notice(&e),
                }
                Display::show_state(&session.snapshot());
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = snapshots.borrow_and_update().clone();
                Display::show_state(&state);
            }
            Some(event) = client_rx.recv() => {
                Display::show_client_event(&event);
            }
            () = prompt.asked() => {
                Display::show_permission_prompt();
            }
        }
    }

    clients.detach(client_id);
    println!();
    Ok(())
}

// ============================================================================
// precache
// ============================================================================

/// Installs and activates the worker once, then lists the caches.
pub async fn run_precache(args: DeploymentArgs) -> Result<()> {
    let root = args.root();
    let storage = args.cache_storage()?;
    let surface = Arc::new(DesktopNotifier::new(root.clone(), Some(args.asset_directory())));
    let (client_tx, _client_rx) = mpsc::unbounded_channel();
    let host = LocalWorkerHost::new(
        args.asset_directory(),
        storage.clone(),
        surface,
        Arc::new(SessionClients::new(client_tx)),
    );

    let script = root.asset_url(WORKER_SCRIPT);
    host.register(&script, root.as_url())
        .await
        .with_context(|| format!("could not install from {}", args.assets.display()))?;

    let caches = storage.keys().await?;
    let entries = storage.open(CACHE_NAME).await?.keys().await?;
    Display::show_cache_report(root.as_url().as_str(), &caches, &entries);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{MockPermissionPrompt, PlatformCapabilities};
    use tokio::task::LocalSet;

    mod startup_request_tests {
        use super::*;

        fn broker(
            prompt: &Rc<MockPermissionPrompt>,
            capabilities: PlatformCapabilities,
        ) -> Rc<PermissionBroker<Rc<MockPermissionPrompt>>> {
            let broker = Rc::new(PermissionBroker::new(Rc::clone(prompt), capabilities));
            broker.mount();
            broker
        }

        #[tokio::test]
        async fn test_prompts_at_startup() {
            LocalSet::new()
                .run_until(async {
                    let prompt = Rc::new(MockPermissionPrompt::new(PermissionState::Default));
                    prompt.push_answer(PermissionState::Granted);
                    let broker = broker(&prompt, PlatformCapabilities::all());

                    let state = spawn_startup_request(&broker).await.unwrap();

                    assert_eq!(state, PermissionState::Granted);
                    assert_eq!(prompt.prompt_count(), 1);
                    assert_eq!(broker.current_state(), PermissionState::Granted);
                })
                .await;
        }

        #[tokio::test]
        async fn test_pre_granted_does_not_prompt() {
            LocalSet::new()
                .run_until(async {
                    let prompt = Rc::new(MockPermissionPrompt::new(PermissionState::Granted));
                    let broker = broker(&prompt, PlatformCapabilities::all());

                    spawn_startup_request(&broker).await.unwrap();

                    assert_eq!(prompt.prompt_count(), 0);
                })
                .await;
        }

        #[tokio::test]
        async fn test_no_notifications_does_not_prompt() {
            LocalSet::new()
                .run_until(async {
                    let prompt = Rc::new(MockPermissionPrompt::new(PermissionState::Default));
                    let broker = broker(&prompt, PlatformCapabilities::none());

                    spawn_startup_request(&broker).await.unwrap();

                    assert_eq!(prompt.prompt_count(), 0);
                })
                .await;
        }
    }

    #[test]
    fn test_toggle_aliases() {
        for line in ["", "  ", "s", "p", "start", "pause", "START\n"] {
            assert_eq!(
                line.parse::<LineCommand>().unwrap(),
                LineCommand::Intent(Intent::Toggle),
                "line {line:?}"
            );
        }
    }

    #[test]
    fn test_mode_commands() {
        assert_eq!(
            "focus".parse::<LineCommand>().unwrap(),
            LineCommand::Intent(Intent::SetMode(Mode::Focus))
        );
        assert_eq!(
            "short".parse::<LineCommand>().unwrap(),
            LineCommand::Intent(Intent::SetMode(Mode::ShortBreak))
        );
        assert_eq!(
            "long".parse::<LineCommand>().unwrap(),
            LineCommand::Intent(Intent::SetMode(Mode::LongBreak))
        );
    }

    #[test]
    fn test_other_commands() {
        assert_eq!("r".parse::<LineCommand>().unwrap(), LineCommand::Intent(Intent::Reset));
        assert_eq!("y".parse::<LineCommand>().unwrap(), LineCommand::Answer(true));
        assert_eq!("n".parse::<LineCommand>().unwrap(), LineCommand::Answer(false));
        assert_eq!("q".parse::<LineCommand>().unwrap(), LineCommand::Quit);
        assert_eq!("help".parse::<LineCommand>().unwrap(), LineCommand::Help);
    }

    #[test]
    fn test_unknown_command() {
        let err = "dance".parse::<LineCommand>().unwrap_err();
        assert!(err.contains("dance"));
    }
}
