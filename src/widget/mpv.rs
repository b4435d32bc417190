//! mpv playback widget
//!
//! Spawns mpv with a JSON IPC socket and drives it from a single session
//! task. The overlay sees a synchronous handle: commands go out over an
//! unbounded channel, status polls come back over another one and update
//! the cached position, duration and fullscreen flag.

use std::collections::VecDeque;
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ipc::IpcClient;
use super::{FullscreenApi, MediaWidget, WidgetError, WidgetEvent};
use crate::config::PlayerConfig;
use crate::models::{PlaybackProps, Progress, SeekTo};

/// Delay between IPC connection attempts while mpv starts up
const CONNECT_RETRY: Duration = Duration::from_millis(100);

#[cfg(unix)]
type IpcStream = tokio::net::UnixStream;
#[cfg(windows)]
type IpcStream = tokio::net::windows::named_pipe::NamedPipeClient;

#[cfg(unix)]
async fn connect(path: &str) -> std::io::Result<IpcStream> {
    tokio::net::UnixStream::connect(path).await
}

#[cfg(windows)]
async fn connect(path: &str) -> std::io::Result<IpcStream> {
    tokio::net::windows::named_pipe::ClientOptions::new().open(path)
}

/// Unique IPC endpoint for one mpv instance
fn socket_path() -> String {
    let id = Uuid::new_v4();
    #[cfg(windows)]
    {
        format!(r"\\.\pipe\cinedeck-{}", id)
    }
    #[cfg(not(windows))]
    {
        std::env::temp_dir()
            .join(format!("cinedeck-{}.sock", id))
            .display()
            .to_string()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Commands sent to the session task
#[derive(Debug, Clone, PartialEq)]
enum MpvCommand {
    Set(&'static str, Value),
    Seek(SeekTo),
    Cycle(&'static str),
    PlaylistNext,
    Quit,
}

/// One status poll
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Status {
    /// Commands the session had applied when this poll ran
    seq: u64,
    time_pos: Option<f64>,
    duration: Option<f64>,
    cache_time: Option<f64>,
    fullscreen: Option<bool>,
}

#[derive(Debug)]
enum SessionEvent {
    Status(Status),
    Closed(Option<String>),
}

/// mpv driven over JSON IPC
pub struct MpvWidget {
    commands: UnboundedSender<MpvCommand>,
    events: UnboundedReceiver<SessionEvent>,
    applied: Option<PlaybackProps>,
    current_time: Option<f64>,
    duration: Option<f64>,
    fullscreen: bool,
    pending: VecDeque<WidgetEvent>,
    closed: bool,
    /// Commands handed to the session task so far
    sent: u64,
}

impl MpvWidget {
    /// Spawn mpv for `urls` and connect to its IPC socket
    pub async fn launch(
        config: &PlayerConfig,
        urls: &[String],
        props: &PlaybackProps,
        progress_interval: Duration,
    ) -> Result<Self, WidgetError> {
        let socket = socket_path();

        let mut cmd = Command::new(&config.mpv_path);
        cmd.arg(format!("--input-ipc-server={}", socket))
            .arg("--force-window=immediate")
            .arg(format!("--pause={}", yes_no(!props.playing)))
            .arg(format!("--mute={}", yes_no(props.muted)))
            .arg(format!("--volume={}", (props.volume * 100.0).round()))
            .arg(format!("--speed={}", props.playback_rate))
            .args(&config.extra_args)
            .arg("--")
            .args(urls)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WidgetError::NotFound(config.mpv_path.clone())
            } else {
                WidgetError::StartFailed(e)
            }
        })?;
        info!(pid = ?child.id(), %socket, "spawned mpv");

        let deadline = Instant::now() + Duration::from_millis(config.ipc_timeout_ms);
        let stream = loop {
            match connect(&socket).await {
                Ok(stream) => break stream,
                Err(e) if Instant::now() < deadline => {
                    if let Some(status) = child.try_wait()? {
                        return Err(WidgetError::ExitedEarly(status.to_string()));
                    }
                    debug!(error = %e, "mpv IPC not ready");
                    tokio::time::sleep(CONNECT_RETRY).await;
                }
                Err(_) => {
                    let _ = child.start_kill();
                    return Err(WidgetError::IpcTimeout(socket));
                }
            }
        };
        info!("mpv IPC connected");

        let mut widget = Self::spawn_session(stream, Some(child), progress_interval);
        widget.applied = Some(*props);
        Ok(widget)
    }

    /// Drive an already connected IPC stream
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach<S>(stream: S, progress_interval: Duration) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        Self::spawn_session(stream, None, progress_interval)
    }

    fn spawn_session<S>(stream: S, child: Option<Child>, progress_interval: Duration) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (evt_tx, evt_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_session(
            IpcClient::new(stream),
            child,
            cmd_rx,
            evt_tx,
            progress_interval,
        ));

        Self {
            commands: cmd_tx,
            events: evt_rx,
            applied: None,
            current_time: None,
            duration: None,
            fullscreen: false,
            pending: VecDeque::new(),
            closed: false,
            sent: 0,
        }
    }

    fn send(&mut self, cmd: MpvCommand) -> Result<(), WidgetError> {
        self.commands.send(cmd).map_err(|_| WidgetError::Closed)?;
        self.sent += 1;
        Ok(())
    }

    fn observe(&mut self, status: Status) -> Option<WidgetEvent> {
        // Polled before our latest seek or fullscreen change reached mpv
        if status.seq < self.sent {
            debug!(seq = status.seq, sent = self.sent, "dropping stale mpv status");
            return None;
        }

        self.current_time = status.time_pos;
        self.duration = status.duration;

        if let Some(fullscreen) = status.fullscreen {
            if fullscreen != self.fullscreen {
                self.fullscreen = fullscreen;
                self.pending
                    .push_back(WidgetEvent::FullscreenChanged(fullscreen));
            }
        }

        let played = status.time_pos?;
        let loaded = status.cache_time.unwrap_or(played);
        Some(WidgetEvent::Progress(Progress::from_seconds(
            played,
            loaded,
            status.duration,
        )))
    }
}

impl MediaWidget for MpvWidget {
    fn sync(&mut self, props: &PlaybackProps) -> Result<(), WidgetError> {
        let prev = self.applied;

        if prev.map_or(true, |p| p.playing != props.playing) {
            self.send(MpvCommand::Set("pause", json!(!props.playing)))?;
        }
        if prev.map_or(true, |p| p.muted != props.muted) {
            self.send(MpvCommand::Set("mute", json!(props.muted)))?;
        }
        if prev.map_or(true, |p| p.volume != props.volume) {
            self.send(MpvCommand::Set("volume", json!(props.volume * 100.0)))?;
        }
        if prev.map_or(true, |p| p.playback_rate != props.playback_rate) {
            self.send(MpvCommand::Set("speed", json!(props.playback_rate)))?;
        }

        self.applied = Some(*props);
        Ok(())
    }

    fn seek_to(&mut self, target: SeekTo) -> Result<(), WidgetError> {
        self.send(MpvCommand::Seek(target))?;

        // Keep relative seeks issued between polls cumulative
        self.current_time = match target {
            SeekTo::Seconds(secs) => {
                let upper = self.duration.unwrap_or(f64::INFINITY);
                Some(secs.clamp(0.0, upper))
            }
            SeekTo::Fraction(frac) => self.duration.map(|d| frac.clamp(0.0, 1.0) * d),
        };
        Ok(())
    }

    fn current_time(&self) -> Option<f64> {
        self.current_time
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn play_next(&mut self) -> Result<(), WidgetError> {
        self.send(MpvCommand::PlaylistNext)
    }

    fn toggle_subtitles(&mut self) -> Result<(), WidgetError> {
        self.send(MpvCommand::Cycle("sub-visibility"))
    }

    fn poll_event(&mut self) -> Option<WidgetEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        loop {
            match self.events.try_recv() {
                Ok(SessionEvent::Status(status)) => {
                    if let Some(event) = self.observe(status) {
                        return Some(event);
                    }
                    if let Some(event) = self.pending.pop_front() {
                        return Some(event);
                    }
                }
                Ok(SessionEvent::Closed(reason)) => {
                    self.closed = true;
                    return Some(WidgetEvent::Closed(reason));
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    if self.closed {
                        return None;
                    }
                    self.closed = true;
                    return Some(WidgetEvent::Closed(None));
                }
            }
        }
    }
}

impl FullscreenApi for MpvWidget {
    fn toggle_fullscreen(&mut self) -> Result<(), WidgetError> {
        let next = !self.fullscreen;
        self.send(MpvCommand::Set("fullscreen", json!(next)))?;
        self.fullscreen = next;
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

impl Drop for MpvWidget {
    fn drop(&mut self) {
        let _ = self.commands.send(MpvCommand::Quit);
    }
}

// =============================================================================
// Session Task
// =============================================================================

async fn run_session<S>(
    mut client: IpcClient<S>,
    mut child: Option<Child>,
    mut commands: UnboundedReceiver<MpvCommand>,
    events: UnboundedSender<SessionEvent>,
    progress_interval: Duration,
) where
    S: AsyncRead + AsyncWrite,
{
    let mut ticker = tokio::time::interval(progress_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut applied: u64 = 0;

    let reason = loop {
        tokio::select! {
            cmd = commands.recv() => {
                let cmd = cmd.unwrap_or(MpvCommand::Quit);
                if cmd == MpvCommand::Quit {
                    let _ = client.command(&[json!("quit")]).await;
                    break None;
                }
                let result = apply(&mut client, cmd).await;
                applied += 1;
                match result {
                    Ok(()) => {}
                    Err(WidgetError::Command(msg)) => warn!(error = %msg, "mpv rejected command"),
                    Err(e) => break Some(e.to_string()),
                }
            }
            _ = ticker.tick() => {
                match poll_status(&mut client, applied).await {
                    Ok(status) => {
                        if events.send(SessionEvent::Status(status)).is_err() {
                            // Handle dropped
                            let _ = client.command(&[json!("quit")]).await;
                            break None;
                        }
                    }
                    Err(e) => break Some(e.to_string()),
                }
            }
            exit = wait_child(&mut child) => break Some(exit),
        }
    };

    info!(reason = ?reason, "mpv session ended");
    if let Some(child) = child.as_mut() {
        let _ = child.start_kill();
    }
    let _ = events.send(SessionEvent::Closed(reason));
}

async fn wait_child(child: &mut Option<Child>) -> String {
    match child {
        Some(child) => match child.wait().await {
            Ok(status) => format!("mpv exited ({})", status),
            Err(e) => format!("mpv wait failed: {}", e),
        },
        None => std::future::pending().await,
    }
}

async fn apply<S>(client: &mut IpcClient<S>, cmd: MpvCommand) -> Result<(), WidgetError>
where
    S: AsyncRead + AsyncWrite,
{
    debug!(?cmd, "mpv command");
    match cmd {
        MpvCommand::Set(name, value) => client.set_property(name, value).await,
        MpvCommand::Seek(SeekTo::Seconds(secs)) => client
            .command(&[json!("seek"), json!(secs), json!("absolute")])
            .await
            .map(|_| ()),
        MpvCommand::Seek(SeekTo::Fraction(frac)) => client
            .command(&[json!("seek"), json!(frac * 100.0), json!("absolute-percent")])
            .await
            .map(|_| ()),
        MpvCommand::Cycle(name) => client
            .command(&[json!("cycle"), json!(name)])
            .await
            .map(|_| ()),
        MpvCommand::PlaylistNext => client
            .command(&[json!("playlist-next")])
            .await
            .map(|_| ()),
        MpvCommand::Quit => Ok(()),
    }
}

/// Command errors on a poll mean the property has no value right now
fn soft<T>(result: Result<Option<T>, WidgetError>) -> Result<Option<T>, WidgetError> {
    match result {
        Err(WidgetError::Command(_)) => Ok(None),
        other => other,
    }
}

async fn poll_status<S>(client: &mut IpcClient<S>, seq: u64) -> Result<Status, WidgetError>
where
    S: AsyncRead + AsyncWrite,
{
    Ok(Status {
        seq,
        time_pos: soft(client.get_f64("time-pos").await)?,
        duration: soft(client.get_f64("duration").await)?,
        cache_time: soft(client.get_f64("demuxer-cache-time").await)?,
        fullscreen: soft(client.get_bool("fullscreen").await)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_paths_are_unique() {
        assert_ne!(socket_path(), socket_path());
        assert!(socket_path().contains("cinedeck-"));
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "yes");
        assert_eq!(yes_no(false), "no");
    }

    fn status(seq: u64, time_pos: f64, fullscreen: bool) -> Status {
        Status {
            seq,
            time_pos: Some(time_pos),
            duration: Some(100.0),
            cache_time: None,
            fullscreen: Some(fullscreen),
        }
    }

    #[tokio::test]
    async fn test_status_polled_before_seek_is_ignored() {
        // Server half stays open and never answers
        let (client, _server) = tokio::io::duplex(1024);
        let mut widget = MpvWidget::attach(client, Duration::from_secs(3600));

        assert!(widget.observe(status(0, 10.0, false)).is_some());
        widget.seek_to(SeekTo::Seconds(60.0)).unwrap();
        assert_eq!(widget.current_time(), Some(60.0));

        assert_eq!(widget.observe(status(0, 10.5, false)), None);
        assert_eq!(widget.current_time(), Some(60.0));

        assert!(widget.observe(status(1, 60.2, false)).is_some());
        assert_eq!(widget.current_time(), Some(60.2));
    }

    #[tokio::test]
    async fn test_status_polled_before_fullscreen_set_is_ignored() {
        let (client, _server) = tokio::io::duplex(1024);
        let mut widget = MpvWidget::attach(client, Duration::from_secs(3600));

        widget.toggle_fullscreen().unwrap();
        assert!(widget.is_fullscreen());

        assert_eq!(widget.observe(status(0, 5.0, false)), None);
        assert!(widget.is_fullscreen());
        assert!(widget.pending.is_empty());

        // mpv confirms the change, so nothing is reported
        widget.observe(status(1, 5.0, true));
        assert!(widget.is_fullscreen());
        assert!(widget.pending.is_empty());

        // A later change made in the mpv window still comes through
        widget.observe(status(1, 6.0, false));
        assert!(!widget.is_fullscreen());
        assert_eq!(
            widget.pending.pop_front(),
            Some(WidgetEvent::FullscreenChanged(false))
        );
    }
}
