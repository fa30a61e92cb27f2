//! Peer channel management.
//!
//! Every player owns one duplex channel. For launched players this is a Unix
//! socket pair whose far end becomes the child's stdin and stdout; tests and
//! the simulator attach any in-process `AsyncRead + AsyncWrite` stream
//! instead.
//!
//! A reader task per peer decodes frames into that peer's bounded inbox and
//! pokes the shared [`Notify`]. The game loop is the only writer.

use std::future::Future;
use std::os::fd::OwnedFd;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::{PlayerSpec, INBOX_CAPACITY, WRITE_TIMEOUT};
use crate::grid::Symbol;
use crate::protocol::{read_client_message, write_server_message, ClientMessage, ServerMessage};

type PeerWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// What a peer's reader task hands to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerEvent {
    Message(ClientMessage),
    /// The channel hit EOF or a read error. Nothing follows.
    Disconnected,
}

/// One connected player.
pub struct Peer {
    index: usize,
    symbol: Symbol,
    pid: Option<u32>,
    writer: Option<PeerWriter>,
    inbox: mpsc::Receiver<PeerEvent>,
    reader: Option<JoinHandle<()>>,
    child: Option<Child>,
    connected: bool,
}

impl Peer {
    /// Build a peer over an already-connected duplex stream.
    pub fn attach<S>(index: usize, symbol: Symbol, stream: S, notify: Arc<Notify>) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let (tx, inbox) = mpsc::channel(INBOX_CAPACITY);
        let reader = tokio::spawn(read_loop(index, read_half, tx, notify));
        Self {
            index,
            symbol,
            pid: None,
            writer: Some(Box::new(write_half)),
            inbox,
            reader: Some(reader),
            child: None,
            connected: true,
        }
    }

    /// Launch `spec`'s program with the far end of a fresh socket pair as its
    /// stdin and stdout.
    ///
    /// Failing to start the program only silences this player: the error is
    /// logged and the peer stays in the game without a process. A peer dropped
    /// without [`Peer::reap`] kills its process.
    pub fn spawn(index: usize, spec: &PlayerSpec, notify: Arc<Notify>) -> anyhow::Result<Self> {
        let (server_end, child_end) = std::os::unix::net::UnixStream::pair()?;
        let child_stdout = child_end.try_clone()?;

        let mut command = Command::new(spec.program());
        command
            .args(spec.args())
            .stdin(Stdio::from(OwnedFd::from(child_end)))
            .stdout(Stdio::from(OwnedFd::from(child_stdout)))
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        let child = match command.spawn() {
            Ok(child) => Some(child),
            Err(e) => {
                log::error!(
                    "player {} failed to launch {:?}: {}",
                    spec.symbol,
                    spec.program(),
                    e
                );
                None
            }
        };
        // Close our copies of the child's end so EOF reaches us when it exits.
        drop(command);

        server_end.set_nonblocking(true)?;
        let stream = tokio::net::UnixStream::from_std(server_end)?;
        let mut peer = Self::attach(index, spec.symbol, stream, notify);
        peer.pid = child.as_ref().and_then(Child::id);
        peer.child = child;
        if let Some(pid) = peer.pid {
            log::info!("player {} launched {:?} as pid {}", spec.symbol, spec.program(), pid);
        }
        Ok(peer)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Take the next decoded event without waiting.
    pub fn try_recv(&mut self) -> Option<PeerEvent> {
        let event = self.inbox.try_recv().ok()?;
        if event == PeerEvent::Disconnected {
            self.connected = false;
        }
        Some(event)
    }

    /// Deliver `msg`. A failed or stalled write closes the peer's write side
    /// and is otherwise ignored.
    pub async fn send(&mut self, msg: &ServerMessage) {
        let label = self.label();
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        log::info!("send {} {}", label, msg);
        let failure = match timeout(WRITE_TIMEOUT, write_server_message(writer, msg)).await {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("write timed out after {:?}", WRITE_TIMEOUT),
        };
        log::debug!("dropping writes to {}: {}", label, failure);
        self.writer = None;
    }

    /// Shut the channel down and wait for the process, if any, to exit.
    /// Safe to call more than once; the child is waited on only the first
    /// time.
    pub async fn reap(&mut self) -> Option<ExitStatus> {
        if let Some(mut writer) = self.writer.take() {
            let _ = timeout(WRITE_TIMEOUT, writer.shutdown()).await;
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        let mut child = self.child.take()?;
        match child.wait().await {
            Ok(status) => {
                log::debug!("{} exited with {}", self.label(), status);
                Some(status)
            }
            Err(e) => {
                log::warn!("failed to wait for {}: {}", self.label(), e);
                None
            }
        }
    }

    /// `pid=<pid> player=<symbol>`, used as the log prefix for this peer.
    pub fn label(&self) -> String {
        match self.pid {
            Some(pid) => format!("pid={} player={}", pid, self.symbol),
            None => format!("pid=- player={}", self.symbol),
        }
    }
}

async fn read_loop<R>(index: usize, mut reader: R, inbox: mpsc::Sender<PeerEvent>, notify: Arc<Notify>)
where
    R: AsyncRead + Unpin,
{
    loop {
        let event = match read_client_message(&mut reader).await {
            Ok(Some(msg)) => PeerEvent::Message(msg),
            Ok(None) => PeerEvent::Disconnected,
            Err(e) => {
                log::debug!("read from peer {} failed: {}", index, e);
                PeerEvent::Disconnected
            }
        };
        let last = event == PeerEvent::Disconnected;
        if inbox.send(event).await.is_err() {
            break;
        }
        notify.notify_one();
        if last {
            break;
        }
    }
}

/// All peers of one session, plus the readiness signal they share.
pub struct PeerSet {
    peers: Vec<Peer>,
    notify: Arc<Notify>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self {
            peers: Vec::new(),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Launch one peer per player, in order. If a later launch fails, the
    /// players already started are killed when the partial set is dropped.
    pub fn launch(specs: &[PlayerSpec]) -> anyhow::Result<Self> {
        let mut set = Self::new();
        for spec in specs {
            set.spawn(spec)?;
        }
        Ok(set)
    }

    /// Launch a process-backed peer and return its index.
    pub fn spawn(&mut self, spec: &PlayerSpec) -> anyhow::Result<usize> {
        let index = self.peers.len();
        let peer = Peer::spawn(index, spec, self.notify.clone())?;
        self.peers.push(peer);
        Ok(index)
    }

    /// Attach an in-process peer and return its index.
    pub fn attach<S>(&mut self, symbol: Symbol, stream: S) -> usize
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let index = self.peers.len();
        self.peers
            .push(Peer::attach(index, symbol, stream, self.notify.clone()));
        index
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Peer> {
        self.peers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Peer> {
        self.peers.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    /// Wait until some reader has delivered an event or `limit` elapses.
    /// The returned future does not borrow the set.
    pub fn wait_ready(&self, limit: Duration) -> impl Future<Output = ()> + Send + 'static {
        let notify = self.notify.clone();
        async move {
            let _ = timeout(limit, notify.notified()).await;
        }
    }

    /// Send `msg` to every peer, in index order.
    pub async fn broadcast(&mut self, msg: &ServerMessage) {
        for peer in &mut self.peers {
            peer.send(msg).await;
        }
    }

    /// Close every channel and reap every launched process.
    pub async fn teardown(&mut self) -> Vec<Option<ExitStatus>> {
        let mut statuses = Vec::with_capacity(self.peers.len());
        for peer in &mut self.peers {
            statuses.push(peer.reap().await);
        }
        statuses
    }
}

impl Default for PeerSet {
    fn default() -> Self {
        Self::new()
    }
}
