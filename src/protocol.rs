//! Wire protocol between the server and its peers.
//!
//! Every message is a fixed-size little-endian frame encoded with `bincode`'s
//! fixed-int layout, so a frame boundary is always known from its kind:
//!
//! | frame         | fields                               | bytes |
//! |---------------|--------------------------------------|-------|
//! | client frame  | `kind: u32, x: i32, y: i32`          | 12    |
//! | server header | `kind: u32, success: u32, filled: u32` | 12  |
//! | cell entry    | `x: i32, y: i32, symbol: u8, pad: [u8; 3]` | 12 |
//!
//! A `Result` is written as the header followed by exactly `filled` cell
//! entries; peers read the header first to learn how many entries follow.
//! Cell entries carry three trailing zero bytes so they line up with a C
//! `struct { int x, y; char symbol; }` on the peer side.

use core::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::MAX_GRID_SIZE;
use crate::grid::{Cell, Symbol};

pub const KIND_START: u32 = 0;
pub const KIND_MARK: u32 = 1;
pub const KIND_RESULT: u32 = 2;
pub const KIND_END: u32 = 3;

pub const CLIENT_FRAME_LEN: usize = 12;
pub const SERVER_HEADER_LEN: usize = 12;
pub const CELL_FRAME_LEN: usize = 12;

/// Raw peer → server frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFrame {
    pub kind: u32,
    pub x: i32,
    pub y: i32,
}

/// Raw server → peer header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerHeader {
    pub kind: u32,
    pub success: u32,
    pub filled: u32,
}

/// One occupied cell inside a `Result` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFrame {
    pub x: i32,
    pub y: i32,
    pub symbol: u8,
    /// Always written as zero, ignored on read.
    pub pad: [u8; 3],
}

impl From<Cell> for CellFrame {
    fn from(cell: Cell) -> Self {
        Self {
            x: cell.x,
            y: cell.y,
            symbol: cell.symbol.as_byte(),
            pad: [0; 3],
        }
    }
}

/// Messages sent by a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    /// The peer is ready and wants the current board.
    Start,
    /// Claim the cell at `(x, y)`.
    Mark { x: i32, y: i32 },
    /// A frame whose kind the server does not know. Ignored.
    Unknown { kind: u32 },
}

impl ClientMessage {
    pub fn to_frame(self) -> ClientFrame {
        match self {
            ClientMessage::Start => ClientFrame { kind: KIND_START, x: 0, y: 0 },
            ClientMessage::Mark { x, y } => ClientFrame { kind: KIND_MARK, x, y },
            ClientMessage::Unknown { kind } => ClientFrame { kind, x: 0, y: 0 },
        }
    }

    pub fn from_frame(frame: ClientFrame) -> Self {
        match frame.kind {
            KIND_START => ClientMessage::Start,
            KIND_MARK => ClientMessage::Mark { x: frame.x, y: frame.y },
            kind => ClientMessage::Unknown { kind },
        }
    }
}

/// Messages sent by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Reply to `Start` or `Mark`, with a full snapshot of occupied cells.
    Result { success: bool, cells: Vec<Cell> },
    /// The game is over.
    End,
}

impl ServerMessage {
    /// Filled-cell count carried in the header.
    pub fn filled(&self) -> usize {
        match self {
            ServerMessage::Result { cells, .. } => cells.len(),
            ServerMessage::End => 0,
        }
    }

    fn header(&self) -> ServerHeader {
        match self {
            ServerMessage::Result { success, cells } => ServerHeader {
                kind: KIND_RESULT,
                success: u32::from(*success),
                filled: cells.len() as u32,
            },
            ServerMessage::End => ServerHeader {
                kind: KIND_END,
                success: 0,
                filled: 0,
            },
        }
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientMessage::Start => write!(f, "START"),
            ClientMessage::Mark { x, y } => write!(f, "MARK ({}, {})", x, y),
            ClientMessage::Unknown { kind } => write!(f, "UNKNOWN kind={}", kind),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Result { success, cells } => {
                write!(f, "RESULT success={} filled={} [", u8::from(*success), cells.len())?;
                for (i, cell) in cells.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({},{})={}", cell.x, cell.y, cell.symbol)?;
                }
                write!(f, "]")
            }
            ServerMessage::End => write!(f, "END"),
        }
    }
}

/// Encode a peer message into its 12-byte frame.
pub fn encode_client(msg: ClientMessage) -> anyhow::Result<Vec<u8>> {
    bincode::serialize(&msg.to_frame())
        .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
}

/// Decode one 12-byte peer frame. Unknown kinds decode to
/// [`ClientMessage::Unknown`] rather than failing.
pub fn decode_client(bytes: &[u8]) -> anyhow::Result<ClientMessage> {
    let frame: ClientFrame = bincode::deserialize(bytes)
        .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))?;
    Ok(ClientMessage::from_frame(frame))
}

/// Encode a server message as the two writes that go on the wire: the
/// header and the (possibly empty) cell list.
pub fn encode_server(msg: &ServerMessage) -> anyhow::Result<(Vec<u8>, Vec<u8>)> {
    let header = bincode::serialize(&msg.header())
        .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
    let mut body = Vec::new();
    if let ServerMessage::Result { cells, .. } = msg {
        body.reserve(cells.len() * CELL_FRAME_LEN);
        for cell in cells {
            bincode::serialize_into(&mut body, &CellFrame::from(*cell))
                .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
        }
    }
    Ok((header, body))
}

/// Read one peer message. `Ok(None)` means the peer closed the channel,
/// either cleanly or partway through a frame.
pub async fn read_client_message<R>(reader: &mut R) -> anyhow::Result<Option<ClientMessage>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; CLIENT_FRAME_LEN];
    if !read_frame(reader, &mut buf).await? {
        return Ok(None);
    }
    decode_client(&buf).map(Some)
}

/// Write one peer message and flush it.
pub async fn write_client_message<W>(writer: &mut W, msg: ClientMessage) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let data = encode_client(msg)?;
    writer.write_all(&data).await?;
    writer.flush().await?;
    Ok(())
}

/// Write one server message: header first, then the cell list as a second
/// write, then flush.
pub async fn write_server_message<W>(writer: &mut W, msg: &ServerMessage) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let (header, body) = encode_server(msg)?;
    writer.write_all(&header).await?;
    if !body.is_empty() {
        writer.write_all(&body).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Read one server message. `Ok(None)` means the server closed the channel.
pub async fn read_server_message<R>(reader: &mut R) -> anyhow::Result<Option<ServerMessage>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; SERVER_HEADER_LEN];
    if !read_frame(reader, &mut buf).await? {
        return Ok(None);
    }
    let header: ServerHeader = bincode::deserialize(&buf)
        .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))?;
    match header.kind {
        KIND_END => Ok(Some(ServerMessage::End)),
        KIND_RESULT => {
            let filled = header.filled as usize;
            if filled > MAX_GRID_SIZE * MAX_GRID_SIZE {
                return Err(anyhow::anyhow!(
                    "Result carries {} cells (max: {})",
                    filled,
                    MAX_GRID_SIZE * MAX_GRID_SIZE
                ));
            }
            let mut body = vec![0u8; filled * CELL_FRAME_LEN];
            reader.read_exact(&mut body).await?;
            let cells = body
                .chunks_exact(CELL_FRAME_LEN)
                .map(decode_cell)
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(Some(ServerMessage::Result {
                success: header.success != 0,
                cells,
            }))
        }
        kind => Err(anyhow::anyhow!("Unknown server message kind {}", kind)),
    }
}

fn decode_cell(bytes: &[u8]) -> anyhow::Result<Cell> {
    let frame: CellFrame = bincode::deserialize(bytes)
        .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))?;
    let symbol = Symbol::new(frame.symbol)
        .ok_or_else(|| anyhow::anyhow!("Invalid cell symbol byte {:#04x}", frame.symbol))?;
    Ok(Cell {
        x: frame.x,
        y: frame.y,
        symbol,
    })
}

/// Fill `buf` completely. Returns `false` if the stream ended first.
async fn read_frame<R>(reader: &mut R, buf: &mut [u8]) -> anyhow::Result<bool>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}
