//! Nailgun chunk framing.
//!
//! Every chunk is a 4-byte big-endian payload length, a 1-byte chunk type
//! and the payload itself. The client sends arguments, environment, the
//! working directory and finally the command; the server answers with
//! stdout/stderr chunks and closes with an exit chunk.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest payload accepted from the helper in a single chunk
pub const MAX_CHUNK_PAYLOAD: usize = 16 * 1024 * 1024;

const HEADER_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    Argument,
    Environment,
    WorkingDirectory,
    Command,
    Heartbeat,
    Stdin,
    StdinEof,
    StartReadingInput,
    Stdout,
    Stderr,
    Exit,
}

impl ChunkType {
    pub fn as_byte(self) -> u8 {
        match self {
            ChunkType::Argument => b'A',
            ChunkType::Environment => b'E',
            ChunkType::WorkingDirectory => b'D',
            ChunkType::Command => b'C',
            ChunkType::Heartbeat => b'H',
            ChunkType::Stdin => b'0',
            ChunkType::StdinEof => b'.',
            ChunkType::StartReadingInput => b'S',
            ChunkType::Stdout => b'1',
            ChunkType::Stderr => b'2',
            ChunkType::Exit => b'X',
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'A' => ChunkType::Argument,
            b'E' => ChunkType::Environment,
            b'D' => ChunkType::WorkingDirectory,
            b'C' => ChunkType::Command,
            b'H' => ChunkType::Heartbeat,
            b'0' => ChunkType::Stdin,
            b'.' => ChunkType::StdinEof,
            b'S' => ChunkType::StartReadingInput,
            b'1' => ChunkType::Stdout,
            b'2' => ChunkType::Stderr,
            b'X' => ChunkType::Exit,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: ChunkType,
    pub payload: Vec<u8>,
}

impl Chunk {
    pub fn new(kind: ChunkType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(HEADER_LEN + self.payload.len());
        frame.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        frame.push(self.kind.as_byte());
        frame.extend_from_slice(&self.payload);
        frame
    }
}

/// The outcome of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NailgunReply {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Raw output gathered across chunks. The helper splits output by byte
/// count, so a character may straddle two chunks; text is decoded only
/// once the exit chunk arrives.
#[derive(Debug, Default)]
pub struct ReplyBuffer {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl ReplyBuffer {
    pub fn push_stdout(&mut self, payload: &[u8]) {
        self.stdout.extend_from_slice(payload);
    }

    pub fn push_stderr(&mut self, payload: &[u8]) {
        self.stderr.extend_from_slice(payload);
    }

    pub fn finish(self, exit_code: i32) -> NailgunReply {
        NailgunReply {
            exit_code,
            stdout: decode_output(self.stdout),
            stderr: decode_output(self.stderr),
        }
    }
}

fn decode_output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Chunks that introduce a command: arguments, working directory, command name.
pub fn command_chunks(command: &str, args: &[String], working_dir: Option<&str>) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = args
        .iter()
        .map(|arg| Chunk::new(ChunkType::Argument, arg.as_bytes()))
        .collect();
    if let Some(dir) = working_dir {
        chunks.push(Chunk::new(ChunkType::WorkingDirectory, dir.as_bytes()));
    }
    chunks.push(Chunk::new(ChunkType::Command, command.as_bytes()));
    chunks
}

pub async fn write_chunk<W>(writer: &mut W, chunk: &Chunk) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&chunk.encode()).await?;
    writer.flush().await
}

/// Reads one chunk. `Ok(None)` on a clean end of stream between chunks.
pub async fn read_chunk<R>(reader: &mut R) -> io::Result<Option<Chunk>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
    if len > MAX_CHUNK_PAYLOAD {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("chunk payload of {} bytes exceeds limit", len),
        ));
    }
    let kind = ChunkType::from_byte(header[4]).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unknown chunk type 0x{:02x}", header[4]),
        )
    })?;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(Chunk { kind, payload }))
}

/// The exit chunk carries the code as ASCII decimal.
pub fn parse_exit_code(payload: &[u8]) -> io::Result<i32> {
    String::from_utf8_lossy(payload)
        .trim()
        .parse::<i32>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("bad exit code: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame_layout() {
        let frame = Chunk::new(ChunkType::Argument, "-url").encode();
        assert_eq!(&frame[..4], &[0, 0, 0, 4]);
        assert_eq!(frame[4], b'A');
        assert_eq!(&frame[5..], b"-url");
    }

    #[test]
    fn test_command_chunks_order() {
        let args = vec!["-q".to_string(), "a:*/B".to_string()];
        let kinds: Vec<ChunkType> = command_chunks("ng-stats", &args, Some("/srv"))
            .iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ChunkType::Argument,
                ChunkType::Argument,
                ChunkType::WorkingDirectory,
                ChunkType::Command
            ]
        );
    }

    #[tokio::test]
    async fn test_read_chunks_from_stream() {
        let mut bytes = Chunk::new(ChunkType::Stdout, "hello").encode();
        bytes.extend(Chunk::new(ChunkType::Exit, "0").encode());
        let mut reader = bytes.as_slice();

        let first = read_chunk(&mut reader).await.unwrap().unwrap();
        assert_eq!(first.kind, ChunkType::Stdout);
        assert_eq!(first.payload, b"hello");

        let exit = read_chunk(&mut reader).await.unwrap().unwrap();
        assert_eq!(parse_exit_code(&exit.payload).unwrap(), 0);

        assert!(read_chunk(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_chunk_type_is_rejected() {
        let bytes = [0u8, 0, 0, 0, b'Z'];
        let err = read_chunk(&mut &bytes[..]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_truncated_payload_is_an_error() {
        let bytes = [0u8, 0, 0, 9, b'1', b'a'];
        assert!(read_chunk(&mut &bytes[..]).await.is_err());
    }

    #[test]
    fn test_reply_buffer_joins_character_split_across_chunks() {
        let text = "value: Müller".as_bytes();
        // 'ü' is two bytes; cut between them
        let cut = text.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut buffer = ReplyBuffer::default();
        buffer.push_stdout(&text[..cut]);
        buffer.push_stdout(&text[cut..]);
        buffer.push_stderr(b"warn");
        let reply = buffer.finish(0);

        assert_eq!(reply.stdout, "value: Müller");
        assert_eq!(reply.stderr, "warn");
        assert_eq!(reply.exit_code, 0);
    }

    #[test]
    fn test_reply_buffer_replaces_invalid_bytes() {
        let mut buffer = ReplyBuffer::default();
        buffer.push_stdout(&[b'a', 0xFF, b'b']);
        assert_eq!(buffer.finish(1).stdout, "a\u{FFFD}b");
    }

    #[test]
    fn test_parse_exit_code() {
        assert_eq!(parse_exit_code(b"899").unwrap(), 899);
        assert_eq!(parse_exit_code(b" 0\n").unwrap(), 0);
        assert!(parse_exit_code(b"boom").is_err());
    }
}
