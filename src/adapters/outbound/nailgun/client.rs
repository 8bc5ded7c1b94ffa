use super::protocol::{
    command_chunks, parse_exit_code, read_chunk, write_chunk, Chunk, ChunkType, NailgunReply,
    ReplyBuffer,
};
use super::transport::HelperAddress;
use crate::ports::outbound::{BeanQuery, BeanQueryExecutor};
use crate::shared::error::{CollectorError, AUTH_FAILURE_EXIT_CODE};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{self, AsyncWrite};
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant};
use tokio_util::task::AbortOnDropHandle;

/// Query adapter class the helper runs for bean queries
pub const BEAN_QUERY_COMMAND: &str = "edu.umn.pssa.jmxquery.JMXQuery";
pub const STATS_COMMAND: &str = "ng-stats";
pub const STOP_COMMAND: &str = "ng-stop";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(45);
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// NailgunClient adapter issuing commands to the running helper
///
/// Every command opens its own connection, so one client is shared by all
/// workers of a cycle.
#[derive(Debug, Clone)]
pub struct NailgunClient {
    address: HelperAddress,
    request_timeout: Duration,
    heartbeat_interval: Duration,
    working_dir: Option<PathBuf>,
}

impl NailgunClient {
    pub fn new(address: HelperAddress) -> Self {
        Self {
            address,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            working_dir: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    pub fn address(&self) -> &HelperAddress {
        &self.address
    }

    /// Runs one command and collects its output, bounded by the request
    /// timeout.
    pub async fn send_command(
        &self,
        command: &str,
        args: &[String],
    ) -> Result<NailgunReply, CollectorError> {
        match tokio::time::timeout(self.request_timeout, self.exchange(command, args)).await {
            Ok(result) => result.map_err(|e| CollectorError::Transport {
                address: self.address.to_string(),
                details: e.to_string(),
            }),
            Err(_) => Err(CollectorError::Timeout {
                seconds: self.request_timeout.as_secs(),
            }),
        }
    }

    async fn exchange(&self, command: &str, args: &[String]) -> io::Result<NailgunReply> {
        let stream = self.address.connect().await?;
        let (mut reader, writer) = io::split(stream);
        let writer = Arc::new(Mutex::new(writer));

        let working_dir = self
            .working_dir
            .as_ref()
            .map(|dir| dir.display().to_string());
        {
            let mut writer = writer.lock().await;
            for chunk in command_chunks(command, args, working_dir.as_deref()) {
                write_chunk(&mut *writer, &chunk).await?;
            }
        }

        // keeps the helper's idle timeout from reaping long queries
        let _heartbeat = AbortOnDropHandle::new(tokio::spawn(send_heartbeats(
            Arc::clone(&writer),
            self.heartbeat_interval,
        )));

        let mut output = ReplyBuffer::default();
        loop {
            let chunk = read_chunk(&mut reader).await?.ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "helper closed the connection before sending an exit code",
                )
            })?;
            match chunk.kind {
                ChunkType::Stdout => output.push_stdout(&chunk.payload),
                ChunkType::Stderr => output.push_stderr(&chunk.payload),
                ChunkType::StartReadingInput => {
                    // no input is ever sent; close stdin right away
                    let mut writer = writer.lock().await;
                    write_chunk(&mut *writer, &Chunk::new(ChunkType::StdinEof, Vec::new())).await?;
                }
                ChunkType::Heartbeat => {}
                ChunkType::Exit => {
                    return Ok(output.finish(parse_exit_code(&chunk.payload)?));
                }
                other => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("unexpected {:?} chunk from helper", other),
                    ))
                }
            }
        }
    }
}

async fn send_heartbeats<W>(writer: Arc<Mutex<W>>, period: Duration)
where
    W: AsyncWrite + Unpin + Send,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    loop {
        ticker.tick().await;
        let mut writer = writer.lock().await;
        if write_chunk(&mut *writer, &Chunk::new(ChunkType::Heartbeat, Vec::new()))
            .await
            .is_err()
        {
            return;
        }
    }
}

/// Helper stdout or stderr, whichever says something, for error messages
fn reply_detail(reply: &NailgunReply) -> &str {
    let stdout = reply.stdout.trim();
    if stdout.is_empty() {
        reply.stderr.trim()
    } else {
        stdout
    }
}

#[async_trait]
impl BeanQueryExecutor for NailgunClient {
    async fn run_bean_query(&self, query: &BeanQuery) -> Result<String, CollectorError> {
        tracing::debug!(
            target_domain = %query.target,
            url = %query.connector_url,
            queries = query.queries.len(),
            "Sending bean query"
        );
        let reply = self.send_command(BEAN_QUERY_COMMAND, &query.to_args()).await?;

        match reply.exit_code {
            0 => Ok(reply.stdout),
            AUTH_FAILURE_EXIT_CODE => Err(CollectorError::Protocol {
                exit_code: reply.exit_code,
                message: format!("Invalid user/password to access JMX target {}", query.target),
            }),
            code => {
                tracing::error!(
                    target_domain = %query.target,
                    exit_code = code,
                    "Bean query failed: {}",
                    reply_detail(&reply)
                );
                Err(CollectorError::Protocol {
                    exit_code: code,
                    message: format!(
                        "Unable to connect to JMX target {}, response: {}",
                        query.target,
                        reply_detail(&reply)
                    ),
                })
            }
        }
    }

    async fn stats(&self) -> Result<String, CollectorError> {
        let reply = self.send_command(STATS_COMMAND, &[]).await?;
        if reply.exit_code != 0 {
            return Err(CollectorError::Protocol {
                exit_code: reply.exit_code,
                message: "Unable to get helper stats".to_string(),
            });
        }
        Ok(reply.stdout)
    }
}
