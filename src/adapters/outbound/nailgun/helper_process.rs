use super::client::{NailgunClient, STOP_COMMAND};
use super::transport::HelperAddress;
use crate::ports::outbound::{HelperLifecycle, HelperState};
use crate::shared::error::CollectorError;
use crate::shared::logging::jvm_level_name;
use crate::shared::security::remove_stale_socket;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::Level;

pub const HELPER_MAIN_CLASS: &str = "com.facebook.nailgun.NGServer";
const HELPER_JARS: [&str; 3] = [
    "nailgun-server-1.0.0-SNAPSHOT-uber.jar",
    "wlthint3client.jar",
    "JMXQuery-1.0-SNAPSHOT.jar",
];
/// Idle time in milliseconds before the helper drops a silent client
const HEARTBEAT_TIMEOUT_MS: u32 = 60_000;
const RMI_RESPONSE_TIMEOUT_MS: u32 = 20_000;
/// Undersized socket reader pools make the bean client fail under load
const SOCKET_THREAD_POOL_SIZE: u32 = 50;
const SOCKET_READER_PERCENT: u32 = 80;

const LOGGING_CONFIG_FILE: &str = "logging.properties";
const HELPER_LOG_FILE: &str = "nailgun.log";

const READY_MARKER: &str = "started";
const FAILURE_MARKER: &str = "Nailgun server is not starting correctly";
const STOP_GRACE: Duration = Duration::from_millis(200);

pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to launch the helper JVM
#[derive(Debug, Clone)]
pub struct HelperLaunchConfig {
    pub java_home: PathBuf,
    /// Directory holding the helper jars
    pub lib_dir: PathBuf,
    pub address: HelperAddress,
    pub log_level: Level,
    pub log_dir: PathBuf,
    /// Where the helper runs and its logging config is written
    pub working_dir: PathBuf,
    pub startup_timeout: Duration,
    /// Kill helpers left behind by a previous run before launching
    pub reap_orphans: bool,
}

impl HelperLaunchConfig {
    pub fn java_binary(&self) -> PathBuf {
        self.java_home.join("bin").join("java")
    }

    pub fn class_path(&self) -> String {
        HELPER_JARS
            .iter()
            .map(|jar| self.lib_dir.join(jar).display().to_string())
            .chain(std::iter::once(".".to_string()))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// JVM flags, class path, main class and helper arguments, in order
    pub fn jvm_args(&self) -> Vec<String> {
        vec![
            "-Djna.nosys=true".to_string(),
            format!("-Djava.util.logging.config.file={}", LOGGING_CONFIG_FILE),
            format!("-Dsun.rmi.transport.tcp.responseTimeout={}", RMI_RESPONSE_TIMEOUT_MS),
            format!("-Dweblogic.ThreadPoolSize={}", SOCKET_THREAD_POOL_SIZE),
            format!("-Dweblogic.ThreadPoolPercentSocketReaders={}", SOCKET_READER_PERCENT),
            "-classpath".to_string(),
            self.class_path(),
            HELPER_MAIN_CLASS.to_string(),
            self.address.to_string(),
            HEARTBEAT_TIMEOUT_MS.to_string(),
        ]
    }

    /// `java.util.logging` configuration for the helper
    pub fn logging_properties(&self) -> String {
        let level = jvm_level_name(self.log_level);
        let pattern = self.log_dir.join(HELPER_LOG_FILE);
        [
            "handlers = java.util.logging.FileHandler".to_string(),
            format!(".level = {}", level),
            format!("java.util.logging.FileHandler.level = {}", level),
            "java.util.logging.FileHandler.limit = 10000000".to_string(),
            format!("java.util.logging.FileHandler.pattern = {}", pattern.display()),
            "java.util.logging.FileHandler.count = 5".to_string(),
            "java.util.logging.FileHandler.formatter = java.util.logging.SimpleFormatter".to_string(),
        ]
        .join("\n")
    }
}

/// NailgunHelper adapter owning the helper subprocess
pub struct NailgunHelper {
    config: HelperLaunchConfig,
    client: NailgunClient,
    state: Mutex<HelperState>,
    child: tokio::sync::Mutex<Option<Child>>,
    drain: Mutex<Option<JoinHandle<()>>>,
}

impl NailgunHelper {
    pub fn new(config: HelperLaunchConfig) -> Self {
        let client = NailgunClient::new(config.address.clone())
            .with_request_timeout(Duration::from_secs(5));
        Self {
            config,
            client,
            state: Mutex::new(HelperState::Stopped),
            child: tokio::sync::Mutex::new(None),
            drain: Mutex::new(None),
        }
    }

    fn set_state(&self, state: HelperState) {
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = state;
    }

    /// Moves Stopped -> Starting, refusing any other starting point.
    fn begin_start(&self) -> Result<(), CollectorError> {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if *state != HelperState::Stopped {
            return Err(CollectorError::lifecycle(format!(
                "cannot start helper while it is {}",
                *state
            )));
        }
        *state = HelperState::Starting;
        Ok(())
    }

    fn clean_socket(&self) -> Result<(), CollectorError> {
        if let Some(path) = self.config.address.socket_path() {
            if remove_stale_socket(path).map_err(|e| CollectorError::lifecycle(e.to_string()))? {
                tracing::debug!(socket = %path.display(), "Removed stale helper socket");
            }
        }
        Ok(())
    }

    async fn reap_orphans(&self) {
        let status = Command::new("pkill")
            .args(["-SIGKILL", "-f", HELPER_MAIN_CLASS])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match status {
            Ok(status) if status.success() => tracing::warn!("Killed orphaned helper process"),
            Ok(_) => {}
            Err(e) => tracing::debug!("Orphan cleanup skipped: {}", e),
        }
    }

    fn prepare_directories(&self) -> Result<(), CollectorError> {
        let create = |dir: &Path| {
            std::fs::create_dir_all(dir).map_err(|e| {
                CollectorError::lifecycle(format!("Failed to create {}: {}", dir.display(), e))
            })
        };
        create(&self.config.log_dir)?;
        if let Some(parent) = self.config.address.socket_path().and_then(Path::parent) {
            create(parent)?;
        }

        let properties = self.config.working_dir.join(LOGGING_CONFIG_FILE);
        std::fs::write(&properties, self.config.logging_properties()).map_err(|e| {
            CollectorError::lifecycle(format!("Failed to write {}: {}", properties.display(), e))
        })
    }

    async fn launch(&self) -> Result<(), CollectorError> {
        self.clean_socket()?;
        if self.config.reap_orphans {
            self.reap_orphans().await;
        }
        self.prepare_directories()?;

        let java = self.config.java_binary();
        tracing::debug!(java = %java.display(), address = %self.config.address, "Launching helper");
        let mut child = Command::new(&java)
            .args(self.config.jvm_args())
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CollectorError::lifecycle(format!("Failed to launch {}: {}", java.display(), e))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CollectorError::lifecycle("helper stdout was not captured"))?;
        let mut lines = BufReader::new(stdout).lines();

        let readiness =
            tokio::time::timeout(self.config.startup_timeout, wait_for_ready(&mut lines)).await;
        let outcome = match readiness {
            Ok(result) => result,
            Err(_) => Err(CollectorError::lifecycle(format!(
                "helper did not report readiness within {}s",
                self.config.startup_timeout.as_secs()
            ))),
        };
        if let Err(e) = outcome {
            let _ = child.kill().await;
            return Err(e);
        }

        let drain = tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(target: "nailgun", "{}", line);
            }
        });
        *self.drain.lock().unwrap_or_else(|p| p.into_inner()) = Some(drain);
        *self.child.lock().await = Some(child);
        Ok(())
    }
}

async fn wait_for_ready(lines: &mut Lines<BufReader<ChildStdout>>) -> Result<(), CollectorError> {
    loop {
        let line = lines
            .next_line()
            .await
            .map_err(|e| CollectorError::lifecycle(format!("Failed to read helper output: {}", e)))?
            .ok_or_else(|| CollectorError::lifecycle("helper exited before reporting readiness"))?;
        tracing::debug!(target: "nailgun", "{}", line);

        if line.contains(FAILURE_MARKER) {
            return Err(CollectorError::lifecycle("Unable to start the Nailgun server"));
        }
        if line.contains(READY_MARKER) {
            return Ok(());
        }
    }
}

#[async_trait]
impl HelperLifecycle for NailgunHelper {
    async fn start(&self) -> Result<(), CollectorError> {
        self.begin_start()?;
        match self.launch().await {
            Ok(()) => {
                self.set_state(HelperState::Running);
                tracing::info!(address = %self.config.address, "Helper process running");
                Ok(())
            }
            Err(e) => {
                self.set_state(HelperState::Stopped);
                Err(e)
            }
        }
    }

    async fn stop(&self) -> Result<(), CollectorError> {
        if self.state() == HelperState::Stopped {
            return Ok(());
        }
        self.set_state(HelperState::Stopping);

        match self.client.send_command(STOP_COMMAND, &[]).await {
            Ok(reply) if reply.exit_code == 0 => tracing::debug!("Helper acknowledged stop"),
            Ok(reply) => tracing::warn!(exit_code = reply.exit_code, "Helper refused stop command"),
            Err(e) => tracing::warn!("Could not send stop command: {}", e),
        }
        tokio::time::sleep(STOP_GRACE).await;

        if let Some(mut child) = self.child.lock().await.take() {
            if matches!(child.try_wait(), Ok(None)) {
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill helper process: {}", e);
                }
            }
        }
        if let Some(drain) = self.drain.lock().unwrap_or_else(|p| p.into_inner()).take() {
            drain.abort();
        }

        let cleanup = self.clean_socket();
        self.set_state(HelperState::Stopped);
        tracing::info!("Helper process stopped");
        cleanup
    }

    fn state(&self) -> HelperState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}
