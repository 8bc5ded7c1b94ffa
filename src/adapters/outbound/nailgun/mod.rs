/// Nailgun helper adapters: wire protocol, transport, command client and
/// helper process lifecycle
mod client;
mod helper_process;
mod protocol;
mod transport;

pub use client::{NailgunClient, BEAN_QUERY_COMMAND, STATS_COMMAND, STOP_COMMAND};
pub use helper_process::{
    HelperLaunchConfig, NailgunHelper, DEFAULT_STARTUP_TIMEOUT, HELPER_MAIN_CLASS,
};
pub use protocol::{read_chunk, write_chunk, Chunk, ChunkType, NailgunReply, ReplyBuffer};
pub use transport::HelperAddress;
