pub mod client;
pub mod parse;
pub mod player;
pub mod session;

pub use client::{ArchiveClient, ClientConfig, DownloadBatch, DEFAULT_BASE_URL};
pub use parse::ParseError;
pub use player::{CommandPlayer, Player, DEFAULT_PLAYER};
pub use session::{HttpResponse, HttpSession, ReqwestSession};
