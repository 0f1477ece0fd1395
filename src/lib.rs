pub mod cli;
pub mod config;
pub mod generator;
pub mod input;
pub mod parser;
pub mod record;
pub mod url_builder;

pub use config::{CodecConfig, VmessLinkStyle};
pub use generator::generate;
pub use parser::{ImportFailure, ImportReport, dispatch, import_links, try_dispatch};
pub use record::{ProtocolKind, ProxyLink};

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
