use std::path::PathBuf;

use crate::api::{ApiCall, Ticket};
use crate::model::ExportFormat;
use crate::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue a backend call; the reply comes back as `Msg::ApiReplied`.
    Api { ticket: Ticket, call: ApiCall },
    /// Drop in-flight reads belonging to a route that just unmounted.
    CancelReads { route: Route },
    /// Read a local domain file; answered by `Msg::DomainFileLoaded`.
    ReadDomainFile { path: PathBuf },
    /// Write an export blob to disk; answered by `Msg::ExportSaved`.
    SaveExport {
        format: ExportFormat,
        bytes: Vec<u8>,
        timestamp_ms: i64,
    },
}

impl Effect {
    pub fn api_call(&self) -> Option<&ApiCall> {
        match self {
            Effect::Api { call, .. } => Some(call),
            _ => None,
        }
    }
}
