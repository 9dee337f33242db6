//! Salida de los helpers `log`/`info` del builder.

use std::sync::{Mutex, PoisonError};


use crate::constants::LOG_TARGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintLevel {
    Log,
    Info,
}

/// Destino de las líneas impresas por los steps de log.
pub trait Printer: Send + Sync {
    fn print(&self, level: PrintLevel, message: &str);
}

/// Imprime en stdout. Las líneas `Info` también se emiten por el facade `log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPrinter;

impl Printer for StdoutPrinter {
    fn print(&self, level: PrintLevel, message: &str) {
        if level == PrintLevel::Info {
            log::info!(target: LOG_TARGET, "{message}");
        }
        println!("{message}");
    }
}

/// Guarda las líneas en memoria; pensado para tests.
#[derive(Debug, Default)]
pub struct RecordingPrinter {
    lines: Mutex<Vec<(PrintLevel, String)>>,
}

impl RecordingPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(PrintLevel, String)> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Sólo los mensajes, sin nivel.
    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, m)| m).collect()
    }
}

impl Printer for RecordingPrinter {
    fn print(&self, level: PrintLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}
