//! Constantes del secuenciador.

/// Valor inicial del flag `check_enabled` de cada flujo.
pub const DEFAULT_CHECK_ENABLED: bool = true;

/// Nombre de la suite anónima que se abre cuando el host no tiene ninguna
/// suite activa al registrar un flujo.
pub const ANONYMOUS_SUITE: &str = "";

/// Target usado por los mensajes de `log` del runner.
pub const LOG_TARGET: &str = "seqflow";
