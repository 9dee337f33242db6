//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`)
//! con los valores por defecto de los flujos creados desde este crate.
use std::env;
use std::time::Duration;

use once_cell::sync::Lazy;
use seqflow_core::constants::DEFAULT_CHECK_ENABLED;
use seqflow_core::FlowOptions;
use seqflow_host::DEFAULT_CASE_TIMEOUT;

use crate::errors::CoreError;

/// Variable que fija el valor inicial de `check_enabled`.
pub const CHECKS_VAR: &str = "SEQFLOW_CHECKS";
/// Variable con el timeout (ms) del host para casos asíncronos.
pub const CASE_TIMEOUT_VAR: &str = "SEQFLOW_CASE_TIMEOUT_MS";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub flow: FlowConfig,
}

/// Valores por defecto de los flujos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Si `check`/`aver` agregan entradas al iniciar cada flujo.
    pub check_enabled: bool,
    /// Cuánto espera el host en memoria la señal `Done` de un caso.
    pub case_timeout: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self { check_enabled: DEFAULT_CHECK_ENABLED,
               case_timeout: DEFAULT_CASE_TIMEOUT }
    }
}

impl FlowConfig {
    /// Opciones de flujo derivadas de esta configuración.
    pub fn options(&self) -> FlowOptions {
        FlowOptions::default().with_check_enabled(self.check_enabled)
    }
}

impl AppConfig {
    /// Lee la configuración del entorno (cargando `.env` antes).
    pub fn try_from_env() -> Result<Self, CoreError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de
    /// variables; las ausentes toman el valor por defecto.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = FlowConfig::default();
        let check_enabled = match lookup(CHECKS_VAR) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| CoreError::Config(format!("{CHECKS_VAR}={raw}")))?,
            None => defaults.check_enabled,
        };
        let case_timeout = match lookup(CASE_TIMEOUT_VAR) {
            Some(raw) => raw.trim()
                            .parse::<u64>()
                            .map(Duration::from_millis)
                            .map_err(|e| CoreError::Config(format!("{CASE_TIMEOUT_VAR}={raw}: {e}")))?,
            None => defaults.case_timeout,
        };
        Ok(Self { flow: FlowConfig { check_enabled,
                                     case_timeout } })
    }
}

/// Interpreta `true/false`, `1/0`, `on/off`, `yes/no` (sin distinguir mayúsculas).
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez. Un
/// valor inválido se reporta por `log` y se usan los valores por defecto.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::try_from_env().unwrap_or_else(|e| {
                                 log::warn!("invalid configuration ({e}); using defaults");
                                 AppConfig::default()
                             })
});
