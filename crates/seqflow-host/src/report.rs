/// Resultado de ejecutar un caso registrado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    /// El cuerpo devolvió un error.
    Failed(String),
    Panicked(String),
    /// El cuerpo retornó pero nunca señalizó `Done`.
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// Nombre completo, con la ruta de suites.
    pub name: String,
    pub status: CaseStatus,
    /// Señales `Done` observadas al cerrar el reporte.
    pub completions: usize,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }
}
