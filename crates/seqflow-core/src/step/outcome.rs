use crate::errors::StepError;

/// Valor de retorno aceptado por una acción.
///
/// Permite escribir acciones que no devuelven nada (`()`) o que devuelven un
/// `Result<(), E>` con cualquier error convertible en `StepError`.
pub trait StepOutcome {
    fn into_result(self) -> Result<(), StepError>;
}

impl StepOutcome for () {
    #[inline]
    fn into_result(self) -> Result<(), StepError> {
        Ok(())
    }
}

impl<E> StepOutcome for Result<(), E> where E: Into<StepError>
{
    #[inline]
    fn into_result(self) -> Result<(), StepError> {
        self.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_is_success() {
        assert!(().into_result().is_ok());
    }

    #[test]
    fn result_error_is_boxed() {
        let res: Result<(), String> = Err("fallo".into());
        let err = res.into_result().unwrap_err();
        assert_eq!(err.to_string(), "fallo");
    }
}
