use std::future::IntoFuture;

use error_stack::Report;
use kernel::KernelError;

/// Turns a request into the application's input.
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Like [`Intake`] for requests that can be malformed.
pub trait TryIntake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> error_stack::Result<Self::To, KernelError>;
}

/// Turns the application's output into a response.
pub trait Exhaust<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

pub struct Controller<T, P> {
    transformer: T,
    presenter: P,
}

impl<T, P> Controller<T, P> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
        }
    }

    pub fn intake<I>(self, input: I) -> Transformed<P, T::To>
    where
        T: Intake<I>,
    {
        Transformed {
            dto: Ok(self.transformer.emit(input)),
            presenter: self.presenter,
        }
    }

    /// A rejected input skips the handler and surfaces from `handle`.
    pub fn try_intake<I>(self, input: I) -> Transformed<P, T::To>
    where
        T: TryIntake<I>,
    {
        Transformed {
            dto: self.transformer.emit(input),
            presenter: self.presenter,
        }
    }
}

pub struct Transformed<P, D> {
    dto: error_stack::Result<D, KernelError>,
    presenter: P,
}

impl<P, D> Transformed<P, D> {
    pub async fn handle<F, Fut, O, E>(self, f: F) -> Result<P::To, E>
    where
        P: Exhaust<O>,
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = Result<O, E>>,
        E: From<Report<KernelError>>,
    {
        let dto = self.dto.map_err(E::from)?;
        Ok(self.presenter.emit(f(dto).await?))
    }
}

#[cfg(test)]
mod test {
    use error_stack::Report;
    use kernel::KernelError;

    use super::{Controller, Exhaust, Intake, TryIntake};

    struct Parse;

    impl Intake<&'static str> for Parse {
        type To = String;
        fn emit(&self, input: &'static str) -> Self::To {
            input.to_uppercase()
        }
    }

    impl TryIntake<i64> for Parse {
        type To = i64;
        fn emit(&self, input: i64) -> error_stack::Result<Self::To, KernelError> {
            if input < 0 {
                return Err(Report::new(KernelError::Validation));
            }
            Ok(input)
        }
    }

    struct Show;

    impl Exhaust<usize> for Show {
        type To = String;
        fn emit(&self, input: usize) -> Self::To {
            format!("{input} chars")
        }
    }

    #[tokio::test]
    async fn flows_through_handler() {
        let out = Controller::new(Parse, Show)
            .intake("radio")
            .handle(|dto| async move { Ok::<_, Report<KernelError>>(dto.len()) })
            .await
            .unwrap();
        assert_eq!(out, "5 chars");
    }

    #[tokio::test]
    async fn rejected_input_skips_handler() {
        let error = Controller::new(Parse, Show)
            .try_intake(-1)
            .handle(|dto: i64| async move { Ok::<_, Report<KernelError>>(dto as usize) })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
    }
}
