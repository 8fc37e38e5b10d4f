//! Session capability contract
//!
//! Every interaction the manager can drive (drag, draw, transform, ...)
//! implements [`Session`]. A closed set of variants is usually an enum
//! implementing the trait; an open set can use `Box<dyn Session<..>>`.

pub trait Session {
    /// Arguments for each intermediate step
    type Update;
    /// Arguments for finishing the interaction
    type Complete;
    /// Arguments for abandoning the interaction
    type Cancel;
    /// What finishing produces, e.g. a reversible command
    type Output;

    fn update(&mut self, args: Self::Update);

    fn complete(&mut self, args: Self::Complete) -> Self::Output;

    fn cancel(&mut self, args: Self::Cancel);

    /// Short label used in logs and diagnostics
    fn kind(&self) -> &'static str {
        "session"
    }
}

impl<S: Session + ?Sized> Session for Box<S> {
    type Update = S::Update;
    type Complete = S::Complete;
    type Cancel = S::Cancel;
    type Output = S::Output;

    fn update(&mut self, args: Self::Update) {
        (**self).update(args)
    }

    fn complete(&mut self, args: Self::Complete) -> Self::Output {
        (**self).complete(args)
    }

    fn cancel(&mut self, args: Self::Cancel) {
        (**self).cancel(args)
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}
