//! # Staybook Core
//!
//! The small set of abstractions every Staybook feature is written against.
//!
//! ## Core Concepts
//!
//! - **State**: owned, in-memory domain state for a feature
//! - **Action**: every input a reducer accepts (commands and the events they produce)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of work for the runtime to perform later
//! - **Environment**: injected collaborators (clock, stores, notifiers)
//!
//! Business rules live in reducers, which never perform I/O themselves.
//! Anything that touches the outside world is returned as an [`effect::Effect`]
//! and executed by the runtime after the state lock is released.
//!
//! ## Example
//!
//! ```ignore
//! use staybook_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for BookingReducer {
//!     type State = BookingState;
//!     type Action = BookingAction;
//!     type Environment = BookingEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BookingState,
//!         action: BookingAction,
//!         env: &BookingEnvironment,
//!     ) -> SmallVec<[Effect<BookingAction>; 4]> {
//!         SmallVec::new()
//!     }
//! }
//! ```

pub use chrono::{DateTime, NaiveDate, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the trait all business logic implements.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// A pure state transition function.
    ///
    /// `reduce` runs while the runtime holds the state's write lock, so
    /// validation and mutation inside one call are atomic with respect to
    /// every other action sent to the same store.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects.
        ///
        /// Implementations validate the action, update `state` in place and
        /// return descriptions of the side effects to run afterwards.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// A side effect to be executed by the runtime.
    ///
    /// Effects are values. Returning one from a reducer does nothing until the
    /// store executes it on a spawned task; any action the effect yields is
    /// fed back into the same store.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation.
        ///
        /// If the future resolves to `Some(action)`, that action is handed to
        /// any caller waiting on it and sent back into the store.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a future as an effect.
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Emit `action` as soon as the effect runs.
        ///
        /// Used by reducers to announce an outcome to the caller waiting on
        /// it through `Store::send_and_wait_for`.
        pub fn emit(action: Action) -> Self
        where
            Action: Send + 'static,
        {
            Effect::future(async move { Some(action) })
        }
    }
}

/// Environment module - dependency traits shared by every feature.
pub mod environment {
    use chrono::{DateTime, NaiveDate, Utc};

    /// Abstracts "now" so date-based rules can be tested deterministically.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// The current calendar date (UTC).
        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Wall clock used in production.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
