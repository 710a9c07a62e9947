//! Error types for Glimmer core.

use std::fmt;

/// The main error type for core operations.
#[derive(Debug)]
pub enum CoreError {
    /// Application has already been initialized.
    ApplicationAlreadyInitialized,
    /// Application has not been initialized yet.
    ApplicationNotInitialized,
    /// Failed to create the event loop.
    EventLoopCreation(String),
    /// The event loop has already exited.
    EventLoopExited,
    /// Timer-related error.
    Timer(TimerError),
    /// Signal-related error.
    Signal(SignalError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplicationAlreadyInitialized => {
                write!(f, "Application has already been initialized")
            }
            Self::ApplicationNotInitialized => {
                write!(f, "Application has not been initialized. Call Application::new() first")
            }
            Self::EventLoopCreation(msg) => {
                write!(f, "Failed to create event loop: {msg}")
            }
            Self::EventLoopExited => write!(f, "The event loop has already exited"),
            Self::Timer(err) => write!(f, "Timer error: {err}"),
            Self::Signal(err) => write!(f, "Signal error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
            Self::Signal(err) => Some(err),
            _ => None,
        }
    }
}

/// Timer-specific errors.
#[derive(Debug)]
pub enum TimerError {
    /// The timer ID is invalid or has already been removed.
    InvalidTimerId,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimerId => write!(f, "Invalid or expired timer ID"),
        }
    }
}

impl std::error::Error for TimerError {}

impl From<TimerError> for CoreError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection ID"),
        }
    }
}

impl std::error::Error for SignalError {}

impl From<SignalError> for CoreError {
    fn from(err: SignalError) -> Self {
        Self::Signal(err)
    }
}

/// A specialized Result type for Glimmer core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
