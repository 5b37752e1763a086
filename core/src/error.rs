use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToneModemError {
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    #[error("Signal is empty")]
    EmptySignal,

    #[error("Invalid passband {low}-{high} Hz (Nyquist {nyquist} Hz)")]
    InvalidPassband { low: f64, high: f64, nyquist: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("FFT error: {0}")]
    FftError(String),
}

pub type Result<T> = std::result::Result<T, ToneModemError>;
