use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("a bin must hold at least one sample")]
    EmptyBin,
    #[error("line {line}: cannot read {content:?} as a sample")]
    Parse { line: usize, content: String },
    #[error("sample producer thread panicked")]
    ProducerPanicked,
}
