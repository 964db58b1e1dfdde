use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while bringing a program into memory. Fatal to startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read program {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("program is {size} bytes, the maximum is {max} bytes")]
    TooLarge { size: usize, max: usize },
}

/// Faults raised while executing an instruction.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("stack overflow: call to {target:#05x} nested deeper than 16 levels")]
    StackOverflow { target: u16 },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,
}
