use std::{
    error::Error,
    fmt::{Debug, Display},
};

#[derive(Debug)]
pub enum ConfigError {
    MissingParameter(String),
    UnknownRiemannSolver(String),
    UnknownICs(String),
    UnknownVariable(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingParameter(name) => {
                write!(f, "Missing required parameter in configuration: {}", name)
            }
            ConfigError::UnknownRiemannSolver(name) => {
                write!(f, "Unknown type of Riemann solver configured: {}", name)
            }
            ConfigError::UnknownICs(name) => {
                write!(f, "Unknown type of initial conditions configured: {}", name)
            }
            ConfigError::UnknownVariable(name) => {
                write!(f, "Unknown diagnostic variable requested: {}", name)
            }
        }
    }
}

impl Error for ConfigError {}

/// Fatal runtime errors. Numerical degeneracies (vacuum-adjacent states, zero
/// denominators) are floored and never surface here; an inverted cell cannot
/// be recovered from and aborts the step.
#[derive(Debug)]
pub enum HydroError {
    DegenerateCell { i: usize, j: usize, area: f64 },
}

impl Display for HydroError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HydroError::DegenerateCell { i, j, area } => {
                write!(
                    f,
                    "Degenerate cell ({}, {}) after node move: area = {}",
                    i, j, area
                )
            }
        }
    }
}

impl Error for HydroError {}
